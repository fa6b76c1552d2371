//! White-on-black drawing primitives over an 8-bit luminance buffer

use image::{DynamicImage, GrayImage, Luma};

const INK: Luma<u8> = Luma([255]);

/// Point in pixel coordinates, `x` rightwards and `y` downwards
pub type Point = (f64, f64);

/// Drawing surface; starts black and only ever paints white
#[derive(Debug, Clone)]
pub struct Canvas {
    image: GrayImage,
}

impl Canvas {
    /// Black canvas of the given size
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: GrayImage::new(width, height),
        }
    }

    /// Canvas width in pixels
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Canvas height in pixels
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Paint a single pixel; positions outside the canvas are ignored
    pub fn plot(&mut self, x: i64, y: i64) {
        if x < 0 || y < 0 {
            return;
        }
        if let Some(pixel) = self.image.get_pixel_mut_checked(x as u32, y as u32) {
            *pixel = INK;
        }
    }

    /// Whether a pixel has been painted
    pub fn is_inked(&self, x: u32, y: u32) -> bool {
        self.image
            .get_pixel_checked(x, y)
            .is_some_and(|pixel| pixel.0[0] > 0)
    }

    /// Paint an axis-aligned rectangle with its top-left corner at `(x, y)`
    pub fn fill_rect(&mut self, x: i64, y: i64, width: i64, height: i64) {
        for row in y..y + height {
            for col in x..x + width {
                self.plot(col, row);
            }
        }
    }

    /// Paint a square of side `stroke` centred on a point
    pub fn stamp(&mut self, point: Point, stroke: u32) {
        let half = f64::from(stroke) / 2.0;
        let x = (point.0 - half).round() as i64;
        let y = (point.1 - half).round() as i64;
        self.fill_rect(x, y, i64::from(stroke), i64::from(stroke));
    }

    /// Paint a straight segment with the given stroke width
    pub fn line(&mut self, from: Point, to: Point, stroke: u32) {
        let steps = (to.0 - from.0).abs().max((to.1 - from.1).abs()).ceil().max(1.0);
        let count = steps as u64;
        for step in 0..=count {
            let t = step as f64 / steps;
            let point = (
                (to.0 - from.0).mul_add(t, from.0),
                (to.1 - from.1).mul_add(t, from.1),
            );
            self.stamp(point, stroke);
        }
    }

    /// Paint consecutive segments through the points
    pub fn polyline(&mut self, points: &[Point], stroke: u32) {
        for pair in points.windows(2) {
            if let [from, to] = pair {
                self.line(*from, *to, stroke);
            }
        }
    }

    /// Paint a filled triangle
    pub fn fill_triangle(&mut self, a: Point, b: Point, c: Point) {
        let min_x = a.0.min(b.0).min(c.0).floor() as i64;
        let max_x = a.0.max(b.0).max(c.0).ceil() as i64;
        let min_y = a.1.min(b.1).min(c.1).floor() as i64;
        let max_y = a.1.max(b.1).max(c.1).ceil() as i64;

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let p = (x as f64, y as f64);
                let d1 = edge(p, a, b);
                let d2 = edge(p, b, c);
                let d3 = edge(p, c, a);
                let has_negative = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
                let has_positive = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
                if !(has_negative && has_positive) {
                    self.plot(x, y);
                }
            }
        }
    }

    /// Finish drawing
    pub fn into_image(self) -> DynamicImage {
        DynamicImage::ImageLuma8(self.image)
    }
}

fn edge(p: Point, a: Point, b: Point) -> f64 {
    (p.0 - b.0).mul_add(a.1 - b.1, -((a.0 - b.0) * (p.1 - b.1)))
}
