//! Native capturer that draws each family procedurally
//!
//! Produces the same white-on-black picture the HTML document describes
//! without a browser, so the loop stays deterministic and runnable offline.

use super::draw::{Canvas, Point};
use super::{Capturer, Document};
use crate::classify::FormulaFamily;
use crate::io::error::{ObserverError, Result};
use image::DynamicImage;
use tracing::debug;

/// Margin kept free around every drawing
pub const MARGIN: f64 = 10.0;
/// Stroke width for line-based families
pub const STROKE: u32 = 3;
/// Side of one Cantor dust block in pixels
pub const DUST_BLOCK: i64 = 4;
/// Cantor dust blocks snap to this pixel grid
const DUST_GRID: i64 = 4;
/// Smallest level spacing that keeps Cantor blocks visually separate
const DUST_MIN_UNIT: f64 = 12.0;

const SIERPINSKI_DEPTH: u32 = 6;
const KOCH_DEPTH: u32 = 4;
const DRAGON_GENERATIONS: u32 = 12;
const TREE_DEPTH: u32 = 9;
const TREE_ANGLE_DEG: f64 = 25.0;
const TREE_RATIO: f64 = 0.7;
const CARPET_DEPTH: u32 = 4;
const AUTOMATON_CELL: u32 = 4;
const AUTOMATON_RULE: u8 = 90;
const JULIA_C: (f64, f64) = (-0.8, 0.156);
const ESCAPE_ITERATIONS: u32 = 64;
const NEWTON_ITERATIONS: u32 = 32;
const SPIRAL_GROWTH: f64 = 0.1759;
const SPIRAL_TURNS: f64 = 3.0;

/// Draws documents natively instead of displaying them
#[derive(Debug, Clone, Copy, Default)]
pub struct RasterCapturer;

impl RasterCapturer {
    /// Create a capturer
    pub const fn new() -> Self {
        Self
    }
}

impl Capturer for RasterCapturer {
    fn capture(&mut self, document: &Document) -> Result<DynamicImage> {
        if document.width == 0 || document.height == 0 {
            return Err(ObserverError::Capture {
                reason: format!(
                    "cannot draw on a {}x{} canvas",
                    document.width, document.height
                ),
            });
        }
        debug!(family = %document.family, width = document.width, height = document.height, "drawing natively");
        Ok(draw_family(document.family, document.width, document.height))
    }
}

/// Draw a family onto a fresh canvas of the given size
pub fn draw_family(family: FormulaFamily, width: u32, height: u32) -> DynamicImage {
    let mut canvas = Canvas::new(width, height);
    match family {
        FormulaFamily::Sierpinski => draw_sierpinski(&mut canvas),
        FormulaFamily::Koch => draw_koch(&mut canvas),
        FormulaFamily::Julia => draw_julia(&mut canvas),
        FormulaFamily::Dragon => draw_dragon(&mut canvas),
        FormulaFamily::Tree => draw_tree(&mut canvas),
        FormulaFamily::Menger => draw_carpet(&mut canvas),
        FormulaFamily::Automaton => draw_automaton(&mut canvas),
        FormulaFamily::Spiral => draw_spiral(&mut canvas),
        FormulaFamily::Algebraic => draw_newton(&mut canvas),
        FormulaFamily::Cantor | FormulaFamily::Unknown => draw_cantor_dust(&mut canvas),
    }
    canvas.into_image()
}

fn extent(canvas: &Canvas) -> (f64, f64) {
    (
        (f64::from(canvas.width()) - 2.0 * MARGIN).max(1.0),
        (f64::from(canvas.height()) - 2.0 * MARGIN).max(1.0),
    )
}

fn draw_sierpinski(canvas: &mut Canvas) {
    fn subdivide(canvas: &mut Canvas, a: Point, b: Point, c: Point, depth: u32) {
        if depth == 0 {
            canvas.fill_triangle(a, b, c);
            return;
        }
        let ab = midpoint(a, b);
        let bc = midpoint(b, c);
        let ca = midpoint(c, a);
        subdivide(canvas, a, ab, ca, depth - 1);
        subdivide(canvas, ab, b, bc, depth - 1);
        subdivide(canvas, ca, bc, c, depth - 1);
    }

    let (width, height) = extent(canvas);
    let bottom = MARGIN + height;
    let a = (MARGIN, bottom);
    let b = (MARGIN + width, bottom);
    let c = (MARGIN + width / 2.0, MARGIN);
    subdivide(canvas, a, b, c, SIERPINSKI_DEPTH);
}

fn midpoint(a: Point, b: Point) -> Point {
    ((a.0 + b.0) / 2.0, (a.1 + b.1) / 2.0)
}

fn draw_koch(canvas: &mut Canvas) {
    fn refine(points: &mut Vec<Point>, from: Point, to: Point, depth: u32) {
        if depth == 0 {
            points.push(to);
            return;
        }
        let dx = (to.0 - from.0) / 3.0;
        let dy = (to.1 - from.1) / 3.0;
        let one_third = (from.0 + dx, from.1 + dy);
        let two_thirds = (from.0 + 2.0 * dx, from.1 + 2.0 * dy);
        let (sin, cos) = (-60_f64).to_radians().sin_cos();
        let peak = (
            one_third.0 + dx.mul_add(cos, -(dy * sin)),
            one_third.1 + dx.mul_add(sin, dy * cos),
        );
        refine(points, from, one_third, depth - 1);
        refine(points, one_third, peak, depth - 1);
        refine(points, peak, two_thirds, depth - 1);
        refine(points, two_thirds, to, depth - 1);
    }

    let (width, height) = extent(canvas);
    let baseline = MARGIN + height * 0.75;
    let start = (MARGIN, baseline);
    let mut points = vec![start];
    refine(&mut points, start, (MARGIN + width, baseline), KOCH_DEPTH);
    canvas.polyline(&points, STROKE);
}

fn escape_grid(canvas: &mut Canvas, bounds: (f64, f64, f64, f64), inside: impl Fn(f64, f64) -> bool) {
    let (x_min, x_max, y_min, y_max) = bounds;
    let width = canvas.width();
    let height = canvas.height();
    for row in 0..height {
        let y = y_max - (y_max - y_min) * f64::from(row) / f64::from(height.max(1));
        for col in 0..width {
            let x = x_min + (x_max - x_min) * f64::from(col) / f64::from(width.max(1));
            if inside(x, y) {
                canvas.plot(i64::from(col), i64::from(row));
            }
        }
    }
}

fn draw_julia(canvas: &mut Canvas) {
    escape_grid(canvas, (-1.6, 1.6, -1.0, 1.0), |x, y| {
        let (mut re, mut im) = (x, y);
        for _ in 0..ESCAPE_ITERATIONS {
            if re.mul_add(re, im * im) > 4.0 {
                return false;
            }
            let next = re.mul_add(re, -(im * im)) + JULIA_C.0;
            im = 2.0 * re * im + JULIA_C.1;
            re = next;
        }
        true
    });
}

fn draw_newton(canvas: &mut Canvas) {
    escape_grid(canvas, (-2.0, 2.0, -2.0, 2.0), |x, y| {
        let (mut re, mut im) = (x, y);
        for _ in 0..NEWTON_ITERATIONS {
            // z - (z^3 - 1) / (3 z^2)
            let sq_re = re.mul_add(re, -(im * im));
            let sq_im = 2.0 * re * im;
            let cube_re = sq_re.mul_add(re, -(sq_im * im)) - 1.0;
            let cube_im = sq_re.mul_add(im, sq_im * re);
            let den_re = 3.0 * sq_re;
            let den_im = 3.0 * sq_im;
            let den = den_re.mul_add(den_re, den_im * den_im);
            if den < 1e-12 {
                return false;
            }
            re -= cube_re.mul_add(den_re, cube_im * den_im) / den;
            im -= cube_im.mul_add(den_re, -(cube_re * den_im)) / den;
        }
        (re - 1.0).abs() < 1e-3 && im.abs() < 1e-3
    });
}

fn draw_dragon(canvas: &mut Canvas) {
    // Paper-folding sequence: true turns right
    let mut turns: Vec<bool> = Vec::new();
    for _ in 0..DRAGON_GENERATIONS {
        let mirrored: Vec<bool> = turns.iter().rev().map(|turn| !turn).collect();
        turns.push(true);
        turns.extend(mirrored);
    }

    let mut points: Vec<(i64, i64)> = vec![(0, 0)];
    let (mut x, mut y, mut dx, mut dy) = (0_i64, 0_i64, 1_i64, 0_i64);
    x += dx;
    points.push((x, y));
    for turn in turns {
        (dx, dy) = if turn { (-dy, dx) } else { (dy, -dx) };
        x += dx;
        y += dy;
        points.push((x, y));
    }

    fit_and_draw(canvas, &points);
}

fn fit_and_draw(canvas: &mut Canvas, points: &[(i64, i64)]) {
    let min_x = points.iter().map(|p| p.0).min().unwrap_or(0);
    let max_x = points.iter().map(|p| p.0).max().unwrap_or(0);
    let min_y = points.iter().map(|p| p.1).min().unwrap_or(0);
    let max_y = points.iter().map(|p| p.1).max().unwrap_or(0);
    let (width, height) = extent(canvas);
    let span_x = (max_x - min_x).max(1) as f64;
    let span_y = (max_y - min_y).max(1) as f64;
    let scale = (width / span_x).min(height / span_y);

    let mapped: Vec<Point> = points
        .iter()
        .map(|&(x, y)| {
            (
                (x - min_x) as f64 * scale + MARGIN,
                (y - min_y) as f64 * scale + MARGIN,
            )
        })
        .collect();
    canvas.polyline(&mapped, STROKE);
}

fn draw_tree(canvas: &mut Canvas) {
    fn branch(canvas: &mut Canvas, base: Point, heading: f64, length: f64, depth: u32) {
        let (sin, cos) = heading.to_radians().sin_cos();
        // Screen y grows downwards
        let tip = (length.mul_add(cos, base.0), (-length).mul_add(sin, base.1));
        canvas.line(base, tip, STROKE);
        if depth == 0 {
            return;
        }
        let next = length * TREE_RATIO;
        branch(canvas, tip, heading + TREE_ANGLE_DEG, next, depth - 1);
        branch(canvas, tip, heading - TREE_ANGLE_DEG, next, depth - 1);
    }

    let (width, height) = extent(canvas);
    let trunk = height.min(width) * 0.28;
    let base = (MARGIN + width / 2.0, MARGIN + height);
    branch(canvas, base, 90.0, trunk, TREE_DEPTH);
}

fn draw_carpet(canvas: &mut Canvas) {
    fn fill(canvas: &mut Canvas, x: f64, y: f64, side: f64, depth: u32) {
        if depth == 0 {
            canvas.fill_rect(
                x.round() as i64,
                y.round() as i64,
                side.round().max(1.0) as i64,
                side.round().max(1.0) as i64,
            );
            return;
        }
        let third = side / 3.0;
        for i in 0..3_u32 {
            for j in 0..3_u32 {
                if i == 1 && j == 1 {
                    continue;
                }
                fill(
                    canvas,
                    third.mul_add(f64::from(i), x),
                    third.mul_add(f64::from(j), y),
                    third,
                    depth - 1,
                );
            }
        }
    }

    let (width, height) = extent(canvas);
    let side = width.min(height);
    fill(canvas, MARGIN, MARGIN, side, CARPET_DEPTH);
}

fn draw_automaton(canvas: &mut Canvas) {
    let cell = AUTOMATON_CELL;
    let columns = (canvas.width() / cell).max(1) as usize;
    let rows = canvas.height() / cell;
    let mut state = vec![false; columns];
    if let Some(seed) = state.get_mut(columns / 2) {
        *seed = true;
    }

    for row in 0..rows {
        for (col, &alive) in state.iter().enumerate() {
            if alive {
                canvas.fill_rect(
                    col as i64 * i64::from(cell),
                    i64::from(row) * i64::from(cell),
                    i64::from(cell),
                    i64::from(cell),
                );
            }
        }
        state = (0..columns)
            .map(|col| {
                let left = col.checked_sub(1).and_then(|c| state.get(c)).copied().unwrap_or(false);
                let centre = state.get(col).copied().unwrap_or(false);
                let right = state.get(col + 1).copied().unwrap_or(false);
                let pattern = (u8::from(left) << 2) | (u8::from(centre) << 1) | u8::from(right);
                (AUTOMATON_RULE >> pattern) & 1 == 1
            })
            .collect();
    }
}

fn draw_spiral(canvas: &mut Canvas) {
    let (width, height) = extent(canvas);
    let centre = (MARGIN + width / 2.0, MARGIN + height / 2.0);
    let end = SPIRAL_TURNS * std::f64::consts::TAU;
    let radius_at_end = (SPIRAL_GROWTH * end).exp();
    let scale = width.min(height) / 2.0 / radius_at_end;

    let samples = 720_u32;
    let points: Vec<Point> = (0..=samples)
        .map(|i| {
            let theta = end * f64::from(i) / f64::from(samples);
            let radius = scale * (SPIRAL_GROWTH * theta).exp();
            let (sin, cos) = theta.sin_cos();
            (radius.mul_add(cos, centre.0), radius.mul_add(sin, centre.1))
        })
        .collect();
    canvas.polyline(&points, STROKE);
}

/// Left edges of the Cantor intervals at a level, in units of `3^-level`
pub fn cantor_positions(level: u32) -> Vec<u64> {
    let mut positions = vec![0_u64];
    for _ in 0..level {
        positions = positions
            .iter()
            .flat_map(|&p| [p * 3, p * 3 + 2])
            .collect();
    }
    positions
}

fn draw_cantor_dust(canvas: &mut Canvas) {
    let (width, height) = extent(canvas);
    let span = width.min(height);
    let level = (1..=3_u32)
        .rev()
        .find(|&level| span / 3_f64.powi(level as i32) >= DUST_MIN_UNIT)
        .unwrap_or(1);
    let unit = span / 3_f64.powi(level as i32);

    let snap = |offset: u64| {
        let position = (offset as f64).mul_add(unit, MARGIN) as i64;
        position / DUST_GRID * DUST_GRID
    };
    let positions = cantor_positions(level);
    for &row in &positions {
        for &col in &positions {
            canvas.fill_rect(snap(col), snap(row), DUST_BLOCK, DUST_BLOCK);
        }
    }
}
