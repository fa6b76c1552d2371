//! Self-contained HTML documents drawing a family with JSXGraph
//!
//! The canvas fills the window so a screenshot of the window's size contains
//! only the drawing; the formula and invariants sit below the fold.

use super::{Document, Renderer};
use crate::classify::{FormulaFamily, rules};
use crate::io::configuration::VisualizationConfig;
use crate::io::error::{ObserverError, Result};
use crate::measure::InvariantVector;

/// JSXGraph release loaded by every document
pub const JSXGRAPH_VERSION: &str = "1.7.0";

const TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>Fractal Observer: {{family}}</title>
<link rel="stylesheet" type="text/css" href="https://cdn.jsdelivr.net/npm/jsxgraph@{{version}}/distrib/jsxgraph.css" />
<script type="text/javascript" src="https://cdn.jsdelivr.net/npm/jsxgraph@{{version}}/distrib/jsxgraphcore.js"></script>
<style>
  html, body { margin: 0; padding: 0; background: #000; }
  #board { width: {{width}}px; height: {{height}}px; background: #000; border: none; border-radius: 0; }
  .info { color: #ccc; font-family: monospace; padding: 8px; }
</style>
</head>
<body>
<div id="board" class="jxgbox"></div>
<div class="info">
  <p><strong>Formula:</strong> {{formula}}</p>
  <p><strong>Dimensionality:</strong> {{dimensionality}}</p>
  <p><strong>Symmetry:</strong> {{symmetry}}</p>
  <p><strong>Connectivity:</strong> {{connectivity}}</p>
  <p><strong>Repetition:</strong> {{repetition}}</p>
</div>
<script type="text/javascript">
(function () {
  const board = JXG.JSXGraph.initBoard('board', {
    boundingbox: [-5, 5, 5, -5], axis: false, grid: false,
    showCopyright: false, showNavigation: false, pan: { enabled: false }, zoom: { enabled: false }
  });
  const line = { strokeColor: '#ffffff', strokeWidth: 3, fixed: true, highlight: false };
  const solid = {
    fillColor: '#ffffff', fillOpacity: 1, strokeColor: '#ffffff', highlight: false, fixed: true,
    borders: { strokeColor: '#ffffff', highlight: false }, vertices: { visible: false }
  };
  function polygon(points) { board.create('polygon', points, solid); }
  function segment(a, b) { board.create('segment', [a, b], line); }
  function pixels(size, inside, bounds) {
    const canvas = document.createElement('canvas');
    canvas.width = size; canvas.height = size;
    const context = canvas.getContext('2d');
    const image = context.createImageData(size, size);
    for (let row = 0; row < size; row++) {
      for (let col = 0; col < size; col++) {
        const x = bounds[0] + (bounds[1] - bounds[0]) * col / size;
        const y = bounds[3] - (bounds[3] - bounds[2]) * row / size;
        const value = inside(x, y) ? 255 : 0;
        const offset = 4 * (row * size + col);
        image.data[offset] = value; image.data[offset + 1] = value;
        image.data[offset + 2] = value; image.data[offset + 3] = 255;
      }
    }
    context.putImageData(image, 0, 0);
    board.create('image', [canvas.toDataURL(), [-5, -5], [10, 10]], { fixed: true, highlight: false });
  }
{{script}}
  board.update();
})();
</script>
</body>
</html>
"#;

const SIERPINSKI_SCRIPT: &str = r"
  function sierpinski(a, b, c, depth) {
    if (depth === 0) { polygon([a, b, c]); return; }
    const ab = [(a[0] + b[0]) / 2, (a[1] + b[1]) / 2];
    const bc = [(b[0] + c[0]) / 2, (b[1] + c[1]) / 2];
    const ca = [(c[0] + a[0]) / 2, (c[1] + a[1]) / 2];
    sierpinski(a, ab, ca, depth - 1);
    sierpinski(ab, b, bc, depth - 1);
    sierpinski(ca, bc, c, depth - 1);
  }
  sierpinski([-4.8, -4.8], [4.8, -4.8], [0, 4.8], 6);
";

const KOCH_SCRIPT: &str = r"
  function koch(a, b, depth, out) {
    if (depth === 0) { out.push(b); return; }
    const dx = (b[0] - a[0]) / 3, dy = (b[1] - a[1]) / 3;
    const p1 = [a[0] + dx, a[1] + dy];
    const p2 = [a[0] + 2 * dx, a[1] + 2 * dy];
    const angle = Math.PI / 3;
    const peak = [p1[0] + dx * Math.cos(angle) - dy * Math.sin(angle),
                  p1[1] + dx * Math.sin(angle) + dy * Math.cos(angle)];
    koch(a, p1, depth - 1, out); koch(p1, peak, depth - 1, out);
    koch(peak, p2, depth - 1, out); koch(p2, b, depth - 1, out);
  }
  const points = [[-4.8, -2.5]];
  koch([-4.8, -2.5], [4.8, -2.5], 4, points);
  board.create('curve', [points.map(p => p[0]), points.map(p => p[1])], line);
";

const JULIA_SCRIPT: &str = r"
  pixels(500, function (x, y) {
    let re = x, im = y;
    for (let i = 0; i < 64; i++) {
      if (re * re + im * im > 4) { return false; }
      const next = re * re - im * im - 0.8;
      im = 2 * re * im + 0.156; re = next;
    }
    return true;
  }, [-1.6, 1.6, -1.0, 1.0]);
";

const DRAGON_SCRIPT: &str = r"
  let turns = [];
  for (let g = 0; g < 12; g++) {
    const mirrored = turns.slice().reverse().map(t => !t);
    turns = turns.concat([true], mirrored);
  }
  let x = 0, y = 0, dx = 1, dy = 0;
  const xs = [0], ys = [0];
  x += dx; xs.push(x); ys.push(y);
  for (const turn of turns) {
    const ndx = turn ? dy : -dy, ndy = turn ? -dx : dx;
    dx = ndx; dy = ndy; x += dx; y += dy; xs.push(x); ys.push(y);
  }
  const minX = Math.min(...xs), maxX = Math.max(...xs), minY = Math.min(...ys), maxY = Math.max(...ys);
  const scale = 9.6 / Math.max(maxX - minX, maxY - minY, 1);
  board.create('curve', [xs.map(v => (v - minX) * scale - 4.8), ys.map(v => (v - minY) * scale - 4.8)], line);
";

const TREE_SCRIPT: &str = r"
  const spread = 25 * Math.PI / 180;
  function branch(base, heading, length, depth) {
    const tip = [base[0] + length * Math.cos(heading), base[1] + length * Math.sin(heading)];
    segment(base, tip);
    if (depth === 0) { return; }
    branch(tip, heading + spread, length * 0.7, depth - 1);
    branch(tip, heading - spread, length * 0.7, depth - 1);
  }
  branch([0, -4.8], Math.PI / 2, 2.7, 9);
";

const MENGER_SCRIPT: &str = r"
  function carpet(x, y, side, depth) {
    if (depth === 0) { polygon([[x, y], [x + side, y], [x + side, y + side], [x, y + side]]); return; }
    const third = side / 3;
    for (let i = 0; i < 3; i++) {
      for (let j = 0; j < 3; j++) {
        if (i === 1 && j === 1) { continue; }
        carpet(x + i * third, y + j * third, third, depth - 1);
      }
    }
  }
  carpet(-4.8, -4.8, 9.6, 3);
";

const AUTOMATON_SCRIPT: &str = r"
  const cells = 125;
  let state = new Array(cells).fill(false);
  state[Math.floor(cells / 2)] = true;
  const rows = [];
  for (let r = 0; r < cells; r++) {
    rows.push(state);
    state = state.map((_, i) => {
      const pattern = ((state[i - 1] ? 1 : 0) << 2) | ((state[i] ? 1 : 0) << 1) | (state[i + 1] ? 1 : 0);
      return ((90 >> pattern) & 1) === 1;
    });
  }
  pixels(500, function (x, y) {
    const col = Math.floor((x + 5) / 10 * cells);
    const row = Math.floor((5 - y) / 10 * cells);
    return rows[row] !== undefined && rows[row][col] === true;
  }, [-5, 5, -5, 5]);
";

const SPIRAL_SCRIPT: &str = r"
  const growth = 0.1759, end = 6 * Math.PI;
  const scale = 4.8 / Math.exp(growth * end);
  board.create('curve', [
    t => scale * Math.exp(growth * t) * Math.cos(t),
    t => scale * Math.exp(growth * t) * Math.sin(t),
    0, end
  ], line);
";

const NEWTON_SCRIPT: &str = r"
  pixels(500, function (x, y) {
    let re = x, im = y;
    for (let i = 0; i < 32; i++) {
      const sqRe = re * re - im * im, sqIm = 2 * re * im;
      const cubeRe = sqRe * re - sqIm * im - 1, cubeIm = sqRe * im + sqIm * re;
      const denRe = 3 * sqRe, denIm = 3 * sqIm;
      const den = denRe * denRe + denIm * denIm;
      if (den < 1e-12) { return false; }
      re -= (cubeRe * denRe + cubeIm * denIm) / den;
      im -= (cubeIm * denRe - cubeRe * denIm) / den;
    }
    return Math.abs(re - 1) < 1e-3 && Math.abs(im) < 1e-3;
  }, [-2, 2, -2, 2]);
";

const CANTOR_SCRIPT: &str = r"
  let starts = [0];
  for (let level = 0; level < 3; level++) {
    starts = starts.flatMap(p => [3 * p, 3 * p + 2]);
  }
  const unit = 9.6 / 27, block = 0.08;
  for (const row of starts) {
    for (const col of starts) {
      const x = -4.8 + col * unit, y = 4.8 - row * unit;
      polygon([[x, y], [x + block, y], [x + block, y - block], [x, y - block]]);
    }
  }
";

/// Drawing script for a family; the Unknown family draws Cantor dust
pub const fn family_script(family: FormulaFamily) -> &'static str {
    match family {
        FormulaFamily::Sierpinski => SIERPINSKI_SCRIPT,
        FormulaFamily::Koch => KOCH_SCRIPT,
        FormulaFamily::Julia => JULIA_SCRIPT,
        FormulaFamily::Dragon => DRAGON_SCRIPT,
        FormulaFamily::Tree => TREE_SCRIPT,
        FormulaFamily::Menger => MENGER_SCRIPT,
        FormulaFamily::Automaton => AUTOMATON_SCRIPT,
        FormulaFamily::Spiral => SPIRAL_SCRIPT,
        FormulaFamily::Algebraic => NEWTON_SCRIPT,
        FormulaFamily::Cantor | FormulaFamily::Unknown => CANTOR_SCRIPT,
    }
}

/// Renders formulas as JSXGraph pages
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlRenderer;

impl HtmlRenderer {
    /// Create a renderer
    pub const fn new() -> Self {
        Self
    }
}

impl Renderer for HtmlRenderer {
    fn render(
        &self,
        formula: &str,
        invariants: &InvariantVector,
        config: &VisualizationConfig,
    ) -> Result<Document> {
        if config.width == 0 || config.height == 0 {
            return Err(ObserverError::Render {
                reason: format!("canvas size {}x{} is empty", config.width, config.height),
            });
        }

        let family = rules::select_family(invariants);
        let markup = TEMPLATE
            .replace("{{version}}", JSXGRAPH_VERSION)
            .replace("{{family}}", family.name())
            .replace("{{width}}", &config.width.to_string())
            .replace("{{height}}", &config.height.to_string())
            .replace("{{formula}}", &html_escape::encode_text(formula))
            .replace("{{dimensionality}}", &format!("{:.3}", invariants.dimensionality))
            .replace(
                "{{symmetry}}",
                &html_escape::encode_text(invariants.symmetry_approx.token()),
            )
            .replace("{{connectivity}}", &invariants.connectivity.to_string())
            .replace("{{repetition}}", &format!("{:.3}", invariants.repetition_score))
            .replace("{{script}}", family_script(family));

        Ok(Document {
            family,
            formula: formula.to_owned(),
            width: config.width,
            height: config.height,
            markup,
        })
    }
}
