//! Branch angle and length-ratio estimation for tree-like images
//!
//! Only sparse images are examined: near-empty and near-solid images are
//! reported as not tree-like. The estimate comes from tracing the skeleton
//! around a single junction rather than from a full branch graph.

use super::invariants::Branching;
use super::topology::{NEIGHBOUR_OFFSETS, find_junctions, pixel_at, skeletonize};
use super::{Mask, foreground_density};
use tracing::debug;

/// Exclusive foreground-density window in which branching is analysed
pub const TREE_DENSITY_RANGE: (f64, f64) = (0.01, 0.3);
/// Reported angle when junctions exist but no branches could be traced
pub const FALLBACK_ANGLE_DEG: f64 = 36.0;
/// Reported ratio when junctions exist but no branches could be traced
pub const FALLBACK_RATIO: f64 = 0.7;

// Steps walked along each branch
const TRACE_LIMIT: usize = 48;
const MIN_BRANCH_LENGTH: usize = 3;
const MAX_JUNCTIONS_EXAMINED: usize = 64;

/// Direction and length of one traced branch
#[derive(Debug, Clone, Copy, PartialEq)]
struct Branch {
    dx: f64,
    dy: f64,
    length: usize,
}

/// Representative estimate at one junction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JunctionEstimate {
    /// Smallest angle between two traced branches, whole degrees
    pub angle: f64,
    /// Shortest over longest traced branch length
    pub ratio: f64,
    /// Sum of traced branch lengths, used to rank junctions
    pub total_length: usize,
}

/// Branching invariants of a binary image
pub fn analyze_branching(mask: &Mask) -> Branching {
    let density = foreground_density(mask);
    let (low, high) = TREE_DENSITY_RANGE;
    if density <= low || density >= high {
        return Branching::default();
    }

    let skeleton = skeletonize(mask);
    let junctions = find_junctions(&skeleton);
    if junctions.is_empty() {
        return Branching::default();
    }

    let best = junctions
        .iter()
        .take(MAX_JUNCTIONS_EXAMINED)
        .filter_map(|&junction| estimate_at_junction(&skeleton, junction))
        .max_by_key(|estimate| estimate.total_length);

    match best {
        Some(estimate) => Branching {
            angles: vec![estimate.angle],
            ratios: vec![estimate.ratio],
        },
        None => {
            debug!(
                junctions = junctions.len(),
                "no traceable branches, using representative estimate"
            );
            Branching {
                angles: vec![FALLBACK_ANGLE_DEG],
                ratios: vec![FALLBACK_RATIO],
            }
        }
    }
}

/// Trace the branches leaving a junction and summarize them
///
/// Returns `None` unless at least two branches of minimal length are found.
pub fn estimate_at_junction(skeleton: &Mask, junction: (usize, usize)) -> Option<JunctionEstimate> {
    let origin = (junction.0 as isize, junction.1 as isize);
    let mut visited = vec![origin];
    // Adjacent junction pixels belong to the same node
    for (dr, dc) in NEIGHBOUR_OFFSETS {
        let position = (origin.0 + dr, origin.1 + dc);
        if is_junction(skeleton, position) {
            visited.push(position);
        }
    }

    let mut branches = Vec::new();
    for (dr, dc) in NEIGHBOUR_OFFSETS {
        let start = (origin.0 + dr, origin.1 + dc);
        if !pixel_at(skeleton, start.0, start.1) || visited.contains(&start) {
            continue;
        }
        let branch = trace_branch(skeleton, origin, start, &mut visited);
        if branch.length >= MIN_BRANCH_LENGTH {
            branches.push(branch);
        }
    }

    if branches.len() < 2 {
        return None;
    }

    let mut smallest_angle = f64::MAX;
    for (i, a) in branches.iter().enumerate() {
        for b in branches.iter().skip(i + 1) {
            smallest_angle = smallest_angle.min(angle_between(a, b));
        }
    }

    let shortest = branches.iter().map(|b| b.length).min()?;
    let longest = branches.iter().map(|b| b.length).max()?;
    let ratio = shortest as f64 / longest as f64;

    (smallest_angle <= 180.0).then_some(JunctionEstimate {
        angle: smallest_angle.round(),
        ratio: (ratio * 100.0).round() / 100.0,
        total_length: branches.iter().map(|b| b.length).sum(),
    })
}

fn trace_branch(
    skeleton: &Mask,
    origin: (isize, isize),
    start: (isize, isize),
    visited: &mut Vec<(isize, isize)>,
) -> Branch {
    let mut current = start;
    let mut length = 1;
    visited.push(current);

    while length < TRACE_LIMIT {
        let next = NEIGHBOUR_OFFSETS
            .iter()
            .map(|&(dr, dc)| (current.0 + dr, current.1 + dc))
            .find(|&(r, c)| pixel_at(skeleton, r, c) && !visited.contains(&(r, c)));

        let Some(next) = next else { break };
        if is_junction(skeleton, next) {
            break;
        }
        visited.push(next);
        current = next;
        length += 1;
    }

    Branch {
        dx: (current.1 - origin.1) as f64,
        dy: (current.0 - origin.0) as f64,
        length,
    }
}

fn is_junction(skeleton: &Mask, position: (isize, isize)) -> bool {
    if !pixel_at(skeleton, position.0, position.1) {
        return false;
    }
    NEIGHBOUR_OFFSETS
        .iter()
        .filter(|&&(dr, dc)| pixel_at(skeleton, position.0 + dr, position.1 + dc))
        .count()
        >= 3
}

fn angle_between(a: &Branch, b: &Branch) -> f64 {
    let norm = a.dx.hypot(a.dy) * b.dx.hypot(b.dy);
    if norm <= f64::EPSILON {
        return f64::MAX;
    }
    let cosine = (a.dx.mul_add(b.dx, a.dy * b.dy) / norm).clamp(-1.0, 1.0);
    cosine.acos().to_degrees()
}
