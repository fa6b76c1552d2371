//! Connected components, skeletonization and junction detection

use super::Mask;
use bitvec::prelude::{BitVec, bitvec};
use std::collections::VecDeque;

/// Clockwise 8-neighbourhood starting north: N, NE, E, SE, S, SW, W, NW
pub const NEIGHBOUR_OFFSETS: [(isize, isize); 8] = [
    (-1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
];

/// Value at a signed position, treating everything outside as background
pub fn pixel_at(mask: &Mask, row: isize, col: isize) -> bool {
    if row < 0 || col < 0 {
        return false;
    }
    mask.get((row as usize, col as usize))
        .copied()
        .unwrap_or(false)
}

/// The eight neighbours of a pixel in [`NEIGHBOUR_OFFSETS`] order
pub fn neighbours(mask: &Mask, row: usize, col: usize) -> [bool; 8] {
    let mut values = [false; 8];
    for (value, (dr, dc)) in values.iter_mut().zip(NEIGHBOUR_OFFSETS) {
        *value = pixel_at(mask, row as isize + dr, col as isize + dc);
    }
    values
}

/// Number of 8-connected foreground components
pub fn count_components(mask: &Mask) -> usize {
    let (rows, cols) = mask.dim();
    let mut visited: BitVec = bitvec![0; rows * cols];
    let mut queue = VecDeque::new();
    let mut components = 0;

    for ((row, col), &foreground) in mask.indexed_iter() {
        let index = row * cols + col;
        if !foreground || visited.get(index).is_some_and(|bit| *bit) {
            continue;
        }

        components += 1;
        visited.set(index, true);
        queue.push_back((row, col));

        while let Some((r, c)) = queue.pop_front() {
            for (dr, dc) in NEIGHBOUR_OFFSETS {
                let (nr, nc) = (r as isize + dr, c as isize + dc);
                if !pixel_at(mask, nr, nc) {
                    continue;
                }
                let neighbour = nr as usize * cols + nc as usize;
                if visited.get(neighbour).is_some_and(|bit| !*bit) {
                    visited.set(neighbour, true);
                    queue.push_back((nr as usize, nc as usize));
                }
            }
        }
    }

    components
}

/// Thin the foreground to one-pixel-wide curves (Zhang-Suen)
///
/// Alternates the two Zhang-Suen sub-iterations until neither removes a
/// pixel. Connectivity of every component is preserved.
pub fn skeletonize(mask: &Mask) -> Mask {
    let mut skeleton = mask.clone();
    loop {
        let first = thinning_pass(&mut skeleton, true);
        let second = thinning_pass(&mut skeleton, false);
        if !first && !second {
            return skeleton;
        }
    }
}

// Returns whether any pixel was removed
fn thinning_pass(skeleton: &mut Mask, first_subiteration: bool) -> bool {
    let mut removable = Vec::new();

    for ((row, col), &foreground) in skeleton.indexed_iter() {
        if !foreground {
            continue;
        }
        let [p2, p3, p4, p5, p6, p7, p8, p9] = neighbours(skeleton, row, col);
        let ring = [p2, p3, p4, p5, p6, p7, p8, p9, p2];

        let occupied = ring.iter().take(8).filter(|&&v| v).count();
        let transitions = ring.windows(2).filter(|pair| matches!(pair, [false, true])).count();

        let directional = if first_subiteration {
            !(p2 && p4 && p6) && !(p4 && p6 && p8)
        } else {
            !(p2 && p4 && p8) && !(p2 && p6 && p8)
        };

        if (2..=6).contains(&occupied) && transitions == 1 && directional {
            removable.push((row, col));
        }
    }

    for &index in &removable {
        if let Some(value) = skeleton.get_mut(index) {
            *value = false;
        }
    }
    !removable.is_empty()
}

/// Skeleton pixels with three or more skeleton neighbours
pub fn find_junctions(skeleton: &Mask) -> Vec<(usize, usize)> {
    skeleton
        .indexed_iter()
        .filter(|&(_, &on)| on)
        .filter(|&((row, col), _)| {
            neighbours(skeleton, row, col)
                .iter()
                .filter(|&&v| v)
                .count()
                >= 3
        })
        .map(|(index, _)| index)
        .collect()
}
