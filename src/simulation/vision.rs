//! Raycast vision - lets creatures see the grid in front of them.
//!
//! Each creature casts [`RESOLUTION`] rays across its field of view. A ray
//! walks forward in fixed steps and stops at the first non-empty cell, whose
//! marker colour becomes the ray's sample. The samples are laid out channel
//! major: 15 red values, then 15 green, then 15 blue.

use ndarray::{Array1, Array2};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::brain::INPUT_SIZE;
use super::geometric_utils::project;
use super::grid::{Cell, Grid};

/// Rays per creature.
pub const RESOLUTION: usize = 15;
/// Total field of view in radians (60 degrees).
pub const ANGLE_OF_VIEW: f32 = 1.04719;
/// Distance between consecutive samples along a ray.
pub const STEP: f32 = 0.9;

/// RGB marker for a cell as seen by a ray. Empty cells and misses are black.
pub fn marker_color(cell: Cell) -> [u8; 3] {
    match cell {
        Cell::Empty => [0, 0, 0],
        Cell::Wall => [100, 100, 100],
        Cell::Food => [255, 0, 0],
        Cell::Creature => [0, 0, 255],
    }
}

/// Where a creature is and how far it sees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    /// Horizontal position.
    pub x: f32,
    /// Vertical position.
    pub y: f32,
    /// Facing direction in radians.
    pub angle: f32,
    /// Maximum ray length.
    pub vision_distance: f32,
}

/// Vision result for one creature.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    /// Channel-major colour samples scaled to `[0, 1]`, always 45 long.
    pub vision: Array1<f32>,
    /// Every point sampled by any ray, in ray order.
    pub dots: Vec<(f32, f32)>,
}

/// Population-wide vision result.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchObservation {
    /// One 45-value row per creature.
    pub visions: Array2<f32>,
    /// Sample points per creature, in the same order as the rows.
    pub dots: Vec<Vec<(f32, f32)>>,
}

/// Direction of ray `k`; ray 7 points straight ahead.
#[inline]
pub fn ray_angle(facing: f32, k: usize) -> f32 {
    let angle_step = ANGLE_OF_VIEW / RESOLUTION as f32;
    facing - ANGLE_OF_VIEW / 2.0 + (k as f32 + 0.5) * angle_step
}

/// Casts one ray. Returns the marker hit (black for a miss) and pushes the
/// sampled points into `dots`.
fn cast_ray(grid: &Grid, pose: &Pose, theta: f32, dots: &mut Vec<(f32, f32)>) -> [u8; 3] {
    let own_cell = grid.index_of(pose.x, pose.y);

    let mut i = 1u32;
    loop {
        let d = i as f32 * STEP;
        if d > pose.vision_distance {
            return marker_color(Cell::Empty);
        }
        i += 1;

        let (x, y) = project(pose.x, pose.y, theta, d);

        let Some((cx, cy)) = grid.index_of(x, y) else {
            dots.push((x, y));
            return marker_color(Cell::Empty);
        };
        if own_cell == Some((cx, cy)) {
            continue;
        }
        dots.push((x, y));

        match grid.get(cx, cy) {
            Some(Cell::Empty) => {}
            Some(cell) => return marker_color(cell),
            None => return marker_color(Cell::Empty),
        }
    }
}

/// Computes what one creature sees.
pub fn observe(grid: &Grid, pose: &Pose) -> Observation {
    let mut vision = Array1::zeros(INPUT_SIZE);
    let mut dots = Vec::new();

    for k in 0..RESOLUTION {
        let color = cast_ray(grid, pose, ray_angle(pose.angle, k), &mut dots);
        for (channel, &value) in color.iter().enumerate() {
            vision[channel * RESOLUTION + k] = f32::from(value) / 255.0;
        }
    }

    Observation { vision, dots }
}

/// Computes what every creature sees in one batched pass.
///
/// Rows are independent, so they are evaluated in parallel; the result is the
/// same as calling [`observe`] for each pose in order.
pub fn observe_all(grid: &Grid, poses: &[Pose]) -> BatchObservation {
    let observations: Vec<Observation> = poses.par_iter().map(|pose| observe(grid, pose)).collect();

    let mut visions = Array2::zeros((poses.len(), INPUT_SIZE));
    let mut dots = Vec::with_capacity(poses.len());
    for (mut row, observation) in visions.rows_mut().into_iter().zip(observations) {
        row.assign(&observation.vision);
        dots.push(observation.dots);
    }

    BatchObservation { visions, dots }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn middle_ray_points_forward() {
        assert!((ray_angle(0.3, RESOLUTION / 2) - 0.3).abs() < 1e-6);
    }

    #[test]
    fn rays_are_symmetric() {
        let first = ray_angle(0.0, 0);
        let last = ray_angle(0.0, RESOLUTION - 1);
        assert!((first + last).abs() < 1e-6);
        assert!(last < ANGLE_OF_VIEW / 2.0);
    }
}
