// src/rasterizer/cube.rs

//! Polyhedron rasterizer for a rotating cube.
//!
//! This is a dense point sampler, not a polygon rasterizer: every face is
//! covered by a regular lattice of points and overlapping faces are settled
//! by the depth test alone. There is no culling or winding order.

use super::{is_positive, Sample, Shape};
use crate::config::CubeConfig;
use crate::glyph::Gradient;
use crate::rotation::{rotate_x, rotate_y, rotate_z, CubeRotation};
use anyhow::{ensure, Context, Result};

#[derive(Debug, Clone)]
pub struct Cube {
    width: usize,
    height: usize,
    half_extent: f64,
    sample_step: f64,
    camera_distance: f64,
    vertical_aspect: f64,
    rotation_step: CubeRotation,
    gradient: Gradient,
}

impl Cube {
    pub fn new(config: &CubeConfig) -> Result<Self> {
        ensure!(
            config.width > 0 && config.height > 0,
            "cube grid must be non-empty, got {}x{}",
            config.width,
            config.height
        );
        ensure!(
            config.width.checked_mul(config.height).is_some(),
            "cube grid {}x{} is too large",
            config.width,
            config.height
        );
        ensure!(
            config.vertical_aspect.is_finite(),
            "cube vertical aspect must be finite, got {}",
            config.vertical_aspect
        );
        ensure!(
            is_positive(config.half_extent),
            "cube half extent must be finite and positive, got {}",
            config.half_extent
        );
        ensure!(
            is_positive(config.sample_step),
            "cube sample step must be finite and positive, got {}",
            config.sample_step
        );
        ensure!(
            is_positive(config.camera_distance),
            "cube camera distance must be finite and positive, got {}",
            config.camera_distance
        );
        let gradient = Gradient::new(&config.chars).context("invalid cube gradient")?;

        Ok(Cube {
            width: config.width,
            height: config.height,
            half_extent: config.half_extent,
            sample_step: config.sample_step,
            camera_distance: config.camera_distance,
            vertical_aspect: config.vertical_aspect,
            rotation_step: config.rotation_step,
            gradient,
        })
    }

    /// Face coordinates `-s, -s + step, ...` up to and including `s` when
    /// the step divides the edge evenly.
    fn lattice(&self) -> impl Iterator<Item = f64> + Clone {
        let s = self.half_extent;
        let step = self.sample_step;
        let count = (2.0 * s / step).floor() as u64;
        (0..=count).map(move |i| -s + i as f64 * step)
    }

    /// Rotates, projects and shades a single model-space point.
    ///
    /// Returns `None` for points at or behind the camera.
    pub fn project(&self, point: (f64, f64, f64), rotation: &CubeRotation) -> Option<Sample> {
        let rotated = rotate_z(
            rotate_y(rotate_x(point, rotation.rx), rotation.ry),
            rotation.rz,
        );
        let (x, y, z) = rotated;

        let z_proj = z + self.camera_distance;
        if z_proj <= 0.0 {
            return None;
        }

        let scale = self.camera_distance / z_proj;
        let half_w = self.width as f64 / 2.0;
        let half_h = self.height as f64 / 2.0;
        let s = self.half_extent;

        Some(Sample {
            column: (half_w + x * scale).floor() as i64,
            row: (half_h - y * scale * self.vertical_aspect).floor() as i64,
            ooz: 1.0 / z_proj,
            luminance: ((z + 2.0 * s) / (4.0 * s)).clamp(0.0, 1.0),
        })
    }
}

impl Shape for Cube {
    type Rotation = CubeRotation;

    fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    fn gradient(&self) -> &Gradient {
        &self.gradient
    }

    fn sample(&self, rotation: &CubeRotation, sink: &mut dyn FnMut(Sample)) {
        let s = self.half_extent;
        let lattice = self.lattice();

        for u in lattice.clone() {
            for v in lattice.clone() {
                let faces = [
                    (u, v, s),  // front
                    (u, v, -s), // back
                    (s, u, v),  // right
                    (-s, u, v), // left
                    (u, s, v),  // top
                    (u, -s, v), // bottom
                ];
                for point in faces {
                    if let Some(sample) = self.project(point, rotation) {
                        sink(sample);
                    }
                }
            }
        }
    }

    fn advance(&self, rotation: CubeRotation) -> CubeRotation {
        rotation.advanced_by(self.rotation_step)
    }
}
