// src/rasterizer/torus.rs

//! Surface rasterizer for a rotating torus ("donut").
//!
//! The torus is swept by two angles: `theta` walks around the tube's
//! cross-section circle and `phi` spins that circle around the torus axis.
//! Every `(theta, phi)` pair becomes one projected [`Sample`].

use super::{is_positive, Sample, Shape};
use crate::config::TorusConfig;
use crate::glyph::Gradient;
use crate::rotation::TorusRotation;
use anyhow::{ensure, Context, Result};
use std::f64::consts::TAU;

#[derive(Debug, Clone)]
pub struct Torus {
    width: usize,
    height: usize,
    scale_x: f64,
    scale_y: f64,
    theta_step: f64,
    phi_step: f64,
    minor_radius: f64,
    major_radius: f64,
    camera_distance: f64,
    rotation_step: TorusRotation,
    gradient: Gradient,
}

impl Torus {
    pub fn new(config: &TorusConfig) -> Result<Self> {
        ensure!(
            config.width > 0 && config.height > 0,
            "torus grid must be non-empty, got {}x{}",
            config.width,
            config.height
        );
        ensure!(
            config.width.checked_mul(config.height).is_some(),
            "torus grid {}x{} is too large",
            config.width,
            config.height
        );
        ensure!(
            config.scale_x.is_finite() && config.scale_y.is_finite(),
            "torus scales must be finite (scale_x={}, scale_y={})",
            config.scale_x,
            config.scale_y
        );
        ensure!(
            config.minor_radius.is_finite() && config.major_radius.is_finite(),
            "torus radii must be finite (minor={}, major={})",
            config.minor_radius,
            config.major_radius
        );
        ensure!(
            is_positive(config.theta_step) && is_positive(config.phi_step),
            "torus angular steps must be finite and positive (theta_step={}, phi_step={})",
            config.theta_step,
            config.phi_step
        );
        ensure!(
            is_positive(config.camera_distance),
            "torus camera distance must be finite and positive, got {}",
            config.camera_distance
        );
        let gradient = Gradient::new(&config.chars).context("invalid torus gradient")?;

        Ok(Torus {
            width: config.width,
            height: config.height,
            scale_x: config.scale_x,
            scale_y: config.scale_y,
            theta_step: config.theta_step,
            phi_step: config.phi_step,
            minor_radius: config.minor_radius,
            major_radius: config.major_radius,
            camera_distance: config.camera_distance,
            rotation_step: config.rotation_step,
            gradient,
        })
    }
}

impl Shape for Torus {
    type Rotation = TorusRotation;

    fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    fn gradient(&self) -> &Gradient {
        &self.gradient
    }

    fn sample(&self, rotation: &TorusRotation, sink: &mut dyn FnMut(Sample)) {
        let (sin_a, cos_a) = rotation.a.sin_cos();
        let (sin_b, cos_b) = rotation.b.sin_cos();
        let half_w = self.width as f64 / 2.0;
        let half_h = self.height as f64 / 2.0;

        for theta in sweep(self.theta_step) {
            let (sin_theta, cos_theta) = theta.sin_cos();
            let circle_x = self.major_radius + self.minor_radius * cos_theta;
            let circle_y = self.minor_radius * sin_theta;

            for phi in sweep(self.phi_step) {
                let (sin_phi, cos_phi) = phi.sin_cos();

                let x = circle_x * (cos_b * cos_phi + sin_a * sin_b * sin_phi)
                    - circle_y * cos_a * sin_b;
                let y = circle_x * (sin_b * cos_phi - sin_a * cos_b * sin_phi)
                    + circle_y * cos_a * cos_b;
                let z = cos_a * circle_x * sin_phi + circle_y * sin_a + self.camera_distance;
                // Skip samples at or behind the eye.
                if z <= 0.0 {
                    continue;
                }
                let ooz = 1.0 / z;

                let luminance = cos_phi * cos_theta * sin_b
                    - cos_a * cos_theta * sin_phi
                    - sin_a * sin_theta
                    + cos_b * (cos_a * sin_theta - cos_theta * sin_a * sin_phi);

                sink(Sample {
                    column: (half_w + self.scale_x * ooz * x).floor() as i64,
                    row: (half_h - self.scale_y * ooz * y).floor() as i64,
                    ooz,
                    luminance,
                });
            }
        }
    }

    fn advance(&self, rotation: TorusRotation) -> TorusRotation {
        rotation.advanced_by(self.rotation_step)
    }
}

/// Angles `0, step, 2*step, ...` strictly below a full turn.
///
/// Each angle is computed from its index so that small steps do not
/// accumulate rounding error over the sweep.
pub(crate) fn sweep(step: f64) -> impl Iterator<Item = f64> {
    (0u64..)
        .map(move |i| i as f64 * step)
        .take_while(|angle| *angle < TAU)
}
