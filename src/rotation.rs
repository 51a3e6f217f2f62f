// src/rotation.rs

//! Rotation state for the animated shapes.
//!
//! Rotations are plain `Copy` values. A render step reads the current value
//! and hands back the next one; nothing here is mutated behind the caller's
//! back. Angles are in radians and are never wrapped into `[0, 2π)`.

use serde::{Deserialize, Serialize};

/// Accumulated torus rotation: `a` about the X axis, `b` about the Z axis.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TorusRotation {
    pub a: f64,
    pub b: f64,
}

impl TorusRotation {
    pub const fn new(a: f64, b: f64) -> Self {
        TorusRotation { a, b }
    }

    /// Returns this rotation advanced by `step`.
    pub fn advanced_by(self, step: TorusRotation) -> Self {
        TorusRotation {
            a: self.a + step.a,
            b: self.b + step.b,
        }
    }
}

/// Accumulated cube rotation about the X, Y and Z axes.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CubeRotation {
    pub rx: f64,
    pub ry: f64,
    pub rz: f64,
}

impl CubeRotation {
    pub const fn new(rx: f64, ry: f64, rz: f64) -> Self {
        CubeRotation { rx, ry, rz }
    }

    pub fn advanced_by(self, step: CubeRotation) -> Self {
        CubeRotation {
            rx: self.rx + step.rx,
            ry: self.ry + step.ry,
            rz: self.rz + step.rz,
        }
    }
}

/// Rotates `(x, y, z)` about the X axis.
pub fn rotate_x((x, y, z): (f64, f64, f64), angle: f64) -> (f64, f64, f64) {
    let (sin, cos) = angle.sin_cos();
    (x, y * cos - z * sin, y * sin + z * cos)
}

/// Rotates `(x, y, z)` about the Y axis.
pub fn rotate_y((x, y, z): (f64, f64, f64), angle: f64) -> (f64, f64, f64) {
    let (sin, cos) = angle.sin_cos();
    (x * cos + z * sin, y, -x * sin + z * cos)
}

/// Rotates `(x, y, z)` about the Z axis.
pub fn rotate_z((x, y, z): (f64, f64, f64), angle: f64) -> (f64, f64, f64) {
    let (sin, cos) = angle.sin_cos();
    (x * cos - y * sin, x * sin + y * cos, z)
}
