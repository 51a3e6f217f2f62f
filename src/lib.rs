// src/lib.rs

//! Rotating ASCII-art shapes for the terminal.
//!
//! The rendering core ([`rasterizer`]) turns a torus or a cube into a
//! character grid using an inverse-depth buffer and a luminance gradient.
//! The remaining modules form the terminal host that animates it.

pub mod color;
pub mod config;
pub mod display;
pub mod glyph;
pub mod host;
pub mod keys;
pub mod rasterizer;
pub mod rotation;
pub mod scene;
pub mod ticker;
