// src/rasterizer.rs

//! Shared z-buffered character rasterizer.
//!
//! Shapes do not draw anything themselves. Each one implements [`Shape`] and
//! produces a stream of screen-space [`Sample`]s; [`render`] feeds those
//! samples through a [`DepthGrid`], which keeps, for every cell, the sample
//! with the largest inverse depth (the one nearest to the viewer) and shades
//! it through the shape's [`Gradient`].

pub mod cube;
pub mod torus;


use crate::glyph::{Gradient, BLANK};
use log::trace;
use std::fmt;

pub use cube::Cube;
pub use torus::Torus;

/// A candidate point, already projected onto the character grid.
///
/// `column` and `row` are floor-truncated screen coordinates and may lie
/// outside the grid; [`DepthGrid::plot`] discards those.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub column: i64,
    pub row: i64,
    /// Inverse depth (`1/z`). Larger is nearer.
    pub ooz: f64,
    pub luminance: f64,
}

/// Something that can be rasterized into a character grid.
pub trait Shape {
    /// Rotation state threaded through successive frames.
    type Rotation: Copy;

    /// Grid dimensions as `(width, height)`.
    fn dimensions(&self) -> (usize, usize);

    fn gradient(&self) -> &Gradient;

    /// Emits every sample of the shape under `rotation` into `sink`.
    fn sample(&self, rotation: &Self::Rotation, sink: &mut dyn FnMut(Sample));

    /// The rotation to use for the next frame.
    fn advance(&self, rotation: Self::Rotation) -> Self::Rotation;
}

/// Character grid plus its parallel inverse-depth buffer.
#[derive(Debug, Clone)]
pub struct DepthGrid {
    width: usize,
    height: usize,
    cells: Vec<char>,
    depth: Vec<f64>,
}

impl DepthGrid {
    pub fn new(width: usize, height: usize) -> Self {
        let len = width * height;
        DepthGrid {
            width,
            height,
            cells: vec![BLANK; len],
            depth: vec![0.0; len],
        }
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Clears every cell to blank and every depth to zero.
    pub fn reset(&mut self) {
        self.cells.fill(BLANK);
        self.depth.fill(0.0);
    }

    /// Resets the grid, reallocating only when the dimensions change.
    pub fn reset_to(&mut self, width: usize, height: usize) {
        if self.width != width || self.height != height {
            *self = DepthGrid::new(width, height);
        } else {
            self.reset();
        }
    }

    /// Depth-tests `sample` and, if it is nearer than what the cell holds,
    /// writes its shaded character. Returns whether the cell was written.
    pub fn plot(&mut self, sample: Sample, gradient: &Gradient) -> bool {
        let Some(idx) = self.index_of(sample.column, sample.row) else {
            return false;
        };
        if !(sample.ooz > self.depth[idx]) {
            return false;
        }
        self.depth[idx] = sample.ooz;
        self.cells[idx] = gradient.shade(sample.luminance);
        true
    }

    pub fn get(&self, column: usize, row: usize) -> Option<char> {
        if column >= self.width || row >= self.height {
            return None;
        }
        Some(self.cells[row * self.width + column])
    }

    pub fn depth_at(&self, column: usize, row: usize) -> Option<f64> {
        if column >= self.width || row >= self.height {
            return None;
        }
        Some(self.depth[row * self.width + column])
    }

    fn index_of(&self, column: i64, row: i64) -> Option<usize> {
        if column < 0 || row < 0 {
            return None;
        }
        let (column, row) = (column as usize, row as usize);
        if column >= self.width || row >= self.height {
            return None;
        }
        Some(row * self.width + column)
    }

    /// Joins the rows into a [`Frame`].
    pub fn to_frame(&self) -> Frame {
        let mut text = String::with_capacity(self.height * (self.width + 1));
        for (i, row) in self.cells.chunks(self.width.max(1)).enumerate() {
            if i > 0 {
                text.push('\n');
            }
            text.extend(row.iter());
        }
        Frame {
            width: self.width,
            height: self.height,
            text,
        }
    }
}

/// One rendered frame: `height` rows of `width` characters joined by `'\n'`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Frame {
    width: usize,
    height: usize,
    text: String,
}

impl Frame {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn rows(&self) -> impl Iterator<Item = &str> {
        self.text.split('\n').take(self.height)
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Renders one frame of `shape` and returns it with the next rotation.
pub fn render<S: Shape>(shape: &S, rotation: S::Rotation) -> (Frame, S::Rotation) {
    let (width, height) = shape.dimensions();
    let mut grid = DepthGrid::new(width, height);
    render_into(&mut grid, shape, rotation)
}

/// Like [`render`], but reuses `grid` as scratch space.
pub fn render_into<S: Shape>(
    grid: &mut DepthGrid,
    shape: &S,
    rotation: S::Rotation,
) -> (Frame, S::Rotation) {
    let (width, height) = shape.dimensions();
    grid.reset_to(width, height);

    let gradient = shape.gradient();
    let mut emitted = 0usize;
    let mut written = 0usize;
    shape.sample(&rotation, &mut |sample| {
        emitted += 1;
        if grid.plot(sample, gradient) {
            written += 1;
        }
    });
    trace!(
        "rasterizer: {} samples emitted, {} cell writes ({}x{})",
        emitted,
        written,
        width,
        height
    );

    (grid.to_frame(), shape.advance(rotation))
}

/// True for finite values strictly greater than zero.
pub(crate) fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}
