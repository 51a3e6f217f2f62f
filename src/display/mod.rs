// src/display/mod.rs
//! Display abstraction: where rendered frames go and where key presses come
//! from.
//!
//! The host talks to a [`Display`] only through this trait, so the same event
//! loop drives a real terminal ([`drivers::ConsoleDisplay`]) or an in-memory
//! recorder ([`drivers::HeadlessDisplay`]).

pub mod drivers;

use crate::keys::KeySymbol;
use crate::rasterizer::Frame;
use crate::scene::FrameStyle;
use anyhow::Result;

/// Input reported by a display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Key(KeySymbol),
    /// The input stream ended (EOF on stdin).
    Closed,
}

pub trait Display {
    /// Replaces whatever is shown with `frame`, painted in `style`.
    fn present(&mut self, frame: &Frame, style: &FrameStyle) -> Result<()>;

    /// Returns pending input without blocking.
    fn poll_input(&mut self) -> Result<Vec<InputEvent>>;

    /// Restores the display to the state it was found in. Safe to call
    /// more than once.
    fn cleanup(&mut self) -> Result<()>;
}
