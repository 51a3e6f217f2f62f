//! Headless display that records presented frames and replays scripted
//! input.

use crate::display::{Display, InputEvent};
use crate::rasterizer::Frame;
use crate::scene::FrameStyle;
use anyhow::Result;
use log::{info, trace};
use std::collections::VecDeque;

#[derive(Debug, Default)]
pub struct HeadlessDisplay {
    presented: Vec<(Frame, FrameStyle)>,
    /// Input batches; each `poll_input` call pops one.
    scripted_input: VecDeque<Vec<InputEvent>>,
    cleanups: usize,
}

impl HeadlessDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a batch of input for a later `poll_input` call.
    pub fn push_input(&mut self, batch: Vec<InputEvent>) {
        self.scripted_input.push_back(batch);
    }

    pub fn presented(&self) -> &[(Frame, FrameStyle)] {
        &self.presented
    }

    pub fn last_frame(&self) -> Option<&Frame> {
        self.presented.last().map(|(frame, _)| frame)
    }

    pub fn cleanups(&self) -> usize {
        self.cleanups
    }
}

impl Display for HeadlessDisplay {
    fn present(&mut self, frame: &Frame, style: &FrameStyle) -> Result<()> {
        trace!(
            "HeadlessDisplay: Present {}x{} frame",
            frame.width(),
            frame.height()
        );
        self.presented.push((frame.clone(), *style));
        Ok(())
    }

    fn poll_input(&mut self) -> Result<Vec<InputEvent>> {
        Ok(self.scripted_input.pop_front().unwrap_or_default())
    }

    fn cleanup(&mut self) -> Result<()> {
        info!("HeadlessDisplay: cleanup after {} frames", self.presented.len());
        self.cleanups += 1;
        Ok(())
    }
}
