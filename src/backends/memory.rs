// SPDX-License-Identifier: GPL-3.0-only

//! In-memory frame source

use super::types::{BackendResult, RgbdFrame};
use super::FrameSource;
use std::collections::VecDeque;

/// Yields a fixed list of frames in order, then reports exhaustion
#[derive(Debug, Default)]
pub struct MemorySource {
    frames: VecDeque<RgbdFrame>,
}

impl MemorySource {
    pub fn new(frames: impl IntoIterator<Item = RgbdFrame>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
        }
    }

    /// Frames not yet handed out
    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl FrameSource for MemorySource {
    fn next_frame(&mut self) -> BackendResult<Option<RgbdFrame>> {
        Ok(self.frames.pop_front())
    }
}
