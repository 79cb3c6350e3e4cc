//! Batched draw commands and the backend seam.

use crate::core::error::Result;
use crate::core::types::{ImageKey, Rect};

/// One rectangle copy from the shared atlas to the screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawCommand {
    /// Image the source rectangle was taken from (for diagnostics).
    pub key: ImageKey,
    /// Source rectangle in atlas space.
    pub src: Rect,
    /// Destination rectangle in screen space.
    pub dst: Rect,
}

/// Something that can draw a frame's batch against the shared atlas.
///
/// The engine calls [`RenderBackend::draw_batch`] exactly once per rendered
/// frame, with commands in back-to-front order.
pub trait RenderBackend {
    fn draw_batch(&mut self, commands: &[DrawCommand]) -> Result<()>;
}

/// Backend that keeps the last batch in memory. Used for headless runs.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    last: Vec<DrawCommand>,
    batches: u64,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands of the most recent batch.
    pub fn last_batch(&self) -> &[DrawCommand] {
        &self.last
    }

    /// Number of batches drawn so far.
    pub fn batches(&self) -> u64 {
        self.batches
    }
}

impl RenderBackend for RecordingBackend {
    fn draw_batch(&mut self, commands: &[DrawCommand]) -> Result<()> {
        self.last.clear();
        self.last.extend_from_slice(commands);
        self.batches += 1;
        Ok(())
    }
}
