//! Frame statistics for the engine loop.

use std::collections::VecDeque;
use std::time::Instant;

/// Frames kept for the rolling averages.
const WINDOW: usize = 120;

/// Counts frames and ticks, and keeps recent frame times in milliseconds.
#[derive(Debug)]
pub struct FrameMetrics {
    recent_ms: VecDeque<f32>,
    frame_start: Instant,
    pub frames: u64,
    pub ticks: u64,
    /// Commands in the last batch.
    pub parts_drawn: usize,
}

impl Default for FrameMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameMetrics {
    pub fn new() -> Self {
        Self {
            recent_ms: VecDeque::with_capacity(WINDOW + 1),
            frame_start: Instant::now(),
            frames: 0,
            ticks: 0,
            parts_drawn: 0,
        }
    }

    pub fn begin_frame(&mut self) {
        self.frame_start = Instant::now();
    }

    /// Closes the frame opened by `begin_frame`.
    pub fn end_frame(&mut self, parts_drawn: usize) {
        self.frames += 1;
        self.parts_drawn = parts_drawn;
        self.recent_ms
            .push_back(self.frame_start.elapsed().as_secs_f32() * 1000.0);
        if self.recent_ms.len() > WINDOW {
            self.recent_ms.pop_front();
        }
    }

    pub fn record_tick(&mut self) {
        self.ticks += 1;
    }

    pub fn avg_frame_time_ms(&self) -> f32 {
        if self.recent_ms.is_empty() {
            return 0.0;
        }
        self.recent_ms.iter().sum::<f32>() / self.recent_ms.len() as f32
    }

    pub fn max_frame_time_ms(&self) -> f32 {
        self.recent_ms.iter().copied().fold(0.0, f32::max)
    }
}
