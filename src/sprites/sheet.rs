//! Sprite sheets: frames laid out on a grid inside one atlas image.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::core::types::{ImageKey, Rect};

/// How to play one frame of an animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameInfo {
    /// Model ticks to hold the frame. Negative holds forever; 0 behaves as 1.
    pub duration: i32,
    /// Frame to go to afterwards. An index past the last frame ends playback.
    pub next: usize,
    /// Subtract from the sprite position to get the top-left of the frame.
    #[serde(default)]
    pub offset: IVec2,
}

/// `n` frames with the same duration and offset, each followed by the next,
/// the last wrapping to the first.
pub fn basic_frame_infos(n: usize, duration: i32, offset: IVec2) -> Vec<FrameInfo> {
    (0..n)
        .map(|i| FrameInfo {
            duration,
            next: (i + 1) % n,
            offset,
        })
        .collect()
}

/// Like [`basic_frame_infos`] but the last frame ends playback.
pub fn one_shot_frame_infos(n: usize, duration: i32, offset: IVec2) -> Vec<FrameInfo> {
    (0..n)
        .map(|i| FrameInfo {
            duration,
            next: i + 1,
            offset,
        })
        .collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Playback {
    /// Past the last frame nothing is drawn.
    OneShot,
    /// Frame numbers wrap around.
    #[default]
    Loop,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sheet {
    pub key: ImageKey,
    /// Frames per row; 0 puts every frame on one row.
    #[serde(default)]
    pub columns: usize,
    pub frame_size: IVec2,
    pub frames: Vec<FrameInfo>,
    #[serde(default)]
    pub playback: Playback,
}

impl Sheet {
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn frame_info(&self, f: usize) -> Option<&FrameInfo> {
        self.frames.get(f)
    }

    /// Source rectangle of frame `f`, relative to the sheet image.
    ///
    /// One-shot sheets give an empty rectangle past the last frame; looping
    /// sheets wrap.
    pub fn frame_src(&self, f: usize) -> Rect {
        let n = self.frames.len();
        if n == 0 {
            return Rect::ZERO;
        }
        let f = match self.playback {
            Playback::OneShot if f >= n => return Rect::ZERO,
            Playback::OneShot => f,
            Playback::Loop => f % n,
        };
        let cell = if self.columns == 0 {
            IVec2::new(f as i32, 0)
        } else {
            IVec2::new((f % self.columns) as i32, (f / self.columns) as i32)
        };
        Rect::with_size(cell * self.frame_size, self.frame_size)
    }

    /// Destination of frame `f` relative to the sprite position.
    pub fn frame_dst(&self, f: usize) -> Rect {
        let offset = self.frame_info(f).map_or(IVec2::ZERO, |i| i.offset);
        Rect::with_size(-offset, self.frame_size)
    }
}
