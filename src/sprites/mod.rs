//! Sprite sheets, animation playback and sprite draw parts.

pub mod animation;
pub mod sheet;
pub mod sprite;

pub use animation::AnimPlayer;
pub use sheet::{basic_frame_infos, one_shot_frame_infos, FrameInfo, Playback, Sheet};
pub use sprite::{Sprite, SpritePart};
