//! Pointer input, sampled once per model tick.

use glam::IVec2;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EventKind {
    #[default]
    None,
    Move,
    Down,
    Up,
}

/// What the pointer did since the last tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Event {
    pub kind: EventKind,
    pub screen_pos: IVec2,
    pub world_pos: IVec2,
}

/// Pointer state as reported by the host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RawInput {
    /// Cursor position in camera (screen) pixels.
    pub cursor: IVec2,
    /// Primary button held.
    pub pressed: bool,
}

/// Turns raw pointer states into edge-triggered events.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    pressed: bool,
    cursor: Option<IVec2>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pressed(&self) -> bool {
        self.pressed
    }

    /// Compare `raw` with the previous sample. Button changes win over movement.
    pub fn sample(&mut self, raw: RawInput, camera: IVec2) -> Event {
        let kind = match (self.pressed, raw.pressed) {
            (false, true) => EventKind::Down,
            (true, false) => EventKind::Up,
            _ if self.cursor.is_some_and(|c| c != raw.cursor) => EventKind::Move,
            _ => EventKind::None,
        };
        self.pressed = raw.pressed;
        self.cursor = Some(raw.cursor);
        Event {
            kind,
            screen_pos: raw.cursor,
            world_pos: raw.cursor + camera,
        }
    }
}
