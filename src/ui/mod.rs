//! HUD widgets: bitmap text, nine-slice bubbles, buttons and dialogue

pub mod bubble;
pub mod button;
pub mod dialogue;
pub mod font;
pub mod text;

pub use bubble::{Bubble, BubbleKeys, BUBBLE_PART_SIZE};
pub use button::Button;
pub use dialogue::{DialogueDisplay, DialogueLine};
pub use font::{CharInfo, Font, MonoFont};
pub use text::{layout, Glyph, Text};
