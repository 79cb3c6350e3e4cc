//! Game loop: input, units and the engine context that ties the rest together.

pub mod engine;
pub mod input;
pub mod unit;

pub use engine::{Engine, GameSetup};
pub use input::{Event, EventKind, InputState, RawInput};
pub use unit::{Unit, UnitContext, Walker};
