pub mod config;
pub mod error;
pub mod types;

pub use config::{EngineConfig, Viewport};
pub use error::{EngineError, Result};
pub use types::{Frame, ImageKey, Rect};
