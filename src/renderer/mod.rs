//! Rendering seam: atlas layout, draw batches and frame statistics.
//!
//! Pixel decoding and GPU submission live behind [`RenderBackend`]; this
//! module only produces the data a backend needs.

pub mod atlas;
pub mod batch;
pub mod metrics;

pub use atlas::{AtlasLayout, AtlasRegion};
pub use batch::{DrawCommand, RecordingBackend, RenderBackend};
pub use metrics::FrameMetrics;
