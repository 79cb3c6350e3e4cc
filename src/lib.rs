//! Mosaic Engine - tile-based 2D games with a cached scene graph and
//! visibility-graph navigation

pub mod core;
pub mod game;
pub mod navigation;
pub mod renderer;
pub mod scene;
pub mod sprites;
pub mod terrain;
pub mod triggers;
pub mod ui;
