//! Terrain: tile and block layers, doodads, and the navigation graphs
//! derived from them.

pub mod doodad;
pub mod graph;
pub mod level;
pub mod obstacles;
pub mod tilemap;

pub use doodad::{Doodad, DoodadData};
pub use graph::{Edge, Graph};
pub use level::{Level, LevelData};
pub use obstacles::{obstacles_and_paths, Fattening, LevelGraphs, ObstacleMap};
pub use tilemap::{BlockLayer, Terrain, TileInfo, Tileset, TILE_Z};
