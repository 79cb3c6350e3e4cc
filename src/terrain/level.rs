//! Level data as loaded from JSON, and the graph dump format.

use std::path::Path;
use std::rc::Rc;

use ahash::AHashMap;
use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::core::error::{EngineError, Result};
use crate::core::types::Rect;
use crate::sprites::sheet::Sheet;
use crate::terrain::doodad::{Doodad, DoodadData};
use crate::terrain::obstacles::{obstacles_and_paths, Fattening, LevelGraphs, ObstacleMap};
use crate::terrain::tilemap::{BlockLayer, Terrain, TileInfo, Tileset};

/// Everything a level file describes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelData {
    pub tileset: Tileset,
    pub tile_size: i32,
    /// In tiles.
    pub size: IVec2,
    /// Tile index per tile, row-major.
    pub tiles: Vec<u8>,
    pub tile_infos: Vec<TileInfo>,
    #[serde(default)]
    pub blocks: Option<BlockLayer>,
    #[serde(default)]
    pub sheets: AHashMap<String, Sheet>,
    #[serde(default)]
    pub doodads: Vec<DoodadData>,
    /// Previously generated graphs; generation is skipped when present.
    #[serde(default)]
    pub graphs: Option<LevelGraphs>,
}

/// A level ready for play.
#[derive(Debug, Clone)]
pub struct Level {
    pub terrain: Terrain,
    pub sheets: AHashMap<String, Rc<Sheet>>,
    pub doodads: Vec<Doodad>,
    pub graphs: Option<LevelGraphs>,
}

impl LevelData {
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Validate and assemble the level.
    pub fn build(self) -> Result<Level> {
        let terrain = Terrain::new(
            self.tileset,
            self.tile_size,
            self.size,
            self.tiles,
            self.tile_infos,
            self.blocks,
        )?;
        let sheets: AHashMap<String, Rc<Sheet>> = self
            .sheets
            .into_iter()
            .map(|(name, sheet)| (name, Rc::new(sheet)))
            .collect();
        let doodads = self
            .doodads
            .into_iter()
            .map(|d| {
                let sheet = sheets.get(&d.sheet).cloned().ok_or_else(|| {
                    EngineError::InvalidLevel(format!("doodad uses unknown sheet {:?}", d.sheet))
                })?;
                Ok(Doodad {
                    pos: d.pos,
                    sheet,
                    frame: d.frame,
                    base: d.base,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Level {
            terrain,
            sheets,
            doodads,
            graphs: self.graphs,
        })
    }
}

impl Level {
    /// Precomputed graphs if the level carried them, otherwise generated
    /// for a mover with the given footprint.
    pub fn graphs(&self, footprint: Rect, max_span: IVec2) -> LevelGraphs {
        if let Some(g) = &self.graphs {
            tracing::debug!("using precomputed level graphs");
            return g.clone();
        }
        let boxes: Vec<Rect> = self.doodads.iter().map(Doodad::base_box).collect();
        let map = ObstacleMap {
            blocked: |x: i32, y: i32| self.terrain.is_blocked(x, y),
            size: self.terrain.size(),
            tile_size: self.terrain.tile_size(),
            boxes: &boxes,
        };
        obstacles_and_paths(&map, Fattening::from_footprint(footprint), max_span)
    }
}

impl LevelGraphs {
    /// Write the graphs as JSON.
    pub fn dump(&self, path: &Path) -> Result<()> {
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text)?;
        tracing::info!(path = %path.display(), "dumped level graphs");
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}
