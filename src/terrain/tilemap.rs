//! Tile and block layers of a level, and the parts that draw them.

use std::rc::Rc;

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::core::error::{EngineError, Result};
use crate::core::types::{ImageKey, Rect};
use crate::scene::part::{PartRef, StaticPart};
use crate::scene::view::{ViewId, ViewTree};

/// Z of the flat tile layer, below everything standing on the map.
pub const TILE_Z: i32 = -100_000;

/// Properties of one kind of tile or block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileInfo {
    pub name: String,
    /// Movers cannot walk through it.
    #[serde(default)]
    pub block: bool,
}

static OUT_OF_BOUNDS: TileInfo = TileInfo {
    name: String::new(),
    block: true,
};

/// Where a layer's images come from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tileset {
    pub key: ImageKey,
    /// Images per row in the tileset image.
    pub columns: usize,
}

/// The raised block layer: optional obstacles standing on tiles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockLayer {
    pub tileset: Tileset,
    /// Block index per tile, row-major; `None` for no block.
    pub blocks: Vec<Option<u8>>,
    pub infos: Vec<TileInfo>,
    /// Pixels a block image extends above its tile.
    #[serde(default)]
    pub height: i32,
}

/// The base layer of the world: a grid of tiles, each with a [`TileInfo`].
#[derive(Debug, Clone)]
pub struct Terrain {
    tileset: Tileset,
    tile_size: i32,
    /// In tiles.
    size: IVec2,
    /// Tile index at (x, y) is `tiles[x + y * size.x]`.
    tiles: Vec<u8>,
    infos: Vec<TileInfo>,
    blocks: Option<BlockLayer>,
}

impl Terrain {
    /// Build a terrain, checking every index refers to a known tile.
    pub fn new(
        tileset: Tileset,
        tile_size: i32,
        size: IVec2,
        tiles: Vec<u8>,
        infos: Vec<TileInfo>,
        blocks: Option<BlockLayer>,
    ) -> Result<Self> {
        if tile_size <= 0 {
            return Err(EngineError::InvalidLevel(format!(
                "tile size must be positive, got {tile_size}"
            )));
        }
        if size.x < 0 || size.y < 0 {
            return Err(EngineError::InvalidLevel(format!("negative map size {size}")));
        }
        let area = (size.x * size.y) as usize;
        if tiles.len() != area {
            return Err(EngineError::InvalidLevel(format!(
                "map is {}x{} but has {} tiles",
                size.x,
                size.y,
                tiles.len()
            )));
        }
        if let Some(&t) = tiles.iter().find(|&&t| t as usize >= infos.len()) {
            return Err(EngineError::InvalidLevel(format!(
                "tile index {t} has no tile info"
            )));
        }
        if let Some(layer) = &blocks {
            if layer.blocks.len() != area {
                return Err(EngineError::InvalidLevel(format!(
                    "map has {area} tiles but {} block entries",
                    layer.blocks.len()
                )));
            }
            if let Some(b) = layer.blocks.iter().flatten().find(|&&b| b as usize >= layer.infos.len()) {
                return Err(EngineError::InvalidLevel(format!(
                    "block index {b} has no block info"
                )));
            }
        }
        Ok(Self {
            tileset,
            tile_size,
            size,
            tiles,
            infos,
            blocks,
        })
    }

    pub fn tileset(&self) -> &Tileset {
        &self.tileset
    }

    pub fn block_layer(&self) -> Option<&BlockLayer> {
        self.blocks.as_ref()
    }

    pub fn tile_size(&self) -> i32 {
        self.tile_size
    }

    /// Size in tiles.
    pub fn size(&self) -> IVec2 {
        self.size
    }

    /// Size in pixels.
    pub fn world_size(&self) -> IVec2 {
        self.size * self.tile_size
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || x >= self.size.x || y < 0 || y >= self.size.y {
            return None;
        }
        Some((x + y * self.size.x) as usize)
    }

    /// Info of the tile at tile coordinates. Outside the map everything blocks.
    pub fn tile(&self, x: i32, y: i32) -> &TileInfo {
        match self.index(x, y) {
            Some(i) => &self.infos[self.tiles[i] as usize],
            None => &OUT_OF_BOUNDS,
        }
    }

    /// Info of the block at tile coordinates, if there is one.
    pub fn block(&self, x: i32, y: i32) -> Option<&TileInfo> {
        let layer = self.blocks.as_ref()?;
        let b = layer.blocks[self.index(x, y)?]?;
        Some(&layer.infos[b as usize])
    }

    /// Info of the tile under a world pixel.
    pub fn query(&self, world: IVec2) -> &TileInfo {
        let t = self.tile_at(world);
        self.tile(t.x, t.y)
    }

    /// Tile coordinates of a world pixel.
    pub fn tile_at(&self, world: IVec2) -> IVec2 {
        IVec2::new(
            world.x.div_euclid(self.tile_size),
            world.y.div_euclid(self.tile_size),
        )
    }

    /// True if the tile blocks, a block stands on it, or it lies outside the map.
    pub fn is_blocked(&self, x: i32, y: i32) -> bool {
        self.tile(x, y).block || self.block(x, y).is_some_and(|b| b.block)
    }

    fn cell_src(tileset: &Tileset, index: u8, cell: IVec2) -> Rect {
        let columns = tileset.columns.max(1);
        let i = index as usize;
        let at = IVec2::new((i % columns) as i32, (i / columns) as i32) * cell;
        Rect::with_size(at, cell)
    }

    /// One loose part per tile, all in a single view at the bottom of the Z order.
    pub fn tile_parts(&self, views: &mut ViewTree, parent: ViewId) -> Vec<PartRef> {
        let view = views.insert_with_bounds(Some(parent), Rect::with_size(IVec2::ZERO, self.world_size()));
        views.set_z(view, TILE_Z);
        let cell = IVec2::splat(self.tile_size);
        let mut parts: Vec<PartRef> = Vec::with_capacity(self.tiles.len());
        for y in 0..self.size.y {
            for x in 0..self.size.x {
                let t = self.tiles[(x + y * self.size.x) as usize];
                parts.push(Rc::new(StaticPart {
                    view,
                    key: self.tileset.key.clone(),
                    src: Self::cell_src(&self.tileset, t, cell),
                    dst: Rect::with_size(IVec2::new(x, y) * cell, cell),
                    fixed: false,
                }));
            }
        }
        parts
    }

    /// One part per block, raised by the block height, with Z at its bottom edge.
    pub fn block_parts(&self, views: &mut ViewTree, parent: ViewId) -> Vec<PartRef> {
        let Some(layer) = &self.blocks else {
            return Vec::new();
        };
        let ts = self.tile_size;
        let cell = IVec2::new(ts, ts + layer.height);
        let mut parts: Vec<PartRef> = Vec::new();
        for y in 0..self.size.y {
            for x in 0..self.size.x {
                let Some(b) = layer.blocks[(x + y * self.size.x) as usize] else {
                    continue;
                };
                let ul = IVec2::new(x * ts, y * ts - layer.height);
                let view = views.insert_with_bounds(Some(parent), Rect::with_size(ul, cell));
                views.set_z(view, (y + 1) * ts);
                parts.push(Rc::new(StaticPart {
                    view,
                    key: layer.tileset.key.clone(),
                    src: Self::cell_src(&layer.tileset, b, cell),
                    dst: Rect::with_size(IVec2::ZERO, cell),
                    fixed: false,
                }));
            }
        }
        parts
    }
}
