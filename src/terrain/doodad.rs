//! Static objects standing on the terrain that also block movement.

use std::rc::Rc;

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::core::types::Rect;
use crate::scene::part::PartRef;
use crate::scene::view::{ViewId, ViewTree};
use crate::sprites::sheet::Sheet;
use crate::sprites::sprite::SpritePart;

/// A doodad as written in level data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoodadData {
    /// Name of a sheet in the level's sheet table.
    pub sheet: String,
    #[serde(default)]
    pub frame: usize,
    pub pos: IVec2,
    /// Obstacle box relative to the frame's top-left corner.
    pub base: Rect,
}

/// A doodad placed in the world, showing one frame of a sheet.
#[derive(Debug, Clone)]
pub struct Doodad {
    pub pos: IVec2,
    pub sheet: Rc<Sheet>,
    pub frame: usize,
    pub base: Rect,
}

impl Doodad {
    fn top_left(&self) -> IVec2 {
        self.sheet.frame_dst(self.frame).ul + self.pos
    }

    /// Obstacle box in world coordinates.
    pub fn base_box(&self) -> Rect {
        self.base.translate(self.top_left())
    }

    /// Image rectangle in world coordinates.
    pub fn bounds(&self) -> Rect {
        Rect::with_size(self.top_left(), self.sheet.frame_size)
    }

    /// Create the doodad's view under `parent` and return its part.
    ///
    /// Z is the doodad's Y so units walking in front draw over it.
    pub fn part(&self, views: &mut ViewTree, parent: ViewId) -> PartRef {
        let view = views.insert_with_bounds(Some(parent), Rect::with_size(self.pos, IVec2::ZERO));
        views.set_z(view, self.pos.y);
        Rc::new(SpritePart::still(view, self.sheet.clone(), self.frame))
    }
}
