//! Retained-mode scene: a view tree plus the compositor that turns draw parts
//! into one Z-ordered batch per frame.

pub mod draw_list;
pub mod part;
pub mod view;

pub use draw_list::{merge_by_key, merge_into, DrawList};
pub use part::{resolve_dst, Part, PartRef, StaticPart};
pub use view::{ViewId, ViewTree};

use glam::IVec2;

use crate::core::error::Result;
use crate::core::types::Rect;
use crate::renderer::atlas::AtlasLayout;
use crate::renderer::batch::DrawCommand;

/// Z of the HUD view. Anything under it draws above the world.
pub const HUD_Z: i32 = 100_000;

/// One scene: a root view the size of the camera, a world view the size of
/// the terrain that scrolls under it, and a HUD view fixed to the screen.
///
/// Fixed parts (HUD) and loose parts (world) are kept in separate master
/// lists. Fixed parts rarely change Z, so their list is only re-sorted after
/// an insertion; loose parts move every tick and are re-sorted after culling.
#[derive(Debug)]
pub struct Scene {
    views: ViewTree,
    root: ViewId,
    world: ViewId,
    hud: ViewId,

    fixed: DrawList,
    fixed_sorted: bool,
    loose: DrawList,
    disp_fixed: DrawList,
    disp_loose: DrawList,
    disp_merged: DrawList,
}

impl Scene {
    pub fn new(cam_size: IVec2, world_size: IVec2) -> Self {
        let mut views = ViewTree::new();
        let root = views.insert_with_bounds(None, Rect::with_size(IVec2::ZERO, cam_size));
        let world = views.insert_with_bounds(Some(root), Rect::with_size(IVec2::ZERO, world_size));
        let hud = views.insert_with_bounds(Some(root), Rect::with_size(IVec2::ZERO, cam_size));
        views.set_z(hud, HUD_Z);
        Self {
            views,
            root,
            world,
            hud,
            fixed: DrawList::new(),
            fixed_sorted: true,
            loose: DrawList::new(),
            disp_fixed: DrawList::new(),
            disp_loose: DrawList::new(),
            disp_merged: DrawList::new(),
        }
    }

    pub fn views(&self) -> &ViewTree {
        &self.views
    }

    pub fn views_mut(&mut self) -> &mut ViewTree {
        &mut self.views
    }

    pub fn root(&self) -> ViewId {
        self.root
    }

    /// Parent for world-space views; scrolled by the camera.
    pub fn world(&self) -> ViewId {
        self.world
    }

    /// Parent for screen-space views.
    pub fn hud(&self) -> ViewId {
        self.hud
    }

    pub fn cam_size(&self) -> IVec2 {
        self.views.size(self.root).unwrap_or(IVec2::ZERO)
    }

    pub fn world_size(&self) -> IVec2 {
        self.views.size(self.world).unwrap_or(IVec2::ZERO)
    }

    /// Resize the camera window; the HUD follows.
    pub fn set_cam_size(&mut self, size: IVec2) {
        self.views.set_size(self.root, size);
        self.views.set_size(self.hud, size);
    }

    pub fn add_part(&mut self, part: PartRef) {
        if part.fixed() {
            self.fixed_sorted = false;
            self.fixed.push(part);
        } else {
            self.loose.push(part);
        }
    }

    pub fn add_parts(&mut self, parts: impl IntoIterator<Item = PartRef>) {
        for p in parts {
            self.add_part(p);
        }
    }

    /// Number of parts in the master lists (fixed, loose).
    pub fn part_counts(&self) -> (usize, usize) {
        (self.fixed.len(), self.loose.len())
    }

    /// Top-left of the camera in world coordinates.
    pub fn camera_pos(&self) -> IVec2 {
        -self.views.offset(self.world).unwrap_or(IVec2::ZERO)
    }

    /// Scroll the world so `p` is centred, keeping the camera inside the world.
    pub fn camera_focus(&mut self, p: IVec2) {
        let cam = self.cam_size();
        let max = (self.world_size() - cam).max(IVec2::ZERO);
        let pos = (p - cam / 2).clamp(IVec2::ZERO, max);
        self.views.set_offset(self.world, -pos);
    }

    /// Reorganise parts for display: collect retired parts, sort, cull against
    /// the camera and merge fixed and loose into one Z-ordered list.
    pub fn update(&mut self) {
        let removed = self.fixed.gc(&self.views) + self.loose.gc(&self.views);
        if removed > 0 {
            tracing::trace!(removed, "collected retired parts");
        }
        if !self.fixed_sorted {
            self.fixed.sort(&self.views);
            self.fixed_sorted = true;
        }
        let screen = self.views.bounds(self.root).unwrap_or_default();
        self.fixed.cull_into(&self.views, screen, &mut self.disp_fixed);
        self.loose.cull_into(&self.views, screen, &mut self.disp_loose);
        self.disp_loose.sort(&self.views);
        merge_into(&self.disp_fixed, &self.disp_loose, &self.views, &mut self.disp_merged);
    }

    /// Parts to draw this frame, in Z order, as of the last [`Scene::update`].
    pub fn displayed(&self) -> &DrawList {
        &self.disp_merged
    }

    /// Resolve the displayed parts to atlas/screen rectangles.
    ///
    /// An image key missing from the atlas is fatal and returned as an error.
    pub fn draw(&self, atlas: &AtlasLayout) -> Result<Vec<DrawCommand>> {
        self.disp_merged
            .iter()
            .map(|p| {
                let key = p.image_key();
                let src = atlas.resolve_src(&key, p.src())?;
                Ok(DrawCommand {
                    dst: resolve_dst(&**p, &self.views),
                    key,
                    src,
                })
            })
            .collect()
    }
}
