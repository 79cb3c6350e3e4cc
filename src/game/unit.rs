//! Units: things on the map that move on their own.

use std::rc::Rc;

use glam::IVec2;

use crate::core::types::{Frame, Rect};
use crate::game::input::{Event, EventKind};
use crate::navigation::Navigator;
use crate::scene::part::PartRef;
use crate::scene::view::{ViewId, ViewTree};
use crate::sprites::sheet::Sheet;
use crate::sprites::sprite::Sprite;

/// What a unit may touch during its update.
pub struct UnitContext<'a> {
    pub views: &'a mut ViewTree,
    pub navigator: &'a Navigator,
    /// Window path vertices must lie in: the camera, in world coordinates.
    pub limit: Rect,
    pub frame: Frame,
}

/// A unit such as the player character or an NPC.
pub trait Unit {
    /// Stop whatever it is doing.
    fn go_idle(&mut self);

    /// Ground area relative to the unit's position. Obstacles are fattened by it.
    fn footprint(&self) -> Rect;

    /// Remaining waypoints. The current position is implied as the first point.
    fn path(&self) -> &[IVec2];

    fn pos(&self, views: &ViewTree) -> IVec2;

    /// Put the unit into the scene under `parent`, returning its draw parts.
    fn attach(&mut self, views: &mut ViewTree, parent: ViewId) -> Vec<PartRef>;

    /// One model tick.
    fn update(&mut self, ctx: &mut UnitContext<'_>, event: &Event);
}

/// A unit that walks to wherever the player clicks.
#[derive(Debug)]
pub struct Walker {
    sheet: Rc<Sheet>,
    start: IVec2,
    footprint: Rect,
    /// Pixels per tick.
    speed: i32,
    path: Vec<IVec2>,
    sprite: Option<Sprite>,
}

impl Walker {
    pub fn new(sheet: Rc<Sheet>, start: IVec2, footprint: Rect, speed: i32) -> Self {
        Self {
            sheet,
            start,
            footprint,
            speed: speed.max(1),
            path: Vec::new(),
            sprite: None,
        }
    }

    /// Follow `path` from the current position.
    pub fn set_path(&mut self, path: Vec<IVec2>) {
        self.path = path;
    }

    /// Step towards the next waypoint, dropping it once reached.
    fn step(&mut self, views: &mut ViewTree) {
        let Some(sprite) = self.sprite.as_mut() else {
            return;
        };
        let Some(&target) = self.path.first() else {
            return;
        };
        let pos = sprite.pos(views);
        let d = target - pos;
        let dist = d.as_vec2().length();
        let next = if dist <= self.speed as f32 {
            self.path.remove(0);
            target
        } else {
            pos + (d.as_vec2() * (self.speed as f32 / dist)).round().as_ivec2()
        };
        sprite.set_pos(views, next);
    }
}

impl Unit for Walker {
    fn go_idle(&mut self) {
        self.path.clear();
    }

    fn footprint(&self) -> Rect {
        self.footprint
    }

    fn path(&self) -> &[IVec2] {
        &self.path
    }

    fn pos(&self, views: &ViewTree) -> IVec2 {
        self.sprite
            .as_ref()
            .map_or(self.start, |s| s.pos(views))
    }

    fn attach(&mut self, views: &mut ViewTree, parent: ViewId) -> Vec<PartRef> {
        if let Some(old) = self.sprite.take() {
            old.dispose(views);
        }
        let sprite = Sprite::new(views, parent, self.sheet.clone(), self.start);
        let part = sprite.part();
        self.sprite = Some(sprite);
        vec![part]
    }

    fn update(&mut self, ctx: &mut UnitContext<'_>, event: &Event) {
        if event.kind == EventKind::Up {
            let from = self.pos(ctx.views);
            self.path = ctx.navigator.navigate(from, event.world_pos, ctx.limit);
        }
        self.step(ctx.views);
        if let Some(sprite) = self.sprite.as_mut() {
            sprite.update();
        }
    }
}
