//! Animated sprites placed in the view tree.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use glam::IVec2;

use crate::core::types::{ImageKey, Rect};
use crate::scene::part::{Part, PartRef};
use crate::scene::view::{ViewId, ViewTree};
use crate::sprites::animation::AnimPlayer;
use crate::sprites::sheet::Sheet;

/// Draw part showing the current frame of a sheet.
///
/// The container view sits at the sprite position; the frame offset places
/// the image around it. Sheet and frame are shared with the owning
/// [`Sprite`], so a part already in the scene follows sheet swaps.
#[derive(Debug, Clone)]
pub struct SpritePart {
    view: ViewId,
    sheet: Rc<RefCell<Rc<Sheet>>>,
    frame: Rc<Cell<usize>>,
    fixed: bool,
}

impl SpritePart {
    /// A part that always shows `frame` of `sheet`.
    pub fn still(view: ViewId, sheet: Rc<Sheet>, frame: usize) -> Self {
        Self {
            view,
            sheet: Rc::new(RefCell::new(sheet)),
            frame: Rc::new(Cell::new(frame)),
            fixed: false,
        }
    }
}

impl Part for SpritePart {
    fn container(&self) -> Option<ViewId> {
        Some(self.view)
    }

    fn image_key(&self) -> ImageKey {
        self.sheet.borrow().key.clone()
    }

    fn src(&self) -> Rect {
        self.sheet.borrow().frame_src(self.frame.get())
    }

    fn dst(&self) -> Rect {
        self.sheet.borrow().frame_dst(self.frame.get())
    }

    fn fixed(&self) -> bool {
        self.fixed
    }
}

/// A sheet played at a position. Z follows the Y coordinate so sprites lower
/// on screen draw over those above.
#[derive(Debug)]
pub struct Sprite {
    view: ViewId,
    sheet: Rc<RefCell<Rc<Sheet>>>,
    player: AnimPlayer,
    frame: Rc<Cell<usize>>,
}

impl Sprite {
    /// Create a sprite under `parent` at `pos`.
    pub fn new(views: &mut ViewTree, parent: ViewId, sheet: Rc<Sheet>, pos: IVec2) -> Self {
        let view = views.insert(Some(parent));
        let mut sprite = Self {
            view,
            sheet: Rc::new(RefCell::new(sheet)),
            player: AnimPlayer::new(),
            frame: Rc::new(Cell::new(0)),
        };
        sprite.set_pos(views, pos);
        sprite
    }

    pub fn view(&self) -> ViewId {
        self.view
    }

    pub fn sheet(&self) -> Rc<Sheet> {
        self.sheet.borrow().clone()
    }

    pub fn frame(&self) -> usize {
        self.frame.get()
    }

    /// Draw part for the compositor. Shares sheet and frame with this sprite.
    pub fn part(&self) -> PartRef {
        Rc::new(SpritePart {
            view: self.view,
            sheet: self.sheet.clone(),
            frame: self.frame.clone(),
            fixed: false,
        })
    }

    pub fn pos(&self, views: &ViewTree) -> IVec2 {
        views
            .logical_bounds(self.view)
            .map_or(IVec2::ZERO, |b| b.ul)
    }

    pub fn set_pos(&mut self, views: &mut ViewTree, pos: IVec2) {
        views.set_position(self.view, pos);
        views.set_z(self.view, pos.y);
    }

    /// Swap the sheet and restart playback. Parts handed out earlier switch
    /// with it.
    pub fn set_sheet(&mut self, sheet: Rc<Sheet>) {
        if Rc::ptr_eq(&*self.sheet.borrow(), &sheet) {
            return;
        }
        *self.sheet.borrow_mut() = sheet;
        self.reset();
    }

    pub fn reset(&mut self) {
        self.player.reset();
        self.frame.set(0);
    }

    /// Advance the animation by one model tick.
    pub fn update(&mut self) {
        let sheet = self.sheet();
        self.player.advance(&sheet);
        self.frame.set(self.player.frame);
    }

    /// Rectangle covered by the current frame in the parent's coordinates.
    pub fn bounds(&self, views: &ViewTree) -> Rect {
        self.sheet
            .borrow()
            .frame_dst(self.frame())
            .translate(self.pos(views))
    }

    /// Retire the sprite's view; its parts are collected on the next update.
    pub fn dispose(&self, views: &mut ViewTree) {
        views.dispose(self.view);
    }
}
