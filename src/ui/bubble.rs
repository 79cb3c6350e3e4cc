//! Nine-slice panels.

use std::cell::Cell;
use std::rc::Rc;

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::core::types::{ImageKey, Rect};
use crate::scene::part::{Part, PartRef};
use crate::scene::view::{ViewId, ViewTree};

/// Side of each of the nine slices in the bubble image.
pub const BUBBLE_PART_SIZE: i32 = 5;

/// Images for a bubble at rest and while pressed. Each is a 15x15 grid of
/// nine 5x5 slices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BubbleKeys {
    pub normal: ImageKey,
    pub pressed: ImageKey,
}

#[derive(Debug)]
struct BubblePart {
    view: ViewId,
    keys: Rc<BubbleKeys>,
    pressed: Rc<Cell<bool>>,
    size: Rc<Cell<IVec2>>,
    /// Slice `i` is column `i % 3`, row `i / 3`.
    index: i32,
}

/// Start and end of slice `j` along an axis of length `len`.
fn span(j: i32, len: i32) -> (i32, i32) {
    match j {
        0 => (0, BUBBLE_PART_SIZE),
        1 => (BUBBLE_PART_SIZE, len - BUBBLE_PART_SIZE),
        _ => (len - BUBBLE_PART_SIZE, len),
    }
}

impl Part for BubblePart {
    fn container(&self) -> Option<ViewId> {
        Some(self.view)
    }

    fn image_key(&self) -> ImageKey {
        if self.pressed.get() {
            self.keys.pressed.clone()
        } else {
            self.keys.normal.clone()
        }
    }

    fn src(&self) -> Rect {
        let ul = IVec2::new(self.index % 3, self.index / 3) * BUBBLE_PART_SIZE;
        Rect::with_size(ul, IVec2::splat(BUBBLE_PART_SIZE))
    }

    fn dst(&self) -> Rect {
        let size = self.size.get();
        let (x0, x1) = span(self.index % 3, size.x);
        let (y0, y1) = span(self.index / 3, size.y);
        Rect::from_coords(x0, y0, x1, y1)
    }

    fn fixed(&self) -> bool {
        true
    }
}

/// A panel of any size of at least 15x15, drawn from nine slices: fixed
/// corners, edges stretched along one axis, the middle along both.
#[derive(Debug)]
pub struct Bubble {
    view: ViewId,
    pressed: Rc<Cell<bool>>,
    size: Rc<Cell<IVec2>>,
    parts: Vec<Rc<BubblePart>>,
}

impl Bubble {
    /// Create a bubble covering `bounds` relative to `parent`, `dz` above it.
    pub fn new(views: &mut ViewTree, parent: ViewId, bounds: Rect, keys: Rc<BubbleKeys>, dz: i32) -> Self {
        let view = views.insert_with_bounds(Some(parent), bounds);
        views.set_z(view, dz);
        let pressed = Rc::new(Cell::new(false));
        let size = Rc::new(Cell::new(bounds.size()));
        let parts = (0..9)
            .map(|index| {
                Rc::new(BubblePart {
                    view,
                    keys: keys.clone(),
                    pressed: pressed.clone(),
                    size: size.clone(),
                    index,
                })
            })
            .collect();
        Self {
            view,
            pressed,
            size,
            parts,
        }
    }

    pub fn view(&self) -> ViewId {
        self.view
    }

    pub fn size(&self) -> IVec2 {
        self.size.get()
    }

    pub fn set_size(&self, views: &mut ViewTree, size: IVec2) {
        self.size.set(size);
        views.set_size(self.view, size);
    }

    pub fn pressed(&self) -> bool {
        self.pressed.get()
    }

    pub fn set_pressed(&self, pressed: bool) {
        self.pressed.set(pressed);
    }

    pub fn parts(&self) -> Vec<PartRef> {
        self.parts.iter().map(|p| p.clone() as PartRef).collect()
    }

    pub fn dispose(&self, views: &mut ViewTree) {
        views.dispose(self.view);
    }
}
