//! Core type definitions used throughout the codebase

use std::rc::Rc;

use glam::IVec2;
use serde::{Deserialize, Serialize};

/// Model frame counter (one per model update tick)
pub type Frame = u64;

/// Key of a registered source image in the shared atlas.
///
/// Cheap to clone so draw parts can hand it out every frame.
pub type ImageKey = Rc<str>;

/// Axis-aligned integer rectangle, upper-left inclusive, down-right exclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub ul: IVec2,
    pub dr: IVec2,
}

impl Rect {
    pub const ZERO: Rect = Rect {
        ul: IVec2::ZERO,
        dr: IVec2::ZERO,
    };

    pub const fn new(ul: IVec2, dr: IVec2) -> Self {
        Self { ul, dr }
    }

    pub const fn from_coords(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self {
            ul: IVec2::new(x0, y0),
            dr: IVec2::new(x1, y1),
        }
    }

    /// Rectangle with the given top-left corner and size.
    pub fn with_size(ul: IVec2, size: IVec2) -> Self {
        Self { ul, dr: ul + size }
    }

    pub fn coords(&self) -> (i32, i32, i32, i32) {
        (self.ul.x, self.ul.y, self.dr.x, self.dr.y)
    }

    pub fn size(&self) -> IVec2 {
        self.dr - self.ul
    }

    pub fn width(&self) -> i32 {
        self.dr.x - self.ul.x
    }

    pub fn height(&self) -> i32 {
        self.dr.y - self.ul.y
    }

    pub fn is_empty(&self) -> bool {
        self.dr.x <= self.ul.x || self.dr.y <= self.ul.y
    }

    pub fn translate(&self, by: IVec2) -> Self {
        Self {
            ul: self.ul + by,
            dr: self.dr + by,
        }
    }

    /// Moves the top-left corner, keeping the size.
    pub fn reposition(&self, ul: IVec2) -> Self {
        Self::with_size(ul, self.size())
    }

    /// Changes the size, keeping the top-left corner.
    pub fn resize(&self, size: IVec2) -> Self {
        Self::with_size(self.ul, size)
    }

    /// True if the point lies inside (upper-left inclusive, down-right exclusive).
    pub fn contains(&self, p: IVec2) -> bool {
        p.x >= self.ul.x && p.x < self.dr.x && p.y >= self.ul.y && p.y < self.dr.y
    }

    /// True if the two rectangles share any area.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.ul.x < other.dr.x
            && other.ul.x < self.dr.x
            && self.ul.y < other.dr.y
            && other.ul.y < self.dr.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reposition_keeps_size() {
        let r = Rect::from_coords(2, 3, 12, 8);
        let moved = r.reposition(IVec2::new(-4, 0));

        assert_eq!(moved, Rect::from_coords(-4, 0, 6, 5));
        assert_eq!(moved.size(), r.size());
    }

    #[test]
    fn test_resize_keeps_corner() {
        let r = Rect::from_coords(2, 3, 12, 8);
        assert_eq!(r.resize(IVec2::new(1, 1)), Rect::from_coords(2, 3, 3, 4));
    }

    #[test]
    fn test_overlaps_excludes_touching_edges() {
        let a = Rect::from_coords(0, 0, 10, 10);
        assert!(a.overlaps(&Rect::from_coords(9, 9, 20, 20)));
        assert!(!a.overlaps(&Rect::from_coords(10, 0, 20, 10)));
        assert!(!a.overlaps(&Rect::from_coords(0, 10, 10, 20)));
    }

    #[test]
    fn test_contains_half_open() {
        let r = Rect::from_coords(0, 0, 4, 4);
        assert!(r.contains(IVec2::new(0, 0)));
        assert!(r.contains(IVec2::new(3, 3)));
        assert!(!r.contains(IVec2::new(4, 3)));
    }
}
