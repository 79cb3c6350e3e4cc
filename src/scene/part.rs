//! Draw parts: the leaf contract consumed by the compositor.

use std::rc::Rc;

use crate::core::types::{ImageKey, Rect};
use crate::scene::view::{ViewId, ViewTree};

/// Something the compositor can draw: one source rectangle of an atlas image
/// placed at one destination rectangle inside a container view.
///
/// Z, visibility and retirement default to the container's absolute values.
/// A part whose container is gone reports itself retired.
pub trait Part {
    /// View the destination rectangle is relative to.
    fn container(&self) -> Option<ViewId>;

    fn image_key(&self) -> ImageKey;

    /// Source rectangle relative to the image named by [`Part::image_key`].
    fn src(&self) -> Rect;

    /// Destination rectangle relative to the container's position.
    fn dst(&self) -> Rect;

    /// Screen-space (HUD) part rather than a world-space one.
    fn fixed(&self) -> bool {
        false
    }

    fn z(&self, views: &ViewTree) -> i32 {
        self.container().and_then(|c| views.z(c)).unwrap_or(0)
    }

    fn visible(&self, views: &ViewTree) -> bool {
        self.container()
            .and_then(|c| views.visible(c))
            .unwrap_or(false)
    }

    fn retired(&self, views: &ViewTree) -> bool {
        self.container()
            .and_then(|c| views.retired(c))
            .unwrap_or(true)
    }
}

/// Shared handle to a part. The compositor holds one; the entity that
/// animates the part may hold another.
pub type PartRef = Rc<dyn Part>;

/// Destination rectangle in absolute coordinates.
///
/// A part without a live container is a programming error; it is logged and
/// resolves to an empty rectangle at the origin, which culling discards.
pub fn resolve_dst(part: &dyn Part, views: &ViewTree) -> Rect {
    let dst = part.dst();
    match part.container().and_then(|c| views.position(c)) {
        Some(origin) => dst.translate(origin),
        None => {
            tracing::warn!(key = %part.image_key(), "part has no live container");
            Rect::ZERO
        }
    }
}

/// A part with fixed source and destination rectangles.
#[derive(Debug, Clone)]
pub struct StaticPart {
    pub view: ViewId,
    pub key: ImageKey,
    pub src: Rect,
    pub dst: Rect,
    pub fixed: bool,
}

impl Part for StaticPart {
    fn container(&self) -> Option<ViewId> {
        Some(self.view)
    }

    fn image_key(&self) -> ImageKey {
        self.key.clone()
    }

    fn src(&self) -> Rect {
        self.src
    }

    fn dst(&self) -> Rect {
        self.dst
    }

    fn fixed(&self) -> bool {
        self.fixed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::IVec2;

    #[test]
    fn test_part_follows_container() {
        let mut views = ViewTree::new();
        let root = views.insert_with_bounds(None, Rect::from_coords(0, 0, 100, 100));
        let holder = views.insert_with_bounds(Some(root), Rect::from_coords(30, 40, 50, 60));
        views.set_z(holder, 7);

        let part = StaticPart {
            view: holder,
            key: "hero".into(),
            src: Rect::from_coords(0, 0, 8, 8),
            dst: Rect::from_coords(1, 2, 9, 10),
            fixed: false,
        };

        assert_eq!(resolve_dst(&part, &views), Rect::from_coords(31, 42, 39, 50));
        assert_eq!(part.z(&views), 7);
        assert!(part.visible(&views));
        assert!(!part.retired(&views));

        views.set_offset(root, IVec2::new(-30, 0));
        assert_eq!(resolve_dst(&part, &views), Rect::from_coords(1, 42, 9, 50));
    }

    #[test]
    fn test_part_with_disposed_container_is_retired() {
        let mut views = ViewTree::new();
        let holder = views.insert(None);
        let part = StaticPart {
            view: holder,
            key: "hero".into(),
            src: Rect::ZERO,
            dst: Rect::from_coords(5, 5, 10, 10),
            fixed: true,
        };

        views.dispose(holder);

        assert!(part.retired(&views));
        assert!(!part.visible(&views));
        assert_eq!(resolve_dst(&part, &views), Rect::ZERO);
    }
}
