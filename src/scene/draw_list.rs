//! Z-ordered lists of draw parts.

use std::fmt;

use crate::core::types::Rect;
use crate::scene::part::{resolve_dst, PartRef};
use crate::scene::view::ViewTree;

/// An ordered list of parts. Sorting is stable, so parts with equal Z keep
/// their insertion order.
#[derive(Default, Clone)]
pub struct DrawList {
    parts: Vec<PartRef>,
}

impl fmt::Debug for DrawList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DrawList")
            .field("len", &self.parts.len())
            .finish_non_exhaustive()
    }
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, part: PartRef) {
        self.parts.push(part);
    }

    pub fn clear(&mut self) {
        self.parts.clear();
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PartRef> {
        self.parts.iter()
    }

    pub fn as_slice(&self) -> &[PartRef] {
        &self.parts
    }

    /// Drops retired parts in place. Returns how many were removed.
    pub fn gc(&mut self, views: &ViewTree) -> usize {
        let before = self.parts.len();
        self.parts.retain(|p| !p.retired(views));
        before - self.parts.len()
    }

    /// Stable sort by absolute Z, ascending.
    pub fn sort(&mut self, views: &ViewTree) {
        self.parts.sort_by_cached_key(|p| p.z(views));
    }

    /// Appends to `out` the visible parts whose destination overlaps `viewport`.
    ///
    /// `out` is cleared first; the master list is left untouched.
    pub fn cull_into(&self, views: &ViewTree, viewport: Rect, out: &mut DrawList) {
        out.clear();
        let size = viewport.size();
        for part in &self.parts {
            if !part.visible(views) {
                continue;
            }
            let (x0, y0, x1, y1) = resolve_dst(&**part, views)
                .translate(-viewport.ul)
                .coords();
            if x1 <= 0 || y1 <= 0 || x0 > size.x || y0 > size.y {
                continue;
            }
            out.parts.push(part.clone());
        }
    }
}

/// Merges two lists already sorted by `key` into `out`.
///
/// Stable: on equal keys every element of `a` precedes the elements of `b`.
pub fn merge_by_key<T: Clone, K: Ord>(a: &[T], b: &[T], key: impl Fn(&T) -> K, out: &mut Vec<T>) {
    out.clear();
    out.reserve(a.len() + b.len());
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        if key(&b[j]) < key(&a[i]) {
            out.push(b[j].clone());
            j += 1;
        } else {
            out.push(a[i].clone());
            i += 1;
        }
    }
    out.extend_from_slice(&a[i..]);
    out.extend_from_slice(&b[j..]);
}

/// Merges two Z-sorted lists into one Z-sorted list.
pub fn merge_into(a: &DrawList, b: &DrawList, views: &ViewTree, out: &mut DrawList) {
    merge_by_key(&a.parts, &b.parts, |p| p.z(views), &mut out.parts);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::ImageKey;
    use crate::scene::part::Part;
    use crate::scene::view::ViewId;
    use proptest::prelude::*;
    use std::cell::Cell;
    use std::rc::Rc;

    struct FakePart {
        view: ViewId,
        retire: Cell<bool>,
        visible: bool,
        z: i32,
        dst: Rect,
    }

    impl FakePart {
        fn new(view: ViewId) -> Self {
            Self {
                view,
                retire: Cell::new(false),
                visible: true,
                z: 0,
                dst: Rect::from_coords(0, 0, 10, 10),
            }
        }
    }

    impl Part for FakePart {
        fn container(&self) -> Option<ViewId> {
            Some(self.view)
        }
        fn image_key(&self) -> ImageKey {
            "fake".into()
        }
        fn src(&self) -> Rect {
            Rect::ZERO
        }
        fn dst(&self) -> Rect {
            self.dst
        }
        fn z(&self, _: &ViewTree) -> i32 {
            self.z
        }
        fn visible(&self, _: &ViewTree) -> bool {
            self.visible
        }
        fn retired(&self, _: &ViewTree) -> bool {
            self.retire.get()
        }
    }

    #[test]
    fn test_gc_every_pattern() {
        let mut views = ViewTree::new();
        let view = views.insert(None);
        let objs: Vec<Rc<FakePart>> = (0..8).map(|_| Rc::new(FakePart::new(view))).collect();

        for pattern in 0u32..(1 << 8) {
            let mut list = DrawList::new();
            let mut want = 0;
            for (j, o) in objs.iter().enumerate() {
                let retire = pattern & (1 << j) != 0;
                o.retire.set(retire);
                if !retire {
                    want += 1;
                }
                list.push(o.clone());
            }

            let removed = list.gc(&views);

            assert_eq!(list.len(), want, "pattern {pattern:#x}");
            assert_eq!(removed, 8 - want, "pattern {pattern:#x}");
            assert!(list.iter().all(|p| !p.retired(&views)), "pattern {pattern:#x}");
        }
    }

    #[test]
    fn test_sort_is_stable() {
        let mut views = ViewTree::new();
        let view = views.insert(None);
        let zs = [3, 1, 3, 0, 1];
        let parts: Vec<Rc<FakePart>> = zs
            .iter()
            .map(|&z| Rc::new(FakePart { z, ..FakePart::new(view) }))
            .collect();
        let mut list = DrawList::new();
        for p in &parts {
            list.push(p.clone());
        }

        list.sort(&views);

        let order: Vec<*const FakePart> = list
            .iter()
            .map(|p| Rc::as_ptr(p) as *const FakePart)
            .collect();
        let want: Vec<*const FakePart> = [3, 1, 4, 0, 2]
            .iter()
            .map(|&i| Rc::as_ptr(&parts[i]))
            .collect();
        assert_eq!(order, want);
    }

    #[test]
    fn test_cull_rejects_invisible_and_offscreen() {
        let mut views = ViewTree::new();
        let view = views.insert(None);
        let viewport = Rect::from_coords(0, 0, 100, 50);
        let cases = [
            (Rect::from_coords(10, 10, 20, 20), true, true),
            (Rect::from_coords(10, 10, 20, 20), false, false),
            (Rect::from_coords(-10, 10, 0, 20), true, false),
            (Rect::from_coords(-10, 10, 1, 20), true, true),
            (Rect::from_coords(10, -10, 20, 0), true, false),
            (Rect::from_coords(101, 10, 120, 20), true, false),
            (Rect::from_coords(100, 10, 120, 20), true, true),
            (Rect::from_coords(10, 51, 20, 60), true, false),
        ];

        for (dst, visible, keep) in cases {
            let mut list = DrawList::new();
            list.push(Rc::new(FakePart {
                dst,
                visible,
                ..FakePart::new(view)
            }));
            let mut out = DrawList::new();
            list.cull_into(&views, viewport, &mut out);
            assert_eq!(out.len(), usize::from(keep), "dst {dst:?} visible {visible}");
            assert_eq!(list.len(), 1, "culling leaves the master list alone");
        }
    }

    #[test]
    fn test_cull_is_viewport_relative() {
        let mut views = ViewTree::new();
        let view = views.insert(None);
        let mut list = DrawList::new();
        list.push(Rc::new(FakePart {
            dst: Rect::from_coords(210, 10, 220, 20),
            ..FakePart::new(view)
        }));
        let mut out = DrawList::new();

        list.cull_into(&views, Rect::from_coords(0, 0, 100, 100), &mut out);
        assert!(out.is_empty());

        list.cull_into(&views, Rect::from_coords(200, 0, 300, 100), &mut out);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn test_merge_ties_prefer_first_list() {
        let a = [(1, 'a'), (2, 'a'), (2, 'b')];
        let b = [(0, 'c'), (2, 'c'), (3, 'c')];
        let mut out = Vec::new();

        merge_by_key(&a, &b, |x| x.0, &mut out);

        assert_eq!(
            out,
            vec![(0, 'c'), (1, 'a'), (2, 'a'), (2, 'b'), (2, 'c'), (3, 'c')]
        );
    }

    proptest! {
        #[test]
        fn prop_merge_sorted_stable_permutation(
            mut a in proptest::collection::vec(-5i32..5, 0..20),
            mut b in proptest::collection::vec(-5i32..5, 0..20),
        ) {
            a.sort();
            b.sort();
            // Tag each element with (source, index) to observe stability.
            let ta: Vec<(i32, u8, usize)> = a.iter().enumerate().map(|(i, &z)| (z, 0, i)).collect();
            let tb: Vec<(i32, u8, usize)> = b.iter().enumerate().map(|(i, &z)| (z, 1, i)).collect();
            let mut out = Vec::new();

            merge_by_key(&ta, &tb, |x| x.0, &mut out);

            prop_assert_eq!(out.len(), ta.len() + tb.len());
            // Stability plus ties-from-a-first means the output is ordered by
            // (z, source, index), which also makes it a permutation of the input.
            let mut want: Vec<_> = ta.iter().chain(tb.iter()).copied().collect();
            want.sort();
            prop_assert_eq!(out, want);
        }
    }
}
