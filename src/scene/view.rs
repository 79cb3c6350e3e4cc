//! Hierarchical views with lazily validated absolute geometry.
//!
//! Every view stores its geometry relative to its parent. Absolute values
//! (bounds, Z, visibility, retirement) are cached per view and recomputed on
//! first read after an invalidation. Mutations invalidate eagerly and top-down,
//! so a valid view always has a valid parent.
//!
//! The cache lives in [`Cell`]s, which keeps reads `&self` and keeps the tree
//! on a single thread.

use std::cell::Cell;

use derive_more::Display;
use glam::IVec2;

use crate::core::types::Rect;

/// Identifier for a view in a [`ViewTree`].
///
/// Slot index plus generation; ids of disposed views never come back to life.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[display(fmt = "view#{}.{}", _0, _1)]
pub struct ViewId(u32, u32);

impl ViewId {
    fn idx(self) -> usize {
        self.0 as usize
    }
}

/// Absolute values resolved from the ancestor chain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Resolved {
    bounds: Rect,
    /// Where children are placed: absolute position plus this view's offset.
    origin: IVec2,
    z: i32,
    invisible: bool,
    retired: bool,
}

#[derive(Debug)]
struct ViewNode {
    generation: u32,

    bounds: Rect,
    z: i32,
    invisible: bool,
    retired: bool,
    offset: IVec2,

    parent: Option<ViewId>,
    children: Vec<ViewId>,
    /// Position of this view in its parent's `children`.
    child_index: usize,

    valid: Cell<bool>,
    cache: Cell<Resolved>,
}

impl ViewNode {
    fn new(generation: u32, bounds: Rect) -> Self {
        Self {
            generation,
            bounds,
            z: 0,
            invisible: false,
            retired: false,
            offset: IVec2::ZERO,
            parent: None,
            children: Vec::new(),
            child_index: 0,
            valid: Cell::new(false),
            cache: Cell::new(Resolved::default()),
        }
    }
}

/// Arena of views. Parents own their children through the arena; children
/// only hold the parent's id.
#[derive(Debug, Default)]
pub struct ViewTree {
    nodes: Vec<Option<ViewNode>>,
    generations: Vec<u32>,
    free_list: Vec<usize>,
}

impl ViewTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an empty view under `parent` (or as a root if `None`).
    pub fn insert(&mut self, parent: Option<ViewId>) -> ViewId {
        self.insert_with_bounds(parent, Rect::ZERO)
    }

    /// Insert a view with the given bounds relative to `parent`.
    pub fn insert_with_bounds(&mut self, parent: Option<ViewId>, bounds: Rect) -> ViewId {
        let id = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].wrapping_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(ViewNode::new(generation, bounds));
            ViewId(idx as u32, generation)
        } else {
            let generation = 1;
            self.nodes.push(Some(ViewNode::new(generation, bounds)));
            self.generations.push(generation);
            ViewId((self.nodes.len() - 1) as u32, generation)
        };
        if parent.is_some() {
            self.set_parent(id, parent);
        }
        id
    }

    /// Returns true if `id` refers to a view that has not been disposed.
    pub fn is_alive(&self, id: ViewId) -> bool {
        self.node(id).is_some()
    }

    /// Number of live views.
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True if the cached absolute values of `id` are current.
    pub fn is_valid(&self, id: ViewId) -> bool {
        self.node(id).is_some_and(|n| n.valid.get())
    }

    fn node(&self, id: ViewId) -> Option<&ViewNode> {
        self.nodes
            .get(id.idx())?
            .as_ref()
            .filter(|n| n.generation == id.1)
    }

    fn node_mut(&mut self, id: ViewId) -> Option<&mut ViewNode> {
        self.nodes
            .get_mut(id.idx())?
            .as_mut()
            .filter(|n| n.generation == id.1)
    }

    /// Marks `id` and its valid descendants stale.
    fn invalidate(&self, id: ViewId) {
        let Some(node) = self.node(id) else {
            return;
        };
        // An invalid view has no valid descendants: reading a descendant
        // would have validated this view first.
        if !node.valid.get() {
            return;
        }
        node.valid.set(false);
        for &child in &node.children {
            self.invalidate(child);
        }
    }

    fn resolve(&self, id: ViewId) -> Option<Resolved> {
        let node = self.node(id)?;
        if node.valid.get() {
            return Some(node.cache.get());
        }
        let resolved = match node.parent.and_then(|p| self.resolve(p)) {
            None => Resolved {
                bounds: node.bounds,
                origin: node.bounds.ul + node.offset,
                z: node.z,
                invisible: node.invisible,
                retired: node.retired,
            },
            Some(parent) => {
                let bounds = node.bounds.translate(parent.origin);
                Resolved {
                    bounds,
                    origin: bounds.ul + node.offset,
                    z: node.z + parent.z,
                    invisible: node.invisible || parent.invisible,
                    retired: node.retired || parent.retired,
                }
            }
        };
        node.cache.set(resolved);
        node.valid.set(true);
        Some(resolved)
    }

    // --- absolute accessors ---

    /// Absolute bounds.
    pub fn bounds(&self, id: ViewId) -> Option<Rect> {
        self.resolve(id).map(|r| r.bounds)
    }

    /// Absolute top-left corner.
    pub fn position(&self, id: ViewId) -> Option<IVec2> {
        self.resolve(id).map(|r| r.bounds.ul)
    }

    /// Absolute Z: the sum of relative Z along the ancestor chain.
    pub fn z(&self, id: ViewId) -> Option<i32> {
        self.resolve(id).map(|r| r.z)
    }

    /// Visible only if this view and every ancestor are visible.
    pub fn visible(&self, id: ViewId) -> Option<bool> {
        self.resolve(id).map(|r| !r.invisible)
    }

    /// Retired if this view or any ancestor is retired.
    pub fn retired(&self, id: ViewId) -> Option<bool> {
        self.resolve(id).map(|r| r.retired)
    }

    /// Offset applied to this view's children.
    pub fn offset(&self, id: ViewId) -> Option<IVec2> {
        self.resolve(id)?;
        self.node(id).map(|n| n.offset)
    }

    // --- local accessors ---

    /// Bounds relative to the parent.
    pub fn logical_bounds(&self, id: ViewId) -> Option<Rect> {
        self.node(id).map(|n| n.bounds)
    }

    /// Z relative to the parent.
    pub fn logical_z(&self, id: ViewId) -> Option<i32> {
        self.node(id).map(|n| n.z)
    }

    pub fn size(&self, id: ViewId) -> Option<IVec2> {
        self.node(id).map(|n| n.bounds.size())
    }

    pub fn parent(&self, id: ViewId) -> Option<ViewId> {
        self.node(id).and_then(|n| n.parent)
    }

    /// Children in storage order. Removal swaps the last child into the gap.
    pub fn children(&self, id: ViewId) -> &[ViewId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    // --- mutation ---

    pub fn set_bounds(&mut self, id: ViewId, bounds: Rect) {
        if let Some(n) = self.node_mut(id) {
            n.bounds = bounds;
            self.invalidate(id);
        }
    }

    /// Moves the view without altering its size.
    pub fn set_position(&mut self, id: ViewId, ul: IVec2) {
        if let Some(n) = self.node_mut(id) {
            n.bounds = n.bounds.reposition(ul);
            self.invalidate(id);
        }
    }

    /// Resizes the view without moving its top-left corner.
    ///
    /// Nothing is invalidated: descendants depend only on this view's
    /// position, offset, Z, visibility and retirement. A valid cache has its
    /// bounds patched in place so reads stay exact.
    pub fn set_size(&mut self, id: ViewId, size: IVec2) {
        if let Some(n) = self.node_mut(id) {
            n.bounds = n.bounds.resize(size);
            if n.valid.get() {
                let mut cache = n.cache.get();
                cache.bounds = cache.bounds.resize(size);
                n.cache.set(cache);
            }
        }
    }

    pub fn set_position_and_size(&mut self, id: ViewId, ul: IVec2, size: IVec2) {
        self.set_bounds(id, Rect::with_size(ul, size));
    }

    pub fn set_z(&mut self, id: ViewId, z: i32) {
        if let Some(n) = self.node_mut(id) {
            n.z = z;
            self.invalidate(id);
        }
    }

    pub fn set_visible(&mut self, id: ViewId, visible: bool) {
        if let Some(n) = self.node_mut(id) {
            n.invisible = !visible;
            self.invalidate(id);
        }
    }

    pub fn set_retired(&mut self, id: ViewId, retired: bool) {
        if let Some(n) = self.node_mut(id) {
            n.retired = retired;
            self.invalidate(id);
        }
    }

    /// Sets the offset applied to children (scrolling).
    pub fn set_offset(&mut self, id: ViewId, offset: IVec2) {
        if let Some(n) = self.node_mut(id) {
            n.offset = offset;
            self.invalidate(id);
        }
    }

    /// Moves `id` under `parent` (or detaches it if `None`).
    ///
    /// Panics if `parent` is not alive or is `id` itself or one of its descendants.
    pub fn set_parent(&mut self, id: ViewId, parent: Option<ViewId>) {
        if !self.is_alive(id) {
            return;
        }
        if let Some(p) = parent {
            assert!(self.is_alive(p), "{p} is not a live view");
            assert!(
                !self.is_self_or_ancestor(id, p),
                "{id} cannot become a child of its own descendant {p}"
            );
        }
        self.invalidate(id);
        self.remove_from_parent(id);
        if let Some(p) = parent {
            let index = {
                let pn = self.node_mut(p).expect("live parent");
                pn.children.push(id);
                pn.children.len() - 1
            };
            let n = self.node_mut(id).expect("live view");
            n.parent = Some(p);
            n.child_index = index;
        }
    }

    fn is_self_or_ancestor(&self, candidate: ViewId, mut of: ViewId) -> bool {
        loop {
            if of == candidate {
                return true;
            }
            match self.parent(of) {
                Some(p) => of = p,
                None => return false,
            }
        }
    }

    /// Swap-removes `id` from its parent's children, fixing the moved sibling's index.
    fn remove_from_parent(&mut self, id: ViewId) {
        let Some((Some(parent), index)) = self.node(id).map(|n| (n.parent, n.child_index)) else {
            return;
        };
        let moved = {
            let siblings = &mut self
                .node_mut(parent)
                .expect("parent of a live view is alive")
                .children;
            assert!(
                siblings.get(index) == Some(&id),
                "{id} believes it is child {index} of {parent} but is not"
            );
            siblings.swap_remove(index);
            siblings.get(index).copied()
        };
        if let Some(moved) = moved {
            if let Some(n) = self.node_mut(moved) {
                n.child_index = index;
            }
        }
        if let Some(n) = self.node_mut(id) {
            n.parent = None;
        }
    }

    /// Disposes children first, then retires and detaches `id` and frees its slot.
    pub fn dispose(&mut self, id: ViewId) {
        if !self.is_alive(id) {
            return;
        }
        while let Some(&child) = self.children(id).first() {
            self.dispose(child);
        }
        self.set_retired(id, true);
        self.set_parent(id, None);
        self.nodes[id.idx()] = None;
        self.free_list.push(id.idx());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_view_invalidation() {
        let mut tree = ViewTree::new();
        let v = tree.insert(None);

        tree.bounds(v);
        assert!(tree.is_valid(v), "read validates");

        tree.set_bounds(v, Rect::ZERO);
        assert!(!tree.is_valid(v));
        tree.bounds(v);
        assert!(tree.is_valid(v));

        tree.set_offset(v, IVec2::ZERO);
        assert!(!tree.is_valid(v));
        tree.offset(v);
        assert!(tree.is_valid(v));

        tree.set_z(v, 0);
        assert!(!tree.is_valid(v));
        tree.z(v);
        assert!(tree.is_valid(v));

        let w = tree.insert(Some(v));
        assert!(tree.is_valid(v), "attaching a child leaves the parent valid");
        assert!(!tree.is_valid(w));

        tree.z(w);
        tree.set_visible(v, true);
        assert!(!tree.is_valid(v));
        assert!(!tree.is_valid(w));
    }

    #[test]
    fn test_set_parent_children_order() {
        let mut tree = ViewTree::new();
        let parent = tree.insert(None);
        let child1 = tree.insert(None);
        let child2 = tree.insert(None);

        tree.set_parent(child1, Some(parent));
        assert_eq!(tree.children(parent), &[child1]);
        tree.set_parent(child2, Some(parent));
        assert_eq!(tree.children(parent), &[child1, child2]);

        tree.set_parent(child1, Some(child2));
        assert_eq!(tree.children(parent), &[child2]);
        assert_eq!(tree.children(child2), &[child1]);
        assert_eq!(tree.parent(child1), Some(child2));
    }

    #[test]
    fn test_swap_remove_keeps_indices_in_sync() {
        let mut tree = ViewTree::new();
        let parent = tree.insert(None);
        let kids: Vec<ViewId> = (0..5).map(|_| tree.insert(Some(parent))).collect();

        // Removing the first swaps the last into slot 0.
        tree.set_parent(kids[0], None);
        assert_eq!(tree.children(parent), &[kids[4], kids[1], kids[2], kids[3]]);
        for (i, &k) in tree.children(parent).iter().enumerate() {
            assert_eq!(tree.node(k).unwrap().child_index, i);
        }

        // Every remaining child can still detach itself without tripping the
        // index assertion.
        for &k in &[kids[4], kids[2], kids[3], kids[1]] {
            tree.set_parent(k, None);
        }
        assert!(tree.children(parent).is_empty());
    }

    #[test]
    fn test_absolute_values_compose() {
        let mut tree = ViewTree::new();
        let root = tree.insert_with_bounds(None, Rect::from_coords(10, 20, 110, 120));
        let child = tree.insert_with_bounds(Some(root), Rect::from_coords(5, 5, 15, 15));
        tree.set_z(root, 100);
        tree.set_z(child, -3);

        assert_eq!(tree.bounds(child), Some(Rect::from_coords(15, 25, 25, 35)));
        assert_eq!(tree.z(child), Some(97));

        tree.set_offset(root, IVec2::new(-10, -20));
        assert_eq!(tree.position(child), Some(IVec2::new(5, 5)));
        assert_eq!(tree.position(root), Some(IVec2::new(10, 20)), "offset moves children only");
    }

    #[test]
    fn test_visibility_composition() {
        let mut tree = ViewTree::new();
        let parent = tree.insert(None);
        let child1 = tree.insert(Some(parent));
        let grandchild1 = tree.insert(Some(child1));

        tree.set_visible(child1, false);
        tree.set_visible(grandchild1, true);

        assert_eq!(tree.visible(parent), Some(true));
        assert_eq!(tree.visible(child1), Some(false));
        assert_eq!(tree.visible(grandchild1), Some(false));

        tree.set_visible(child1, true);
        tree.set_visible(parent, false);
        assert_eq!(tree.visible(grandchild1), Some(false));
    }

    #[test]
    fn test_retirement_propagates_down() {
        let mut tree = ViewTree::new();
        let parent = tree.insert(None);
        let child = tree.insert(Some(parent));

        assert_eq!(tree.retired(child), Some(false));
        tree.set_retired(parent, true);
        assert_eq!(tree.retired(child), Some(true));
    }

    #[test]
    fn test_set_size_does_not_invalidate() {
        let mut tree = ViewTree::new();
        let parent = tree.insert_with_bounds(None, Rect::from_coords(4, 4, 8, 8));
        let child = tree.insert_with_bounds(Some(parent), Rect::from_coords(1, 1, 2, 2));
        tree.bounds(child);

        tree.set_size(parent, IVec2::new(40, 40));

        assert!(tree.is_valid(parent));
        assert!(tree.is_valid(child));
        assert_eq!(tree.bounds(parent), Some(Rect::from_coords(4, 4, 44, 44)));
        assert_eq!(tree.bounds(child), Some(Rect::from_coords(5, 5, 6, 6)));
    }

    #[test]
    fn test_dispose_frees_subtree() {
        let mut tree = ViewTree::new();
        let root = tree.insert(None);
        let a = tree.insert(Some(root));
        let b = tree.insert(Some(a));
        let c = tree.insert(Some(a));

        tree.dispose(a);

        assert!(tree.is_alive(root));
        for id in [a, b, c] {
            assert!(!tree.is_alive(id));
            assert_eq!(tree.retired(id), None);
        }
        assert!(tree.children(root).is_empty());

        // Reused slots get a fresh generation.
        let d = tree.insert(Some(root));
        assert_ne!(d, a);
        assert!(!tree.is_alive(a));
        assert_eq!(tree.len(), 2);
    }

    #[test]
    #[should_panic(expected = "own descendant")]
    fn test_cycle_rejected() {
        let mut tree = ViewTree::new();
        let a = tree.insert(None);
        let b = tree.insert(Some(a));
        tree.set_parent(a, Some(b));
    }

    #[derive(Debug, Clone)]
    enum Op {
        Bounds(usize, i32, i32),
        Z(usize, i32),
        Visible(usize, bool),
        Retired(usize, bool),
        Offset(usize, i32, i32),
        Parent(usize, Option<usize>),
        Read(usize),
    }

    const N: usize = 6;

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0..N, -50..50, -50..50).prop_map(|(i, x, y)| Op::Bounds(i, x, y)),
            (0..N, -5..5).prop_map(|(i, z)| Op::Z(i, z)),
            (0..N, any::<bool>()).prop_map(|(i, b)| Op::Visible(i, b)),
            (0..N, any::<bool>()).prop_map(|(i, b)| Op::Retired(i, b)),
            (0..N, -9..9, -9..9).prop_map(|(i, x, y)| Op::Offset(i, x, y)),
            (0..N, proptest::option::of(0..N)).prop_map(|(i, p)| Op::Parent(i, p)),
            (0..N).prop_map(Op::Read),
        ]
    }

    /// Absolute values computed from scratch, ignoring every cache.
    fn oracle(tree: &ViewTree, id: ViewId) -> Resolved {
        let n = tree.node(id).unwrap();
        match n.parent {
            None => Resolved {
                bounds: n.bounds,
                origin: n.bounds.ul + n.offset,
                z: n.z,
                invisible: n.invisible,
                retired: n.retired,
            },
            Some(p) => {
                let parent = oracle(tree, p);
                let bounds = n.bounds.translate(parent.origin);
                Resolved {
                    bounds,
                    origin: bounds.ul + n.offset,
                    z: n.z + parent.z,
                    invisible: n.invisible || parent.invisible,
                    retired: n.retired || parent.retired,
                }
            }
        }
    }

    proptest! {
        #[test]
        fn prop_valid_caches_are_exact(ops in proptest::collection::vec(op(), 1..60)) {
            let mut tree = ViewTree::new();
            let ids: Vec<ViewId> = (0..N).map(|_| tree.insert(None)).collect();

            for op in ops {
                match op {
                    Op::Bounds(i, x, y) => tree.set_bounds(ids[i], Rect::from_coords(x, y, x + 3, y + 3)),
                    Op::Z(i, z) => tree.set_z(ids[i], z),
                    Op::Visible(i, b) => tree.set_visible(ids[i], b),
                    Op::Retired(i, b) => tree.set_retired(ids[i], b),
                    Op::Offset(i, x, y) => tree.set_offset(ids[i], IVec2::new(x, y)),
                    Op::Parent(i, p) => {
                        let p = p.map(|p| ids[p]);
                        if p.map_or(true, |p| !tree.is_self_or_ancestor(ids[i], p)) {
                            tree.set_parent(ids[i], p);
                            prop_assert!(!tree.is_valid(ids[i]));
                        }
                    }
                    Op::Read(i) => {
                        tree.z(ids[i]);
                        let mut at = Some(ids[i]);
                        while let Some(v) = at {
                            prop_assert!(tree.is_valid(v), "ancestors of a read view are valid");
                            at = tree.parent(v);
                        }
                    }
                }
                for &id in &ids {
                    // A valid child implies a valid parent.
                    if tree.is_valid(id) {
                        if let Some(p) = tree.parent(id) {
                            prop_assert!(tree.is_valid(p));
                        }
                        prop_assert_eq!(tree.node(id).unwrap().cache.get(), oracle(&tree, id));
                    }
                }
            }
            for &id in &ids {
                prop_assert_eq!(tree.bounds(id), Some(oracle(&tree, id).bounds));
                prop_assert_eq!(tree.visible(id), Some(!oracle(&tree, id).invisible));
            }
        }
    }
}
