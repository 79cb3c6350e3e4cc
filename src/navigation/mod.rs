//! Route finding over the level graphs.

pub mod pathfinding;

pub use pathfinding::{find_path, path_length};

use glam::IVec2;

use crate::core::types::Rect;
use crate::terrain::graph::Graph;
use crate::terrain::obstacles::LevelGraphs;

/// Answers "how do I get there" for clicks on the map.
#[derive(Debug, Clone, Default)]
pub struct Navigator {
    obstacles: Graph,
    paths: Graph,
}

impl From<LevelGraphs> for Navigator {
    fn from(g: LevelGraphs) -> Self {
        Self::new(g.obstacles, g.paths)
    }
}

impl Navigator {
    pub fn new(obstacles: Graph, paths: Graph) -> Self {
        Self { obstacles, paths }
    }

    pub fn obstacles(&self) -> &Graph {
        &self.obstacles
    }

    pub fn paths(&self) -> &Graph {
        &self.paths
    }

    /// Route from `from` towards `to` using path vertices inside `limit`.
    ///
    /// Never fails. If `to` is unreachable, head for the point just outside
    /// the obstacle edge nearest to it. If that is unreachable too, walk
    /// straight at `to` and stop one pixel short of the first obstacle.
    pub fn navigate(&self, from: IVec2, to: IVec2, limit: Rect) -> Vec<IVec2> {
        let path = find_path(&self.obstacles, &self.paths, from, to, limit)
            .or_else(|| {
                let (edge, q) = self.obstacles.nearest_point(to)?;
                let q = q + edge.normal().signum();
                tracing::debug!(?edge, point = %q, "target unreachable, trying nearest edge");
                find_path(&self.obstacles, &self.paths, from, q, limit)
            })
            .unwrap_or_else(|| {
                let stop = match self.obstacles.nearest_block(from, to) {
                    Some(p) => p - (p - from).signum(),
                    None => to,
                };
                tracing::debug!(point = %stop, "walking until blocked");
                vec![stop]
            });
        tracing::debug!(?path, "path");
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::obstacles::{obstacles_and_paths, Fattening, ObstacleMap};

    fn v(x: i32, y: i32) -> IVec2 {
        IVec2::new(x, y)
    }

    fn screen() -> Rect {
        Rect::from_coords(0, 0, 267, 150)
    }

    /// 12x12 tiles of 16px; a one-tile-thick ring of blocked tiles around (5, 5).
    fn ring() -> Navigator {
        let blocked = |x: i32, y: i32| {
            if !(0..12).contains(&x) || !(0..12).contains(&y) {
                return true;
            }
            (4..=6).contains(&x) && (4..=6).contains(&y) && (x, y) != (5, 5)
        };
        let map = ObstacleMap {
            blocked,
            size: v(12, 12),
            tile_size: 16,
            boxes: &[],
        };
        let fat = Fattening::from_footprint(Rect::from_coords(-2, -2, 2, 2));
        obstacles_and_paths(&map, fat, v(267, 150)).into()
    }

    #[test]
    fn test_ring_outline() {
        let nav = ring();
        // Outer box 62..114, inner hole 82..94, four sides each.
        assert_eq!(nav.obstacles().edge_count(), 8);
        assert!(nav.obstacles().contains(v(114, 62), v(62, 62)));
        assert!(nav.obstacles().contains(v(82, 82), v(94, 82)));
        assert_eq!(
            nav.paths().vertices(),
            vec![v(61, 61), v(61, 115), v(115, 61), v(115, 115)]
        );
    }

    #[test]
    fn test_reachable_target_uses_graph() {
        let nav = ring();
        let path = nav.navigate(v(40, 88), v(136, 88), screen());
        assert_eq!(path.last(), Some(&v(136, 88)));
        assert_eq!(path.len(), 3);
    }

    #[test]
    fn test_enclosed_target_stops_outside_ring() {
        let nav = ring();
        let from = v(0, 0);
        let to = v(88, 88);

        let path = nav.navigate(from, to, screen());

        assert_eq!(path, vec![v(61, 61)]);
        let last = *path.last().unwrap();
        let before = (to - from).as_vec2().length();
        let after = (to - last).as_vec2().length();
        assert!(after < before);
        let inside_ring = (62..=114).contains(&last.x) && (62..=114).contains(&last.y);
        assert!(!inside_ring);
    }

    #[test]
    fn test_unreachable_target_near_reachable_edge() {
        // A lone blocked tile: clicking its centre leads next to its nearest side.
        let map = ObstacleMap {
            blocked: |x: i32, y: i32| (x, y) == (1, 1) || !(0..4).contains(&x) || !(0..4).contains(&y),
            size: v(4, 4),
            tile_size: 16,
            boxes: &[],
        };
        let fat = Fattening::from_footprint(Rect::from_coords(-2, -2, 2, 2));
        let nav: Navigator = obstacles_and_paths(&map, fat, v(267, 150)).into();

        // Box is 14..34; (24, 17) is nearest the top side at y = 14.
        let path = nav.navigate(v(24, 2), v(24, 17), screen());

        assert_eq!(path, vec![v(24, 13)]);
    }
}
