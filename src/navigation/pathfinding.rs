//! A* over the path graph.
//!
//! Start and goal are not graph vertices; they are joined to every vertex
//! they can see. Visibility uses one-sided blocking, so a mover standing
//! inside an obstacle can still walk out of it.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use ahash::{AHashMap, AHashSet};
use glam::IVec2;
use ordered_float::OrderedFloat;

use crate::core::types::Rect;
use crate::terrain::graph::Graph;

/// Node in the A* open set
#[derive(Debug, Clone)]
struct PathNode {
    pos: IVec2,
    f_cost: OrderedFloat<f64>, // g_cost + heuristic
}

impl PartialEq for PathNode {
    fn eq(&self, other: &Self) -> bool {
        self.pos == other.pos
    }
}

impl Eq for PathNode {}

impl Ord for PathNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order for min-heap
        other.f_cost.cmp(&self.f_cost)
    }
}

impl PartialOrd for PathNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn distance(a: IVec2, b: IVec2) -> f64 {
    (b - a).as_dvec2().length()
}

/// Inclusive containment: vertices on the window border count.
fn in_limit(limit: Rect, p: IVec2) -> bool {
    p.cmpge(limit.ul).all() && p.cmple(limit.dr).all()
}

/// Find a route from `from` to `to`.
///
/// Only path vertices inside `limit` are used. The returned path excludes
/// `from` and ends at `to`. Returns `None` if `to` cannot be reached.
pub fn find_path(
    obstacles: &Graph,
    paths: &Graph,
    from: IVec2,
    to: IVec2,
    limit: Rect,
) -> Option<Vec<IVec2>> {
    if !obstacles.blocks(from, to) {
        return Some(vec![to]);
    }

    let usable: Vec<IVec2> = paths
        .vertices()
        .into_iter()
        .filter(|&v| in_limit(limit, v))
        .collect();
    let sees_goal: AHashSet<IVec2> = usable
        .iter()
        .copied()
        .filter(|&v| !obstacles.blocks(v, to))
        .collect();
    if sees_goal.is_empty() {
        return None;
    }

    let mut open_set = BinaryHeap::new();
    let mut came_from: AHashMap<IVec2, IVec2> = AHashMap::new();
    let mut g_scores: AHashMap<IVec2, f64> = AHashMap::new();

    g_scores.insert(from, 0.0);
    open_set.push(PathNode {
        pos: from,
        f_cost: OrderedFloat(distance(from, to)),
    });

    while let Some(current) = open_set.pop() {
        if current.pos == to {
            return Some(reconstruct_path(&came_from, from, to));
        }

        let current_g = *g_scores.get(&current.pos).unwrap_or(&f64::INFINITY);

        let mut neighbors: Vec<IVec2> = if current.pos == from {
            usable
                .iter()
                .copied()
                .filter(|&v| !obstacles.blocks(from, v))
                .collect()
        } else {
            paths
                .neighbors(current.pos)
                .iter()
                .copied()
                .filter(|&v| in_limit(limit, v))
                .collect()
        };
        if sees_goal.contains(&current.pos) {
            neighbors.push(to);
        }

        for neighbor in neighbors {
            let tentative_g = current_g + distance(current.pos, neighbor);
            let neighbor_g = *g_scores.get(&neighbor).unwrap_or(&f64::INFINITY);

            if tentative_g < neighbor_g {
                came_from.insert(neighbor, current.pos);
                g_scores.insert(neighbor, tentative_g);

                open_set.push(PathNode {
                    pos: neighbor,
                    f_cost: OrderedFloat(tentative_g + distance(neighbor, to)),
                });
            }
        }
    }

    None // No path found
}

/// Walk `came_from` back from `to`, leaving out `from`.
fn reconstruct_path(came_from: &AHashMap<IVec2, IVec2>, from: IVec2, to: IVec2) -> Vec<IVec2> {
    let mut path = vec![to];
    let mut current = to;
    while let Some(&prev) = came_from.get(&current) {
        if prev == from {
            break;
        }
        path.push(prev);
        current = prev;
    }
    path.reverse();
    path
}

/// Total length of a path starting at `from`.
pub fn path_length(from: IVec2, path: &[IVec2]) -> f64 {
    let mut last = from;
    path.iter()
        .map(|&p| {
            let d = distance(last, p);
            last = p;
            d
        })
        .sum()
}
