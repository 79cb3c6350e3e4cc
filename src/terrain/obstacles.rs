//! Obstacle and path graph generation.
//!
//! Blocking tiles are outlined by scanning every row boundary and every
//! column boundary. The outline is fattened by the mover's footprint so the
//! mover can be treated as a point. Convex corners of the outline, pushed one
//! pixel further out, become the vertices of the path graph.

use ahash::AHashSet;
use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::core::types::Rect;
use crate::terrain::graph::Graph;

const UL: IVec2 = IVec2::new(-1, -1);
const UR: IVec2 = IVec2::new(1, -1);
const DL: IVec2 = IVec2::new(-1, 1);
const DR: IVec2 = IVec2::new(1, 1);

/// The two navigation graphs of a level.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelGraphs {
    /// Directed outline of everything that blocks, fattened.
    pub obstacles: Graph,
    /// Undirected edges between convex corners that can see each other.
    pub paths: Graph,
}

/// Fattening applied to obstacles: the inverse of a mover's footprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fattening {
    pub ul: IVec2,
    pub dr: IVec2,
}

impl Fattening {
    /// Fattening for a mover whose ground area is `footprint` relative to its
    /// position: obstacles grow by the footprint mirrored through the origin.
    pub fn from_footprint(footprint: Rect) -> Self {
        Self {
            ul: -footprint.dr,
            dr: -footprint.ul,
        }
    }

    fn ur(&self) -> IVec2 {
        IVec2::new(self.dr.x, self.ul.y)
    }

    fn dl(&self) -> IVec2 {
        IVec2::new(self.ul.x, self.dr.y)
    }
}

/// Inputs to [`obstacles_and_paths`].
pub struct ObstacleMap<'a, F: Fn(i32, i32) -> bool> {
    /// Blocking predicate over tile coordinates. Must be true outside the map.
    pub blocked: F,
    /// Map size in tiles.
    pub size: IVec2,
    pub tile_size: i32,
    /// Obstacle boxes in world pixels, e.g. doodad bases.
    pub boxes: &'a [Rect],
}

/// Build the obstacle graph and the path graph.
///
/// Path edges longer than `max_span` in either axis are left out, as are
/// edges that touch any obstacle edge. The pairwise check is quadratic in the
/// number of convex corners, which stays small next to the tile count.
pub fn obstacles_and_paths<F: Fn(i32, i32) -> bool>(
    map: &ObstacleMap<'_, F>,
    fat: Fattening,
    max_span: IVec2,
) -> LevelGraphs {
    let mut o = Graph::new();
    let mut verts = AHashSet::new();
    scan_rows(map, fat, &mut o, &mut verts);
    scan_columns(map, fat, &mut o, &mut verts);

    for b in map.boxes {
        let u = b.ul + fat.ul;
        let v = b.dr + fat.dr;
        let uv = IVec2::new(u.x, v.y);
        let vu = IVec2::new(v.x, u.y);
        o.add_edge(u, uv);
        o.add_edge(uv, v);
        o.add_edge(v, vu);
        o.add_edge(vu, u);
        verts.insert(u + UL);
        verts.insert(uv + DL);
        verts.insert(v + DR);
        verts.insert(vu + UR);
    }
    tracing::debug!(edges = o.edge_count(), "generated obstacle edges");

    let mut verts: Vec<IVec2> = verts.into_iter().collect();
    verts.sort_by_key(|v| (v.x, v.y));
    let mut p = Graph::new();
    for (i, &u) in verts.iter().enumerate() {
        for &v in &verts[i + 1..] {
            let span = (u - v).abs();
            if span.x > max_span.x || span.y > max_span.y {
                continue;
            }
            // Either direction: u may sit inside another obstacle.
            if o.fully_blocks(u, v) {
                continue;
            }
            p.add_undirected(u, v);
        }
    }
    tracing::debug!(
        vertices = verts.len(),
        edges = p.edge_count() / 2,
        "generated path edges"
    );

    LevelGraphs {
        obstacles: o,
        paths: p,
    }
}

/// Horizontal outline edges, one row boundary at a time.
///
/// `up` and `down` are the blocking states of the tiles above and below the
/// boundary; `u` is the start of the edge being traced.
fn scan_rows<F: Fn(i32, i32) -> bool>(
    map: &ObstacleMap<'_, F>,
    fat: Fattening,
    o: &mut Graph,
    verts: &mut AHashSet<IVec2>,
) {
    for j in 0..=map.size.y {
        let (mut up, mut down) = (true, true);
        let mut u = IVec2::ZERO;
        for i in 0..map.size.x {
            let ut = IVec2::new(i, j) * map.tile_size;
            let cup = (map.blocked)(i, j - 1);
            let cdown = (map.blocked)(i, j);
            if up != cup || down != cdown {
                // Close an edge along the bottom of a blocked run.
                if up && !down {
                    let v = if cdown {
                        ut + fat.dl()
                    } else {
                        let v = ut + fat.dr;
                        verts.insert(v + DR);
                        v
                    };
                    o.add_edge(u, v);
                }
                // Close an edge along the top of a blocked run.
                if !up && down {
                    let v = if cup {
                        ut + fat.ul
                    } else {
                        let v = ut + fat.ur();
                        verts.insert(v + UR);
                        v
                    };
                    o.add_edge(v, u);
                }
                // Open an edge along the bottom.
                if cup && !cdown {
                    u = if down {
                        ut + fat.dr
                    } else {
                        let u = ut + fat.dl();
                        verts.insert(u + DL);
                        u
                    };
                }
                // Open an edge along the top.
                if !cup && cdown {
                    u = if up {
                        ut + fat.ur()
                    } else {
                        let u = ut + fat.ul;
                        verts.insert(u + UL);
                        u
                    };
                }
            }
            (up, down) = (cup, cdown);
        }
        // A run still open at the right edge of the map closes against the
        // out-of-bounds tiles, unless its blocked side is out of bounds too.
        let ut = IVec2::new(map.size.x, j) * map.tile_size;
        if up && !down && j >= 1 {
            o.add_edge(u, ut + fat.dl());
        }
        if !up && down && j < map.size.y {
            o.add_edge(ut + fat.ul, u);
        }
    }
}

/// Vertical outline edges, one column boundary at a time.
fn scan_columns<F: Fn(i32, i32) -> bool>(
    map: &ObstacleMap<'_, F>,
    fat: Fattening,
    o: &mut Graph,
    verts: &mut AHashSet<IVec2>,
) {
    for i in 0..=map.size.x {
        let (mut left, mut right) = (true, true);
        let mut u = IVec2::ZERO;
        for j in 0..map.size.y {
            let ut = IVec2::new(i, j) * map.tile_size;
            let cleft = (map.blocked)(i - 1, j);
            let cright = (map.blocked)(i, j);
            if left != cleft || right != cright {
                // Close an edge along the right side of a blocked run.
                if left && !right {
                    let v = if cright {
                        ut + fat.ur()
                    } else {
                        let v = ut + fat.dr;
                        verts.insert(v + DR);
                        v
                    };
                    o.add_edge(v, u);
                }
                // Close an edge along the left side.
                if !left && right {
                    let v = if cleft {
                        ut + fat.ul
                    } else {
                        let v = ut + fat.dl();
                        verts.insert(v + DL);
                        v
                    };
                    o.add_edge(u, v);
                }
                // Open an edge along the right side.
                if cleft && !cright {
                    u = if right {
                        ut + fat.dr
                    } else {
                        let u = ut + fat.ur();
                        verts.insert(u + UR);
                        u
                    };
                }
                // Open an edge along the left side.
                if !cleft && cright {
                    u = if left {
                        ut + fat.dl()
                    } else {
                        let u = ut + fat.ul;
                        verts.insert(u + UL);
                        u
                    };
                }
            }
            (left, right) = (cleft, cright);
        }
        // Same for runs reaching the bottom edge.
        let ut = IVec2::new(i, map.size.y) * map.tile_size;
        if left && !right && i >= 1 {
            o.add_edge(ut + fat.ur(), u);
        }
        if !left && right && i < map.size.x {
            o.add_edge(u, ut + fat.ul);
        }
    }
}
