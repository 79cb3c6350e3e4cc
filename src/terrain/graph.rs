//! Integer edge graphs for obstacles and paths.
//!
//! Obstacle edges are directed: walking from `u` to `v`, the free side is
//! the one [`Edge::normal`] points to and the solid side is opposite. That
//! lets a segment leaving an obstacle pass while one entering it is blocked.

use ahash::{AHashMap, AHashSet};
use glam::IVec2;
use serde::{Deserialize, Serialize};

fn cross(a: IVec2, b: IVec2) -> i64 {
    a.x as i64 * b.y as i64 - a.y as i64 * b.x as i64
}

fn dot(a: IVec2, b: IVec2) -> i64 {
    a.x as i64 * b.x as i64 + a.y as i64 * b.y as i64
}

/// Sign of the turn a -> b -> c.
fn orient(a: IVec2, b: IVec2, c: IVec2) -> i64 {
    cross(b - a, c - a).signum()
}

/// True if `p`, known to be collinear with `a`-`b`, lies within its box.
fn within(a: IVec2, b: IVec2, p: IVec2) -> bool {
    p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
}

fn dist2(a: IVec2, b: IVec2) -> i64 {
    let d = b - a;
    dot(d, d)
}

fn round(x: f64, y: f64) -> IVec2 {
    IVec2::new(x.round() as i32, y.round() as i32)
}

/// Directed segment between two integer points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub u: IVec2,
    pub v: IVec2,
}

impl Edge {
    pub const fn new(u: IVec2, v: IVec2) -> Self {
        Self { u, v }
    }

    fn sort_key(&self) -> (i32, i32, i32, i32) {
        (self.u.x, self.u.y, self.v.x, self.v.y)
    }

    /// Perpendicular to the edge, pointing to the free side. Not normalised.
    pub fn normal(&self) -> IVec2 {
        let d = self.v - self.u;
        IVec2::new(-d.y, d.x)
    }

    /// True if segment `p`-`q` touches this edge anywhere.
    pub fn intersects(&self, p: IVec2, q: IVec2) -> bool {
        let (a, b) = (self.u, self.v);
        let d1 = orient(a, b, p);
        let d2 = orient(a, b, q);
        let d3 = orient(p, q, a);
        let d4 = orient(p, q, b);
        if d1 * d2 < 0 && d3 * d4 < 0 {
            return true;
        }
        (d1 == 0 && within(a, b, p))
            || (d2 == 0 && within(a, b, q))
            || (d3 == 0 && within(p, q, a))
            || (d4 == 0 && within(p, q, b))
    }

    /// True if moving from `p` to `q` crosses into the solid side.
    ///
    /// Movement out of the solid side, or along the edge, is not blocked.
    pub fn blocks(&self, p: IVec2, q: IVec2) -> bool {
        dot(q - p, self.normal()) < 0 && self.intersects(p, q)
    }

    /// True if segment `p`-`q` touches this edge in either direction.
    pub fn fully_blocks(&self, p: IVec2, q: IVec2) -> bool {
        self.intersects(p, q)
    }

    /// Where segment `p`-`q` meets this edge, rounded to whole pixels.
    ///
    /// For overlapping collinear segments this is the shared point nearest `p`.
    pub fn intersection(&self, p: IVec2, q: IVec2) -> Option<IVec2> {
        if !self.intersects(p, q) {
            return None;
        }
        let r = q - p;
        let s = self.v - self.u;
        let denom = cross(r, s);
        if denom != 0 {
            let t = cross(self.u - p, s) as f64 / denom as f64;
            return Some(round(p.x as f64 + t * r.x as f64, p.y as f64 + t * r.y as f64));
        }
        [p, self.u, self.v]
            .into_iter()
            .filter(|&c| within(self.u, self.v, c) && within(p, q, c))
            .min_by_key(|&c| dist2(p, c))
    }

    /// Point on the edge closest to `p`, rounded to whole pixels.
    pub fn nearest_point(&self, p: IVec2) -> IVec2 {
        let s = self.v - self.u;
        let len2 = dot(s, s);
        if len2 == 0 {
            return self.u;
        }
        let t = (dot(p - self.u, s) as f64 / len2 as f64).clamp(0.0, 1.0);
        round(
            self.u.x as f64 + t * s.x as f64,
            self.u.y as f64 + t * s.y as f64,
        )
    }
}

/// A set of directed edges with adjacency lookup.
///
/// Serialised as a plain edge list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Edge>", into = "Vec<Edge>")]
pub struct Graph {
    edges: AHashSet<Edge>,
    adjacency: AHashMap<IVec2, Vec<IVec2>>,
}

/// Graphs are equal when they hold the same edges, whatever the insertion order.
impl PartialEq for Graph {
    fn eq(&self, other: &Self) -> bool {
        self.edges == other.edges
    }
}

impl Eq for Graph {}

impl From<Vec<Edge>> for Graph {
    fn from(edges: Vec<Edge>) -> Self {
        let mut g = Graph::new();
        for e in edges {
            g.add_edge(e.u, e.v);
        }
        g
    }
}

impl From<Graph> for Vec<Edge> {
    fn from(g: Graph) -> Self {
        g.edges()
    }
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the directed edge `u` -> `v`. Duplicates are ignored.
    pub fn add_edge(&mut self, u: IVec2, v: IVec2) {
        if self.edges.insert(Edge::new(u, v)) {
            self.adjacency.entry(u).or_default().push(v);
        }
    }

    /// Add both `u` -> `v` and `v` -> `u`.
    pub fn add_undirected(&mut self, u: IVec2, v: IVec2) {
        self.add_edge(u, v);
        self.add_edge(v, u);
    }

    pub fn contains(&self, u: IVec2, v: IVec2) -> bool {
        self.edges.contains(&Edge::new(u, v))
    }

    /// Number of directed edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// All edges in a stable order.
    pub fn edges(&self) -> Vec<Edge> {
        let mut edges: Vec<Edge> = self.edges.iter().copied().collect();
        edges.sort_by_key(Edge::sort_key);
        edges
    }

    /// Vertices with at least one outgoing edge, in a stable order.
    pub fn vertices(&self) -> Vec<IVec2> {
        let mut vs: Vec<IVec2> = self.adjacency.keys().copied().collect();
        vs.sort_by_key(|v| (v.x, v.y));
        vs
    }

    pub fn neighbors(&self, u: IVec2) -> &[IVec2] {
        self.adjacency.get(&u).map(Vec::as_slice).unwrap_or(&[])
    }

    /// True if some edge blocks movement from `p` to `q`.
    pub fn blocks(&self, p: IVec2, q: IVec2) -> bool {
        self.edges.iter().any(|e| e.blocks(p, q))
    }

    /// True if some edge touches segment `p`-`q` at all.
    pub fn fully_blocks(&self, p: IVec2, q: IVec2) -> bool {
        self.edges.iter().any(|e| e.fully_blocks(p, q))
    }

    /// The edge nearest to `p` and the nearest point on it.
    pub fn nearest_point(&self, p: IVec2) -> Option<(Edge, IVec2)> {
        self.edges()
            .into_iter()
            .map(|e| (e, e.nearest_point(p)))
            .min_by_key(|&(_, q)| dist2(p, q))
    }

    /// First point along `from` -> `to` where an edge blocks movement.
    pub fn nearest_block(&self, from: IVec2, to: IVec2) -> Option<IVec2> {
        self.edges()
            .into_iter()
            .filter(|e| e.blocks(from, to))
            .filter_map(|e| e.intersection(from, to))
            .min_by_key(|&q| dist2(from, q))
    }
}
