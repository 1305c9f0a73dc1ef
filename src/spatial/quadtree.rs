//! Region quadtree over item envelopes.
//!
//! Items are stored at the deepest node whose bounds fully contain their
//! envelope, up to `max_levels` below the root. Point queries return every
//! item whose envelope covers the point, in insertion order within a node and
//! root-to-leaf across nodes.

use crate::geometry::{Coordinate, Envelope};

#[derive(Debug)]
struct QuadNode {
    bounds: Envelope,
    items: Vec<(usize, Envelope)>,
    children: Option<Box<[QuadNode; 4]>>,
}

impl QuadNode {
    fn new(bounds: Envelope) -> Self {
        Self {
            bounds,
            items: Vec::new(),
            children: None,
        }
    }

    fn subdivide(&mut self) {
        let [sw, se, nw, ne] = self.bounds.quadrants();
        self.children = Some(Box::new([
            QuadNode::new(sw),
            QuadNode::new(se),
            QuadNode::new(nw),
            QuadNode::new(ne),
        ]));
    }

    fn insert(&mut self, id: usize, env: Envelope, depth_left: usize) {
        if depth_left > 0 {
            if self.children.is_none() {
                self.subdivide();
            }
            if let Some(children) = self.children.as_mut() {
                if let Some(child) = children.iter_mut().find(|c| c.bounds.contains(&env)) {
                    child.insert(id, env, depth_left - 1);
                    return;
                }
            }
        }
        self.items.push((id, env));
    }

    fn query_point(&self, p: Coordinate, out: &mut Vec<usize>) {
        out.extend(
            self.items
                .iter()
                .filter(|(_, env)| env.covers(p))
                .map(|(id, _)| *id),
        );
        if let Some(children) = &self.children {
            // Shared edges: a point on a quadrant boundary may be covered by
            // items in either neighbour.
            for child in children.iter().filter(|c| c.bounds.covers(p)) {
                child.query_point(p, out);
            }
        }
    }
}

/// Quadtree of `usize` item ids keyed by envelope.
#[derive(Debug)]
pub struct QuadTree {
    root: QuadNode,
    max_levels: usize,
    len: usize,
}

impl QuadTree {
    /// Empty tree covering `bounds`, subdividing at most `max_levels` times.
    pub fn new(bounds: Envelope, max_levels: usize) -> Self {
        Self {
            root: QuadNode::new(bounds),
            max_levels,
            len: 0,
        }
    }

    /// Depth for `item_count` items: `ceil(factor * log2(n))`, at least 1.
    pub fn levels_for(item_count: usize, factor: f64) -> usize {
        if item_count < 2 {
            return 1;
        }
        let levels = (factor * (item_count as f64).log2()).ceil();
        (levels as usize).max(1)
    }

    /// Insert an item. Envelopes outside the root bounds are kept at the root.
    pub fn insert(&mut self, id: usize, env: Envelope) {
        self.root.insert(id, env, self.max_levels);
        self.len += 1;
    }

    /// Ids of items whose envelope covers `p`.
    pub fn query_point(&self, p: Coordinate) -> Vec<usize> {
        let mut out = Vec::new();
        self.root.query_point(p, &mut out);
        out
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn max_levels(&self) -> usize {
        self.max_levels
    }
}
