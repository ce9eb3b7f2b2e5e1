// SPDX-License-Identifier: MIT

//! Spatial index over instance bounding boxes.
//!
//! A bounding-box tree held in a flat node arena: leaves carry
//! `(NameId, BBox)` entries, inner nodes carry child indices and the
//! union box of their subtree. `build` bulk-loads with sort-tile
//! packing; `insert` descends by least enlargement and splits full
//! nodes at the median. There is no delete or update: the index is
//! rebuilt wholesale whenever a design is reloaded.

use std::cmp::Ordering;

use crate::geom::BBox;
use crate::interner::NameId;

const MAX_ENTRIES: usize = 8;

#[derive(Debug, Clone, Copy)]
struct Entry {
    key: NameId,
    bbox: BBox,
}

#[derive(Debug, Clone)]
enum NodeKind {
    Leaf(Vec<Entry>),
    Inner(Vec<usize>),
}

#[derive(Debug, Clone)]
struct Node {
    bbox: BBox,
    kind: NodeKind,
}

#[derive(Debug, Default)]
pub struct RTree {
    nodes: Vec<Node>,
    root: Option<usize>,
    len: usize,
}

fn cmp_center(a: &BBox, b: &BBox, horizontal: bool) -> Ordering {
    let (ax, ay) = a.center();
    let (bx, by) = b.center();
    let (a, b) = if horizontal { (ax, bx) } else { (ay, by) };
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

fn union_of<I: Iterator<Item = BBox>>(mut boxes: I) -> BBox {
    let first = boxes.next().expect("union of empty box set");
    boxes.fold(first, |acc, b| acc.union(&b))
}

impl RTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bulk-load the index with sort-tile packing: entries are sorted
    /// by x-center into vertical slices, each slice sorted by y-center
    /// and cut into leaves, then levels of inner nodes are stacked on
    /// top until a single root remains.
    pub fn build(items: &[(NameId, BBox)]) -> Self {
        let mut tree = Self::new();
        if items.is_empty() {
            return tree;
        }

        let mut entries: Vec<Entry> = items
            .iter()
            .map(|&(key, bbox)| Entry { key, bbox })
            .collect();
        entries.sort_by(|a, b| cmp_center(&a.bbox, &b.bbox, true));

        let leaf_count = entries.len().div_ceil(MAX_ENTRIES);
        let slice_count = (leaf_count as f64).sqrt().ceil() as usize;
        let slice_len = entries.len().div_ceil(slice_count);

        let mut level: Vec<usize> = Vec::new();
        for slice in entries.chunks_mut(slice_len) {
            slice.sort_by(|a, b| cmp_center(&a.bbox, &b.bbox, false));
            for run in slice.chunks(MAX_ENTRIES) {
                let bbox = union_of(run.iter().map(|e| e.bbox));
                tree.nodes.push(Node {
                    bbox,
                    kind: NodeKind::Leaf(run.to_vec()),
                });
                level.push(tree.nodes.len() - 1);
            }
        }

        while level.len() > 1 {
            let mut next = Vec::new();
            for run in level.chunks(MAX_ENTRIES) {
                let bbox = union_of(run.iter().map(|&i| tree.nodes[i].bbox));
                tree.nodes.push(Node {
                    bbox,
                    kind: NodeKind::Inner(run.to_vec()),
                });
                next.push(tree.nodes.len() - 1);
            }
            level = next;
        }

        tree.root = Some(level[0]);
        tree.len = items.len();
        tree
    }

    /// Add one entry. Descends into the child whose box grows least,
    /// splitting overfull nodes at the median of their longer axis.
    pub fn insert(&mut self, key: NameId, bbox: BBox) {
        self.len += 1;
        let entry = Entry { key, bbox };

        let Some(root) = self.root else {
            self.nodes.push(Node {
                bbox,
                kind: NodeKind::Leaf(vec![entry]),
            });
            self.root = Some(self.nodes.len() - 1);
            return;
        };

        let mut path = vec![root];
        loop {
            let idx = *path.last().expect("path never empty");
            match &self.nodes[idx].kind {
                NodeKind::Leaf(_) => break,
                NodeKind::Inner(children) => {
                    let mut best = children[0];
                    let mut best_growth = f64::INFINITY;
                    let mut best_area = f64::INFINITY;
                    for &c in children {
                        let cb = self.nodes[c].bbox;
                        let growth = cb.enlargement(&bbox);
                        let area = cb.area();
                        if growth < best_growth || (growth == best_growth && area < best_area) {
                            best = c;
                            best_growth = growth;
                            best_area = area;
                        }
                    }
                    path.push(best);
                }
            }
        }

        let leaf = *path.last().expect("path never empty");
        if let NodeKind::Leaf(entries) = &mut self.nodes[leaf].kind {
            entries.push(entry);
        }
        for &idx in &path {
            self.nodes[idx].bbox = self.nodes[idx].bbox.union(&bbox);
        }

        // Propagate splits from the leaf toward the root.
        let mut depth = path.len();
        while depth > 0 {
            depth -= 1;
            let idx = path[depth];
            if self.node_len(idx) <= MAX_ENTRIES {
                break;
            }
            let sibling = self.split(idx);
            if depth == 0 {
                let bbox = self.nodes[idx].bbox.union(&self.nodes[sibling].bbox);
                self.nodes.push(Node {
                    bbox,
                    kind: NodeKind::Inner(vec![idx, sibling]),
                });
                self.root = Some(self.nodes.len() - 1);
            } else {
                let parent = path[depth - 1];
                if let NodeKind::Inner(children) = &mut self.nodes[parent].kind {
                    children.push(sibling);
                }
                // The parent box already covered the pre-split node.
            }
        }
    }

    /// Keys of all entries whose box intersects `window`. Boundary
    /// touches count as intersecting.
    pub fn query(&self, window: &BBox) -> Vec<NameId> {
        let mut out = Vec::new();
        if let Some(root) = self.root {
            self.collect(root, window, &mut out);
        }
        out
    }

    /// Minimal box covering every entry; `None` when empty.
    pub fn bounds(&self) -> Option<BBox> {
        self.root.map(|r| self.nodes[r].bbox)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn collect(&self, idx: usize, window: &BBox, out: &mut Vec<NameId>) {
        let node = &self.nodes[idx];
        if !node.bbox.intersects(window) {
            return;
        }
        match &node.kind {
            NodeKind::Leaf(entries) => {
                for e in entries {
                    if e.bbox.intersects(window) {
                        out.push(e.key);
                    }
                }
            }
            NodeKind::Inner(children) => {
                for &c in children {
                    self.collect(c, window, out);
                }
            }
        }
    }

    fn node_len(&self, idx: usize) -> usize {
        match &self.nodes[idx].kind {
            NodeKind::Leaf(entries) => entries.len(),
            NodeKind::Inner(children) => children.len(),
        }
    }

    /// Split node `idx` at the median of its longer axis; the node
    /// keeps the lower half and the new sibling index is returned.
    fn split(&mut self, idx: usize) -> usize {
        let horizontal = self.nodes[idx].bbox.width() >= self.nodes[idx].bbox.height();
        let kind = std::mem::replace(&mut self.nodes[idx].kind, NodeKind::Leaf(Vec::new()));
        match kind {
            NodeKind::Leaf(mut entries) => {
                entries.sort_by(|a, b| cmp_center(&a.bbox, &b.bbox, horizontal));
                let upper = entries.split_off(entries.len() / 2);
                self.nodes[idx] = Node {
                    bbox: union_of(entries.iter().map(|e| e.bbox)),
                    kind: NodeKind::Leaf(entries),
                };
                self.nodes.push(Node {
                    bbox: union_of(upper.iter().map(|e| e.bbox)),
                    kind: NodeKind::Leaf(upper),
                });
            }
            NodeKind::Inner(mut children) => {
                children
                    .sort_by(|&a, &b| cmp_center(&self.nodes[a].bbox, &self.nodes[b].bbox, horizontal));
                let upper = children.split_off(children.len() / 2);
                self.nodes[idx] = Node {
                    bbox: union_of(children.iter().map(|&c| self.nodes[c].bbox)),
                    kind: NodeKind::Inner(children),
                };
                let bbox = union_of(upper.iter().map(|&c| self.nodes[c].bbox));
                self.nodes.push(Node {
                    bbox,
                    kind: NodeKind::Inner(upper),
                });
            }
        }
        self.nodes.len() - 1
    }
}
