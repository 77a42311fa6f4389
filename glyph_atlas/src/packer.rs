// Copyright 2025 the Glyph Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Guillotine rectangle packer for a single atlas page.
//!
//! The page is described by a binary tree. Every node covers a rectangle of the
//! page; a split node divides its rectangle into two children along one axis.
//! Free leaves are split on demand so that the requested rectangle becomes the
//! top-left child, and the leftover space stays available as siblings.
//!
//! Nodes are never freed one by one. They live in a page-scoped arena and the
//! whole tree is discarded at once by [`Packer::reset`].

/// Index of a node in the packer arena.
type NodeId = u32;

/// The root always occupies the first arena slot.
const ROOT: NodeId = 0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Node {
    /// Available region.
    Free,
    /// Terminal, in-use region.
    Occupied,
    /// Split along the x axis: the first child is `left_width` pixels wide,
    /// the second child takes the remainder.
    SplitX { left_width: u32, children: NodeId },
    /// Split along the y axis: the first child is `top_height` pixels tall,
    /// the second child takes the remainder.
    SplitY { top_height: u32, children: NodeId },
}

/// Node storage for one packer tree.
///
/// Children are bump-allocated as adjacent pairs, so a split only records the
/// index of its first child; the second one follows it.
#[derive(Clone, Debug)]
struct NodeArena {
    nodes: Vec<Node>,
}

impl NodeArena {
    fn new() -> Self {
        let mut nodes = Vec::with_capacity(64);
        nodes.push(Node::Free);
        Self { nodes }
    }

    #[expect(
        clippy::cast_possible_truncation,
        reason = "a page cannot hold more than u32::MAX nodes: every pair consumes at least one pixel"
    )]
    fn alloc_pair(&mut self) -> NodeId {
        let first = self.nodes.len() as NodeId;
        self.nodes.push(Node::Free);
        self.nodes.push(Node::Free);
        first
    }

    #[inline]
    fn get(&self, id: NodeId) -> Node {
        self.nodes[id as usize]
    }

    #[inline]
    fn set(&mut self, id: NodeId, node: Node) {
        self.nodes[id as usize] = node;
    }

    fn reset(&mut self) {
        self.nodes.truncate(1);
        self.nodes[ROOT as usize] = Node::Free;
    }
}

/// Guillotine packer covering one atlas page.
///
/// The packer only tracks geometry; the page dimensions are supplied on every
/// call so the same tree can describe any page size.
#[derive(Clone, Debug)]
pub struct Packer {
    arena: NodeArena,
}

impl Packer {
    /// Creates a packer whose whole area is free.
    pub fn new() -> Self {
        Self {
            arena: NodeArena::new(),
        }
    }

    /// Reserves a `width` x `height` rectangle in a page of
    /// `page_width` x `page_height` pixels.
    ///
    /// Returns the top-left corner of the reserved rectangle, or `None` when no
    /// free region is large enough. A failed reservation leaves the tree
    /// untouched.
    pub fn reserve(
        &mut self,
        width: u32,
        height: u32,
        page_width: u32,
        page_height: u32,
    ) -> Option<(u32, u32)> {
        self.reserve_in(ROOT, width, height, page_width, page_height)
    }

    /// Reserves a `target_w` x `target_h` rectangle inside `node`, whose region
    /// is `cur_w` x `cur_h`. The returned offset is relative to `node`.
    fn reserve_in(
        &mut self,
        node: NodeId,
        target_w: u32,
        target_h: u32,
        cur_w: u32,
        cur_h: u32,
    ) -> Option<(u32, u32)> {
        if cur_w < target_w || cur_h < target_h {
            return None;
        }
        match self.arena.get(node) {
            Node::Occupied => None,
            Node::Free => {
                self.occupy(node, target_w, target_h, cur_w, cur_h);
                Some((0, 0))
            }
            Node::SplitX {
                left_width,
                children,
            } => self
                .reserve_in(children, target_w, target_h, left_width, cur_h)
                .or_else(|| {
                    self.reserve_in(children + 1, target_w, target_h, cur_w - left_width, cur_h)
                        .map(|(x, y)| (x + left_width, y))
                }),
            Node::SplitY {
                top_height,
                children,
            } => self
                .reserve_in(children, target_w, target_h, cur_w, top_height)
                .or_else(|| {
                    self.reserve_in(children + 1, target_w, target_h, cur_w, cur_h - top_height)
                        .map(|(x, y)| (x, y + top_height))
                }),
        }
    }

    /// Carves the target out of the free `node`, splitting the axis with more
    /// leftover space first so the remaining free regions stay closer to square.
    fn occupy(&mut self, node: NodeId, target_w: u32, target_h: u32, cur_w: u32, cur_h: u32) {
        let extra_x = cur_w - target_w;
        let extra_y = cur_h - target_h;

        let mut leaf = node;
        if extra_x > extra_y {
            leaf = self.split_x(leaf, target_w);
            if extra_y > 0 {
                leaf = self.split_y(leaf, target_h);
            }
        } else if extra_y > 0 {
            leaf = self.split_y(leaf, target_h);
            if extra_x > 0 {
                leaf = self.split_x(leaf, target_w);
            }
        }
        self.arena.set(leaf, Node::Occupied);
    }

    /// Splits `node` into a left child `left_width` pixels wide and a right
    /// child; returns the left child.
    fn split_x(&mut self, node: NodeId, left_width: u32) -> NodeId {
        let children = self.arena.alloc_pair();
        self.arena.set(
            node,
            Node::SplitX {
                left_width,
                children,
            },
        );
        children
    }

    /// Splits `node` into a top child `top_height` pixels tall and a bottom
    /// child; returns the top child.
    fn split_y(&mut self, node: NodeId, top_height: u32) -> NodeId {
        let children = self.arena.alloc_pair();
        self.arena.set(
            node,
            Node::SplitY {
                top_height,
                children,
            },
        );
        children
    }

    /// Discards the whole tree; the page becomes entirely free again.
    pub fn reset(&mut self) {
        self.arena.reset();
    }

    /// Returns `true` if nothing has been reserved since creation or the last reset.
    pub fn is_empty(&self) -> bool {
        self.arena.get(ROOT) == Node::Free
    }

    /// Number of nodes currently allocated in the arena.
    pub fn node_count(&self) -> usize {
        self.arena.nodes.len()
    }

    /// Collects every occupied rectangle as `(x, y, width, height)`.
    pub fn occupied_rects(&self, page_width: u32, page_height: u32) -> Vec<(u32, u32, u32, u32)> {
        let mut rects = Vec::new();
        let mut stack = vec![(ROOT, 0, 0, page_width, page_height)];
        while let Some((id, x, y, w, h)) = stack.pop() {
            match self.arena.get(id) {
                Node::Free => {}
                Node::Occupied => rects.push((x, y, w, h)),
                Node::SplitX {
                    left_width,
                    children,
                } => {
                    stack.push((children, x, y, left_width, h));
                    stack.push((children + 1, x + left_width, y, w - left_width, h));
                }
                Node::SplitY {
                    top_height,
                    children,
                } => {
                    stack.push((children, x, y, w, top_height));
                    stack.push((children + 1, x, y + top_height, w, h - top_height));
                }
            }
        }
        rects
    }
}

impl Default for Packer {
    fn default() -> Self {
        Self::new()
    }
}
