use std::collections::VecDeque;

use generational_arena::Index;
use tracing::instrument;

use crate::domain::{BinaryTree, TreeNode};

/// Location of a node relative to the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    /// Distance from the root, root is 0
    pub level: usize,
    /// Horizontal offset: left child is parent - 1, right child parent + 1
    pub width: i64,
}

impl Position {
    fn child(self, width_step: i64) -> Self {
        Self {
            level: self.level + 1,
            width: self.width + width_step,
        }
    }
}

impl BinaryTree {
    /// Breadth-first iterator; each element is a pair (node, position) from the queue.
    #[instrument(level = "trace", skip(self))]
    pub fn iter_breadth_first(&self) -> BreadthFirstIterator<'_> {
        BreadthFirstIterator::new(self)
    }

    /// Calculates the depth of the tree using a breadth-first traversal.
    #[instrument(level = "debug", skip(self))]
    pub fn depth_queue(&self) -> usize {
        self.iter_breadth_first()
            .map(|(_, _, position)| position.level + 1)
            .max()
            .unwrap_or(0)
    }

    /// Smallest and largest width occupied by any node.
    pub fn width_range(&self) -> Option<(i64, i64)> {
        self.iter_breadth_first()
            .map(|(_, _, position)| position.width)
            .fold(None, |range, width| match range {
                None => Some((width, width)),
                Some((lo, hi)) => Some((lo.min(width), hi.max(width))),
            })
    }
}

pub struct BreadthFirstIterator<'a> {
    tree: &'a BinaryTree,
    queue: VecDeque<(Index, Position)>,
}

impl<'a> BreadthFirstIterator<'a> {
    fn new(tree: &'a BinaryTree) -> Self {
        let mut queue = VecDeque::new();
        if let Some(root) = tree.root() {
            queue.push_back((root, Position { level: 0, width: 0 }));
        }
        Self { tree, queue }
    }
}

impl<'a> Iterator for BreadthFirstIterator<'a> {
    type Item = (Index, &'a TreeNode, Position);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((idx, position)) = self.queue.pop_front() {
            if let Some(node) = self.tree.get_node(idx) {
                if let Some(left) = node.left {
                    self.queue.push_back((left, position.child(-1)));
                }
                if let Some(right) = node.right {
                    self.queue.push_back((right, position.child(1)));
                }
                return Some((idx, node, position));
            }
        }
        None
    }
}
