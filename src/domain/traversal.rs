//! Traversal orders over `BinaryTree`.
//!
//! `preorder`, `inorder` and `postorder` recurse; breadth-first orders drive
//! a FIFO queue.
//! Explicit-stack variants live in `tree_stack`, the positioned
//! breadth-first iterator in `tree_queue`.

use std::collections::{BTreeMap, VecDeque};

use generational_arena::Index;
use tracing::instrument;

use crate::domain::arena::BinaryTree;

impl BinaryTree {
    /// Root, left subtree, right subtree.
    #[instrument(level = "debug", skip(self))]
    pub fn preorder(&self) -> Vec<i64> {
        let mut values = Vec::with_capacity(self.len());
        self.collect_preorder(self.root(), &mut values);
        values
    }

    fn collect_preorder(&self, node: Option<Index>, values: &mut Vec<i64>) {
        if let Some(node) = node.and_then(|idx| self.get_node(idx)) {
            values.push(node.value);
            self.collect_preorder(node.left, values);
            self.collect_preorder(node.right, values);
        }
    }

    /// Left subtree, root, right subtree. Sorted for a BST.
    #[instrument(level = "debug", skip(self))]
    pub fn inorder(&self) -> Vec<i64> {
        let mut values = Vec::with_capacity(self.len());
        self.collect_inorder(self.root(), &mut values);
        values
    }

    fn collect_inorder(&self, node: Option<Index>, values: &mut Vec<i64>) {
        if let Some(node) = node.and_then(|idx| self.get_node(idx)) {
            self.collect_inorder(node.left, values);
            values.push(node.value);
            self.collect_inorder(node.right, values);
        }
    }

    /// Left subtree, right subtree, root.
    #[instrument(level = "debug", skip(self))]
    pub fn postorder(&self) -> Vec<i64> {
        let mut values = Vec::with_capacity(self.len());
        self.collect_postorder(self.root(), &mut values);
        values
    }

    fn collect_postorder(&self, node: Option<Index>, values: &mut Vec<i64>) {
        if let Some(node) = node.and_then(|idx| self.get_node(idx)) {
            self.collect_postorder(node.left, values);
            self.collect_postorder(node.right, values);
            values.push(node.value);
        }
    }

    /// Values grouped by depth, top level first, each level left to right.
    #[instrument(level = "debug", skip(self))]
    pub fn level_order(&self) -> Vec<Vec<i64>> {
        let mut levels = Vec::new();
        let Some(root) = self.root() else {
            return levels;
        };

        let mut queue = VecDeque::from([root]);
        while !queue.is_empty() {
            // only the nodes queued by the previous round belong to this level
            let size = queue.len();
            let mut level = Vec::with_capacity(size);
            for _ in 0..size {
                let Some(idx) = queue.pop_front() else { break };
                if let Some(node) = self.get_node(idx) {
                    level.push(node.value);
                    queue.extend(node.children());
                }
            }
            levels.push(level);
        }
        levels
    }

    /// Level grouping like `level_order`, with every second level read right to left.
    #[instrument(level = "debug", skip(self))]
    pub fn zigzag_level_order(&self) -> Vec<Vec<i64>> {
        let mut levels = Vec::new();
        let Some(root) = self.root() else {
            return levels;
        };

        let mut queue = VecDeque::from([root]);
        let mut left_to_right = true;
        while !queue.is_empty() {
            let size = queue.len();
            let mut level = VecDeque::with_capacity(size);
            for _ in 0..size {
                let Some(idx) = queue.pop_front() else { break };
                if let Some(node) = self.get_node(idx) {
                    if left_to_right {
                        level.push_back(node.value);
                    } else {
                        level.push_front(node.value);
                    }
                    queue.extend(node.children());
                }
            }
            levels.push(Vec::from(level));
            left_to_right = !left_to_right;
        }
        levels
    }

    /// Topmost value at each horizontal position, leftmost position first.
    ///
    /// The root sits at width 0; a left child is one less than its parent,
    /// a right child one more. Breadth-first order reaches the topmost node
    /// of a width first, so the first value seen per width wins.
    #[instrument(level = "debug", skip(self))]
    pub fn top_view(&self) -> Vec<i64> {
        let mut view: BTreeMap<i64, i64> = BTreeMap::new();
        for (_, node, position) in self.iter_breadth_first() {
            view.entry(position.width).or_insert(node.value);
        }
        view.into_values().collect()
    }

    /// Values of all leaves, left to right.
    #[instrument(level = "debug", skip(self))]
    pub fn leaf_values(&self) -> Vec<i64> {
        self.iter()
            .filter(|(_, node)| node.is_leaf())
            .map(|(_, node)| node.value)
            .collect()
    }
}
