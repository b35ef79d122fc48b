use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

use generational_arena::{Arena, Index};
use itertools::Itertools;
use tracing::{debug, instrument};

use crate::config::{DuplicatePolicy, Replacement, Settings};
use crate::errors::{TreeError, TreeResult};

/// Child slot of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => write!(f, "left"),
            Side::Right => write!(f, "right"),
        }
    }
}

/// Tree node in the arena-based binary tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    pub value: i64,
    /// Index of the left child in the arena
    pub left: Option<Index>,
    /// Index of the right child in the arena
    pub right: Option<Index>,
}

impl TreeNode {
    fn new(value: i64) -> Self {
        Self {
            value,
            left: None,
            right: None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    pub fn child(&self, side: Side) -> Option<Index> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    fn child_mut(&mut self, side: Side) -> &mut Option<Index> {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    /// Present children, left before right.
    pub fn children(&self) -> impl DoubleEndedIterator<Item = Index> {
        self.left.into_iter().chain(self.right)
    }
}

/// Arena-based binary tree.
///
/// Nodes live in a generational arena and link to their children by `Index`,
/// so every child slot is the only reference to that child. Removed nodes are
/// released from the arena immediately; their stale handles resolve to `None`.
///
/// BST operations (`insert`, `delete`, `find`, `lowest_common_ancestor`) expect
/// the ordering invariant to hold. Traversals, `depth`, `diameter` and `invert`
/// accept any shape.
#[derive(Debug, Clone)]
pub struct BinaryTree {
    arena: Arena<TreeNode>,
    root: Option<Index>,
    settings: Settings,
}

impl Default for BinaryTree {
    fn default() -> Self {
        Self::new()
    }
}

impl BinaryTree {
    pub fn new() -> Self {
        Self::with_settings(Settings::default())
    }

    pub fn with_settings(settings: Settings) -> Self {
        Self {
            arena: Arena::new(),
            root: None,
            settings,
        }
    }

    pub fn settings(&self) -> Settings {
        self.settings
    }

    pub fn root(&self) -> Option<Index> {
        self.root
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn clear(&mut self) {
        self.arena.clear();
        self.root = None;
    }

    pub fn get_node(&self, idx: Index) -> Option<&TreeNode> {
        self.arena.get(idx)
    }

    pub fn value(&self, idx: Index) -> Option<i64> {
        self.get_node(idx).map(|node| node.value)
    }

    fn set_child(&mut self, parent: Index, side: Side, child: Option<Index>) {
        if let Some(node) = self.arena.get_mut(parent) {
            *node.child_mut(side) = child;
        }
    }

    /// Places `value` as the root of an empty tree.
    pub fn set_root(&mut self, value: i64) -> TreeResult<Index> {
        if self.root.is_some() {
            return Err(TreeError::InvalidShape {
                reason: "tree already has a root".to_string(),
            });
        }
        let idx = self.arena.insert(TreeNode::new(value));
        self.root = Some(idx);
        Ok(idx)
    }

    /// Links a new leaf holding `value` into an empty slot of `parent`.
    ///
    /// No ordering is enforced; this builds arbitrary shapes.
    pub fn attach(&mut self, parent: Index, side: Side, value: i64) -> TreeResult<Index> {
        let node = self.get_node(parent).ok_or(TreeError::StaleHandle)?;
        if node.child(side).is_some() {
            return Err(TreeError::SlotOccupied {
                parent: node.value,
                side,
            });
        }
        let idx = self.arena.insert(TreeNode::new(value));
        self.set_child(parent, side, Some(idx));
        Ok(idx)
    }

    /// Slot a value descends into when compared against `against`.
    /// `None` means the duplicate is dropped.
    fn route(&self, value: i64, against: i64) -> Option<Side> {
        match value.cmp(&against) {
            Ordering::Less => Some(Side::Left),
            Ordering::Greater => Some(Side::Right),
            Ordering::Equal => match self.settings.duplicates {
                DuplicatePolicy::Right => Some(Side::Right),
                DuplicatePolicy::Left => Some(Side::Left),
                DuplicatePolicy::Ignore => None,
            },
        }
    }

    /// Inserts `value` as a new leaf, walking down from the root.
    ///
    /// Returns the new node's handle, or `None` when the duplicate policy
    /// drops the value.
    #[instrument(level = "debug", skip(self))]
    pub fn insert(&mut self, value: i64) -> Option<Index> {
        let mut current = match self.root {
            Some(root) => root,
            None => {
                let idx = self.arena.insert(TreeNode::new(value));
                self.root = Some(idx);
                debug!("inserted {} as root", value);
                return Some(idx);
            }
        };

        loop {
            let node = self.get_node(current)?;
            let parent_value = node.value;
            let Some(side) = self.route(value, parent_value) else {
                debug!("dropped duplicate {}", value);
                return None;
            };
            match node.child(side) {
                Some(next) => current = next,
                None => {
                    let idx = self.arena.insert(TreeNode::new(value));
                    self.set_child(current, side, Some(idx));
                    debug!("inserted {} as {} child of {}", value, side, parent_value);
                    return Some(idx);
                }
            }
        }
    }

    /// Recursive insertion, rebuilding each link on the path back up.
    /// Produces the same tree as `insert`.
    #[instrument(level = "debug", skip(self))]
    pub fn insert_recursive(&mut self, value: i64) -> Option<Index> {
        let mut inserted = None;
        self.root = self.insert_at(self.root, value, &mut inserted);
        inserted
    }

    fn insert_at(
        &mut self,
        node: Option<Index>,
        value: i64,
        inserted: &mut Option<Index>,
    ) -> Option<Index> {
        let Some(idx) = node else {
            let idx = self.arena.insert(TreeNode::new(value));
            *inserted = Some(idx);
            return Some(idx);
        };
        let current = self.get_node(idx)?;
        if let Some(side) = self.route(value, current.value) {
            let child = current.child(side);
            let child = self.insert_at(child, value, inserted);
            self.set_child(idx, side, child);
        }
        Some(idx)
    }

    /// Removes one node holding `key`.
    ///
    /// A node with two children takes the value of its replacement
    /// (predecessor or successor, see `Settings::replacement`), and the
    /// replacement's original node is spliced out instead.
    /// Returns `false` and leaves the tree untouched when `key` is absent.
    #[instrument(level = "debug", skip(self))]
    pub fn delete(&mut self, key: i64) -> bool {
        // walk down, remembering the link that leads to the current node
        let mut link: Option<(Index, Side)> = None;
        let mut current = self.root;
        let (target, left, right) = loop {
            let Some(idx) = current else { return false };
            let Some(node) = self.get_node(idx) else {
                return false;
            };
            let side = match key.cmp(&node.value) {
                Ordering::Less => Side::Left,
                Ordering::Greater => Side::Right,
                Ordering::Equal => break (idx, node.left, node.right),
            };
            link = Some((idx, side));
            current = node.child(side);
        };

        match (left, right) {
            (Some(left), Some(right)) => {
                let side = match self.settings.replacement {
                    Replacement::Predecessor => Side::Left,
                    Replacement::Successor => Side::Right,
                };
                let inward = side.opposite();
                let mut extreme = match side {
                    Side::Left => left,
                    Side::Right => right,
                };
                let mut extreme_link = (target, side);
                // predecessor is the rightmost node on the left, successor the leftmost on the right
                while let Some(next) = self.get_node(extreme).and_then(|n| n.child(inward)) {
                    extreme_link = (extreme, inward);
                    extreme = next;
                }
                let Some((value, outer)) = self.get_node(extreme).map(|n| (n.value, n.child(side)))
                else {
                    return false;
                };
                if let Some(node) = self.arena.get_mut(target) {
                    node.value = value;
                }
                self.splice(Some(extreme_link), extreme, outer);
            }
            (only, None) | (None, only) => self.splice(link, target, only),
        }
        debug!("deleted {}", key);
        true
    }

    /// Replaces the node at `idx` with `child` under `link` (or as root) and frees it.
    fn splice(&mut self, link: Option<(Index, Side)>, idx: Index, child: Option<Index>) {
        match link {
            Some((parent, side)) => self.set_child(parent, side, child),
            None => self.root = child,
        }
        self.arena.remove(idx);
    }

    /// Value of the node reached by following `side` links from `start`.
    fn extreme_from(&self, start: Index, side: Side) -> Option<i64> {
        let mut node = self.get_node(start)?;
        while let Some(next) = node.child(side).and_then(|idx| self.get_node(idx)) {
            node = next;
        }
        Some(node.value)
    }

    pub fn min(&self) -> Option<i64> {
        self.extreme_from(self.root?, Side::Left)
    }

    pub fn max(&self) -> Option<i64> {
        self.extreme_from(self.root?, Side::Right)
    }

    /// BST lookup of the first node holding `value` on the search path.
    #[instrument(level = "trace", skip(self))]
    pub fn find(&self, value: i64) -> Option<Index> {
        let mut current = self.root;
        while let Some(idx) = current {
            let node = self.get_node(idx)?;
            current = match value.cmp(&node.value) {
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
                Ordering::Equal => return Some(idx),
            };
        }
        None
    }

    pub fn contains(&self, value: i64) -> bool {
        self.find(value).is_some()
    }

    /// Lowest node whose subtree holds both `p` and `q`.
    ///
    /// Both values must be present; otherwise `TreeError::NotFound` names the
    /// first missing one.
    #[instrument(level = "debug", skip(self))]
    pub fn lowest_common_ancestor(&self, p: i64, q: i64) -> TreeResult<Index> {
        for target in [p, q] {
            if !self.contains(target) {
                return Err(TreeError::NotFound(target));
            }
        }

        let mut current = self.root.ok_or(TreeError::NotFound(p))?;
        loop {
            let node = self.get_node(current).ok_or(TreeError::StaleHandle)?;
            let next = if p < node.value && q < node.value {
                node.left
            } else if p > node.value && q > node.value {
                node.right
            } else {
                None
            };
            match next {
                Some(idx) => current = idx,
                None => return Ok(current),
            }
        }
    }

    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        if let Some(root) = self.root {
            self.calculate_depth(root)
        } else {
            0
        }
    }

    fn calculate_depth(&self, idx: Index) -> usize {
        if let Some(node) = self.get_node(idx) {
            1 + node
                .children()
                .map(|child| self.calculate_depth(child))
                .max()
                .unwrap_or(0)
        } else {
            0
        }
    }

    /// Number of edges on the longest path between any two nodes.
    ///
    /// Heights are folded bottom-up over the post-order stack iterator; a
    /// child's entry is dropped once its parent has consumed it.
    #[instrument(level = "debug", skip(self))]
    pub fn diameter(&self) -> usize {
        let mut heights: HashMap<Index, usize> = HashMap::new();
        let mut diameter = 0;
        for (idx, node) in self.iter_postorder() {
            let hl = node.left.and_then(|c| heights.remove(&c)).unwrap_or(0);
            let hr = node.right.and_then(|c| heights.remove(&c)).unwrap_or(0);
            diameter = diameter.max(hl + hr);
            heights.insert(idx, 1 + hl.max(hr));
        }
        diameter
    }

    /// Mirrors the tree in place and returns the (unchanged) root handle.
    ///
    /// An inverted BST orders values descending, so BST operations no longer
    /// apply until it is inverted back.
    #[instrument(level = "debug", skip(self))]
    pub fn invert(&mut self) -> Option<Index> {
        let mut stack: Vec<Index> = self.root.into_iter().collect();
        while let Some(idx) = stack.pop() {
            if let Some(node) = self.arena.get_mut(idx) {
                std::mem::swap(&mut node.left, &mut node.right);
                stack.extend(node.children());
            }
        }
        debug!("inverted {} nodes", self.len());
        self.root
    }

    /// Checks the strict BST invariant: in-order values strictly increase.
    pub fn is_bst(&self) -> bool {
        self.iter_inorder()
            .map(|(_, node)| node.value)
            .tuple_windows()
            .all(|(a, b)| a < b)
    }

    fn same_shape(&self, other: &BinaryTree) -> bool {
        let mut stack = vec![(self.root, other.root)];
        while let Some((a, b)) = stack.pop() {
            match (
                a.and_then(|idx| self.get_node(idx)),
                b.and_then(|idx| other.get_node(idx)),
            ) {
                (None, None) => {}
                (Some(x), Some(y)) if x.value == y.value => {
                    stack.push((x.right, y.right));
                    stack.push((x.left, y.left));
                }
                _ => return false,
            }
        }
        true
    }
}

/// Trees are equal when shape and values match; handles and settings are ignored.
impl PartialEq for BinaryTree {
    fn eq(&self, other: &Self) -> bool {
        self.same_shape(other)
    }
}

impl Eq for BinaryTree {}
