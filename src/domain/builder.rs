//! Tree builder for constructing trees from literal descriptions.

use std::collections::VecDeque;

use tracing::{debug, instrument};

use crate::config::Settings;
use crate::domain::arena::{BinaryTree, Side};
use crate::errors::{TreeError, TreeResult};

/// Constructs trees from value sequences and level-order shape literals.
#[derive(Debug, Clone, Default)]
pub struct TreeBuilder {
    settings: Settings,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: Settings) -> Self {
        Self { settings }
    }

    /// Build a BST by inserting `values` in order.
    #[instrument(level = "debug", skip(self, values))]
    pub fn from_values<I>(&self, values: I) -> BinaryTree
    where
        I: IntoIterator<Item = i64>,
    {
        let mut tree = BinaryTree::with_settings(self.settings);
        for value in values {
            tree.insert(value);
        }
        tree
    }

    /// Build an arbitrary shape from a level-order literal.
    ///
    /// `None` marks an absent child. Slots are filled parent by parent, left
    /// then right, and absent nodes get no slots of their own, so
    /// `[1, None, 2, 3]` is a root 1 whose right child 2 has a left child 3.
    /// Trailing `None`s may be omitted.
    ///
    /// # Errors
    ///
    /// * `TreeError::InvalidShape` if values follow an absent root, or values
    ///   remain after every present node has had its two slots filled.
    #[instrument(level = "debug", skip(self))]
    pub fn from_level_order(&self, values: &[Option<i64>]) -> TreeResult<BinaryTree> {
        let mut tree = BinaryTree::with_settings(self.settings);
        let mut slots = values.iter().copied();

        let root_value = match slots.next() {
            None => return Ok(tree),
            Some(None) => {
                if slots.any(|slot| slot.is_some()) {
                    return Err(TreeError::InvalidShape {
                        reason: "values listed below an absent root".to_string(),
                    });
                }
                return Ok(tree);
            }
            Some(Some(value)) => value,
        };

        let root = tree.set_root(root_value)?;
        let mut parents = VecDeque::from([root]);
        while let Some(parent) = parents.pop_front() {
            for side in [Side::Left, Side::Right] {
                match slots.next() {
                    None => return Ok(tree),
                    Some(None) => {}
                    Some(Some(value)) => parents.push_back(tree.attach(parent, side, value)?),
                }
            }
        }

        if slots.any(|slot| slot.is_some()) {
            return Err(TreeError::InvalidShape {
                reason: "values left over without a parent slot".to_string(),
            });
        }
        debug!("built tree with {} nodes", tree.len());
        Ok(tree)
    }
}
