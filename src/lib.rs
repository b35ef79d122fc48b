//! treekit: binary tree toolkit
//!
//! An arena-backed binary tree with BST insertion and deletion, depth,
//! diameter, inversion, lowest-common-ancestor lookup and the usual
//! traversal orders (pre/in/post-order, level-order, zigzag, top view).
//!
//! # Layers
//!
//! - **domain**: the tree, its BST mutations and traversals
//! - **tree_stack / tree_queue**: explicit stack and queue iterators
//! - **tree_traits**: rendering via `termtree`
//! - **config**: layered `Settings` for duplicate and deletion policies

pub mod config;
pub mod domain;
pub mod errors;
pub mod tree_queue;
pub mod tree_stack;
pub mod tree_traits;
pub mod util;

#[cfg(test)]
mod proptests;

pub use config::{DuplicatePolicy, Replacement, Settings};
pub use domain::{BinaryTree, Side, TreeBuilder, TreeNode};
pub use errors::{TreeError, TreeResult};
pub use generational_arena::Index;
pub use tree_queue::Position;
pub use tree_traits::TreeNodeConvert;
