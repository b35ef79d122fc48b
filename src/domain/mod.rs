//! Domain layer: the binary tree and its algorithms
//!
//! This layer is independent of external concerns (no I/O, no config loading).

pub mod arena;
pub mod builder;
pub mod traversal;

pub use arena::{BinaryTree, Side, TreeNode};
pub use builder::TreeBuilder;
