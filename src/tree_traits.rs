use std::fmt;

use termtree::Tree;
use tracing::instrument;

use crate::domain::{BinaryTree, Side, TreeNode};

/// Conversion of a tree into a printable `termtree::Tree`.
pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> Tree<String>;
}

impl TreeNodeConvert for BinaryTree {
    /// Each child is labelled with its side; a lone child gets an `L -` / `R -`
    /// placeholder for the missing sibling so left and right stay distinguishable.
    #[instrument(level = "trace", skip(self))]
    fn to_tree_string(&self) -> Tree<String> {
        match self.root().and_then(|root| self.get_node(root)) {
            Some(root) => build_tree(self, root, root.value.to_string()),
            None => Tree::new("Empty tree".to_string()),
        }
    }
}

fn side_tag(side: Side) -> &'static str {
    match side {
        Side::Left => "L",
        Side::Right => "R",
    }
}

enum Step<'a> {
    Enter(&'a TreeNode, String),
    Placeholder(Side),
    Close(String),
}

/// Builds the labelled tree bottom-up with an explicit stack: finished
/// subtrees collect on `built` until their parent closes over them.
fn build_tree(tree: &BinaryTree, root: &TreeNode, label: String) -> Tree<String> {
    let mut steps = vec![Step::Enter(root, label)];
    let mut built: Vec<Tree<String>> = Vec::new();

    while let Some(step) = steps.pop() {
        match step {
            Step::Enter(node, label) if node.is_leaf() => built.push(Tree::new(label)),
            Step::Enter(node, label) => {
                steps.push(Step::Close(label));
                // right first so the left subtree is built first
                for side in [Side::Right, Side::Left] {
                    match node.child(side).and_then(|idx| tree.get_node(idx)) {
                        Some(child) => {
                            let label = format!("{} {}", side_tag(side), child.value);
                            steps.push(Step::Enter(child, label));
                        }
                        None => steps.push(Step::Placeholder(side)),
                    }
                }
            }
            Step::Placeholder(side) => built.push(Tree::new(format!("{} -", side_tag(side)))),
            Step::Close(label) => {
                // every inner node has exactly two entries: child or placeholder
                let children = built.split_off(built.len().saturating_sub(2));
                built.push(Tree::new(label).with_leaves(children));
            }
        }
    }

    built.pop().unwrap_or_else(|| Tree::new(String::new()))
}

/// Releases a rendered tree level by level; the derived drop recurses per level.
fn dismantle(tree: Tree<String>) {
    let mut pending = vec![tree];
    while let Some(mut node) = pending.pop() {
        pending.append(&mut node.leaves);
    }
}

impl fmt::Display for BinaryTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = self.to_tree_string();
        let result = write!(f, "{}", rendered);
        dismantle(rendered);
        result
    }
}
