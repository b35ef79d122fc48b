//! Property-based tests for tree invariants.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::config::{Replacement, Settings};
    use crate::domain::{BinaryTree, TreeBuilder};

    // Distinct values keep the strict BST invariant meaningful
    fn distinct_values() -> impl Strategy<Value = Vec<i64>> {
        prop::collection::btree_set(-500i64..500i64, 0..64)
            .prop_map(|set| set.into_iter().collect::<Vec<_>>())
            .prop_shuffle()
    }

    // Arbitrary shapes, not BSTs: a level-order literal with holes
    fn arbitrary_shape() -> impl Strategy<Value = BinaryTree> {
        prop::collection::vec(prop::option::weighted(0.75, -50i64..50i64), 0..48).prop_map(
            |mut slots| {
                if let Some(first) = slots.first_mut() {
                    first.get_or_insert(0);
                }
                // drop entries that would have no parent slot left
                loop {
                    match TreeBuilder::new().from_level_order(&slots) {
                        Ok(tree) => return tree,
                        Err(_) => {
                            slots.pop();
                        }
                    }
                }
            },
        )
    }

    fn sorted(mut values: Vec<i64>) -> Vec<i64> {
        values.sort_unstable();
        values
    }

    proptest! {
        #[test]
        fn insert_preserves_bst_and_multiset(values in distinct_values(), extra in -500i64..500i64) {
            prop_assume!(!values.contains(&extra));
            let mut tree = TreeBuilder::new().from_values(values.clone());
            prop_assert!(tree.is_bst());

            let inserted = tree.insert(extra);
            prop_assert_eq!(tree.find(extra), inserted);
            let mut expected = values;
            expected.push(extra);
            prop_assert!(tree.is_bst());
            prop_assert_eq!(tree.inorder(), sorted(expected));
        }

        #[test]
        fn recursive_insert_builds_same_tree(values in distinct_values()) {
            let iterative = TreeBuilder::new().from_values(values.clone());
            let mut recursive = BinaryTree::new();
            for v in values {
                recursive.insert_recursive(v);
            }
            prop_assert_eq!(iterative, recursive);
        }

        #[test]
        fn delete_removes_exactly_one_value(
            values in distinct_values(),
            pick in any::<prop::sample::Index>(),
            successor in any::<bool>()
        ) {
            prop_assume!(!values.is_empty());
            let settings = Settings {
                replacement: if successor { Replacement::Successor } else { Replacement::Predecessor },
                ..Settings::default()
            };
            let mut tree = TreeBuilder::with_settings(settings).from_values(values.clone());
            let key = values[pick.index(values.len())];

            prop_assert!(tree.delete(key));
            prop_assert!(tree.is_bst());
            prop_assert_eq!(tree.len(), values.len() - 1);
            let expected: Vec<i64> = sorted(values).into_iter().filter(|&v| v != key).collect();
            prop_assert_eq!(tree.inorder(), expected);
        }

        #[test]
        fn delete_of_absent_key_is_a_no_op(values in distinct_values(), key in 1000i64..2000i64) {
            let mut tree = TreeBuilder::new().from_values(values);
            let before = tree.clone();
            prop_assert!(!tree.delete(key));
            prop_assert_eq!(tree, before);
        }

        #[test]
        fn invert_is_an_involution(tree in arbitrary_shape()) {
            let mut inverted = tree.clone();
            inverted.invert();
            let mut mirrored = tree.preorder();
            mirrored.reverse();
            prop_assert_eq!(inverted.postorder(), mirrored);

            inverted.invert();
            prop_assert_eq!(inverted, tree);
        }

        #[test]
        fn zigzag_is_level_order_with_odd_levels_reversed(tree in arbitrary_shape()) {
            let expected: Vec<Vec<i64>> = tree
                .level_order()
                .into_iter()
                .enumerate()
                .map(|(i, mut level)| {
                    if i % 2 == 1 {
                        level.reverse();
                    }
                    level
                })
                .collect();
            prop_assert_eq!(tree.zigzag_level_order(), expected);
        }

        #[test]
        fn depth_variants_agree_and_bound_diameter(tree in arbitrary_shape()) {
            let depth = tree.depth();
            prop_assert_eq!(tree.depth_stack(), depth);
            prop_assert_eq!(tree.depth_queue(), depth);
            prop_assert_eq!(tree.level_order().len(), depth);
            prop_assert!(tree.diameter() <= 2 * depth.saturating_sub(1));
            prop_assert!(tree.diameter() + 1 >= depth);
        }

        #[test]
        fn single_path_has_diameter_one_less_than_depth(n in 1usize..200) {
            let tree = TreeBuilder::new().from_values((0..n as i64).rev());
            prop_assert_eq!(tree.depth(), n);
            prop_assert_eq!(tree.diameter(), n - 1);
        }

        #[test]
        fn top_view_has_one_value_per_width(tree in arbitrary_shape()) {
            let view = tree.top_view();
            let expected = tree
                .width_range()
                .map_or(0, |(lo, hi)| (hi - lo + 1) as usize);
            prop_assert_eq!(view.len(), expected);
        }
    }
}
