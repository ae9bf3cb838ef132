// SPDX-License-Identifier: MIT OR Apache-2.0

use serde::{Deserialize, Serialize};

use crate::TreeNode;
use crate::selection::SelectionSet;

/// How deep [`build_selected_subtree`] filters below the root nodes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubtreeDepth {
    /// Roots, their selected children and their selected grandchildren. Grandchildren are
    /// always emitted without children of their own.
    ///
    /// This is the shape older backends were written against.
    TwoLevels,

    /// Selected nodes at every depth.
    #[default]
    Unbounded,
}

/// Project the selection onto the tree, keeping only selected nodes.
///
/// Roots are visited in tree order and only emitted when selected. A selected node whose
/// parent is not selected is not part of the result.
pub fn build_selected_subtree(
    tree: &[TreeNode],
    selection: &SelectionSet,
    depth: SubtreeDepth,
) -> Vec<TreeNode> {
    let levels = match depth {
        SubtreeDepth::TwoLevels => Some(2),
        SubtreeDepth::Unbounded => None,
    };

    tree.iter()
        .filter(|root| selection.contains(&root.path))
        .map(|root| project(root, selection, levels))
        .collect()
}

fn project(node: &TreeNode, selection: &SelectionSet, levels: Option<usize>) -> TreeNode {
    let mut projected = node.detached();

    let remaining = match levels {
        Some(0) => return projected,
        Some(levels) => Some(levels - 1),
        None => None,
    };

    projected.children = node
        .children
        .iter()
        .filter(|child| selection.contains(&child.path))
        .map(|child| project(child, selection, remaining))
        .collect();

    projected
}

#[cfg(test)]
mod tests {
    use crate::test_utils::menu_tree;
    use crate::{SelectionSet, TreeNode, collect_all_paths};

    use super::{SubtreeDepth, build_selected_subtree};

    fn full_selection() -> SelectionSet {
        collect_all_paths(&menu_tree()).into_iter().collect()
    }

    #[test]
    fn unselected_branches_are_pruned() {
        let selection: SelectionSet = ["/", "/admin", "/admin/roles", "/config/colors"]
            .into_iter()
            .collect();

        let subtree = build_selected_subtree(&menu_tree(), &selection, SubtreeDepth::Unbounded);

        assert_eq!(
            subtree,
            vec![
                TreeNode::new("/", "Inicio").with_icon("home"),
                TreeNode::new("/admin", "Admin")
                    .with_icon("admin_panel_settings")
                    .with_children([TreeNode::new("/admin/roles", "Roles")]),
            ]
        );
    }

    #[test]
    fn unbounded_keeps_every_level() {
        let subtree =
            build_selected_subtree(&menu_tree(), &full_selection(), SubtreeDepth::Unbounded);
        assert_eq!(subtree, menu_tree());
    }

    #[test]
    fn two_levels_drops_great_grandchildren() {
        let tree = vec![TreeNode::new("/a", "A").with_children([TreeNode::new("/a/b", "B")
            .with_children([TreeNode::new("/a/b/c", "C")
                .with_children([TreeNode::new("/a/b/c/d", "D")])])])];
        let selection: SelectionSet = ["/a", "/a/b", "/a/b/c", "/a/b/c/d"].into_iter().collect();

        let legacy = build_selected_subtree(&tree, &selection, SubtreeDepth::TwoLevels);
        assert_eq!(
            legacy,
            vec![TreeNode::new("/a", "A").with_children([TreeNode::new("/a/b", "B")
                .with_children([TreeNode::new("/a/b/c", "C")])])]
        );

        let full = build_selected_subtree(&tree, &selection, SubtreeDepth::Unbounded);
        assert_eq!(full, tree);
    }

    #[test]
    fn menu_fits_into_two_levels() {
        // The stock menu is only three levels deep, both projections agree on it.
        assert_eq!(
            build_selected_subtree(&menu_tree(), &full_selection(), SubtreeDepth::TwoLevels),
            build_selected_subtree(&menu_tree(), &full_selection(), SubtreeDepth::Unbounded),
        );
    }

    #[test]
    fn empty_selection_projects_nothing() {
        assert!(
            build_selected_subtree(&menu_tree(), &SelectionSet::new(), SubtreeDepth::Unbounded)
                .is_empty()
        );
    }
}
