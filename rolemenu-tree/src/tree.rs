// SPDX-License-Identifier: MIT OR Apache-2.0

//! Depth-first traversals over permission trees.
//!
//! The free functions work on any slice of [`TreeNode`]s, including trees which were never
//! validated. [`PermissionTree`] wraps a validated tree (unique paths) and bundles the same
//! traversals together with the reconciliation and projection operations.

use std::collections::HashSet;

use thiserror::Error;
use tracing::trace;

use crate::TreeNode;
use crate::projection::{SubtreeDepth, build_selected_subtree};
use crate::reconcile::apply_toggle;
use crate::selection::SelectionSet;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TreeError {
    #[error("path {0} appears more than once in the permission tree")]
    DuplicatePath(String),
}

/// Find the first node with exactly the given path, searching depth-first.
pub fn find_node<'a>(nodes: &'a [TreeNode], path: &str) -> Option<&'a TreeNode> {
    for node in nodes {
        if node.path == path {
            return Some(node);
        }

        if let Some(found) = find_node(&node.children, path) {
            return Some(found);
        }
    }

    None
}

/// Paths of every node below `node`, excluding `node` itself.
pub fn collect_descendant_paths(node: &TreeNode) -> HashSet<String> {
    let mut paths = HashSet::new();
    let mut stack: Vec<&TreeNode> = node.children.iter().collect();

    while let Some(current) = stack.pop() {
        paths.insert(current.path.clone());
        stack.extend(current.children.iter());
    }

    paths
}

/// Chain of ancestor paths of `target`, from the root down to its immediate parent.
///
/// Returns an empty list when the target is a root node or does not exist in the tree.
pub fn collect_ancestor_path(nodes: &[TreeNode], target: &str) -> Vec<String> {
    let mut chain = Vec::new();
    if ancestors_into(nodes, target, &mut chain) {
        chain
    } else {
        Vec::new()
    }
}

fn ancestors_into(nodes: &[TreeNode], target: &str, chain: &mut Vec<String>) -> bool {
    for node in nodes {
        if node.path == target {
            return true;
        }

        chain.push(node.path.clone());
        if ancestors_into(&node.children, target, chain) {
            return true;
        }
        chain.pop();
    }

    false
}

/// Every path of every node at every level, in depth-first pre-order.
pub fn collect_all_paths(nodes: &[TreeNode]) -> Vec<String> {
    let mut paths = Vec::new();
    visit(nodes, &mut |node| paths.push(node.path.clone()));
    paths
}

/// Paths of all nodes which have children, in depth-first pre-order.
pub fn collect_expandable_paths(nodes: &[TreeNode]) -> Vec<String> {
    let mut paths = Vec::new();
    visit(nodes, &mut |node| {
        if !node.is_leaf() {
            paths.push(node.path.clone());
        }
    });
    paths
}

fn visit<'a, F>(nodes: &'a [TreeNode], f: &mut F)
where
    F: FnMut(&'a TreeNode),
{
    for node in nodes {
        f(node);
        visit(&node.children, f);
    }
}

/// Permission template with the guarantee that no path appears twice.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PermissionTree {
    roots: Vec<TreeNode>,
}

impl PermissionTree {
    /// Validate and wrap the given root nodes.
    pub fn new(roots: Vec<TreeNode>) -> Result<Self, TreeError> {
        let mut seen = HashSet::new();
        let mut duplicate = None;

        visit(&roots, &mut |node| {
            if duplicate.is_none() && !seen.insert(node.path.as_str()) {
                duplicate = Some(node.path.clone());
            }
        });

        if let Some(path) = duplicate {
            return Err(TreeError::DuplicatePath(path));
        }

        trace!(nodes = seen.len(), "permission tree validated");

        Ok(Self { roots })
    }

    pub fn roots(&self) -> &[TreeNode] {
        &self.roots
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    pub fn find_node(&self, path: &str) -> Option<&TreeNode> {
        find_node(&self.roots, path)
    }

    /// Descendant paths of the node at `path`, empty if there is no such node.
    pub fn descendant_paths(&self, path: &str) -> HashSet<String> {
        self.find_node(path)
            .map(collect_descendant_paths)
            .unwrap_or_default()
    }

    pub fn ancestor_paths(&self, path: &str) -> Vec<String> {
        collect_ancestor_path(&self.roots, path)
    }

    pub fn all_paths(&self) -> Vec<String> {
        collect_all_paths(&self.roots)
    }

    /// Paths to expand so every branch of the tree is visible.
    pub fn expandable_paths(&self) -> Vec<String> {
        collect_expandable_paths(&self.roots)
    }

    /// See [`apply_toggle`].
    pub fn apply_toggle(&self, previous: &SelectionSet, next: SelectionSet) -> SelectionSet {
        apply_toggle(previous, next, &self.roots)
    }

    /// See [`build_selected_subtree`].
    pub fn selected_subtree(&self, selection: &SelectionSet, depth: SubtreeDepth) -> Vec<TreeNode> {
        build_selected_subtree(&self.roots, selection, depth)
    }

    pub fn into_roots(self) -> Vec<TreeNode> {
        self.roots
    }
}

impl TryFrom<Vec<TreeNode>> for PermissionTree {
    type Error = TreeError;

    fn try_from(roots: Vec<TreeNode>) -> Result<Self, Self::Error> {
        Self::new(roots)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rstest::rstest;

    use crate::test_utils::{admin_tree, menu_tree};
    use crate::{PermissionTree, TreeError, TreeNode};

    use super::{
        collect_all_paths, collect_ancestor_path, collect_descendant_paths, collect_expandable_paths,
        find_node,
    };

    #[test]
    fn find_node_searches_all_levels() {
        let tree = menu_tree();

        assert_eq!(
            find_node(&tree, "/config/security/audit").map(|node| node.label.as_str()),
            Some("Audit")
        );
        assert_eq!(find_node(&tree, "/").map(|node| node.label.as_str()), Some("Inicio"));
        assert!(find_node(&tree, "/nope").is_none());
        assert!(find_node(&[], "/").is_none());
    }

    #[test]
    fn descendants_exclude_the_node_itself() {
        let tree = menu_tree();
        let config = find_node(&tree, "/config").unwrap();

        let expected: HashSet<String> = [
            "/config/colors",
            "/config/security",
            "/config/security/audit",
            "/config/security/keys",
        ]
        .into_iter()
        .map(String::from)
        .collect();

        assert_eq!(collect_descendant_paths(config), expected);

        let leaf = find_node(&tree, "/config/colors").unwrap();
        assert!(collect_descendant_paths(leaf).is_empty());
    }

    #[rstest]
    #[case("/", vec![])]
    #[case("/admin", vec![])]
    #[case("/admin/users", vec!["/admin"])]
    #[case("/config/security", vec!["/config"])]
    #[case("/config/security/keys", vec!["/config", "/config/security"])]
    #[case("/unknown", vec![])]
    fn ancestor_chain(#[case] target: &str, #[case] expected: Vec<&str>) {
        assert_eq!(collect_ancestor_path(&menu_tree(), target), expected);
    }

    #[test]
    fn all_paths_in_pre_order() {
        assert_eq!(
            collect_all_paths(&admin_tree()),
            vec!["/admin", "/admin/users", "/admin/roles"]
        );
    }

    #[test]
    fn expandable_paths_are_branches_only() {
        assert_eq!(
            collect_expandable_paths(&menu_tree()),
            vec!["/admin", "/config", "/config/security"]
        );
    }

    #[test]
    fn duplicate_paths_are_rejected() {
        let roots = vec![
            TreeNode::new("/a", "A").with_children([TreeNode::new("/a/x", "X")]),
            TreeNode::new("/b", "B").with_children([TreeNode::new("/a/x", "X again")]),
        ];

        assert_eq!(
            PermissionTree::new(roots),
            Err(TreeError::DuplicatePath("/a/x".into()))
        );
    }

    #[test]
    fn validated_tree_delegates() {
        let tree = PermissionTree::new(menu_tree()).unwrap();

        assert!(!tree.is_empty());
        assert_eq!(tree.ancestor_paths("/admin/roles"), vec!["/admin"]);
        assert_eq!(tree.descendant_paths("/admin").len(), 2);
        assert!(tree.descendant_paths("/missing").is_empty());
        assert_eq!(tree.all_paths().len(), 10);
        assert_eq!(tree.clone().into_roots(), menu_tree());
    }
}
