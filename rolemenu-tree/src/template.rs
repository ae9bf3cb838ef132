// SPDX-License-Identifier: MIT OR Apache-2.0

use tracing::debug;

use crate::TreeNode;
use crate::role::RoleId;
use crate::selection::SelectionSet;
use crate::tree::collect_all_paths;

/// Turn the permissions stored for a role into the selection shown in the editor.
///
/// Every path at every level of the stored tree is selected. Roles without stored permissions
/// start out with only the root path selected.
pub fn apply_role_template(role: RoleId, role_tree: &[TreeNode]) -> SelectionSet {
    if role_tree.is_empty() {
        debug!(%role, "no stored permissions, selecting root path only");
        return SelectionSet::root_only();
    }

    let selection: SelectionSet = collect_all_paths(role_tree).into_iter().collect();
    debug!(%role, paths = selection.len(), "selection restored from stored permissions");

    selection
}

#[cfg(test)]
mod tests {
    use crate::test_utils::menu_tree;
    use crate::{
        RoleId, SelectionSet, SubtreeDepth, TreeNode, build_selected_subtree, decode_permissions_str,
        encode_permissions,
    };

    use super::apply_role_template;

    #[test]
    fn empty_tree_selects_root_only() {
        let selection = apply_role_template(RoleId::new(1), &[]);
        assert_eq!(selection, SelectionSet::from_iter(["/"]));
    }

    #[test]
    fn collects_every_level() {
        let stored = vec![TreeNode::new("/config", "Config").with_children([TreeNode::new(
            "/config/security",
            "Security",
        )
        .with_children([TreeNode::new("/config/security/keys", "Keys")])])];

        assert_eq!(
            apply_role_template(RoleId::new(2), &stored),
            SelectionSet::from_iter(["/config", "/config/security", "/config/security/keys"])
        );
    }

    #[test]
    fn saved_subtree_restores_the_same_selection() {
        let selection = SelectionSet::from_iter([
            "/",
            "/admin",
            "/admin/users",
            "/config",
            "/config/security",
            "/config/security/audit",
        ]);

        let subtree = build_selected_subtree(&menu_tree(), &selection, SubtreeDepth::TwoLevels);
        let text = encode_permissions(&subtree).unwrap();
        let restored = decode_permissions_str(&text).unwrap();

        assert_eq!(apply_role_template(RoleId::new(9), &restored), selection);
    }
}
