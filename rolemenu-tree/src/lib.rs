// SPDX-License-Identifier: MIT OR Apache-2.0

//! Role based menu permissions modelled as a tree of navigable paths.
//!
//! A [`PermissionTree`] is the template offered to every role. The editor keeps a flat
//! [`SelectionSet`] of checked paths and runs every widget toggle through [`apply_toggle`],
//! which keeps two rules intact:
//!
//! - checking a node also checks all of its ancestors,
//! - unchecking a node also unchecks all of its descendants.
//!
//! For storage the selection is projected back onto the template with
//! [`build_selected_subtree`], encoded with [`encode_permissions`] and later restored through
//! [`decode_permissions`] and [`apply_role_template`].
//!
//! ```
//! use rolemenu_tree::{PermissionTree, SelectionSet, TreeNode};
//!
//! let tree = PermissionTree::new(vec![TreeNode::new("/admin", "Admin").with_children([
//!     TreeNode::new("/admin/users", "Users"),
//!     TreeNode::new("/admin/roles", "Roles"),
//! ])])
//! .unwrap();
//!
//! let checked = tree.apply_toggle(&SelectionSet::new(), SelectionSet::from_iter(["/admin/users"]));
//! assert_eq!(checked, SelectionSet::from_iter(["/admin", "/admin/users"]));
//!
//! let unchecked = tree.apply_toggle(&checked, SelectionSet::from_iter(["/admin/users"]));
//! assert!(unchecked.is_empty());
//! ```
mod node;
mod projection;
mod reconcile;
mod role;
mod selection;
mod template;
#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;
#[cfg(test)]
mod tests;
mod tree;
pub mod wire;

pub use node::TreeNode;
pub use projection::{SubtreeDepth, build_selected_subtree};
pub use reconcile::{Toggle, apply_toggle, detect_toggle};
pub use role::{Role, RoleId, RoleIdError};
pub use selection::{ROOT_PATH, SelectionSet};
pub use template::apply_role_template;
pub use tree::{
    PermissionTree, TreeError, collect_all_paths, collect_ancestor_path, collect_descendant_paths,
    collect_expandable_paths, find_node,
};
pub use wire::{SavePayload, WireError, decode_permissions, decode_permissions_str, encode_permissions};
