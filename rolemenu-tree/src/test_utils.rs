// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities.
use crate::TreeNode;

/// The smallest tree with a section: `/admin` holding `/admin/users` and `/admin/roles`.
pub fn admin_tree() -> Vec<TreeNode> {
    vec![TreeNode::new("/admin", "Admin").with_children([
        TreeNode::new("/admin/users", "Users"),
        TreeNode::new("/admin/roles", "Roles"),
    ])]
}

/// A three level menu, close to what the backend serves as template.
///
/// ```text
/// /
/// /admin
///     /admin/users
///     /admin/roles
/// /config
///     /config/colors
///     /config/security
///         /config/security/audit
///         /config/security/keys
/// /permisos
/// ```
pub fn menu_tree() -> Vec<TreeNode> {
    vec![
        TreeNode::new("/", "Inicio").with_icon("home"),
        TreeNode::new("/admin", "Admin")
            .with_icon("admin_panel_settings")
            .with_children([
                TreeNode::new("/admin/users", "Users"),
                TreeNode::new("/admin/roles", "Roles"),
            ]),
        TreeNode::new("/config", "Config").with_icon("settings").with_children([
            TreeNode::new("/config/colors", "Colores").with_icon("palette"),
            TreeNode::new("/config/security", "Security").with_children([
                TreeNode::new("/config/security/audit", "Audit"),
                TreeNode::new("/config/security/keys", "Keys"),
            ]),
        ]),
        TreeNode::new("/permisos", "Opciones Menu").with_icon("admin_panel_settings"),
    ]
}

/// Print `tracing` output of a test run when `RUST_LOG` is set.
pub fn setup_logging() {
    if std::env::var("RUST_LOG").is_ok() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    }
}
