// SPDX-License-Identifier: MIT OR Apache-2.0

use serde::{Deserialize, Deserializer, Serialize};

/// A single entry in a permission tree.
///
/// The `path` is the stable key of the node and is what ends up in a [`SelectionSet`] when the
/// node is checked. Paths are expected to be unique across a whole tree, see
/// [`PermissionTree`] for the validated variant.
///
/// [`SelectionSet`]: crate::SelectionSet
/// [`PermissionTree`]: crate::PermissionTree
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TreeNode {
    pub path: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    /// Node without icon and children.
    pub fn new(path: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            label: label.into(),
            icon: None,
            children: Vec::new(),
        }
    }

    /// Attach an icon name.
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Append child nodes, keeping their order.
    pub fn with_children(mut self, children: impl IntoIterator<Item = TreeNode>) -> Self {
        self.children.extend(children);
        self
    }

    /// Return `true` if the node has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Copy of this node carrying only its own fields, without any children.
    pub(crate) fn detached(&self) -> Self {
        Self {
            path: self.path.clone(),
            label: self.label.clone(),
            icon: self.icon.clone(),
            children: Vec::new(),
        }
    }
}

/// Shape the backend sends. Some rows carry `name` instead of `label`, and `children` is
/// frequently missing on leaves.
#[derive(Deserialize)]
struct RawNode {
    path: String,
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    icon: Option<String>,
    #[serde(default)]
    children: Option<Vec<TreeNode>>,
}

impl<'de> Deserialize<'de> for TreeNode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawNode::deserialize(deserializer)?;

        if raw.path.is_empty() {
            return Err(serde::de::Error::custom("tree node with empty path"));
        }

        let label = raw.name.filter(|name| !name.is_empty()).or(raw.label);

        Ok(TreeNode {
            path: raw.path,
            label: label.unwrap_or_default(),
            icon: raw.icon,
            children: raw.children.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::TreeNode;

    #[test]
    fn name_takes_precedence_over_label() {
        let node: TreeNode = serde_json::from_value(json!({
            "path": "/colors",
            "name": "Colores",
            "label": "colors",
        }))
        .unwrap();

        assert_eq!(node.label, "Colores");
        assert!(node.children.is_empty());
        assert_eq!(node.icon, None);
    }

    #[test]
    fn missing_children_and_label() {
        let node: TreeNode = serde_json::from_value(json!({
            "path": "/",
            "icon": "home",
            "children": null,
        }))
        .unwrap();

        assert_eq!(node, TreeNode::new("/", "").with_icon("home"));
    }

    #[test]
    fn rejects_empty_or_missing_path() {
        assert!(serde_json::from_value::<TreeNode>(json!({ "path": "", "label": "x" })).is_err());
        assert!(serde_json::from_value::<TreeNode>(json!({ "label": "x" })).is_err());
        assert!(serde_json::from_value::<TreeNode>(json!({ "path": 3 })).is_err());
    }

    #[test]
    fn icon_is_omitted_when_absent() {
        let node = TreeNode::new("/admin", "Admin")
            .with_children([TreeNode::new("/admin/users", "Users").with_icon("person")]);

        assert_eq!(
            serde_json::to_value(&node).unwrap(),
            json!({
                "path": "/admin",
                "label": "Admin",
                "children": [
                    { "path": "/admin/users", "label": "Users", "icon": "person", "children": [] }
                ]
            })
        );
    }
}
