// SPDX-License-Identifier: MIT OR Apache-2.0

//! Encoding of permission trees as they are stored by the backend.
//!
//! Trees travel as JSON arrays of nodes. The backend keeps them in a text column, so on the
//! way back they usually arrive as a JSON *string* holding the array, and template rows have
//! been seen wrapped into a string more than once. [`decode_permissions`] unwraps these layers
//! and validates the result against the node schema.
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::trace;

use crate::TreeNode;
use crate::role::RoleId;

/// Maximum number of string layers unwrapped before giving up.
pub const MAX_ENCODING_DEPTH: usize = 4;

#[derive(Debug, Error)]
pub enum WireError {
    #[error("permissions are not valid json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("expected an array of tree nodes, found {0}")]
    UnexpectedShape(&'static str),

    #[error("permissions are encoded more than {MAX_ENCODING_DEPTH} times")]
    TooDeeplyEncoded,
}

/// Body of the request storing the permissions of a role.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavePayload {
    /// JSON encoded list of tree nodes.
    pub permisos: String,
    pub rol: RoleId,
}

impl SavePayload {
    pub fn new(role: RoleId, tree: &[TreeNode]) -> Result<Self, WireError> {
        Ok(Self {
            permisos: encode_permissions(tree)?,
            rol: role,
        })
    }
}

/// Decode a permissions column into tree nodes.
///
/// `null` decodes into an empty tree.
pub fn decode_permissions(value: &Value) -> Result<Vec<TreeNode>, WireError> {
    let mut current = value.clone();

    for layer in 0..=MAX_ENCODING_DEPTH {
        match current {
            Value::Null => return Ok(Vec::new()),
            Value::Array(_) => {
                trace!(layers = layer, "decoded permissions");
                return Ok(serde_json::from_value(current)?);
            }
            Value::String(encoded) => {
                current = serde_json::from_str(&encoded)?;
            }
            other => return Err(WireError::UnexpectedShape(kind(&other))),
        }
    }

    Err(WireError::TooDeeplyEncoded)
}

/// Decode permissions from raw text, see [`decode_permissions`].
pub fn decode_permissions_str(text: &str) -> Result<Vec<TreeNode>, WireError> {
    let value: Value = serde_json::from_str(text)?;
    decode_permissions(&value)
}

/// Encode tree nodes into the text stored by the backend.
pub fn encode_permissions(tree: &[TreeNode]) -> Result<String, WireError> {
    Ok(serde_json::to_string(tree)?)
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::{Value, json};

    use crate::test_utils::admin_tree;
    use crate::{RoleId, TreeNode};

    use super::{SavePayload, WireError, decode_permissions, decode_permissions_str, encode_permissions};

    fn encoded(value: &Value, times: usize) -> Value {
        (0..times).fold(value.clone(), |acc, _| Value::String(acc.to_string()))
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    #[case(2)]
    #[case(4)]
    fn unwraps_string_layers(#[case] layers: usize) {
        let plain = serde_json::to_value(admin_tree()).unwrap();
        let decoded = decode_permissions(&encoded(&plain, layers)).unwrap();
        assert_eq!(decoded, admin_tree());
    }

    #[test]
    fn gives_up_after_too_many_layers() {
        let plain = serde_json::to_value(admin_tree()).unwrap();
        assert!(matches!(
            decode_permissions(&encoded(&plain, 5)),
            Err(WireError::TooDeeplyEncoded)
        ));
    }

    #[rstest]
    #[case(json!({ "path": "/" }))]
    #[case(json!(42))]
    #[case(json!(true))]
    #[case(json!("{\"path\": \"/\"}"))]
    fn rejects_non_arrays(#[case] value: Value) {
        assert!(matches!(
            decode_permissions(&value),
            Err(WireError::UnexpectedShape(_))
        ));
    }

    #[test]
    fn rejects_malformed_nodes() {
        assert!(matches!(
            decode_permissions(&json!([{ "label": "no path" }])),
            Err(WireError::Json(_))
        ));
        assert!(matches!(
            decode_permissions(&json!("[{\"path\": ")),
            Err(WireError::Json(_))
        ));
    }

    #[test]
    fn null_is_an_empty_tree() {
        assert!(decode_permissions(&Value::Null).unwrap().is_empty());
        assert!(decode_permissions_str("\"null\"").unwrap().is_empty());
        assert!(decode_permissions_str("[]").unwrap().is_empty());
    }

    #[test]
    fn save_payload_shape() {
        let tree = vec![TreeNode::new("/", "Inicio").with_icon("home")];
        let payload = SavePayload::new(RoleId::new(4), &tree).unwrap();

        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({
                "permisos": "[{\"path\":\"/\",\"label\":\"Inicio\",\"icon\":\"home\",\"children\":[]}]",
                "rol": 4,
            })
        );
        assert_eq!(decode_permissions_str(&encode_permissions(&tree).unwrap()).unwrap(), tree);
    }
}
