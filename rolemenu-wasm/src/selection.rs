// SPDX-License-Identifier: MIT OR Apache-2.0

use rolemenu_tree::{RoleId, SelectionSet, SubtreeDepth, TreeNode};
use wasm_bindgen::JsValue;
use wasm_bindgen::prelude::wasm_bindgen;

use crate::error::jserr;
use crate::serde::{deserialize_from_js, serialize_to_js};

/// Parses the depth names `"unbounded"` and `"two_levels"`, defaulting to unbounded.
pub(crate) fn parse_depth(depth: Option<String>) -> Result<SubtreeDepth, JsValue> {
    match depth.as_deref() {
        None | Some("unbounded") => Ok(SubtreeDepth::Unbounded),
        Some("two_levels") => Ok(SubtreeDepth::TwoLevels),
        Some(other) => Err(js_sys::Error::new(&format!("unknown subtree depth '{other}'")).into()),
    }
}

/// Reconciles the selection reported by the tree widget after a single toggle.
///
/// Takes the previous selection, the selection the widget reports now and the template, all as
/// JavaScript values. Returns the new selection as an array of paths.
#[wasm_bindgen(js_name = applyToggle)]
pub fn apply_toggle(previous: JsValue, next: JsValue, tree: JsValue) -> Result<JsValue, JsValue> {
    let previous: SelectionSet = jserr!(deserialize_from_js(previous));
    let next: SelectionSet = jserr!(deserialize_from_js(next));
    let tree: Vec<TreeNode> = jserr!(deserialize_from_js(tree));

    let selection = rolemenu_tree::apply_toggle(&previous, next, &tree);
    Ok(jserr!(serialize_to_js(&selection)))
}

/// Returns the selection restoring the permissions stored for a role.
///
/// An empty tree selects the root path only.
#[wasm_bindgen(js_name = applyRoleTemplate)]
pub fn apply_role_template(role: u32, role_tree: JsValue) -> Result<JsValue, JsValue> {
    let role_tree: Vec<TreeNode> = jserr!(deserialize_from_js(role_tree));

    let selection = rolemenu_tree::apply_role_template(RoleId::from(u64::from(role)), &role_tree);
    Ok(jserr!(serialize_to_js(&selection)))
}

/// Projects a selection onto the template, as it gets stored for a role.
#[wasm_bindgen(js_name = buildSelectedSubtree)]
pub fn build_selected_subtree(
    tree: JsValue,
    selection: JsValue,
    depth: Option<String>,
) -> Result<JsValue, JsValue> {
    let tree: Vec<TreeNode> = jserr!(deserialize_from_js(tree));
    let selection: SelectionSet = jserr!(deserialize_from_js(selection));
    let depth = parse_depth(depth)?;

    let subtree = rolemenu_tree::build_selected_subtree(&tree, &selection, depth);
    Ok(jserr!(serialize_to_js(&subtree)))
}

/// Decodes a stored permissions value, either a tree or a (repeatedly) JSON encoded string of
/// one.
#[wasm_bindgen(js_name = decodePermissions)]
pub fn decode_permissions(value: JsValue) -> Result<JsValue, JsValue> {
    let value: serde_json::Value = jserr!(deserialize_from_js(value));

    let tree = jserr!(rolemenu_tree::decode_permissions(&value));
    Ok(jserr!(serialize_to_js(&tree)))
}

/// Encodes a tree into the JSON string the backend stores.
#[wasm_bindgen(js_name = encodePermissions)]
pub fn encode_permissions(tree: JsValue) -> Result<String, JsValue> {
    let tree: Vec<TreeNode> = jserr!(deserialize_from_js(tree));
    Ok(jserr!(rolemenu_tree::encode_permissions(&tree)))
}
