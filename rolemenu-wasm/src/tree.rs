// SPDX-License-Identifier: MIT OR Apache-2.0

use rolemenu_tree::{PermissionTree as PermissionTreeNonWasm, SelectionSet, TreeNode};
use wasm_bindgen::JsValue;
use wasm_bindgen::prelude::wasm_bindgen;

use crate::error::jserr;
use crate::selection::parse_depth;
use crate::serde::{deserialize_from_js, serialize_to_js};

/// Permission template with unique paths, validated once and queried many times.
#[wasm_bindgen]
#[derive(Clone, Debug)]
pub struct PermissionTree(PermissionTreeNonWasm);

#[wasm_bindgen]
impl PermissionTree {
    /// Builds a tree from an array of nodes.
    ///
    /// Throws when a node has no path or a path appears twice.
    #[wasm_bindgen(constructor)]
    pub fn new(roots: JsValue) -> Result<PermissionTree, JsValue> {
        let roots: Vec<TreeNode> = jserr!(deserialize_from_js(roots));
        let tree = jserr!(PermissionTreeNonWasm::new(roots));
        Ok(Self(tree))
    }

    /// Returns the node with this path or `undefined`.
    #[wasm_bindgen(js_name = findNode)]
    pub fn find_node(&self, path: String) -> Result<JsValue, JsValue> {
        match self.0.find_node(&path) {
            Some(node) => Ok(jserr!(serialize_to_js(node))),
            None => Ok(JsValue::UNDEFINED),
        }
    }

    /// Paths from the root down to the parent of `path`.
    #[wasm_bindgen(js_name = ancestorPaths)]
    pub fn ancestor_paths(&self, path: String) -> Vec<String> {
        self.0.ancestor_paths(&path)
    }

    /// Paths of all nodes below `path`, sorted.
    #[wasm_bindgen(js_name = descendantPaths)]
    pub fn descendant_paths(&self, path: String) -> Vec<String> {
        let mut paths: Vec<String> = self.0.descendant_paths(&path).into_iter().collect();
        paths.sort();
        paths
    }

    /// Paths of all nodes with children, the branches the widget expands initially.
    #[wasm_bindgen(js_name = expandablePaths)]
    pub fn expandable_paths(&self) -> Vec<String> {
        self.0.expandable_paths()
    }

    #[wasm_bindgen(js_name = allPaths)]
    pub fn all_paths(&self) -> Vec<String> {
        self.0.all_paths()
    }

    #[wasm_bindgen(js_name = applyToggle)]
    pub fn apply_toggle(&self, previous: JsValue, next: JsValue) -> Result<JsValue, JsValue> {
        let previous: SelectionSet = jserr!(deserialize_from_js(previous));
        let next: SelectionSet = jserr!(deserialize_from_js(next));

        Ok(jserr!(serialize_to_js(&self.0.apply_toggle(&previous, next))))
    }

    #[wasm_bindgen(js_name = selectedSubtree)]
    pub fn selected_subtree(
        &self,
        selection: JsValue,
        depth: Option<String>,
    ) -> Result<JsValue, JsValue> {
        let selection: SelectionSet = jserr!(deserialize_from_js(selection));
        let depth = parse_depth(depth)?;

        Ok(jserr!(serialize_to_js(&self.0.selected_subtree(&selection, depth))))
    }

    /// Returns the nodes of the tree as plain objects.
    #[wasm_bindgen(js_name = toJS)]
    pub fn to_js(&self) -> Result<JsValue, JsValue> {
        Ok(jserr!(serialize_to_js(self.0.roots())))
    }
}
