// SPDX-License-Identifier: MIT OR Apache-2.0

//! Methods exported for WebAssembly targets.
//!
//! The tree widget of the permission editor runs in the browser. These bindings give it the
//! same reconciliation and projection rules the Rust client uses, so checked paths stay
//! consistent no matter where the selection is edited.
//!
//! Trees are passed as plain JavaScript objects of the shape `{ path, label, icon?, children }`,
//! selections as arrays of path strings.
use std::panic;

use console_error_panic_hook::hook as panic_hook;
use wasm_bindgen::prelude::wasm_bindgen;

mod error;
mod selection;
mod serde;
#[cfg(test)]
mod tests;
mod tree;

pub use selection::{
    apply_role_template, apply_toggle, build_selected_subtree, decode_permissions,
    encode_permissions,
};
pub use tree::PermissionTree;

/// Sets a [`panic hook`] for better error messages in NodeJS or web browser.
///
/// [`panic hook`]: https://crates.io/crates/console_error_panic_hook
#[wasm_bindgen(js_name = setWasmPanicHook)]
pub fn set_wasm_panic_hook() {
    panic::set_hook(Box::new(panic_hook));
}
