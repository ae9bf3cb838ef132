// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cascading check and uncheck rules applied to every toggle of the tree widget.
use tracing::{debug, trace};

use crate::TreeNode;
use crate::selection::SelectionSet;
use crate::tree::{collect_ancestor_path, collect_descendant_paths, find_node};

/// The single change a widget reported between two selections.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Toggle {
    Checked(String),
    Unchecked(String),
}

impl Toggle {
    pub fn path(&self) -> &str {
        match self {
            Toggle::Checked(path) | Toggle::Unchecked(path) => path,
        }
    }
}

/// Find the path which changed between two selections.
///
/// Removals are looked at before additions and only the first difference is reported. Bulk
/// changes touching more than one path are therefore not fully described by the result.
pub fn detect_toggle(previous: &SelectionSet, next: &SelectionSet) -> Option<Toggle> {
    if let Some(path) = previous.missing_from(next).next() {
        return Some(Toggle::Unchecked(path.to_owned()));
    }

    next.missing_from(previous)
        .next()
        .map(|path| Toggle::Checked(path.to_owned()))
}

/// Apply the cascade rules to the selection a widget reported after a single toggle.
///
/// Unchecking a node removes it together with all of its descendants from `previous`.
/// Checking a node adds all of its ancestors to `next`. When nothing changed, `next` is
/// returned as-is. A changed path which is not part of the tree is ignored and `previous` is
/// kept.
pub fn apply_toggle(previous: &SelectionSet, next: SelectionSet, tree: &[TreeNode]) -> SelectionSet {
    let Some(toggle) = detect_toggle(previous, &next) else {
        return next;
    };

    let Some(node) = find_node(tree, toggle.path()) else {
        debug!(path = toggle.path(), "toggled path is not part of the tree, ignoring");
        return previous.clone();
    };

    match toggle {
        Toggle::Unchecked(path) => {
            let descendants = collect_descendant_paths(node);
            trace!(%path, descendants = descendants.len(), "cascade uncheck");

            previous
                .iter()
                .filter(|selected| *selected != path && !descendants.contains(*selected))
                .collect()
        }
        Toggle::Checked(path) => {
            let ancestors = collect_ancestor_path(tree, &path);
            trace!(%path, ancestors = ancestors.len(), "cascade check");

            let mut selection = next;
            selection.extend(ancestors);
            selection
        }
    }
}
