// SPDX-License-Identifier: MIT OR Apache-2.0

use std::collections::BTreeSet;
use std::collections::btree_set;
use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Path of the landing page which every role is granted when nothing else was stored.
pub const ROOT_PATH: &str = "/";

/// Flat set of checked node paths.
///
/// Backed by an ordered set so iteration (and the "first changed path" scan of
/// [`apply_toggle`](crate::apply_toggle)) is deterministic.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectionSet(BTreeSet<String>);

impl SelectionSet {
    pub fn new() -> Self {
        Self(BTreeSet::new())
    }

    /// Selection handed to a role without any stored permissions: only the root path.
    pub fn root_only() -> Self {
        Self::from_iter([ROOT_PATH])
    }

    pub fn contains(&self, path: &str) -> bool {
        self.0.contains(path)
    }

    /// Insert a path, returns `false` if it was already selected.
    pub fn insert(&mut self, path: impl Into<String>) -> bool {
        self.0.insert(path.into())
    }

    /// Remove a path, returns `false` if it was not selected.
    pub fn remove(&mut self, path: &str) -> bool {
        self.0.remove(path)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Paths selected here but missing in `other`.
    pub fn missing_from<'a>(&'a self, other: &'a SelectionSet) -> impl Iterator<Item = &'a str> {
        self.0.difference(&other.0).map(String::as_str)
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0.into_iter().collect()
    }
}

impl<S> FromIterator<S> for SelectionSet
where
    S: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl<S> Extend<S> for SelectionSet
where
    S: Into<String>,
{
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        self.0.extend(iter.into_iter().map(Into::into));
    }
}

impl IntoIterator for SelectionSet {
    type Item = String;
    type IntoIter = btree_set::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl Display for SelectionSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{")?;
        for (index, path) in self.0.iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{path}")?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::SelectionSet;

    #[test]
    fn duplicate_free() {
        let mut selection = SelectionSet::from_iter(["/a", "/b", "/a"]);
        assert_eq!(selection.len(), 2);
        assert!(!selection.insert("/b"));
        assert!(selection.insert("/c"));
        assert_eq!(selection.to_string(), "{/a, /b, /c}");
    }

    #[test]
    fn difference_in_both_directions() {
        let before = SelectionSet::from_iter(["/a", "/b"]);
        let after = SelectionSet::from_iter(["/b", "/c"]);

        assert_eq!(before.missing_from(&after).collect::<Vec<_>>(), vec!["/a"]);
        assert_eq!(after.missing_from(&before).collect::<Vec<_>>(), vec!["/c"]);
    }

    #[test]
    fn serializes_as_plain_array() {
        let selection = SelectionSet::root_only();
        assert_eq!(serde_json::to_string(&selection).unwrap(), r#"["/"]"#);

        let decoded: SelectionSet = serde_json::from_str(r#"["/x", "/x", "/"]"#).unwrap();
        assert_eq!(decoded, SelectionSet::from_iter(["/", "/x"]));
    }
}
