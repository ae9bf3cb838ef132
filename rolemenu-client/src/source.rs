// SPDX-License-Identifier: MIT OR Apache-2.0

//! Interfaces to the collaborators the editor talks to.
//!
//! All three are usually implemented by the same HTTP backend (see [`HttpBackend`]) but are
//! kept apart so tests and alternative storage can provide them individually.
//!
//! [`HttpBackend`]: crate::HttpBackend
use std::error::Error;
use std::fmt::Display;
use std::future::Future;

use rolemenu_tree::{Role, RoleId, TreeNode};

/// Category of a failed collaborator call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// Request could not be sent, timed out or was answered with an error status.
    Network,

    /// Response arrived but did not match the expected schema.
    Parse,

    /// Request was refused before anything was sent.
    Validation,
}

impl Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            FailureKind::Network => "network",
            FailureKind::Parse => "parse",
            FailureKind::Validation => "validation",
        };

        write!(f, "{}", s)
    }
}

/// Errors which know which [`FailureKind`] they belong to.
pub trait Classify {
    fn kind(&self) -> FailureKind;
}

/// Source of the permission template and of the permissions stored per role.
pub trait MenuSource: Send + Sync + 'static {
    type Error: Error + Classify + Send + Sync + 'static;

    /// Full template every role selects from.
    fn menu_items(&self) -> impl Future<Output = Result<Vec<TreeNode>, Self::Error>> + Send;

    /// Permissions previously stored for a role. An empty tree means nothing was stored yet.
    fn role_menu(
        &self,
        role: RoleId,
    ) -> impl Future<Output = Result<Vec<TreeNode>, Self::Error>> + Send;
}

/// Source of the roles permissions can be assigned to.
pub trait RoleSource: Send + Sync + 'static {
    type Error: Error + Classify + Send + Sync + 'static;

    fn roles(&self) -> impl Future<Output = Result<Vec<Role>, Self::Error>> + Send;
}

/// Storage for the permissions of a role.
pub trait PersistenceSink: Send + Sync + 'static {
    type Error: Error + Classify + Send + Sync + 'static;

    /// Store the projected selection of a role. Implementations must refuse invalid role ids
    /// with a [`FailureKind::Validation`] error.
    fn save_role_menu(
        &self,
        role: RoleId,
        tree: Vec<TreeNode>,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;
}
