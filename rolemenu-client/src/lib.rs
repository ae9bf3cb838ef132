// SPDX-License-Identifier: MIT OR Apache-2.0

//! Client side of the role menu permission editor.
//!
//! The [`PermissionEditor`] drives the page: it loads the permission template and the roles,
//! restores the permissions stored for a role, reconciles every toggle of the tree widget and
//! stores the result again. It talks to its collaborators through the [`MenuSource`],
//! [`RoleSource`] and [`PersistenceSink`] traits, which [`HttpBackend`] implements against the
//! REST API. Users are reported to through a [`Notifier`].
//!
//! ```no_run
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! use reqwest::Client;
//! use rolemenu_client::{
//!     ClientConfig, Credentials, HttpBackend, LogNotifier, PermissionEditor, login,
//! };
//! use rolemenu_tree::RoleId;
//!
//! let config = ClientConfig::builder().base_url("https://admin.example.org/api/").build()?;
//! let http = Client::new();
//!
//! let session = login(&config, &http, &Credentials::new("ana", "secreto")).await?;
//! let backend = HttpBackend::new(config.clone(), session.client(http));
//!
//! let editor = PermissionEditor::from_backend(config, backend, LogNotifier);
//! editor.mount().await?;
//! editor.select_role(RoleId::new(2)).await?;
//! editor.save().await?;
//! # Ok(())
//! # }
//! ```
mod config;
mod editor;
mod http;
mod notify;
mod session;
mod source;
#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;
#[cfg(test)]
mod tests;

pub use config::{ClientConfig, ClientConfigBuilder, ConfigError, DEFAULT_BASE_URL, default_menu};
pub use editor::{EditorError, EditorOperation, EditorState, PermissionEditor};
pub use http::{HttpBackend, HttpError};
pub use notify::{LogNotifier, Notification, NotificationLevel, Notifier};
pub use session::{
    AuthError, AuthenticatedClient, Credentials, DEFAULT_BRANCH, Session, User, login,
};
pub use source::{Classify, FailureKind, MenuSource, PersistenceSink, RoleSource};
