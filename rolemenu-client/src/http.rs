// SPDX-License-Identifier: MIT OR Apache-2.0

//! REST backend serving templates, roles and stored permissions.
//!
//! | call                  | request                     |
//! |-----------------------|-----------------------------|
//! | template              | `GET /plantilla`            |
//! | permissions of a role | `GET /plantilla/:roleId`    |
//! | store permissions     | `POST /plantilla`           |
//! | roles                 | `GET /roles`                |
use reqwest::StatusCode;
use rolemenu_tree::{Role, RoleId, RoleIdError, SavePayload, TreeNode, WireError, decode_permissions};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use crate::config::ClientConfig;
use crate::session::AuthenticatedClient;
use crate::source::{Classify, FailureKind, MenuSource, PersistenceSink, RoleSource};

const TEMPLATE_ENDPOINT: &str = "plantilla";
const ROLES_ENDPOINT: &str = "roles";

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("backend answered {status} for {url}")]
    Status { status: StatusCode, url: Url },

    #[error("invalid endpoint: {0}")]
    Endpoint(#[from] url::ParseError),

    #[error("malformed response body: {0}")]
    Body(#[from] serde_json::Error),

    #[error(transparent)]
    Permissions(#[from] WireError),

    #[error("template response contains no rows")]
    MissingTemplate,

    #[error(transparent)]
    Role(#[from] RoleIdError),
}

impl Classify for HttpError {
    fn kind(&self) -> FailureKind {
        match self {
            HttpError::Request(_) | HttpError::Status { .. } => FailureKind::Network,
            HttpError::Body(_) | HttpError::Permissions(_) | HttpError::MissingTemplate => {
                FailureKind::Parse
            }
            HttpError::Endpoint(_) | HttpError::Role(_) => FailureKind::Validation,
        }
    }
}

/// Row of the template table, the tree lives encoded in `permisos`.
#[derive(Debug, Deserialize)]
struct TemplateRow {
    #[serde(default)]
    permisos: Value,
}

/// Client of the permissions REST API.
#[derive(Clone, Debug)]
pub struct HttpBackend {
    config: ClientConfig,
    client: AuthenticatedClient,
}

impl HttpBackend {
    pub fn new(config: ClientConfig, client: AuthenticatedClient) -> Self {
        Self { config, client }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    async fn fetch(&self, path: &str) -> Result<String, HttpError> {
        let url = self.config.endpoint(path)?;
        debug!(%url, "GET");

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!(%url, %status, "request rejected by backend");
            return Err(HttpError::Status { status, url });
        }

        Ok(response.text().await?)
    }
}

impl MenuSource for HttpBackend {
    type Error = HttpError;

    async fn menu_items(&self) -> Result<Vec<TreeNode>, Self::Error> {
        let body = self.fetch(TEMPLATE_ENDPOINT).await?;
        parse_template(&body)
    }

    async fn role_menu(&self, role: RoleId) -> Result<Vec<TreeNode>, Self::Error> {
        if !role.is_valid() {
            return Ok(Vec::new());
        }

        let body = self.fetch(&format!("{TEMPLATE_ENDPOINT}/{role}")).await?;
        parse_role_menu(&body)
    }
}

impl RoleSource for HttpBackend {
    type Error = HttpError;

    async fn roles(&self) -> Result<Vec<Role>, Self::Error> {
        let body = self.fetch(ROLES_ENDPOINT).await?;
        Ok(serde_json::from_str(&body)?)
    }
}

impl PersistenceSink for HttpBackend {
    type Error = HttpError;

    async fn save_role_menu(&self, role: RoleId, tree: Vec<TreeNode>) -> Result<(), Self::Error> {
        let role = role.validate()?;
        let payload = SavePayload::new(role, &tree)?;

        let url = self.config.endpoint(TEMPLATE_ENDPOINT)?;
        debug!(%url, %role, "POST");

        let response = self.client.post(url.clone()).json(&payload).send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!(%url, %status, %role, "saving permissions rejected by backend");
            return Err(HttpError::Status { status, url });
        }

        Ok(())
    }
}

/// The template is stored in the first row of the template table.
fn parse_template(body: &str) -> Result<Vec<TreeNode>, HttpError> {
    let rows: Vec<TemplateRow> = serde_json::from_str(body)?;
    let row = rows.into_iter().next().ok_or(HttpError::MissingTemplate)?;
    Ok(decode_permissions(&row.permisos)?)
}

/// A role without rows has no permissions stored yet.
fn parse_role_menu(body: &str) -> Result<Vec<TreeNode>, HttpError> {
    let rows: Option<Vec<TemplateRow>> = serde_json::from_str(body)?;
    match rows.and_then(|rows| rows.into_iter().next()) {
        Some(row) => Ok(decode_permissions(&row.permisos)?),
        None => Ok(Vec::new()),
    }
}
