// SPDX-License-Identifier: MIT OR Apache-2.0

//! Logging in against the backend and handing out authenticated HTTP clients.
//!
//! Nothing here touches global state: a successful [`login`] returns a [`Session`] and every
//! component which needs to talk to protected endpoints receives an [`AuthenticatedClient`]
//! derived from it.
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::{Client, RequestBuilder, StatusCode};
use rolemenu_tree::{RoleId, TreeNode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::source::{Classify, FailureKind};

const LOGIN_ENDPOINT: &str = "usuarios/login";

/// Branch a fresh session works on.
pub const DEFAULT_BRANCH: &str = "main";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

#[derive(Clone, Debug)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Request body, the password is sent base64 encoded.
    fn to_request(&self) -> LoginRequest {
        LoginRequest {
            username: self.username.clone(),
            password: STANDARD.encode(self.password.as_bytes()),
        }
    }
}

#[derive(Debug, Serialize)]
struct LoginRequest {
    username: String,
    password: String,
}

/// Envelope of the login response. On success `message` carries the session data, otherwise
/// the reason the login was refused.
#[derive(Debug, Deserialize)]
struct LoginResponse {
    success: bool,
    #[serde(default)]
    message: Value,
}

#[derive(Debug, Deserialize)]
struct SessionData {
    token: String,
    user: User,
    #[serde(default)]
    rol: Option<RoleId>,
    #[serde(default)]
    empresa: Option<u64>,
    #[serde(default)]
    permisos: Value,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("login request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("login endpoint answered {status} for {url}")]
    Status { status: StatusCode, url: url::Url },

    #[error("invalid login endpoint: {0}")]
    Endpoint(#[from] url::ParseError),

    #[error("login refused: {0}")]
    Rejected(String),

    #[error("unexpected login response: {0}")]
    Malformed(#[from] serde_json::Error),
}

impl Classify for AuthError {
    fn kind(&self) -> FailureKind {
        match self {
            AuthError::Network(_) | AuthError::Status { .. } => FailureKind::Network,
            AuthError::Endpoint(_) | AuthError::Rejected(_) => FailureKind::Validation,
            AuthError::Malformed(_) => FailureKind::Parse,
        }
    }
}

/// Data of a logged in user.
#[derive(Clone, Debug)]
pub struct Session {
    user: User,
    token: String,
    company: Option<u64>,
    role: Option<RoleId>,
    permissions: Vec<TreeNode>,
    branch: String,
}

impl Session {
    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn company(&self) -> Option<u64> {
        self.company
    }

    pub fn role(&self) -> Option<RoleId> {
        self.role
    }

    /// Menu the logged in user was granted.
    pub fn permissions(&self) -> &[TreeNode] {
        &self.permissions
    }

    pub fn branch(&self) -> &str {
        &self.branch
    }

    pub fn set_branch(&mut self, branch: impl Into<String>) {
        self.branch = branch.into();
    }

    pub fn is_authenticated(&self) -> bool {
        !self.token.is_empty()
    }

    /// HTTP client sending this session's bearer token.
    pub fn client(&self, http: Client) -> AuthenticatedClient {
        AuthenticatedClient::with_token(http, self.token.clone())
    }

    /// End the session, returning an anonymous client reusing the same connection pool.
    pub fn logout(self, client: AuthenticatedClient) -> AuthenticatedClient {
        debug!(user = %self.user.id, "logged out");
        AuthenticatedClient::anonymous(client.http)
    }

    fn from_data(data: SessionData) -> Self {
        // Granted permissions are informative only, a malformed list must not prevent a login.
        let permissions = rolemenu_tree::decode_permissions(&data.permisos).unwrap_or_else(|err| {
            warn!("ignoring malformed permissions in login response: {err}");
            Vec::new()
        });

        Self {
            user: data.user,
            token: data.token,
            company: data.empresa,
            role: data.rol,
            permissions,
            branch: DEFAULT_BRANCH.to_string(),
        }
    }
}

/// Capability to send requests on behalf of a session.
#[derive(Clone, Debug, Default)]
pub struct AuthenticatedClient {
    http: Client,
    token: Option<String>,
}

impl AuthenticatedClient {
    /// Client without credentials.
    pub fn anonymous(http: Client) -> Self {
        Self { http, token: None }
    }

    /// Client sending `token` as bearer token with every request.
    pub fn with_token(http: Client, token: impl Into<String>) -> Self {
        Self {
            http,
            token: Some(token.into()),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub(crate) fn get(&self, url: url::Url) -> RequestBuilder {
        self.authorize(self.http.get(url))
    }

    pub(crate) fn post(&self, url: url::Url) -> RequestBuilder {
        self.authorize(self.http.post(url))
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

/// Log in with the given credentials.
pub async fn login(
    config: &ClientConfig,
    http: &Client,
    credentials: &Credentials,
) -> Result<Session, AuthError> {
    let url = config.endpoint(LOGIN_ENDPOINT)?;

    let response = http
        .post(url.clone())
        .json(&credentials.to_request())
        .send()
        .await?;
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        // Refused credentials come with a client error status and the regular envelope.
        return match parse_login_response(&body) {
            Err(err @ AuthError::Rejected(_)) if status.is_client_error() => Err(err),
            _ => {
                warn!(%url, %status, "login rejected by backend");
                Err(AuthError::Status { status, url })
            }
        };
    }

    let session = parse_login_response(&body)?;
    debug!(user = %session.user.id, role = ?session.role, "logged in");

    Ok(session)
}

fn parse_login_response(body: &str) -> Result<Session, AuthError> {
    let response: LoginResponse = serde_json::from_str(body)?;

    if !response.success {
        let reason = match response.message {
            Value::String(message) if !message.is_empty() => message,
            _ => "invalid credentials".to_string(),
        };
        return Err(AuthError::Rejected(reason));
    }

    let data: SessionData = serde_json::from_value(response.message)?;
    Ok(Session::from_data(data))
}
