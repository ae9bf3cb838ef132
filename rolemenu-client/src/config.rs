// SPDX-License-Identifier: MIT OR Apache-2.0

use rolemenu_tree::{SubtreeDepth, TreeNode};
use thiserror::Error;
use url::Url;

/// Address the backend listens on when nothing else was configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000/api/";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid base url: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),

    #[error("base url {0} can not be used for http requests")]
    UnsupportedBaseUrl(Url),
}

/// Settings shared by the HTTP backend, the session and the editor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    /// Prefix of every endpoint. Always ends with a slash so relative joins keep the path.
    pub base_url: Url,

    /// Projection used when storing a selection.
    pub subtree_depth: SubtreeDepth,

    /// Template used when the backend can not be reached while loading the template.
    ///
    /// `None` keeps the tree empty instead.
    pub fallback_menu: Option<Vec<TreeNode>>,
}

impl ClientConfig {
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }

    /// Resolve an endpoint relative to the base url.
    pub fn endpoint(&self, path: &str) -> Result<Url, url::ParseError> {
        self.base_url.join(path.trim_start_matches('/'))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base url is valid"),
            subtree_depth: SubtreeDepth::default(),
            fallback_menu: None,
        }
    }
}

#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    base_url: Option<String>,
    subtree_depth: Option<SubtreeDepth>,
    fallback_menu: Option<Vec<TreeNode>>,
}

impl ClientConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn subtree_depth(mut self, depth: SubtreeDepth) -> Self {
        self.subtree_depth = Some(depth);
        self
    }

    pub fn fallback_menu(mut self, menu: Vec<TreeNode>) -> Self {
        self.fallback_menu = Some(menu);
        self
    }

    pub fn build(self) -> Result<ClientConfig, ConfigError> {
        let defaults = ClientConfig::default();

        let base_url = match self.base_url {
            Some(base_url) => {
                let mut url = Url::parse(&base_url)?;
                if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
                    return Err(ConfigError::UnsupportedBaseUrl(url));
                }
                if !url.path().ends_with('/') {
                    let path = format!("{}/", url.path());
                    url.set_path(&path);
                }
                url
            }
            None => defaults.base_url,
        };

        Ok(ClientConfig {
            base_url,
            subtree_depth: self.subtree_depth.unwrap_or(defaults.subtree_depth),
            fallback_menu: self.fallback_menu,
        })
    }
}

/// The stock menu: landing page, colour settings and the permission editor itself.
pub fn default_menu() -> Vec<TreeNode> {
    vec![
        TreeNode::new("/", "Inicio").with_icon("home"),
        TreeNode::new("/colors", "Colores").with_icon("palette"),
        TreeNode::new("/permisos", "Opciones Menu").with_icon("admin_panel_settings"),
    ]
}

#[cfg(test)]
mod tests {
    use rolemenu_tree::SubtreeDepth;
    use rstest::rstest;

    use super::{ClientConfig, ConfigError, default_menu};

    #[test]
    fn endpoints_keep_the_base_path() {
        let config = ClientConfig::builder()
            .base_url("https://admin.example.org/api/v1")
            .build()
            .unwrap();

        assert_eq!(
            config.endpoint("/plantilla/4").unwrap().as_str(),
            "https://admin.example.org/api/v1/plantilla/4"
        );
        assert_eq!(
            config.endpoint("roles").unwrap().as_str(),
            "https://admin.example.org/api/v1/roles"
        );
    }

    #[test]
    fn defaults() {
        let config = ClientConfig::builder().build().unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.subtree_depth, SubtreeDepth::Unbounded);
        assert!(config.fallback_menu.is_none());
    }

    #[test]
    fn builder_overrides() {
        let config = ClientConfig::builder()
            .subtree_depth(SubtreeDepth::TwoLevels)
            .fallback_menu(default_menu())
            .build()
            .unwrap();

        assert_eq!(config.subtree_depth, SubtreeDepth::TwoLevels);
        assert_eq!(config.fallback_menu.map(|menu| menu.len()), Some(3));
    }

    #[rstest]
    #[case("http://localhost:3000/api", "http://localhost:3000/api/roles")]
    #[case("http://localhost:3000/api/", "http://localhost:3000/api/roles")]
    #[case("https://example.org", "https://example.org/roles")]
    fn trailing_slash_is_added(#[case] base_url: &str, #[case] expected: &str) {
        let config = ClientConfig::builder().base_url(base_url).build().unwrap();
        assert_eq!(config.endpoint("roles").unwrap().as_str(), expected);
    }

    #[test]
    fn rejects_non_http_urls() {
        assert!(matches!(
            ClientConfig::builder().base_url("not a url").build(),
            Err(ConfigError::InvalidBaseUrl(_))
        ));
        assert!(matches!(
            ClientConfig::builder().base_url("mailto:admin@example.org").build(),
            Err(ConfigError::UnsupportedBaseUrl(_))
        ));
        assert!(matches!(
            ClientConfig::builder().base_url("ftp://example.org/api/").build(),
            Err(ConfigError::UnsupportedBaseUrl(_))
        ));
    }
}
