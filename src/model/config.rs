use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/rest-file-server/rest/";
pub const DEFAULT_URL_PREFIX: &str = "/dev";

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_url_prefix() -> String {
    DEFAULT_URL_PREFIX.to_string()
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrowserConfig {
    /// Base URL of the store's REST API; endpoint paths are appended to it.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Address-bar prefix under which logical paths are displayed.
    #[serde(default = "default_url_prefix")]
    pub url_prefix: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    // Prefer VFBROWSE_TOKEN over storing the token here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    #[serde(default)]
    pub show_hidden: bool,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            url_prefix: default_url_prefix(),
            user: None,
            token: None,
            show_hidden: false,
        }
    }
}

impl BrowserConfig {
    /// Reads a JSON config file; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = match std::fs::read(path) {
            Ok(b) => b,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(err) => {
                return Err(err).with_context(|| format!("read config {}", path.display()));
            }
        };
        let cfg: BrowserConfig = serde_json::from_slice(&bytes)
            .with_context(|| format!("parse config {}", path.display()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        let url = url::Url::parse(&self.base_url)
            .with_context(|| format!("invalid base_url {:?}", self.base_url))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            anyhow::bail!("base_url must be http(s): {}", self.base_url);
        }
        if url.cannot_be_a_base() {
            anyhow::bail!("base_url cannot be used as a base: {}", self.base_url);
        }
        if !self.url_prefix.starts_with('/') {
            anyhow::bail!("url_prefix must start with '/': {:?}", self.url_prefix);
        }
        if self.token.is_some() && self.user.is_none() {
            anyhow::bail!("token configured without a user");
        }
        Ok(())
    }
}
