use std::sync::Arc;

use anyhow::{Context, Result};

use crate::model::{Descriptor, LogicalPath, VersionOptions, VersionSet, VersionToken};

mod http_client;
pub use self::http_client::{PROTOCOL_VERSION, PROTOCOL_VERSION_HEADER, StoreError};

mod credentials;
pub use self::credentials::{Anonymous, AuthIdentity, CredentialProvider, SharedCredentials};

mod listing;
mod versions;

/// Blocking client for the file/version store's REST contract.
pub struct RemoteClient {
    base: url::Url,
    credentials: Arc<dyn CredentialProvider>,
    client: reqwest::blocking::Client,
}

impl RemoteClient {
    pub fn new(base_url: &str, credentials: Arc<dyn CredentialProvider>) -> Result<Self> {
        let base = url::Url::parse(base_url).with_context(|| format!("parse {}", base_url))?;
        if base.cannot_be_a_base() {
            anyhow::bail!("store url cannot be a base: {}", base_url);
        }
        let client = reqwest::blocking::Client::builder()
            .user_agent("vfbrowse")
            .build()
            .context("build reqwest client")?;
        Ok(Self {
            base,
            credentials,
            client,
        })
    }

    pub fn base_url(&self) -> &url::Url {
        &self.base
    }

    pub fn credentials(&self) -> &Arc<dyn CredentialProvider> {
        &self.credentials
    }
}
