use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::LogicalPath;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionEntry {
    pub version: u64,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub last_modified: i64,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub comment: String,
}

/// The store's authoritative version list for one file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionSet {
    #[serde(default)]
    pub versions: Vec<VersionEntry>,
    #[serde(default)]
    pub default: Option<u64>,
    #[serde(default)]
    pub latest: Option<u64>,
}

impl VersionSet {
    pub fn get(&self, version: u64) -> Option<&VersionEntry> {
        self.versions.iter().find(|v| v.version == version)
    }

    pub fn is_default(&self, version: u64) -> bool {
        self.default == Some(version)
    }

    pub fn is_latest(&self, version: u64) -> bool {
        self.latest == Some(version)
    }

    /// Rows shown to the user; hidden rows are dropped unless `show_hidden`.
    pub fn visible(&self, show_hidden: bool) -> impl Iterator<Item = &VersionEntry> {
        self.versions.iter().filter(move |v| show_hidden || !v.hidden)
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("invalid version token {0:?} (expected default, latest or a version number)")]
pub struct VersionTokenError(String);

/// A version selector: symbolic `default`/`latest` or a concrete ordinal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum VersionToken {
    #[default]
    Default,
    Latest,
    Ordinal(u64),
}

impl fmt::Display for VersionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionToken::Default => f.write_str("default"),
            VersionToken::Latest => f.write_str("latest"),
            VersionToken::Ordinal(n) => write!(f, "{}", n),
        }
    }
}

impl FromStr for VersionToken {
    type Err = VersionTokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "default" => Ok(VersionToken::Default),
            "latest" => Ok(VersionToken::Latest),
            other => other
                .parse::<u64>()
                .map(VersionToken::Ordinal)
                .map_err(|_| VersionTokenError(s.to_string())),
        }
    }
}

/// Partial update merged by the store into one version's options.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionOptions {
    pub version: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hidden: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl VersionOptions {
    pub fn make_default(version: u64) -> Self {
        Self {
            version,
            default: Some(true),
            hidden: None,
            comment: None,
        }
    }

    pub fn hidden(version: u64, hidden: bool) -> Self {
        Self {
            version,
            default: None,
            hidden: Some(hidden),
            comment: None,
        }
    }

    pub fn comment(version: u64, comment: String) -> Self {
        Self {
            version,
            default: None,
            hidden: None,
            comment: Some(comment),
        }
    }
}

/// Where an edit surface reads its text from.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ContentLocation {
    /// `download/{path}`
    File(LogicalPath),
    /// `version/download/{path}?version={token}`
    Version {
        path: LogicalPath,
        token: VersionToken,
    },
}

impl fmt::Display for ContentLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentLocation::File(path) => write!(f, "download/{}", path),
            ContentLocation::Version { path, token } => {
                write!(f, "version/download/{}?version={}", path, token)
            }
        }
    }
}
