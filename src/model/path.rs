use std::fmt;

use serde::{Deserialize, Serialize};

/// Marker for the configured root. Every logical path starts with it.
pub const ROOT: &str = ".";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PathError {
    #[error("path is empty")]
    Empty,
    #[error("path must start at the root (\".\"): {0}")]
    NotRooted(String),
    #[error("invalid path segment {0:?}")]
    InvalidSegment(String),
}

/// Slash-delimited location relative to the store root, e.g. `./docs/readme.txt`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LogicalPath(String);

impl LogicalPath {
    pub fn root() -> Self {
        Self(ROOT.to_string())
    }

    pub fn parse(raw: &str) -> Result<Self, PathError> {
        let trimmed = raw.trim_end_matches('/');
        if trimmed.is_empty() {
            if raw.is_empty() {
                return Err(PathError::Empty);
            }
            return Err(PathError::NotRooted(raw.to_string()));
        }
        let mut segments = trimmed.split('/');
        if segments.next() != Some(ROOT) {
            return Err(PathError::NotRooted(raw.to_string()));
        }
        for seg in segments {
            validate_segment(seg)?;
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Derives a path from an address-bar location under `prefix`.
    ///
    /// `/dev/docs/a.txt` with prefix `/dev` becomes `./docs/a.txt`; `/dev` and `/dev/` become
    /// the root. Locations outside the prefix or with malformed segments fall back to the root.
    pub fn from_location(location: &str, prefix: &str) -> Self {
        let Some(rest) = location.strip_prefix(prefix) else {
            tracing::warn!(location, prefix, "location outside prefix; using root");
            return Self::root();
        };
        let rest = rest.trim_end_matches('/');
        if rest.is_empty() {
            return Self::root();
        }
        if !rest.starts_with('/') {
            tracing::warn!(location, prefix, "location does not continue the prefix; using root");
            return Self::root();
        }
        match Self::parse(&format!("{}{}", ROOT, rest)) {
            Ok(p) => p,
            Err(err) => {
                tracing::warn!(location, error = %err, "malformed location; using root");
                Self::root()
            }
        }
    }

    /// Display URL for this path: `prefix` followed by the path without its leading `.`.
    pub fn display_url(&self, prefix: &str) -> String {
        format!("{}{}", prefix, &self.0[ROOT.len()..])
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0 == ROOT
    }

    pub fn segments(&self) -> Vec<&str> {
        self.0.split('/').collect()
    }

    /// Segments below the root, as sent to the store.
    pub fn store_segments(&self) -> Vec<&str> {
        self.0.split('/').skip(1).collect()
    }

    pub fn name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(ROOT)
    }

    pub fn child(&self, name: &str) -> Result<Self, PathError> {
        validate_segment(name)?;
        Ok(Self(format!("{}/{}", self.0, name)))
    }

    /// Path formed by segments `[0..=index]`; `None` when `index` is past the end.
    pub fn truncate(&self, index: usize) -> Option<Self> {
        let segments = self.segments();
        if index >= segments.len() {
            return None;
        }
        Some(Self(segments[..=index].join("/")))
    }
}

fn validate_segment(seg: &str) -> Result<(), PathError> {
    if seg.is_empty() || seg == "." || seg == ".." || seg.contains('/') {
        return Err(PathError::InvalidSegment(seg.to_string()));
    }
    Ok(())
}

impl Default for LogicalPath {
    fn default() -> Self {
        Self::root()
    }
}

impl fmt::Display for LogicalPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for LogicalPath {
    type Error = PathError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<LogicalPath> for String {
    fn from(value: LogicalPath) -> Self {
        value.0
    }
}
