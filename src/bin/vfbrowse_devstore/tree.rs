//! In-memory file tree with versioned files.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::UNIX_EPOCH;

use anyhow::{Context, Result};
use globset::GlobSet;

use vfbrowse::model::{
    ChildEntry, Descriptor, FileInfo, VersionEntry, VersionOptions, VersionSet, VersionToken,
};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub(crate) enum TreeError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("invalid path: {0}")]
    InvalidPath(String),
    #[error("not a versioned file: {0}")]
    NotVersioned(String),
    #[error("unknown version {0}")]
    UnknownVersion(u64),
    #[error("{0}")]
    Conflict(String),
}

#[derive(Clone, Debug)]
pub(crate) struct StoredVersion {
    version: u64,
    content: Vec<u8>,
    last_modified: i64,
    hidden: bool,
    comment: String,
}

#[derive(Clone, Debug)]
pub(crate) enum Node {
    Dir {
        last_modified: i64,
    },
    File {
        content: Vec<u8>,
        last_modified: i64,
    },
    Versioned {
        versions: Vec<StoredVersion>,
        default: u64,
    },
}

/// Keys are slash-joined paths below the root; the root itself is `""`.
#[derive(Debug, Default)]
pub(crate) struct Tree {
    nodes: BTreeMap<String, Node>,
}

pub(crate) fn now_ms() -> i64 {
    (time::OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64
}

/// Validates a request path and turns it into a tree key.
pub(crate) fn normalize(raw: &str) -> Result<String, TreeError> {
    let trimmed = raw.trim_matches('/');
    if trimmed.is_empty() {
        return Ok(String::new());
    }
    for seg in trimmed.split('/') {
        if seg.is_empty() || seg == "." || seg == ".." {
            return Err(TreeError::InvalidPath(raw.to_string()));
        }
    }
    Ok(trimmed.to_string())
}

fn parent_of(key: &str) -> Option<&str> {
    if key.is_empty() {
        return None;
    }
    Some(key.rsplit_once('/').map(|(p, _)| p).unwrap_or(""))
}

fn name_of(key: &str) -> &str {
    key.rsplit('/').next().unwrap_or(key)
}

pub(crate) fn mime_for(name: &str) -> &'static str {
    let ext = name
        .rsplit_once('.')
        .map(|(_, e)| e.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "txt" | "log" => "text/plain",
        "md" => "text/markdown",
        "html" | "htm" => "text/html",
        "css" => "text/css",
        "csv" => "text/csv",
        "json" => "text/json",
        "xml" => "text/xml",
        "rs" | "toml" | "yaml" | "yml" => "text/plain",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

impl Tree {
    pub(crate) fn new() -> Self {
        let mut nodes = BTreeMap::new();
        nodes.insert(
            String::new(),
            Node::Dir {
                last_modified: now_ms(),
            },
        );
        Self { nodes }
    }

    /// Copies `root` into memory. Files whose relative path matches `versioned` start as
    /// versioned files holding their content as version 1.
    pub(crate) fn seed(root: &Path, versioned: &GlobSet) -> Result<Self> {
        let mut tree = Self::new();
        let mut pending = vec![(root.to_path_buf(), String::new())];
        while let Some((dir, key)) = pending.pop() {
            let entries =
                std::fs::read_dir(&dir).with_context(|| format!("read dir {}", dir.display()))?;
            for entry in entries {
                let entry = entry.with_context(|| format!("read dir {}", dir.display()))?;
                let name = entry.file_name().to_string_lossy().into_owned();
                let child = if key.is_empty() {
                    name.clone()
                } else {
                    format!("{}/{}", key, name)
                };
                let meta = entry
                    .metadata()
                    .with_context(|| format!("stat {}", entry.path().display()))?;
                let modified = meta
                    .modified()
                    .ok()
                    .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
                    .map(|d| d.as_millis() as i64)
                    .unwrap_or_else(now_ms);
                if meta.is_dir() {
                    tree.nodes.insert(
                        child.clone(),
                        Node::Dir {
                            last_modified: modified,
                        },
                    );
                    pending.push((entry.path(), child));
                } else {
                    let content = std::fs::read(entry.path())
                        .with_context(|| format!("read {}", entry.path().display()))?;
                    if versioned.is_match(&child) {
                        tree.insert_versioned(&child, content, modified);
                    } else {
                        tree.insert_file(&child, content, modified);
                    }
                }
            }
        }
        tracing::info!(root = %root.display(), nodes = tree.nodes.len(), "tree seeded");
        Ok(tree)
    }

    pub(crate) fn insert_file(&mut self, key: &str, content: Vec<u8>, last_modified: i64) {
        self.ensure_parents(key);
        self.nodes.insert(
            key.to_string(),
            Node::File {
                content,
                last_modified,
            },
        );
    }

    /// Starts a versioned file with `content` as version 1.
    pub(crate) fn insert_versioned(&mut self, key: &str, content: Vec<u8>, last_modified: i64) {
        self.ensure_parents(key);
        self.nodes.insert(
            key.to_string(),
            Node::Versioned {
                versions: vec![StoredVersion {
                    version: 1,
                    content,
                    last_modified,
                    hidden: false,
                    comment: String::new(),
                }],
                default: 1,
            },
        );
    }

    fn ensure_parents(&mut self, key: &str) {
        let mut cur = parent_of(key);
        while let Some(p) = cur {
            self.nodes
                .entry(p.to_string())
                .or_insert(Node::Dir {
                    last_modified: now_ms(),
                });
            cur = parent_of(p);
        }
    }

    fn node(&self, key: &str) -> Result<&Node, TreeError> {
        self.nodes
            .get(key)
            .ok_or_else(|| TreeError::NotFound(display(key)))
    }

    pub(crate) fn describe(&self, key: &str) -> Result<Descriptor, TreeError> {
        match self.node(key)? {
            Node::Dir { .. } => {
                let children = self
                    .nodes
                    .iter()
                    .filter(|(k, _)| parent_of(k) == Some(key))
                    .map(|(k, n)| {
                        let (size, last_modified) = size_and_modified(n);
                        ChildEntry {
                            name: name_of(k).to_string(),
                            size,
                            last_modified,
                        }
                    })
                    .collect();
                Ok(Descriptor::Directory { children })
            }
            node @ (Node::File { .. } | Node::Versioned { .. }) => {
                let (size, last_modified) = size_and_modified(node);
                Ok(Descriptor::File(FileInfo {
                    name: name_of(key).to_string(),
                    size,
                    last_modified,
                    mime_type: Some(mime_for(key).to_string()),
                    versioned_file: matches!(node, Node::Versioned { .. }),
                }))
            }
        }
    }

    /// Plain download: file content, or the default version of a versioned file.
    pub(crate) fn content(&self, key: &str) -> Result<Vec<u8>, TreeError> {
        match self.node(key)? {
            Node::Dir { .. } => Err(TreeError::NotFound(display(key))),
            Node::File { content, .. } => Ok(content.clone()),
            Node::Versioned { .. } => self.version_content(key, VersionToken::Default),
        }
    }

    fn versioned(&self, key: &str) -> Result<(&[StoredVersion], u64), TreeError> {
        match self.node(key)? {
            Node::Versioned { versions, default } => Ok((versions, *default)),
            _ => Err(TreeError::NotVersioned(display(key))),
        }
    }

    pub(crate) fn version_set(&self, key: &str) -> Result<VersionSet, TreeError> {
        let (versions, default) = self.versioned(key)?;
        Ok(VersionSet {
            versions: versions
                .iter()
                .map(|v| VersionEntry {
                    version: v.version,
                    size: v.content.len() as u64,
                    last_modified: v.last_modified,
                    hidden: v.hidden,
                    comment: v.comment.clone(),
                })
                .collect(),
            default: Some(default),
            latest: versions.iter().map(|v| v.version).max(),
        })
    }

    pub(crate) fn version_content(&self, key: &str, which: VersionToken) -> Result<Vec<u8>, TreeError> {
        let (versions, default) = self.versioned(key)?;
        let wanted = match which {
            VersionToken::Default => default,
            VersionToken::Latest => versions.iter().map(|v| v.version).max().unwrap_or(default),
            VersionToken::Ordinal(n) => n,
        };
        versions
            .iter()
            .find(|v| v.version == wanted)
            .map(|v| v.content.clone())
            .ok_or(TreeError::UnknownVersion(wanted))
    }

    pub(crate) fn upload(&mut self, key: &str, content: Vec<u8>) -> Result<VersionSet, TreeError> {
        let node = self
            .nodes
            .get_mut(key)
            .ok_or_else(|| TreeError::NotFound(display(key)))?;
        let Node::Versioned { versions, .. } = node else {
            return Err(TreeError::NotVersioned(display(key)));
        };
        let next = versions.iter().map(|v| v.version).max().unwrap_or(0) + 1;
        versions.push(StoredVersion {
            version: next,
            content,
            last_modified: now_ms(),
            hidden: false,
            comment: String::new(),
        });
        tracing::info!(path = %display(key), version = next, "version uploaded");
        self.version_set(key)
    }

    pub(crate) fn set_options(
        &mut self,
        key: &str,
        options: &VersionOptions,
    ) -> Result<VersionSet, TreeError> {
        let node = self
            .nodes
            .get_mut(key)
            .ok_or_else(|| TreeError::NotFound(display(key)))?;
        let Node::Versioned { versions, default } = node else {
            return Err(TreeError::NotVersioned(display(key)));
        };
        let latest = versions.iter().map(|v| v.version).max().unwrap_or(0);
        let is_default = *default == options.version;
        let entry = versions
            .iter_mut()
            .find(|v| v.version == options.version)
            .ok_or(TreeError::UnknownVersion(options.version))?;

        let hidden_after = options.hidden.unwrap_or(entry.hidden);
        let default_after = options.default == Some(true) || is_default;
        if hidden_after && default_after {
            return Err(TreeError::Conflict(format!(
                "version {} cannot be hidden and the default",
                entry.version
            )));
        }
        if hidden_after && entry.version == latest {
            return Err(TreeError::Conflict(format!(
                "latest version {} cannot be hidden",
                entry.version
            )));
        }

        entry.hidden = hidden_after;
        if let Some(comment) = &options.comment {
            entry.comment = comment.clone();
        }
        if options.default == Some(true) {
            *default = entry.version;
        }
        tracing::info!(path = %display(key), version = options.version, "version options updated");
        self.version_set(key)
    }
}

fn size_and_modified(node: &Node) -> (u64, i64) {
    match node {
        Node::Dir { last_modified } => (0, *last_modified),
        Node::File {
            content,
            last_modified,
        } => (content.len() as u64, *last_modified),
        Node::Versioned { versions, default } => versions
            .iter()
            .find(|v| v.version == *default)
            .map(|v| (v.content.len() as u64, v.last_modified))
            .unwrap_or((0, 0)),
    }
}

fn display(key: &str) -> String {
    if key.is_empty() {
        ".".to_string()
    } else {
        format!("./{}", key)
    }
}

#[cfg(test)]
#[path = "../../tests/bin/vfbrowse_devstore/tree_tests.rs"]
mod tests;
