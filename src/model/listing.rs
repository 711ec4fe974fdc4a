use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildEntry {
    pub name: String,
    #[serde(default)]
    pub size: u64,
    /// Milliseconds since the Unix epoch.
    #[serde(default)]
    pub last_modified: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub last_modified: i64,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub versioned_file: bool,
}

impl FileInfo {
    pub fn is_text(&self) -> bool {
        self.mime_type
            .as_deref()
            .is_some_and(|m| m.starts_with("text/"))
    }

    pub fn is_image(&self) -> bool {
        self.mime_type
            .as_deref()
            .is_some_and(|m| m.starts_with("image/"))
    }
}

/// What the store returned for one path.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "DescriptorWire", into = "DescriptorWire")]
pub enum Descriptor {
    Directory { children: Vec<ChildEntry> },
    File(FileInfo),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DescriptorKind {
    VersionedFile,
    Directory,
    File,
}

impl Descriptor {
    pub fn kind(&self) -> DescriptorKind {
        match self {
            Descriptor::Directory { .. } => DescriptorKind::Directory,
            Descriptor::File(f) if f.versioned_file => DescriptorKind::VersionedFile,
            Descriptor::File(_) => DescriptorKind::File,
        }
    }

    pub fn children(&self) -> &[ChildEntry] {
        match self {
            Descriptor::Directory { children } => children,
            Descriptor::File(_) => &[],
        }
    }
}

/// Flat wire shape: a directory carries `children`; a file carries the metadata fields.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DescriptorWire {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    children: Option<Vec<ChildEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    last_modified: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    mime_type: Option<String>,
    #[serde(default, alias = "isVersionedFile", skip_serializing_if = "is_false")]
    versioned_file: bool,
}

fn is_false(v: &bool) -> bool {
    !*v
}

impl From<DescriptorWire> for Descriptor {
    fn from(w: DescriptorWire) -> Self {
        // A versioned file wins even when the store also sends `children`.
        if !w.versioned_file
            && let Some(children) = w.children
        {
            return Descriptor::Directory { children };
        }
        Descriptor::File(FileInfo {
            name: w.name.unwrap_or_default(),
            size: w.size.unwrap_or_default(),
            last_modified: w.last_modified.unwrap_or_default(),
            mime_type: w.mime_type,
            versioned_file: w.versioned_file,
        })
    }
}

impl From<Descriptor> for DescriptorWire {
    fn from(d: Descriptor) -> Self {
        match d {
            Descriptor::Directory { children } => DescriptorWire {
                children: Some(children),
                ..Default::default()
            },
            Descriptor::File(f) => DescriptorWire {
                children: None,
                name: Some(f.name),
                size: Some(f.size),
                last_modified: Some(f.last_modified),
                mime_type: f.mime_type,
                versioned_file: f.versioned_file,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_directory_and_file_shapes() {
        let dir: Descriptor = serde_json::from_str(
            r#"{"children":[{"name":"readme.txt","size":120,"lastModified":1700000000000}]}"#,
        )
        .unwrap();
        assert_eq!(dir.kind(), DescriptorKind::Directory);
        assert_eq!(dir.children()[0].name, "readme.txt");
        assert_eq!(dir.children()[0].size, 120);

        let file: Descriptor = serde_json::from_str(
            r#"{"name":"a.png","size":5,"lastModified":1,"mimeType":"image/png"}"#,
        )
        .unwrap();
        assert_eq!(file.kind(), DescriptorKind::File);
        let Descriptor::File(info) = file else {
            panic!("expected file");
        };
        assert!(info.is_image());
        assert!(!info.is_text());

        let versioned: Descriptor = serde_json::from_str(
            r#"{"name":"notes.txt","size":5,"lastModified":1,"mimeType":"text/plain","versionedFile":true}"#,
        )
        .unwrap();
        assert_eq!(versioned.kind(), DescriptorKind::VersionedFile);
    }

    #[test]
    fn empty_object_is_a_plain_file() {
        let d: Descriptor = serde_json::from_str("{}").unwrap();
        assert_eq!(d.kind(), DescriptorKind::File);
    }
}
