mod config;
mod listing;
mod path;
mod version;

pub use self::config::{BrowserConfig, DEFAULT_BASE_URL, DEFAULT_URL_PREFIX};
pub use self::listing::{ChildEntry, Descriptor, DescriptorKind, FileInfo};
pub use self::path::{LogicalPath, PathError, ROOT};
pub use self::version::{
    ContentLocation, VersionEntry, VersionOptions, VersionSet, VersionToken, VersionTokenError,
};
