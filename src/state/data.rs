//! Shared data structures for the panel state
//!
//! These structs represent the data model that flows between
//! the host transport and the derivation pipeline.

use serde::{Deserialize, Serialize};

/// A catalog entry exactly as the host provider reports it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawImageRecord {
    /// Catalog-relative, forward-slash separated (e.g. "/assets/logo.png")
    pub path: String,
    /// File size in bytes
    #[serde(default)]
    pub size: u64,
    /// Host-specific display path, passed through untouched
    #[serde(default, alias = "vscodePath")]
    pub host_display_path: String,
}

/// Represents a single image in the catalog, ready for display
///
/// Immutable once produced. `directory + file_name == path` always holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRecord {
    /// Catalog-relative path, unique within one catalog snapshot
    pub path: String,
    /// Project root + path
    pub full_path: String,
    /// Prefix of `path` up to and including the last `/` ("" = root)
    pub directory: String,
    /// Suffix of `path` after the last `/`
    pub file_name: String,
    /// Suffix of the file name after the last `.`, case preserved ("" = none)
    pub file_extension: String,
    /// Passthrough: size in bytes
    pub size: u64,
    /// Passthrough: host display path
    pub host_display_path: String,
}

impl ImageRecord {
    /// Derive a display record from a raw provider record.
    ///
    /// `project_root` must already be normalized (see [`normalize_root`]).
    pub fn from_raw(raw: RawImageRecord, project_root: &str) -> Self {
        let split = raw.path.rfind('/').map(|i| i + 1).unwrap_or(0);
        let directory = raw.path[..split].to_string();
        let file_name = raw.path[split..].to_string();
        let file_extension = file_name
            .rfind('.')
            .map(|i| file_name[i + 1..].to_string())
            .unwrap_or_default();
        let full_path = join_root(project_root, &raw.path);

        Self {
            path: raw.path,
            full_path,
            directory,
            file_name,
            file_extension,
            size: raw.size,
            host_display_path: raw.host_display_path,
        }
    }
}

/// Catalog Normalizer: map raw provider records to display records.
///
/// Pure and total; catalog order is preserved.
pub fn normalize(raw: Vec<RawImageRecord>, project_root: &str) -> Vec<ImageRecord> {
    raw.into_iter()
        .map(|r| ImageRecord::from_raw(r, project_root))
        .collect()
}

/// Trim trailing separators so that `root + "/src/a.png"` is well formed.
/// A bare "/" stays "" (filesystem root).
pub fn normalize_root(root: &str) -> String {
    root.trim_end_matches('/').to_string()
}

fn join_root(root: &str, path: &str) -> String {
    if path.is_empty() || path.starts_with('/') {
        format!("{root}{path}")
    } else {
        format!("{root}/{path}")
    }
}
