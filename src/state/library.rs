use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

use super::data::{normalize, normalize_root, ImageRecord, RawImageRecord};

/// The Catalog holds the image records of one project snapshot.
///
/// It is replaced wholesale on every refresh and only ever mutated in place
/// by single-record removal. Every mutation bumps `version`, so derived
/// views can tell whether they are current.
#[derive(Debug, Clone)]
pub struct Catalog {
    root: String,
    records: Vec<ImageRecord>,
    version: u64,
    refreshed_at: Option<DateTime<Utc>>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

impl Catalog {
    /// Create an empty catalog (version 0, no project root yet)
    pub fn new() -> Self {
        Self {
            root: String::new(),
            records: Vec::new(),
            version: 0,
            refreshed_at: None,
        }
    }

    /// Replace the whole catalog with a fresh provider response.
    ///
    /// The project root travels with the records computed from it.
    pub fn replace(&mut self, raw: Vec<RawImageRecord>, project_root: &str) {
        let root = normalize_root(project_root);
        self.records = normalize(raw, &root);
        self.root = root;
        self.version += 1;
        self.refreshed_at = Some(Utc::now());

        log::info!(
            "📁 Catalog v{} loaded: {} images under {}",
            self.version,
            self.records.len(),
            if self.root.is_empty() { "/" } else { self.root.as_str() }
        );
    }

    /// Remove the record whose `full_path` matches.
    ///
    /// Returns false (and leaves the version untouched) when the record is
    /// already gone. The external store is not affected.
    pub fn remove(&mut self, full_path: &str) -> bool {
        match self.records.iter().position(|r| r.full_path == full_path) {
            Some(index) => {
                self.records.remove(index);
                self.version += 1;
                log::debug!("Removed {full_path} from catalog (v{})", self.version);
                true
            }
            None => false,
        }
    }

    /// Normalized project root ("" before the first refresh)
    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn records(&self) -> &[ImageRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn refreshed_at(&self) -> Option<DateTime<Utc>> {
        self.refreshed_at
    }

    pub fn find(&self, full_path: &str) -> Option<&ImageRecord> {
        self.records.iter().find(|r| r.full_path == full_path)
    }

    /// True when at least one record's directory contains `needle`
    pub fn any_directory_contains(&self, needle: &str) -> bool {
        self.records.iter().any(|r| r.directory.contains(needle))
    }

    /// Every distinct extension (sorted) with the number of records carrying it
    pub fn type_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for record in &self.records {
            *counts.entry(record.file_extension.clone()).or_insert(0) += 1;
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(path: &str) -> RawImageRecord {
        RawImageRecord {
            path: path.to_string(),
            size: 1,
            host_display_path: String::new(),
        }
    }

    #[test]
    fn test_replace_bumps_version_and_captures_root() {
        let mut catalog = Catalog::new();
        assert_eq!(catalog.version(), 0);
        assert!(catalog.refreshed_at().is_none());

        catalog.replace(vec![raw("/a.png")], "/root/");
        assert_eq!(catalog.version(), 1);
        assert_eq!(catalog.root(), "/root");
        assert_eq!(catalog.records()[0].full_path, "/root/a.png");
        assert!(catalog.refreshed_at().is_some());

        catalog.replace(vec![], "/other");
        assert_eq!(catalog.version(), 2);
        assert!(catalog.is_empty());
        assert_eq!(catalog.root(), "/other");
    }

    #[test]
    fn test_remove_existing_and_absent() {
        let mut catalog = Catalog::new();
        catalog.replace(vec![raw("/a.png"), raw("/b.png")], "/r");
        let v = catalog.version();

        assert!(catalog.remove("/r/a.png"));
        assert_eq!(catalog.version(), v + 1);
        assert_eq!(catalog.len(), 1);

        // Stale path: no-op
        assert!(!catalog.remove("/r/a.png"));
        assert_eq!(catalog.version(), v + 1);
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_type_counts() {
        let mut catalog = Catalog::new();
        catalog.replace(
            vec![raw("/a.png"), raw("/b.svg"), raw("/c.png"), raw("/d")],
            "/r",
        );
        let counts = catalog.type_counts();
        let pairs: Vec<_> = counts.iter().map(|(k, v)| (k.as_str(), *v)).collect();
        assert_eq!(pairs, [("", 1), ("png", 2), ("svg", 1)]);
    }

    #[test]
    fn test_any_directory_contains() {
        let mut catalog = Catalog::new();
        catalog.replace(vec![raw("/src/a.png"), raw("/icons.png")], "/r");
        assert!(catalog.any_directory_contains("/src/"));
        assert!(catalog.any_directory_contains("sr"));
        assert!(!catalog.any_directory_contains("/lib/"));
        // Only the file name matches: not a usable scope
        assert!(!catalog.any_directory_contains("/icons"));
    }
}
