//! Filter Pipeline
//!
//! Pure function from (catalog, directory scope, keyword, enabled types)
//! to the derived view. It has no memory of earlier expansion state:
//! every call returns the default expansion for its own result size.

use std::collections::BTreeSet;

use super::data::ImageRecord;

/// User-controlled filter parameters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    /// Substring filter over `directory` ("" = no restriction)
    pub directory_scope: String,
    /// Case-sensitive literal substring filter over `path` ("" = all)
    pub keyword: String,
    /// Extensions currently shown
    pub enabled_types: BTreeSet<String>,
}

impl FilterState {
    /// True when `record` passes scope, keyword and type filters
    pub fn accepts(&self, record: &ImageRecord) -> bool {
        in_scope(record, &self.directory_scope)
            && record.path.contains(self.keyword.as_str())
            && self.enabled_types.contains(&record.file_extension)
    }
}

/// Scope is a substring match on the directory, not a prefix match.
/// "/b/" therefore also matches "/a/b/".
pub fn in_scope(record: &ImageRecord, scope: &str) -> bool {
    scope.is_empty() || record.directory.contains(scope)
}

/// Filtered, grouped projection of the catalog
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DerivedView {
    /// Records that survived every filter, in catalog order
    pub visible: Vec<ImageRecord>,
    /// Distinct directories of `visible`, sorted
    pub group_keys: Vec<String>,
    /// Expansion to start from: everything, or nothing above the threshold
    pub default_expanded: BTreeSet<String>,
}

impl DerivedView {
    /// Records of one directory group, in catalog order
    pub fn group<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a ImageRecord> + 'a {
        self.visible.iter().filter(move |r| r.directory == key)
    }

    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }
}

/// Run the filters and derive groups plus default expansion.
pub fn compute_view(
    records: &[ImageRecord],
    filter: &FilterState,
    collapse_threshold: usize,
) -> DerivedView {
    let visible: Vec<ImageRecord> = records
        .iter()
        .filter(|r| filter.accepts(r))
        .cloned()
        .collect();

    let group_keys: Vec<String> = visible
        .iter()
        .map(|r| r.directory.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let default_expanded = if visible.len() <= collapse_threshold {
        group_keys.iter().cloned().collect()
    } else {
        BTreeSet::new()
    };

    DerivedView {
        visible,
        group_keys,
        default_expanded,
    }
}
