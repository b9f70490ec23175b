//! Scope Sync Coordinator
//!
//! Reconciles user-driven scope changes with focus events pushed by the
//! host. Candidate scopes are always checked against the catalog snapshot
//! in hand at the time of the event, never against the filtered view.
//!
//! A refresh that completes after a focus event re-derives scope from the
//! focus path the panel was opened with, and may overwrite the scope the
//! focus event set. Last write wins; there is no queue.

use super::data::ImageRecord;
use super::library::Catalog;

/// What an input did to the directory scope
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeChange {
    Unchanged,
    Cleared,
    Applied(String),
}

#[derive(Debug, Clone, Default)]
pub struct ScopeSync {
    scope: String,
    /// Focus path supplied when the panel was opened
    initial_focus: Option<String>,
    /// Absolute path the host most recently asked to focus
    focus_target: Option<String>,
    /// The next render should auto-preview the focused record
    auto_preview_armed: bool,
}

impl ScopeSync {
    /// A panel opened for a specific file starts with one auto-preview pending.
    pub fn new(initial_focus: Option<String>) -> Self {
        let initial_focus = initial_focus.filter(|p| !p.is_empty());
        Self {
            scope: String::new(),
            auto_preview_armed: initial_focus.is_some(),
            focus_target: initial_focus.clone(),
            initial_focus,
        }
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    pub fn focus_target(&self) -> Option<&str> {
        self.focus_target.as_deref()
    }

    #[cfg(test)]
    pub fn auto_preview_armed(&self) -> bool {
        self.auto_preview_armed
    }

    /// A catalog arrived (initial load or refresh). Re-derives scope from the
    /// initial focus path. Never arms auto-preview.
    pub fn on_catalog_loaded(&mut self, catalog: &Catalog) -> ScopeChange {
        let Some(focus) = self.initial_focus.clone() else {
            return ScopeChange::Unchanged;
        };
        let change = self.resolve(&focus, catalog);
        log_change("catalog load", &focus, &change);
        change
    }

    /// The host reports a new focus. Empty paths are ignored.
    ///
    /// Auto-preview is re-armed only when the scope actually changes to a new
    /// directory, so repeating the same focus does not preview twice.
    pub fn on_focus_event(&mut self, path: &str, catalog: &Catalog) -> ScopeChange {
        if path.is_empty() {
            log::debug!("Ignoring focus event with empty path");
            return ScopeChange::Unchanged;
        }

        self.focus_target = Some(path.to_string());
        let change = self.resolve(path, catalog);
        if matches!(change, ScopeChange::Applied(_)) {
            self.auto_preview_armed = true;
        }
        log_change("focus event", path, &change);
        change
    }

    /// The user dismissed the scope tag. Focus target is kept.
    pub fn clear_scope(&mut self) -> ScopeChange {
        if self.scope.is_empty() {
            return ScopeChange::Unchanged;
        }
        self.scope.clear();
        log::info!("Scope cleared by user");
        ScopeChange::Cleared
    }

    /// True for the record the renderer should open a preview for.
    pub fn should_auto_preview(&self, record: &ImageRecord) -> bool {
        self.auto_preview_armed && self.focus_target.as_deref() == Some(record.full_path.as_str())
    }

    /// The renderer performed the auto-preview.
    pub fn consume_auto_preview(&mut self) {
        self.auto_preview_armed = false;
    }

    fn resolve(&mut self, focus: &str, catalog: &Catalog) -> ScopeChange {
        let Some(candidate) = candidate_scope(focus, catalog.root()) else {
            return ScopeChange::Unchanged;
        };

        if candidate.is_empty() || candidate == "/" {
            if self.scope.is_empty() {
                return ScopeChange::Unchanged;
            }
            self.scope.clear();
            return ScopeChange::Cleared;
        }

        if candidate == self.scope || !catalog.any_directory_contains(&candidate) {
            return ScopeChange::Unchanged;
        }

        self.scope = candidate.clone();
        ScopeChange::Applied(candidate)
    }
}

fn log_change(cause: &str, focus: &str, change: &ScopeChange) {
    match change {
        ScopeChange::Unchanged => log::debug!("Scope unchanged after {cause} ({focus})"),
        ScopeChange::Cleared => log::info!("Scope cleared after {cause} ({focus})"),
        ScopeChange::Applied(scope) => log::info!("🔎 Scope set to {scope} after {cause}"),
    }
}

/// Derive the directory scope a focus path points at.
///
/// Returns `None` when the path is not under `project_root`. A path that
/// looks like a file yields its containing directory, anything else is
/// taken as a directory as-is.
pub fn candidate_scope(focus_path: &str, project_root: &str) -> Option<String> {
    let focus_path = focus_path.replace('\\', "/");
    let relative = focus_path.strip_prefix(project_root)?;
    if !relative.is_empty() && !relative.starts_with('/') {
        // "/rootx/a.png" is not under "/root"
        return None;
    }

    if looks_like_file(relative) {
        Some(directory_of(relative).to_string())
    } else {
        Some(relative.to_string())
    }
}

/// A final segment with an extension of 1 to 5 characters after a dot.
pub fn looks_like_file(path: &str) -> bool {
    let segment = path.rsplit('/').next().unwrap_or("");
    match segment.rfind('.') {
        Some(dot) => {
            let ext_len = segment[dot + 1..].chars().count();
            (1..=5).contains(&ext_len)
        }
        None => false,
    }
}

fn directory_of(path: &str) -> &str {
    match path.rfind('/') {
        Some(i) => &path[..=i],
        None => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::data::RawImageRecord;

    fn catalog(paths: &[&str], root: &str) -> Catalog {
        let mut catalog = Catalog::new();
        catalog.replace(
            paths
                .iter()
                .map(|p| RawImageRecord {
                    path: p.to_string(),
                    size: 0,
                    host_display_path: String::new(),
                })
                .collect(),
            root,
        );
        catalog
    }

    #[test]
    fn test_looks_like_file() {
        assert!(looks_like_file("/src/a.png"));
        assert!(looks_like_file("/src/a.b"));
        assert!(looks_like_file("/src/a.jpeg"));
        assert!(looks_like_file("/src/a.tiffx"));
        assert!(!looks_like_file("/src/a.toolong"));
        assert!(!looks_like_file("/src/"));
        assert!(!looks_like_file("/src/assets"));
        assert!(!looks_like_file("/v1.2/assets"));
        assert!(!looks_like_file("/src/trailing."));
        assert!(!looks_like_file(""));
    }

    #[test]
    fn test_candidate_scope() {
        assert_eq!(candidate_scope("/root/src/a.png", "/root").as_deref(), Some("/src/"));
        assert_eq!(candidate_scope("/root/src/assets", "/root").as_deref(), Some("/src/assets"));
        assert_eq!(candidate_scope("/root/a.png", "/root").as_deref(), Some("/"));
        assert_eq!(candidate_scope("/root", "/root").as_deref(), Some(""));
        assert_eq!(candidate_scope("/elsewhere/a.png", "/root"), None);
        assert_eq!(candidate_scope("/rootx/a.png", "/root"), None);
        assert_eq!(candidate_scope("C:\\work\\img\\a.png", "C:/work").as_deref(), Some("/img/"));
    }

    #[test]
    fn test_initial_load_scopes_to_file_directory() {
        let catalog = catalog(&["/src/a.png"], "/root/");
        let mut sync = ScopeSync::new(Some("/root/src/a.png".into()));
        assert!(sync.auto_preview_armed());

        assert_eq!(sync.on_catalog_loaded(&catalog), ScopeChange::Applied("/src/".into()));
        assert_eq!(sync.scope(), "/src/");
        // Initial load neither arms nor disarms
        assert!(sync.auto_preview_armed());
    }

    #[test]
    fn test_initial_load_without_focus_is_a_no_op() {
        let catalog = catalog(&["/src/a.png"], "/root");
        let mut sync = ScopeSync::new(None);
        assert_eq!(sync.on_catalog_loaded(&catalog), ScopeChange::Unchanged);
        assert!(!sync.auto_preview_armed());
        assert_eq!(sync.scope(), "");
    }

    #[test]
    fn test_scope_never_applied_without_matching_records() {
        let catalog = catalog(&["/src/a.png"], "/root");
        let mut sync = ScopeSync::new(Some("/root/docs/readme.md".into()));
        assert_eq!(sync.on_catalog_loaded(&catalog), ScopeChange::Unchanged);
        assert_eq!(sync.scope(), "");

        assert_eq!(sync.on_focus_event("/root/lib/x.png", &catalog), ScopeChange::Unchanged);
        assert_eq!(sync.scope(), "");
        for record in catalog.records() {
            assert!(sync.scope().is_empty() || record.directory.contains(sync.scope()));
        }
    }

    #[test]
    fn test_root_candidate_clears_scope() {
        let catalog = catalog(&["/src/a.png", "/b.png"], "/root");
        let mut sync = ScopeSync::new(None);
        sync.on_focus_event("/root/src/a.png", &catalog);
        assert_eq!(sync.scope(), "/src/");

        sync.consume_auto_preview();
        assert_eq!(sync.on_focus_event("/root/b.png", &catalog), ScopeChange::Cleared);
        assert_eq!(sync.scope(), "");
        assert!(!sync.auto_preview_armed());
    }

    #[test]
    fn test_focus_event_arms_once_per_scope_change() {
        let catalog = catalog(&["/a/1.png", "/b/2.png"], "/root");
        let mut sync = ScopeSync::new(None);

        assert_eq!(
            sync.on_focus_event("/root/a/1.png", &catalog),
            ScopeChange::Applied("/a/".into())
        );
        assert!(sync.auto_preview_armed());
        assert_eq!(sync.focus_target(), Some("/root/a/1.png"));
        sync.consume_auto_preview();

        // Same focus again: no re-arm
        assert_eq!(sync.on_focus_event("/root/a/1.png", &catalog), ScopeChange::Unchanged);
        assert!(!sync.auto_preview_armed());

        // Different directory: re-armed
        sync.on_focus_event("/root/b/2.png", &catalog);
        assert!(sync.auto_preview_armed());
        assert_eq!(sync.scope(), "/b/");
    }

    #[test]
    fn test_empty_focus_event_is_ignored() {
        let catalog = catalog(&["/a/1.png"], "/root");
        let mut sync = ScopeSync::new(Some("/root/a/1.png".into()));
        assert_eq!(sync.on_focus_event("", &catalog), ScopeChange::Unchanged);
        assert_eq!(sync.focus_target(), Some("/root/a/1.png"));
    }

    #[test]
    fn test_focus_outside_project_keeps_scope_but_moves_target() {
        let catalog = catalog(&["/a/1.png"], "/root");
        let mut sync = ScopeSync::new(None);
        sync.on_focus_event("/root/a/1.png", &catalog);
        assert_eq!(sync.on_focus_event("/other/a/1.png", &catalog), ScopeChange::Unchanged);
        assert_eq!(sync.scope(), "/a/");
        assert_eq!(sync.focus_target(), Some("/other/a/1.png"));
    }

    #[test]
    fn test_manual_clear_keeps_focus_target() {
        let catalog = catalog(&["/a/1.png"], "/root");
        let mut sync = ScopeSync::new(None);
        sync.on_focus_event("/root/a/1.png", &catalog);
        assert_eq!(sync.clear_scope(), ScopeChange::Cleared);
        assert_eq!(sync.clear_scope(), ScopeChange::Unchanged);
        assert_eq!(sync.focus_target(), Some("/root/a/1.png"));
    }

    #[test]
    fn test_refresh_overwrites_focus_scope_with_initial_focus() {
        let stale = catalog(&["/a/1.png", "/b/2.png"], "/root");
        let mut sync = ScopeSync::new(Some("/root/a/1.png".into()));
        sync.on_catalog_loaded(&stale);
        assert_eq!(sync.scope(), "/a/");

        // Focus event checked against the stale catalog while a refresh is in flight
        sync.on_focus_event("/root/b/2.png", &stale);
        assert_eq!(sync.scope(), "/b/");

        // The refresh lands and re-derives from the initial focus path
        let fresh = catalog(&["/a/1.png", "/b/2.png", "/c/3.png"], "/root");
        assert_eq!(sync.on_catalog_loaded(&fresh), ScopeChange::Applied("/a/".into()));
        assert_eq!(sync.scope(), "/a/");
        // Focus target still follows the host
        assert_eq!(sync.focus_target(), Some("/root/b/2.png"));
    }

    #[test]
    fn test_should_auto_preview_only_for_focused_record() {
        let catalog = catalog(&["/a/1.png", "/a/2.png"], "/root");
        let mut sync = ScopeSync::new(Some("/root/a/1.png".into()));
        let records = catalog.records();
        assert!(sync.should_auto_preview(&records[0]));
        assert!(!sync.should_auto_preview(&records[1]));
        sync.consume_auto_preview();
        assert!(!sync.should_auto_preview(&records[0]));
    }
}
