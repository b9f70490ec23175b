use std::collections::BTreeSet;

use super::data::{ImageRecord, RawImageRecord};
use super::filter::{compute_view, DerivedView, FilterState};
use super::gate::{lazy_load_enabled, ImageSize, ScrollActivity};
use super::library::Catalog;
use super::order::sort_group;
use super::scope::{ScopeChange, ScopeSync};
use crate::config::PanelConfig;

/// Where the catalog request currently stands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    /// Nothing requested yet
    BeforeFetch,
    /// A request is in flight; the previous catalog stays on screen
    Loading,
    Ready,
    /// The last request failed or timed out
    Failed(String),
}

/// One directory group, ready to render
#[derive(Debug, Clone)]
pub struct GroupView<'a> {
    pub key: &'a str,
    pub expanded: bool,
    /// Sorted with the focused record first
    pub records: Vec<&'a ImageRecord>,
}

impl GroupView<'_> {
    pub fn count(&self) -> usize {
        self.records.len()
    }
}

/// All state behind the image panel.
///
/// Every mutation that touches the catalog or the filters recomputes the
/// derived view synchronously and resets group expansion to its default.
#[derive(Debug)]
pub struct PanelState {
    config: PanelConfig,
    catalog: Catalog,
    filter: FilterState,
    scope: ScopeSync,
    view: DerivedView,
    /// Catalog version the view was derived from
    view_version: u64,
    expanded: BTreeSet<String>,
    size: ImageSize,
    scroll: ScrollActivity,
    background: usize,
    load: LoadState,
    preview: Option<String>,
}

impl PanelState {
    pub fn new(config: PanelConfig, initial_focus: Option<String>) -> Self {
        let size = ImageSize::new(config.default_image_size);
        let scroll = ScrollActivity::new(config.scroll_debounce());
        let background = config.default_background.min(config.background_colors.len().saturating_sub(1));
        Self {
            config,
            catalog: Catalog::new(),
            filter: FilterState::default(),
            scope: ScopeSync::new(initial_focus),
            view: DerivedView::default(),
            view_version: 0,
            expanded: BTreeSet::new(),
            size,
            scroll,
            background,
            load: LoadState::BeforeFetch,
            preview: None,
        }
    }

    // ========== Catalog lifecycle ==========

    /// A catalog request was sent
    pub fn begin_refresh(&mut self) {
        self.load = LoadState::Loading;
    }

    /// A catalog response arrived. Whichever response lands last wins.
    pub fn apply_catalog(&mut self, images: Vec<RawImageRecord>, project_root: &str) {
        self.catalog.replace(images, project_root);
        // Every refresh re-enables every type
        self.filter.enabled_types = self.catalog.type_counts().into_keys().collect();
        self.scope.on_catalog_loaded(&self.catalog);
        self.load = LoadState::Ready;
        if self
            .preview
            .as_deref()
            .is_some_and(|p| self.catalog.find(p).is_none())
        {
            self.preview = None;
        }
        self.recompute();
    }

    /// The catalog request failed; the previous catalog stays.
    pub fn refresh_failed(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::error!("❌ Catalog request failed: {message}");
        self.load = LoadState::Failed(message);
    }

    /// Drop one record from the in-memory catalog (stale paths are ignored)
    pub fn remove_record(&mut self, full_path: &str) -> bool {
        if !self.catalog.remove(full_path) {
            return false;
        }
        if self.preview.as_deref() == Some(full_path) {
            self.preview = None;
        }
        self.recompute();
        true
    }

    // ========== Filters ==========

    pub fn set_keyword(&mut self, keyword: String) {
        if self.filter.keyword != keyword {
            self.filter.keyword = keyword;
            self.recompute();
        }
    }

    pub fn set_type_enabled(&mut self, extension: &str, enabled: bool) {
        let changed = if enabled {
            self.filter.enabled_types.insert(extension.to_string())
        } else {
            self.filter.enabled_types.remove(extension)
        };
        if changed {
            self.recompute();
        }
    }

    pub fn clear_scope(&mut self) {
        if self.scope.clear_scope() != ScopeChange::Unchanged {
            self.recompute();
        }
    }

    /// The host pushed a focus event
    pub fn focus_event(&mut self, path: &str) {
        // Ordering follows the focus target in `groups`; only a scope change
        // rebuilds the view and resets expansion
        if self.scope.on_focus_event(path, &self.catalog) != ScopeChange::Unchanged {
            self.recompute();
        }
    }

    // ========== Group expansion ==========

    pub fn toggle_group(&mut self, key: &str) {
        if !self.view.group_keys.iter().any(|k| k == key) {
            return;
        }
        if !self.expanded.remove(key) {
            self.expanded.insert(key.to_string());
        }
    }

    pub fn expand_all(&mut self) {
        self.expanded = self.view.group_keys.iter().cloned().collect();
    }

    pub fn collapse_all(&mut self) {
        self.expanded.clear();
    }

    // ========== Render gate ==========

    pub fn drag_size(&mut self, value: u16) -> bool {
        self.size
            .drag(value, self.catalog.len(), self.config.deferred_size_threshold)
    }

    pub fn release_size(&mut self) -> bool {
        self.size.release()
    }

    /// Scroll position changed; returns the ticket for the debounce timer
    pub fn scrolled(&mut self) -> u64 {
        self.scroll.scrolled()
    }

    pub fn scroll_settled(&mut self, ticket: u64) -> bool {
        self.scroll.settle(ticket)
    }

    pub fn select_background(&mut self, index: usize) {
        if index < self.config.background_colors.len() {
            self.background = index;
        }
    }

    // ========== Preview ==========

    pub fn open_preview(&mut self, full_path: &str) {
        if self.catalog.find(full_path).is_some() {
            self.preview = Some(full_path.to_string());
        }
    }

    pub fn close_preview(&mut self) {
        self.preview = None;
    }

    /// Hand the pending auto-preview to the renderer, at most once.
    ///
    /// Only fires when the focused record is visible in an expanded group,
    /// i.e. when it is actually rendered.
    pub fn take_auto_preview(&mut self) -> Option<String> {
        let record = self
            .view
            .visible
            .iter()
            .find(|r| self.scope.should_auto_preview(r) && self.expanded.contains(&r.directory))?;
        let full_path = record.full_path.clone();
        self.scope.consume_auto_preview();
        self.preview = Some(full_path.clone());
        log::debug!("Auto-preview of {full_path}");
        Some(full_path)
    }

    // ========== Derived output ==========

    fn recompute(&mut self) {
        self.filter.directory_scope = self.scope.scope().to_string();
        self.view = compute_view(
            self.catalog.records(),
            &self.filter,
            self.config.collapse_threshold,
        );
        self.expanded = self.view.default_expanded.clone();
        self.view_version = self.catalog.version();
        log::debug!(
            "View v{}: {} of {} images in {} groups",
            self.view_version,
            self.view.visible.len(),
            self.catalog.len(),
            self.view.group_keys.len()
        );
    }

    /// Groups in directory order, each sorted by the ordering policy
    pub fn groups(&self) -> Vec<GroupView<'_>> {
        let focus = self.scope.focus_target();
        self.view
            .group_keys
            .iter()
            .map(|key| {
                let mut records: Vec<&ImageRecord> = self.view.group(key).collect();
                sort_group(&mut records, focus);
                GroupView {
                    key,
                    expanded: self.expanded.contains(key),
                    records,
                }
            })
            .collect()
    }

    pub fn config(&self) -> &PanelConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn view(&self) -> &DerivedView {
        &self.view
    }

    pub fn view_version(&self) -> u64 {
        self.view_version
    }

    #[cfg(test)]
    pub fn expanded(&self) -> &BTreeSet<String> {
        &self.expanded
    }

    pub fn keyword(&self) -> &str {
        &self.filter.keyword
    }

    pub fn scope(&self) -> &str {
        self.scope.scope()
    }

    pub fn focus_target(&self) -> Option<&str> {
        self.scope.focus_target()
    }

    pub fn is_type_enabled(&self, extension: &str) -> bool {
        self.filter.enabled_types.contains(extension)
    }

    /// (extension, catalog count) for the type checkboxes
    pub fn type_options(&self) -> Vec<(String, usize)> {
        self.catalog.type_counts().into_iter().collect()
    }

    pub fn total_count(&self) -> usize {
        self.catalog.len()
    }

    pub fn visible_count(&self) -> usize {
        self.view.visible.len()
    }

    pub fn lazy_load(&self) -> bool {
        lazy_load_enabled(self.view.visible.len(), self.config.lazy_load_threshold)
    }

    pub fn is_scrolling(&self) -> bool {
        self.scroll.is_scrolling()
    }

    pub fn scroll_wait(&self) -> std::time::Duration {
        self.scroll.wait()
    }

    pub fn image_size(&self) -> &ImageSize {
        &self.size
    }

    pub fn background(&self) -> usize {
        self.background
    }

    pub fn background_color(&self) -> &str {
        self.config
            .background_colors
            .get(self.background)
            .map(String::as_str)
            .unwrap_or("#cccccc")
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load
    }

    pub fn preview(&self) -> Option<&ImageRecord> {
        self.preview.as_deref().and_then(|p| self.catalog.find(p))
    }
}
