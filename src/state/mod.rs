//! State management module
//!
//! This module derives everything the panel shows from the image catalog:
//! - Display records and the catalog snapshot (data.rs, library.rs)
//! - The filter pipeline and directory grouping (filter.rs)
//! - Ordering inside a group (order.rs)
//! - Focus-driven directory scoping (scope.rs)
//! - Render gating: lazy loading, deferred resizing, scroll debounce (gate.rs)
//! - The panel aggregate the UI talks to (panel.rs)

pub mod data;
pub mod filter;
pub mod gate;
pub mod library;
pub mod order;
pub mod panel;
pub mod scope;

pub use panel::{GroupView, LoadState, PanelState};
