//! Render Gate
//!
//! Three independent policies deciding when expensive rendering work may
//! run: lazy thumbnail loading, live vs. deferred size changes, and the
//! debounced "currently scrolling" flag.

use std::time::Duration;

/// Lazy-load gate: defer off-screen thumbnail decode above the threshold.
pub fn lazy_load_enabled(visible_count: usize, threshold: usize) -> bool {
    visible_count > threshold
}

/// Size-change gate: small catalogs follow every drag tick.
pub fn size_applies_live(catalog_len: usize, threshold: usize) -> bool {
    catalog_len < threshold
}

/// Thumbnail size as driven by the size slider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageSize {
    applied: u16,
    /// Last drag value not yet applied (large catalogs only)
    pending: Option<u16>,
}

impl ImageSize {
    pub fn new(initial: u16) -> Self {
        Self {
            applied: initial,
            pending: None,
        }
    }

    /// Size the grid renders with
    pub fn applied(&self) -> u16 {
        self.applied
    }

    /// Size the slider handle shows (follows the drag even when deferred)
    pub fn displayed(&self) -> u16 {
        self.pending.unwrap_or(self.applied)
    }

    /// A drag tick. Returns true when the rendered size changed.
    pub fn drag(&mut self, value: u16, catalog_len: usize, threshold: usize) -> bool {
        if size_applies_live(catalog_len, threshold) {
            self.pending = None;
            let changed = self.applied != value;
            self.applied = value;
            changed
        } else {
            self.pending = Some(value);
            false
        }
    }

    /// The size control was released. Applies the last deferred value.
    pub fn release(&mut self) -> bool {
        let Some(value) = self.pending.take() else {
            return false;
        };
        let changed = self.applied != value;
        self.applied = value;
        changed
    }
}

/// Scroll-activity flag with a trailing debounce.
///
/// Each scroll event restarts the quiet period and hands out a new ticket.
/// Only the ticket of the latest event can end the scroll, so a timer
/// scheduled for an older event is a no-op.
#[derive(Debug, Clone)]
pub struct ScrollActivity {
    wait: Duration,
    scrolling: bool,
    ticket: u64,
}

impl ScrollActivity {
    pub fn new(wait: Duration) -> Self {
        Self {
            wait,
            scrolling: false,
            ticket: 0,
        }
    }

    pub fn is_scrolling(&self) -> bool {
        self.scrolling
    }

    pub fn wait(&self) -> Duration {
        self.wait
    }

    /// Scroll position changed. Returns the ticket to settle with after `wait`.
    pub fn scrolled(&mut self) -> u64 {
        self.scrolling = true;
        self.ticket += 1;
        self.ticket
    }

    /// The debounce timer for `ticket` fired. Returns true when scrolling ended.
    pub fn settle(&mut self, ticket: u64) -> bool {
        if !self.scrolling || ticket != self.ticket {
            return false;
        }
        self.scrolling = false;
        true
    }
}
