//! Paginated viewer state — the only state that survives a recompute.
//!
//! The page list itself is recomputed from scratch on every document change;
//! the cursor is the single piece of viewer-owned state and is re-clamped
//! against the fresh page count rather than reset, so a user on page 3 of 4
//! whose edit collapses the document to 2 pages lands on page 2.
#![allow(dead_code)]

use serde::{Deserialize, Serialize};

/// A 1-based cursor over a page sequence, clamped to `[1, page_count]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageCursor {
    current: usize,
    page_count: usize,
}

impl PageCursor {
    /// A document always has at least one page; a zero count is clamped up.
    pub fn new(page_count: usize) -> Self {
        PageCursor {
            current: 1,
            page_count: page_count.max(1),
        }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    pub fn next(&mut self) {
        self.current = (self.current + 1).min(self.page_count);
    }

    pub fn previous(&mut self) {
        self.current = self.current.saturating_sub(1).max(1);
    }

    pub fn jump_to(&mut self, page: usize) {
        self.current = page.clamp(1, self.page_count);
    }

    /// Adopts a freshly computed page count, preserving the current page
    /// when it is still valid and clamping it otherwise.
    pub fn sync_page_count(&mut self, page_count: usize) {
        self.page_count = page_count.max(1);
        self.current = self.current.clamp(1, self.page_count);
    }

    /// Navigation controls render only when there is something to navigate.
    pub fn shows_navigation(&self) -> bool {
        self.page_count > 1
    }
}
