//! Handles issued for WebDriver elements.
//!
//! Handles stay valid until the page URL changes, the session navigates or
//! closes, or the registry overflows and drops its oldest entries. A
//! dropped handle reports as stale, which the executor answers by
//! resolving again.

use dirprobe_engine::ElementHandle;
use std::collections::BTreeMap;
use tracing::debug;

/// Live handles kept per page before the oldest are dropped.
pub const DEFAULT_CAPACITY: usize = 512;

pub struct HandleRegistry<T> {
    entries: BTreeMap<u64, T>,
    next_id: u64,
    page: Option<String>,
    capacity: usize,
}

impl<T> HandleRegistry<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: BTreeMap::new(),
            next_id: 0,
            page: None,
            capacity: capacity.max(1),
        }
    }

    pub fn insert(&mut self, item: T) -> ElementHandle {
        self.next_id += 1;
        self.entries.insert(self.next_id, item);
        while self.entries.len() > self.capacity {
            self.entries.pop_first();
        }
        ElementHandle::new(self.next_id)
    }

    pub fn get(&self, handle: ElementHandle) -> Option<&T> {
        self.entries.get(&handle.id())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.page = None;
    }

    /// Note the page new handles belong to. Handles issued on a different
    /// URL are dropped. Returns true if that happened.
    pub fn track_page(&mut self, url: &str) -> bool {
        if self.page.as_deref() == Some(url) {
            return false;
        }
        let dropped = !self.entries.is_empty();
        if dropped {
            debug!("Page changed to {}; dropping {} element handle(s)", url, self.entries.len());
        }
        self.entries.clear();
        self.page = Some(url.to_string());
        dropped
    }
}

impl<T> Default for HandleRegistry<T> {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
