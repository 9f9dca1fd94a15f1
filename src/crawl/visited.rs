// src/crawl/visited.rs
// =============================================================================
// The set of pages already claimed during one crawl.
//
// DashSet shards its locks, so concurrent frame tasks can claim pages without
// a global mutex. `claim` is check-and-insert in one step: of two tasks racing
// on the same URL exactly one gets `true`.
// =============================================================================

use dashmap::DashSet;
use url::Url;

#[derive(Debug, Default)]
pub struct VisitedSet {
    urls: DashSet<String>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    // Marks `url` as visited; false if someone already did
    pub fn claim(&self, url: &Url) -> bool {
        self.urls.insert(url.to_string())
    }

    pub fn contains(&self, url: &Url) -> bool {
        self.urls.contains(url.as_str())
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }
}
