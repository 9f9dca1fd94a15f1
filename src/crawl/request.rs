// src/crawl/request.rs
// =============================================================================
// The inputs of one crawl.
//
// - CrawlRequest: what to crawl and where images go (fixed for the run)
// - CrawlOptions: how to crawl it (mode, worker bound, timeouts)
// - Frame: one page waiting to be visited, with its depth
// =============================================================================

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Result};
use serde::Serialize;
use url::Url;

use crate::page::{is_fetchable, without_fragment};

// Whether links are followed at all
//
// Disabled is its own variant rather than "max_depth = 0" so a depth number
// can never switch recursion on by itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "recursion", rename_all = "snake_case")]
pub enum Recursion {
    Disabled,
    Enabled { max_depth: usize },
}

impl Recursion {
    pub fn max_depth(&self) -> usize {
        match self {
            Recursion::Disabled => 0,
            Recursion::Enabled { max_depth } => *max_depth,
        }
    }

    pub fn follows_links(&self) -> bool {
        matches!(self, Recursion::Enabled { .. })
    }
}

#[derive(Debug, Clone)]
pub struct CrawlRequest {
    pub seed: Url,
    pub recursion: Recursion,
    pub save_path: PathBuf,
}

impl CrawlRequest {
    // Validates the seed URL and builds the request
    //
    // The seed must be an absolute http(s) URL with a host, otherwise there
    // is no domain to scope the crawl to.
    pub fn new(seed: &str, recursion: Recursion, save_path: impl Into<PathBuf>) -> Result<Self> {
        let parsed = Url::parse(seed).map_err(|e| anyhow!("Invalid URL '{}': {}", seed, e))?;

        if !is_fetchable(&parsed) {
            return Err(anyhow!("Unsupported URL scheme '{}': {}", parsed.scheme(), seed));
        }
        if parsed.host_str().is_none() {
            return Err(anyhow!("URL has no host: {}", seed));
        }

        Ok(Self {
            seed: without_fragment(parsed),
            recursion,
            save_path: save_path.into(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum CrawlMode {
    /// One page at a time, depth-first, fully deterministic
    #[default]
    Sequential,
    /// Bounded pool of page fetches and parallel image downloads
    Concurrent,
}

#[derive(Debug, Clone)]
pub struct CrawlOptions {
    pub mode: CrawlMode,
    /// Upper bound on in-flight page fetches (and per-page image downloads)
    pub workers: usize,
    /// Applied by the HTTP client to every request
    pub request_timeout: Duration,
    /// No new page is fetched once this much time has passed
    pub deadline: Option<Duration>,
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self {
            mode: CrawlMode::Sequential,
            workers: 8,
            request_timeout: Duration::from_secs(10),
            deadline: None,
        }
    }
}

// A page pending a visit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub url: Url,
    pub depth: usize,
}

impl Frame {
    pub fn seed(url: Url) -> Self {
        Self { url, depth: 0 }
    }

    pub fn child(&self, url: Url) -> Self {
        Self {
            url,
            depth: self.depth + 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_recursion_never_follows() {
        assert!(!Recursion::Disabled.follows_links());
        assert_eq!(Recursion::Disabled.max_depth(), 0);
    }

    #[test]
    fn test_enabled_recursion_keeps_depth() {
        let recursion = Recursion::Enabled { max_depth: 3 };
        assert!(recursion.follows_links());
        assert_eq!(recursion.max_depth(), 3);
    }

    #[test]
    fn test_request_rejects_relative_seed() {
        assert!(CrawlRequest::new("/just/a/path", Recursion::Disabled, "out").is_err());
    }

    #[test]
    fn test_request_rejects_non_http_seed() {
        assert!(CrawlRequest::new("ftp://x.test/", Recursion::Disabled, "out").is_err());
        assert!(CrawlRequest::new("mailto:me@x.test", Recursion::Disabled, "out").is_err());
    }

    #[test]
    fn test_request_drops_seed_fragment() {
        let request = CrawlRequest::new("https://x.test/#top", Recursion::Disabled, "out").unwrap();
        assert_eq!(request.seed.as_str(), "https://x.test/");
    }

    #[test]
    fn test_child_frame_is_one_deeper() {
        let seed = Frame::seed(Url::parse("https://x.test/").unwrap());
        let child = seed.child(Url::parse("https://x.test/p2").unwrap());
        assert_eq!(seed.depth, 0);
        assert_eq!(child.depth, 1);
    }
}
