// src/fetch/mod.rs
// =============================================================================
// This module talks to the network and the disk.
//
// Submodules:
// - http: the real Fetcher, backed by a shared reqwest Client
// - download: saves one image under the output directory
//
// The crawl engine only ever sees the Fetcher trait, so tests can swap the
// network for an in-memory site.
// =============================================================================

mod download;
mod http;

use async_trait::async_trait;
use url::Url;

use crate::error::CrawlError;

pub use download::Downloader;
pub use http::HttpFetcher;

// Anything that can turn a URL into a response body
//
// Contract:
// - Ok(body) only for a successful (2xx) response
// - HTTP error statuses come back as CrawlError::Transport, never as an
//   error page body
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<Vec<u8>, CrawlError>;
}
