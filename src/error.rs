// src/error.rs
// =============================================================================
// Error types shared by every crawl component.
//
// Once a crawl has started nothing is fatal: each of these errors abandons a
// single page fetch, a single reference or a single image download, gets
// logged, and the crawl keeps going. Usage errors never reach this type,
// clap rejects bad arguments before the crawl starts.
//
// Rust concepts:
// - thiserror: derives std::error::Error and Display from attributes
// - #[source]: keeps the underlying io::Error in the error chain
// =============================================================================

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum CrawlError {
    /// Fetching a URL failed: connection refused, timeout, non-2xx status
    #[error("transport error for {url}: {reason}")]
    Transport { url: String, reason: String },

    /// An href/src value that is empty or cannot be turned into a URL
    #[error("malformed reference '{reference}': {reason}")]
    MalformedReference { reference: String, reason: String },

    /// Creating the save directory or writing an image failed
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CrawlError {
    pub fn transport(url: impl Into<String>, reason: impl ToString) -> Self {
        CrawlError::Transport {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    pub fn malformed(reference: impl Into<String>, reason: impl ToString) -> Self {
        CrawlError::MalformedReference {
            reference: reference.into(),
            reason: reason.to_string(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CrawlError::Io {
            path: path.into(),
            source,
        }
    }
}
