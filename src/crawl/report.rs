// src/crawl/report.rs
// =============================================================================
// What a crawl did, page by page and image by image.
//
// The report is only ever written by the coordinating loop in engine.rs, so it
// needs no locking even in concurrent mode.
// =============================================================================

use std::path::PathBuf;

use serde::Serialize;

use super::request::Recursion;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageVisit {
    pub url: String,
    pub depth: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SavedImage {
    pub url: String,
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
    pub url: String,
    pub error: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CrawlReport {
    pub seed: String,
    #[serde(flatten)]
    pub recursion: Recursion,
    /// Pages fetched successfully, in processing order
    pub pages: Vec<PageVisit>,
    pub failed_pages: Vec<Failure>,
    pub images: Vec<SavedImage>,
    pub failed_images: Vec<Failure>,
    /// References dropped before any request: malformed, not an image,
    /// off-domain, unsupported scheme
    pub skipped_references: usize,
    pub deadline_reached: bool,
}

impl CrawlReport {
    pub fn new(seed: &str, recursion: Recursion) -> Self {
        Self {
            seed: seed.to_string(),
            recursion,
            pages: Vec::new(),
            failed_pages: Vec::new(),
            images: Vec::new(),
            failed_images: Vec::new(),
            skipped_references: 0,
            deadline_reached: false,
        }
    }

    pub fn failure_count(&self) -> usize {
        self.failed_pages.len() + self.failed_images.len()
    }
}

#[cfg(test)]
impl CrawlReport {
    pub fn page_urls(&self) -> Vec<&str> {
        self.pages.iter().map(|p| p.url.as_str()).collect()
    }

    pub fn image_urls(&self) -> Vec<&str> {
        self.images.iter().map(|i| i.url.as_str()).collect()
    }
}
