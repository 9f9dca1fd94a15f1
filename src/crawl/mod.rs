// src/crawl/mod.rs
// =============================================================================
// This module handles website crawling.
//
// Features:
// - Depth-first crawling starting from a seed URL
// - Respects same-domain restriction (doesn't crawl external sites)
// - Configurable depth limit, or no recursion at all
// - Sequential or bounded-concurrent execution
// - Each page fetched at most once per run
//
// Submodules:
// - request: the inputs of a crawl (seed, recursion, options, frames)
// - visited: the at-most-once page set
// - engine: the traversal itself
// - report: what the crawl did
// =============================================================================

mod engine;
mod report;
mod request;
mod visited;

pub use engine::CrawlEngine;
pub use report::CrawlReport;
pub use request::{CrawlMode, CrawlOptions, CrawlRequest, Recursion};
