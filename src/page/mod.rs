// src/page/mod.rs
// =============================================================================
// Everything the crawler needs to understand one page.
//
// Submodules:
// - html: pulls raw <img src> and <a href> values out of a document
// - resolve: turns those raw values into absolute URLs
// - classify: decides which URLs are images and which stay on the domain
// =============================================================================

mod classify;
mod html;
mod resolve;

pub use classify::{is_downloadable_image, is_fetchable, is_same_domain, network_location};
pub use html::extract;
pub use resolve::{resolve, without_fragment};
