// src/page/resolve.rs
// =============================================================================
// Turns a raw href/src value into an absolute URL.
//
// Url::join implements RFC 3986 reference resolution, so scheme-relative
// ("//cdn.x.test/a.png"), path-relative ("../img/a.png") and fragment-only
// ("#top") references all resolve against the page they came from.
// =============================================================================

use url::Url;

use crate::error::CrawlError;

// Resolves `reference` against `base`
//
// Fails with MalformedReference when the reference is empty (or only
// whitespace) or when it cannot be parsed as a URI reference.
//
// Examples:
//   base = "https://x.test/dir/page.html"
//   "../img/a.png"        -> "https://x.test/img/a.png"
//   "https://o.test/b.gif" -> "https://o.test/b.gif"
//   ""                    -> Err(MalformedReference)
pub fn resolve(base: &Url, reference: &str) -> Result<Url, CrawlError> {
    let trimmed = reference.trim();
    if trimmed.is_empty() {
        return Err(CrawlError::malformed(reference, "empty reference"));
    }

    base.join(trimmed)
        .map_err(|e| CrawlError::malformed(reference, e))
}

// Drops the fragment so "page#a" and "page#b" name the same page
pub fn without_fragment(mut url: Url) -> Url {
    url.set_fragment(None);
    url
}
