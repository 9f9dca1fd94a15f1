// src/page/classify.rs
// =============================================================================
// Pure predicates over absolute URLs.
//
// - is_downloadable_image: extension whitelist on the URL path
// - is_same_domain: network location (host[:port]) equality
// - is_fetchable: only http/https are ever requested
//
// No content-type sniffing happens anywhere: a mislabeled URL is classified
// by its path alone.
// =============================================================================

use url::Url;

// Lower-case extensions that mark a path as an image worth saving
pub const IMAGE_EXTENSIONS: [&str; 5] = [".jpg", ".jpeg", ".png", ".gif", ".bmp"];

// True iff the lower-cased path ends with one of IMAGE_EXTENSIONS
//
// Query strings and fragments are not part of the path, so
// "https://x.test/a.png?w=200" still counts as an image.
pub fn is_downloadable_image(url: &Url) -> bool {
    let path = url.path().to_ascii_lowercase();
    IMAGE_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}

// The host[:port] part of a URL, or None for URLs without a host (mailto:, data:)
//
// The url crate already lower-cases hosts and drops default ports while
// parsing, so the comparison below sees them in that form.
pub fn network_location(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    Some(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    })
}

// True iff both URLs have a host and their network locations are identical
//
// No subdomain matching: "blog.x.test" is a different domain from "x.test".
pub fn is_same_domain(candidate: &Url, reference: &Url) -> bool {
    match (network_location(candidate), network_location(reference)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

pub fn is_fetchable(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https")
}
