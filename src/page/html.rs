// src/page/html.rs
// =============================================================================
// This module pulls raw references out of an HTML page.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Supports CSS selectors for finding elements
// - Is built on html5ever (Mozilla's HTML parser)
//
// Nothing is resolved here. Values come back exactly as written in the
// document, in document order, duplicates included. <base> tags are ignored.
// =============================================================================

use std::sync::LazyLock;

use scraper::{Html, Selector};

static IMAGE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("img[src]").expect("valid img selector"));

static LINK_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("valid anchor selector"));

// Raw, unresolved references found in one page
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PageRefs {
    /// `src` values of <img> elements
    pub images: Vec<String>,
    /// `href` values of <a> elements
    pub links: Vec<String>,
}

// Extracts image sources and anchor hrefs from HTML content
//
// Example:
//   html = "<img src='cat.jpg'><a href='/p2'>next</a>"
//   result = PageRefs { images: ["cat.jpg"], links: ["/p2"] }
pub fn extract(html: &str) -> PageRefs {
    let document = Html::parse_document(html);

    let images = document
        .select(&IMAGE_SELECTOR)
        .filter_map(|element| element.value().attr("src"))
        .map(str::to_string)
        .collect();

    let links = document
        .select(&LINK_SELECTOR)
        .filter_map(|element| element.value().attr("href"))
        .map(str::to_string)
        .collect();

    PageRefs { images, links }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_image_and_link() {
        let html = r#"<img src="cat.jpg"><a href="/p2">next</a>"#;
        let refs = extract(html);
        assert_eq!(refs.images, vec!["cat.jpg"]);
        assert_eq!(refs.links, vec!["/p2"]);
    }

    #[test]
    fn test_document_order_and_duplicates_preserved() {
        let html = r#"
            <img src="b.png">
            <p><img src="a.png"></p>
            <img src="b.png">
            <a href="/two">2</a>
            <a href="/one">1</a>
            <a href="/two">2 again</a>
        "#;
        let refs = extract(html);
        assert_eq!(refs.images, vec!["b.png", "a.png", "b.png"]);
        assert_eq!(refs.links, vec!["/two", "/one", "/two"]);
    }

    #[test]
    fn test_elements_without_attribute_skipped() {
        let html = r#"<img alt="no source"><a name="anchor">x</a>"#;
        assert_eq!(extract(html), PageRefs::default());
    }

    #[test]
    fn test_empty_attribute_kept_raw() {
        // Empty values are the resolver's job to reject
        let html = r#"<img src=""><a href="">x</a>"#;
        let refs = extract(html);
        assert_eq!(refs.images, vec![""]);
        assert_eq!(refs.links, vec![""]);
    }

    #[test]
    fn test_base_tag_not_applied() {
        let html = r#"<base href="https://cdn.x.test/"><img src="a.png">"#;
        assert_eq!(extract(html).images, vec!["a.png"]);
    }
}
