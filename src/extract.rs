// src/extract.rs
// =============================================================================
// This module extracts raw link references from a fetched HTML page.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Supports CSS selectors for finding elements
// - Is built on html5ever (Mozilla's HTML parser)
//
// What we collect, and from where:
// - Every `href` attribute on any element inside <body>
// - Every `src` attribute on any element inside <body>, EXCEPT when the
//   element's serialized form mentions "script" or "iframe" - those are
//   embedded code, not content images, and must never be crawled
//
// The <head> is deliberately ignored: stylesheets, favicons and meta
// links are not part of the page content we are validating.
//
// The strings returned here are raw attribute values. Turning them into
// fetchable URLs (or discarding them) is the classifier's job.
// =============================================================================

use scraper::{Html, Selector};

/// Raw references harvested from one page body
#[derive(Debug, Default)]
pub struct PageRefs {
    /// Values of every href attribute found in the body
    pub hrefs: Vec<String>,
    /// Values of every src attribute found in the body (scripts/iframes excluded)
    pub srcs: Vec<String>,
}

impl PageRefs {
    /// All references in one stream - the crawl engine treats links and
    /// image sources identically once they are discovered
    pub fn into_all(self) -> impl Iterator<Item = String> {
        self.hrefs.into_iter().chain(self.srcs)
    }
}

// Harvests every raw href/src reference from the document body.
//
// Selector::parse returns Result, so we use .unwrap() which panics on
// error. That is OK here because our selectors are constants and known
// to be valid.
pub fn extract_refs(html: &str) -> PageRefs {
    let document = Html::parse_document(html);

    // "body [href]" = any element with an href attribute, inside <body>
    let href_selector = Selector::parse("body [href]").unwrap();
    let src_selector = Selector::parse("body [src]").unwrap();

    let mut refs = PageRefs::default();

    for element in document.select(&href_selector) {
        if let Some(href) = element.value().attr("href") {
            refs.hrefs.push(href.to_string());
        }
    }

    for element in document.select(&src_selector) {
        // Skip src values that belong to embedded code. The check is a
        // plain substring test over the element's serialized form, so a
        // <script src=...> or an <iframe src=...> is excluded outright.
        let rendered = element.html();
        if rendered.contains("script") || rendered.contains("iframe") {
            continue;
        }
        if let Some(src) = element.value().attr("src") {
            refs.srcs.push(src.to_string());
        }
    }

    refs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collects_hrefs_from_body() {
        let html = r#"<html><body>
            <a href="/about">About</a>
            <a href="http://other.test/">Other</a>
        </body></html>"#;
        let refs = extract_refs(html);
        assert_eq!(refs.hrefs, vec!["/about", "http://other.test/"]);
    }

    #[test]
    fn test_collects_image_srcs() {
        let html = r#"<html><body><img src="/logo.png"></body></html>"#;
        let refs = extract_refs(html);
        assert_eq!(refs.srcs, vec!["/logo.png"]);
    }

    #[test]
    fn test_head_is_ignored() {
        let html = r#"<html>
            <head><link href="/style.css" rel="stylesheet"></head>
            <body><a href="/about">About</a></body>
        </html>"#;
        let refs = extract_refs(html);
        assert_eq!(refs.hrefs, vec!["/about"]);
    }

    #[test]
    fn test_script_src_is_excluded() {
        let html = r#"<html><body>
            <script src="/app.js"></script>
            <img src="/logo.png">
        </body></html>"#;
        let refs = extract_refs(html);
        assert_eq!(refs.srcs, vec!["/logo.png"]);
    }

    #[test]
    fn test_iframe_src_is_excluded() {
        let html = r#"<html><body><iframe src="http://embed.test/"></iframe></body></html>"#;
        let refs = extract_refs(html);
        assert!(refs.srcs.is_empty());
    }

    #[test]
    fn test_href_on_non_anchor_elements_is_collected() {
        // The crawler checks every href, not just <a> tags
        let html = r#"<html><body><area href="/map"><a href="/about">A</a></body></html>"#;
        let refs = extract_refs(html);
        assert_eq!(refs.hrefs.len(), 2);
    }

    #[test]
    fn test_into_all_chains_hrefs_then_srcs() {
        let html = r#"<html><body>
            <a href="/a">A</a>
            <img src="/b.png">
        </body></html>"#;
        let all: Vec<String> = extract_refs(html).into_all().collect();
        assert_eq!(all, vec!["/a", "/b.png"]);
    }

    #[test]
    fn test_empty_document() {
        let refs = extract_refs("");
        assert!(refs.hrefs.is_empty());
        assert!(refs.srcs.is_empty());
    }
}
