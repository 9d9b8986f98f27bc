// src/classify.rs
// =============================================================================
// This module decides what to do with a raw href/src string found on a page.
//
// A raw reference can be:
// - An absolute http(s) URL            -> keep it as-is
// - Protocol-relative (//cdn.com/x)    -> assume http://
// - Site-relative (/about)             -> glue it onto the site root
// - Anything else (mailto:, #frag,
//   javascript:, relative paths, junk) -> drop it silently
//
// Everything here is a pure function: same inputs, same answer, no state.
// Case is NOT folded here - the seen-set does that when a URL is committed
// to a crawl task.
// =============================================================================

/// Known binary file extensions we never try to parse as HTML
const BINARY_EXTENSIONS: [&str; 4] = [".png", ".jpg", ".pdf", ".gif"];

// Rewrites a raw href/src into an absolute URL worth fetching,
// or None if it is not usable.
//
// Rules are applied in order, first match wins:
// 1. Already absolute http(s) -> unchanged
// 2. "//" + alphanumeric      -> "http://" + host (slashes trimmed)
// 3. "/" + alphanumeric       -> site_url + path
// 4. Anything else            -> None
//
// Note the ordering: rule 2 must run before rule 3, since a
// protocol-relative reference also starts with a single "/".
//
// Examples:
//   classify("/about", "http://x.test/")          -> Some("http://x.test/about")
//   classify("//cdn.test/logo.png", ...)          -> Some("http://cdn.test/logo.png")
//   classify("mailto:a@b.c", ...)                 -> None
pub fn classify(raw_ref: &str, site_url: &str) -> Option<String> {
    if raw_ref.starts_with("http://") || raw_ref.starts_with("https://") {
        return Some(raw_ref.to_string());
    }

    if let Some(rest) = raw_ref.strip_prefix("//") {
        if starts_alphanumeric(rest) {
            // Protocol-relative: assume plain http, trim stray slashes
            // on both ends so we end up with "http://host/path"
            return Some(format!("http://{}", raw_ref.trim_matches('/')));
        }
        return None;
    }

    if let Some(rest) = raw_ref.strip_prefix('/') {
        if starts_alphanumeric(rest) {
            // Site-relative: concatenate onto the seed, making sure we
            // don't produce a double slash between host and path
            return Some(format!("{}{}", site_url.trim_end_matches('/'), raw_ref));
        }
        return None;
    }

    // Relative paths, fragments, mailto:, javascript:, malformed junk
    None
}

// Should a successfully fetched URL be parsed for more links?
//
// Only pages inside the site scope are expanded (we still fetch-check
// external URLs once for reachability, we just don't follow them), and
// binary files are never parsed as HTML.
//
// `url` is expected to be lowercased already - workers lowercase every
// URL before fetching it.
pub fn should_expand(url: &str, site_url: &str) -> bool {
    url.starts_with(&site_url.to_lowercase()) && !has_binary_extension(url)
}

fn has_binary_extension(url: &str) -> bool {
    BINARY_EXTENSIONS.iter().any(|ext| url.ends_with(ext))
}

fn starts_alphanumeric(s: &str) -> bool {
    s.chars().next().is_some_and(|c| c.is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SITE: &str = "http://x.test/";

    #[test]
    fn test_absolute_http_kept_as_is() {
        assert_eq!(
            classify("http://other.test/page", SITE),
            Some("http://other.test/page".to_string())
        );
        assert_eq!(
            classify("https://other.test/page", SITE),
            Some("https://other.test/page".to_string())
        );
    }

    #[test]
    fn test_protocol_relative_gets_http_prefix() {
        assert_eq!(
            classify("//cdn.test/logo.png", SITE),
            Some("http://cdn.test/logo.png".to_string())
        );
    }

    #[test]
    fn test_protocol_relative_trailing_slash_trimmed() {
        assert_eq!(
            classify("//cdn.test/", SITE),
            Some("http://cdn.test".to_string())
        );
    }

    #[test]
    fn test_site_relative_joined_without_double_slash() {
        // Seed has a trailing slash; the join must not produce "x.test//about"
        assert_eq!(
            classify("/about", SITE),
            Some("http://x.test/about".to_string())
        );
        assert_eq!(
            classify("/about", "http://x.test"),
            Some("http://x.test/about".to_string())
        );
    }

    #[test]
    fn test_rule_order_protocol_relative_wins_over_site_relative() {
        // "//cdn.test" starts with "/" too - it must NOT be treated as
        // a site-relative path
        assert_eq!(
            classify("//cdn.test/x", SITE),
            Some("http://cdn.test/x".to_string())
        );
    }

    #[test]
    fn test_junk_is_dropped() {
        assert_eq!(classify("mailto:a@b.test", SITE), None);
        assert_eq!(classify("javascript:void(0)", SITE), None);
        assert_eq!(classify("#section", SITE), None);
        assert_eq!(classify("relative/path.html", SITE), None);
        assert_eq!(classify("", SITE), None);
        // Slash followed by a non-alphanumeric is malformed, not site-relative
        assert_eq!(classify("/#top", SITE), None);
        assert_eq!(classify("//", SITE), None);
    }

    #[test]
    fn test_classify_is_pure() {
        // Same inputs, same answer, every time
        for _ in 0..3 {
            assert_eq!(
                classify("/about", SITE),
                Some("http://x.test/about".to_string())
            );
        }
    }

    #[test]
    fn test_case_is_preserved() {
        // Folding happens at seen-set insertion, not here
        assert_eq!(
            classify("/About", SITE),
            Some("http://x.test/About".to_string())
        );
    }

    #[test]
    fn test_should_expand_same_site_html_only() {
        assert!(should_expand("http://x.test/about", SITE));
        // Off-site pages are checked but never expanded
        assert!(!should_expand("http://other.test/page", SITE));
        // Binary files are never parsed as HTML
        assert!(!should_expand("http://x.test/logo.png", SITE));
        assert!(!should_expand("http://x.test/doc.pdf", SITE));
        assert!(!should_expand("http://x.test/photo.jpg", SITE));
        assert!(!should_expand("http://x.test/anim.gif", SITE));
    }
}
