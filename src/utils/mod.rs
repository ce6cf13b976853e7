//! Utility functions and helpers.

pub mod http;

use url::Url;

/// Resolve a potentially relative or scheme-relative URL against a base URL.
///
/// Feed rows carry hrefs like `//www.example.com/ad/123`; joining against the
/// feed URL yields an absolute link.
pub fn resolve_url(base: &Url, href: &str) -> String {
    base.join(href)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| href.to_string())
}
