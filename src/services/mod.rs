//! Service layer for the watcher application.
//!
//! Contains the site-facing glue: fetching the listing feed and per-ad
//! detail pages, and extracting fields with configured CSS selectors.

mod listings;

pub use listings::ListingScraper;
