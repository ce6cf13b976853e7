//! Listing data structure and identity fingerprint.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A single car ad extracted from the listing feed.
///
/// The detail fields (`mileage`, `year`, `description`) are `None` until the
/// detail page has been fetched; fingerprinting and keyword filtering run
/// only after enrichment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Listing {
    /// Ad title
    pub title: String,

    /// Full URL to the ad detail page
    pub link: String,

    /// Seller location
    pub location: String,

    /// Price as displayed on the page (currency-formatted string)
    pub price: String,

    /// Posting date as displayed on the page
    pub posted: String,

    /// Thumbnail image URL, when the row has one
    pub image: Option<String>,

    /// Mileage, populated by detail enrichment
    pub mileage: Option<String>,

    /// Model year, populated by detail enrichment
    pub year: Option<String>,

    /// Description HTML fragment, populated by detail enrichment
    pub description: Option<String>,
}

impl Listing {
    /// Create a listing from feed-row fields, with detail fields unset.
    pub fn new(
        title: impl Into<String>,
        link: impl Into<String>,
        location: impl Into<String>,
        price: impl Into<String>,
        posted: impl Into<String>,
        image: Option<String>,
    ) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
            location: location.into(),
            price: price.into(),
            posted: posted.into(),
            image,
            mileage: None,
            year: None,
            description: None,
        }
    }

    /// Stable identity fingerprint over (title, location, price).
    ///
    /// Deliberately ignores date, image, and detail fields so the same ad
    /// keeps the same identity across runs even when those churn.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.title.as_bytes());
        hasher.update(self.location.as_bytes());
        hasher.update(self.price.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Case-insensitive substring match of any keyword in the description.
    ///
    /// Returns false when the keyword list is empty or the description has
    /// not been fetched yet. Callers decide separately whether keyword
    /// filtering is enabled at all.
    pub fn matches_keywords(&self, keywords: &[String]) -> bool {
        let Some(description) = &self.description else {
            return false;
        };
        let haystack = description.to_lowercase();
        keywords
            .iter()
            .any(|keyword| haystack.contains(&keyword.to_lowercase()))
    }

    /// Format the listing for display using a placeholder template.
    ///
    /// Supported placeholders:
    /// - `{title}`, `{link}`, `{location}`, `{price}`, `{posted}`
    /// - `{image}`, `{mileage}`, `{year}`, `{description}` (empty when unset)
    pub fn format(&self, template: &str) -> String {
        template
            .replace("{title}", &self.title)
            .replace("{link}", &self.link)
            .replace("{location}", &self.location)
            .replace("{price}", &self.price)
            .replace("{posted}", &self.posted)
            .replace("{image}", self.image.as_deref().unwrap_or(""))
            .replace("{mileage}", self.mileage.as_deref().unwrap_or(""))
            .replace("{year}", self.year.as_deref().unwrap_or(""))
            .replace("{description}", self.description.as_deref().unwrap_or(""))
    }
}
