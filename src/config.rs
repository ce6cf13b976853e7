// src/config.rs

//! Application configuration structures.
//!
//! Loaded from a TOML file. Unlike tools that can fall back to defaults, the
//! watcher refuses to start without its settings file: the feed URL and mail
//! credentials have no sensible defaults.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Feed and scan behavior settings
    pub watch: WatchConfig,

    /// Keyword filter settings
    #[serde(default)]
    pub keywords: KeywordConfig,

    /// HTTP client settings
    #[serde(default)]
    pub scraper: ScraperConfig,

    /// CSS selectors for feed and detail extraction
    #[serde(default)]
    pub selectors: SelectorConfig,

    /// Mail transport and digest settings
    pub mail: MailConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// A missing or malformed file is an error; there is no default
    /// configuration to fall back to.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            AppError::config(format!("Cannot read settings from {}: {}", path.display(), e))
        })?;
        Ok(toml::from_str(&content)?)
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.watch.url.trim().is_empty() {
            return Err(AppError::validation("watch.url is empty"));
        }
        if self.watch.limit == 0 {
            return Err(AppError::validation("watch.limit must be > 0"));
        }
        if self.keywords.enabled && self.keywords.terms.is_empty() {
            return Err(AppError::validation(
                "keywords.enabled is set but keywords.terms is empty",
            ));
        }
        if self.scraper.user_agent.trim().is_empty() {
            return Err(AppError::validation("scraper.user_agent is empty"));
        }
        if self.scraper.timeout_secs == 0 {
            return Err(AppError::validation("scraper.timeout_secs must be > 0"));
        }
        if self.mail.api_key.trim().is_empty() {
            return Err(AppError::validation("mail.api_key is empty"));
        }
        if self.mail.sender_email.trim().is_empty() {
            return Err(AppError::validation("mail.sender_email is empty"));
        }
        if self.mail.recipients.is_empty() {
            return Err(AppError::validation("mail.recipients is empty"));
        }
        if self.mail.timeout_secs == 0 {
            return Err(AppError::validation("mail.timeout_secs must be > 0"));
        }
        Ok(())
    }
}

/// Feed URL and scan behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchConfig {
    /// URL of the listing feed page (assumed ordered newest-first)
    pub url: String,

    /// Maximum number of feed rows examined per run
    #[serde(default = "defaults::limit")]
    pub limit: usize,

    /// Path of the persisted seen-set file
    #[serde(default = "defaults::seen_file")]
    pub seen_file: String,
}

/// Keyword filter settings.
///
/// Filtering is gated on `enabled` rather than on an empty term list, so an
/// accidentally empty list never silently notifies everything.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct KeywordConfig {
    /// Whether keyword filtering applies at all
    #[serde(default)]
    pub enabled: bool,

    /// Keywords matched case-insensitively against the ad description
    #[serde(default)]
    pub terms: Vec<String>,
}

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScraperConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
        }
    }
}

/// CSS selectors for listing extraction.
///
/// Selectors are configuration, not code: the site markup changes far more
/// often than the scan logic does. Defaults match the classifieds site the
/// watcher was built for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectorConfig {
    /// Selector for one ad row in the feed page
    #[serde(default = "defaults::feed_row")]
    pub feed_row: String,

    /// Selector for the title element within a row
    #[serde(default = "defaults::feed_title")]
    pub feed_title: String,

    /// Selector for the location element within a row
    #[serde(default = "defaults::feed_location")]
    pub feed_location: String,

    /// Selector for the price element within a row
    #[serde(default = "defaults::feed_price")]
    pub feed_price: String,

    /// Selector for the posted-date element within a row
    #[serde(default = "defaults::feed_posted")]
    pub feed_posted: String,

    /// Selector for the thumbnail element within a row (optional match)
    #[serde(default = "defaults::feed_image")]
    pub feed_image: String,

    /// Attribute carrying the image URL on the thumbnail element
    #[serde(default = "defaults::image_attr")]
    pub image_attr: String,

    /// Selector for the mileage value on the detail page
    #[serde(default = "defaults::detail_mileage")]
    pub detail_mileage: String,

    /// Selector for the model-year value on the detail page
    #[serde(default = "defaults::detail_year")]
    pub detail_year: String,

    /// Selector for the description block on the detail page
    #[serde(default = "defaults::detail_description")]
    pub detail_description: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            feed_row: defaults::feed_row(),
            feed_title: defaults::feed_title(),
            feed_location: defaults::feed_location(),
            feed_price: defaults::feed_price(),
            feed_posted: defaults::feed_posted(),
            feed_image: defaults::feed_image(),
            image_attr: defaults::image_attr(),
            detail_mileage: defaults::detail_mileage(),
            detail_year: defaults::detail_year(),
            detail_description: defaults::detail_description(),
        }
    }
}

/// Mail transport and digest rendering settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    /// Sending-API endpoint
    #[serde(default = "defaults::api_url")]
    pub api_url: String,

    /// Sending-API key
    pub api_key: String,

    /// Sender display name
    #[serde(default = "defaults::sender_name")]
    pub sender_name: String,

    /// Sender email address
    pub sender_email: String,

    /// Recipient email addresses
    pub recipients: Vec<String>,

    /// Request timeout for the sending API, in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Subject line for the digest email
    #[serde(default = "defaults::subject")]
    pub subject: String,

    /// Placeholder template for one listing in the digest
    #[serde(default = "defaults::item_template")]
    pub item_template: String,

    /// Placeholder template wrapping the rendered items
    /// (`{items}` and `{count}`)
    #[serde(default = "defaults::digest_template")]
    pub digest_template: String,
}

mod defaults {
    // Watch defaults
    pub fn limit() -> usize {
        20
    }
    pub fn seen_file() -> String {
        "seen.json".into()
    }

    // Scraper defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; adwatch/0.1)".into()
    }
    pub fn timeout() -> u64 {
        30
    }

    // Selector defaults
    pub fn feed_row() -> String {
        ".mainList .tabsContent a.list_item".into()
    }
    pub fn feed_title() -> String {
        "section h2".into()
    }
    pub fn feed_location() -> String {
        "section.item_infos p.item_supp:nth-of-type(2)".into()
    }
    pub fn feed_price() -> String {
        "section.item_infos h3.item_price".into()
    }
    pub fn feed_posted() -> String {
        "section.item_infos aside.item_absolute p.item_supp".into()
    }
    pub fn feed_image() -> String {
        "div.item_image span.item_imagePic span".into()
    }
    pub fn image_attr() -> String {
        "data-imgsrc".into()
    }
    pub fn detail_mileage() -> String {
        "section.adview_main div.line:nth-of-type(7) h2 span.value".into()
    }
    pub fn detail_year() -> String {
        "section.adview_main div.line:nth-of-type(6) h2 span.value".into()
    }
    pub fn detail_description() -> String {
        "section.adview_main p[itemprop=\"description\"]".into()
    }

    // Mail defaults
    pub fn api_url() -> String {
        "https://api.brevo.com/v3/smtp/email".into()
    }
    pub fn sender_name() -> String {
        "adwatch".into()
    }
    pub fn subject() -> String {
        "New car listings".into()
    }
    pub fn item_template() -> String {
        concat!(
            "<div class=\"listing\">",
            "<h2><a href=\"{link}\">{title}</a></h2>",
            "<p>{price} — {location} — {posted}</p>",
            "<p>Year: {year} — Mileage: {mileage}</p>",
            "{description}",
            "</div>"
        )
        .into()
    }
    pub fn digest_template() -> String {
        "<html><body><h1>{count} new listings</h1>{items}</body></html>".into()
    }
}
