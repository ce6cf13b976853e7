// src/notify/mod.rs

//! Digest rendering and notification dispatch.

mod mailer;

use async_trait::async_trait;

pub use mailer::Mailer;

use crate::config::MailConfig;
use crate::error::Result;
use crate::models::Listing;

/// Notification sink for newly-found listings.
#[async_trait]
pub trait Notify: Send + Sync {
    /// Dispatch a digest for the given listings. Must be a no-op when the
    /// slice is empty.
    async fn notify(&self, listings: &[Listing]) -> Result<()>;
}

/// Renders an HTML digest and dispatches it by email, then echoes one
/// console line per listing.
pub struct Notifier {
    config: MailConfig,
    mailer: Mailer,
}

impl Notifier {
    /// Create a notifier from mail configuration.
    pub fn new(config: MailConfig) -> Result<Self> {
        let mailer = Mailer::new(&config)?;
        Ok(Self { config, mailer })
    }

    /// Render the HTML digest body for the given listings.
    pub fn render_digest(&self, listings: &[Listing]) -> String {
        let items: String = listings
            .iter()
            .map(|listing| listing.format(&self.config.item_template))
            .collect();

        self.config
            .digest_template
            .replace("{count}", &listings.len().to_string())
            .replace("{items}", &items)
    }
}

#[async_trait]
impl Notify for Notifier {
    async fn notify(&self, listings: &[Listing]) -> Result<()> {
        if listings.is_empty() {
            return Ok(());
        }

        let body = self.render_digest(listings);
        self.mailer
            .send(&self.config.recipients, &self.config.subject, &body)
            .await?;

        for listing in listings {
            log::info!("New listing: {}", listing.title);
        }

        Ok(())
    }
}
