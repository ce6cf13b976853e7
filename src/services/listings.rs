// src/services/listings.rs

//! Listing scraper service.
//!
//! Fetches the feed page and ad detail pages, extracting fields with the
//! CSS selectors from configuration. The selectors are the fragile,
//! site-specific part; everything else in the crate is insulated from them
//! behind the `ListingSource` trait.

use std::sync::Arc;

use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};

use crate::config::{Config, SelectorConfig};
use crate::error::{AppError, Result};
use crate::models::Listing;
use crate::pipeline::ListingSource;
use crate::utils::http;
use crate::utils::resolve_url;

/// Scraper for the configured classifieds feed.
pub struct ListingScraper {
    config: Arc<Config>,
    client: reqwest::Client,
}

impl ListingScraper {
    /// Create a new listing scraper with the given configuration.
    pub fn new(config: Arc<Config>) -> Result<Self> {
        let client = http::create_async_client(&config.scraper)?;
        Ok(Self { config, client })
    }

    fn selectors(&self) -> &SelectorConfig {
        &self.config.selectors
    }

    /// Extract listings from a parsed feed document, in document order.
    fn parse_feed(&self, document: &Html, base_url: &url::Url, limit: usize) -> Result<Vec<Listing>> {
        let row_sel = parse_selector(&self.selectors().feed_row)?;
        let title_sel = parse_selector(&self.selectors().feed_title)?;
        let location_sel = parse_selector(&self.selectors().feed_location)?;
        let price_sel = parse_selector(&self.selectors().feed_price)?;
        let posted_sel = parse_selector(&self.selectors().feed_posted)?;
        let image_sel = parse_selector(&self.selectors().feed_image)?;

        let mut listings = Vec::new();
        for row in document.select(&row_sel).take(limit) {
            if let Some(listing) = self.parse_feed_row(
                &row,
                &title_sel,
                &location_sel,
                &price_sel,
                &posted_sel,
                &image_sel,
                base_url,
            ) {
                listings.push(listing);
            }
        }
        Ok(listings)
    }

    fn parse_feed_row(
        &self,
        row: &ElementRef,
        title_sel: &Selector,
        location_sel: &Selector,
        price_sel: &Selector,
        posted_sel: &Selector,
        image_sel: &Selector,
        base_url: &url::Url,
    ) -> Option<Listing> {
        let title = element_text(row, title_sel)?;
        if title.is_empty() {
            return None;
        }

        let location = element_text(row, location_sel).unwrap_or_default();
        let price = element_text(row, price_sel).unwrap_or_default();
        let posted = element_text(row, posted_sel).unwrap_or_default();

        let raw_link = row.value().attr("href").unwrap_or("");
        let link = resolve_url(base_url, raw_link);

        let image = row
            .select(image_sel)
            .next()
            .and_then(|el| el.value().attr(&self.selectors().image_attr))
            .map(|src| resolve_url(base_url, src));

        Some(Listing::new(title, link, location, price, posted, image))
    }

    /// Extract detail fields from a parsed ad page.
    fn parse_detail(&self, document: &Html, listing: &mut Listing) -> Result<()> {
        let mileage_sel = parse_selector(&self.selectors().detail_mileage)?;
        let year_sel = parse_selector(&self.selectors().detail_year)?;
        let description_sel = parse_selector(&self.selectors().detail_description)?;

        listing.mileage = document
            .select(&mileage_sel)
            .next()
            .map(|el| normalize_whitespace(&el.text().collect::<String>()));
        listing.year = document
            .select(&year_sel)
            .next()
            .map(|el| normalize_whitespace(&el.text().collect::<String>()));
        // Keep the raw HTML fragment; the digest renders it as-is.
        listing.description = document.select(&description_sel).next().map(|el| el.html());

        Ok(())
    }
}

#[async_trait]
impl ListingSource for ListingScraper {
    async fn fetch_feed(&self, limit: usize) -> Result<Vec<Listing>> {
        let base_url = url::Url::parse(&self.config.watch.url)?;
        let document = http::fetch_page(&self.client, &self.config.watch.url).await?;
        self.parse_feed(&document, &base_url, limit)
    }

    async fn enrich(&self, listing: &mut Listing) -> Result<()> {
        if listing.link.is_empty() {
            return Err(AppError::scrape(listing.title.clone(), "listing has no link"));
        }
        let document = http::fetch_page(&self.client, &listing.link).await?;
        self.parse_detail(&document, listing)
    }
}

fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}

fn element_text(row: &ElementRef, selector: &Selector) -> Option<String> {
    row.select(selector)
        .next()
        .map(|el| normalize_whitespace(&el.text().collect::<String>()))
}

fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn test_scraper() -> ListingScraper {
        let config: Config = toml::from_str(
            r#"
            [watch]
            url = "https://example.com/annonces/"

            [selectors]
            feed_row = "div.feed a.item"
            feed_title = "h2.title"
            feed_location = "p.location"
            feed_price = "span.price"
            feed_posted = "p.posted"
            feed_image = "img.thumb"
            image_attr = "src"
            detail_mileage = "span.mileage"
            detail_year = "span.year"
            detail_description = "p.description"

            [mail]
            api_key = "key"
            sender_email = "watch@example.com"
            recipients = ["me@example.com"]
            "#,
        )
        .unwrap();
        ListingScraper::new(Arc::new(config)).unwrap()
    }

    #[test]
    fn test_parse_selector_valid() {
        assert!(parse_selector("div.class").is_ok());
        assert!(parse_selector("p[itemprop=\"description\"]").is_ok());
    }

    #[test]
    fn test_parse_selector_invalid() {
        assert!(parse_selector("[[invalid").is_err());
    }

    #[test]
    fn parse_feed_extracts_rows_in_order() {
        let scraper = test_scraper();
        let html = Html::parse_document(
            r#"
            <div class="feed">
              <a class="item" href="/ad/1.htm">
                <h2 class="title"> Clio IV </h2>
                <p class="location">Lyon  69003</p>
                <span class="price">7 500 €</span>
                <p class="posted">Aujourd'hui</p>
                <img class="thumb" src="//cdn.example.com/1.jpg">
              </a>
              <a class="item" href="/ad/2.htm">
                <h2 class="title">208 GTI</h2>
                <p class="location">Paris</p>
                <span class="price">12 000 €</span>
                <p class="posted">Hier</p>
              </a>
            </div>
            "#,
        );
        let base = url::Url::parse("https://example.com/annonces/").unwrap();

        let listings = scraper.parse_feed(&html, &base, 10).unwrap();
        assert_eq!(listings.len(), 2);

        assert_eq!(listings[0].title, "Clio IV");
        assert_eq!(listings[0].link, "https://example.com/ad/1.htm");
        assert_eq!(listings[0].location, "Lyon 69003");
        assert_eq!(listings[0].price, "7 500 €");
        assert_eq!(
            listings[0].image.as_deref(),
            Some("https://cdn.example.com/1.jpg")
        );
        assert!(listings[0].mileage.is_none());

        assert_eq!(listings[1].title, "208 GTI");
        assert!(listings[1].image.is_none());
    }

    #[test]
    fn parse_feed_honors_limit() {
        let scraper = test_scraper();
        let html = Html::parse_document(
            r#"
            <div class="feed">
              <a class="item" href="/1"><h2 class="title">A</h2></a>
              <a class="item" href="/2"><h2 class="title">B</h2></a>
              <a class="item" href="/3"><h2 class="title">C</h2></a>
            </div>
            "#,
        );
        let base = url::Url::parse("https://example.com/").unwrap();

        let listings = scraper.parse_feed(&html, &base, 2).unwrap();
        assert_eq!(listings.len(), 2);
        assert_eq!(listings[1].title, "B");
    }

    #[test]
    fn parse_feed_skips_rows_without_title() {
        let scraper = test_scraper();
        let html = Html::parse_document(
            r#"
            <div class="feed">
              <a class="item" href="/1"><p class="location">No title here</p></a>
              <a class="item" href="/2"><h2 class="title">Kept</h2></a>
            </div>
            "#,
        );
        let base = url::Url::parse("https://example.com/").unwrap();

        let listings = scraper.parse_feed(&html, &base, 10).unwrap();
        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].title, "Kept");
    }

    #[test]
    fn parse_detail_populates_fields() {
        let scraper = test_scraper();
        let html = Html::parse_document(
            r#"
            <div>
              <span class="year">2015</span>
              <span class="mileage">120 000 km</span>
              <p class="description">Entretien <b>complet</b>, CT OK</p>
            </div>
            "#,
        );

        let mut listing = Listing::new("Clio", "https://example.com/1", "Lyon", "7 500 €", "", None);
        scraper.parse_detail(&html, &mut listing).unwrap();

        assert_eq!(listing.year.as_deref(), Some("2015"));
        assert_eq!(listing.mileage.as_deref(), Some("120 000 km"));
        let description = listing.description.unwrap();
        assert!(description.starts_with("<p class=\"description\">"));
        assert!(description.contains("<b>complet</b>"));
    }

    #[test]
    fn parse_detail_leaves_missing_fields_unset() {
        let scraper = test_scraper();
        let html = Html::parse_document("<div><span class=\"year\">2015</span></div>");

        let mut listing = Listing::new("Clio", "https://example.com/1", "Lyon", "7 500 €", "", None);
        scraper.parse_detail(&html, &mut listing).unwrap();

        assert_eq!(listing.year.as_deref(), Some("2015"));
        assert!(listing.mileage.is_none());
        assert!(listing.description.is_none());
    }
}
