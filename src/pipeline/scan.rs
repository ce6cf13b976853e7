// src/pipeline/scan.rs

//! Scan pipeline: the dedupe/filter decision core and the run orchestration.

use async_trait::async_trait;

use crate::config::Config;
use crate::error::Result;
use crate::models::Listing;
use crate::notify::Notify;
use crate::storage::{SeenSet, SeenStore};

/// Source of feed candidates and detail enrichment.
///
/// `ListingScraper` is the production implementation; tests use an
/// in-memory fake.
#[async_trait]
pub trait ListingSource: Send + Sync {
    /// Fetch up to `limit` candidates in the feed's natural order,
    /// assumed newest-first. Detail fields are left unset.
    async fn fetch_feed(&self, limit: usize) -> Result<Vec<Listing>>;

    /// Populate mileage, year, and description from the ad's detail page.
    async fn enrich(&self, listing: &mut Listing) -> Result<()>;
}

/// Scan the feed and decide which listings to notify.
///
/// Candidates are processed strictly in feed order. The first candidate whose
/// fingerprint is already in the seen-set ends the scan: with a newest-first
/// feed, everything below it was seen on an earlier run. An out-of-order feed
/// would silently miss new items below that boundary.
///
/// When `keywords` is `Some`, a candidate that matches none of the terms is
/// neither notified nor marked seen, so it gets re-evaluated on future runs.
pub async fn scan(
    source: &dyn ListingSource,
    seen: &mut SeenSet,
    limit: usize,
    keywords: Option<&[String]>,
) -> Result<Vec<Listing>> {
    let candidates = source.fetch_feed(limit).await?;
    log::info!("Feed returned {} candidates", candidates.len());

    let mut new_listings = Vec::new();
    for mut listing in candidates {
        source.enrich(&mut listing).await?;
        let fingerprint = listing.fingerprint();

        if seen.contains(&fingerprint) {
            log::debug!("Reached already-seen listing: {}", listing.title);
            break;
        }

        match keywords {
            Some(terms) if !listing.matches_keywords(terms) => {
                log::debug!("No keyword match, skipping: {}", listing.title);
            }
            _ => {
                seen.insert(fingerprint);
                new_listings.push(listing);
            }
        }
    }

    Ok(new_listings)
}

/// Run one full batch scan: load the seen-set, scan, persist, notify.
///
/// The seen-set is saved even when nothing new was found, normalizing the
/// persisted format. It is saved before dispatch, so a dispatch failure can
/// leave listings marked seen but never notified; the run still exits
/// non-zero in that case.
pub async fn run_scan(
    config: &Config,
    source: &dyn ListingSource,
    store: &SeenStore,
    notifier: &dyn Notify,
) -> Result<()> {
    let mut seen = store.load().await?;
    log::info!(
        "Scanning {} (limit {}, {} known fingerprints)",
        config.watch.url,
        config.watch.limit,
        seen.len()
    );

    let keywords = config
        .keywords
        .enabled
        .then_some(config.keywords.terms.as_slice());

    let new_listings = scan(source, &mut seen, config.watch.limit, keywords).await?;

    store.save(&seen).await?;

    if new_listings.is_empty() {
        log::info!("No new listings");
    } else {
        log::info!("{} new listings to notify", new_listings.len());
        notifier.notify(&new_listings).await?;
    }

    Ok(())
}
