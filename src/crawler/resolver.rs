//! Provider resolution
//!
//! Stage one reads the top-level listing into provider entries. Stage two
//! fetches every provider's own listing page and maps each product link found
//! there back to the provider.

use crate::crawler::Fetcher;
use crate::extract::{parse_listing, ExtractRules};
use crate::model::{ListingEntry, ProviderUrlMap};
use std::time::Instant;
use url::Url;

/// Fetches a listing page and returns its entries in document order
///
/// Relative links resolve against the URL the page was finally served from,
/// so a redirected listing keeps its links pointing at the right place. A
/// page that cannot be fetched yields no entries; the fetcher has already
/// logged why.
pub async fn fetch_listing(fetcher: &Fetcher, rules: &ExtractRules, url: &str) -> Vec<ListingEntry> {
    let Some(document) = fetcher.fetch_document(url).await else {
        return Vec::new();
    };

    let base_url = match Url::parse(&document.final_url) {
        Ok(base_url) => base_url,
        Err(e) => {
            tracing::info!("Skipping listing with invalid URL {}: {}", document.final_url, e);
            return Vec::new();
        }
    };
    if document.final_url != url {
        tracing::debug!("Listing {} redirected to {}", url, document.final_url);
    }

    let started = Instant::now();
    let entries = parse_listing(&document.body, &base_url, rules);
    tracing::debug!(
        "Parsed listing {} ({} entries) in {:.3} seconds",
        url,
        entries.len(),
        started.elapsed().as_secs_f64()
    );

    entries
        .into_iter()
        .map(|(label, link)| ListingEntry { label, link })
        .collect()
}

/// Resolves one provider into a product URL → provider fragment
///
/// Every link on the provider's listing page is recorded with the provider's
/// name. A provider whose page cannot be retrieved contributes an empty
/// fragment.
pub async fn resolve_provider(
    fetcher: &Fetcher,
    rules: &ExtractRules,
    provider: ListingEntry,
) -> ProviderUrlMap {
    let fragment: ProviderUrlMap = fetch_listing(fetcher, rules, &provider.link)
        .await
        .into_iter()
        .map(|entry| (entry.link, provider.label.clone()))
        .collect();

    if fragment.is_empty() {
        tracing::info!("Provider {} contributed no product URLs", provider.label);
    } else {
        tracing::debug!(
            "Provider {} lists {} product URLs",
            provider.label,
            fragment.len()
        );
    }

    fragment
}

/// Merges provider fragments in the given order
///
/// A URL present in several fragments ends up with the provider of the last
/// fragment that contains it.
pub fn merge_fragments(fragments: impl IntoIterator<Item = ProviderUrlMap>) -> ProviderUrlMap {
    let mut merged = ProviderUrlMap::new();
    for fragment in fragments {
        merged.extend(fragment);
    }
    merged
}
