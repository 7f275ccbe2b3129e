//! Listing page extraction
//!
//! A listing page is an index of named entities (providers on the top-level
//! page, products on a provider page). Each entry is a list item carrying the
//! listing class with an anchor inside it.

use crate::extract::ExtractRules;
use indexmap::IndexMap;
use scraper::Html;
use url::Url;

/// Parses listing HTML and extracts its label → link map
///
/// # Arguments
///
/// * `html` - The listing page content
/// * `base_url` - The page URL, used to resolve relative links
/// * `rules` - Compiled extraction rules
pub fn parse_listing(html: &str, base_url: &Url, rules: &ExtractRules) -> IndexMap<String, String> {
    let document = Html::parse_document(html);
    extract_listing(&document, base_url, rules)
}

/// Extracts the ordered label → link map from a listing document
///
/// # Rules
///
/// - Only list items matching the listing-item selector are considered
/// - The first anchor with an `href` inside each item supplies label and link
/// - Items whose trimmed anchor text is empty are skipped entirely
/// - Items whose link cannot be resolved are skipped
/// - A repeated label keeps its first position but takes the last link
///
/// No matches yields an empty map.
pub fn extract_listing(
    document: &Html,
    base_url: &Url,
    rules: &ExtractRules,
) -> IndexMap<String, String> {
    let mut entries = IndexMap::new();

    for item in document.select(&rules.listing_item) {
        let Some(anchor) = item.select(&rules.anchor).next() else {
            continue;
        };

        let label = anchor.text().collect::<String>().trim().to_string();
        if label.is_empty() {
            continue;
        }

        let Some(href) = anchor.value().attr("href") else {
            continue;
        };

        match resolve_link(href, base_url) {
            Some(link) => {
                entries.insert(label, link);
            }
            None => {
                tracing::debug!("Skipping unresolvable listing link '{}' for {}", href, label);
            }
        }
    }

    entries
}

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - fragment-only links
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
pub fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    let absolute_url = base_url.join(href).ok()?;
    if absolute_url.scheme() == "http" || absolute_url.scheme() == "https" {
        Some(absolute_url.to_string())
    } else {
        None
    }
}
