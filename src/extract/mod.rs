//! HTML extraction for listing and product detail pages
//!
//! This module turns parsed documents into pipeline data:
//! - Listing pages into ordered label → link maps
//! - Detail pages into [`ProductRecord`](crate::model::ProductRecord)s
//!
//! Selectors and the discontinued pattern come from the configuration and are
//! compiled once into [`ExtractRules`], which is shared by every worker.

mod listing;
mod record;

pub use listing::{extract_listing, parse_listing, resolve_link};
pub use record::{extract_record, find_image, is_discontinued, parse_record};

use crate::config::{parse_selector, ExtractConfig};
use crate::ConfigError;
use regex::{Regex, RegexBuilder};
use scraper::Selector;

/// Compiled selectors and patterns for one catalog layout
#[derive(Debug, Clone)]
pub struct ExtractRules {
    pub(crate) listing_item: Selector,
    pub(crate) anchor: Selector,
    pub(crate) masthead: Selector,
    pub(crate) heading: Selector,
    pub(crate) subheading: Selector,
    pub(crate) product_image: Selector,
    pub(crate) tab_panel: Selector,
    pub(crate) row: Selector,
    pub(crate) header_cell: Selector,
    pub(crate) data_cell: Selector,
    pub(crate) discontinued: Regex,
}

impl ExtractRules {
    /// Compiles the extraction rules described by the configuration
    pub fn from_config(config: &ExtractConfig) -> Result<Self, ConfigError> {
        let discontinued = RegexBuilder::new(&config.discontinued_pattern)
            .case_insensitive(true)
            .build()
            .map_err(|e| {
                ConfigError::InvalidPattern(format!(
                    "discontinued-pattern '{}': {}",
                    config.discontinued_pattern, e
                ))
            })?;

        Ok(Self {
            listing_item: parse_selector("listing-item", &config.listing_item)?,
            anchor: parse_selector("anchor", "a[href]")?,
            masthead: parse_selector("masthead", &config.masthead)?,
            heading: parse_selector("heading", "h2")?,
            subheading: parse_selector("subheading", "h4")?,
            product_image: parse_selector("product-image", &config.product_image)?,
            tab_panel: parse_selector("tab-panel", &config.tab_panel)?,
            row: parse_selector("row", "tr")?,
            header_cell: parse_selector("header cell", "th")?,
            data_cell: parse_selector("data cell", "td")?,
            discontinued,
        })
    }
}
