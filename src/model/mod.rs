//! Data model shared by the harvest pipeline
//!
//! - [`ListingEntry`]: one labelled link from a listing page
//! - [`ProviderUrlMap`]: product detail URL to provider name
//! - [`ProductRecord`]: everything extracted from one detail page
//! - [`FailureEntry`]: one line group in the failure log

mod failure;
mod record;

pub use failure::FailureEntry;
pub use record::{ImageRef, ListingEntry, ProductRecord, ProviderUrlMap, PRODUCT_NAME_FIELD};
