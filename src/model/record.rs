use indexmap::IndexMap;
use std::fmt;

/// Field label holding the human-readable product name
pub const PRODUCT_NAME_FIELD: &str = "Product Name";

/// Text written in place of an image reference when the page has none
const NO_IMAGE_SENTINEL: &str = "No image found";

/// A labelled link found on a listing page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    /// Visible, trimmed anchor text
    pub label: String,

    /// Absolute link target
    pub link: String,
}

/// Product detail URL mapped to the provider it was listed under
///
/// Keys are unique. When two providers list the same URL the provider merged
/// last wins.
pub type ProviderUrlMap = IndexMap<String, String>;

/// Reference to the product image of a detail page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageRef {
    /// The `src` attribute of the product image element, as written in the page
    Located(String),

    /// The page had no product image element
    NotFound,
}

impl ImageRef {
    /// Returns the image source if one was located
    pub fn source(&self) -> Option<&str> {
        match self {
            ImageRef::Located(src) => Some(src),
            ImageRef::NotFound => None,
        }
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageRef::Located(src) => f.write_str(src),
            ImageRef::NotFound => f.write_str(NO_IMAGE_SENTINEL),
        }
    }
}

/// Structured data extracted from one product detail page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductRecord {
    /// Provider (bank) the product was listed under
    pub provider: String,

    /// Detail page the record was extracted from
    pub source_url: String,

    /// URL the detail page was served from after redirects
    ///
    /// Relative image sources resolve against this. Equal to `source_url`
    /// unless the page redirected.
    pub page_url: String,

    /// Whether the masthead marks the product as discontinued
    pub discontinued: bool,

    /// Product image reference
    pub image: ImageRef,

    /// Table rows keyed by their visible label, in first-seen order
    pub fields: IndexMap<String, String>,
}

impl ProductRecord {
    /// Creates a record with no table fields yet
    pub fn new(provider: impl Into<String>, source_url: impl Into<String>) -> Self {
        let source_url = source_url.into();
        Self {
            provider: provider.into(),
            page_url: source_url.clone(),
            source_url,
            discontinued: false,
            image: ImageRef::NotFound,
            fields: IndexMap::new(),
        }
    }

    /// Stores a table field, replacing any earlier value for the same label
    pub fn set_field(&mut self, label: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(label.into(), value.into());
    }

    /// Returns the product name field, if the page had one
    pub fn product_name(&self) -> Option<&str> {
        self.fields.get(PRODUCT_NAME_FIELD).map(String::as_str)
    }
}
