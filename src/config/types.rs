use serde::Deserialize;

/// Main configuration structure for Catalog-Harvest
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub extract: ExtractConfig,
}

/// Where the harvest starts
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// Top-level listing page enumerating every provider
    #[serde(rename = "listing-url", default = "default_listing_url")]
    pub listing_url: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            listing_url: default_listing_url(),
        }
    }
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Number of concurrent workers used by both pipeline phases
    #[serde(default = "default_workers")]
    pub workers: u32,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving one `<slug>.md` file per record
    #[serde(rename = "markdown-dir", default = "default_markdown_dir")]
    pub markdown_dir: String,

    /// Directory receiving downloaded product images
    #[serde(rename = "image-dir", default = "default_image_dir")]
    pub image_dir: String,

    /// Append-only log of records that could not be harvested
    #[serde(rename = "failure-log", default = "default_failure_log")]
    pub failure_log: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            markdown_dir: default_markdown_dir(),
            image_dir: default_image_dir(),
            failure_log: default_failure_log(),
        }
    }
}

/// CSS selectors and patterns describing the catalog's page structure
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractConfig {
    /// List items holding one listing link each
    #[serde(rename = "listing-item", default = "default_listing_item")]
    pub listing_item: String,

    /// Masthead block carrying the product's title and status headings
    #[serde(default = "default_masthead")]
    pub masthead: String,

    /// Image element holding the product picture
    #[serde(rename = "product-image", default = "default_product_image")]
    pub product_image: String,

    /// Tab panels holding the attribute tables
    #[serde(rename = "tab-panel", default = "default_tab_panel")]
    pub tab_panel: String,

    /// Regex matched case-insensitively against the masthead headings
    #[serde(
        rename = "discontinued-pattern",
        default = "default_discontinued_pattern"
    )]
    pub discontinued_pattern: String,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            listing_item: default_listing_item(),
            masthead: default_masthead(),
            product_image: default_product_image(),
            tab_panel: default_tab_panel(),
            discontinued_pattern: default_discontinued_pattern(),
        }
    }
}

fn default_listing_url() -> String {
    "https://www.finder.com/credit-cards/complete-list-of-credit-card-companies".to_string()
}

fn default_workers() -> u32 {
    16
}

fn default_markdown_dir() -> String {
    "markdown".to_string()
}

fn default_image_dir() -> String {
    "images".to_string()
}

fn default_failure_log() -> String {
    "markdown/could-not-parse.txt".to_string()
}

fn default_listing_item() -> String {
    "li.az-listing__item".to_string()
}

fn default_masthead() -> String {
    "div.creditCard__desktopInfo.mastheadGrid__main".to_string()
}

fn default_product_image() -> String {
    "img.productImage".to_string()
}

fn default_tab_panel() -> String {
    "div.luna-tabpanel".to_string()
}

fn default_discontinued_pattern() -> String {
    "Discontinued".to_string()
}
