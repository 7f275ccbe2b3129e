use crate::config::types::{Config, CrawlerConfig, ExtractConfig, OutputConfig, SourceConfig};
use crate::ConfigError;
use regex::RegexBuilder;
use scraper::Selector;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_source_config(&config.source)?;
    validate_crawler_config(&config.crawler)?;
    validate_output_config(&config.output)?;
    validate_extract_config(&config.extract)?;
    Ok(())
}

/// Validates the starting listing URL
fn validate_source_config(config: &SourceConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.listing_url).map_err(|e| {
        ConfigError::InvalidUrl(format!(
            "Invalid listing-url '{}': {}",
            config.listing_url, e
        ))
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "listing-url '{}' must use http or https",
            config.listing_url
        )));
    }

    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.workers < 1 || config.workers > 100 {
        return Err(ConfigError::Validation(format!(
            "workers must be between 1 and 100, got {}",
            config.workers
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    for (name, value) in [
        ("markdown-dir", &config.markdown_dir),
        ("image-dir", &config.image_dir),
        ("failure-log", &config.failure_log),
    ] {
        if value.trim().is_empty() {
            return Err(ConfigError::Validation(format!("{} cannot be empty", name)));
        }
    }

    Ok(())
}

/// Validates that every selector parses and the discontinued pattern compiles
fn validate_extract_config(config: &ExtractConfig) -> Result<(), ConfigError> {
    for (name, selector) in [
        ("listing-item", &config.listing_item),
        ("masthead", &config.masthead),
        ("product-image", &config.product_image),
        ("tab-panel", &config.tab_panel),
    ] {
        parse_selector(name, selector)?;
    }

    RegexBuilder::new(&config.discontinued_pattern)
        .case_insensitive(true)
        .build()
        .map_err(|e| {
            ConfigError::InvalidPattern(format!(
                "discontinued-pattern '{}': {}",
                config.discontinued_pattern, e
            ))
        })?;

    Ok(())
}

/// Parses one CSS selector, naming the config key on failure
pub(crate) fn parse_selector(name: &str, selector: &str) -> Result<Selector, ConfigError> {
    if selector.trim().is_empty() {
        return Err(ConfigError::InvalidPattern(format!(
            "{} selector cannot be empty",
            name
        )));
    }

    Selector::parse(selector).map_err(|e| {
        ConfigError::InvalidPattern(format!("{} selector '{}': {:?}", name, selector, e))
    })
}
