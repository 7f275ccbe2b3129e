//! Product detail page extraction

use crate::extract::ExtractRules;
use crate::model::{ImageRef, ProductRecord};
use crate::{RecordError, RecordResult};
use scraper::{ElementRef, Html};

/// Parses detail page HTML into a product record
///
/// # Arguments
///
/// * `html` - The detail page content
/// * `source_url` - The URL the page was fetched from
/// * `provider` - The provider the page was listed under
/// * `rules` - Compiled extraction rules
pub fn parse_record(
    html: &str,
    source_url: &str,
    provider: &str,
    rules: &ExtractRules,
) -> RecordResult<ProductRecord> {
    let document = Html::parse_document(html);
    extract_record(&document, source_url, provider, rules)
}

/// Extracts a product record from a parsed detail page
///
/// Tab panels are walked in document order, then rows in document order. A
/// label seen again replaces the earlier value, so the last panel and last
/// row win. Each row's label is its header cell text; its value is the first
/// link target in the row, or the data cell text when the row has no link.
///
/// # Errors
///
/// A row without a header cell, or without both a link and a data cell,
/// aborts the whole record.
pub fn extract_record(
    document: &Html,
    source_url: &str,
    provider: &str,
    rules: &ExtractRules,
) -> RecordResult<ProductRecord> {
    let mut record = ProductRecord::new(provider, source_url);
    record.discontinued = is_discontinued(document, rules);
    record.image = find_image(document, rules);

    for (panel_index, panel) in document.select(&rules.tab_panel).enumerate() {
        for (row_index, row) in panel.select(&rules.row).enumerate() {
            let (label, value) = read_row(row, panel_index, row_index, rules)?;
            record.set_field(label, value);
        }
    }

    Ok(record)
}

/// Reads one table row as a label/value pair
fn read_row(
    row: ElementRef<'_>,
    panel: usize,
    index: usize,
    rules: &ExtractRules,
) -> RecordResult<(String, String)> {
    let header = row
        .select(&rules.header_cell)
        .next()
        .ok_or(RecordError::MissingHeaderCell { panel, row: index })?;
    let label = element_text(header);

    if let Some(href) = row
        .select(&rules.anchor)
        .next()
        .and_then(|anchor| anchor.value().attr("href"))
    {
        return Ok((label, href.to_string()));
    }

    match row.select(&rules.data_cell).next() {
        Some(cell) => Ok((label, element_text(cell))),
        None => Err(RecordError::MissingValue { label }),
    }
}

/// Reports whether the masthead marks the product as discontinued
///
/// A page without a masthead is not discontinued. Otherwise the heading and
/// subheading texts are matched against the discontinued pattern.
pub fn is_discontinued(document: &Html, rules: &ExtractRules) -> bool {
    let Some(masthead) = document.select(&rules.masthead).next() else {
        return false;
    };

    [&rules.heading, &rules.subheading].into_iter().any(|selector| {
        masthead
            .select(selector)
            .next()
            .map(|heading| rules.discontinued.is_match(&heading.text().collect::<String>()))
            .unwrap_or(false)
    })
}

/// Locates the product image source
///
/// An image element with a missing or blank `src` counts as no image: an
/// empty reference would resolve to the detail page itself.
pub fn find_image(document: &Html, rules: &ExtractRules) -> ImageRef {
    document
        .select(&rules.product_image)
        .next()
        .and_then(|img| img.value().attr("src"))
        .map(str::trim)
        .filter(|src| !src.is_empty())
        .map(|src| ImageRef::Located(src.to_string()))
        .unwrap_or(ImageRef::NotFound)
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}
