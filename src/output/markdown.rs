//! Markdown record output
//!
//! Each harvested record becomes `<markdown-dir>/<slug>.md`, a file holding
//! a single front-matter block, and its product image is saved next to the
//! other images under `<image-dir>/<slug>.<ext>`.

use crate::crawler::Fetcher;
use crate::model::ProductRecord;
use crate::output::images::{save_image, ImageOutcome};
use crate::{RecordError, RecordResult};
use std::path::PathBuf;

const FRONT_MATTER_FENCE: &str = "---";

/// Keys written ahead of the dynamic fields
const RESERVED_KEYS: [&str; 5] = ["Card-Name", "Bank", "Url", "Discontinued", "Image"];

/// Derives a filesystem-safe identifier from a product name
///
/// ASCII letters and digits are kept and lowercased. Runs of whitespace and
/// hyphens become a single hyphen, with none at either end. Every other
/// character is dropped without separating the letters around it.
///
/// Hyphens act as separators rather than being stripped, so `Wells-Fargo`
/// becomes `wells-fargo` (not `wellsfargo`) and `® Card` becomes `card` (not
/// `-card`). This keeps the function idempotent.
///
/// ```
/// use catalog_harvest::output::slugify;
///
/// assert_eq!(slugify("Chase Freedom® Card!!"), "chase-freedom-card");
/// assert_eq!(slugify(&slugify("Chase Freedom® Card!!")), "chase-freedom-card");
/// ```
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_separator = false;

    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.push(c.to_ascii_lowercase());
        } else if c.is_whitespace() || c == '-' {
            pending_separator = true;
        }
    }

    slug
}

/// Turns a field label into a front-matter key (whitespace runs → hyphen)
pub fn front_matter_key(label: &str) -> String {
    label.split_whitespace().collect::<Vec<_>>().join("-")
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Formats a record as a front-matter block
///
/// A dynamic field whose key collides with one of the reserved keys is left
/// out so that every key appears once. `Discontinued` is written as lowercase
/// `"true"` or `"false"`.
pub fn format_front_matter(slug: &str, record: &ProductRecord) -> String {
    let mut md = String::new();
    md.push_str(FRONT_MATTER_FENCE);
    md.push('\n');

    let discontinued = record.discontinued.to_string();
    let image = record.image.to_string();
    let reserved = [
        slug,
        record.provider.as_str(),
        record.source_url.as_str(),
        discontinued.as_str(),
        image.as_str(),
    ];
    for (key, value) in RESERVED_KEYS.iter().zip(reserved) {
        md.push_str(&format!("{}: {}\n", key, quote(value)));
    }

    for (label, value) in &record.fields {
        let key = front_matter_key(label);
        if RESERVED_KEYS.contains(&key.as_str()) {
            tracing::debug!(
                "Dropping field '{}' of {}: collides with a reserved key",
                label,
                record.source_url
            );
            continue;
        }
        md.push_str(&format!("{}: {}\n", key, quote(value)));
    }

    md.push_str(FRONT_MATTER_FENCE);
    md.push('\n');
    md
}

/// Files produced for one record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenRecord {
    /// Identifier derived from the product name
    pub slug: String,

    /// What happened to the product image
    pub image: ImageOutcome,
}

/// Writes records and their images to the output directories
#[derive(Debug, Clone)]
pub struct RecordWriter {
    markdown_dir: PathBuf,
    image_dir: PathBuf,
    fetcher: Fetcher,
}

impl RecordWriter {
    /// Creates a writer targeting the given directories
    pub fn new(
        markdown_dir: impl Into<PathBuf>,
        image_dir: impl Into<PathBuf>,
        fetcher: Fetcher,
    ) -> Self {
        Self {
            markdown_dir: markdown_dir.into(),
            image_dir: image_dir.into(),
            fetcher,
        }
    }

    /// Writes one record and retrieves its image
    ///
    /// # Steps
    ///
    /// 1. Derive the slug from the `Product Name` field
    /// 2. Write the front-matter file `<slug>.md`
    /// 3. Download the image unless none was located
    ///
    /// # Errors
    ///
    /// Any failing step ends the record. A failed image download happens after
    /// the markdown file is already on disk.
    pub async fn write(&self, record: &ProductRecord) -> RecordResult<WrittenRecord> {
        let name = record
            .product_name()
            .ok_or(RecordError::MissingProductName)?;
        let slug = slugify(name);
        if slug.is_empty() {
            return Err(RecordError::EmptySlug(name.to_string()));
        }

        let markdown_path = self.markdown_dir.join(format!("{}.md", slug));
        tokio::fs::write(&markdown_path, format_front_matter(&slug, record)).await?;
        tracing::debug!("Wrote {}", markdown_path.display());

        let image = match record.image.source() {
            Some(src) => {
                let path = save_image(
                    &self.fetcher,
                    &self.image_dir,
                    &slug,
                    src,
                    &record.page_url,
                )
                .await?;
                ImageOutcome::Saved(path)
            }
            None => ImageOutcome::NotLocated,
        };

        Ok(WrittenRecord { slug, image })
    }
}
