//! Product image retrieval

use crate::crawler::Fetcher;
use crate::{RecordError, RecordResult};
use std::path::{Path, PathBuf};
use url::Url;

/// What happened to a record's image
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageOutcome {
    /// Downloaded and written to this path
    Saved(PathBuf),

    /// The detail page had no product image
    NotLocated,
}

/// Builds the image file name from the slug and the URL's final path segment
///
/// The extension is whatever follows the last `.` of that segment. A segment
/// without one yields the bare slug.
pub fn image_file_name(slug: &str, image_url: &Url) -> String {
    let extension = image_url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .and_then(|segment| segment.rsplit_once('.'))
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty());

    match extension {
        Some(ext) => format!("{}.{}", slug, ext),
        None => slug.to_string(),
    }
}

/// Downloads an image and writes it under `image_dir`
///
/// `src` is resolved against the page it was found on, so relative sources
/// work. A blank `src` is rejected rather than resolved to the page itself.
pub async fn save_image(
    fetcher: &Fetcher,
    image_dir: &Path,
    slug: &str,
    src: &str,
    page_url: &str,
) -> RecordResult<PathBuf> {
    let src = src.trim();
    if src.is_empty() {
        return Err(RecordError::EmptyImageSource);
    }

    let image_url = Url::parse(page_url)
        .and_then(|base| base.join(src))
        .map_err(|source| RecordError::ImageUrl {
            url: src.to_string(),
            source,
        })?;

    let bytes = fetcher
        .fetch_bytes(image_url.as_str())
        .await
        .map_err(|reason| RecordError::ImageDownload {
            url: image_url.to_string(),
            reason,
        })?;

    let path = image_dir.join(image_file_name(slug, &image_url));
    tokio::fs::write(&path, &bytes).await?;
    tracing::debug!("Saved image {} ({} bytes)", path.display(), bytes.len());

    Ok(path)
}
