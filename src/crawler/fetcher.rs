//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the harvester:
//! - Building the HTTP client
//! - GET requests for HTML documents, validating status and Content-Type
//! - GET requests for raw image bytes
//! - Error classification into soft failures

use reqwest::{Client, StatusCode};
use std::time::Instant;

/// Result of a document fetch
#[derive(Debug)]
pub enum FetchResult {
    /// Successfully fetched an HTML document
    Success {
        /// Final URL after redirects
        final_url: String,
        /// Page body content
        body: String,
    },

    /// Response was not HTML (Content-Type mismatch)
    ContentMismatch {
        /// The actual Content-Type received
        content_type: String,
    },

    /// Response status was not 200
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Network error (connection refused, timeout, body read failure, etc.)
    NetworkError {
        /// Error description
        error: String,
    },
}

impl FetchResult {
    /// Describes a failed fetch in one line
    pub fn failure_reason(&self) -> Option<String> {
        match self {
            FetchResult::Success { .. } => None,
            FetchResult::ContentMismatch { content_type } => {
                Some(format!("expected HTML, got '{}'", content_type))
            }
            FetchResult::HttpError { status_code } => Some(format!("HTTP {}", status_code)),
            FetchResult::NetworkError { error } => Some(error.clone()),
        }
    }
}

/// Builds the HTTP client used for every request of a run
///
/// No timeouts and no custom headers: a stalled request holds its worker
/// until the server answers or the process is stopped.
pub fn build_http_client() -> Result<Client, reqwest::Error> {
    Client::builder().gzip(true).brotli(true).build()
}

/// An HTML document and the URL it was served from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// URL after redirects; relative links in `body` resolve against it
    pub final_url: String,

    /// Page body content
    pub body: String,
}

/// Document fetcher shared by all workers
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    /// Creates a fetcher around a fresh HTTP client
    pub fn new() -> Result<Self, reqwest::Error> {
        Ok(Self::with_client(build_http_client()?))
    }

    /// Creates a fetcher around an existing client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Fetches a URL and classifies the response
    ///
    /// | Condition | Result |
    /// |-----------|--------|
    /// | HTTP 200 with an HTML-ish Content-Type | Success |
    /// | HTTP 200 with any other Content-Type | ContentMismatch |
    /// | Any other status | HttpError |
    /// | Transport or body error | NetworkError |
    pub async fn fetch_url(&self, url: &str) -> FetchResult {
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => return classify_error(&e),
        };

        let status = response.status();
        if status != StatusCode::OK {
            return FetchResult::HttpError {
                status_code: status.as_u16(),
            };
        }

        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        if !content_type.to_ascii_lowercase().contains("html") {
            return FetchResult::ContentMismatch { content_type };
        }

        match response.text().await {
            Ok(body) => FetchResult::Success { final_url, body },
            Err(e) => classify_error(&e),
        }
    }

    /// Fetches an HTML document, logging and swallowing soft failures
    ///
    /// # Returns
    ///
    /// * `Some(Document)` - The document body and its final URL
    /// * `None` - The fetch failed; the reason has been logged
    pub async fn fetch_document(&self, url: &str) -> Option<Document> {
        let started = Instant::now();
        tracing::debug!("Fetching {}", url);

        match self.fetch_url(url).await {
            FetchResult::Success { final_url, body } => {
                tracing::debug!(
                    "Fetched {} in {:.3} seconds",
                    url,
                    started.elapsed().as_secs_f64()
                );
                Some(Document { final_url, body })
            }
            failed => {
                tracing::info!(
                    "Error during request to {}: {}",
                    url,
                    failed.failure_reason().unwrap_or_default()
                );
                None
            }
        }
    }

    /// Fetches raw bytes (used for images, no Content-Type check)
    pub async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("HTTP {}", status.as_u16()));
        }

        let bytes = response.bytes().await.map_err(|e| e.to_string())?;
        Ok(bytes.to_vec())
    }
}

fn classify_error(error: &reqwest::Error) -> FetchResult {
    let error = if error.is_timeout() {
        "Request timeout".to_string()
    } else if error.is_connect() {
        format!("Connection failed: {}", error)
    } else {
        error.to_string()
    };
    FetchResult::NetworkError { error }
}
