//! Harvest coordinator - main pipeline orchestration logic
//!
//! This module contains the run loop that ties the stages together:
//! - Preparing output directories and resetting the failure log
//! - Reading the provider listing
//! - Resolving product URLs per provider (phase one)
//! - Extracting and writing every product record (phase two)
//! - Collecting run statistics

use crate::config::Config;
use crate::crawler::resolver::{fetch_listing, merge_fragments, resolve_provider};
use crate::crawler::{FetchResult, Fetcher, WorkerPool};
use crate::extract::{parse_record, ExtractRules};
use crate::model::{FailureEntry, ListingEntry, ProductRecord, ProviderUrlMap};
use crate::output::{FailureLog, ImageOutcome, RecordOutcome, RecordWriter, RunSummary};
use crate::{HarvestError, RecordError, RecordResult};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

/// State shared by every phase-two worker
#[derive(Debug)]
struct RecordStage {
    fetcher: Fetcher,
    rules: Arc<ExtractRules>,
    writer: RecordWriter,
    failures: FailureLog,
}

impl RecordStage {
    /// Extracts and writes one record, diverting any failure to the log
    async fn harvest_record(&self, url: String, provider: String) -> RecordOutcome {
        let record = match self.extract(&url, &provider).await {
            Ok(record) => record,
            Err(e) => return self.divert(&provider, &url, None, &e),
        };

        match self.writer.write(&record).await {
            Ok(written) => {
                tracing::info!("Harvested {} from {}", written.slug, url);
                RecordOutcome::Written {
                    slug: written.slug,
                    image_saved: matches!(written.image, ImageOutcome::Saved(_)),
                }
            }
            Err(e) => self.divert(
                &record.provider,
                &record.source_url,
                Some(record.discontinued),
                &e,
            ),
        }
    }

    /// Fetches and parses one detail page
    async fn extract(&self, url: &str, provider: &str) -> RecordResult<ProductRecord> {
        let started = Instant::now();
        let (final_url, body) = match self.fetcher.fetch_url(url).await {
            FetchResult::Success { final_url, body } => (final_url, body),
            failed => {
                return Err(RecordError::Unavailable {
                    url: url.to_string(),
                    reason: failed.failure_reason().unwrap_or_default(),
                })
            }
        };
        let fetched = Instant::now();
        tracing::debug!(
            "Fetched {} in {:.3} seconds",
            url,
            (fetched - started).as_secs_f64()
        );

        let mut record = parse_record(&body, url, provider, &self.rules)?;
        record.page_url = final_url;
        tracing::debug!(
            "Parsed {} in {:.3} seconds ({} fields)",
            url,
            fetched.elapsed().as_secs_f64(),
            record.fields.len()
        );

        Ok(record)
    }

    /// Appends a failure entry and reports the record as failed
    fn divert(
        &self,
        provider: &str,
        url: &str,
        discontinued: Option<bool>,
        cause: &RecordError,
    ) -> RecordOutcome {
        tracing::warn!("Could not harvest {} ({}): {}", url, provider, cause);

        let entry = FailureEntry::now(provider, url, discontinued, cause);
        if let Err(e) = self.failures.append(&entry) {
            tracing::error!(
                "Failed to write to failure log {}: {}",
                self.failures.path().display(),
                e
            );
        }

        RecordOutcome::Failed
    }
}

/// Main harvest coordinator
///
/// A coordinator performs exactly one run: creating it resets the failure
/// log, and [`Harvester::run`] consumes it.
pub struct Harvester {
    config: Arc<Config>,
    fetcher: Fetcher,
    rules: Arc<ExtractRules>,
    pool: WorkerPool,
    stage: Arc<RecordStage>,
}

impl Harvester {
    /// Creates a coordinator for one run
    ///
    /// # Arguments
    ///
    /// * `config` - The validated harvest configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Harvester)` - Output directories exist and the failure log is empty
    /// * `Err(HarvestError)` - Rules could not compile, the HTTP client could
    ///   not be built, or the output locations could not be prepared
    pub fn new(config: Config) -> Result<Self, HarvestError> {
        let rules = Arc::new(ExtractRules::from_config(&config.extract)?);
        let fetcher = Fetcher::new()?;

        prepare_dir(Path::new(&config.output.markdown_dir))?;
        prepare_dir(Path::new(&config.output.image_dir))?;

        let failure_log = Path::new(&config.output.failure_log);
        if let Some(parent) = failure_log.parent() {
            prepare_dir(parent)?;
        }
        let failures = FailureLog::reset(failure_log).map_err(|source| HarvestError::Prepare {
            path: config.output.failure_log.clone(),
            source,
        })?;

        let writer = RecordWriter::new(
            &config.output.markdown_dir,
            &config.output.image_dir,
            fetcher.clone(),
        );
        let stage = Arc::new(RecordStage {
            fetcher: fetcher.clone(),
            rules: Arc::clone(&rules),
            writer,
            failures,
        });

        Ok(Self {
            pool: WorkerPool::new(config.crawler.workers as usize),
            config: Arc::new(config),
            fetcher,
            rules,
            stage,
        })
    }

    /// Runs the whole pipeline
    ///
    /// 1. Reads providers from the top-level listing
    /// 2. Resolves product URLs for every provider in parallel
    /// 3. Extracts and writes every product record in parallel
    ///
    /// Only setup problems are errors. An unreachable top-level listing simply
    /// produces an empty run.
    pub async fn run(self) -> Result<RunSummary, HarvestError> {
        let started = Instant::now();
        let mut summary = RunSummary::new();
        let listing_url = &self.config.source.listing_url;

        tracing::info!("Reading provider listing {}", listing_url);
        let providers = fetch_listing(&self.fetcher, &self.rules, listing_url).await;
        if providers.is_empty() {
            tracing::warn!("No providers found on {}", listing_url);
        }
        summary.providers = providers.len();

        tracing::info!(
            "Resolving product URLs for {} providers with {} workers",
            providers.len(),
            self.pool.workers()
        );
        let fragments = self.resolve_providers(providers).await;
        summary.providers_with_products = fragments.iter().filter(|f| !f.is_empty()).count();
        let url_map = merge_fragments(fragments);
        summary.product_urls = url_map.len();

        tracing::info!("Harvesting {} product pages", url_map.len());
        for outcome in self.harvest_records(url_map).await {
            summary.record(&outcome);
        }

        tracing::info!(
            "Harvest completed: {} written, {} failed in {:?}",
            summary.records_written,
            summary.failures,
            started.elapsed()
        );

        Ok(summary)
    }

    /// Phase one: one provider listing per task, fragments in completion order
    pub async fn resolve_providers(&self, providers: Vec<ListingEntry>) -> Vec<ProviderUrlMap> {
        let fetcher = self.fetcher.clone();
        let rules = Arc::clone(&self.rules);

        self.pool
            .map(providers, move |provider| {
                let fetcher = fetcher.clone();
                let rules = Arc::clone(&rules);
                async move { resolve_provider(&fetcher, &rules, provider).await }
            })
            .await
    }

    /// Phase two: one detail page per task
    pub async fn harvest_records(&self, url_map: ProviderUrlMap) -> Vec<RecordOutcome> {
        let stage = Arc::clone(&self.stage);

        self.pool
            .map(url_map.into_iter().collect(), move |(url, provider)| {
                let stage = Arc::clone(&stage);
                async move { stage.harvest_record(url, provider).await }
            })
            .await
    }
}

fn prepare_dir(path: &Path) -> Result<(), HarvestError> {
    if path.as_os_str().is_empty() {
        return Ok(());
    }
    std::fs::create_dir_all(path).map_err(|source| HarvestError::Prepare {
        path: path.display().to_string(),
        source,
    })
}

/// Runs a complete harvest with the given configuration
///
/// # Example
///
/// ```no_run
/// use catalog_harvest::config::load_config;
/// use catalog_harvest::crawler::harvest;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("harvest.toml"))?;
/// let summary = harvest(config).await?;
/// println!("{} records written", summary.records_written);
/// # Ok(())
/// # }
/// ```
pub async fn harvest(config: Config) -> Result<RunSummary, HarvestError> {
    Harvester::new(config)?.run().await
}
