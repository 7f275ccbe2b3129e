//! Run statistics
//!
//! Counters collected by the coordinator after each phase, printed once the
//! run is over.

/// How one product record ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    /// Markdown written; `image_saved` is false when the page had no image
    Written { slug: String, image_saved: bool },

    /// Diverted to the failure log
    Failed,
}

/// Summary of a finished run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Providers found on the top-level listing
    pub providers: usize,

    /// Providers whose listing yielded at least one product URL
    pub providers_with_products: usize,

    /// Distinct product URLs after merging
    pub product_urls: usize,

    /// Records written to markdown
    pub records_written: usize,

    /// Images downloaded
    pub images_saved: usize,

    /// Written records whose page had no product image
    pub images_missing: usize,

    /// Records diverted to the failure log
    pub failures: usize,
}

impl RunSummary {
    /// Creates a new empty summary
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one record outcome
    pub fn record(&mut self, outcome: &RecordOutcome) {
        match outcome {
            RecordOutcome::Written { image_saved, .. } => {
                self.records_written += 1;
                if *image_saved {
                    self.images_saved += 1;
                } else {
                    self.images_missing += 1;
                }
            }
            RecordOutcome::Failed => self.failures += 1,
        }
    }

    /// Returns the share of product URLs written, as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.product_urls == 0 {
            return 0.0;
        }
        (self.records_written as f64 / self.product_urls as f64) * 100.0
    }
}

/// Prints a summary to stdout in a formatted manner
pub fn print_summary(summary: &RunSummary) {
    println!("=== Harvest Summary ===\n");

    println!("Discovery:");
    println!("  Providers found: {}", summary.providers);
    println!(
        "  Providers with products: {}",
        summary.providers_with_products
    );
    println!("  Product URLs: {}", summary.product_urls);
    println!();

    println!("Records:");
    println!("  Written: {}", summary.records_written);
    println!("  Failed: {}", summary.failures);
    println!("  Images saved: {}", summary.images_saved);
    println!("  Without image: {}", summary.images_missing);
    println!();

    println!(
        "Success Rate: {:.1}% ({} / {} product pages written)",
        summary.success_rate(),
        summary.records_written,
        summary.product_urls
    );
}
