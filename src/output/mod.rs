//! Output module for harvested records
//!
//! This module handles:
//! - Writing one front-matter markdown file per record
//! - Downloading product images
//! - The per-run failure log
//! - Run statistics

mod failure_log;
mod images;
mod markdown;
pub mod stats;

pub use failure_log::FailureLog;
pub use images::{image_file_name, save_image, ImageOutcome};
pub use markdown::{format_front_matter, front_matter_key, slugify, RecordWriter, WrittenRecord};
pub use stats::{print_summary, RecordOutcome, RunSummary};
