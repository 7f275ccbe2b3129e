use chrono::{DateTime, Local};
use std::fmt;

/// One record that could not be harvested
#[derive(Debug, Clone)]
pub struct FailureEntry {
    /// When the failure was recorded
    pub timestamp: DateTime<Local>,

    /// Provider the record was listed under
    pub provider: String,

    /// Detail page of the record
    pub source_url: String,

    /// Discontinued flag, or `None` when extraction stopped before it was read
    pub discontinued: Option<bool>,

    /// Description of what went wrong
    pub cause: String,
}

impl FailureEntry {
    /// Creates an entry stamped with the current local time
    pub fn now(
        provider: impl Into<String>,
        source_url: impl Into<String>,
        discontinued: Option<bool>,
        cause: impl fmt::Display,
    ) -> Self {
        Self {
            timestamp: Local::now(),
            provider: provider.into(),
            source_url: source_url.into(),
            discontinued,
            cause: cause.to_string(),
        }
    }
}

impl fmt::Display for FailureEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} -- could not parse for bank {}, {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S%.6f"),
            self.provider,
            self.source_url
        )?;
        match self.discontinued {
            Some(flag) => writeln!(f, "Discontinued: {}", flag)?,
            None => writeln!(f, "Discontinued: unknown")?,
        }
        writeln!(f, "{}", self.cause)
    }
}
