use serde::Serialize;
use std::fmt;

/// Which refresh a summary describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SyncJobKind {
    /// Prices only, from the stock listing.
    Values,
    /// Per-stock detail with shareholders.
    Details,
}

impl fmt::Display for SyncJobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncJobKind::Values => write!(f, "values refresh"),
            SyncJobKind::Details => write!(f, "details refresh"),
        }
    }
}

/// A stock that could not be refreshed during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncFailure {
    pub ticker: String,
    pub message: String,
}

/// Outcome of one run of a refresh job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncSummary {
    pub kind: SyncJobKind,
    /// Stocks fully written.
    pub succeeded: usize,
    /// Stocks returned by the listing.
    pub total: usize,
    pub failures: Vec<SyncFailure>,
}

impl SyncSummary {
    pub fn new(kind: SyncJobKind, total: usize) -> Self {
        Self {
            kind,
            succeeded: 0,
            total,
            failures: Vec::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub(crate) fn record_success(&mut self) {
        self.succeeded += 1;
    }

    pub(crate) fn record_failure(&mut self, ticker: &str, message: String) {
        self.failures.push(SyncFailure {
            ticker: ticker.to_string(),
            message,
        });
    }
}

impl fmt::Display for SyncSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}/{} stocks succeeded",
            self.kind, self.succeeded, self.total
        )
    }
}

/// Result of refreshing a single stock on demand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockRefresh {
    pub ticker: String,
    /// False when a price already existed for this timestamp.
    pub price_recorded: bool,
    pub shareholders_recorded: usize,
}
