//! EodRecord — the fundamental end-of-day market data unit.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One end-of-day row for a single ticker on a single date.
///
/// Supplied by the ingestion collaborator. The pipeline reads only
/// `ticker`, `date`, `close`, and `volume`; the remaining columns are
/// carried for fingerprinting and for downstream consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EodRecord {
    pub ticker: String,
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub open_interest: f64,
}

impl EodRecord {
    /// Whether this record shows actual trading activity.
    ///
    /// A date where no record has volume is a market closure and never
    /// becomes a trading day.
    pub fn has_volume(&self) -> bool {
        self.volume > 0.0
    }

    /// Validity predicate applied within an assigned trading day.
    ///
    /// A close at or below zero cannot feed a change ratio. When volume
    /// features are enabled, a zero-volume record is rejected as well.
    pub fn is_valid(&self, require_volume: bool) -> bool {
        self.close > 0.0 && (!require_volume || self.volume > 0.0)
    }
}
