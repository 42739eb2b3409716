//! Run diagnostics — what was skipped or excluded, and why.
//!
//! Per-day and per-instrument anomalies are recovered locally (skip the day,
//! exclude the instrument) and collected here; the run itself always
//! completes and returns whatever valid records it could produce.

use crate::domain::ChannelId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why an entire trading day produced no output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SkipReason {
    /// A channel's cross-sectional standard deviation was zero, so z-scores
    /// for that day are undefined.
    DegenerateChannel { channel: ChannelId },

    /// No instrument had complete history across the day's window.
    NoEligibleInstruments,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::DegenerateChannel { channel } => {
                write!(f, "zero cross-sectional std-dev on channel {channel}")
            }
            SkipReason::NoEligibleInstruments => write!(f, "no eligible instruments"),
        }
    }
}

/// Why one instrument was excluded from one day's output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExclusionReason {
    /// A window computation hit a zero close in a denominator.
    /// `lookback` is the offending day offset; 0 means the current day.
    ZeroClose { lookback: usize },
}

impl fmt::Display for ExclusionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExclusionReason::ZeroClose { lookback: 0 } => write!(f, "zero close on current day"),
            ExclusionReason::ZeroClose { lookback } => {
                write!(f, "zero close {lookback} trading days back")
            }
        }
    }
}

/// A trading day that was skipped entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedDay {
    pub day: usize,
    pub date: NaiveDate,
    pub reason: SkipReason,
}

/// An instrument excluded from a single day's output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentExclusion {
    pub day: usize,
    pub ticker: String,
    pub reason: ExclusionReason,
}

/// Counters and event lists accumulated over one pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunDiagnostics {
    /// Days that produced at least the normalization pass.
    pub days_processed: usize,
    pub records_emitted: usize,
    pub skipped_days: Vec<SkippedDay>,
    pub exclusions: Vec<InstrumentExclusion>,
    /// Instruments dropped because none of their related instruments were
    /// present that day. Deliberate policy, counted but not an anomaly.
    pub no_relation_drops: usize,
}

impl RunDiagnostics {
    pub(crate) fn skip_day(&mut self, day: usize, date: NaiveDate, reason: SkipReason) {
        self.skipped_days.push(SkippedDay { day, date, reason });
    }

    pub(crate) fn exclude(&mut self, day: usize, ticker: &str, reason: ExclusionReason) {
        self.exclusions.push(InstrumentExclusion {
            day,
            ticker: ticker.to_string(),
            reason,
        });
    }
}
