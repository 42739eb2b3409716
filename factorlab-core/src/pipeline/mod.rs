//! The feature pipeline: day loop, window configuration, diagnostics.
//!
//! One coordinating thread drives trading days in order; within a day the
//! per-instrument work fans out over the rayon pool. Normalization is a hard
//! barrier between window building and relation aggregation, so days are
//! never processed in parallel with each other.

pub mod diagnostics;
mod normalize;
mod relate;
mod window;

pub use diagnostics::{
    ExclusionReason, InstrumentExclusion, RunDiagnostics, SkipReason, SkippedDay,
};
pub use normalize::{channel_stats, ChannelStats};

use crate::calendar::TradingCalendar;
use crate::domain::{ChannelId, FeatureRecord, RelationGraph};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, warn};

/// Window configuration: which lookback horizons to compute and whether the
/// raw volume channels are included.
///
/// Collapses the historical fixed-horizon pipelines into one parameterized
/// run. Horizons are trading-day offsets, kept in configured order; channel
/// order in the output follows them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowConfig {
    pub lookback_horizons: Vec<usize>,
    #[serde(default)]
    pub include_volume_features: bool,
}

impl WindowConfig {
    /// The classic price-only window: 1, 5, and 10 day lookbacks.
    pub fn price_only() -> Self {
        Self {
            lookback_horizons: vec![1, 5, 10],
            include_volume_features: false,
        }
    }

    /// The short window with raw volume channels: 1, 2, and 4 day lookbacks.
    pub fn short_with_volume() -> Self {
        Self {
            lookback_horizons: vec![1, 2, 4],
            include_volume_features: true,
        }
    }

    pub fn max_horizon(&self) -> usize {
        self.lookback_horizons.iter().copied().max().unwrap_or(0)
    }

    /// Own-channel layout, in output order. The label is not part of the
    /// layout; it terminates each record separately.
    pub fn channel_layout(&self) -> Vec<ChannelId> {
        let mut layout: Vec<ChannelId> = self
            .lookback_horizons
            .iter()
            .map(|&horizon| ChannelId::PriceChange { horizon })
            .collect();
        if self.include_volume_features {
            layout.push(ChannelId::VolumeToday);
            layout.push(ChannelId::VolumePrior);
        }
        layout
    }

    /// Fatal, pre-run validation against the available history.
    pub fn validate(&self, day_count: usize) -> Result<(), ConfigError> {
        if self.lookback_horizons.is_empty() {
            return Err(ConfigError::EmptyHorizons);
        }
        if self.lookback_horizons.contains(&0) {
            return Err(ConfigError::ZeroHorizon);
        }
        let max_horizon = self.max_horizon();
        // The earliest processable day is max_horizon; it also needs a label
        // day after it.
        if max_horizon + 2 > day_count {
            return Err(ConfigError::InsufficientHistory {
                max_horizon,
                day_count,
            });
        }
        Ok(())
    }
}

/// Configuration problems that abort the run before any day is processed.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("lookback horizon list is empty")]
    EmptyHorizons,

    #[error("lookback horizons must be positive")]
    ZeroHorizon,

    #[error("horizon {max_horizon} leaves no processable day in {day_count} trading days")]
    InsufficientHistory { max_horizon: usize, day_count: usize },
}

/// Everything one pipeline run produces.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutput {
    /// Accepted records, ordered by trading day and then ticker.
    pub records: Vec<FeatureRecord>,
    pub diagnostics: RunDiagnostics,
}

/// Run the full pipeline over a calendar and relation graph.
///
/// Drives days sequentially from the first window-eligible ordinal to the
/// last day with a label day after it. Per day: eligible-set intersection,
/// parallel window build, the normalization barrier, parallel relation
/// aggregation, then append in ticker order. Per-day and per-instrument
/// anomalies are recovered locally and reported in the diagnostics; only
/// configuration problems are fatal.
pub fn run_pipeline(
    calendar: &TradingCalendar,
    relations: &RelationGraph,
    config: &WindowConfig,
) -> Result<PipelineOutput, ConfigError> {
    config.validate(calendar.day_count())?;

    let layout = config.channel_layout();
    let first_day = config.max_horizon();
    let last_exclusive = calendar.day_count() - 1;

    let mut records = Vec::new();
    let mut diagnostics = RunDiagnostics::default();

    for day in first_day..last_exclusive {
        let started = Instant::now();
        let date = calendar.day(day).date;
        let eligible = window::eligible_instruments(calendar, day, config);
        debug!(
            day,
            of = last_exclusive,
            %date,
            eligible = eligible.len(),
            "building window features"
        );

        if eligible.is_empty() {
            diagnostics.skip_day(day, date, SkipReason::NoEligibleInstruments);
            continue;
        }

        // Parallel fan-out: one worker per instrument slot, results collected
        // back in index order so the coordinating thread owns all insertion.
        let built: Vec<_> = eligible
            .par_iter()
            .map(|ticker| window::build_features(calendar, day, ticker, config))
            .collect();

        let mut features = BTreeMap::new();
        for (ticker, result) in eligible.into_iter().zip(built) {
            match result {
                Ok(f) => {
                    features.insert(ticker, f);
                }
                Err(reason) => {
                    warn!(day, ticker = %ticker, %reason, "instrument excluded");
                    diagnostics.exclude(day, &ticker, reason);
                }
            }
        }

        if features.is_empty() {
            diagnostics.skip_day(day, date, SkipReason::NoEligibleInstruments);
            continue;
        }

        if let Err(channel) = normalize::normalize_day(&mut features, &layout) {
            warn!(day, %channel, "day skipped: degenerate channel");
            diagnostics.skip_day(day, date, SkipReason::DegenerateChannel { channel });
            continue;
        }

        let tickers: Vec<&String> = features.keys().collect();
        let aggregated: Vec<_> = tickers
            .par_iter()
            .map(|ticker| relate::related_averages(ticker.as_str(), &features, relations))
            .collect();

        for (ticker, related) in tickers.into_iter().zip(aggregated) {
            match related {
                Some(related) => {
                    let f = &features[ticker];
                    records.push(FeatureRecord {
                        ticker: ticker.clone(),
                        day,
                        date,
                        own: f.own.clone(),
                        related,
                        label: f.label,
                    });
                    diagnostics.records_emitted += 1;
                }
                None => diagnostics.no_relation_drops += 1,
            }
        }

        diagnostics.days_processed += 1;
        debug!(
            day,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "day complete"
        );
    }

    Ok(PipelineOutput {
        records,
        diagnostics,
    })
}
