//! Run orchestration — wires loading, the pipeline, and fingerprinting.
//!
//! Two entry points:
//! - `run_from_config()`: loads CSV snapshots named by a `RunConfig`. Used
//!   by the CLI.
//! - `run_with_data()`: takes a pre-loaded corpus and relation graph — no
//!   I/O. Used by tests and embedding callers.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use factorlab_core::{
    run_pipeline, ChannelId, EodRecord, FeatureRecord, RelationGraph, RunDiagnostics,
    TradingCalendar, WindowConfig,
};

use crate::config::{ConfigError, RunConfig};
use crate::data_loader::{compute_dataset_hash, load_records, load_relations, LoadError};

/// Current schema version for persisted artifacts.
pub const SCHEMA_VERSION: u32 = 1;

/// Errors from the runner.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("data error: {0}")]
    Data(#[from] LoadError),

    #[error("window error: {0}")]
    Window(#[from] factorlab_core::ConfigError),
}

/// Complete result of one feature-generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureRunResult {
    /// Schema version for forward-compatible deserialization.
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    /// Content hash of window config + dataset, naming the artifact set.
    pub run_id: String,
    pub dataset_hash: String,
    pub window: WindowConfig,
    /// Own-channel layout; the relation channels mirror it.
    pub channels: Vec<ChannelId>,
    pub day_count: usize,
    pub instrument_count: usize,
    pub records: Vec<FeatureRecord>,
    pub diagnostics: RunDiagnostics,
}

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

/// Run from a config file's worth of settings: load both snapshots, then
/// hand off to `run_with_data`.
pub fn run_from_config(config: &RunConfig) -> Result<FeatureRunResult, RunError> {
    let records = load_records(&config.data.records)?;
    let relations = load_relations(&config.data.relations)?;
    let window = config.window.to_window_config();
    run_with_data(records, &relations, &window)
}

/// Run over a pre-loaded corpus — no I/O.
pub fn run_with_data(
    records: Vec<EodRecord>,
    relations: &RelationGraph,
    window: &WindowConfig,
) -> Result<FeatureRunResult, RunError> {
    let dataset_hash = compute_dataset_hash(&records);
    let instrument_count = {
        let mut tickers: Vec<&str> = records.iter().map(|r| r.ticker.as_str()).collect();
        tickers.sort_unstable();
        tickers.dedup();
        tickers.len()
    };

    let calendar = TradingCalendar::build(records, window.include_volume_features);
    info!(
        days = calendar.day_count(),
        instruments = instrument_count,
        "calendar built"
    );

    let output = run_pipeline(&calendar, relations, window)?;

    let diag = &output.diagnostics;
    info!(
        days_processed = diag.days_processed,
        records = diag.records_emitted,
        skipped_days = diag.skipped_days.len(),
        exclusions = diag.exclusions.len(),
        no_relation_drops = diag.no_relation_drops,
        "pipeline finished"
    );

    Ok(FeatureRunResult {
        schema_version: SCHEMA_VERSION,
        run_id: run_id(window, &dataset_hash),
        dataset_hash,
        window: window.clone(),
        channels: window.channel_layout(),
        day_count: calendar.day_count(),
        instrument_count,
        records: output.records,
        diagnostics: output.diagnostics,
    })
}

/// Content-addressable run identity: window config + dataset hash.
fn run_id(window: &WindowConfig, dataset_hash: &str) -> String {
    let mut hasher = blake3::Hasher::new();
    let window_json = serde_json::to_string(window).expect("WindowConfig serialization failed");
    hasher.update(window_json.as_bytes());
    hasher.update(dataset_hash.as_bytes());
    hasher.finalize().to_hex().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_loader::{generate_synthetic_records, generate_synthetic_relations};
    use chrono::NaiveDate;

    fn synthetic_run(window: &WindowConfig) -> FeatureRunResult {
        let tickers: Vec<String> = ["AAA", "BBB", "CCC", "DDD"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let records = generate_synthetic_records(&tickers, start, 40);
        let relations = generate_synthetic_relations(&tickers);
        run_with_data(records, &relations, window).unwrap()
    }

    #[test]
    fn run_with_data_produces_records() {
        let result = synthetic_run(&WindowConfig::price_only());
        assert_eq!(result.day_count, 40);
        assert_eq!(result.instrument_count, 4);
        assert!(!result.records.is_empty());
        assert_eq!(result.channels.len(), 3);
        for record in &result.records {
            assert_eq!(record.feature_vector().len(), 6);
        }
    }

    #[test]
    fn run_id_separates_configs_on_same_data() {
        let price_only = synthetic_run(&WindowConfig::price_only());
        let with_volume = synthetic_run(&WindowConfig::short_with_volume());
        assert_eq!(price_only.dataset_hash, with_volume.dataset_hash);
        assert_ne!(price_only.run_id, with_volume.run_id);
    }
}
