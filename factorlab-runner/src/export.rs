//! Artifact export — features CSV, run manifest, diagnostics.

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::runner::FeatureRunResult;
use factorlab_core::RunDiagnostics;

/// Write the full artifact set under `output_dir/run-<id12>/`:
/// `features.csv`, `manifest.json`, `diagnostics.json`.
///
/// Returns the run directory.
pub fn save_artifacts(result: &FeatureRunResult, output_dir: &Path) -> Result<PathBuf> {
    let run_dir = output_dir.join(format!("run-{}", &result.run_id[..12]));
    std::fs::create_dir_all(&run_dir)
        .with_context(|| format!("create run directory {}", run_dir.display()))?;

    write_features_csv(&run_dir.join("features.csv"), result)?;
    write_manifest_json(&run_dir.join("manifest.json"), result)?;
    write_diagnostics_json(&run_dir.join("diagnostics.json"), &result.diagnostics)?;

    Ok(run_dir)
}

/// One row per feature record: identity columns, own channels, relation
/// channels, label. Column names follow the channel layout.
pub fn write_features_csv(path: &Path, result: &FeatureRunResult) -> Result<()> {
    let mut file =
        File::create(path).with_context(|| format!("create features CSV {}", path.display()))?;

    let mut header = String::from("ticker,date,day");
    for channel in &result.channels {
        header.push_str(&format!(",{channel}"));
    }
    for channel in &result.channels {
        header.push_str(&format!(",rel_{channel}"));
    }
    header.push_str(",label");
    writeln!(file, "{header}")?;

    for record in &result.records {
        write!(file, "{},{},{}", record.ticker, record.date, record.day)?;
        for value in &record.own {
            write!(file, ",{value}")?;
        }
        for value in &record.related {
            write!(file, ",{value}")?;
        }
        writeln!(file, ",{}", record.label)?;
    }

    Ok(())
}

#[derive(Debug, Serialize)]
struct Manifest<'a> {
    schema_version: u32,
    run_id: &'a str,
    dataset_hash: &'a str,
    window: &'a factorlab_core::WindowConfig,
    channels: Vec<String>,
    day_count: usize,
    instrument_count: usize,
    days_processed: usize,
    records_emitted: usize,
    skipped_days: usize,
    exclusions: usize,
    no_relation_drops: usize,
}

/// Summary manifest for the training collaborator: what was run, over which
/// dataset, and how much of it survived.
pub fn write_manifest_json(path: &Path, result: &FeatureRunResult) -> Result<()> {
    let manifest = Manifest {
        schema_version: result.schema_version,
        run_id: &result.run_id,
        dataset_hash: &result.dataset_hash,
        window: &result.window,
        channels: result.channels.iter().map(|c| c.to_string()).collect(),
        day_count: result.day_count,
        instrument_count: result.instrument_count,
        days_processed: result.diagnostics.days_processed,
        records_emitted: result.diagnostics.records_emitted,
        skipped_days: result.diagnostics.skipped_days.len(),
        exclusions: result.diagnostics.exclusions.len(),
        no_relation_drops: result.diagnostics.no_relation_drops,
    };
    let json = serde_json::to_string_pretty(&manifest).context("serialize manifest")?;
    std::fs::write(path, json).with_context(|| format!("write manifest {}", path.display()))?;
    Ok(())
}

/// Full skip/exclusion detail, one JSON document.
pub fn write_diagnostics_json(path: &Path, diagnostics: &RunDiagnostics) -> Result<()> {
    let json = serde_json::to_string_pretty(diagnostics).context("serialize diagnostics")?;
    std::fs::write(path, json)
        .with_context(|| format!("write diagnostics {}", path.display()))?;
    Ok(())
}
