//! Corpus and relation loading for the runner.
//!
//! The ingestion and relationship-discovery collaborators hand their
//! snapshots over as plain CSV; this module materializes them into the
//! in-memory forms the pipeline consumes and fingerprints the corpus so a
//! feature set can be tied back to its input.
//!
//! Synthetic corpus generation is a developer-only aid: deterministic
//! random-walk closes seeded per ticker, clearly not market data.

use chrono::{Datelike, NaiveDate};
use factorlab_core::{EodRecord, RelationGraph};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from the CSV loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        source: csv::Error,
    },

    #[error("decode {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        source: csv::Error,
    },
}

/// One `parent,related` row of the materialized relation graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationRow {
    pub parent: String,
    pub related: String,
}

/// Load end-of-day records from a headered CSV
/// (`ticker,date,open,high,low,close,volume,open_interest`).
pub fn load_records(path: &Path) -> Result<Vec<EodRecord>, LoadError> {
    let mut reader = csv::Reader::from_path(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let mut records = Vec::new();
    for row in reader.deserialize() {
        let record: EodRecord = row.map_err(|source| LoadError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
        records.push(record);
    }
    Ok(records)
}

/// Load the relation graph from a headered CSV of `parent,related` pairs.
/// Self-relations in the file are dropped by the graph itself.
pub fn load_relations(path: &Path) -> Result<RelationGraph, LoadError> {
    let mut reader = csv::Reader::from_path(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let mut graph = RelationGraph::new();
    for row in reader.deserialize() {
        let pair: RelationRow = row.map_err(|source| LoadError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
        graph.add(&pair.parent, &pair.related);
    }
    Ok(graph)
}

/// Deterministic BLAKE3 hash over the corpus.
///
/// Records are visited in (ticker, date) order so the hash is independent of
/// input ordering.
pub fn compute_dataset_hash(records: &[EodRecord]) -> String {
    let mut sorted: Vec<&EodRecord> = records.iter().collect();
    sorted.sort_by(|a, b| (&a.ticker, a.date).cmp(&(&b.ticker, b.date)));

    let mut hasher = blake3::Hasher::new();
    for record in sorted {
        hasher.update(record.ticker.as_bytes());
        hasher.update(record.date.to_string().as_bytes());
        hasher.update(&record.open.to_le_bytes());
        hasher.update(&record.high.to_le_bytes());
        hasher.update(&record.low.to_le_bytes());
        hasher.update(&record.close.to_le_bytes());
        hasher.update(&record.volume.to_le_bytes());
        hasher.update(&record.open_interest.to_le_bytes());
    }
    hasher.finalize().to_hex().to_string()
}

/// Generate a synthetic corpus: a random walk from 100.0 per ticker,
/// weekends skipped, seeded from the ticker name so output is reproducible.
pub fn generate_synthetic_records(
    tickers: &[String],
    start: NaiveDate,
    trading_days: usize,
) -> Vec<EodRecord> {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    let mut records = Vec::with_capacity(tickers.len() * trading_days);
    for ticker in tickers {
        let seed: [u8; 32] = *blake3::hash(ticker.as_bytes()).as_bytes();
        let mut rng = StdRng::from_seed(seed);

        let mut price = 100.0_f64;
        let mut current = start;
        let mut emitted = 0;
        while emitted < trading_days {
            let weekday = current.weekday();
            if weekday == chrono::Weekday::Sat || weekday == chrono::Weekday::Sun {
                current += chrono::Duration::days(1);
                continue;
            }

            let daily_return: f64 = rng.gen_range(-0.03..0.03);
            let open = price;
            let close = price * (1.0 + daily_return);
            let high = open.max(close) * (1.0 + rng.gen_range(0.0..0.01));
            let low = open.min(close) * (1.0 - rng.gen_range(0.0..0.01));
            let volume = rng.gen_range(50_000.0..5_000_000.0_f64);

            records.push(EodRecord {
                ticker: ticker.clone(),
                date: current,
                open,
                high,
                low,
                close,
                volume,
                open_interest: 0.0,
            });

            price = close;
            emitted += 1;
            current += chrono::Duration::days(1);
        }
    }
    records
}

/// Synthetic relation graph: tickers grouped into blocks of four, every pair
/// within a block related both ways (a crude stand-in for peer companies).
pub fn generate_synthetic_relations(tickers: &[String]) -> RelationGraph {
    let mut graph = RelationGraph::new();
    for block in tickers.chunks(4) {
        for parent in block {
            for related in block {
                graph.add(parent, related);
            }
        }
    }
    graph
}
