//! FactorLab Core — cross-sectional feature engineering over daily records.
//!
//! This crate contains the heart of the feature pipeline:
//! - Domain types (end-of-day records, the relation graph, feature channels)
//! - Trading calendar bucketing with holiday exclusion
//! - Windowed change-ratio features with a one-day-ahead label
//! - Per-day cross-sectional z-score normalization
//! - Related-instrument aggregation over a directed relation graph
//! - A sequential day loop with per-instrument parallel fan-out
//!
//! The pipeline is a pure transformation: it holds no global state, performs
//! no I/O, and is safely re-runnable in the same process over a fresh
//! snapshot.

pub mod calendar;
pub mod domain;
pub mod pipeline;

pub use calendar::{TradingCalendar, TradingDay};
pub use domain::{ChannelId, EodRecord, FeatureRecord, RelationGraph};
pub use pipeline::{run_pipeline, ConfigError, PipelineOutput, RunDiagnostics, WindowConfig};
