//! FactorLab Runner — run orchestration around `factorlab-core`.
//!
//! This crate builds on the pipeline to provide:
//! - TOML run configuration with named window presets
//! - CSV corpus and relation-graph loading
//! - Dataset fingerprinting (BLAKE3) and content-addressable run ids
//! - Synthetic corpus generation for development
//! - Artifact export (features CSV, manifest, diagnostics)

pub mod config;
pub mod data_loader;
pub mod export;
pub mod runner;

pub use config::{ConfigError, DataConfig, OutputConfig, RunConfig, WindowSpec};
pub use data_loader::{
    compute_dataset_hash, generate_synthetic_records, generate_synthetic_relations, load_records,
    load_relations, LoadError, RelationRow,
};
pub use export::{save_artifacts, write_diagnostics_json, write_features_csv, write_manifest_json};
pub use runner::{run_from_config, run_with_data, FeatureRunResult, RunError, SCHEMA_VERSION};
