//! FactorLab CLI — feature-generation runs and synthetic sample data.
//!
//! Commands:
//! - `run` — execute a feature-generation run from a TOML config file
//! - `sample` — write a deterministic synthetic corpus + relations + config,
//!   ready for `run`, for development and demos

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use factorlab_runner::{
    generate_synthetic_records, generate_synthetic_relations, run_from_config, save_artifacts,
    FeatureRunResult, RelationRow, RunConfig, WindowSpec,
};

#[derive(Parser)]
#[command(
    name = "factorlab",
    about = "FactorLab CLI — cross-sectional feature engineering for daily market data"
)]
struct Cli {
    /// Per-day progress and anomaly detail on stderr.
    #[arg(long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute a feature-generation run from a TOML config file.
    Run {
        /// Path to the TOML config.
        #[arg(long)]
        config: PathBuf,

        /// Override the config's output directory.
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Override lookback horizons, comma-separated (e.g. 1,5,10).
        #[arg(long, value_delimiter = ',')]
        horizons: Option<Vec<usize>>,

        /// With --horizons: also include the raw volume channels.
        #[arg(long, requires = "horizons", default_value_t = false)]
        volume: bool,
    },
    /// Write a synthetic corpus, relation graph, and matching config file.
    Sample {
        /// Directory for the generated files.
        #[arg(long, default_value = "sample-data")]
        out_dir: PathBuf,

        /// Number of synthetic tickers.
        #[arg(long, default_value_t = 12)]
        tickers: usize,

        /// Number of trading days per ticker.
        #[arg(long, default_value_t = 120)]
        days: usize,

        /// First calendar date (YYYY-MM-DD).
        #[arg(long, default_value = "2024-01-01")]
        start: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Run {
            config,
            output_dir,
            horizons,
            volume,
        } => run_cmd(&config, output_dir, horizons, volume),
        Commands::Sample {
            out_dir,
            tickers,
            days,
            start,
        } => sample_cmd(&out_dir, tickers, days, &start),
    }
}

fn run_cmd(
    config_path: &Path,
    output_dir: Option<PathBuf>,
    horizons: Option<Vec<usize>>,
    volume: bool,
) -> Result<()> {
    let mut config = RunConfig::from_file(config_path)
        .with_context(|| format!("load config {}", config_path.display()))?;
    if let Some(dir) = output_dir {
        config.output.dir = dir;
    }
    if let Some(lookback_horizons) = horizons {
        config.window = WindowSpec::Custom {
            lookback_horizons,
            include_volume_features: volume,
        };
    }

    let result = run_from_config(&config)?;
    print_summary(&result);

    let run_dir = save_artifacts(&result, &config.output.dir)?;
    println!("Artifacts saved to: {}", run_dir.display());

    Ok(())
}

fn sample_cmd(out_dir: &Path, ticker_count: usize, days: usize, start: &str) -> Result<()> {
    let start_date = NaiveDate::parse_from_str(start, "%Y-%m-%d")?;
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("create {}", out_dir.display()))?;

    let tickers: Vec<String> = (0..ticker_count).map(|i| format!("SYN{i:03}")).collect();
    let records = generate_synthetic_records(&tickers, start_date, days);
    let relations = generate_synthetic_relations(&tickers);

    let records_path = out_dir.join("eod.csv");
    let mut writer = csv::Writer::from_path(&records_path)?;
    for record in &records {
        writer.serialize(record)?;
    }
    writer.flush()?;

    let relations_path = out_dir.join("relations.csv");
    let mut writer = csv::Writer::from_path(&relations_path)?;
    for parent in &tickers {
        if let Some(related) = relations.related(parent) {
            for other in related {
                writer.serialize(RelationRow {
                    parent: parent.clone(),
                    related: other.clone(),
                })?;
            }
        }
    }
    writer.flush()?;

    let config_path = out_dir.join("factorlab.toml");
    let config = format!(
        r#"[data]
records = "{records}"
relations = "{relations}"

[window]
type = "PRICE_ONLY"

[output]
dir = "{out}"
"#,
        records = records_path.display(),
        relations = relations_path.display(),
        out = out_dir.join("results").display(),
    );
    std::fs::write(&config_path, config)?;

    println!("Wrote {} records for {} tickers.", records.len(), ticker_count);
    println!("Corpus:    {}", records_path.display());
    println!("Relations: {}", relations_path.display());
    println!("Config:    {}", config_path.display());
    println!();
    println!("Run it with: factorlab run --config {}", config_path.display());

    Ok(())
}

fn print_summary(result: &FeatureRunResult) {
    println!();
    println!("=== Feature Run ===");
    println!("Run id:         {}", &result.run_id[..12]);
    println!("Dataset:        {}", &result.dataset_hash[..12]);
    println!(
        "Horizons:       {:?}{}",
        result.window.lookback_horizons,
        if result.window.include_volume_features {
            " + volume"
        } else {
            ""
        }
    );
    println!("Trading days:   {}", result.day_count);
    println!("Instruments:    {}", result.instrument_count);
    println!();
    println!("--- Output ---");
    println!("Days processed: {}", result.diagnostics.days_processed);
    println!("Records:        {}", result.diagnostics.records_emitted);
    println!(
        "Vector width:   {} (+ label)",
        2 * result.channels.len()
    );
    println!();
    println!("--- Recovered anomalies ---");
    println!("Skipped days:   {}", result.diagnostics.skipped_days.len());
    for skipped in &result.diagnostics.skipped_days {
        println!("  day {} ({}): {}", skipped.day, skipped.date, skipped.reason);
    }
    println!("Exclusions:     {}", result.diagnostics.exclusions.len());
    for excluded in &result.diagnostics.exclusions {
        println!(
            "  day {} {}: {}",
            excluded.day, excluded.ticker, excluded.reason
        );
    }
    println!(
        "Dropped (no co-present relations): {}",
        result.diagnostics.no_relation_drops
    );
    println!();
}
