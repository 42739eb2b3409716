//! Property tests for pipeline invariants.
//!
//! Uses proptest to verify:
//! 1. Eligibility is exactly the window intersection — an instrument absent
//!    from any spanned day never reaches that day's output
//! 2. Cross-sectional z-scores — per processed day, every channel has mean
//!    ≈ 0 and std ≈ 1 across the full cross-section
//! 3. No-relation exclusion — an instrument whose related set is absent that
//!    day never appears
//! 4. Determinism — identical input and config give identical output

use proptest::prelude::*;
use std::collections::BTreeSet;

use chrono::NaiveDate;
use factorlab_core::{run_pipeline, EodRecord, RelationGraph, TradingCalendar, WindowConfig};

const TICKERS: [&str; 5] = ["ALPHA", "BRAVO", "CHARLIE", "DELTA", "ECHO"];

/// Presence grid plus close series for a synthetic corpus. The first two
/// tickers are anchors, present every day, so calendar ordinals match grid
/// indices one-to-one.
#[derive(Debug, Clone)]
struct Corpus {
    day_count: usize,
    present: Vec<Vec<bool>>, // [ticker][day]
    closes: Vec<Vec<f64>>,   // [ticker][day]
}

fn arb_corpus() -> impl Strategy<Value = Corpus> {
    (6usize..=10)
        .prop_flat_map(|day_count| {
            let presence = proptest::collection::vec(
                proptest::collection::vec(prop::bool::weighted(0.8), day_count),
                TICKERS.len(),
            );
            let closes = proptest::collection::vec(
                proptest::collection::vec(1.0f64..100.0, day_count),
                TICKERS.len(),
            );
            (Just(day_count), presence, closes)
        })
        .prop_map(|(day_count, mut present, closes)| {
            for day in 0..day_count {
                present[0][day] = true;
                present[1][day] = true;
            }
            Corpus {
                day_count,
                present,
                closes,
            }
        })
}

fn build_records(corpus: &Corpus) -> Vec<EodRecord> {
    let mut records = Vec::new();
    for (t, ticker) in TICKERS.iter().enumerate() {
        for day in 0..corpus.day_count {
            if !corpus.present[t][day] {
                continue;
            }
            let close = corpus.closes[t][day];
            records.push(EodRecord {
                ticker: ticker.to_string(),
                date: NaiveDate::from_ymd_opt(2024, 3, day as u32 + 1).unwrap(),
                open: close,
                high: close,
                low: close,
                close,
                volume: 1_000.0,
                open_interest: 0.0,
            });
        }
    }
    records
}

/// Complete digraph over the ticker set: relation presence never hides
/// eligibility effects.
fn complete_relations() -> RelationGraph {
    let mut graph = RelationGraph::new();
    for parent in TICKERS {
        for related in TICKERS {
            graph.add(parent, related);
        }
    }
    graph
}

fn window_config() -> WindowConfig {
    WindowConfig {
        lookback_horizons: vec![1, 2],
        include_volume_features: false,
    }
}

/// The eligibility intersection, computed straight off the grid.
fn expected_eligible(corpus: &Corpus, day: usize) -> BTreeSet<&'static str> {
    TICKERS
        .iter()
        .enumerate()
        .filter(|(t, _)| {
            [day, day + 1, day - 1, day - 2]
                .iter()
                .all(|&d| corpus.present[*t][d])
        })
        .map(|(_, ticker)| *ticker)
        .collect()
}

proptest! {
    /// Every emitted (day, ticker) pair respects the window intersection,
    /// and no eligible instrument is missing from a processed day.
    #[test]
    fn eligibility_is_exact_intersection(corpus in arb_corpus()) {
        let calendar = TradingCalendar::build(build_records(&corpus), false);
        prop_assert_eq!(calendar.day_count(), corpus.day_count);

        let output = run_pipeline(&calendar, &complete_relations(), &window_config()).unwrap();
        let skipped: BTreeSet<usize> =
            output.diagnostics.skipped_days.iter().map(|s| s.day).collect();

        for day in 2..corpus.day_count - 1 {
            let emitted: BTreeSet<&str> = output
                .records
                .iter()
                .filter(|r| r.day == day)
                .map(|r| r.ticker.as_str())
                .collect();
            if skipped.contains(&day) {
                prop_assert!(emitted.is_empty());
                continue;
            }
            prop_assert_eq!(emitted, expected_eligible(&corpus, day));
        }
    }

    /// Per processed day, each own channel and the label have cross-sectional
    /// mean ≈ 0 and std ≈ 1. The complete relation graph keeps the whole
    /// cross-section in the output, so the emitted records are the full set.
    #[test]
    fn normalized_channels_have_unit_stats(corpus in arb_corpus()) {
        let calendar = TradingCalendar::build(build_records(&corpus), false);
        let config = window_config();
        let output = run_pipeline(&calendar, &complete_relations(), &config).unwrap();
        let width = config.channel_layout().len();

        for day in 2..corpus.day_count - 1 {
            let day_records: Vec<_> = output.records.iter().filter(|r| r.day == day).collect();
            if day_records.len() < 2 {
                continue;
            }
            for channel in 0..width {
                let values: Vec<f64> = day_records.iter().map(|r| r.own[channel]).collect();
                check_unit_stats(&values)?;
            }
            let labels: Vec<f64> = day_records.iter().map(|r| r.label).collect();
            check_unit_stats(&labels)?;
        }
    }

    /// A ticker with no relations never appears, regardless of presence.
    #[test]
    fn unrelated_instrument_never_emitted(corpus in arb_corpus()) {
        let calendar = TradingCalendar::build(build_records(&corpus), false);
        // ECHO relates to nobody; everybody else forms a complete digraph.
        let mut graph = RelationGraph::new();
        for parent in &TICKERS[..4] {
            for related in &TICKERS[..4] {
                graph.add(parent, related);
            }
        }
        let output = run_pipeline(&calendar, &graph, &window_config()).unwrap();
        prop_assert!(output.records.iter().all(|r| r.ticker != "ECHO"));
    }

    /// Identical input and config reproduce the output exactly.
    #[test]
    fn repeated_runs_identical(corpus in arb_corpus()) {
        let calendar = TradingCalendar::build(build_records(&corpus), false);
        let graph = complete_relations();
        let config = window_config();
        let first = run_pipeline(&calendar, &graph, &config).unwrap();
        let second = run_pipeline(&calendar, &graph, &config).unwrap();
        prop_assert_eq!(first, second);
    }
}

fn check_unit_stats(values: &[f64]) -> Result<(), proptest::test_runner::TestCaseError> {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
    prop_assert!(mean.abs() < 1e-9, "mean {} not ~0", mean);
    prop_assert!((var.sqrt() - 1.0).abs() < 1e-9, "std {} not ~1", var.sqrt());
    Ok(())
}
