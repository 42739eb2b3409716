//! Trading calendar — buckets raw records into a dense trading-day axis.
//!
//! A calendar date becomes a trading day only if at least one record shows
//! nonzero volume; closures and holidays never consume an ordinal. Within an
//! assigned day, only records passing the validity predicate are kept.

use crate::domain::EodRecord;
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};

/// One trading day: its calendar date and the valid records, keyed by ticker.
#[derive(Debug, Clone)]
pub struct TradingDay {
    pub date: NaiveDate,
    records: HashMap<String, EodRecord>,
}

impl TradingDay {
    /// Assemble a day directly from records the caller has already filtered.
    /// A duplicated ticker keeps the first record seen.
    pub fn from_records(date: NaiveDate, records: impl IntoIterator<Item = EodRecord>) -> Self {
        let mut kept: HashMap<String, EodRecord> = HashMap::new();
        for record in records {
            kept.entry(record.ticker.clone()).or_insert(record);
        }
        Self {
            date,
            records: kept,
        }
    }

    pub fn record(&self, ticker: &str) -> Option<&EodRecord> {
        self.records.get(ticker)
    }

    pub fn contains(&self, ticker: &str) -> bool {
        self.records.contains_key(ticker)
    }

    pub fn tickers(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Dense, zero-based sequence of trading days. Rebuilt wholesale per run.
#[derive(Debug, Clone, Default)]
pub struct TradingCalendar {
    days: Vec<TradingDay>,
}

impl TradingCalendar {
    /// Bucket an unordered record collection into ordered trading days.
    ///
    /// Dates are sorted ascending and assigned ordinals `0..N-1`. A date
    /// qualifies if any of its records has volume > 0; the validity filter
    /// (close > 0, plus volume > 0 when `require_volume`) is applied
    /// afterwards, so a qualifying date can end up with an empty ticker set
    /// but still consumes an ordinal. A duplicated (ticker, date) pair keeps
    /// the first record seen.
    pub fn build(records: impl IntoIterator<Item = EodRecord>, require_volume: bool) -> Self {
        let mut by_date: BTreeMap<NaiveDate, Vec<EodRecord>> = BTreeMap::new();
        for record in records {
            by_date.entry(record.date).or_default().push(record);
        }

        let mut days = Vec::new();
        for (date, date_records) in by_date {
            if !date_records.iter().any(EodRecord::has_volume) {
                continue;
            }
            let mut kept: HashMap<String, EodRecord> = HashMap::new();
            for record in date_records {
                if record.is_valid(require_volume) {
                    kept.entry(record.ticker.clone()).or_insert(record);
                }
            }
            days.push(TradingDay {
                date,
                records: kept,
            });
        }

        Self { days }
    }

    /// Assemble a calendar from pre-bucketed days; ordinals follow the
    /// given order, which must already be ascending by date.
    pub fn from_days(days: Vec<TradingDay>) -> Self {
        Self { days }
    }

    pub fn day_count(&self) -> usize {
        self.days.len()
    }

    pub fn day(&self, index: usize) -> &TradingDay {
        &self.days[index]
    }

    pub fn days(&self) -> &[TradingDay] {
        &self.days
    }

    /// Close price for a ticker on a trading day, if the ticker is present.
    pub fn close(&self, index: usize, ticker: &str) -> Option<f64> {
        self.days[index].record(ticker).map(|r| r.close)
    }

    /// Volume for a ticker on a trading day, if the ticker is present.
    pub fn volume(&self, index: usize, ticker: &str) -> Option<f64> {
        self.days[index].record(ticker).map(|r| r.volume)
    }
}
