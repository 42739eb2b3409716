//! Window feature building — eligibility intersection and raw ratios.
//!
//! Every feature for day `d` is computed only from instruments with complete
//! history across the whole window: present on `d`, on the label day `d+1`,
//! and on every lookback day the configuration names. The intersection is
//! what keeps partially-populated feature vectors out of the output.

use super::diagnostics::ExclusionReason;
use super::WindowConfig;
use crate::calendar::TradingCalendar;
use crate::domain::EodRecord;

/// Raw own-channel values plus the label for one instrument on one day.
///
/// Mutable only while its owning day is being normalized; consumed when the
/// day's records are emitted.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RawFeatures {
    pub own: Vec<f64>,
    pub label: f64,
}

/// The day offsets an instrument must be present on to be eligible for `day`.
fn required_days(day: usize, config: &WindowConfig) -> Vec<usize> {
    let mut days = Vec::with_capacity(config.lookback_horizons.len() + 3);
    days.push(day);
    days.push(day + 1);
    for &h in &config.lookback_horizons {
        days.push(day - h);
    }
    if config.include_volume_features {
        days.push(day - 1);
    }
    days
}

/// Instruments with complete, gap-free history across day `day`'s window,
/// sorted by ticker.
///
/// Callers guarantee `day >= max_horizon` and `day + 1 < day_count`.
pub(crate) fn eligible_instruments(
    calendar: &TradingCalendar,
    day: usize,
    config: &WindowConfig,
) -> Vec<String> {
    let required = required_days(day, config);
    let mut eligible: Vec<String> = calendar
        .day(day)
        .tickers()
        .filter(|ticker| required.iter().all(|&d| calendar.day(d).contains(ticker)))
        .map(str::to_string)
        .collect();
    eligible.sort();
    eligible
}

fn present<'a>(calendar: &'a TradingCalendar, day: usize, ticker: &str) -> &'a EodRecord {
    calendar
        .day(day)
        .record(ticker)
        .expect("eligible instrument present across its window")
}

/// Raw features and label for one eligible instrument.
///
/// A zero close in any denominator is upstream corruption: the instrument is
/// excluded for the day rather than emitting ±infinity.
pub(crate) fn build_features(
    calendar: &TradingCalendar,
    day: usize,
    ticker: &str,
    config: &WindowConfig,
) -> Result<RawFeatures, ExclusionReason> {
    let today = present(calendar, day, ticker).close;
    if today == 0.0 {
        return Err(ExclusionReason::ZeroClose { lookback: 0 });
    }

    let mut own = Vec::with_capacity(config.lookback_horizons.len() + 2);
    for &h in &config.lookback_horizons {
        let past = present(calendar, day - h, ticker).close;
        if past == 0.0 {
            return Err(ExclusionReason::ZeroClose { lookback: h });
        }
        own.push((today - past) / past);
    }

    if config.include_volume_features {
        own.push(present(calendar, day, ticker).volume);
        own.push(present(calendar, day - 1, ticker).volume);
    }

    let next = present(calendar, day + 1, ticker).close;
    let label = (next - today) / today;

    Ok(RawFeatures { own, label })
}
