//! Cross-sectional normalization — per-day, per-channel z-scores.
//!
//! Statistics are computed across the day's instrument cross-section, never
//! across time, and never before the whole day's instrument set is known.

use super::window::RawFeatures;
use crate::domain::ChannelId;
use std::collections::BTreeMap;

/// Mean and population standard deviation of one channel's cross-section.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelStats {
    pub mean: f64,
    pub std_dev: f64,
}

/// Population statistics over a channel's values (divide by N).
pub fn channel_stats(values: &[f64]) -> ChannelStats {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let sum_sq = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>();
    ChannelStats {
        mean,
        std_dev: (sum_sq / n).sqrt(),
    }
}

impl ChannelStats {
    fn zscore(&self, value: f64) -> f64 {
        (value - self.mean) / self.std_dev
    }
}

/// Rewrite every instrument's value on every channel — each own channel and
/// the label — to its cross-sectional z-score.
///
/// Returns the offending channel if any standard deviation is zero; the
/// caller skips the day, so partially rewritten values are never observed.
pub(crate) fn normalize_day(
    features: &mut BTreeMap<String, RawFeatures>,
    channels: &[ChannelId],
) -> Result<(), ChannelId> {
    for (index, &channel) in channels.iter().enumerate() {
        let column: Vec<f64> = features.values().map(|f| f.own[index]).collect();
        let stats = channel_stats(&column);
        if stats.std_dev == 0.0 {
            return Err(channel);
        }
        for f in features.values_mut() {
            f.own[index] = stats.zscore(f.own[index]);
        }
    }

    let labels: Vec<f64> = features.values().map(|f| f.label).collect();
    let stats = channel_stats(&labels);
    if stats.std_dev == 0.0 {
        return Err(ChannelId::NextDayChange);
    }
    for f in features.values_mut() {
        f.label = stats.zscore(f.label);
    }

    Ok(())
}
