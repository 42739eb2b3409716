//! Feature channels and the emitted per-instrument record.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of one feature channel.
///
/// Channel identity drives the layout of own/related vectors, CSV headers,
/// and degenerate-channel reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChannelId {
    /// Close-change ratio over a lookback horizon in trading days.
    PriceChange { horizon: usize },

    /// Raw volume on the current day.
    VolumeToday,

    /// Raw volume on the prior trading day.
    VolumePrior,

    /// The label: next-day close-change ratio.
    NextDayChange,
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelId::PriceChange { horizon } => write!(f, "price_change_{horizon}d"),
            ChannelId::VolumeToday => write!(f, "volume_today"),
            ChannelId::VolumePrior => write!(f, "volume_prior"),
            ChannelId::NextDayChange => write!(f, "next_day_change"),
        }
    }
}

/// Completed feature record for one instrument on one trading day.
///
/// `own` and `related` are parallel to the configured channel layout;
/// `related` holds the arithmetic mean of the instrument's co-present
/// related instruments, channel by channel. Immutable once emitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRecord {
    pub ticker: String,
    /// Trading-day ordinal the record belongs to.
    pub day: usize,
    pub date: NaiveDate,
    pub own: Vec<f64>,
    pub related: Vec<f64>,
    pub label: f64,
}

impl FeatureRecord {
    /// The flat input vector handed to the training collaborator:
    /// own channels followed by related channels, same channel order.
    pub fn feature_vector(&self) -> Vec<f64> {
        let mut v = Vec::with_capacity(self.own.len() + self.related.len());
        v.extend_from_slice(&self.own);
        v.extend_from_slice(&self.related);
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_names_are_stable() {
        assert_eq!(ChannelId::PriceChange { horizon: 5 }.to_string(), "price_change_5d");
        assert_eq!(ChannelId::VolumeToday.to_string(), "volume_today");
        assert_eq!(ChannelId::NextDayChange.to_string(), "next_day_change");
    }

    #[test]
    fn feature_vector_is_own_then_related() {
        let record = FeatureRecord {
            ticker: "A".into(),
            day: 3,
            date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            own: vec![1.0, 2.0],
            related: vec![3.0, 4.0],
            label: 0.5,
        };
        assert_eq!(record.feature_vector(), vec![1.0, 2.0, 3.0, 4.0]);
    }
}
