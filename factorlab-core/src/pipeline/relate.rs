//! Relation aggregation — averaging normalized channels across an
//! instrument's related instruments present on the same day.

use super::window::RawFeatures;
use crate::domain::RelationGraph;
use std::collections::BTreeMap;

/// Per-channel arithmetic mean of the normalized own-channel values across
/// the instrument's related instruments present in `features`.
///
/// Returns `None` when the intersection of the related set with the day's
/// instruments is empty: such an instrument cannot produce a complete
/// feature vector and is dropped from the day's output rather than padded
/// with a sentinel. The label is never aggregated.
pub(crate) fn related_averages(
    ticker: &str,
    features: &BTreeMap<String, RawFeatures>,
    relations: &RelationGraph,
) -> Option<Vec<f64>> {
    let related = relations.related(ticker)?;
    let present: Vec<&RawFeatures> = related
        .iter()
        .filter_map(|other| features.get(other))
        .collect();
    if present.is_empty() {
        return None;
    }

    let width = features[ticker].own.len();
    let count = present.len() as f64;
    let mut averages = Vec::with_capacity(width);
    for index in 0..width {
        let sum: f64 = present.iter().map(|f| f.own[index]).sum();
        averages.push(sum / count);
    }
    Some(averages)
}
