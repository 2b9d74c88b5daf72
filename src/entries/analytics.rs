//! Pure aggregation over a goal window of weight entries.

use serde::Serialize;

/// Net-change classification with a ±0.5 kg dead band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Increasing,
    Decreasing,
    Stable,
}

pub fn classify_trend(net_change_kg: f64) -> Trend {
    if net_change_kg > 0.5 {
        Trend::Increasing
    } else if net_change_kg < -0.5 {
        Trend::Decreasing
    } else {
        Trend::Stable
    }
}

/// Percentage of the planned initial-to-target distance covered so far,
/// clamped to [0, 100]. Works for loss and gain goals alike since both
/// distances carry the same sign when moving the right way.
pub fn progress_percent(initial_kg: f64, current_kg: f64, target_kg: f64) -> f64 {
    let planned = initial_kg - target_kg;
    if planned.abs() < f64::EPSILON {
        // degenerate goal: already at target when it was opened
        return 100.0;
    }
    let covered = initial_kg - current_kg;
    (covered / planned * 100.0).clamp(0.0, 100.0)
}

/// Summary over entries ordered oldest to newest.
#[derive(Debug, Clone, Serialize)]
pub struct WeightSummary {
    pub count: usize,
    pub first_weight_kg: f64,
    pub latest_weight_kg: f64,
    pub average_weight_kg: f64,
    pub net_change_kg: f64,
    pub trend: Trend,
}

pub fn summarize(weights_asc: &[f64]) -> Option<WeightSummary> {
    let (first, latest) = (*weights_asc.first()?, *weights_asc.last()?);
    let count = weights_asc.len();
    let average = weights_asc.iter().sum::<f64>() / count as f64;
    let net_change = latest - first;
    Some(WeightSummary {
        count,
        first_weight_kg: first,
        latest_weight_kg: latest,
        average_weight_kg: average,
        net_change_kg: net_change,
        trend: classify_trend(net_change),
    })
}
