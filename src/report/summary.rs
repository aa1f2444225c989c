use std::collections::BTreeMap;

use serde::Serialize;

use crate::combat::TrialOutcome;

/// Aggregate view of a batch of outcomes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    pub runs: usize,
    pub total_wounds: u64,
    pub mean: f64,
    pub min: u32,
    pub max: u32,
    /// Trials per wound count. Only counts that occurred are present, so the
    /// size is bounded by `runs` rather than by `max`.
    pub histogram: BTreeMap<u32, u32>,
}

impl BatchSummary {
    pub fn from_outcomes(outcomes: &[TrialOutcome]) -> Self {
        let (Some(&min), Some(&max)) = (outcomes.iter().min(), outcomes.iter().max()) else {
            return Self {
                runs: 0,
                total_wounds: 0,
                mean: 0.0,
                min: 0,
                max: 0,
                histogram: BTreeMap::new(),
            };
        };

        let total_wounds: u64 = outcomes.iter().map(|&w| u64::from(w)).sum();
        let mut histogram = BTreeMap::new();
        for &wounds in outcomes {
            *histogram.entry(wounds).or_insert(0) += 1;
        }

        Self {
            runs: outcomes.len(),
            total_wounds,
            mean: total_wounds as f64 / outcomes.len() as f64,
            min,
            max,
            histogram,
        }
    }
}
