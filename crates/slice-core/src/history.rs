//! Bounded telemetry history.
//!
//! A fixed-capacity FIFO ring: pushing past capacity evicts the oldest sample in O(1).

use crate::types::TelemetrySample;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Maximum number of samples retained per slice.
pub const TELEMETRY_CAPACITY: usize = 50;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<TelemetrySample>", into = "Vec<TelemetrySample>")]
pub struct TelemetryHistory {
    samples: VecDeque<TelemetrySample>,
}

impl TelemetryHistory {
    pub fn new() -> Self {
        Self {
            samples: VecDeque::with_capacity(TELEMETRY_CAPACITY),
        }
    }

    /// Append a sample, evicting from the front until within capacity.
    /// Returns the number of evicted samples.
    pub fn push(&mut self, sample: TelemetrySample) -> usize {
        self.samples.push_back(sample);
        let mut evicted = 0;
        while self.samples.len() > TELEMETRY_CAPACITY {
            self.samples.pop_front();
            evicted += 1;
        }
        evicted
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &TelemetrySample> {
        self.samples.iter()
    }
}

impl Default for TelemetryHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Vec<TelemetrySample>> for TelemetryHistory {
    fn from(samples: Vec<TelemetrySample>) -> Self {
        let mut history = Self::new();
        for sample in samples {
            history.push(sample);
        }
        history
    }
}

impl From<TelemetryHistory> for Vec<TelemetrySample> {
    fn from(history: TelemetryHistory) -> Self {
        history.samples.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sample(seq: usize) -> TelemetrySample {
        TelemetrySample::new(seq as f64, 10.0, 0.0, 0.9)
    }

    #[test]
    fn push_under_capacity_keeps_everything() {
        let mut history = TelemetryHistory::new();
        for seq in 0..10 {
            assert_eq!(history.push(sample(seq)), 0);
        }
        assert_eq!(history.len(), 10);
        assert_eq!(history.iter().last().unwrap().throughput_mbps, 9.0);
    }

    #[test]
    fn fifty_first_sample_evicts_oldest() {
        let mut history = TelemetryHistory::new();
        for seq in 0..TELEMETRY_CAPACITY {
            history.push(sample(seq));
        }
        assert_eq!(history.push(sample(TELEMETRY_CAPACITY)), 1);
        assert_eq!(history.len(), TELEMETRY_CAPACITY);
        assert_eq!(history.iter().next().unwrap().throughput_mbps, 1.0);
    }

    #[test]
    fn deserializing_oversized_history_trims_to_capacity() {
        let samples: Vec<TelemetrySample> = (0..70).map(sample).collect();
        let json = serde_json::to_value(&samples).unwrap();
        let history: TelemetryHistory = serde_json::from_value(json).unwrap();
        assert_eq!(history.len(), TELEMETRY_CAPACITY);
        assert_eq!(history.iter().next().unwrap().throughput_mbps, 20.0);
    }

    proptest! {
        #[test]
        fn retains_most_recent_samples_in_order(count in 0usize..200) {
            let mut history = TelemetryHistory::new();
            for seq in 0..count {
                history.push(sample(seq));
            }

            let retained: Vec<f64> = history.iter().map(|s| s.throughput_mbps).collect();
            let start = count.saturating_sub(TELEMETRY_CAPACITY);
            let expected: Vec<f64> = (start..count).map(|seq| seq as f64).collect();

            prop_assert_eq!(history.len(), count.min(TELEMETRY_CAPACITY));
            prop_assert_eq!(retained, expected);
        }
    }
}
