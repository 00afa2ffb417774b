//! Slice health policy.
//!
//! Health is a function of the latest telemetry sample only. The prior status is accepted so
//! the signature reads like a transition, but it never influences the outcome: a sample that
//! arrives while a slice is still provisioning moves it to `active` or `degraded` all the same.

use crate::types::{AlertDraft, AlertSeverity, SliceStatus, TelemetrySample};
use serde::{Deserialize, Serialize};

pub const QOS_BREACH_TITLE: &str = "QoS breach";
pub const QOS_BREACH_DESCRIPTION: &str = "Packet loss or latency exceeded threshold.";

/// Thresholds above which a slice is considered degraded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HealthPolicy {
    /// Packet loss percentage; strictly greater breaches.
    pub max_packet_loss: f64,
    /// Latency in milliseconds; strictly greater breaches.
    pub max_latency_ms: f64,
}

impl Default for HealthPolicy {
    fn default() -> Self {
        Self {
            max_packet_loss: 2.0,
            max_latency_ms: 80.0,
        }
    }
}

/// Outcome of evaluating one sample.
#[derive(Debug, Clone, PartialEq)]
pub struct HealthDecision {
    pub status: SliceStatus,
    pub alert: Option<AlertDraft>,
}

impl HealthPolicy {
    pub fn breached(&self, sample: &TelemetrySample) -> bool {
        sample.packet_loss > self.max_packet_loss || sample.latency_ms > self.max_latency_ms
    }

    pub fn evaluate(
        &self,
        slice_id: &str,
        _current: SliceStatus,
        sample: &TelemetrySample,
    ) -> HealthDecision {
        if self.breached(sample) {
            HealthDecision {
                status: SliceStatus::Degraded,
                alert: Some(AlertDraft::new(
                    slice_id,
                    QOS_BREACH_TITLE,
                    QOS_BREACH_DESCRIPTION,
                    AlertSeverity::Critical,
                )),
            }
        } else {
            HealthDecision {
                status: SliceStatus::Active,
                alert: None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packet_loss_breach_degrades_with_critical_alert() {
        let policy = HealthPolicy::default();
        let decision = policy.evaluate(
            "slice-a",
            SliceStatus::Active,
            &TelemetrySample::new(100.0, 20.0, 3.0, 0.8),
        );
        assert_eq!(decision.status, SliceStatus::Degraded);
        let alert = decision.alert.unwrap();
        assert_eq!(alert.severity, AlertSeverity::Critical);
        assert_eq!(alert.title, QOS_BREACH_TITLE);
        assert_eq!(alert.slice_id.as_deref(), Some("slice-a"));
    }

    #[test]
    fn latency_breach_degrades() {
        let decision = HealthPolicy::default().evaluate(
            "slice-a",
            SliceStatus::Active,
            &TelemetrySample::new(100.0, 80.5, 0.0, 0.8),
        );
        assert_eq!(decision.status, SliceStatus::Degraded);
    }

    #[test]
    fn thresholds_are_exclusive() {
        let decision = HealthPolicy::default().evaluate(
            "slice-a",
            SliceStatus::Degraded,
            &TelemetrySample::new(100.0, 80.0, 2.0, 0.8),
        );
        assert_eq!(decision.status, SliceStatus::Active);
        assert!(decision.alert.is_none());
    }

    #[test]
    fn latest_sample_wins_over_any_prior_status() {
        let policy = HealthPolicy::default();
        let healthy = TelemetrySample::new(100.0, 50.0, 1.0, 0.8);
        for prior in [
            SliceStatus::Provisioning,
            SliceStatus::Active,
            SliceStatus::Degraded,
            SliceStatus::Error,
        ] {
            let decision = policy.evaluate("s", prior, &healthy);
            assert_eq!(decision.status, SliceStatus::Active);
            assert!(decision.alert.is_none());
        }
    }

    #[test]
    fn custom_thresholds_apply() {
        let policy = HealthPolicy {
            max_packet_loss: 0.5,
            max_latency_ms: 200.0,
        };
        assert!(policy.breached(&TelemetrySample::new(1.0, 150.0, 0.6, 0.5)));
        assert!(!policy.breached(&TelemetrySample::new(1.0, 150.0, 0.4, 0.5)));
    }
}
