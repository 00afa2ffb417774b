//! In-memory slice and alert store.
//!
//! All state sits behind a single `RwLock`: every mutation holds the write guard for its whole
//! read-modify-write, and reads hand out owned snapshots.

use crate::error::SliceError;
use crate::health::HealthPolicy;
use crate::types::{Alert, AlertDraft, AlertSeverity, Slice, SliceStatus, TelemetrySample};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, warn};

pub const UNKNOWN_SLICE_METRIC_TITLE: &str = "Metric Received for Unknown Slice";
pub const UNKNOWN_SLICE_METRIC_DESCRIPTION: &str =
    "A metric payload was received for a slice that does not exist.";

#[derive(Debug, Default)]
struct RegistryState {
    /// Insertion order. Slices are never removed, so indices stay valid.
    slices: Vec<Slice>,
    index: HashMap<String, usize>,
    alerts: Vec<Alert>,
}

impl RegistryState {
    fn slice_mut(&mut self, id: &str) -> Option<&mut Slice> {
        let position = *self.index.get(id)?;
        self.slices.get_mut(position)
    }

    fn slice(&self, id: &str) -> Option<&Slice> {
        let position = *self.index.get(id)?;
        self.slices.get(position)
    }

    fn push_alert(&mut self, draft: AlertDraft) -> Alert {
        let alert = Alert::from_draft(draft);
        self.alerts.push(alert.clone());
        alert
    }
}

/// What happened to an ingested sample.
#[derive(Debug, Clone, PartialEq)]
pub enum MetricOutcome {
    /// Sample stored and health re-evaluated.
    Applied {
        status: SliceStatus,
        alert: Option<Alert>,
    },
    /// No such slice; a warning alert was recorded instead.
    Orphaned { alert: Alert },
}

/// Exclusive owner of slice and alert state.
#[derive(Debug, Default)]
pub struct SliceRegistry {
    state: RwLock<RegistryState>,
    policy: HealthPolicy,
}

impl SliceRegistry {
    pub fn new(policy: HealthPolicy) -> Self {
        Self {
            state: RwLock::new(RegistryState::default()),
            policy,
        }
    }

    pub async fn insert(&self, slice: Slice) -> Result<(), SliceError> {
        let mut state = self.state.write().await;
        if state.index.contains_key(&slice.id) {
            return Err(SliceError::DuplicateSlice(slice.id));
        }
        let position = state.slices.len();
        state.index.insert(slice.id.clone(), position);
        state.slices.push(slice);
        Ok(())
    }

    pub async fn contains(&self, id: &str) -> bool {
        self.state.read().await.index.contains_key(id)
    }

    pub async fn get(&self, id: &str) -> Option<Slice> {
        self.state.read().await.slice(id).cloned()
    }

    pub async fn list(&self) -> Vec<Slice> {
        self.state.read().await.slices.clone()
    }

    pub async fn slice_ids(&self) -> Vec<String> {
        self.state
            .read()
            .await
            .slices
            .iter()
            .map(|slice| slice.id.clone())
            .collect()
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.slices.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub async fn set_status(&self, id: &str, status: SliceStatus) -> Result<Slice, SliceError> {
        let mut state = self.state.write().await;
        let slice = state
            .slice_mut(id)
            .ok_or_else(|| SliceError::SliceNotFound(id.to_string()))?;
        slice.status = status;
        Ok(slice.clone())
    }

    /// Record a sample and re-evaluate health from it.
    ///
    /// Unknown ids never fail: they produce a warning alert carrying the unknown id.
    pub async fn append_metric(&self, id: &str, sample: TelemetrySample) -> MetricOutcome {
        let mut state = self.state.write().await;

        let Some(slice) = state.slice_mut(id) else {
            warn!(slice_id = %id, "metric received for unknown slice");
            let alert = state.push_alert(AlertDraft::new(
                id,
                UNKNOWN_SLICE_METRIC_TITLE,
                UNKNOWN_SLICE_METRIC_DESCRIPTION,
                AlertSeverity::Warning,
            ));
            return MetricOutcome::Orphaned { alert };
        };

        let decision = self.policy.evaluate(&slice.id, slice.status, &sample);
        let evicted = slice.metrics.push(sample);
        let previous = slice.status;
        slice.status = decision.status;

        if previous != decision.status {
            debug!(
                slice_id = %id,
                from = %previous,
                to = %decision.status,
                evicted,
                "slice status changed"
            );
        }

        let alert = decision.alert.map(|draft| {
            warn!(slice_id = %id, title = %draft.title, "slice health breach");
            state.push_alert(draft)
        });

        MetricOutcome::Applied {
            status: decision.status,
            alert,
        }
    }

    pub async fn add_device(&self, id: &str, device_id: String) -> Result<Slice, SliceError> {
        let mut state = self.state.write().await;
        let slice = state
            .slice_mut(id)
            .ok_or_else(|| SliceError::SliceNotFound(id.to_string()))?;
        if !slice.attach_device(device_id) {
            debug!(slice_id = %id, "device already attached");
        }
        Ok(slice.clone())
    }

    pub async fn create_alert(
        &self,
        slice_id: &str,
        title: impl Into<String>,
        description: impl Into<String>,
        severity: AlertSeverity,
    ) -> Result<Alert, SliceError> {
        let mut state = self.state.write().await;
        if state.slice(slice_id).is_none() {
            return Err(SliceError::SliceNotFound(slice_id.to_string()));
        }
        Ok(state.push_alert(AlertDraft::new(slice_id, title, description, severity)))
    }

    /// Deletes the alert if present. Returns whether anything was removed.
    pub async fn resolve_alert(&self, alert_id: &str) -> bool {
        let mut state = self.state.write().await;
        let before = state.alerts.len();
        state.alerts.retain(|alert| alert.id != alert_id);
        state.alerts.len() != before
    }

    pub async fn list_alerts(&self) -> Vec<Alert> {
        self.state.read().await.alerts.clone()
    }

    pub async fn list_alerts_for_slice(&self, slice_id: &str) -> Vec<Alert> {
        self.state
            .read()
            .await
            .alerts
            .iter()
            .filter(|alert| alert.slice_id.as_deref() == Some(slice_id))
            .cloned()
            .collect()
    }
}
