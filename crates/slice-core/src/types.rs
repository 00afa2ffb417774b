use crate::history::TelemetryHistory;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Service tier attached to a slice. Informational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QosClass {
    Gold,
    Silver,
    Bronze,
}

impl QosClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gold => "gold",
            Self::Silver => "silver",
            Self::Bronze => "bronze",
        }
    }
}

impl fmt::Display for QosClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle and health status of a slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SliceStatus {
    Provisioning,
    Active,
    Degraded,
    Error,
}

impl SliceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Provisioning => "provisioning",
            Self::Active => "active",
            Self::Degraded => "degraded",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for SliceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Info,
    Warning,
    Critical,
}

impl fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Critical => "critical",
        };
        f.write_str(label)
    }
}

/// One telemetry observation for a slice.
///
/// `timestamp` defaults to the moment the sample is deserialized, which is ingestion time for
/// samples arriving over the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySample {
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
    pub throughput_mbps: f64,
    pub latency_ms: f64,
    /// Percentage, 0..100.
    pub packet_loss: f64,
    /// 0.0..1.0.
    pub energy_score: f64,
}

impl TelemetrySample {
    pub fn new(throughput_mbps: f64, latency_ms: f64, packet_loss: f64, energy_score: f64) -> Self {
        Self {
            timestamp: Utc::now(),
            throughput_mbps,
            latency_ms,
            packet_loss,
            energy_score,
        }
    }
}

/// A logical partition of shared infrastructure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slice {
    pub id: String,
    pub name: String,
    pub tenant: String,
    pub qos_class: QosClass,
    pub status: SliceStatus,
    pub devices: Vec<String>,
    pub metrics: TelemetryHistory,
}

impl Slice {
    /// Build a slice in `provisioning` status. Duplicate device ids are collapsed, first
    /// occurrence wins.
    pub fn provisioning(
        id: impl Into<String>,
        name: impl Into<String>,
        tenant: impl Into<String>,
        qos_class: QosClass,
        devices: Vec<String>,
    ) -> Self {
        let mut slice = Self {
            id: id.into(),
            name: name.into(),
            tenant: tenant.into(),
            qos_class,
            status: SliceStatus::Provisioning,
            devices: Vec::with_capacity(devices.len()),
            metrics: TelemetryHistory::new(),
        };
        for device in devices {
            slice.attach_device(device);
        }
        slice
    }

    /// Appends `device_id` unless already attached. Returns whether the list changed.
    pub fn attach_device(&mut self, device_id: String) -> bool {
        if self.devices.contains(&device_id) {
            return false;
        }
        self.devices.push(device_id);
        true
    }

    pub fn descriptor(&self) -> SliceDescriptor {
        SliceDescriptor {
            id: self.id.clone(),
            name: self.name.clone(),
            tenant: self.tenant.clone(),
            qos_class: self.qos_class,
            status: self.status,
            devices: self.devices.clone(),
        }
    }
}

/// Payload handed to backend controllers when provisioning a slice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SliceDescriptor {
    pub id: String,
    pub name: String,
    pub tenant: String,
    pub qos_class: QosClass,
    pub status: SliceStatus,
    pub devices: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateSliceRequest {
    pub name: String,
    pub tenant: String,
    pub qos_class: QosClass,
    #[serde(default)]
    pub devices: Vec<String>,
}

impl CreateSliceRequest {
    pub fn new(name: impl Into<String>, tenant: impl Into<String>, qos_class: QosClass) -> Self {
        Self {
            name: name.into(),
            tenant: tenant.into(),
            qos_class,
            devices: Vec::new(),
        }
    }

    pub fn with_devices<I, S>(mut self, devices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.devices = devices.into_iter().map(Into::into).collect();
        self
    }
}

/// Operational alert. `slice_id` may reference a slice that was never registered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: String,
    pub slice_id: Option<String>,
    pub title: String,
    pub description: String,
    pub severity: AlertSeverity,
    pub created_at: DateTime<Utc>,
}

impl Alert {
    pub fn from_draft(draft: AlertDraft) -> Self {
        Self {
            id: Uuid::new_v4().simple().to_string(),
            slice_id: draft.slice_id,
            title: draft.title,
            description: draft.description,
            severity: draft.severity,
            created_at: Utc::now(),
        }
    }
}

/// Alert contents before an id and timestamp are assigned.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertDraft {
    pub slice_id: Option<String>,
    pub title: String,
    pub description: String,
    pub severity: AlertSeverity,
}

impl AlertDraft {
    pub fn new(
        slice_id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        severity: AlertSeverity,
    ) -> Self {
        Self {
            slice_id: Some(slice_id.into()),
            title: title.into(),
            description: description.into(),
            severity,
        }
    }
}
