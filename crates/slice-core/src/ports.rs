use crate::types::SliceDescriptor;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// The three provisioning operations a slice needs before it can go active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProvisioningStep {
    ConfigureTopology,
    InstallForwardingRules,
    InstantiateDescriptor,
}

impl ProvisioningStep {
    pub const ALL: [ProvisioningStep; 3] = [
        ProvisioningStep::ConfigureTopology,
        ProvisioningStep::InstallForwardingRules,
        ProvisioningStep::InstantiateDescriptor,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ConfigureTopology => "configure-topology",
            Self::InstallForwardingRules => "install-forwarding-rules",
            Self::InstantiateDescriptor => "instantiate-descriptor",
        }
    }
}

impl fmt::Display for ProvisioningStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Acknowledgement returned by a backend after a successful provisioning call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortReceipt {
    pub backend: String,
    pub slice_id: String,
    pub state: String,
    pub completed_at: DateTime<Utc>,
    pub metadata: BTreeMap<String, String>,
}

impl PortReceipt {
    pub fn new(
        backend: impl Into<String>,
        slice_id: impl Into<String>,
        state: impl Into<String>,
    ) -> Self {
        Self {
            backend: backend.into(),
            slice_id: slice_id.into(),
            state: state.into(),
            completed_at: Utc::now(),
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// Backend-specific failure. The orchestrator treats every variant as a failed step.
#[derive(Debug, Error)]
pub enum PortError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("backend rejected request with status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("backend unavailable: {0}")]
    Unavailable(String),
}

/// One backend controller capability.
///
/// Each implementation performs exactly one [`ProvisioningStep`] and maps the slice descriptor
/// onto its own wire payload.
#[async_trait]
pub trait ProvisioningPort: Send + Sync {
    /// Backend name used in logs and error reports.
    fn backend(&self) -> &'static str;

    fn step(&self) -> ProvisioningStep;

    async fn provision(&self, descriptor: &SliceDescriptor) -> Result<PortReceipt, PortError>;
}

/// Fixed set of ports the orchestrator fans out to, one per step.
#[derive(Clone)]
pub struct BackendPorts {
    pub topology: Arc<dyn ProvisioningPort>,
    pub forwarding: Arc<dyn ProvisioningPort>,
    pub descriptor: Arc<dyn ProvisioningPort>,
}

impl BackendPorts {
    pub fn new(
        topology: Arc<dyn ProvisioningPort>,
        forwarding: Arc<dyn ProvisioningPort>,
        descriptor: Arc<dyn ProvisioningPort>,
    ) -> Self {
        Self {
            topology,
            forwarding,
            descriptor,
        }
    }

    /// Ports whose declared step does not match the slot they were wired into.
    pub fn misassigned(&self) -> Vec<(ProvisioningStep, &'static str)> {
        [
            (ProvisioningStep::ConfigureTopology, &self.topology),
            (ProvisioningStep::InstallForwardingRules, &self.forwarding),
            (ProvisioningStep::InstantiateDescriptor, &self.descriptor),
        ]
        .into_iter()
        .filter(|(slot, port)| port.step() != *slot)
        .map(|(slot, port)| (slot, port.backend()))
        .collect()
    }
}

impl fmt::Debug for BackendPorts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendPorts")
            .field("topology", &self.topology.backend())
            .field("forwarding", &self.forwarding.backend())
            .field("descriptor", &self.descriptor.backend())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct DummyPort(ProvisioningStep);

    #[async_trait]
    impl ProvisioningPort for DummyPort {
        fn backend(&self) -> &'static str {
            "dummy"
        }

        fn step(&self) -> ProvisioningStep {
            self.0
        }

        async fn provision(&self, descriptor: &SliceDescriptor) -> Result<PortReceipt, PortError> {
            Ok(PortReceipt::new("dummy", descriptor.id.clone(), "ok"))
        }
    }

    #[test]
    fn misassigned_ports_are_reported() {
        let ports = BackendPorts::new(
            Arc::new(DummyPort(ProvisioningStep::ConfigureTopology)),
            Arc::new(DummyPort(ProvisioningStep::InstantiateDescriptor)),
            Arc::new(DummyPort(ProvisioningStep::InstantiateDescriptor)),
        );
        assert_eq!(
            ports.misassigned(),
            vec![(ProvisioningStep::InstallForwardingRules, "dummy")]
        );
    }

    #[test]
    fn step_labels_are_kebab_case() {
        let labels: Vec<&str> = ProvisioningStep::ALL.iter().map(|s| s.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "configure-topology",
                "install-forwarding-rules",
                "instantiate-descriptor"
            ]
        );
        assert_eq!(
            serde_json::to_value(ProvisioningStep::ConfigureTopology).unwrap(),
            "configure-topology"
        );
    }
}
