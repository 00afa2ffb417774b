//! In-process controller simulators.
//!
//! They never fail and answer after a fixed latency, which keeps local runs and demos free of
//! external controllers while still exercising the concurrent fan-out.

use async_trait::async_trait;
use slice_core::{PortError, PortReceipt, ProvisioningPort, ProvisioningStep, SliceDescriptor};
use std::time::Duration;
use tracing::debug;

/// Simulated ONOS topology controller.
#[derive(Debug, Clone)]
pub struct SimulatedTopologyController {
    latency: Duration,
}

impl SimulatedTopologyController {
    pub fn with_latency(latency: Duration) -> Self {
        Self { latency }
    }
}

impl Default for SimulatedTopologyController {
    fn default() -> Self {
        Self::with_latency(Duration::from_millis(100))
    }
}

#[async_trait]
impl ProvisioningPort for SimulatedTopologyController {
    fn backend(&self) -> &'static str {
        "onos"
    }

    fn step(&self) -> ProvisioningStep {
        ProvisioningStep::ConfigureTopology
    }

    async fn provision(&self, descriptor: &SliceDescriptor) -> Result<PortReceipt, PortError> {
        tokio::time::sleep(self.latency).await;
        debug!(
            slice_id = %descriptor.id,
            devices = descriptor.devices.len(),
            "simulated topology configured"
        );
        Ok(PortReceipt::new(self.backend(), descriptor.id.clone(), "configured")
            .with_metadata("devices", descriptor.devices.len().to_string())
            .with_metadata("qos_class", descriptor.qos_class.as_str()))
    }
}

/// Simulated OpenDaylight flow controller.
#[derive(Debug, Clone)]
pub struct SimulatedFlowController {
    latency: Duration,
}

impl SimulatedFlowController {
    pub fn with_latency(latency: Duration) -> Self {
        Self { latency }
    }
}

impl Default for SimulatedFlowController {
    fn default() -> Self {
        Self::with_latency(Duration::from_millis(100))
    }
}

#[async_trait]
impl ProvisioningPort for SimulatedFlowController {
    fn backend(&self) -> &'static str {
        "opendaylight"
    }

    fn step(&self) -> ProvisioningStep {
        ProvisioningStep::InstallForwardingRules
    }

    async fn provision(&self, descriptor: &SliceDescriptor) -> Result<PortReceipt, PortError> {
        tokio::time::sleep(self.latency).await;
        let rules = crate::http::forwarding_rules(descriptor);
        Ok(PortReceipt::new(self.backend(), descriptor.id.clone(), "rules-installed")
            .with_metadata("match", rules.match_on)
            .with_metadata("action", rules.action))
    }
}

/// Simulated ONAP orchestration system of record.
#[derive(Debug, Clone)]
pub struct SimulatedOrchestrator {
    latency: Duration,
}

impl SimulatedOrchestrator {
    pub fn with_latency(latency: Duration) -> Self {
        Self { latency }
    }
}

impl Default for SimulatedOrchestrator {
    fn default() -> Self {
        Self::with_latency(Duration::from_millis(200))
    }
}

#[async_trait]
impl ProvisioningPort for SimulatedOrchestrator {
    fn backend(&self) -> &'static str {
        "onap"
    }

    fn step(&self) -> ProvisioningStep {
        ProvisioningStep::InstantiateDescriptor
    }

    async fn provision(&self, descriptor: &SliceDescriptor) -> Result<PortReceipt, PortError> {
        tokio::time::sleep(self.latency).await;
        Ok(PortReceipt::new(
            self.backend(),
            descriptor.id.clone(),
            "instantiated",
        ))
    }
}
