//! Controller adapters for slice provisioning.
//!
//! Three backend families back the three provisioning steps: a topology controller (ONOS), a
//! flow controller (OpenDaylight) and an orchestration system of record (ONAP). Each family
//! ships a simulated adapter for local runs and an HTTP adapter for real controllers.

#![deny(unsafe_code)]

pub mod http;
pub mod simulated;
pub mod testing;

pub use http::{
    HttpBackendConfig, OnapDescriptorClient, OnosTopologyClient, OpenDaylightFlowClient,
};
pub use simulated::{
    SimulatedFlowController, SimulatedOrchestrator, SimulatedTopologyController,
};
pub use testing::{AlwaysFailPort, RecordingPort, StalledPort};

use slice_core::{BackendPorts, PortError};
use std::sync::Arc;

/// Ports backed by in-process simulators with the reference controller latencies.
pub fn simulated_ports() -> BackendPorts {
    BackendPorts::new(
        Arc::new(SimulatedTopologyController::default()),
        Arc::new(SimulatedFlowController::default()),
        Arc::new(SimulatedOrchestrator::default()),
    )
}

/// Ports talking to real controllers over HTTP. One client is shared by all three.
pub fn http_ports(config: &HttpBackendConfig) -> Result<BackendPorts, PortError> {
    let client = config.build_client()?;
    Ok(BackendPorts::new(
        Arc::new(OnosTopologyClient::new(client.clone(), config)),
        Arc::new(OpenDaylightFlowClient::new(client.clone(), config)),
        Arc::new(OnapDescriptorClient::new(client, config)),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use slice_core::ProvisioningStep;

    #[test]
    fn simulated_ports_fill_every_step() {
        let ports = simulated_ports();
        assert!(ports.misassigned().is_empty());
        assert_eq!(ports.topology.step(), ProvisioningStep::ConfigureTopology);
        assert_eq!(ports.descriptor.backend(), "onap");
    }

    #[test]
    fn http_ports_fill_every_step() {
        let ports = http_ports(&HttpBackendConfig::default()).unwrap();
        assert!(ports.misassigned().is_empty());
        assert_eq!(ports.forwarding.backend(), "opendaylight");
    }
}
