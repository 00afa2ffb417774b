//! Network slice lifecycle core.
//!
//! This crate owns slice and alert state, evaluates slice health from the latest telemetry
//! sample, and provisions new slices across three independent controller backends.

#![deny(unsafe_code)]

pub mod error;
pub mod health;
pub mod history;
pub mod orchestrator;
pub mod ports;
pub mod registry;
pub mod types;

pub use error::SliceError;
pub use health::{HealthDecision, HealthPolicy};
pub use history::{TelemetryHistory, TELEMETRY_CAPACITY};
pub use orchestrator::{OrchestratorConfig, SliceOrchestrator};
pub use ports::{BackendPorts, PortError, PortReceipt, ProvisioningPort, ProvisioningStep};
pub use registry::{MetricOutcome, SliceRegistry};
pub use types::{
    Alert, AlertDraft, AlertSeverity, CreateSliceRequest, QosClass, Slice, SliceDescriptor,
    SliceStatus, TelemetrySample,
};
