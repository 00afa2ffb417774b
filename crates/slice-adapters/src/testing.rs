//! Deterministic ports for failure-injection and call-recording tests.

use async_trait::async_trait;
use slice_core::{PortError, PortReceipt, ProvisioningPort, ProvisioningStep, SliceDescriptor};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Port that fails every call with the configured reason.
#[derive(Debug, Clone)]
pub struct AlwaysFailPort {
    step: ProvisioningStep,
    reason: String,
}

impl AlwaysFailPort {
    pub fn new(step: ProvisioningStep, reason: impl Into<String>) -> Self {
        Self {
            step,
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl ProvisioningPort for AlwaysFailPort {
    fn backend(&self) -> &'static str {
        "always-fail"
    }

    fn step(&self) -> ProvisioningStep {
        self.step
    }

    async fn provision(&self, _descriptor: &SliceDescriptor) -> Result<PortReceipt, PortError> {
        Err(PortError::Unavailable(self.reason.clone()))
    }
}

/// Port that never answers within any reasonable timeout.
#[derive(Debug, Clone)]
pub struct StalledPort {
    step: ProvisioningStep,
}

impl StalledPort {
    pub fn new(step: ProvisioningStep) -> Self {
        Self { step }
    }
}

#[async_trait]
impl ProvisioningPort for StalledPort {
    fn backend(&self) -> &'static str {
        "stalled"
    }

    fn step(&self) -> ProvisioningStep {
        self.step
    }

    async fn provision(&self, descriptor: &SliceDescriptor) -> Result<PortReceipt, PortError> {
        tokio::time::sleep(Duration::from_secs(24 * 60 * 60)).await;
        Ok(PortReceipt::new(self.backend(), descriptor.id.clone(), "late"))
    }
}

/// Port that succeeds and remembers every descriptor it was handed.
#[derive(Debug)]
pub struct RecordingPort {
    step: ProvisioningStep,
    calls: AtomicUsize,
    seen: Mutex<Vec<SliceDescriptor>>,
}

impl RecordingPort {
    pub fn new(step: ProvisioningStep) -> Self {
        Self {
            step,
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn descriptors(&self) -> Vec<SliceDescriptor> {
        self.seen
            .lock()
            .map(|seen| seen.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ProvisioningPort for RecordingPort {
    fn backend(&self) -> &'static str {
        "recording"
    }

    fn step(&self) -> ProvisioningStep {
        self.step
    }

    async fn provision(&self, descriptor: &SliceDescriptor) -> Result<PortReceipt, PortError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(descriptor.clone());
        }
        Ok(PortReceipt::new(self.backend(), descriptor.id.clone(), "recorded"))
    }
}
