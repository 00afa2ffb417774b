//! Slice creation protocol and request routing.
//!
//! Creation registers the slice first, then fans out to all three backend ports concurrently.
//! The join is fail-fast: the first failed or timed-out port aborts the request and the slice
//! stays visible in `provisioning` for an operator to reconcile.

use crate::error::SliceError;
use crate::ports::{BackendPorts, PortReceipt, ProvisioningPort};
use crate::registry::{MetricOutcome, SliceRegistry};
use crate::types::{
    Alert, AlertSeverity, CreateSliceRequest, Slice, SliceDescriptor, SliceStatus,
    TelemetrySample,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument, warn};
use uuid::Uuid;

const ID_SUFFIX_LEN: usize = 6;
const MAX_ID_ATTEMPTS: usize = 8;

#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Upper bound for each individual backend call.
    pub backend_timeout: Duration,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            backend_timeout: Duration::from_secs(10),
        }
    }
}

pub struct SliceOrchestrator {
    registry: Arc<SliceRegistry>,
    ports: BackendPorts,
    config: OrchestratorConfig,
}

impl SliceOrchestrator {
    pub fn new(
        registry: Arc<SliceRegistry>,
        ports: BackendPorts,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            registry,
            ports,
            config,
        }
    }

    pub fn registry(&self) -> &Arc<SliceRegistry> {
        &self.registry
    }

    #[instrument(skip(self, request), fields(name = %request.name, tenant = %request.tenant))]
    pub async fn create_slice(&self, request: CreateSliceRequest) -> Result<Slice, SliceError> {
        let slice = self.register_provisioning(request).await?;
        let descriptor = slice.descriptor();

        let (topology, forwarding, instantiated) = tokio::try_join!(
            self.call_port(&self.ports.topology, &descriptor),
            self.call_port(&self.ports.forwarding, &descriptor),
            self.call_port(&self.ports.descriptor, &descriptor),
        )
        .inspect_err(|err| {
            warn!(
                slice_id = %descriptor.id,
                error = %err,
                "slice provisioning failed; slice left in provisioning"
            );
        })?;

        let slice = self
            .registry
            .set_status(&descriptor.id, SliceStatus::Active)
            .await?;
        info!(
            slice_id = %slice.id,
            topology = %topology.state,
            forwarding = %forwarding.state,
            descriptor = %instantiated.state,
            "slice provisioned"
        );
        Ok(slice)
    }

    pub async fn ingest_metric(&self, slice_id: &str, sample: TelemetrySample) -> MetricOutcome {
        self.registry.append_metric(slice_id, sample).await
    }

    pub async fn get_slice(&self, slice_id: &str) -> Result<Slice, SliceError> {
        self.registry
            .get(slice_id)
            .await
            .ok_or_else(|| SliceError::SliceNotFound(slice_id.to_string()))
    }

    pub async fn list_slices(&self) -> Vec<Slice> {
        self.registry.list().await
    }

    pub async fn add_device(&self, slice_id: &str, device_id: String) -> Result<Slice, SliceError> {
        self.registry.add_device(slice_id, device_id).await
    }

    pub async fn create_alert(
        &self,
        slice_id: &str,
        title: String,
        description: String,
        severity: AlertSeverity,
    ) -> Result<Alert, SliceError> {
        self.registry
            .create_alert(slice_id, title, description, severity)
            .await
    }

    pub async fn resolve_alert(&self, alert_id: &str) -> bool {
        self.registry.resolve_alert(alert_id).await
    }

    pub async fn list_alerts(&self) -> Vec<Alert> {
        self.registry.list_alerts().await
    }

    pub async fn list_alerts_for_slice(&self, slice_id: &str) -> Result<Vec<Alert>, SliceError> {
        if !self.registry.contains(slice_id).await {
            return Err(SliceError::SliceNotFound(slice_id.to_string()));
        }
        Ok(self.registry.list_alerts_for_slice(slice_id).await)
    }

    async fn register_provisioning(
        &self,
        request: CreateSliceRequest,
    ) -> Result<Slice, SliceError> {
        let CreateSliceRequest {
            name,
            tenant,
            qos_class,
            devices,
        } = request;

        let mut last_err = None;
        for _ in 0..MAX_ID_ATTEMPTS {
            let slice = Slice::provisioning(
                generate_slice_id(&name),
                name.clone(),
                tenant.clone(),
                qos_class,
                devices.clone(),
            );
            match self.registry.insert(slice.clone()).await {
                Ok(()) => return Ok(slice),
                Err(err @ SliceError::DuplicateSlice(_)) => last_err = Some(err),
                Err(err) => return Err(err),
            }
        }
        Err(last_err.unwrap_or_else(|| SliceError::DuplicateSlice(slugify(&name))))
    }

    #[instrument(
        skip_all,
        fields(slice_id = %descriptor.id, step = %port.step(), backend = port.backend())
    )]
    async fn call_port(
        &self,
        port: &Arc<dyn ProvisioningPort>,
        descriptor: &SliceDescriptor,
    ) -> Result<PortReceipt, SliceError> {
        let timeout = self.config.backend_timeout;
        match tokio::time::timeout(timeout, port.provision(descriptor)).await {
            Ok(Ok(receipt)) => Ok(receipt),
            Ok(Err(err)) => Err(SliceError::BackendProvisioning {
                step: port.step(),
                backend: port.backend().to_string(),
                message: err.to_string(),
            }),
            Err(_) => Err(SliceError::BackendTimeout {
                step: port.step(),
                backend: port.backend().to_string(),
                timeout_ms: timeout.as_millis() as u64,
            }),
        }
    }
}

/// Lower-cases the name and replaces spaces with hyphens.
pub fn slugify(name: &str) -> String {
    name.to_lowercase().replace(' ', "-")
}

/// `<slug>-<6 hex chars>`, e.g. `city-cctv-slice-3fa91c`.
pub fn generate_slice_id(name: &str) -> String {
    let token = Uuid::new_v4().simple().to_string();
    format!("{}-{}", slugify(name), &token[..ID_SUFFIX_LEN])
}
