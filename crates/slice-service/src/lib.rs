#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod handlers;
pub mod simulator;

use axum::routing::{get, post};
use axum::Router;
use config::{BackendMode, Settings};
use error::ServiceError;
use slice_adapters::{http_ports, simulated_ports};
use slice_core::{
    BackendPorts, CreateSliceRequest, HealthPolicy, OrchestratorConfig, QosClass, Slice,
    SliceOrchestrator, SliceRegistry,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

pub use config::ConfigError;
pub use error::{ApiError, ApiResult};
pub use simulator::MetricSimulator;

#[derive(Clone)]
pub struct ServiceState {
    pub orchestrator: Arc<SliceOrchestrator>,
}

impl ServiceState {
    /// Wire the registry and backend adapters selected by `settings`.
    pub fn bootstrap(settings: &Settings) -> Result<Self, ServiceError> {
        settings.validate()?;
        let ports = match settings.backend_mode {
            BackendMode::Simulated => simulated_ports(),
            BackendMode::Http => http_ports(&settings.http_backend_config())?,
        };
        Ok(Self::with_ports(
            ports,
            settings.health_policy(),
            settings.orchestrator_config(),
        ))
    }

    pub fn with_ports(
        ports: BackendPorts,
        policy: HealthPolicy,
        config: OrchestratorConfig,
    ) -> Self {
        for (slot, backend) in ports.misassigned() {
            warn!(%slot, backend, "backend port wired into a slot for a different step");
        }
        let registry = Arc::new(SliceRegistry::new(policy));
        Self {
            orchestrator: Arc::new(SliceOrchestrator::new(registry, ports, config)),
        }
    }
}

pub fn build_router(state: ServiceState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/slices", get(handlers::list_slices).post(handlers::create_slice))
        .route("/slices/:id", get(handlers::get_slice))
        .route("/slices/:id/metrics", post(handlers::ingest_metric))
        .route(
            "/slices/:id/alerts",
            get(handlers::list_slice_alerts).post(handlers::create_alert),
        )
        .route("/slices/:id/devices", post(handlers::add_device))
        .route("/alerts", get(handlers::list_alerts))
        .route("/alerts/:id/resolve", post(handlers::resolve_alert));

    Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// The two demo slices created on an empty registry when the simulator is enabled.
pub fn default_seed_requests() -> Vec<CreateSliceRequest> {
    vec![
        CreateSliceRequest::new("City CCTV slice", "SmartCityOps", QosClass::Gold)
            .with_devices((0..5).map(|n| format!("cctv-{n}"))),
        CreateSliceRequest::new("Traffic Sensors slice", "SmartCityOps", QosClass::Silver)
            .with_devices((0..10).map(|n| format!("traffic-{n}"))),
    ]
}

/// Create the demo slices unless the registry already holds slices. Failures are logged and
/// skipped.
pub async fn seed_default_slices(orchestrator: &SliceOrchestrator) -> Vec<Slice> {
    if !orchestrator.registry().is_empty().await {
        return Vec::new();
    }

    let mut created = Vec::new();
    for request in default_seed_requests() {
        let name = request.name.clone();
        match orchestrator.create_slice(request).await {
            Ok(slice) => {
                info!(slice_id = %slice.id, "seeded demo slice");
                created.push(slice);
            }
            Err(err) => warn!(%name, error = %err, "failed to seed demo slice"),
        }
    }
    created
}
