//! API request handlers

use crate::error::{ApiError, ApiResult};
use crate::ServiceState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use slice_core::{Alert, AlertSeverity, CreateSliceRequest, Slice, SliceError, TelemetrySample};

/// `{ "status": ... }` acknowledgement body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusResponse {
    pub status: String,
}

impl StatusResponse {
    fn new(status: &str) -> Json<Self> {
        Json(Self {
            status: status.to_string(),
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AddDeviceRequest {
    pub device_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateAlertRequest {
    pub title: String,
    pub description: String,
    #[serde(default = "default_alert_severity")]
    pub severity: AlertSeverity,
}

fn default_alert_severity() -> AlertSeverity {
    AlertSeverity::Warning
}

pub async fn health_check() -> Json<StatusResponse> {
    StatusResponse::new("ok")
}

pub async fn list_slices(State(state): State<ServiceState>) -> Json<Vec<Slice>> {
    Json(state.orchestrator.list_slices().await)
}

pub async fn create_slice(
    State(state): State<ServiceState>,
    Json(request): Json<CreateSliceRequest>,
) -> ApiResult<(StatusCode, Json<Slice>)> {
    validate_create_slice(&request)?;
    let slice = state.orchestrator.create_slice(request).await?;
    Ok((StatusCode::CREATED, Json(slice)))
}

pub async fn get_slice(
    Path(slice_id): Path<String>,
    State(state): State<ServiceState>,
) -> ApiResult<Json<Slice>> {
    Ok(Json(state.orchestrator.get_slice(&slice_id).await?))
}

/// Always accepted once the sample is well-formed, even for unknown slices.
///
/// Malformed samples (negative or non-finite values) are rejected with 400 before the registry is
/// consulted, so a malformed sample for an unknown slice raises no unknown-slice warning alert.
pub async fn ingest_metric(
    Path(slice_id): Path<String>,
    State(state): State<ServiceState>,
    Json(sample): Json<TelemetrySample>,
) -> ApiResult<(StatusCode, Json<StatusResponse>)> {
    validate_sample(&sample)?;
    state.orchestrator.ingest_metric(&slice_id, sample).await;
    Ok((StatusCode::ACCEPTED, StatusResponse::new("accepted")))
}

pub async fn list_alerts(State(state): State<ServiceState>) -> Json<Vec<Alert>> {
    Json(state.orchestrator.list_alerts().await)
}

pub async fn list_slice_alerts(
    Path(slice_id): Path<String>,
    State(state): State<ServiceState>,
) -> ApiResult<Json<Vec<Alert>>> {
    Ok(Json(
        state.orchestrator.list_alerts_for_slice(&slice_id).await?,
    ))
}

pub async fn add_device(
    Path(slice_id): Path<String>,
    State(state): State<ServiceState>,
    Json(request): Json<AddDeviceRequest>,
) -> ApiResult<Json<Slice>> {
    let device_id = request.device_id.trim();
    if device_id.is_empty() {
        return Err(ApiError::BadRequest("device_id is required".to_string()));
    }
    Ok(Json(
        state
            .orchestrator
            .add_device(&slice_id, device_id.to_string())
            .await?,
    ))
}

pub async fn create_alert(
    Path(slice_id): Path<String>,
    State(state): State<ServiceState>,
    Json(request): Json<CreateAlertRequest>,
) -> ApiResult<(StatusCode, Json<Alert>)> {
    if request.title.trim().is_empty() {
        return Err(ApiError::BadRequest("title is required".to_string()));
    }
    let alert = state
        .orchestrator
        .create_alert(
            &slice_id,
            request.title,
            request.description,
            request.severity,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(alert)))
}

pub async fn resolve_alert(
    Path(alert_id): Path<String>,
    State(state): State<ServiceState>,
) -> ApiResult<Json<StatusResponse>> {
    if !state.orchestrator.resolve_alert(&alert_id).await {
        return Err(SliceError::AlertNotFound(alert_id).into());
    }
    Ok(StatusResponse::new("resolved"))
}

fn validate_create_slice(request: &CreateSliceRequest) -> ApiResult<()> {
    if request.name.trim().is_empty() {
        return Err(ApiError::BadRequest("name is required".to_string()));
    }
    if request.tenant.trim().is_empty() {
        return Err(ApiError::BadRequest("tenant is required".to_string()));
    }
    if request.devices.iter().any(|device| device.trim().is_empty()) {
        return Err(ApiError::BadRequest(
            "device ids must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_sample(sample: &TelemetrySample) -> ApiResult<()> {
    for (field, value) in [
        ("throughput_mbps", sample.throughput_mbps),
        ("latency_ms", sample.latency_ms),
        ("packet_loss", sample.packet_loss),
        ("energy_score", sample.energy_score),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(ApiError::BadRequest(format!(
                "{field} must be a finite, non-negative number"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use slice_core::QosClass;

    #[test]
    fn blank_names_are_rejected() {
        let request = CreateSliceRequest::new("  ", "ops", QosClass::Gold);
        assert!(matches!(
            validate_create_slice(&request),
            Err(ApiError::BadRequest(_))
        ));
    }

    #[test]
    fn negative_latency_is_rejected() {
        let sample = TelemetrySample::new(10.0, -1.0, 0.0, 0.5);
        assert!(matches!(
            validate_sample(&sample),
            Err(ApiError::BadRequest(msg)) if msg.contains("latency_ms")
        ));
        assert!(validate_sample(&TelemetrySample::new(0.0, 0.0, 0.0, 0.0)).is_ok());
    }

    #[test]
    fn alert_severity_defaults_to_warning() {
        let request: CreateAlertRequest = serde_json::from_value(serde_json::json!({
            "title": "Camera offline",
            "description": "cctv-3 stopped streaming"
        }))
        .unwrap();
        assert_eq!(request.severity, AlertSeverity::Warning);
    }
}
