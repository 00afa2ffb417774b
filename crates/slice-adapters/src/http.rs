//! HTTP adapters for real network controllers.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use slice_core::{PortError, PortReceipt, ProvisioningPort, ProvisioningStep, SliceDescriptor};
use std::time::Duration;
use tracing::{debug, instrument};

/// Endpoints and credentials for the three controllers.
#[derive(Debug, Clone)]
pub struct HttpBackendConfig {
    pub onos_url: String,
    pub opendaylight_url: String,
    pub onap_url: String,
    pub username: String,
    pub password: String,
    /// Transport-level timeout applied by the HTTP client itself.
    pub request_timeout: Duration,
}

impl Default for HttpBackendConfig {
    fn default() -> Self {
        Self {
            onos_url: "http://localhost:8181".to_string(),
            opendaylight_url: "http://localhost:8181".to_string(),
            onap_url: "http://localhost:8000".to_string(),
            username: "onos".to_string(),
            password: "rocks".to_string(),
            request_timeout: Duration::from_secs(10),
        }
    }
}

impl HttpBackendConfig {
    pub fn build_client(&self) -> Result<Client, PortError> {
        Client::builder()
            .timeout(self.request_timeout)
            .build()
            .map_err(|err| PortError::Transport(err.to_string()))
    }
}

/// Flow rules pushed to the forwarding controller for every slice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForwardingRules {
    #[serde(rename = "match")]
    pub match_on: String,
    pub action: String,
}

pub fn forwarding_rules(_descriptor: &SliceDescriptor) -> ForwardingRules {
    ForwardingRules {
        match_on: "iot".to_string(),
        action: "forward".to_string(),
    }
}

pub fn topology_payload(descriptor: &SliceDescriptor) -> serde_json::Value {
    serde_json::json!({
        "slice_id": descriptor.id,
        "descriptor": descriptor,
    })
}

pub fn forwarding_payload(descriptor: &SliceDescriptor) -> serde_json::Value {
    serde_json::json!({
        "slice_id": descriptor.id,
        "rules": forwarding_rules(descriptor),
    })
}

/// The system of record only needs the slice id.
pub fn instantiation_payload(descriptor: &SliceDescriptor) -> serde_json::Value {
    serde_json::json!({ "id": descriptor.id })
}

fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

async fn send(request: RequestBuilder) -> Result<serde_json::Value, PortError> {
    let response = request
        .send()
        .await
        .map_err(|err| PortError::Transport(err.to_string()))?;
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|err| PortError::Transport(err.to_string()))?;

    if !status.is_success() {
        return Err(PortError::Rejected {
            status: status.as_u16(),
            body,
        });
    }

    if body.trim().is_empty() {
        return Ok(serde_json::Value::Null);
    }
    Ok(serde_json::from_str(&body).unwrap_or(serde_json::Value::String(body)))
}

/// ONOS client configuring the slice's network topology.
#[derive(Debug, Clone)]
pub struct OnosTopologyClient {
    client: Client,
    base_url: String,
    username: String,
    password: String,
}

impl OnosTopologyClient {
    pub fn new(client: Client, config: &HttpBackendConfig) -> Self {
        Self {
            client,
            base_url: config.onos_url.clone(),
            username: config.username.clone(),
            password: config.password.clone(),
        }
    }
}

#[async_trait]
impl ProvisioningPort for OnosTopologyClient {
    fn backend(&self) -> &'static str {
        "onos"
    }

    fn step(&self) -> ProvisioningStep {
        ProvisioningStep::ConfigureTopology
    }

    #[instrument(skip_all, fields(backend = "onos", slice_id = %descriptor.id))]
    async fn provision(&self, descriptor: &SliceDescriptor) -> Result<PortReceipt, PortError> {
        let url = join_url(&self.base_url, &format!("onos/v1/slices/{}", descriptor.id));
        let request = self
            .client
            .post(&url)
            .basic_auth(&self.username, Some(&self.password))
            .json(&topology_payload(descriptor));
        let response = send(request).await?;
        debug!(%url, "topology configured");
        Ok(receipt(self.backend(), descriptor, "configured", &response))
    }
}

/// OpenDaylight client installing forwarding rules.
#[derive(Debug, Clone)]
pub struct OpenDaylightFlowClient {
    client: Client,
    base_url: String,
    username: String,
    password: String,
}

impl OpenDaylightFlowClient {
    pub fn new(client: Client, config: &HttpBackendConfig) -> Self {
        Self {
            client,
            base_url: config.opendaylight_url.clone(),
            username: config.username.clone(),
            password: config.password.clone(),
        }
    }
}

#[async_trait]
impl ProvisioningPort for OpenDaylightFlowClient {
    fn backend(&self) -> &'static str {
        "opendaylight"
    }

    fn step(&self) -> ProvisioningStep {
        ProvisioningStep::InstallForwardingRules
    }

    #[instrument(skip_all, fields(backend = "opendaylight", slice_id = %descriptor.id))]
    async fn provision(&self, descriptor: &SliceDescriptor) -> Result<PortReceipt, PortError> {
        let url = join_url(
            &self.base_url,
            &format!("restconf/config/network-slicing:slices/slice/{}/flows", descriptor.id),
        );
        let request = self
            .client
            .put(&url)
            .basic_auth(&self.username, Some(&self.password))
            .json(&forwarding_payload(descriptor));
        let response = send(request).await?;
        debug!(%url, "forwarding rules installed");
        Ok(receipt(self.backend(), descriptor, "rules-installed", &response))
    }
}

/// ONAP client instantiating the slice in the orchestration system of record.
#[derive(Debug, Clone)]
pub struct OnapDescriptorClient {
    client: Client,
    base_url: String,
}

impl OnapDescriptorClient {
    pub fn new(client: Client, config: &HttpBackendConfig) -> Self {
        Self {
            client,
            base_url: config.onap_url.clone(),
        }
    }
}

#[async_trait]
impl ProvisioningPort for OnapDescriptorClient {
    fn backend(&self) -> &'static str {
        "onap"
    }

    fn step(&self) -> ProvisioningStep {
        ProvisioningStep::InstantiateDescriptor
    }

    #[instrument(skip_all, fields(backend = "onap", slice_id = %descriptor.id))]
    async fn provision(&self, descriptor: &SliceDescriptor) -> Result<PortReceipt, PortError> {
        let url = join_url(&self.base_url, "nssmf/v1/slices");
        let request = self
            .client
            .post(&url)
            .json(&instantiation_payload(descriptor));
        let response = send(request).await?;
        debug!(%url, "slice descriptor instantiated");
        Ok(receipt(self.backend(), descriptor, "instantiated", &response))
    }
}

/// Prefers the controller-reported `state` when the response carries one.
fn receipt(
    backend: &str,
    descriptor: &SliceDescriptor,
    default_state: &str,
    response: &serde_json::Value,
) -> PortReceipt {
    let state = response
        .get("state")
        .and_then(serde_json::Value::as_str)
        .unwrap_or(default_state);
    PortReceipt::new(backend, descriptor.id.clone(), state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use slice_core::{QosClass, Slice};

    fn descriptor() -> SliceDescriptor {
        Slice::provisioning(
            "city-cctv-slice-abc123",
            "City CCTV slice",
            "SmartCityOps",
            QosClass::Gold,
            vec!["cctv-0".into()],
        )
        .descriptor()
    }

    #[test]
    fn payloads_follow_controller_contracts() {
        let descriptor = descriptor();

        let topology = topology_payload(&descriptor);
        assert_eq!(topology["slice_id"], "city-cctv-slice-abc123");
        assert_eq!(topology["descriptor"]["qos_class"], "gold");
        assert_eq!(topology["descriptor"]["devices"][0], "cctv-0");

        let forwarding = forwarding_payload(&descriptor);
        assert_eq!(forwarding["rules"]["match"], "iot");
        assert_eq!(forwarding["rules"]["action"], "forward");

        assert_eq!(
            instantiation_payload(&descriptor),
            serde_json::json!({ "id": "city-cctv-slice-abc123" })
        );
    }

    #[test]
    fn join_url_normalises_slashes() {
        assert_eq!(join_url("http://h:1/", "/a/b"), "http://h:1/a/b");
        assert_eq!(join_url("http://h:1", "a"), "http://h:1/a");
    }

    #[test]
    fn receipt_prefers_reported_state() {
        let descriptor = descriptor();
        let reported = receipt(
            "onap",
            &descriptor,
            "instantiated",
            &serde_json::json!({ "state": "queued" }),
        );
        assert_eq!(reported.state, "queued");

        let fallback = receipt("onap", &descriptor, "instantiated", &serde_json::Value::Null);
        assert_eq!(fallback.state, "instantiated");
    }

    #[tokio::test]
    async fn unreachable_controller_is_a_transport_error() {
        let config = HttpBackendConfig {
            onap_url: "http://127.0.0.1:9".to_string(),
            request_timeout: Duration::from_secs(2),
            ..HttpBackendConfig::default()
        };
        let client = OnapDescriptorClient::new(config.build_client().unwrap(), &config);

        let err = client.provision(&descriptor()).await.unwrap_err();
        assert!(matches!(err, PortError::Transport(_)));
    }
}
