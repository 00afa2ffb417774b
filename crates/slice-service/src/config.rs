//! Service settings.
//!
//! Sourced from flags with `NMS_*` environment fallbacks, validated once at startup and never
//! mutated afterwards.

use clap::{Parser, ValueEnum};
use slice_adapters::HttpBackendConfig;
use slice_core::{HealthPolicy, OrchestratorConfig};
use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{field} must be greater than zero")]
    NotPositive { field: &'static str },

    #[error("{field} must be a finite, non-negative number (got {value})")]
    InvalidThreshold { field: &'static str, value: f64 },

    #[error("invalid {field} '{url}': {reason}")]
    InvalidUrl {
        field: &'static str,
        url: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BackendMode {
    /// In-process controller simulators.
    Simulated,
    /// Real controllers over HTTP.
    Http,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "sliced", version, about = "Network slice control-plane coordinator")]
pub struct Settings {
    /// REST socket address to bind, e.g. 127.0.0.1:8000
    #[arg(long, default_value = "127.0.0.1:8000", env = "NMS_LISTEN")]
    pub listen: SocketAddr,

    /// Which controller adapters provision new slices.
    #[arg(long, value_enum, default_value_t = BackendMode::Simulated, env = "NMS_BACKEND_MODE")]
    pub backend_mode: BackendMode,

    #[arg(long, default_value = "http://localhost:8181", env = "NMS_ONOS_URL")]
    pub onos_url: String,

    #[arg(long, default_value = "http://localhost:8181", env = "NMS_OPENDAYLIGHT_URL")]
    pub opendaylight_url: String,

    #[arg(long, default_value = "http://localhost:8000", env = "NMS_ONAP_URL")]
    pub onap_url: String,

    #[arg(long, default_value = "onos", env = "NMS_CONTROLLER_USER")]
    pub controller_user: String,

    #[arg(long, default_value = "rocks", env = "NMS_CONTROLLER_PASSWORD", hide_env_values = true)]
    pub controller_password: String,

    /// Per-call deadline for each backend provisioning step.
    #[arg(long, default_value_t = 10_000, env = "NMS_BACKEND_TIMEOUT_MS")]
    pub backend_timeout_ms: u64,

    /// Seconds between synthetic telemetry rounds.
    #[arg(long, default_value_t = 10, env = "NMS_POLL_INTERVAL_SECONDS")]
    pub poll_interval_seconds: u64,

    /// Seed demo slices and emit synthetic telemetry.
    #[arg(
        long,
        default_value_t = true,
        action = clap::ArgAction::Set,
        env = "NMS_ENABLE_SIMULATOR"
    )]
    pub enable_simulator: bool,

    /// Packet loss percentage above which a slice is degraded.
    #[arg(long, default_value_t = 2.0, env = "NMS_MAX_PACKET_LOSS")]
    pub max_packet_loss: f64,

    /// Latency in milliseconds above which a slice is degraded.
    #[arg(long, default_value_t = 80.0, env = "NMS_MAX_LATENCY_MS")]
    pub max_latency_ms: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            listen: SocketAddr::from(([127, 0, 0, 1], 8000)),
            backend_mode: BackendMode::Simulated,
            onos_url: "http://localhost:8181".to_string(),
            opendaylight_url: "http://localhost:8181".to_string(),
            onap_url: "http://localhost:8000".to_string(),
            controller_user: "onos".to_string(),
            controller_password: "rocks".to_string(),
            backend_timeout_ms: 10_000,
            poll_interval_seconds: 10,
            enable_simulator: true,
            max_packet_loss: 2.0,
            max_latency_ms: 80.0,
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.backend_timeout_ms == 0 {
            return Err(ConfigError::NotPositive {
                field: "backend_timeout_ms",
            });
        }
        if self.poll_interval_seconds == 0 {
            return Err(ConfigError::NotPositive {
                field: "poll_interval_seconds",
            });
        }
        for (field, value) in [
            ("max_packet_loss", self.max_packet_loss),
            ("max_latency_ms", self.max_latency_ms),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidThreshold { field, value });
            }
        }
        if self.backend_mode == BackendMode::Http {
            for (field, url) in [
                ("onos_url", &self.onos_url),
                ("opendaylight_url", &self.opendaylight_url),
                ("onap_url", &self.onap_url),
            ] {
                reqwest::Url::parse(url).map_err(|err| ConfigError::InvalidUrl {
                    field,
                    url: url.clone(),
                    reason: err.to_string(),
                })?;
            }
        }
        Ok(())
    }

    pub fn health_policy(&self) -> HealthPolicy {
        HealthPolicy {
            max_packet_loss: self.max_packet_loss,
            max_latency_ms: self.max_latency_ms,
        }
    }

    pub fn backend_timeout(&self) -> Duration {
        Duration::from_millis(self.backend_timeout_ms)
    }

    pub fn orchestrator_config(&self) -> OrchestratorConfig {
        OrchestratorConfig {
            backend_timeout: self.backend_timeout(),
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_seconds)
    }

    pub fn http_backend_config(&self) -> HttpBackendConfig {
        HttpBackendConfig {
            onos_url: self.onos_url.clone(),
            opendaylight_url: self.opendaylight_url.clone(),
            onap_url: self.onap_url.clone(),
            username: self.controller_user.clone(),
            password: self.controller_password.clone(),
            request_timeout: self.backend_timeout(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        let settings = Settings::try_parse_from(["sliced"]).unwrap();
        settings.validate().unwrap();
        assert_eq!(settings.backend_mode, BackendMode::Simulated);
        assert!(settings.enable_simulator);
        assert_eq!(settings.health_policy(), HealthPolicy::default());
        assert_eq!(settings.poll_interval(), Duration::from_secs(10));
    }

    #[test]
    fn simulator_can_be_disabled_from_flags() {
        let settings =
            Settings::try_parse_from(["sliced", "--enable-simulator", "false"]).unwrap();
        assert!(!settings.enable_simulator);
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let settings = Settings {
            backend_timeout_ms: 0,
            ..Settings::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::NotPositive {
                field: "backend_timeout_ms"
            })
        ));
    }

    #[test]
    fn negative_threshold_is_rejected() {
        let settings = Settings {
            max_latency_ms: -1.0,
            ..Settings::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::InvalidThreshold { .. })
        ));
    }

    #[test]
    fn http_mode_requires_parseable_urls() {
        let settings = Settings {
            backend_mode: BackendMode::Http,
            onap_url: "not a url".to_string(),
            ..Settings::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::InvalidUrl { field: "onap_url", .. })
        ));

        let simulated = Settings {
            onap_url: "not a url".to_string(),
            ..Settings::default()
        };
        simulated.validate().unwrap();
    }

    #[test]
    fn http_backend_config_carries_credentials_and_timeout() {
        let settings = Settings {
            controller_user: "admin".to_string(),
            backend_timeout_ms: 2500,
            ..Settings::default()
        };
        let http = settings.http_backend_config();
        assert_eq!(http.username, "admin");
        assert_eq!(http.request_timeout, Duration::from_millis(2500));
    }
}
