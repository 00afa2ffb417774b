use crate::ports::ProvisioningStep;
use thiserror::Error;

/// Slice lifecycle errors.
#[derive(Debug, Error)]
pub enum SliceError {
    #[error("Slice not found: {0}")]
    SliceNotFound(String),

    #[error("Alert not found: {0}")]
    AlertNotFound(String),

    /// A freshly generated id already exists. Registries never overwrite.
    #[error("Invariant violation: slice '{0}' is already registered")]
    DuplicateSlice(String),

    #[error("Provisioning step '{step}' failed on backend '{backend}': {message}")]
    BackendProvisioning {
        step: ProvisioningStep,
        backend: String,
        message: String,
    },

    #[error("Provisioning step '{step}' on backend '{backend}' timed out after {timeout_ms}ms")]
    BackendTimeout {
        step: ProvisioningStep,
        backend: String,
        timeout_ms: u64,
    },
}

impl SliceError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::SliceNotFound(_) | Self::AlertNotFound(_))
    }

    /// True for any failure raised by the backend fan-out during slice creation.
    pub fn is_backend_failure(&self) -> bool {
        matches!(
            self,
            Self::BackendProvisioning { .. } | Self::BackendTimeout { .. }
        )
    }
}
