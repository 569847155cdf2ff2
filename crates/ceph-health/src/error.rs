//! Error types for the health inspector.

use thiserror::Error;

/// Errors that can occur while querying or decoding cluster state.
#[derive(Debug, Error)]
pub enum HealthError {
    /// Kubernetes API request failed.
    #[error("Kubernetes API error: {0}")]
    Kube(#[from] kube::Error),

    /// Explicit kubeconfig could not be loaded.
    #[error("Failed to load kubeconfig: {0}")]
    Kubeconfig(#[from] kube::config::KubeconfigError),

    /// No usable cluster configuration could be inferred.
    #[error("Failed to infer Kubernetes config: {0}")]
    InferConfig(#[from] kube::config::InferConfigError),

    /// No pod matching the selector is in the Running phase.
    #[error("No running pod with label {selector} in namespace {namespace}")]
    PodNotRunning { namespace: String, selector: String },

    /// Remote command failed inside the pod.
    #[error("Command failed in pod {pod}: {message}")]
    Exec { pod: String, message: String },

    /// Reading the exec streams failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Ceph status payload was malformed or incomplete.
    #[error("Failed to decode ceph status: {0}")]
    Decode(#[from] serde_json::Error),
}

impl HealthError {
    /// Whether this error came from decoding a payload rather than from the transport.
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_error_is_flagged() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = HealthError::from(err);
        assert!(err.is_decode());
        assert!(err.to_string().starts_with("Failed to decode ceph status"));
    }

    #[test]
    fn test_transport_errors_are_not_decode() {
        let err = HealthError::Exec {
            pod: "rook-ceph-operator-abc".to_string(),
            message: "connection refused".to_string(),
        };
        assert!(!err.is_decode());
        assert_eq!(
            err.to_string(),
            "Command failed in pod rook-ceph-operator-abc: connection refused"
        );

        let err = HealthError::PodNotRunning {
            namespace: "rook-ceph".to_string(),
            selector: "app=rook-ceph-operator".to_string(),
        };
        assert!(!err.is_decode());
    }
}
