//! Pod snapshots and the Kubernetes pod listing seam.

use async_trait::async_trait;
use k8s_openapi::api::core::v1::Pod;
use kube::{
    api::{Api, ListParams},
    Client,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::HealthError;

/// Pod lifecycle phase as reported in `status.phase`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PodPhase {
    Running,
    Pending,
    Succeeded,
    Failed,
    #[default]
    Unknown,
}

impl PodPhase {
    /// Parse a phase string; anything unrecognized becomes `Unknown`.
    pub fn parse(phase: &str) -> Self {
        match phase {
            "Running" => Self::Running,
            "Pending" => Self::Pending,
            "Succeeded" => Self::Succeeded,
            "Failed" => Self::Failed,
            _ => Self::Unknown,
        }
    }

    pub fn is_running(self) -> bool {
        self == Self::Running
    }
}

impl std::fmt::Display for PodPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Running => write!(f, "Running"),
            Self::Pending => write!(f, "Pending"),
            Self::Succeeded => write!(f, "Succeeded"),
            Self::Failed => write!(f, "Failed"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

/// The fields of a pod the inspector reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PodRecord {
    pub name: String,
    pub namespace: String,
    pub phase: PodPhase,
    /// Node the pod is scheduled on, if any.
    pub node_name: Option<String>,
}

impl PodRecord {
    pub fn new(
        name: impl Into<String>,
        namespace: impl Into<String>,
        phase: PodPhase,
        node_name: Option<&str>,
    ) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            phase,
            node_name: node_name.map(str::to_string),
        }
    }

    /// Build a record from a Kubernetes pod object.
    ///
    /// `fallback_namespace` is used when the object carries no namespace.
    pub fn from_pod(pod: &Pod, fallback_namespace: &str) -> Self {
        let name = pod.metadata.name.clone().unwrap_or_default();
        let namespace = pod
            .metadata
            .namespace
            .clone()
            .unwrap_or_else(|| fallback_namespace.to_string());
        let phase = pod
            .status
            .as_ref()
            .and_then(|s| s.phase.as_deref())
            .map_or(PodPhase::Unknown, PodPhase::parse);
        let node_name = pod
            .spec
            .as_ref()
            .and_then(|s| s.node_name.clone())
            .filter(|n| !n.is_empty());

        Self {
            name,
            namespace,
            phase,
            node_name,
        }
    }

    /// Node name for display; empty when unscheduled.
    pub fn node(&self) -> &str {
        self.node_name.as_deref().unwrap_or("")
    }

    pub fn is_running(&self) -> bool {
        self.phase.is_running()
    }

    /// Tab-separated row: name, phase, namespace, node.
    pub fn row(&self) -> String {
        format!(
            "{}\t{}\t{}\t{}",
            self.name,
            self.phase,
            self.namespace,
            self.node()
        )
    }
}

/// Lists pods from the orchestrator.
#[async_trait]
pub trait PodLister: Send + Sync {
    /// List pods in `namespace`, optionally filtered by a label selector.
    async fn list_pods(
        &self,
        namespace: &str,
        selector: Option<&str>,
    ) -> Result<Vec<PodRecord>, HealthError>;
}

/// `PodLister` backed by the Kubernetes API.
#[derive(Clone)]
pub struct KubePodLister {
    client: Client,
}

impl KubePodLister {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PodLister for KubePodLister {
    async fn list_pods(
        &self,
        namespace: &str,
        selector: Option<&str>,
    ) -> Result<Vec<PodRecord>, HealthError> {
        let pods: Api<Pod> = Api::namespaced(self.client.clone(), namespace);

        let mut lp = ListParams::default();
        if let Some(selector) = selector {
            lp = lp.labels(selector);
        }

        let pod_list = pods.list(&lp).await?;
        debug!(
            namespace = %namespace,
            selector = selector.unwrap_or("<none>"),
            count = pod_list.items.len(),
            "Listed pods"
        );

        Ok(pod_list
            .items
            .iter()
            .map(|pod| PodRecord::from_pod(pod, namespace))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::api::core::v1::{PodSpec, PodStatus};
    use kube::api::ObjectMeta;

    fn pod(name: &str, phase: Option<&str>, node: Option<&str>) -> Pod {
        Pod {
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                namespace: Some("rook-ceph".to_string()),
                ..Default::default()
            },
            spec: Some(PodSpec {
                node_name: node.map(str::to_string),
                ..Default::default()
            }),
            status: Some(PodStatus {
                phase: phase.map(str::to_string),
                ..Default::default()
            }),
        }
    }

    #[test]
    fn test_phase_parse() {
        assert_eq!(PodPhase::parse("Running"), PodPhase::Running);
        assert_eq!(PodPhase::parse("Pending"), PodPhase::Pending);
        assert_eq!(PodPhase::parse("Succeeded"), PodPhase::Succeeded);
        assert_eq!(PodPhase::parse("Failed"), PodPhase::Failed);
        assert_eq!(PodPhase::parse("Terminating"), PodPhase::Unknown);
        assert!(PodPhase::Running.is_running());
        assert!(!PodPhase::Pending.is_running());
    }

    #[test]
    fn test_record_from_pod() {
        let record = PodRecord::from_pod(
            &pod("rook-ceph-mon-a-6c7d", Some("Running"), Some("node-1")),
            "ignored",
        );
        assert_eq!(record.name, "rook-ceph-mon-a-6c7d");
        assert_eq!(record.namespace, "rook-ceph");
        assert_eq!(record.phase, PodPhase::Running);
        assert_eq!(record.node_name.as_deref(), Some("node-1"));
    }

    #[test]
    fn test_record_from_unscheduled_pod() {
        let mut p = pod("rook-ceph-osd-2-abc", None, Some(""));
        p.metadata.namespace = None;
        let record = PodRecord::from_pod(&p, "storage");
        assert_eq!(record.namespace, "storage");
        assert_eq!(record.phase, PodPhase::Unknown);
        assert_eq!(record.node_name, None);
        assert_eq!(record.node(), "");
    }

    #[test]
    fn test_row_is_tab_separated() {
        let record = PodRecord::new("rook-ceph-mgr-a", "rook-ceph", PodPhase::Pending, Some("n2"));
        assert_eq!(record.row(), "rook-ceph-mgr-a\tPending\trook-ceph\tn2");
    }
}
