//! Pod census: partition a role's pods by phase and hosting node.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use crate::error::HealthError;
use crate::pods::{PodLister, PodRecord};

/// Ceph daemon roles deployed by Rook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DaemonRole {
    Mon,
    Osd,
    Mgr,
}

impl DaemonRole {
    /// Label selector Rook puts on the role's pods.
    pub fn label_selector(self) -> &'static str {
        match self {
            Self::Mon => "app=rook-ceph-mon",
            Self::Osd => "app=rook-ceph-osd",
            Self::Mgr => "app=rook-ceph-mgr",
        }
    }

    /// Minimum number of pods the role should have.
    ///
    /// Mon and OSD pods must also be spread over that many distinct nodes.
    pub fn min_pods(self) -> usize {
        match self {
            Self::Mon | Self::Osd => 3,
            Self::Mgr => 1,
        }
    }
}

impl std::fmt::Display for DaemonRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Mon => write!(f, "mon"),
            Self::Osd => write!(f, "osd"),
            Self::Mgr => write!(f, "mgr"),
        }
    }
}

/// A point-in-time view of the pods returned by one or more listings.
#[derive(Debug, Clone, Default)]
pub struct PodCensus {
    pods: Vec<PodRecord>,
}

impl PodCensus {
    pub fn new(pods: Vec<PodRecord>) -> Self {
        Self { pods }
    }

    /// All pods in listing order.
    pub fn pods(&self) -> &[PodRecord] {
        &self.pods
    }

    pub fn len(&self) -> usize {
        self.pods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pods.is_empty()
    }

    pub fn running(&self) -> Vec<&PodRecord> {
        self.pods.iter().filter(|p| p.is_running()).collect()
    }

    pub fn not_running(&self) -> Vec<&PodRecord> {
        self.pods.iter().filter(|p| !p.is_running()).collect()
    }

    /// Node name to the first pod seen on it. Unscheduled pods are skipped.
    pub fn by_node(&self) -> BTreeMap<&str, &str> {
        let mut nodes = BTreeMap::new();
        for pod in &self.pods {
            if let Some(node) = pod.node_name.as_deref() {
                nodes.entry(node).or_insert(pod.name.as_str());
            }
        }
        nodes
    }

    pub fn distinct_nodes(&self) -> usize {
        self.by_node().len()
    }

    /// Append another census, keeping listing order.
    pub fn extend(&mut self, other: PodCensus) {
        self.pods.extend(other.pods);
    }
}

/// List pods in `namespace` (optionally by label) and wrap them in a census.
pub async fn take_census(
    lister: &dyn PodLister,
    namespace: &str,
    selector: Option<&str>,
) -> Result<PodCensus, HealthError> {
    let pods = lister.list_pods(namespace, selector).await?;
    let census = PodCensus::new(pods);
    debug!(
        namespace = %namespace,
        total = census.len(),
        running = census.running().len(),
        nodes = census.distinct_nodes(),
        "Pod census taken"
    );
    Ok(census)
}

/// Census of a single daemon role.
pub async fn role_census(
    lister: &dyn PodLister,
    namespace: &str,
    role: DaemonRole,
) -> Result<PodCensus, HealthError> {
    take_census(lister, namespace, Some(role.label_selector())).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pods::PodPhase;

    fn census() -> PodCensus {
        PodCensus::new(vec![
            PodRecord::new("mon-a", "rook-ceph", PodPhase::Running, Some("node-1")),
            PodRecord::new("mon-b", "rook-ceph", PodPhase::Running, Some("node-1")),
            PodRecord::new("mon-c", "rook-ceph", PodPhase::Pending, None),
            PodRecord::new("mon-d", "rook-ceph", PodPhase::Failed, Some("node-2")),
        ])
    }

    #[test]
    fn test_role_selectors() {
        assert_eq!(DaemonRole::Mon.label_selector(), "app=rook-ceph-mon");
        assert_eq!(DaemonRole::Osd.label_selector(), "app=rook-ceph-osd");
        assert_eq!(DaemonRole::Mgr.label_selector(), "app=rook-ceph-mgr");
        assert_eq!(DaemonRole::Osd.to_string(), "osd");
        assert_eq!(DaemonRole::Mon.min_pods(), 3);
        assert_eq!(DaemonRole::Mgr.min_pods(), 1);
    }

    #[test]
    fn test_partition_by_phase() {
        let c = census();
        let running: Vec<_> = c.running().iter().map(|p| p.name.as_str()).collect();
        let not_running: Vec<_> = c.not_running().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(running, vec!["mon-a", "mon-b"]);
        assert_eq!(not_running, vec!["mon-c", "mon-d"]);
    }

    #[test]
    fn test_by_node_keeps_first_pod() {
        let c = census();
        let nodes = c.by_node();
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes.get("node-1"), Some(&"mon-a"));
        assert_eq!(nodes.get("node-2"), Some(&"mon-d"));
        assert_eq!(c.distinct_nodes(), 2);
    }

    #[test]
    fn test_extend_keeps_order() {
        let mut c = PodCensus::new(vec![PodRecord::new(
            "operator",
            "rook-ceph-system",
            PodPhase::Running,
            Some("node-3"),
        )]);
        c.extend(census());
        assert_eq!(c.len(), 5);
        assert_eq!(c.pods()[0].name, "operator");
        assert_eq!(c.distinct_nodes(), 3);
    }

    #[test]
    fn test_empty_census() {
        let c = PodCensus::default();
        assert!(c.is_empty());
        assert_eq!(c.distinct_nodes(), 0);
        assert!(c.running().is_empty());
    }
}
