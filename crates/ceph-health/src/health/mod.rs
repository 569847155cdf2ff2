//! Health evaluation pass over a Rook/Ceph cluster.
//!
//! Every check runs on its own fresh queries and never short-circuits the
//! ones after it. Failures are turned into findings of the check that hit
//! them: listing and exec failures become Error findings, a status payload
//! that cannot be decoded becomes a Fatal finding for that check only.

pub mod classify;

use tracing::{info, warn};

use crate::census::{role_census, take_census, DaemonRole, PodCensus};
use crate::config::Namespaces;
use crate::error::HealthError;
use crate::exec::{fetch_status, CommandRunner};
use crate::pods::PodLister;
use crate::report::{CheckKind, CheckReport, Finding, HealthReport};
use crate::status::ClusterStatusSnapshot;

pub use classify::{classify_health, classify_pg_states, health_severity, pg_state_severity};

/// Runs the fixed sequence of cluster checks.
pub struct HealthEvaluator<'a> {
    pods: &'a dyn PodLister,
    runner: &'a dyn CommandRunner,
    namespaces: &'a Namespaces,
}

impl<'a> HealthEvaluator<'a> {
    pub fn new(
        pods: &'a dyn PodLister,
        runner: &'a dyn CommandRunner,
        namespaces: &'a Namespaces,
    ) -> Self {
        Self {
            pods,
            runner,
            namespaces,
        }
    }

    /// Run all checks in order and collect their output.
    pub async fn run(&self) -> HealthReport {
        info!(
            operator_namespace = %self.namespaces.operator,
            cluster_namespace = %self.namespaces.cluster,
            "Starting ceph health evaluation"
        );

        let mut report = HealthReport::default();
        report.push(self.check_mon_placement().await);
        report.push(self.check_quorum().await);
        report.push(self.check_osd_placement().await);
        report.push(self.check_pod_status().await);
        report.push(self.check_pg_status().await);
        report.push(self.check_mgr_count().await);
        report
    }

    pub async fn check_mon_placement(&self) -> CheckReport {
        self.check_placement(CheckKind::MonPlacement, DaemonRole::Mon)
            .await
    }

    pub async fn check_osd_placement(&self) -> CheckReport {
        self.check_placement(CheckKind::OsdPlacement, DaemonRole::Osd)
            .await
    }

    /// Warn when a role's pods span fewer nodes than required, then list them.
    async fn check_placement(&self, kind: CheckKind, role: DaemonRole) -> CheckReport {
        let min_pods = count_word(role.min_pods());
        let mut check = CheckReport::new(
            kind,
            format!("Checking if at least {min_pods} {role} pods are running on different nodes"),
        );

        let census = self
            .census_or_empty(&mut check, &self.namespaces.cluster, role)
            .await;

        if census.distinct_nodes() < role.min_pods() {
            check.push(Finding::warning(format!(
                "At least {min_pods} {role} pods should be running on different nodes"
            )));
        }

        for pod in census.pods() {
            check.push_pod(pod.clone());
        }
        check
    }

    /// Classify the overall health reported by the monitors.
    pub async fn check_quorum(&self) -> CheckReport {
        let mut check = CheckReport::new(
            CheckKind::MonQuorum,
            "Checking mon quorum and ceph health details",
        );

        match self.status().await {
            Ok(snapshot) => check.push(classify_health(&snapshot.health)),
            Err(e) => check.push(status_failure(&e)),
        }
        check
    }

    /// List every pod in the operator and cluster namespaces by phase.
    pub async fn check_pod_status(&self) -> CheckReport {
        let mut check = CheckReport::new(
            CheckKind::PodStatus,
            "Checking if all pods are in 'Running' status",
        );

        let mut census = PodCensus::default();
        for namespace in self.namespaces.distinct() {
            match take_census(self.pods, namespace, None).await {
                Ok(found) => census.extend(found),
                Err(e) => {
                    warn!(namespace = %namespace, error = %e, "Failed to list pods");
                    check.push(Finding::error(format!(
                        "Failed to list pods in namespace {namespace}: {e}"
                    )));
                }
            }
        }

        check.push_banner(Finding::info("Pods that are in 'Running' status"));
        for pod in census.running() {
            check.push_pod(pod.clone());
        }

        check.push_banner(Finding::warning("Pods that are 'Not' in 'Running' status"));
        for pod in census.not_running() {
            check.push_pod(pod.clone());
        }
        check
    }

    /// Classify each placement-group state from a fresh status query.
    pub async fn check_pg_status(&self) -> CheckReport {
        let mut check = CheckReport::new(CheckKind::PgStatus, "Checking placement group status");

        match self.status().await {
            Ok(snapshot) => {
                for finding in classify_pg_states(&snapshot.pgs_by_state) {
                    check.push(finding);
                }
            }
            Err(e) => check.push(status_failure(&e)),
        }
        check
    }

    /// Warn when no mgr pod exists, otherwise list them.
    pub async fn check_mgr_count(&self) -> CheckReport {
        let role = DaemonRole::Mgr;
        let min_pods = count_word(role.min_pods());
        let mut check = CheckReport::new(
            CheckKind::MgrCount,
            format!("Checking if at least {min_pods} {role} pod is running"),
        );

        let census = match role_census(self.pods, &self.namespaces.cluster, role).await {
            Ok(census) => census,
            Err(e) => {
                warn!(role = %role, error = %e, "Failed to list pods");
                check.push(Finding::error(format!(
                    "Failed to list {role} pods with label {}: {e}",
                    role.label_selector()
                )));
                return check;
            }
        };

        if census.len() < role.min_pods() {
            check.push(Finding::warning(format!(
                "At least {min_pods} {role} pod should be running"
            )));
        }

        for pod in census.pods() {
            check.push_pod(pod.clone());
        }
        check
    }

    async fn census_or_empty(
        &self,
        check: &mut CheckReport,
        namespace: &str,
        role: DaemonRole,
    ) -> PodCensus {
        match role_census(self.pods, namespace, role).await {
            Ok(census) => census,
            Err(e) => {
                warn!(role = %role, error = %e, "Failed to list pods, continuing with none");
                check.push(Finding::error(format!(
                    "Failed to list {role} pods with label {}: {e}",
                    role.label_selector()
                )));
                PodCensus::default()
            }
        }
    }

    async fn status(&self) -> Result<ClusterStatusSnapshot, HealthError> {
        let result = fetch_status(
            self.runner,
            &self.namespaces.operator,
            &self.namespaces.cluster,
        )
        .await;
        if let Err(e) = &result {
            warn!(error = %e, "Ceph status unavailable");
        }
        result
    }
}

/// Decode failures mean the check has no verdict; transport failures are errors.
fn status_failure(err: &HealthError) -> Finding {
    if err.is_decode() {
        Finding::fatal(format!("{err}; health is unknown"))
    } else {
        Finding::error(format!("Failed to fetch ceph status: {err}"))
    }
}

fn count_word(n: usize) -> String {
    match n {
        1 => "one".to_string(),
        2 => "two".to_string(),
        3 => "three".to_string(),
        n => n.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_failure_severity() {
        let err = serde_json::from_str::<serde_json::Value>("nope").unwrap_err();
        let decode = HealthError::from(err);
        let finding = status_failure(&decode);
        assert_eq!(finding.severity, crate::report::Severity::Fatal);
        assert!(finding.message.ends_with("health is unknown"));

        let transport = HealthError::Exec {
            pod: "op".to_string(),
            message: "timed out".to_string(),
        };
        let finding = status_failure(&transport);
        assert_eq!(finding.severity, crate::report::Severity::Error);
        assert_eq!(
            finding.message,
            "Failed to fetch ceph status: Command failed in pod op: timed out"
        );
    }

    #[test]
    fn test_count_word() {
        assert_eq!(count_word(1), "one");
        assert_eq!(count_word(3), "three");
        assert_eq!(count_word(5), "5");
    }
}
