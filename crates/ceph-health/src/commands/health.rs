//! Health command - inspect mon/osd/mgr placement, pod status and PG states.

use anyhow::Result;
use clap::Args;
use tracing::info;

use crate::config::ConnectionArgs;
use crate::exec::KubeExecRunner;
use crate::health::HealthEvaluator;
use crate::pods::KubePodLister;
use crate::report::{ConsoleSink, Severity};
use crate::ui;

/// Run the Ceph cluster health checks.
#[derive(Debug, Args)]
pub struct HealthCommand {
    /// Output report as JSON.
    #[arg(long, default_value = "false")]
    json: bool,
}

impl HealthCommand {
    /// Run the health command.
    ///
    /// # Errors
    ///
    /// Returns an error if no Kubernetes client can be built or the JSON
    /// report cannot be serialized. Failed checks are reported, not returned.
    pub async fn run(&self, connection: &ConnectionArgs) -> Result<()> {
        let namespaces = connection.namespaces();
        let client = connection.client().await?;

        info!(
            "Checking ceph health (operator namespace: {}, cluster namespace: {})",
            namespaces.operator, namespaces.cluster
        );

        let pods = KubePodLister::new(client.clone());
        let runner = KubeExecRunner::new(client);
        let report = HealthEvaluator::new(&pods, &runner, &namespaces)
            .run()
            .await;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            report.render(&mut ConsoleSink::new());
            ui::print_summary(
                report.count(Severity::Warning),
                report.count(Severity::Error),
                report.count(Severity::Fatal),
            );
        }

        Ok(())
    }
}
