//! Ceph command - run an arbitrary `ceph` CLI command in the cluster.

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use crate::census::take_census;
use crate::config::{ConnectionArgs, Namespaces};
use crate::error::HealthError;
use crate::exec::{CommandRunner, KubeExecRunner, OPERATOR_SELECTOR};
use crate::pods::{KubePodLister, PodLister};

/// Call a 'ceph' CLI command with arbitrary args.
#[derive(Debug, Args)]
pub struct CephCommand {
    /// Arguments passed through to `ceph`.
    #[arg(
        required = true,
        num_args = 1..,
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    args: Vec<String>,
}

/// Where a `ceph` invocation has to run.
#[derive(Debug, PartialEq, Eq)]
pub enum CephTarget<'a> {
    /// The operator pod, using the cluster's admin keyring.
    Operator,
    /// The admin socket of a single OSD, e.g. `ceph daemon osd.3 status`.
    OsdDaemon(&'a str),
}

impl CephCommand {
    /// Decide which pod serves the given arguments.
    pub fn target(args: &[String]) -> CephTarget<'_> {
        match args {
            [first, second, ..] if first == "daemon" && second.starts_with("osd.") => {
                CephTarget::OsdDaemon(second)
            }
            _ => CephTarget::Operator,
        }
    }

    /// Run the ceph command.
    ///
    /// # Errors
    ///
    /// Returns an error if no running operator/OSD pod is found or the
    /// command fails.
    pub async fn run(&self, connection: &ConnectionArgs) -> Result<()> {
        let namespaces = connection.namespaces();
        let client = connection.client().await?;
        let pods = KubePodLister::new(client.clone());
        let runner = KubeExecRunner::new(client);

        info!("running 'ceph' command with args: {:?}", self.args);

        let output = self
            .execute(&pods, &runner, &namespaces)
            .await
            .with_context(|| match Self::target(&self.args) {
                CephTarget::OsdDaemon(osd_id) => {
                    format!("Failed to run ceph command in {osd_id} pod")
                }
                CephTarget::Operator => "Failed to run ceph command in operator pod".to_string(),
            })?;

        print!("{output}");
        Ok(())
    }

    /// Dispatch the arguments to the pod that serves them and return stdout.
    ///
    /// Admin-socket calls are only sent once a Running operator pod is found.
    pub async fn execute(
        &self,
        pods: &dyn PodLister,
        runner: &dyn CommandRunner,
        namespaces: &Namespaces,
    ) -> Result<String, HealthError> {
        match Self::target(&self.args) {
            CephTarget::OsdDaemon(osd_id) => {
                let operator =
                    take_census(pods, &namespaces.operator, Some(OPERATOR_SELECTOR)).await?;
                if operator.running().is_empty() {
                    return Err(HealthError::PodNotRunning {
                        namespace: namespaces.operator.clone(),
                        selector: OPERATOR_SELECTOR.to_string(),
                    });
                }
                runner
                    .run_in_osd(osd_id, &daemon_command_line(&self.args), &namespaces.cluster)
                    .await
            }
            CephTarget::Operator => {
                runner
                    .run_in_operator("ceph", &self.args, &namespaces.operator, &namespaces.cluster)
                    .await
            }
        }
    }
}

/// Shell line for an admin-socket call, every argument single-quoted.
fn daemon_command_line(args: &[String]) -> String {
    let quoted: Vec<String> = args.iter().map(String::as_str).map(shell_quote).collect();
    format!("CEPH_ARGS='' ceph {}", quoted.join(" "))
}

fn shell_quote(arg: &str) -> String {
    format!("'{}'", arg.replace('\'', r"'\''"))
}
