//! Running Ceph commands inside Rook pods.
//!
//! Commands are executed over the Kubernetes exec websocket in either the
//! operator pod (which holds the admin keyring for every cluster it manages)
//! or a specific OSD pod for `ceph daemon osd.N` admin-socket calls.

use async_trait::async_trait;
use k8s_openapi::api::core::v1::Pod;
use kube::{
    api::{Api, AttachParams, ListParams},
    Client,
};
use tokio::io::AsyncReadExt;
use tracing::{debug, info};

use crate::error::HealthError;
use crate::status::ClusterStatusSnapshot;

/// Label of the Rook operator deployment's pods.
pub const OPERATOR_SELECTOR: &str = "app=rook-ceph-operator";

/// Container name inside the operator pod.
pub const OPERATOR_CONTAINER: &str = "rook-ceph-operator";

/// Container name inside OSD pods.
pub const OSD_CONTAINER: &str = "osd";

/// Seconds the ceph CLI waits for the monitors.
pub const CEPH_CONNECT_TIMEOUT_SECS: u32 = 10;

/// Commands that need the cluster's config and keyring from the operator pod.
const CLUSTER_CLIENT_COMMANDS: &[&str] = &["ceph", "rbd", "rados"];

/// Runs commands in the storage cluster's pods.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `command args..` in the operator pod against `cluster_namespace`.
    async fn run_in_operator(
        &self,
        command: &str,
        args: &[String],
        operator_namespace: &str,
        cluster_namespace: &str,
    ) -> Result<String, HealthError>;

    /// Run a shell command line in the pod of OSD `osd_id`.
    async fn run_in_osd(
        &self,
        osd_id: &str,
        command_line: &str,
        cluster_namespace: &str,
    ) -> Result<String, HealthError>;
}

/// Build the argv for a command run from the operator pod.
///
/// Cluster clients get the connect timeout and the config/keyring Rook
/// writes for `cluster_namespace` under `/var/lib/rook`.
pub fn operator_command(command: &str, args: &[String], cluster_namespace: &str) -> Vec<String> {
    let mut argv = Vec::with_capacity(args.len() + 4);
    argv.push(command.to_string());
    argv.extend(args.iter().cloned());

    if CLUSTER_CLIENT_COMMANDS.contains(&command) {
        argv.push(format!("--connect-timeout={CEPH_CONNECT_TIMEOUT_SECS}"));
        argv.push(format!(
            "--conf=/var/lib/rook/{cluster_namespace}/{cluster_namespace}.config"
        ));
        argv.push(format!(
            "--keyring=/var/lib/rook/{cluster_namespace}/client.admin.keyring"
        ));
    }

    argv
}

/// Label selecting the pod of a single OSD, from an id like `osd.3` or `3`.
pub fn osd_selector(osd_id: &str) -> String {
    let id = osd_id.strip_prefix("osd.").unwrap_or(osd_id);
    format!("ceph-osd-id={id}")
}

/// Fetch and decode `ceph status` through the operator pod.
pub async fn fetch_status(
    runner: &dyn CommandRunner,
    operator_namespace: &str,
    cluster_namespace: &str,
) -> Result<ClusterStatusSnapshot, HealthError> {
    let args = ["-s", "--format", "json"].map(String::from);
    let raw = runner
        .run_in_operator("ceph", &args, operator_namespace, cluster_namespace)
        .await?;
    ClusterStatusSnapshot::decode(&raw)
}

/// `CommandRunner` that execs into pods through the Kubernetes API.
#[derive(Clone)]
pub struct KubeExecRunner {
    client: Client,
}

impl KubeExecRunner {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Name of the first Running pod matching `selector`.
    async fn running_pod(&self, namespace: &str, selector: &str) -> Result<String, HealthError> {
        let pods: Api<Pod> = Api::namespaced(self.client.clone(), namespace);
        let pod_list = pods.list(&ListParams::default().labels(selector)).await?;

        pod_list
            .items
            .into_iter()
            .find(|pod| {
                pod.status
                    .as_ref()
                    .and_then(|s| s.phase.as_deref())
                    == Some("Running")
            })
            .and_then(|pod| pod.metadata.name)
            .ok_or_else(|| HealthError::PodNotRunning {
                namespace: namespace.to_string(),
                selector: selector.to_string(),
            })
    }

    /// Exec `argv` in `pod_name` and return stdout.
    async fn exec(
        &self,
        namespace: &str,
        pod_name: &str,
        container: &str,
        argv: Vec<String>,
    ) -> Result<String, HealthError> {
        debug!(pod = %pod_name, namespace = %namespace, command = ?argv, "Executing in pod");

        let pods: Api<Pod> = Api::namespaced(self.client.clone(), namespace);
        let params = AttachParams::default()
            .container(container)
            .stdout(true)
            .stderr(true);
        let mut attached = pods.exec(pod_name, argv, &params).await?;

        let exec_failed = |message: String| HealthError::Exec {
            pod: pod_name.to_string(),
            message,
        };

        let mut stdout_reader = attached
            .stdout()
            .ok_or_else(|| exec_failed("stdout was not attached".to_string()))?;
        let mut stderr_reader = attached
            .stderr()
            .ok_or_else(|| exec_failed("stderr was not attached".to_string()))?;
        let status = attached.take_status();

        let mut stdout = String::new();
        let mut stderr = String::new();
        tokio::try_join!(
            stdout_reader.read_to_string(&mut stdout),
            stderr_reader.read_to_string(&mut stderr),
        )?;

        if let Some(status) = status {
            if let Some(status) = status.await {
                if status.status.as_deref() == Some("Failure") {
                    let message = if stderr.trim().is_empty() {
                        status.message.unwrap_or_else(|| "unknown failure".to_string())
                    } else {
                        stderr.trim().to_string()
                    };
                    return Err(exec_failed(message));
                }
            }
        }

        attached
            .join()
            .await
            .map_err(|e| exec_failed(e.to_string()))?;

        Ok(stdout)
    }
}

#[async_trait]
impl CommandRunner for KubeExecRunner {
    async fn run_in_operator(
        &self,
        command: &str,
        args: &[String],
        operator_namespace: &str,
        cluster_namespace: &str,
    ) -> Result<String, HealthError> {
        let pod = self
            .running_pod(operator_namespace, OPERATOR_SELECTOR)
            .await?;
        let argv = operator_command(command, args, cluster_namespace);
        self.exec(operator_namespace, &pod, OPERATOR_CONTAINER, argv)
            .await
    }

    async fn run_in_osd(
        &self,
        osd_id: &str,
        command_line: &str,
        cluster_namespace: &str,
    ) -> Result<String, HealthError> {
        let selector = osd_selector(osd_id);
        let pod = self.running_pod(cluster_namespace, &selector).await?;
        info!(pod = %pod, "Running command in OSD pod");
        let argv = vec![
            "/bin/bash".to_string(),
            "-c".to_string(),
            command_line.to_string(),
        ];
        self.exec(cluster_namespace, &pod, OSD_CONTAINER, argv).await
    }
}
