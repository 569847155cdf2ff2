//! Connection and namespace configuration.

use std::path::PathBuf;

use clap::Args;
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Client, Config};
use serde::Serialize;
use tracing::debug;

use crate::error::HealthError;

/// Namespace Rook is installed into by default.
pub const DEFAULT_NAMESPACE: &str = "rook-ceph";

/// Namespaces holding the Rook operator and the Ceph cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Namespaces {
    pub operator: String,
    pub cluster: String,
}

impl Namespaces {
    pub fn new(operator: impl Into<String>, cluster: impl Into<String>) -> Self {
        Self {
            operator: operator.into(),
            cluster: cluster.into(),
        }
    }

    /// Both namespaces when they differ, otherwise just one.
    pub fn distinct(&self) -> Vec<&str> {
        if self.operator == self.cluster {
            vec![self.operator.as_str()]
        } else {
            vec![self.operator.as_str(), self.cluster.as_str()]
        }
    }
}

impl Default for Namespaces {
    fn default() -> Self {
        Self::new(DEFAULT_NAMESPACE, DEFAULT_NAMESPACE)
    }
}

/// Options selecting the cluster and the Rook namespaces.
#[derive(Debug, Clone, Args)]
pub struct ConnectionArgs {
    /// Path to kubeconfig file (defaults to in-cluster or ~/.kube/config).
    #[arg(long, env = "KUBECONFIG", global = true)]
    pub kubeconfig: Option<PathBuf>,

    /// Kubeconfig context to use.
    #[arg(long, global = true)]
    pub context: Option<String>,

    /// Namespace of the CephCluster.
    #[arg(
        short = 'n',
        long = "namespace",
        env = "ROOK_CLUSTER_NAMESPACE",
        default_value = DEFAULT_NAMESPACE,
        global = true
    )]
    pub cluster_namespace: String,

    /// Namespace of the Rook operator (defaults to the cluster namespace).
    #[arg(long, env = "ROOK_OPERATOR_NAMESPACE", global = true)]
    pub operator_namespace: Option<String>,
}

impl ConnectionArgs {
    /// Resolve the operator/cluster namespace pair.
    pub fn namespaces(&self) -> Namespaces {
        let operator = self
            .operator_namespace
            .clone()
            .unwrap_or_else(|| self.cluster_namespace.clone());
        Namespaces::new(operator, self.cluster_namespace.clone())
    }

    /// Build a Kubernetes client from the explicit kubeconfig/context, or infer one.
    pub async fn client(&self) -> Result<Client, HealthError> {
        let options = KubeConfigOptions {
            context: self.context.clone(),
            ..Default::default()
        };

        let config = if let Some(path) = &self.kubeconfig {
            debug!(path = %path.display(), "Loading kubeconfig");
            let kubeconfig = Kubeconfig::read_from(path)?;
            Config::from_custom_kubeconfig(kubeconfig, &options).await?
        } else if self.context.is_some() {
            Config::from_kubeconfig(&options).await?
        } else {
            Config::infer().await?
        };

        Ok(Client::try_from(config)?)
    }
}
