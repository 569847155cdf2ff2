//! Rook/Ceph cluster health inspector.
//!
//! Inspects a Ceph cluster deployed by Rook: checks that mons and OSDs are
//! spread across nodes, classifies overall health and placement-group states
//! from `ceph status`, and reports pods that are not running.
//!
//! # Example
//!
//! ```ignore
//! use ceph_health::{ConnectionArgs, HealthEvaluator, KubeExecRunner, KubePodLister};
//!
//! async fn check(args: &ConnectionArgs) -> anyhow::Result<()> {
//!     let client = args.client().await?;
//!     let namespaces = args.namespaces();
//!     let pods = KubePodLister::new(client.clone());
//!     let runner = KubeExecRunner::new(client);
//!     let report = HealthEvaluator::new(&pods, &runner, &namespaces).run().await;
//!     println!("{}", serde_json::to_string_pretty(&report)?);
//!     Ok(())
//! }
//! ```

// Allow product names without backticks in doc comments
#![allow(clippy::doc_markdown)]

pub mod census;
pub mod commands;
pub mod config;
pub mod error;
pub mod exec;
pub mod health;
pub mod pods;
pub mod report;
pub mod status;
pub mod ui;

// Re-export commonly used types at the crate root
pub use census::{DaemonRole, PodCensus};
pub use config::{ConnectionArgs, Namespaces};
pub use error::HealthError;
pub use exec::{CommandRunner, KubeExecRunner};
pub use health::HealthEvaluator;
pub use pods::{KubePodLister, PodLister, PodPhase, PodRecord};
pub use report::{CheckKind, CheckReport, Entry, Finding, HealthReport, ReportSink, Severity};
pub use status::{ClusterStatusSnapshot, HealthStatus, PgStateEntry};
