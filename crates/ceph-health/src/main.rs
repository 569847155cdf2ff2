//! Rook/Ceph health CLI.
//!
//! Runs health checks against a Ceph cluster managed by Rook and passes
//! arbitrary `ceph` commands through to the operator pod.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use ceph_health::commands::ceph::CephCommand;
use ceph_health::commands::health::HealthCommand;
use ceph_health::config::ConnectionArgs;

/// Rook/Ceph cluster health inspector.
#[derive(Parser)]
#[command(
    name = "ceph-health",
    version,
    about = "Rook/Ceph cluster health inspector",
    long_about = "Inspect the health of a Ceph cluster deployed by Rook.\n\n\
                  Checks mon and OSD placement across nodes, mon quorum and\n\
                  overall ceph health, pod status in the operator and cluster\n\
                  namespaces, placement group states, and mgr availability."
)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(flatten)]
    connection: ConnectionArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check the health of the Ceph cluster.
    ///
    /// Runs every check in one pass and reports findings as info, warning,
    /// error or fatal lines followed by the pods involved.
    Health(HealthCommand),

    /// Call a 'ceph' CLI command with arbitrary args.
    Ceph(CephCommand),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose {
        EnvFilter::new("info,ceph_health=debug")
    } else {
        EnvFilter::new("warn,ceph_health=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Health(cmd) => cmd.run(&cli.connection).await,
        Commands::Ceph(cmd) => cmd.run(&cli.connection).await,
    }
}
