//! CLI subcommands.

pub mod ceph;
pub mod health;
