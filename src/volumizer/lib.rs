//! # Volumizer Architecture
//!
//! Volumizer keeps a MapR cluster's volume layout in step with a declared list of volumes.
//! Each pass provisions the instances a spec needs around today's date (plus a scratch
//! instance for rotated specs), then removes dated instances that fell out of retention.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Config loading, logging setup, PID lock, leader check    │
//! │  - The ONLY place that knows about stdout/exit codes        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade holding the volume set and pass settings     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - probe, resolve, permissions, reconcile, sweep, plan      │
//! │  - Returns per-instance outcomes; never aborts a pass       │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Cluster Layer (cluster/)                                   │
//! │  - VolumeManager / OwnershipClient / LeaderCheck traits     │
//! │  - maprcli + hadoop (production), InMemoryCluster (testing) │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Date arithmetic lives in [`window`] and is pure: given a calendar date and a padding it
//! yields the suffix pairs a pass visits, so both directions of the lifecycle are testable
//! without a cluster.
//!
//! ## Testing Strategy
//!
//! Command modules carry most of the tests, run against [`cluster::memory::InMemoryCluster`].
//! The API tests check dispatch and ordering. `tests/cli.rs` drives the binary through the
//! subcommands that never reach the cluster.
//!
//! ## Module Overview
//!
//! - [`api`]: facade used by the CLI
//! - [`commands`]: the lifecycle operations
//! - [`cluster`]: volume manager, ownership and leadership backends
//! - [`config`]: TOML configuration and volume validation
//! - [`model`]: volume specs, instances and statuses
//! - [`window`]: provisioning and retention windows
//! - [`users`]: per-user home volumes from a Unix group
//! - [`lock`]: PID file guard
//! - [`logging`]: tracing subscriber setup
//! - [`error`]: error types

pub mod api;
pub mod cluster;
pub mod commands;
pub mod config;
pub mod error;
pub mod lock;
pub mod logging;
pub mod model;
pub mod users;
pub mod window;

#[cfg(test)]
pub(crate) mod test_utils;
