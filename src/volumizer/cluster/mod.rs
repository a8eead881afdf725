//! # Cluster Clients
//!
//! Every side effect the reconciler has goes through one of the traits in this module.
//! The command layer never shells out itself.
//!
//! - [`VolumeManager`]: volume info, create, mount, remove and listing.
//! - [`OwnershipClient`]: recursive `chown` on a mounted path.
//! - [`LeaderCheck`]: whether this node may run a pass at all.
//!
//! ## Typed Responses
//!
//! The volume manager speaks in strings (`"0"`, `"1"`, `"No such volume"`). Those are
//! parsed inside the client implementation; callers only ever see [`InfoResponse`] or a
//! [`VolumizerError::RemoteCall`](crate::error::VolumizerError::RemoteCall).
//!
//! ## Implementations
//!
//! - [`maprcli::MaprCli`]: production client driving the `maprcli` binary. Also answers
//!   [`LeaderCheck`] by comparing the CLDB master with this host's FQDN.
//! - [`hadoop::HadoopFs`]: production ownership client driving `hadoop fs -chown`.
//! - [`memory::InMemoryCluster`]: implements all three traits in memory, records every
//!   call and can inject failures. Used by the command tests.

use crate::error::Result;
use serde::Serialize;

pub mod hadoop;
pub mod maprcli;
pub mod memory;
pub(crate) mod process;

/// What the volume manager knows about a volume name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfoResponse {
    /// The manager reported "no such volume". Expected, not an error.
    NotFound,
    /// The volume exists; the flag is its mount state.
    Mounted(bool),
}

/// Source of a mirror volume on a remote cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MirrorSource {
    pub volume: String,
    pub cluster: String,
    pub schedule: Option<String>,
}

impl MirrorSource {
    /// The `volume@cluster` reference the volume manager expects.
    pub fn reference(&self) -> String {
        format!("{}@{}", self.volume, self.cluster)
    }
}

/// Everything needed to create one volume instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateRequest {
    pub name: String,
    pub path: String,
    pub replication: u32,
    pub min_replication: u32,
    /// Root directory mode; only applied to standard volumes
    pub mode: Option<String>,
    pub mirror: Option<MirrorSource>,
}

pub trait VolumeManager {
    /// Look up a volume by name.
    fn info(&self, name: &str) -> Result<InfoResponse>;

    /// Create a volume, creating parent directories of its path as needed.
    fn create(&self, request: &CreateRequest) -> Result<()>;

    /// Mount an existing volume at `path`.
    fn mount(&self, name: &str, path: &str) -> Result<()>;

    /// Force-remove a volume.
    fn remove(&self, name: &str) -> Result<()>;

    /// Names of volumes on `cluster` whose mount path is exactly `path`.
    fn list_by_path(&self, cluster: &str, path: &str) -> Result<Vec<String>>;
}

pub trait OwnershipClient {
    fn chown(&self, path: &str, owner: &str, group: &str, recursive: bool) -> Result<()>;
}

pub trait LeaderCheck {
    /// True when this node is the one allowed to run a pass.
    fn is_primary_node(&self) -> Result<bool>;
}

impl<T: VolumeManager + ?Sized> VolumeManager for &T {
    fn info(&self, name: &str) -> Result<InfoResponse> {
        (**self).info(name)
    }

    fn create(&self, request: &CreateRequest) -> Result<()> {
        (**self).create(request)
    }

    fn mount(&self, name: &str, path: &str) -> Result<()> {
        (**self).mount(name, path)
    }

    fn remove(&self, name: &str) -> Result<()> {
        (**self).remove(name)
    }

    fn list_by_path(&self, cluster: &str, path: &str) -> Result<Vec<String>> {
        (**self).list_by_path(cluster, path)
    }
}

impl<T: OwnershipClient + ?Sized> OwnershipClient for &T {
    fn chown(&self, path: &str, owner: &str, group: &str, recursive: bool) -> Result<()> {
        (**self).chown(path, owner, group, recursive)
    }
}

impl<T: LeaderCheck + ?Sized> LeaderCheck for &T {
    fn is_primary_node(&self) -> Result<bool> {
        (**self).is_primary_node()
    }
}
