use super::{CreateRequest, InfoResponse, LeaderCheck, OwnershipClient, VolumeManager};
use crate::error::{Result, VolumizerError};
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap};

/// A call made against the in-memory cluster, in the order it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Info(String),
    Create(CreateRequest),
    Mount { name: String, path: String },
    Remove(String),
    ListByPath { cluster: String, path: String },
    Chown { path: String, owner: String, group: String, recursive: bool },
    PrimaryCheck,
}

/// Operations that can be made to fail on purpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailOp {
    Info,
    Create,
    Mount,
    Remove,
    ListByPath,
    Chown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredVolume {
    pub path: String,
    pub mounted: bool,
    pub source: Option<String>,
}

/// In-memory cluster for testing.
///
/// Implements [`VolumeManager`], [`OwnershipClient`] and [`LeaderCheck`]. Uses `RefCell`
/// for interior mutability since a pass is single-threaded, which lets the traits take
/// `&self` everywhere.
pub struct InMemoryCluster {
    volumes: RefCell<BTreeMap<String, StoredVolume>>,
    /// cluster name -> (volume name, mount path)
    remote: RefCell<HashMap<String, Vec<(String, String)>>>,
    failures: RefCell<HashMap<(FailOp, String), String>>,
    calls: RefCell<Vec<Call>>,
    mount_on_create: Cell<bool>,
    primary: Cell<bool>,
}

impl Default for InMemoryCluster {
    fn default() -> Self {
        Self {
            volumes: RefCell::new(BTreeMap::new()),
            remote: RefCell::new(HashMap::new()),
            failures: RefCell::new(HashMap::new()),
            calls: RefCell::new(Vec::new()),
            mount_on_create: Cell::new(true),
            primary: Cell::new(true),
        }
    }
}

impl InMemoryCluster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `create` mounts the new volume at its path, as `maprcli` does.
    pub fn set_mount_on_create(&self, mount: bool) {
        self.mount_on_create.set(mount);
    }

    pub fn set_primary(&self, primary: bool) {
        self.primary.set(primary);
    }

    /// Seed a local volume.
    pub fn add_volume(&self, name: &str, path: &str, mounted: bool) {
        self.volumes.borrow_mut().insert(
            name.to_string(),
            StoredVolume {
                path: path.to_string(),
                mounted,
                source: None,
            },
        );
    }

    /// Seed a volume on a remote cluster, for mirror source lookups.
    pub fn add_remote_volume(&self, cluster: &str, name: &str, path: &str) {
        self.remote
            .borrow_mut()
            .entry(cluster.to_string())
            .or_default()
            .push((name.to_string(), path.to_string()));
    }

    /// Make `op` fail with `message` whenever it targets `target`.
    ///
    /// The target is the volume name, except for `ListByPath` (the cluster) and
    /// `Chown` (the path).
    pub fn fail(&self, op: FailOp, target: &str, message: &str) {
        self.failures
            .borrow_mut()
            .insert((op, target.to_string()), message.to_string());
    }

    pub fn clear_failures(&self) {
        self.failures.borrow_mut().clear();
    }

    pub fn volume(&self, name: &str) -> Option<StoredVolume> {
        self.volumes.borrow().get(name).cloned()
    }

    pub fn volume_names(&self) -> Vec<String> {
        self.volumes.borrow().keys().cloned().collect()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    pub fn create_calls(&self) -> Vec<CreateRequest> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|c| match c {
                Call::Create(req) => Some(req.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn mount_calls(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|c| match c {
                Call::Mount { name, .. } => Some(name.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn remove_calls(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|c| match c {
                Call::Remove(name) => Some(name.clone()),
                _ => None,
            })
            .collect()
    }

    /// Paths passed to `chown`, in call order.
    pub fn chown_calls(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|c| match c {
                Call::Chown { path, .. } => Some(path.clone()),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }

    fn check_failure(&self, op: FailOp, target: &str, command: &str) -> Result<()> {
        match self.failures.borrow().get(&(op, target.to_string())) {
            Some(message) => Err(VolumizerError::remote(command, message.clone())),
            None => Ok(()),
        }
    }

    fn no_such_volume(command: &str, name: &str) -> VolumizerError {
        VolumizerError::remote(command, format!("No such volume: {}", name))
    }
}

impl VolumeManager for InMemoryCluster {
    fn info(&self, name: &str) -> Result<InfoResponse> {
        self.record(Call::Info(name.to_string()));
        self.check_failure(FailOp::Info, name, "volume info")?;

        Ok(match self.volumes.borrow().get(name) {
            Some(volume) => InfoResponse::Mounted(volume.mounted),
            None => InfoResponse::NotFound,
        })
    }

    fn create(&self, request: &CreateRequest) -> Result<()> {
        self.record(Call::Create(request.clone()));
        self.check_failure(FailOp::Create, &request.name, "volume create")?;

        let mut volumes = self.volumes.borrow_mut();
        if volumes.contains_key(&request.name) {
            return Err(VolumizerError::remote(
                "volume create",
                format!("Volume Name {} already in use", request.name),
            ));
        }
        volumes.insert(
            request.name.clone(),
            StoredVolume {
                path: request.path.clone(),
                mounted: self.mount_on_create.get(),
                source: request.mirror.as_ref().map(|m| m.reference()),
            },
        );
        Ok(())
    }

    fn mount(&self, name: &str, path: &str) -> Result<()> {
        self.record(Call::Mount {
            name: name.to_string(),
            path: path.to_string(),
        });
        self.check_failure(FailOp::Mount, name, "volume mount")?;

        let mut volumes = self.volumes.borrow_mut();
        let volume = volumes
            .get_mut(name)
            .ok_or_else(|| Self::no_such_volume("volume mount", name))?;
        volume.path = path.to_string();
        volume.mounted = true;
        Ok(())
    }

    fn remove(&self, name: &str) -> Result<()> {
        self.record(Call::Remove(name.to_string()));
        self.check_failure(FailOp::Remove, name, "volume remove")?;

        self.volumes
            .borrow_mut()
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| Self::no_such_volume("volume remove", name))
    }

    fn list_by_path(&self, cluster: &str, path: &str) -> Result<Vec<String>> {
        self.record(Call::ListByPath {
            cluster: cluster.to_string(),
            path: path.to_string(),
        });
        self.check_failure(FailOp::ListByPath, cluster, "volume list")?;

        Ok(self
            .remote
            .borrow()
            .get(cluster)
            .map(|volumes| {
                volumes
                    .iter()
                    .filter(|(_, p)| p == path)
                    .map(|(name, _)| name.clone())
                    .collect()
            })
            .unwrap_or_default())
    }
}

impl OwnershipClient for InMemoryCluster {
    fn chown(&self, path: &str, owner: &str, group: &str, recursive: bool) -> Result<()> {
        self.record(Call::Chown {
            path: path.to_string(),
            owner: owner.to_string(),
            group: group.to_string(),
            recursive,
        });
        self.check_failure(FailOp::Chown, path, "fs -chown")
            .map_err(|e| VolumizerError::Permission(e.to_string()))
    }
}

impl LeaderCheck for InMemoryCluster {
    fn is_primary_node(&self) -> Result<bool> {
        self.record(Call::PrimaryCheck);
        Ok(self.primary.get())
    }
}
