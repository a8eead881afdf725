use crate::cluster::OwnershipClient;
use crate::error::Result;
use tracing::{error, info};

/// Recursively sets `owner:owner` on the mount path of `volume`. The group always mirrors
/// the owner name.
///
/// Failures are logged here and returned; callers treat them as advisory.
pub fn run<P: OwnershipClient>(client: &P, volume: &str, path: &str, owner: &str) -> Result<()> {
    info!(volume, path, owner, "Setting volume owner and group");
    client.chown(path, owner, owner, true).map_err(|e| {
        error!(volume, path, owner, error = %e, "Setting volume ownership failed");
        e
    })
}
