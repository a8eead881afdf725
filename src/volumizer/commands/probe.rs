use crate::cluster::{InfoResponse, VolumeManager};
use crate::model::VolumeStatus;
use tracing::debug;

/// Observes the current status of a volume.
///
/// Never fails: an error from the volume manager becomes [`VolumeStatus::Failed`], so
/// callers branch on exactly four states.
pub fn run<M: VolumeManager>(manager: &M, name: &str) -> VolumeStatus {
    let status = match manager.info(name) {
        Ok(InfoResponse::NotFound) => VolumeStatus::Absent,
        Ok(InfoResponse::Mounted(false)) => VolumeStatus::Exists,
        Ok(InfoResponse::Mounted(true)) => VolumeStatus::Mounted,
        Err(e) => VolumeStatus::Failed(e.to_string()),
    };
    debug!(volume = name, %status, "Probed volume status");
    status
}
