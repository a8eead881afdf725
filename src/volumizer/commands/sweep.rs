use super::{probe, Action, CmdMessage, InstanceOutcome};
use crate::cluster::VolumeManager;
use crate::model::{VolumeInstance, VolumeSet, VolumeSpec, VolumeStatus};
use crate::window::retention_window;
use chrono::NaiveDate;
use tracing::{debug, error, info};

/// Removes instances that aged out of their retention window.
///
/// Hourly specs are swept before daily specs. Static specs and specs with a retention of
/// `-1` are never touched.
pub fn run<M: VolumeManager>(
    manager: &M,
    specs: &VolumeSet,
    today: NaiveDate,
    padding: u32,
) -> Vec<InstanceOutcome> {
    specs
        .hourly()
        .iter()
        .chain(specs.daily())
        .flat_map(|spec| sweep_spec(manager, spec, today, padding))
        .collect()
}

pub fn sweep_spec<M: VolumeManager>(
    manager: &M,
    spec: &VolumeSpec,
    today: NaiveDate,
    padding: u32,
) -> Vec<InstanceOutcome> {
    if !spec.expires() {
        debug!(volume = %spec.name, "Volume is exempt from retention");
        return Vec::new();
    }

    retention_window(spec, today, padding)
        .iter()
        .map(|pair| sweep_instance(manager, spec.instance(&pair.volume, &pair.path)))
        .collect()
}

/// Removes one instance if it is present. An indeterminate status is never removed.
pub fn sweep_instance<M: VolumeManager>(manager: &M, instance: VolumeInstance) -> InstanceOutcome {
    match probe::run(manager, &instance.name) {
        VolumeStatus::Absent => {
            info!(volume = %instance.name, "Verified volume does not exist");
            InstanceOutcome::new(instance, Action::Absent)
        }
        VolumeStatus::Exists | VolumeStatus::Mounted => {
            info!(volume = %instance.name, "Removing volume");
            match manager.remove(&instance.name) {
                Ok(()) => InstanceOutcome::new(instance, Action::Removed),
                Err(e) => {
                    error!(volume = %instance.name, error = %e, "Volume removal failed");
                    InstanceOutcome::new(instance, Action::Failed)
                        .with_message(CmdMessage::error(e.to_string()))
                }
            }
        }
        VolumeStatus::Failed(reason) => {
            error!(volume = %instance.name, %reason, "Checking volume status failed");
            InstanceOutcome::new(instance, Action::Failed)
                .with_message(CmdMessage::error(format!("status check failed: {}", reason)))
        }
    }
}
