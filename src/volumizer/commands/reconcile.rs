//! Drives every volume instance in the provisioning window toward `Mounted`.
//!
//! ```text
//! Absent  --create-->  (Mounted)     standard: chown after create
//!                                    mirror: resolve source first, skip on failure
//! Exists  --mount--->  Mounted       standard: chown after mount
//! Mounted              no-op
//! Failed               skipped, logged
//! ```
//!
//! Status is re-probed right before acting on each instance, so running a pass twice
//! against an unchanged cluster issues no create or mount the second time.

use super::{permissions, probe, resolve, Action, CmdMessage, InstanceOutcome};
use crate::cluster::{CreateRequest, MirrorSource, OwnershipClient, VolumeManager};
use crate::commands::resolve::AmbiguityPolicy;
use crate::model::{VolumeSet, VolumeSpec, VolumeStatus};
use crate::window::DateWindow;
use tracing::{error, info};

/// Reconciles static volumes, then hourly instances, then daily instances.
pub fn run<M, P>(
    manager: &M,
    ownership: &P,
    specs: &VolumeSet,
    window: &DateWindow,
    policy: AmbiguityPolicy,
) -> Vec<InstanceOutcome>
where
    M: VolumeManager,
    P: OwnershipClient,
{
    let mut outcomes = Vec::new();

    for spec in specs.static_specs() {
        outcomes.push(reconcile_instance(manager, ownership, spec, "", "", policy));
    }

    for pair in window.hourly() {
        for spec in specs.hourly() {
            outcomes.push(reconcile_instance(
                manager,
                ownership,
                spec,
                &pair.volume,
                &pair.path,
                policy,
            ));
        }
    }

    for pair in window.daily() {
        for spec in specs.daily() {
            outcomes.push(reconcile_instance(
                manager,
                ownership,
                spec,
                &pair.volume,
                &pair.path,
                policy,
            ));
        }
    }

    outcomes
}

/// Reconciles a single instance of `spec`.
pub fn reconcile_instance<M, P>(
    manager: &M,
    ownership: &P,
    spec: &VolumeSpec,
    volume_suffix: &str,
    path_suffix: &str,
    policy: AmbiguityPolicy,
) -> InstanceOutcome
where
    M: VolumeManager,
    P: OwnershipClient,
{
    let instance = spec.instance(volume_suffix, path_suffix);

    match probe::run(manager, &instance.name) {
        VolumeStatus::Absent => {
            let mirror = if spec.is_mirror() {
                let source_path = format!("{}{}", spec.source_path, path_suffix);
                match resolve::run(manager, &spec.source_cluster, &source_path, policy) {
                    Ok(volume) => Some(MirrorSource {
                        volume,
                        cluster: spec.source_cluster.clone(),
                        schedule: spec.mirror_schedule().map(str::to_string),
                    }),
                    Err(e) => {
                        error!(volume = %instance.name, error = %e, "Remote volume lookup failed");
                        return InstanceOutcome::new(instance, Action::Failed)
                            .with_message(CmdMessage::error(e.to_string()));
                    }
                }
            } else {
                None
            };

            info!(volume = %instance.name, path = %instance.path, "Creating volume");
            let request = CreateRequest {
                name: instance.name.clone(),
                path: instance.path.clone(),
                replication: spec.replication,
                min_replication: spec.min_replication,
                mode: (!spec.is_mirror()).then(|| spec.mode.clone()),
                mirror,
            };
            if let Err(e) = manager.create(&request) {
                error!(volume = %instance.name, error = %e, "Volume creation failed");
                return InstanceOutcome::new(instance, Action::Failed)
                    .with_message(CmdMessage::error(e.to_string()));
            }

            let outcome = InstanceOutcome::new(instance, Action::Created);
            apply_ownership(ownership, spec, outcome)
        }
        VolumeStatus::Exists => {
            info!(volume = %instance.name, path = %instance.path, "Mounting volume");
            if let Err(e) = manager.mount(&instance.name, &instance.path) {
                error!(volume = %instance.name, error = %e, "Volume mount failed");
                return InstanceOutcome::new(instance, Action::Failed)
                    .with_message(CmdMessage::error(e.to_string()));
            }

            let outcome = InstanceOutcome::new(instance, Action::Mounted);
            apply_ownership(ownership, spec, outcome)
        }
        VolumeStatus::Mounted => {
            info!(volume = %instance.name, "Verified volume exists and is mounted");
            InstanceOutcome::new(instance, Action::Verified)
        }
        VolumeStatus::Failed(reason) => {
            error!(volume = %instance.name, %reason, "Checking volume status failed");
            InstanceOutcome::new(instance, Action::Failed)
                .with_message(CmdMessage::error(format!("status check failed: {}", reason)))
        }
    }
}

/// Standard volumes get their ownership (re)asserted; mirrors are read-only.
fn apply_ownership<P: OwnershipClient>(
    ownership: &P,
    spec: &VolumeSpec,
    outcome: InstanceOutcome,
) -> InstanceOutcome {
    if spec.is_mirror() {
        return outcome;
    }
    let instance = &outcome.instance;
    match permissions::run(ownership, &instance.name, &instance.path, &spec.owner) {
        Ok(()) => outcome,
        Err(e) => outcome.with_message(CmdMessage::warning(e.to_string())),
    }
}
