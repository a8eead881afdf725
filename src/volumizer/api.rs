//! # API Facade
//!
//! A thin facade over the command layer, holding what every pass shares: the cluster
//! backends, the validated [`VolumeSet`], the padding and the mirror ambiguity policy.
//!
//! The facade does no business logic and no presentation. Every method takes the calendar
//! date explicitly, so callers pick the timezone and tests pin the date.
//!
//! `VolumizerApi` is generic over the cluster traits:
//! - Production: `VolumizerApi<MaprCli, HadoopFs>`
//! - Testing: `VolumizerApi<InMemoryCluster, InMemoryCluster>` (or shared references)

use crate::cluster::{LeaderCheck, OwnershipClient, VolumeManager};
use crate::commands;
use crate::commands::plan::Plan;
use crate::commands::resolve::AmbiguityPolicy;
use crate::error::Result;
use crate::model::VolumeSet;
use crate::window::provisioning_window;
use chrono::NaiveDate;
use tracing::info;

pub use crate::commands::{Action, CmdMessage, InstanceOutcome, MessageLevel, PassReport};

pub struct VolumizerApi<M, P> {
    manager: M,
    ownership: P,
    specs: VolumeSet,
    padding: u32,
    mirror_ambiguity: AmbiguityPolicy,
}

impl<M, P> VolumizerApi<M, P>
where
    M: VolumeManager + LeaderCheck,
    P: OwnershipClient,
{
    pub fn new(manager: M, ownership: P, specs: VolumeSet, padding: u32) -> Self {
        Self {
            manager,
            ownership,
            specs,
            padding,
            mirror_ambiguity: AmbiguityPolicy::default(),
        }
    }

    pub fn with_mirror_ambiguity(mut self, policy: AmbiguityPolicy) -> Self {
        self.mirror_ambiguity = policy;
        self
    }

    pub fn is_primary_node(&self) -> Result<bool> {
        self.manager.is_primary_node()
    }

    pub fn reconcile(&self, today: NaiveDate) -> Vec<InstanceOutcome> {
        let window = provisioning_window(today, self.padding);
        commands::reconcile::run(
            &self.manager,
            &self.ownership,
            &self.specs,
            &window,
            self.mirror_ambiguity,
        )
    }

    pub fn sweep(&self, today: NaiveDate) -> Vec<InstanceOutcome> {
        commands::sweep::run(&self.manager, &self.specs, today, self.padding)
    }

    /// Reconciles, then sweeps. Per-instance failures are recorded in the report.
    pub fn run_pass(&self, today: NaiveDate) -> PassReport {
        info!(%today, volumes = self.specs.len(), padding = self.padding, "Starting pass");
        let reconciled = self.reconcile(today);
        let swept = self.sweep(today);
        let report = PassReport { reconciled, swept };
        info!(
            created = report.count(Action::Created),
            mounted = report.count(Action::Mounted),
            removed = report.count(Action::Removed),
            failed = report.count(Action::Failed),
            "Pass finished"
        );
        report
    }

    pub fn plan(&self, today: NaiveDate) -> Plan {
        commands::plan::run(&self.specs, today, self.padding)
    }
}
