use crate::model::{Rotation, VolumeInstance, VolumeSet, VolumeSpec, VolumeType};
use crate::window::{provisioning_window, retention_range, retention_window};
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedInstance {
    pub instance: VolumeInstance,
    pub rotation: Rotation,
    pub volume_type: VolumeType,
    pub owner: String,
}

impl PlannedInstance {
    fn new(spec: &VolumeSpec, instance: VolumeInstance) -> Self {
        Self {
            instance,
            rotation: spec.rotation,
            volume_type: spec.volume_type,
            owner: spec.owner.clone(),
        }
    }
}

/// Retention window of one spec, as day offsets and the instances it covers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedSweep {
    pub volume: String,
    pub from_offset: i64,
    pub to_offset: i64,
    pub candidates: Vec<VolumeInstance>,
}

/// Everything a pass would visit on `today`, computed without touching the cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Plan {
    pub today: NaiveDate,
    pub padding: u32,
    pub provision: Vec<PlannedInstance>,
    pub sweeps: Vec<PlannedSweep>,
}

impl Plan {
    pub fn removal_candidates(&self) -> usize {
        self.sweeps.iter().map(|s| s.candidates.len()).sum()
    }
}

pub fn run(specs: &VolumeSet, today: NaiveDate, padding: u32) -> Plan {
    let window = provisioning_window(today, padding);
    let mut provision = Vec::new();

    for spec in specs.static_specs() {
        provision.push(PlannedInstance::new(spec, spec.instance("", "")));
    }
    for pair in window.hourly() {
        for spec in specs.hourly() {
            provision.push(PlannedInstance::new(spec, spec.instance(&pair.volume, &pair.path)));
        }
    }
    for pair in window.daily() {
        for spec in specs.daily() {
            provision.push(PlannedInstance::new(spec, spec.instance(&pair.volume, &pair.path)));
        }
    }

    let sweeps = specs
        .hourly()
        .iter()
        .chain(specs.daily())
        .filter_map(|spec| {
            let range = retention_range(spec, padding)?;
            let candidates = retention_window(spec, today, padding)
                .iter()
                .map(|pair| spec.instance(&pair.volume, &pair.path))
                .collect();
            Some(PlannedSweep {
                volume: spec.name.clone(),
                from_offset: range.start,
                to_offset: range.end,
                candidates,
            })
        })
        .collect();

    Plan {
        today,
        padding,
        provision,
        sweeps,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{date, standard_spec};

    #[test]
    fn daily_seven_day_retention_scenario() {
        let specs = VolumeSet::new(vec![standard_spec("/logs", Rotation::Daily)]);
        let plan = run(&specs, date(2024, 6, 10), 1);

        let names: Vec<&str> = plan
            .provision
            .iter()
            .map(|p| p.instance.name.as_str())
            .collect();
        assert_eq!(
            names,
            vec!["logs.scratch", "logs.2024.06.09", "logs.2024.06.10", "logs.2024.06.11"]
        );

        assert_eq!(plan.sweeps.len(), 1);
        assert_eq!(plan.sweeps[0].from_offset, -9);
        assert_eq!(plan.sweeps[0].to_offset, -7);
        let candidates: Vec<&str> = plan.sweeps[0]
            .candidates
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(candidates, vec!["logs.2024.06.01", "logs.2024.06.02"]);
    }

    #[test]
    fn static_specs_are_provisioned_but_never_swept() {
        let specs = VolumeSet::new(vec![standard_spec("/home", Rotation::Static)]);
        let plan = run(&specs, date(2024, 6, 10), 1);

        assert_eq!(plan.provision.len(), 1);
        assert_eq!(plan.provision[0].instance.path, "/home");
        assert!(plan.sweeps.is_empty());
        assert_eq!(plan.removal_candidates(), 0);
    }

    #[test]
    fn hourly_specs_include_scratch_and_every_hour() {
        let specs = VolumeSet::new(vec![standard_spec("/events", Rotation::Hourly)]);
        let plan = run(&specs, date(2024, 6, 10), 0);

        // scratch + 2 days (yesterday, today) * 24 hours
        assert_eq!(plan.provision.len(), 1 + 48);
        assert_eq!(plan.provision[0].instance.name, "events.scratch");
        assert_eq!(plan.removal_candidates(), 24);
    }
}
