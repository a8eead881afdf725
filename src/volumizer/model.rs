//! # Domain Model
//!
//! This module defines the data structures the reconciler works on: [`VolumeSpec`],
//! [`VolumeSet`], [`VolumeInstance`] and [`VolumeStatus`].
//!
//! ## Specs and Instances
//!
//! A [`VolumeSpec`] is the declarative description of one managed directory tree. It
//! never changes during a run. A rotated spec fans out into many concrete
//! [`VolumeInstance`]s, one per date suffix:
//!
//! ```text
//! spec:      name = logs.web      path = /logs/web
//! suffix:    .2024.06.10          /2024/06/10
//! instance:  logs.web.2024.06.10  /logs/web/2024/06/10
//! ```
//!
//! Static specs have exactly one instance, with an empty suffix.
//!
//! Instances are never stored anywhere. Whether one exists is purely a property of the
//! cluster; the reconciler only ever observes it through a [`VolumeStatus`].
//!
//! ## Naming
//!
//! Unless a name is configured explicitly, it is derived from the path (see
//! [`derive_volume_name`]):
//!
//! - mirror: `mirror.<source_cluster><path with '/' as '.'>`
//! - standard without prefix: path without the leading `/`, `/` as `.`
//! - standard with prefix `P`: `P<path with '/' as '.'>`

use serde::{Deserialize, Serialize};
use std::fmt;

/// Partitioning cadence of a volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rotation {
    Daily,
    Hourly,
    Static,
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rotation::Daily => write!(f, "daily"),
            Rotation::Hourly => write!(f, "hourly"),
            Rotation::Static => write!(f, "static"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VolumeType {
    Standard,
    Mirror,
}

impl fmt::Display for VolumeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VolumeType::Standard => write!(f, "standard"),
            VolumeType::Mirror => write!(f, "mirror"),
        }
    }
}

/// Retention value meaning "never expire".
pub const RETAIN_FOREVER: i64 = -1;

/// Mirror schedule value meaning "no sync schedule".
pub const NO_SCHEDULE: &str = "none";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VolumeSpec {
    pub path: String,
    pub name: String,
    pub min_replication: u32,
    pub replication: u32,
    /// Root directory permissions, octal string (e.g. `0755`)
    pub mode: String,
    pub owner: String,
    /// Age in days after which an instance is removed; [`RETAIN_FOREVER`] disables expiry
    pub retention: i64,
    pub rotation: Rotation,
    pub volume_type: VolumeType,
    pub source_cluster: String,
    pub source_path: String,
    pub schedule: String,
}

impl VolumeSpec {
    /// The concrete instance for a (volume suffix, path suffix) pair.
    pub fn instance(&self, volume_suffix: &str, path_suffix: &str) -> VolumeInstance {
        VolumeInstance {
            name: format!("{}{}", self.name, volume_suffix),
            path: format!("{}{}", self.path, path_suffix),
        }
    }

    pub fn is_mirror(&self) -> bool {
        self.volume_type == VolumeType::Mirror
    }

    /// Whether instances of this spec are ever removed by the sweeper.
    pub fn expires(&self) -> bool {
        self.rotation != Rotation::Static && self.retention > RETAIN_FOREVER
    }

    /// The mirror sync schedule, unless it is the literal `none`.
    pub fn mirror_schedule(&self) -> Option<&str> {
        let schedule = self.schedule.trim();
        if schedule.is_empty() || schedule.eq_ignore_ascii_case(NO_SCHEDULE) {
            None
        } else {
            Some(schedule)
        }
    }
}

/// One concrete volume: a spec plus a date suffix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct VolumeInstance {
    pub name: String,
    pub path: String,
}

impl fmt::Display for VolumeInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.path)
    }
}

/// Observed state of a volume instance in the cluster.
///
/// `Absent` is the only state from which creation is attempted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VolumeStatus {
    Absent,
    Exists,
    Mounted,
    Failed(String),
}

impl fmt::Display for VolumeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VolumeStatus::Absent => write!(f, "absent"),
            VolumeStatus::Exists => write!(f, "exists"),
            VolumeStatus::Mounted => write!(f, "mounted"),
            VolumeStatus::Failed(reason) => write!(f, "failed ({})", reason),
        }
    }
}

/// The immutable collection of specs for one run, grouped by rotation.
///
/// Configuration order is preserved within each group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VolumeSet {
    static_specs: Vec<VolumeSpec>,
    hourly: Vec<VolumeSpec>,
    daily: Vec<VolumeSpec>,
}

impl VolumeSet {
    pub fn new(specs: impl IntoIterator<Item = VolumeSpec>) -> Self {
        let mut set = Self::default();
        for spec in specs {
            match spec.rotation {
                Rotation::Static => set.static_specs.push(spec),
                Rotation::Hourly => set.hourly.push(spec),
                Rotation::Daily => set.daily.push(spec),
            }
        }
        set
    }

    pub fn static_specs(&self) -> &[VolumeSpec] {
        &self.static_specs
    }

    pub fn hourly(&self) -> &[VolumeSpec] {
        &self.hourly
    }

    pub fn daily(&self) -> &[VolumeSpec] {
        &self.daily
    }

    /// All specs in reconciliation order: static, hourly, daily.
    pub fn iter(&self) -> impl Iterator<Item = &VolumeSpec> {
        self.static_specs
            .iter()
            .chain(self.hourly.iter())
            .chain(self.daily.iter())
    }

    pub fn len(&self) -> usize {
        self.static_specs.len() + self.hourly.len() + self.daily.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Derives the volume name for a configured path.
///
/// A prefix of `""` or `"None"` means no prefix.
pub fn derive_volume_name(
    path: &str,
    volume_type: VolumeType,
    source_cluster: &str,
    prefix: Option<&str>,
) -> String {
    let dotted = path.replace('/', ".");
    match volume_type {
        VolumeType::Mirror => format!("mirror.{}{}", source_cluster, dotted),
        VolumeType::Standard => match normalize_prefix(prefix) {
            Some(prefix) => format!("{}{}", prefix, dotted),
            None => path.trim_start_matches('/').replace('/', "."),
        },
    }
}

pub(crate) fn normalize_prefix(prefix: Option<&str>) -> Option<&str> {
    prefix.filter(|p| !p.is_empty() && *p != "None")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::standard_spec as spec;

    #[test]
    fn derives_standard_name_without_prefix() {
        assert_eq!(
            derive_volume_name("/data/logs", VolumeType::Standard, "", None),
            "data.logs"
        );
        assert_eq!(
            derive_volume_name("/data/logs", VolumeType::Standard, "", Some("None")),
            "data.logs"
        );
    }

    #[test]
    fn derives_standard_name_with_prefix() {
        assert_eq!(
            derive_volume_name("/data/logs", VolumeType::Standard, "", Some("prod")),
            "prod.data.logs"
        );
    }

    #[test]
    fn derives_mirror_name_from_source_cluster() {
        assert_eq!(
            derive_volume_name("/data/logs", VolumeType::Mirror, "dc2", Some("prod")),
            "mirror.dc2.data.logs"
        );
    }

    #[test]
    fn instance_appends_suffixes() {
        let s = spec("/logs/web", Rotation::Daily);
        let instance = s.instance(".2024.06.10", "/2024/06/10");
        assert_eq!(instance.name, "logs.web.2024.06.10");
        assert_eq!(instance.path, "/logs/web/2024/06/10");
    }

    #[test]
    fn static_and_forever_specs_never_expire() {
        let mut s = spec("/a", Rotation::Static);
        assert!(!s.expires());

        s.rotation = Rotation::Daily;
        assert!(s.expires());

        s.retention = RETAIN_FOREVER;
        assert!(!s.expires());
    }

    #[test]
    fn mirror_schedule_none_is_absent() {
        let mut s = spec("/a", Rotation::Daily);
        assert_eq!(s.mirror_schedule(), None);
        s.schedule = "hourly-sync".to_string();
        assert_eq!(s.mirror_schedule(), Some("hourly-sync"));
    }

    #[test]
    fn volume_set_groups_by_rotation_and_keeps_order() {
        let set = VolumeSet::new(vec![
            spec("/d1", Rotation::Daily),
            spec("/s1", Rotation::Static),
            spec("/h1", Rotation::Hourly),
            spec("/d2", Rotation::Daily),
        ]);

        assert_eq!(set.len(), 4);
        assert_eq!(set.daily()[0].path, "/d1");
        assert_eq!(set.daily()[1].path, "/d2");

        let order: Vec<&str> = set.iter().map(|s| s.path.as_str()).collect();
        assert_eq!(order, vec!["/s1", "/h1", "/d1", "/d2"]);
    }
}
