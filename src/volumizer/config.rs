//! # Configuration
//!
//! Volumizer configuration is managed by [`confique`], which handles layered loading
//! from a TOML file and environment variables.
//!
//! ## Resolution Order
//!
//! 1. **Environment variables**: `VOLUMIZER_PADDING`, `VOLUMIZER_LOG_LEVEL`, `VOLUMIZER_LOG_FILE`
//! 2. **Config file**: `/etc/volumizer/volumizer.toml`, or `--config <path>`
//! 3. **Compiled defaults**: `#[config(default = ...)]`
//!
//! ## Layout
//!
//! ```toml
//! [general]
//! padding = 1
//! pidfile = "/var/run/volumizer.pid"
//!
//! [[volumes]]
//! path = "/data/logs"
//! rotation = "daily"
//! owner = "etl"
//! retention = 7
//! ```
//!
//! The configuration is parsed and validated once. Everything downstream receives the
//! resulting [`VolumeSet`] and never sees the raw entries.

use crate::commands::resolve::AmbiguityPolicy;
use crate::error::{Result, VolumizerError};
use crate::model::{
    derive_volume_name, Rotation, VolumeSet, VolumeSpec, VolumeType, NO_SCHEDULE, RETAIN_FOREVER,
};
use crate::window::TimezonePolicy;
use confique::Config;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "/etc/volumizer/volumizer.toml";

#[derive(Config, Debug, Clone)]
pub struct VolumizerConfig {
    #[config(nested)]
    pub general: GeneralConfig,

    /// Managed volumes, one `[[volumes]]` table each.
    #[config(default = [])]
    pub volumes: Vec<VolumeEntry>,
}

#[derive(Config, Debug, Clone)]
pub struct GeneralConfig {
    /// Number of days ahead of today to provision.
    #[config(default = 1, env = "VOLUMIZER_PADDING")]
    pub padding: u32,

    /// Log filter, e.g. "info" or "volumizer=debug".
    #[config(default = "info", env = "VOLUMIZER_LOG_LEVEL")]
    pub log_level: String,

    /// Append logs to this file instead of stderr.
    #[config(env = "VOLUMIZER_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Lock file guarding against concurrent runs.
    #[config(default = "/var/run/volumizer.pid")]
    pub pidfile: PathBuf,

    /// Prefix for derived volume names. Empty or "None" means no prefix.
    #[config(default = "")]
    pub volume_prefix: String,

    /// Provision a static volume under /user for every member of `user_group`.
    #[config(default = false)]
    pub user_volumes: bool,

    #[config(default = "")]
    pub user_group: String,

    /// Clock used for date suffixes: "local" (default) or "utc".
    pub timezone: Option<TimezonePolicy>,

    /// Several mirror sources at one path: "reject" (default) or "first-lexical".
    pub mirror_ambiguity: Option<AmbiguityPolicy>,

    #[config(default = "maprcli")]
    pub maprcli: String,

    #[config(default = "hadoop")]
    pub hadoop: String,
}

impl GeneralConfig {
    pub fn timezone(&self) -> TimezonePolicy {
        self.timezone.unwrap_or_default()
    }

    pub fn mirror_ambiguity(&self) -> AmbiguityPolicy {
        self.mirror_ambiguity.unwrap_or_default()
    }
}

fn default_replication() -> u32 {
    3
}

fn default_min_replication() -> u32 {
    2
}

fn default_mode() -> String {
    "0755".to_string()
}

fn default_retention() -> i64 {
    RETAIN_FOREVER
}

fn default_schedule() -> String {
    NO_SCHEDULE.to_string()
}

/// One `[[volumes]]` table, before names are derived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VolumeEntry {
    pub path: String,
    /// Overrides the name derived from `path`
    #[serde(default)]
    pub name: Option<String>,
    pub rotation: Rotation,
    #[serde(rename = "type", default = "default_volume_type")]
    pub volume_type: VolumeType,
    #[serde(default = "default_replication")]
    pub replication: u32,
    #[serde(default = "default_min_replication")]
    pub min_replication: u32,
    #[serde(default = "default_mode")]
    pub mode: String,
    #[serde(default)]
    pub owner: String,
    #[serde(default = "default_retention")]
    pub retention: i64,
    #[serde(default = "default_schedule")]
    pub schedule: String,
    #[serde(default)]
    pub source_cluster: String,
    #[serde(default)]
    pub source_path: String,
}

fn default_volume_type() -> VolumeType {
    VolumeType::Standard
}

impl VolumeEntry {
    pub fn to_spec(&self, prefix: &str) -> VolumeSpec {
        let name = self.name.clone().unwrap_or_else(|| {
            derive_volume_name(
                &self.path,
                self.volume_type,
                &self.source_cluster,
                Some(prefix),
            )
        });
        VolumeSpec {
            path: self.path.clone(),
            name,
            min_replication: self.min_replication,
            replication: self.replication,
            mode: self.mode.clone(),
            owner: self.owner.clone(),
            retention: self.retention,
            rotation: self.rotation,
            volume_type: self.volume_type,
            source_cluster: self.source_cluster.clone(),
            source_path: self.source_path.clone(),
            schedule: self.schedule.clone(),
        }
    }
}

impl VolumizerConfig {
    /// Loads and validates the configuration at `path`, with environment overrides.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(VolumizerError::Config(format!(
                "configuration file {} not found",
                path.display()
            )));
        }
        let config = Self::builder().env().file(path).load()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.general.user_volumes && self.general.user_group.trim().is_empty() {
            return Err(VolumizerError::Config(
                "user_volumes is enabled but user_group is empty".to_string(),
            ));
        }
        validate_specs(&self.volume_specs())
    }

    /// Specs for the configured volumes, with names derived.
    pub fn volume_specs(&self) -> Vec<VolumeSpec> {
        self.volumes
            .iter()
            .map(|entry| entry.to_spec(&self.general.volume_prefix))
            .collect()
    }
}

/// Checks a full spec list (configured plus user volumes) and groups it.
pub fn build_volume_set(specs: Vec<VolumeSpec>) -> Result<VolumeSet> {
    validate_specs(&specs)?;
    Ok(VolumeSet::new(specs))
}

pub fn validate_specs(specs: &[VolumeSpec]) -> Result<()> {
    let mut names = HashSet::new();
    for spec in specs {
        validate_spec(spec)?;
        if !names.insert(spec.name.as_str()) {
            return Err(VolumizerError::Config(format!(
                "duplicate volume name {}",
                spec.name
            )));
        }
    }
    Ok(())
}

fn validate_spec(spec: &VolumeSpec) -> Result<()> {
    let invalid = |reason: &str| {
        Err(VolumizerError::Config(format!(
            "volume {}: {}",
            spec.path, reason
        )))
    };

    if !spec.path.starts_with('/') {
        return invalid("path must be absolute");
    }
    if spec.name.is_empty() {
        return invalid("name is empty");
    }
    if spec.retention < RETAIN_FOREVER {
        return invalid("retention must be -1 or a number of days");
    }
    if spec.min_replication == 0 || spec.min_replication > spec.replication {
        return invalid("min_replication must be between 1 and replication");
    }
    match spec.volume_type {
        VolumeType::Mirror => {
            if spec.source_cluster.is_empty() || spec.source_path.is_empty() {
                return invalid("mirror volumes need source_cluster and source_path");
            }
        }
        VolumeType::Standard => {
            if spec.owner.is_empty() {
                return invalid("standard volumes need an owner");
            }
            if u32::from_str_radix(&spec.mode, 8).is_err() {
                return invalid("mode must be an octal permission string");
            }
        }
    }
    Ok(())
}
