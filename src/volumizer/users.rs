//! Static home volumes for the members of a Unix group.

use crate::cluster::process;
use crate::error::{Result, VolumizerError};
use crate::model::{normalize_prefix, Rotation, VolumeSpec, VolumeType, NO_SCHEDULE, RETAIN_FOREVER};

/// Members of `group`, read from `getent group <group>`.
pub fn fetch_group_members(group: &str) -> Result<Vec<String>> {
    let output = process::run("getent", &["group".to_string(), group.to_string()])?;
    if !output.success {
        return Err(VolumizerError::Config(format!(
            "unable to enumerate members of group {}",
            group
        )));
    }
    Ok(parse_group_members(&output.stdout, group))
}

/// Parses `name:password:gid:member,member` lines, returning the sorted members of `group`.
pub fn parse_group_members(getent_output: &str, group: &str) -> Vec<String> {
    let mut members: Vec<String> = getent_output
        .lines()
        .filter(|line| line.split(':').next() == Some(group))
        .filter_map(|line| line.rsplit(':').next())
        .flat_map(|list| list.split(','))
        .map(str::trim)
        .filter(|member| !member.is_empty())
        .map(str::to_string)
        .collect();
    members.sort();
    members.dedup();
    members
}

/// A `/user/<name>` static volume per member, owned by that member.
pub fn user_volume_specs(members: &[String], prefix: &str) -> Vec<VolumeSpec> {
    members
        .iter()
        .map(|user| {
            let name = match normalize_prefix(Some(prefix)) {
                Some(prefix) => format!("{}.user.{}", prefix, user),
                None => format!("user.{}", user),
            };
            VolumeSpec {
                path: format!("/user/{}", user),
                name,
                min_replication: 2,
                replication: 3,
                mode: "0755".to_string(),
                owner: user.clone(),
                retention: RETAIN_FOREVER,
                rotation: Rotation::Static,
                volume_type: VolumeType::Standard,
                source_cluster: String::new(),
                source_path: String::new(),
                schedule: NO_SCHEDULE.to_string(),
            }
        })
        .collect()
}
