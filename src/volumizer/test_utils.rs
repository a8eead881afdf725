use crate::model::{derive_volume_name, Rotation, VolumeSpec, VolumeType, NO_SCHEDULE};
use chrono::NaiveDate;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
}

pub fn standard_spec(path: &str, rotation: Rotation) -> VolumeSpec {
    VolumeSpec {
        path: path.to_string(),
        name: derive_volume_name(path, VolumeType::Standard, "", None),
        min_replication: 2,
        replication: 3,
        mode: "0755".to_string(),
        owner: "hdfs".to_string(),
        retention: 7,
        rotation,
        volume_type: VolumeType::Standard,
        source_cluster: String::new(),
        source_path: String::new(),
        schedule: NO_SCHEDULE.to_string(),
    }
}

pub fn mirror_spec(path: &str, rotation: Rotation, cluster: &str, source_path: &str) -> VolumeSpec {
    VolumeSpec {
        name: derive_volume_name(path, VolumeType::Mirror, cluster, None),
        volume_type: VolumeType::Mirror,
        source_cluster: cluster.to_string(),
        source_path: source_path.to_string(),
        ..standard_spec(path, rotation)
    }
}
