//! # Date Windows
//!
//! Rotated volumes are partitioned by calendar date. A [`DateWindow`] is the list of
//! suffixes covering a contiguous range of day offsets relative to "today":
//!
//! ```text
//! daily   volume .2024.06.10      path /2024/06/10
//! hourly  volume .2024.06.10.07   path /2024/06/10/07
//! scratch volume .scratch         path /scratch
//! ```
//!
//! Volume and path suffixes are kept together as [`SuffixPair`]s, so the two sequences
//! can never drift out of alignment.
//!
//! ## Provisioning and Retention
//!
//! - The provisioning window is `[-1, padding + 1)`, with scratch: yesterday, today and
//!   `padding` days ahead.
//! - The retention window for a spec is `[-(retention + padding + 1), -retention)`,
//!   without scratch. Its upper bound is clamped to `-1` so that it never reaches into
//!   the provisioning window, even with `retention = 0`.

use crate::model::{Rotation, VolumeSpec};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::ops::Range;

pub const SCRATCH_VOLUME_SUFFIX: &str = ".scratch";
pub const SCRATCH_PATH_SUFFIX: &str = "/scratch";

/// First day offset of the provisioning window (yesterday).
pub const PROVISION_FROM: i64 = -1;

const HOURS_PER_DAY: u32 = 24;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuffixPair {
    pub volume: String,
    pub path: String,
}

impl SuffixPair {
    fn new(volume: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            volume: volume.into(),
            path: path.into(),
        }
    }

    fn scratch() -> Self {
        Self::new(SCRATCH_VOLUME_SUFFIX, SCRATCH_PATH_SUFFIX)
    }
}

/// Daily and hourly suffixes for a range of days.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DateWindow {
    daily: Vec<SuffixPair>,
    hourly: Vec<SuffixPair>,
}

impl DateWindow {
    pub fn daily(&self) -> &[SuffixPair] {
        &self.daily
    }

    pub fn hourly(&self) -> &[SuffixPair] {
        &self.hourly
    }

    /// Suffixes for a rotation. Static specs are not partitioned and get none.
    pub fn for_rotation(&self, rotation: Rotation) -> &[SuffixPair] {
        match rotation {
            Rotation::Daily => &self.daily,
            Rotation::Hourly => &self.hourly,
            Rotation::Static => &[],
        }
    }

    pub fn daily_volume_suffixes(&self) -> Vec<&str> {
        self.daily.iter().map(|p| p.volume.as_str()).collect()
    }

    pub fn daily_path_suffixes(&self) -> Vec<&str> {
        self.daily.iter().map(|p| p.path.as_str()).collect()
    }

    pub fn hourly_volume_suffixes(&self) -> Vec<&str> {
        self.hourly.iter().map(|p| p.volume.as_str()).collect()
    }

    pub fn hourly_path_suffixes(&self) -> Vec<&str> {
        self.hourly.iter().map(|p| p.path.as_str()).collect()
    }
}

/// Generates the suffixes for day offsets `from..to` relative to `today`.
///
/// Returns empty sequences, without scratch, when `to <= from`.
pub fn generate(today: NaiveDate, from: i64, to: i64, include_scratch: bool) -> DateWindow {
    let mut window = DateWindow::default();
    if to <= from {
        return window;
    }

    if include_scratch {
        window.daily.push(SuffixPair::scratch());
        window.hourly.push(SuffixPair::scratch());
    }

    for delta in from..to {
        let day = today + Duration::days(delta);
        let volume_day = day.format(".%Y.%m.%d").to_string();
        let path_day = day.format("/%Y/%m/%d").to_string();

        for hour in 0..HOURS_PER_DAY {
            window.hourly.push(SuffixPair::new(
                format!("{}.{:02}", volume_day, hour),
                format!("{}/{:02}", path_day, hour),
            ));
        }
        window.daily.push(SuffixPair::new(volume_day, path_day));
    }

    window
}

/// The window the reconciler provisions: yesterday through `padding` days ahead.
pub fn provisioning_window(today: NaiveDate, padding: u32) -> DateWindow {
    generate(today, PROVISION_FROM, i64::from(padding) + 1, true)
}

/// Day offsets the sweeper inspects for a spec, or `None` when the spec never expires.
pub fn retention_range(spec: &VolumeSpec, padding: u32) -> Option<Range<i64>> {
    if !spec.expires() {
        return None;
    }
    let from = -(spec.retention + i64::from(padding) + 1);
    let to = (-spec.retention).min(PROVISION_FROM);
    Some(from..to)
}

/// Removal candidates for a spec, at the spec's rotation granularity.
pub fn retention_window(spec: &VolumeSpec, today: NaiveDate, padding: u32) -> Vec<SuffixPair> {
    match retention_range(spec, padding) {
        Some(range) => generate(today, range.start, range.end, false)
            .for_rotation(spec.rotation)
            .to_vec(),
        None => Vec::new(),
    }
}

/// Which clock decides what "today" is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimezonePolicy {
    #[default]
    Local,
    Utc,
}

impl TimezonePolicy {
    pub fn today(self) -> NaiveDate {
        match self {
            TimezonePolicy::Local => chrono::Local::now().date_naive(),
            TimezonePolicy::Utc => chrono::Utc::now().date_naive(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{date, standard_spec};

    #[test]
    fn generates_daily_and_hourly_counts() {
        let window = generate(date(2024, 6, 10), -2, 3, false);
        assert_eq!(window.daily().len(), 5);
        assert_eq!(window.hourly().len(), 5 * 24);
    }

    #[test]
    fn daily_suffixes_are_increasing_and_aligned() {
        let window = generate(date(2024, 2, 27), 0, 4, false);
        assert_eq!(
            window.daily_volume_suffixes(),
            vec![".2024.02.27", ".2024.02.28", ".2024.02.29", ".2024.03.01"]
        );
        assert_eq!(
            window.daily_path_suffixes(),
            vec!["/2024/02/27", "/2024/02/28", "/2024/02/29", "/2024/03/01"]
        );
    }

    #[test]
    fn hourly_suffixes_nest_hours_within_days() {
        let window = generate(date(2024, 12, 31), 0, 2, false);
        let volumes = window.hourly_volume_suffixes();
        let paths = window.hourly_path_suffixes();

        assert_eq!(volumes[0], ".2024.12.31.00");
        assert_eq!(volumes[23], ".2024.12.31.23");
        assert_eq!(volumes[24], ".2025.01.01.00");
        assert_eq!(paths[0], "/2024/12/31/00");
        assert_eq!(paths[47], "/2025/01/01/23");
    }

    #[test]
    fn scratch_is_prepended_once() {
        let window = generate(date(2024, 6, 10), 0, 1, true);
        assert_eq!(window.daily().len(), 2);
        assert_eq!(window.hourly().len(), 25);
        assert_eq!(window.daily()[0], SuffixPair::scratch());
        assert_eq!(window.hourly()[0], SuffixPair::scratch());
        assert_ne!(window.daily()[1], SuffixPair::scratch());
        assert_ne!(window.hourly()[1], SuffixPair::scratch());
    }

    #[test]
    fn empty_range_yields_empty_window() {
        let window = generate(date(2024, 6, 10), -7, -7, false);
        assert!(window.daily().is_empty());
        assert!(window.hourly().is_empty());

        let reversed = generate(date(2024, 6, 10), 3, -3, false);
        assert!(reversed.daily().is_empty());
        assert!(reversed.hourly().is_empty());

        let with_scratch = generate(date(2024, 6, 10), 3, 3, true);
        assert!(with_scratch.daily_volume_suffixes().is_empty());
        assert!(with_scratch.daily_path_suffixes().is_empty());
        assert!(with_scratch.hourly_volume_suffixes().is_empty());
        assert!(with_scratch.hourly_path_suffixes().is_empty());
    }

    #[test]
    fn provisioning_window_covers_yesterday_through_padding() {
        let window = provisioning_window(date(2024, 6, 10), 1);
        assert_eq!(
            window.daily_volume_suffixes(),
            vec![".scratch", ".2024.06.09", ".2024.06.10", ".2024.06.11"]
        );
    }

    #[test]
    fn retention_window_for_seven_days() {
        let spec = standard_spec("/logs", Rotation::Daily);
        assert_eq!(retention_range(&spec, 1), Some(-9..-7));

        let window = retention_window(&spec, date(2024, 6, 10), 1);
        let names: Vec<&str> = window.iter().map(|p| p.volume.as_str()).collect();
        assert_eq!(names, vec![".2024.06.01", ".2024.06.02"]);
    }

    #[test]
    fn retention_boundary_nine_days_in_six_days_out() {
        let spec = standard_spec("/logs", Rotation::Daily);
        let today = date(2024, 6, 10);
        let window = retention_window(&spec, today, 1);
        let names: Vec<&str> = window.iter().map(|p| p.volume.as_str()).collect();

        let nine_days_old = (today - Duration::days(9)).format(".%Y.%m.%d").to_string();
        let six_days_old = (today - Duration::days(6)).format(".%Y.%m.%d").to_string();
        assert!(names.contains(&nine_days_old.as_str()));
        assert!(!names.contains(&six_days_old.as_str()));
    }

    #[test]
    fn hourly_retention_uses_hourly_suffixes() {
        let mut spec = standard_spec("/events", Rotation::Hourly);
        spec.retention = 2;
        let window = retention_window(&spec, date(2024, 6, 10), 0);
        assert_eq!(window.len(), 24);
        assert_eq!(window[0].volume, ".2024.06.07.00");
        assert_eq!(window[0].path, "/2024/06/07/00");
    }

    #[test]
    fn retention_never_overlaps_provisioning() {
        let today = date(2024, 6, 10);
        for retention in 0..4 {
            let mut spec = standard_spec("/logs", Rotation::Daily);
            spec.retention = retention;
            let provisioned = provisioning_window(today, 2);
            let swept = retention_window(&spec, today, 2);
            for pair in &swept {
                assert!(!provisioned.daily().contains(pair), "{:?} overlaps", pair);
            }
        }
    }

    #[test]
    fn non_expiring_specs_have_no_retention_window() {
        let mut spec = standard_spec("/logs", Rotation::Daily);
        spec.retention = -1;
        assert_eq!(retention_range(&spec, 1), None);
        assert!(retention_window(&spec, date(2024, 6, 10), 1).is_empty());

        let static_spec = standard_spec("/home", Rotation::Static);
        assert_eq!(retention_range(&static_spec, 1), None);
    }

    #[test]
    fn timezone_policy_defaults_to_local() {
        assert_eq!(TimezonePolicy::default(), TimezonePolicy::Local);
    }
}
