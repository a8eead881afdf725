use crate::cluster::VolumeManager;
use crate::error::{Result, VolumizerError};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// What to do when more than one source volume is mounted at a mirror's source path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AmbiguityPolicy {
    /// Treat the lookup as failed; no mirror is created.
    #[default]
    Reject,
    /// Use the lexically smallest volume name.
    FirstLexical,
}

/// Finds the name of the volume on `cluster` mounted exactly at `path`.
pub fn run<M: VolumeManager>(
    manager: &M,
    cluster: &str,
    path: &str,
    policy: AmbiguityPolicy,
) -> Result<String> {
    let mut candidates = manager.list_by_path(cluster, path).map_err(|e| {
        VolumizerError::Resolution(format!("listing volumes on {} failed: {}", cluster, e))
    })?;
    debug!(cluster, path, ?candidates, "Mirror source candidates");

    candidates.sort();
    candidates.dedup();

    match candidates.len() {
        0 => Err(VolumizerError::Resolution(format!(
            "no volume on {} is mounted at {}",
            cluster, path
        ))),
        1 => Ok(candidates.remove(0)),
        n => match policy {
            AmbiguityPolicy::Reject => Err(VolumizerError::Resolution(format!(
                "{} volumes on {} are mounted at {}: {}",
                n,
                cluster,
                path,
                candidates.join(", ")
            ))),
            AmbiguityPolicy::FirstLexical => {
                let chosen = candidates[0].as_str();
                warn!(
                    cluster,
                    path,
                    chosen,
                    "Multiple mirror source candidates, using the first by name"
                );
                Ok(candidates.remove(0))
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::memory::{FailOp, InMemoryCluster};

    #[test]
    fn resolves_single_match() {
        let cluster = InMemoryCluster::new();
        cluster.add_remote_volume("dc2", "logs.2024.06.10", "/logs/2024/06/10");
        cluster.add_remote_volume("dc2", "logs.2024.06.11", "/logs/2024/06/11");

        let name = run(&cluster, "dc2", "/logs/2024/06/10", AmbiguityPolicy::Reject).unwrap();
        assert_eq!(name, "logs.2024.06.10");
    }

    #[test]
    fn empty_result_is_a_resolution_failure() {
        let cluster = InMemoryCluster::new();
        let err = run(&cluster, "dc2", "/logs", AmbiguityPolicy::Reject).unwrap_err();
        assert!(matches!(err, VolumizerError::Resolution(_)));
        assert!(err.to_string().contains("no volume on dc2"));
    }

    #[test]
    fn listing_error_is_a_resolution_failure() {
        let cluster = InMemoryCluster::new();
        cluster.fail(FailOp::ListByPath, "dc2", "cluster unreachable");
        let err = run(&cluster, "dc2", "/logs", AmbiguityPolicy::Reject).unwrap_err();
        assert!(matches!(err, VolumizerError::Resolution(_)));
        assert!(err.to_string().contains("cluster unreachable"));
    }

    #[test]
    fn ambiguous_match_is_rejected_by_default() {
        let cluster = InMemoryCluster::new();
        cluster.add_remote_volume("dc2", "b", "/logs");
        cluster.add_remote_volume("dc2", "a", "/logs");

        let err = run(&cluster, "dc2", "/logs", AmbiguityPolicy::default()).unwrap_err();
        assert!(err.to_string().contains("2 volumes on dc2"));
        assert!(err.to_string().contains("a, b"));
    }

    #[test]
    fn ambiguous_match_picks_lexically_first_when_allowed() {
        let cluster = InMemoryCluster::new();
        cluster.add_remote_volume("dc2", "zeta", "/logs");
        cluster.add_remote_volume("dc2", "alpha", "/logs");
        cluster.add_remote_volume("dc2", "mid", "/logs");

        for _ in 0..3 {
            let name = run(&cluster, "dc2", "/logs", AmbiguityPolicy::FirstLexical).unwrap();
            assert_eq!(name, "alpha");
        }
    }
}
