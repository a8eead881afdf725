use super::process;
use super::OwnershipClient;
use crate::error::{Result, VolumizerError};

/// Ownership client backed by `hadoop fs -chown`.
#[derive(Debug, Clone)]
pub struct HadoopFs {
    binary: String,
}

impl Default for HadoopFs {
    fn default() -> Self {
        Self::new("hadoop")
    }
}

impl HadoopFs {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl OwnershipClient for HadoopFs {
    fn chown(&self, path: &str, owner: &str, group: &str, recursive: bool) -> Result<()> {
        process::run(&self.binary, &chown_args(path, owner, group, recursive))
            .and_then(|output| output.into_stdout())
            .map(|_| ())
            .map_err(|e| VolumizerError::Permission(e.to_string()))
    }
}

pub(crate) fn chown_args(path: &str, owner: &str, group: &str, recursive: bool) -> Vec<String> {
    let mut args = vec!["fs".to_string(), "-chown".to_string()];
    if recursive {
        args.push("-R".to_string());
    }
    args.push(format!("{}:{}", owner, group));
    args.push(path.to_string());
    args
}
