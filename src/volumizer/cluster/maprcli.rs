use super::process::{self, CommandOutput};
use super::{CreateRequest, InfoResponse, LeaderCheck, VolumeManager};
use crate::error::{Result, VolumizerError};
use tracing::debug;

const NO_SUCH_VOLUME: &str = "No such volume";

/// Volume manager backed by the `maprcli` command line tool.
#[derive(Debug, Clone)]
pub struct MaprCli {
    binary: String,
}

impl Default for MaprCli {
    fn default() -> Self {
        Self::new("maprcli")
    }
}

impl MaprCli {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    fn run<I, S>(&self, args: I) -> Result<CommandOutput>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        process::run(&self.binary, &args)
    }
}

impl VolumeManager for MaprCli {
    fn info(&self, name: &str) -> Result<InfoResponse> {
        let output = self.run([
            "volume", "info", "-name", name, "-columns", "mounted", "-noheader",
        ])?;

        if !output.success {
            if output.combined().contains(NO_SUCH_VOLUME) {
                return Ok(InfoResponse::NotFound);
            }
            return Err(output.into_error());
        }

        parse_mounted_flag(&output.stdout)
            .map(InfoResponse::Mounted)
            .ok_or_else(|| {
                VolumizerError::remote(
                    output.command_line.clone(),
                    format!("unexpected mount flag {:?}", output.stdout.trim()),
                )
            })
    }

    fn create(&self, request: &CreateRequest) -> Result<()> {
        self.run(create_args(request))?.into_stdout().map(|_| ())
    }

    fn mount(&self, name: &str, path: &str) -> Result<()> {
        self.run(["volume", "mount", "-name", name, "-path", path])?
            .into_stdout()
            .map(|_| ())
    }

    fn remove(&self, name: &str) -> Result<()> {
        self.run(["volume", "remove", "-name", name, "-force", "1"])?
            .into_stdout()
            .map(|_| ())
    }

    fn list_by_path(&self, cluster: &str, path: &str) -> Result<Vec<String>> {
        let filter = format!("[p=={}]", path);
        let stdout = self
            .run([
                "volume",
                "list",
                "-cluster",
                cluster,
                "-columns",
                "n",
                "-filter",
                filter.as_str(),
                "-noheader",
            ])?
            .into_stdout()?;
        Ok(parse_volume_list(&stdout))
    }
}

impl LeaderCheck for MaprCli {
    fn is_primary_node(&self) -> Result<bool> {
        let stdout = self
            .run(["node", "cldbmaster", "-noheader"])?
            .into_stdout()?;
        let master = parse_cldb_master(&stdout).ok_or_else(|| {
            VolumizerError::remote(
                format!("{} node cldbmaster", self.binary),
                "empty CLDB master response",
            )
        })?;

        let hostname = process::run("hostname", &["-f".to_string()])?.into_stdout()?;
        let hostname = hostname.trim();
        debug!(master, hostname, "Primary CLDB node check");

        Ok(master == hostname)
    }
}

/// Argument list for `maprcli volume create`.
pub(crate) fn create_args(request: &CreateRequest) -> Vec<String> {
    let mut args: Vec<String> = [
        "volume",
        "create",
        "-name",
        request.name.as_str(),
        "-path",
        request.path.as_str(),
        "-minreplication",
        request.min_replication.to_string().as_str(),
        "-replication",
        request.replication.to_string().as_str(),
        "-createparent",
        "1",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();

    match &request.mirror {
        Some(mirror) => {
            args.extend(["-type".to_string(), "1".to_string()]);
            args.extend(["-source".to_string(), mirror.reference()]);
            if let Some(schedule) = &mirror.schedule {
                args.extend(["-schedule".to_string(), schedule.clone()]);
            }
        }
        None => {
            if let Some(mode) = &request.mode {
                args.extend(["-rootdirperms".to_string(), mode.clone()]);
            }
        }
    }

    args
}

pub(crate) fn parse_mounted_flag(output: &str) -> Option<bool> {
    match output.trim() {
        "0" => Some(false),
        "1" => Some(true),
        _ => None,
    }
}

pub(crate) fn parse_volume_list(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// The CLDB master hostname is the last token of `node cldbmaster` output.
pub(crate) fn parse_cldb_master(output: &str) -> Option<&str> {
    output.split_whitespace().last()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::MirrorSource;

    fn request() -> CreateRequest {
        CreateRequest {
            name: "logs.2024.06.10".to_string(),
            path: "/logs/2024/06/10".to_string(),
            replication: 3,
            min_replication: 2,
            mode: Some("0755".to_string()),
            mirror: None,
        }
    }

    #[test]
    fn parses_mounted_flag() {
        assert_eq!(parse_mounted_flag("0\n"), Some(false));
        assert_eq!(parse_mounted_flag(" 1 "), Some(true));
        assert_eq!(parse_mounted_flag("mounted"), None);
        assert_eq!(parse_mounted_flag(""), None);
    }

    #[test]
    fn parses_volume_list_lines() {
        assert_eq!(
            parse_volume_list("a.2024.06.10\n\n  b.2024.06.10  \n"),
            vec!["a.2024.06.10", "b.2024.06.10"]
        );
        assert!(parse_volume_list("\n").is_empty());
    }

    #[test]
    fn parses_cldb_master_hostname() {
        assert_eq!(
            parse_cldb_master("ServerID: 4553 HostName: node1.example.com\n"),
            Some("node1.example.com")
        );
        assert_eq!(parse_cldb_master("   "), None);
    }

    #[test]
    fn standard_create_sets_root_dir_perms() {
        let args = create_args(&request());
        assert_eq!(
            args.join(" "),
            "volume create -name logs.2024.06.10 -path /logs/2024/06/10 \
             -minreplication 2 -replication 3 -createparent 1 -rootdirperms 0755"
        );
    }

    #[test]
    fn mirror_create_sets_source_and_schedule() {
        let mut req = request();
        req.mode = None;
        req.mirror = Some(MirrorSource {
            volume: "logs.2024.06.10".to_string(),
            cluster: "dc2".to_string(),
            schedule: Some("2".to_string()),
        });
        let args = create_args(&req).join(" ");
        assert!(args.ends_with("-type 1 -source logs.2024.06.10@dc2 -schedule 2"));
        assert!(!args.contains("-rootdirperms"));
    }

    #[test]
    fn mirror_create_without_schedule() {
        let mut req = request();
        req.mirror = Some(MirrorSource {
            volume: "src".to_string(),
            cluster: "dc2".to_string(),
            schedule: None,
        });
        let args = create_args(&req).join(" ");
        assert!(args.ends_with("-type 1 -source src@dc2"));
    }
}
