use clap::{Parser, Subcommand};
use std::path::PathBuf;
use volumizer::config::DEFAULT_CONFIG_PATH;

/// Returns the version string, including git hash and commit date for non-release builds.
/// Format: "0.3.2" for releases, "0.3.2@abc1234 2024-01-15 14:30" for dev builds
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const GIT_COMMIT_DATE: &str = env!("GIT_COMMIT_DATE");
    const IS_RELEASE: &str = env!("IS_RELEASE");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" || GIT_HASH.is_empty() {
            VERSION.to_string()
        } else {
            format!("{}@{} {}", VERSION, GIT_HASH, GIT_COMMIT_DATE)
        }
    })
}

#[derive(Parser, Debug)]
#[command(name = "volumizer", bin_name = "volumizer", version = get_version())]
#[command(about = "Provision and expire dated MapR volumes", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to the configuration file
    #[arg(
        short,
        long,
        global = true,
        env = "VOLUMIZER_CONFIG",
        default_value = DEFAULT_CONFIG_PATH
    )]
    pub config: PathBuf,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Reconcile every volume, then remove expired instances (default)
    Run,

    /// Create and mount the volumes of the provisioning window
    Reconcile,

    /// Remove instances that fell out of retention
    Sweep,

    /// Show what a pass would visit, without contacting the cluster
    Plan {
        /// Print the plan as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate the configuration and list the volume set
    CheckConfig,
}
