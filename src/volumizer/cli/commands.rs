use super::render::{print_messages, render_plan, render_report, render_volume_set};
use super::setup::{Cli, Commands};
use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use volumizer::api::{CmdMessage, PassReport, VolumizerApi};
use volumizer::cluster::hadoop::HadoopFs;
use volumizer::cluster::maprcli::MaprCli;
use volumizer::config::{build_volume_set, VolumizerConfig};
use volumizer::lock::PidLock;
use volumizer::logging;
use volumizer::model::VolumeSet;
use volumizer::users::{fetch_group_members, user_volume_specs};

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let command = cli.command.clone().unwrap_or(Commands::Run);

    let config = VolumizerConfig::load(&cli.config).with_context(|| {
        format!(
            "failed to load configuration from {}",
            cli.config.display()
        )
    })?;

    logging::init(&config.general.log_level, config.general.log_file.as_deref())
        .context("failed to initialize logging")?;

    let specs = build_specs(&config)?;

    match &command {
        Commands::CheckConfig => handle_check_config(&specs),
        Commands::Plan { json } => handle_plan(&config, specs, *json),
        Commands::Run | Commands::Reconcile | Commands::Sweep => {
            handle_pass(&config, specs, &command)
        }
    }
}

/// Configured volumes plus, when enabled, one static volume per user group member.
fn build_specs(config: &VolumizerConfig) -> Result<VolumeSet> {
    let mut specs = config.volume_specs();

    let general = &config.general;
    if general.user_volumes {
        let members = fetch_group_members(&general.user_group).with_context(|| {
            format!("failed to read members of group {}", general.user_group)
        })?;
        if members.is_empty() {
            warn!(group = %general.user_group, "User volume group has no members");
        }
        specs.extend(user_volume_specs(&members, &general.volume_prefix));
    }

    build_volume_set(specs).context("invalid volume configuration")
}

fn production_api(config: &VolumizerConfig, specs: VolumeSet) -> VolumizerApi<MaprCli, HadoopFs> {
    let general = &config.general;
    VolumizerApi::new(
        MaprCli::new(general.maprcli.as_str()),
        HadoopFs::new(general.hadoop.as_str()),
        specs,
        general.padding,
    )
    .with_mirror_ambiguity(general.mirror_ambiguity())
}

fn handle_pass(config: &VolumizerConfig, specs: VolumeSet, command: &Commands) -> Result<()> {
    let _lock = PidLock::acquire(&config.general.pidfile)
        .context("another volumizer pass appears to be running")?;

    let api = production_api(config, specs);
    let primary = api
        .is_primary_node()
        .context("failed to determine the CLDB master")?;
    if !primary {
        info!("Not the CLDB master, nothing to do");
        print_messages(&[CmdMessage::info(
            "This node is not the CLDB master; skipping pass.",
        )]);
        return Ok(());
    }

    let today = config.general.timezone().today();
    let report = match command {
        Commands::Reconcile => PassReport {
            reconciled: api.reconcile(today),
            swept: Vec::new(),
        },
        Commands::Sweep => PassReport {
            reconciled: Vec::new(),
            swept: api.sweep(today),
        },
        _ => api.run_pass(today),
    };

    print!("{}", render_report(&report));
    Ok(())
}

fn handle_plan(config: &VolumizerConfig, specs: VolumeSet, json: bool) -> Result<()> {
    let today = config.general.timezone().today();
    let plan = volumizer::commands::plan::run(&specs, today, config.general.padding);

    if json {
        let rendered = serde_json::to_string_pretty(&plan).context("failed to serialize plan")?;
        println!("{}", rendered);
    } else {
        print!("{}", render_plan(&plan));
    }
    Ok(())
}

fn handle_check_config(specs: &VolumeSet) -> Result<()> {
    print!("{}", render_volume_set(specs));
    Ok(())
}
