//! `rotato` command line.

mod output;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use rotato_adapter_ansible::AnsibleRunner;
use rotato_adapter_kube::KubeClusterQuery;
use rotato_application::{
    ConvergenceWaiter, FleetOrchestrator, MaintenanceExecutor, build_probes,
};
use rotato_domain::{MaintenanceKind, RotatoConfig, RunError};

use crate::paths::{ConfigLocation, home_dir, resolve_config_path};

#[derive(Debug, Parser)]
#[command(
    name = "rotato",
    version,
    about = "Upgrade or reboot cluster nodes one at a time, waiting for the cluster to settle in between"
)]
pub struct Cli {
    /// Run the reboot playbook instead of the upgrade playbook.
    #[arg(long)]
    pub reboot: bool,

    /// Configuration file.
    #[arg(short, long, env = "ROTATO_CONFIG_PATH")]
    pub config: Option<PathBuf>,

    /// List the targets in processing order and exit.
    #[arg(long)]
    pub dry_run: bool,

    /// Print the run report as JSON on stdout.
    #[arg(long, conflicts_with = "dry_run")]
    pub json: bool,

    /// Raise log verbosity (-v debug, -vv trace). `RUST_LOG` takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn kind(&self) -> MaintenanceKind {
        MaintenanceKind::from_reboot_flag(self.reboot)
    }
}

pub async fn run(cli: Cli) -> Result<()> {
    dotenv::dotenv().ok();
    init_tracing(cli.verbose);

    let location = resolve_config_path(cli.config.clone(), home_dir().as_deref());
    let config = load_config(&location)?;
    let policy = config.convergence.policy().map_err(RunError::from)?;
    let kind = cli.kind();

    let cluster = Arc::new(KubeClusterQuery::connect(config.kube_context.as_deref()).await?);
    let runner = Arc::new(AnsibleRunner::from_config(&config.runner));
    let executor = MaintenanceExecutor::new(runner, &config.runner);
    let playbook = executor.playbook_for(kind).to_string();
    let orchestrator = FleetOrchestrator::new(
        cluster.clone(),
        build_probes(cluster, &config),
        ConvergenceWaiter::new(policy),
        executor,
        config.extra_hosts.clone(),
    );

    if cli.dry_run {
        let targets = orchestrator.discover().await?;
        output::print_plan(kind, &playbook, &orchestrator.probe_names(), &policy, &targets);
        return Ok(());
    }

    info!(
        %kind,
        playbook = %playbook,
        budget_secs = policy.budget().as_secs(),
        "starting rolling maintenance"
    );
    let outcome = orchestrator.run(kind).await;
    if cli.json {
        output::print_json(&outcome.report)?;
    } else {
        output::print_report(&outcome.report, outcome.error.as_ref());
    }
    outcome.into_result()?;
    Ok(())
}

fn load_config(location: &ConfigLocation) -> Result<RotatoConfig> {
    if !location.explicit && !location.path.exists() {
        warn!(
            path = %location.path.display(),
            "no config file found, using defaults"
        );
        return Ok(RotatoConfig::default());
    }
    let config = RotatoConfig::load_from_path(&location.path)
        .map_err(RunError::from)
        .with_context(|| format!("Failed to load config at {}", location.path.display()))?;
    info!(path = %location.path.display(), extra_hosts = config.extra_hosts.len(), "loaded config");
    Ok(config)
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
