//! jkworkers - mod_jk workers.properties supervisor
//!
//! A long-running daemon that:
//! - Renders `workers.properties` from the Consul agent's tagged services
//! - Re-renders whenever Docker reports a container start, die, stop or kill
//! - Runs the proxy's reconfigure command after the passes that need it
//!
//! `jkworkers render` runs the same pipeline once and prints the result.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod cli;
mod server_utils;

use cli::{Cli, Commands};
use jkworkers_core::{
    AtomicFileSink, CommandReloader, ConfigSink, ConsulRegistry, DockerEvents, EventSource,
    Reconciler, Supervisor,
};
use jkworkers_types::SupervisorConfig;
use server_utils::stop_signal;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    // Logs go to stderr so `render` output on stdout stays clean.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = cli.supervisor_config()?;
    info!("🚀 jkworkers v{} starting...", env!("CARGO_PKG_VERSION"));
    info!("⚙️ Configuration: {}", serde_json::to_string(&config)?);

    match cli.command.clone().unwrap_or(Commands::Watch) {
        Commands::Watch => watch(&config).await,
        Commands::Render { output } => render_once(&config, output).await,
    }
}

fn build_reconciler(config: &SupervisorConfig) -> Result<Reconciler> {
    let registry = ConsulRegistry::new(&config.consul_address)?;
    let sink = AtomicFileSink::new(&config.workers_file);
    let reloader = CommandReloader::new(&config.reconfigure_command);

    Ok(Reconciler::new(
        Arc::new(registry),
        Arc::new(sink),
        Arc::new(reloader),
        config.membership_tag.clone(),
    ))
}

async fn watch(config: &SupervisorConfig) -> Result<()> {
    let reconciler = build_reconciler(config)?;
    let docker = DockerEvents::new(&config.docker)?;

    // Subscribe before the startup pass so no event between the two is lost.
    let events = docker.subscribe().await.map_err(|e| {
        error!("❌ Cannot subscribe to docker events: {}", e);
        e
    })?;

    let supervisor = Supervisor::from_config(reconciler, config);

    tokio::select! {
        result = supervisor.run(events) => {
            if let Err(e) = result {
                error!("❌ Supervisor stopped: {}", e);
                return Err(e.into());
            }
            Ok(())
        }
        signal = stop_signal() => {
            info!("🛑 Received {}, stopping supervisor...", signal?);
            info!("👋 jkworkers stopped");
            Ok(())
        }
    }
}

async fn render_once(config: &SupervisorConfig, output: Option<PathBuf>) -> Result<()> {
    let document = build_reconciler(config)?.render_current().await?;
    info!(
        "📊 Rendered {} clusters, {} workers, {} skipped",
        document.cluster_count(),
        document.worker_count(),
        document.skipped().len()
    );

    match output {
        Some(path) => {
            let sink = AtomicFileSink::new(path);
            sink.persist(document.as_str()).await?;
            info!("📝 Written to {}", sink.path().display());
        }
        None => print!("{}", document),
    }
    Ok(())
}
