//! sortie binary
//!
//! Usage:
//!   sortie --waypoints route.txt
//!   sortie --vehicle 127.0.0.1:14555 --param MIS_TKOFF_ALT=30
//!
//! Then type `start` on stdin once the controller reports it is waiting
//! for the operator.

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info};
use sortie::communication::mavlink::transport::udp::UdpTransport;
use sortie::config::Cli;
use sortie::operator::{load_waypoints, run_console};
use sortie::runtime::MissionLoop;
use sortie_core::{MissionParams, MissionScheduler};
use tokio::io::BufReader;
use tokio::sync::mpsc;

/// Operator commands buffered between console and loop
const COMMAND_QUEUE_DEPTH: usize = 16;

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level)
        .parse_default_env()
        .init();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("starting tokio runtime")?;

    let result = runtime.block_on(run(cli));

    // The stdin reader is a blocking read that cannot be cancelled; don't
    // wait for it
    runtime.shutdown_background();
    result
}

async fn run(cli: Cli) -> Result<()> {
    let config = cli.loop_config()?;
    let store = cli.parameter_store()?;
    for (name, entry) in store.iter_visible() {
        if entry.is_overridden() {
            info!("Parameter {} = {} (default {})", name, entry.value, entry.default);
        } else {
            debug!("Parameter {} = {}", name, entry.value);
        }
    }
    let params = MissionParams::from_store(&store);

    let mut scheduler = MissionScheduler::new(params);
    if let Some(path) = &cli.waypoints {
        let waypoints = load_waypoints(path)
            .await
            .with_context(|| format!("loading waypoints from {}", path.display()))?;
        let count = scheduler
            .set_waypoints(&waypoints)
            .map_err(|e| anyhow::anyhow!("{e}"))?;
        info!("Loaded {} waypoints from {}", count, path.display());
    }

    let transport = UdpTransport::bind(cli.bind, cli.vehicle)
        .await
        .with_context(|| format!("binding vehicle link on {}", cli.bind))?;

    let (tx, rx) = mpsc::channel(COMMAND_QUEUE_DEPTH);
    let console = tokio::spawn(run_console(BufReader::new(tokio::io::stdin()), tx));

    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    let outcome = MissionLoop::new(transport, config, scheduler)
        .run(rx, ctrl_c)
        .await;
    console.abort();

    let scheduler = outcome?;
    info!("Final phase: {}", scheduler.phase());
    Ok(())
}
