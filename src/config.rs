//! Command-line configuration
//!
//! All mission tuning lives in the parameter store; `--param NAME=VALUE`
//! overrides individual entries before the mission is built.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use log::LevelFilter;
use sortie_core::parameters::{ParameterStore, ParameterError};
use sortie_core::scheduler::{TickRate, DEFAULT_TICK_PERIOD_MS};
use sortie_core::MissionParams;

use crate::communication::mavlink::transport::udp::MAVLINK_UDP_PORT;
use crate::communication::mavlink::CommandTarget;
use crate::error::LinkError;
use crate::runtime::LoopConfig;

#[derive(Parser, Debug, Clone)]
#[command(name = "sortie")]
#[command(about = "Supervisory mission controller for a MAVLink multicopter")]
pub struct Cli {
    /// Local address for the vehicle link
    #[arg(long, default_value_t = SocketAddr::from(([0, 0, 0, 0], MAVLINK_UDP_PORT)))]
    pub bind: SocketAddr,

    /// Autopilot address; learned from the first datagram when omitted
    #[arg(long)]
    pub vehicle: Option<SocketAddr>,

    /// Our MAVLink system id
    #[arg(long, default_value_t = 255)]
    pub system_id: u8,

    /// Vehicle MAVLink system id
    #[arg(long, default_value_t = 1)]
    pub target_system: u8,

    /// Tick period in milliseconds
    #[arg(long, default_value_t = DEFAULT_TICK_PERIOD_MS)]
    pub tick_ms: u32,

    /// Waypoint file loaded at start-up
    #[arg(long)]
    pub waypoints: Option<PathBuf>,

    /// Parameter override, NAME=VALUE (repeatable)
    #[arg(long = "param", value_name = "NAME=VALUE")]
    pub params: Vec<String>,

    /// Log level; RUST_LOG takes precedence when set
    #[arg(long, default_value = "info")]
    pub log_level: LevelFilter,
}

impl Cli {
    pub fn loop_config(&self) -> Result<LoopConfig, LinkError> {
        let tick_rate = TickRate::new(self.tick_ms)
            .ok_or_else(|| LinkError::InvalidConfig("--tick-ms must be non-zero".to_string()))?;
        if self.system_id == self.target_system {
            return Err(LinkError::InvalidConfig(format!(
                "--system-id and --target-system are both {}",
                self.system_id
            )));
        }
        Ok(LoopConfig {
            tick_rate,
            system_id: self.system_id,
            target: CommandTarget {
                system_id: self.target_system,
                ..CommandTarget::default()
            },
        })
    }

    /// Build the parameter store with defaults plus overrides
    pub fn parameter_store(&self) -> Result<ParameterStore, LinkError> {
        let mut store = ParameterStore::new();
        MissionParams::register_defaults(&mut store).map_err(|error| LinkError::Parameter {
            name: "defaults".to_string(),
            error,
        })?;

        for spec in &self.params {
            apply_override(&mut store, spec)?;
        }
        Ok(store)
    }

    pub fn mission_params(&self) -> Result<MissionParams, LinkError> {
        Ok(MissionParams::from_store(&self.parameter_store()?))
    }
}

/// Apply one `NAME=VALUE` override to a store
pub fn apply_override(store: &mut ParameterStore, spec: &str) -> Result<(), LinkError> {
    let (name, value) = spec
        .split_once('=')
        .map(|(n, v)| (n.trim(), v.trim()))
        .filter(|(n, v)| !n.is_empty() && !v.is_empty())
        .ok_or_else(|| LinkError::ParameterOverride {
            spec: spec.to_string(),
            reason: "expected NAME=VALUE".to_string(),
        })?;

    if store.get(name).is_none() {
        return Err(LinkError::ParameterOverride {
            spec: spec.to_string(),
            reason: format!("unknown parameter {name}"),
        });
    }

    store
        .set_from_str(name, value)
        .map_err(|error: ParameterError| LinkError::Parameter {
            name: name.to_string(),
            error,
        })
}
