//! Mission reporting
//!
//! The core returns typed events; this module is where they become log
//! records. Levels: progress at `info!`, per-tick detail at `debug!`,
//! rejections and timeouts at `warn!`, aborts and unexpected conditions at
//! `error!`.

use log::{debug, error, info, warn};
use sortie_core::mission::{InputRejected, ModeRequest, StartOutcome};
use sortie_core::scheduler::TickRate;
use sortie_core::{MissionEvent, TelemetryUpdate, TickReport};

/// Turns mission events and telemetry into log records
#[derive(Debug, Default)]
pub struct Reporter {
    tick_rate: TickRate,
    last_battery: Option<i32>,
}

impl Reporter {
    pub fn new(tick_rate: TickRate) -> Self {
        Self {
            tick_rate,
            last_battery: None,
        }
    }

    pub fn tick(&self, report: &TickReport) {
        for event in &report.events {
            self.event(event);
        }

        if report.phase_changed() {
            info!(
                "Controller state: {} -> {} (operator {})",
                report.previous, report.phase, report.input
            );
        } else {
            debug!(
                "Controller state: {} for {} steps ({:.0}s)",
                report.phase,
                report.timer,
                self.tick_rate.seconds(report.timer)
            );
        }
    }

    pub fn event(&self, event: &MissionEvent) {
        match event {
            MissionEvent::AwaitingReady => debug!("Waiting for autopilot to report standby"),
            MissionEvent::Initialized => info!("Autopilot ready, telemetry streams requested"),
            MissionEvent::AwaitingOperator => info!("Waiting for operator"),
            MissionEvent::ArmRequested => info!("Arming requested"),
            MissionEvent::Armed {
                altitude_origin,
                takeoff_altitude,
            } => match altitude_origin {
                Some(origin) => info!(
                    "Armed at altitude {:.1} m, taking off to {:.1} m",
                    origin, takeoff_altitude
                ),
                None => warn!(
                    "Armed without a position fix, taking off to {:.1} m",
                    takeoff_altitude
                ),
            },
            MissionEvent::ArmingFailed => error!("Arming timed out, mission aborted"),
            MissionEvent::Climbing { relative_altitude } => match relative_altitude {
                Some(alt) => info!("Climbing, altitude {:.1} m", alt),
                None => info!("Climbing, altitude unknown"),
            },
            MissionEvent::ClimbComplete { relative_altitude } => {
                info!("Mission altitude reached at {:.1} m", relative_altitude)
            }
            MissionEvent::AltitudeTimeout => {
                warn!("Failed to reach mission altitude, returning to launch")
            }
            MissionEvent::SetpointIssued { index, target } => info!(
                "Heading to waypoint {} at {:.7}, {:.7}, {:.1} m",
                index, target.latitude, target.longitude, target.altitude
            ),
            MissionEvent::TargetError { d_lat, d_lon } => {
                debug!("Target error {:.7}, {:.7}", d_lat, d_lon)
            }
            MissionEvent::WaypointReached { index } => {
                info!("Close enough to waypoint {}", index)
            }
            MissionEvent::MissionComplete => {
                info!("Last waypoint reached, returning to launch")
            }
            MissionEvent::WaypointTimeout { index } => {
                warn!("Timed out reaching waypoint {}, returning to launch", index)
            }
            MissionEvent::LandRequested => warn!("Landing requested"),
            MissionEvent::ModeRequested(mode) => info!("Requested mode {}", mode),
            MissionEvent::ModeAlreadySet(mode) => debug!("Mode {} already set", mode),
            MissionEvent::Unexpected(condition) => error!("{}", condition),
        }
    }

    pub fn telemetry(&mut self, update: &TelemetryUpdate, relative_altitude: Option<f32>) {
        match update {
            TelemetryUpdate::Status(status) => debug!(
                "Status: armed={} state={} mode={}",
                status.armed, status.system_status, status.mode
            ),
            TelemetryUpdate::Position(pos) => match relative_altitude {
                Some(rel) => debug!(
                    "Position: {:.7}, {:.7}, {:.1} m ({:.1} m relative)",
                    pos.latitude, pos.longitude, pos.altitude, rel
                ),
                None => debug!(
                    "Position: {:.7}, {:.7}, {:.1} m",
                    pos.latitude, pos.longitude, pos.altitude
                ),
            },
            TelemetryUpdate::LocalPosition([x, y, z]) => {
                debug!("Local position: {:.2}, {:.2}, {:.2}", x, y, z)
            }
            TelemetryUpdate::Attitude([w, x, y, z]) => {
                debug!("Attitude: {:.3}, {:.3}, {:.3}, {:.3}", w, x, y, z)
            }
            TelemetryUpdate::Battery(percent) => {
                let rounded = percent.round() as i32;
                if self.last_battery != Some(rounded) {
                    self.last_battery = Some(rounded);
                    info!("Battery: {}%", rounded);
                }
            }
        }
    }

    pub fn start(&self, outcome: Result<StartOutcome, InputRejected>) {
        match outcome {
            Ok(StartOutcome::Launched) => info!("Mission start accepted"),
            Ok(StartOutcome::Resumed) => info!("Mission resumed"),
            Err(reason) => warn!("Start rejected: {}", reason),
        }
    }

    pub fn mode_request(&self, what: &str, outcome: Result<ModeRequest, InputRejected>) {
        match outcome {
            Ok(request) => {
                info!("{} accepted", what);
                self.event(&request.into_event());
            }
            Err(reason) => warn!("{} rejected: {}", what, reason),
        }
    }

    pub fn waypoints(&self, outcome: Result<usize, InputRejected>) {
        match outcome {
            Ok(count) => info!("Waypoint list set: {} waypoints", count),
            Err(reason) => warn!("Waypoint update rejected: {}", reason),
        }
    }
}
