//! Mission Event Types
//!
//! Events emitted by the state machine on each tick. The host converts
//! them into log records; the core itself has no logging backend.

use core::fmt;

use super::input::MissionInput;
use super::phase::FlightPhase;
use crate::navigation::TargetSetpoint;
use crate::telemetry::FlightMode;

/// Maximum mission events emitted per tick
pub const MAX_TICK_EVENTS: usize = 8;

/// A (phase, input) combination the transition table does not cover,
/// or a mission context that contradicts the phase
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UnexpectedCondition {
    pub phase: FlightPhase,
    pub input: MissionInput,
}

impl fmt::Display for UnexpectedCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unexpected operator command {} in phase {}, landing for emergency",
            self.input, self.phase
        )
    }
}

/// Events emitted by the state machine
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MissionEvent {
    /// Still in `init`: no status yet, or status not ready
    AwaitingReady,
    /// Autopilot ready; telemetry streams requested
    Initialized,
    /// Waiting in `arming` for the operator to start
    AwaitingOperator,
    /// Arm command re-issued
    ArmRequested,
    /// Vehicle armed; takeoff requested.
    /// `altitude_origin` is `None` when no position fix existed
    Armed {
        altitude_origin: Option<f32>,
        takeoff_altitude: f32,
    },
    /// Arming timed out
    ArmingFailed,
    /// Climb progress; `None` while relative altitude is unknown
    Climbing { relative_altitude: Option<f32> },
    /// Mission altitude reached
    ClimbComplete { relative_altitude: f32 },
    /// Climb timed out
    AltitudeTimeout,
    /// Setpoint for waypoint `index` published
    SetpointIssued { index: usize, target: TargetSetpoint },
    /// Offset from the current setpoint (target minus position, degrees)
    TargetError { d_lat: f64, d_lon: f64 },
    /// Waypoint `index` reached
    WaypointReached { index: usize },
    /// Last waypoint reached
    MissionComplete,
    /// Transit to waypoint `index` timed out
    WaypointTimeout { index: usize },
    /// Land command issued
    LandRequested,
    /// Mode change requested
    ModeRequested(FlightMode),
    /// Mode change skipped, vehicle already in (or already asked for) the mode
    ModeAlreadySet(FlightMode),
    /// Fallback to `landing`
    Unexpected(UnexpectedCondition),
}
