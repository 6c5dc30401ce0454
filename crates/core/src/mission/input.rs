//! Operator Inputs
//!
//! The operator command overlay (`idle` / `run` / `paused`) and the waypoint
//! list. Every operator request is validated here against the current
//! flight phase; a rejected request changes nothing.

use core::fmt;

use super::phase::FlightPhase;
use super::{MissionStorage, Waypoint, MAX_WAYPOINTS};
use crate::telemetry::FlightMode;

/// Current operator command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissionInput {
    /// No authorization yet
    #[default]
    Idle,
    /// Mission authorized to proceed
    Run,
    /// Operator hold; phase and timer are frozen
    Paused,
}

impl MissionInput {
    pub fn as_str(&self) -> &'static str {
        match self {
            MissionInput::Idle => "idle",
            MissionInput::Run => "run",
            MissionInput::Paused => "paused",
        }
    }
}

impl fmt::Display for MissionInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepted start request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    /// Mission launched from `arming`
    Launched,
    /// Paused mission resumed
    Resumed,
}

/// Reason an operator request was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputRejected {
    /// Start with no waypoints loaded
    EmptyMission,
    /// Start before initialization finished
    NotReadyToLaunch(FlightPhase),
    /// Start while already running
    AlreadyRunning,
    /// Pause outside an airborne phase
    PauseUnavailable(FlightPhase),
    /// Manual mode select while not paused
    NotPaused,
    /// Manual mode code outside 0..=3
    UnknownModeCode(i32),
    /// Waypoint update after the mission was authorized
    MissionLocked,
    /// Waypoint list longer than [`MAX_WAYPOINTS`]
    MissionFull(usize),
}

impl fmt::Display for InputRejected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputRejected::EmptyMission => {
                write!(f, "start requested, but the waypoint list is empty")
            }
            InputRejected::NotReadyToLaunch(phase) => {
                write!(f, "start requested in phase {}, wait for initialization to finish", phase)
            }
            InputRejected::AlreadyRunning => write!(f, "mission is already running"),
            InputRejected::PauseUnavailable(phase) => {
                write!(f, "pause is not available in phase {}", phase)
            }
            InputRejected::NotPaused => {
                write!(f, "mode can only be changed while the mission is paused")
            }
            InputRejected::UnknownModeCode(code) => write!(
                f,
                "unknown mode code {} (0: manual, 1: loiter, 2: guided, 3: RTL)",
                code
            ),
            InputRejected::MissionLocked => {
                write!(f, "waypoints cannot be changed once the mission has started")
            }
            InputRejected::MissionFull(count) => write!(
                f,
                "{} waypoints exceed the limit of {}",
                count, MAX_WAYPOINTS
            ),
        }
    }
}

/// Operator command state plus the waypoint list
#[derive(Debug, Clone, Default)]
pub struct MissionInputs {
    input: MissionInput,
    waypoints: MissionStorage,
}

impl MissionInputs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input(&self) -> MissionInput {
        self.input
    }

    pub fn waypoints(&self) -> &MissionStorage {
        &self.waypoints
    }

    /// Replace the waypoint list (last write wins while idle)
    pub fn set_waypoints(&mut self, waypoints: &[Waypoint]) -> Result<usize, InputRejected> {
        if self.input != MissionInput::Idle {
            return Err(InputRejected::MissionLocked);
        }
        self.waypoints
            .replace(waypoints)
            .map_err(|_| InputRejected::MissionFull(waypoints.len()))?;
        Ok(self.waypoints.count())
    }

    /// Validate and apply an operator start
    ///
    /// From `paused` this is a resume. Otherwise the list must be non-empty
    /// and the phase must be `arming`.
    pub fn start(&mut self, phase: FlightPhase) -> Result<StartOutcome, InputRejected> {
        match self.input {
            MissionInput::Paused => {
                self.input = MissionInput::Run;
                Ok(StartOutcome::Resumed)
            }
            MissionInput::Run => Err(InputRejected::AlreadyRunning),
            MissionInput::Idle => {
                if self.waypoints.is_empty() {
                    Err(InputRejected::EmptyMission)
                } else if phase != FlightPhase::Arming {
                    Err(InputRejected::NotReadyToLaunch(phase))
                } else {
                    self.input = MissionInput::Run;
                    Ok(StartOutcome::Launched)
                }
            }
        }
    }

    /// Validate and apply an operator pause
    pub fn pause(&mut self, phase: FlightPhase) -> Result<(), InputRejected> {
        if !phase.is_pausable() {
            return Err(InputRejected::PauseUnavailable(phase));
        }
        self.input = MissionInput::Paused;
        Ok(())
    }

    /// Validate a manual mode selection
    pub fn manual_mode(&self, code: i32) -> Result<FlightMode, InputRejected> {
        if self.input != MissionInput::Paused {
            return Err(InputRejected::NotPaused);
        }
        FlightMode::from_operator_code(code).ok_or(InputRejected::UnknownModeCode(code))
    }
}
