//! Command dispatch abstraction
//!
//! The mission state machine issues every autopilot request through
//! [`CommandDispatcher`]. All requests are fire-and-forget: an implementation
//! must return immediately and never report completion back. The mission
//! only learns the outcome from later telemetry.

use heapless::Vec;

use crate::navigation::TargetSetpoint;
use crate::telemetry::FlightMode;

/// Outbound request channel to the autopilot.
///
/// # Example
///
/// ```
/// use sortie_core::traits::{CommandDispatcher, RecordingDispatcher};
/// use sortie_core::FlightMode;
///
/// let mut dispatcher = RecordingDispatcher::new();
/// dispatcher.set_mode(FlightMode::Guided);
/// dispatcher.arm();
/// assert_eq!(dispatcher.arm_count, 1);
/// assert_eq!(dispatcher.last_mode(), Some(FlightMode::Guided));
/// ```
pub trait CommandDispatcher {
    /// Ask the autopilot to stream `message_id` every `interval_us` microseconds
    fn request_message_interval(&mut self, message_id: u32, interval_us: u32);

    /// Request a mode change
    fn set_mode(&mut self, mode: FlightMode);

    /// Request motor arming
    fn arm(&mut self);

    /// Request takeoff to `altitude` meters above the current position
    fn takeoff(&mut self, altitude: f32);

    /// Request an autonomous landing
    fn land(&mut self);

    /// Publish a global position setpoint
    fn publish_setpoint(&mut self, setpoint: &TargetSetpoint);
}

// ============================================================================
// Recording Implementation (always available for testing)
// ============================================================================

/// Maximum history entries kept per list by [`RecordingDispatcher`]
pub const RECORDING_CAPACITY: usize = 16;

/// Dispatcher that records requests instead of sending them.
///
/// Counters and the latest mode are exact. Histories keep the first
/// [`RECORDING_CAPACITY`] entries and silently drop the rest.
#[derive(Debug, Clone, Default)]
pub struct RecordingDispatcher {
    /// (message id, interval) pairs in request order
    pub intervals: Vec<(u32, u32), RECORDING_CAPACITY>,
    /// Requested modes in order
    pub modes: Vec<FlightMode, RECORDING_CAPACITY>,
    /// Published setpoints in order
    pub setpoints: Vec<TargetSetpoint, RECORDING_CAPACITY>,
    pub mode_count: u32,
    latest_mode: Option<FlightMode>,
    pub arm_count: u32,
    pub takeoff_count: u32,
    pub last_takeoff_altitude: Option<f32>,
    pub land_count: u32,
    pub setpoint_count: u32,
}

impl RecordingDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent mode request, even past the history capacity
    pub fn last_mode(&self) -> Option<FlightMode> {
        self.latest_mode
    }

    pub fn last_setpoint(&self) -> Option<&TargetSetpoint> {
        self.setpoints.last()
    }

    /// Total number of requests of any kind
    pub fn total(&self) -> u32 {
        self.intervals.len() as u32
            + self.mode_count
            + self.arm_count
            + self.takeoff_count
            + self.land_count
            + self.setpoint_count
    }
}

impl CommandDispatcher for RecordingDispatcher {
    fn request_message_interval(&mut self, message_id: u32, interval_us: u32) {
        let _ = self.intervals.push((message_id, interval_us));
    }

    fn set_mode(&mut self, mode: FlightMode) {
        self.mode_count += 1;
        self.latest_mode = Some(mode);
        let _ = self.modes.push(mode);
    }

    fn arm(&mut self) {
        self.arm_count += 1;
    }

    fn takeoff(&mut self, altitude: f32) {
        self.takeoff_count += 1;
        self.last_takeoff_altitude = Some(altitude);
    }

    fn land(&mut self) {
        self.land_count += 1;
    }

    fn publish_setpoint(&mut self, setpoint: &TargetSetpoint) {
        self.setpoint_count += 1;
        let _ = self.setpoints.push(*setpoint);
    }
}
