//! Telemetry Snapshot
//!
//! Last-write-wins store of the most recent vehicle telemetry. Updates only
//! overwrite fields; no decision logic runs here. The tick reads whatever
//! is present at evaluation time and treats absent data as "not yet known".

mod mode;

pub use mode::FlightMode;

/// MAVLink `MAV_STATE_STANDBY`: system is ready to arm
pub const SYSTEM_STATUS_STANDBY: u8 = 3;

/// Vehicle status as reported by the autopilot heartbeat
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VehicleStatus {
    /// Motors armed
    pub armed: bool,
    /// Raw system status code (`MAV_STATE`)
    pub system_status: u8,
    /// Operating mode currently in effect
    pub mode: FlightMode,
}

impl VehicleStatus {
    /// System reports standby (initialised and ready to arm)
    pub fn is_ready(&self) -> bool {
        self.system_status == SYSTEM_STATUS_STANDBY
    }
}

/// Absolute geodetic position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
    /// Altitude in meters (AMSL)
    pub altitude: f32,
}

impl Position {
    pub fn new(latitude: f64, longitude: f64, altitude: f32) -> Self {
        Self {
            latitude,
            longitude,
            altitude,
        }
    }
}

/// Local pose (position in the local NED frame plus attitude quaternion)
///
/// Observed for diagnostics only; no transition depends on it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    /// Local position [x, y, z] in meters (NED)
    pub position: [f32; 3],
    /// Attitude quaternion [w, x, y, z]
    pub orientation: [f32; 4],
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            position: [0.0; 3],
            orientation: [1.0, 0.0, 0.0, 0.0],
        }
    }
}

/// A single telemetry update pushed by the adapter layer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TelemetryUpdate {
    /// Heartbeat status (replaces the previous status wholesale)
    Status(VehicleStatus),
    /// Global position fix
    Position(Position),
    /// Local NED position [x, y, z]
    LocalPosition([f32; 3]),
    /// Attitude quaternion [w, x, y, z]
    Attitude([f32; 4]),
    /// Remaining battery capacity in percent (0-100)
    Battery(f32),
}

/// Most recent telemetry values
#[derive(Debug, Clone, Default)]
pub struct TelemetryStore {
    status: Option<VehicleStatus>,
    position: Option<Position>,
    pose: Option<Pose>,
    battery_percent: Option<f32>,
}

impl TelemetryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply an update, overwriting the matching field
    pub fn apply(&mut self, update: TelemetryUpdate) {
        match update {
            TelemetryUpdate::Status(status) => self.status = Some(status),
            TelemetryUpdate::Position(position) => self.position = Some(position),
            TelemetryUpdate::LocalPosition(xyz) => {
                self.pose.get_or_insert_with(Pose::default).position = xyz;
            }
            TelemetryUpdate::Attitude(q) => {
                self.pose.get_or_insert_with(Pose::default).orientation = q;
            }
            TelemetryUpdate::Battery(percent) => {
                self.battery_percent = Some(percent.clamp(0.0, 100.0));
            }
        }
    }

    pub fn status(&self) -> Option<&VehicleStatus> {
        self.status.as_ref()
    }

    pub fn position(&self) -> Option<&Position> {
        self.position.as_ref()
    }

    pub fn pose(&self) -> Option<&Pose> {
        self.pose.as_ref()
    }

    pub fn battery_percent(&self) -> Option<f32> {
        self.battery_percent
    }

    /// Armed flag, `false` until a status has been received
    pub fn is_armed(&self) -> bool {
        self.status.map(|s| s.armed).unwrap_or(false)
    }

    /// Mode currently reported by the vehicle, if any
    pub fn mode(&self) -> Option<FlightMode> {
        self.status.map(|s| s.mode)
    }

    /// Altitude relative to `origin`
    ///
    /// `None` until both a position fix and an origin exist.
    pub fn relative_altitude(&self, origin: Option<f32>) -> Option<f32> {
        let origin = origin?;
        self.position.map(|p| p.altitude - origin)
    }
}
