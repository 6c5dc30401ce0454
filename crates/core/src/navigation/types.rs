//! Navigation type definitions
//!
//! - `TargetSetpoint`: Global position setpoint handed to the autopilot
//! - `ArrivalCheck`: How arrival at a setpoint is judged

use crate::mission::Waypoint;

/// Global position setpoint commanded in guided mode
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TargetSetpoint {
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
    /// Altitude in meters, already offset from the waypoint altitude
    pub altitude: f32,
}

impl TargetSetpoint {
    pub fn new(latitude: f64, longitude: f64, altitude: f32) -> Self {
        Self {
            latitude,
            longitude,
            altitude,
        }
    }

    /// Build the setpoint for a waypoint, subtracting `altitude_offset`
    pub fn from_waypoint(waypoint: &Waypoint, altitude_offset: f32) -> Self {
        Self {
            latitude: waypoint.latitude,
            longitude: waypoint.longitude,
            altitude: waypoint.altitude - altitude_offset,
        }
    }

    /// Latitude scaled to degE7 for MAVLink integer fields
    pub fn lat_e7(&self) -> i32 {
        libm::round(self.latitude * 1e7) as i32
    }

    /// Longitude scaled to degE7 for MAVLink integer fields
    pub fn lon_e7(&self) -> i32 {
        libm::round(self.longitude * 1e7) as i32
    }
}

/// Arrival criterion
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ArrivalCheck {
    /// Both |d_lat| and |d_lon| within the tolerance (degrees)
    AxisTolerance(f64),
    /// Great-circle distance within the radius (meters)
    Radius(f32),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setpoint_from_waypoint_applies_offset() {
        let wp = Waypoint::new(51.4234, -2.6715, 120.0);
        let sp = TargetSetpoint::from_waypoint(&wp, 50.0);
        assert_eq!(sp.latitude, 51.4234);
        assert_eq!(sp.longitude, -2.6715);
        assert!((sp.altitude - 70.0).abs() < 1e-4);
    }

    #[test]
    fn test_setpoint_scaled_coordinates() {
        let sp = TargetSetpoint::new(51.4234, -2.6715, 20.0);
        assert_eq!(sp.lat_e7(), 514_234_000);
        assert_eq!(sp.lon_e7(), -26_715_000);
    }
}
