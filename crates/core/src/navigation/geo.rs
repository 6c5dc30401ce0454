//! Geodetic helpers
//!
//! Pure functions used to decide whether the vehicle has reached its
//! setpoint. Computed in f64; at 1e-4 degree tolerances f32 rounding is
//! already a sizeable fraction of the threshold.

use libm::{atan2, cos, sin, sqrt};

use super::types::{ArrivalCheck, TargetSetpoint};
use crate::telemetry::Position;

const EARTH_RADIUS_M: f64 = 6_371_000.0;
const DEG_TO_RAD: f64 = core::f64::consts::PI / 180.0;

/// Great-circle distance in meters between two positions in degrees
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1 * DEG_TO_RAD;
    let lat2_rad = lat2 * DEG_TO_RAD;
    let delta_lat = (lat2 - lat1) * DEG_TO_RAD;
    let delta_lon = (lon2 - lon1) * DEG_TO_RAD;

    let sin_dlat = sin(delta_lat / 2.0);
    let sin_dlon = sin(delta_lon / 2.0);
    let a = sin_dlat * sin_dlat + cos(lat1_rad) * cos(lat2_rad) * sin_dlon * sin_dlon;
    let c = 2.0 * atan2(sqrt(a), sqrt(1.0 - a));
    EARTH_RADIUS_M * c
}

/// Signed offset (target minus current) in degrees, as (d_lat, d_lon)
pub fn target_error(position: &Position, target: &TargetSetpoint) -> (f64, f64) {
    (
        target.latitude - position.latitude,
        target.longitude - position.longitude,
    )
}

/// Whether `position` satisfies `check` against `target`
///
/// Altitude is not considered.
pub fn has_arrived(position: &Position, target: &TargetSetpoint, check: ArrivalCheck) -> bool {
    match check {
        ArrivalCheck::AxisTolerance(tolerance) => {
            let (d_lat, d_lon) = target_error(position, target);
            d_lat.abs() <= tolerance && d_lon.abs() <= tolerance
        }
        ArrivalCheck::Radius(radius) => {
            haversine_distance(
                position.latitude,
                position.longitude,
                target.latitude,
                target.longitude,
            ) <= radius as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: ArrivalCheck = ArrivalCheck::AxisTolerance(0.0001);

    #[test]
    fn test_haversine_one_degree_north() {
        let d = haversine_distance(35.0, 139.0, 36.0, 139.0);
        // ~111.2 km per degree of latitude
        assert!((d - 111_195.0).abs() < 100.0);
    }

    #[test]
    fn test_haversine_same_point() {
        assert!(haversine_distance(51.4, -2.6, 51.4, -2.6) < 1e-6);
    }

    #[test]
    fn test_axis_tolerance_inside() {
        let target = TargetSetpoint::new(51.42340, -2.67150, 20.0);
        let pos = Position::new(51.42345, -2.67145, 80.0);
        assert!(has_arrived(&pos, &target, TOL));
    }

    #[test]
    fn test_axis_tolerance_single_axis_outside() {
        let target = TargetSetpoint::new(51.42340, -2.67150, 20.0);
        // Latitude well inside, longitude 2e-4 off
        let pos = Position::new(51.42340, -2.67170, 20.0);
        assert!(!has_arrived(&pos, &target, TOL));
    }

    #[test]
    fn test_target_error_sign() {
        let target = TargetSetpoint::new(10.0, 20.0, 0.0);
        let pos = Position::new(9.5, 21.0, 0.0);
        let (d_lat, d_lon) = target_error(&pos, &target);
        assert!((d_lat - 0.5).abs() < 1e-12);
        assert!((d_lon + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_radius_check() {
        let target = TargetSetpoint::new(51.4234, -2.6715, 20.0);
        // ~5.6 m north
        let pos = Position::new(51.42345, -2.6715, 20.0);
        assert!(has_arrived(&pos, &target, ArrivalCheck::Radius(10.0)));
        assert!(!has_arrived(&pos, &target, ArrivalCheck::Radius(3.0)));
    }
}
