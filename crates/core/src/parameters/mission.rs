//! Mission Parameter Definitions
//!
//! Tuning constants for the mission state machine, exposed as named
//! parameters so they can be overridden at start-up.
//!
//! # Parameters
//!
//! - `MIS_TKOFF_ALT` - Takeoff altitude requested after arming (m)
//! - `MIS_CLIMB_ALT` - Relative altitude that completes the climb (m)
//! - `MIS_ARM_TMO` - Arming timeout (ticks)
//! - `MIS_CLIMB_TMO` - Climb timeout (ticks)
//! - `MIS_WP_TMO` - Timeout for the whole waypoint run (ticks in `on_way`)
//! - `MIS_ALT_OFFSET` - Subtracted from waypoint altitude when commanding setpoints (m)
//! - `MIS_WP_TOL` - Lateral arrival tolerance per axis (degrees)
//! - `MIS_WP_RADIUS` - Haversine arrival radius (m), 0 selects `MIS_WP_TOL`
//! - `MIS_STREAM_US` - Telemetry stream interval requested at init (us)

use super::error::ParameterError;
use super::storage::{ParamFlags, ParamValue, ParameterStore};

/// Default takeoff altitude (m)
pub const DEFAULT_TAKEOFF_ALT: f32 = 20.0;
/// Default climb completion threshold (m above the arming altitude)
pub const DEFAULT_CLIMB_ALT: f32 = 19.0;
/// Default arming timeout (ticks)
pub const DEFAULT_ARM_TIMEOUT: u32 = 60;
/// Default climb timeout (ticks)
pub const DEFAULT_CLIMB_TIMEOUT: u32 = 60;
/// Default waypoint run timeout (ticks)
pub const DEFAULT_WAYPOINT_TIMEOUT: u32 = 300;
/// Default setpoint altitude offset (m)
pub const DEFAULT_ALT_OFFSET: f32 = 50.0;
/// Default lateral arrival tolerance (degrees per axis)
pub const DEFAULT_WAYPOINT_TOLERANCE_DEG: f64 = 0.0001;
/// Default telemetry stream interval (us)
pub const DEFAULT_STREAM_INTERVAL_US: u32 = 1_000_000;

/// Mission parameters loaded from the parameter store
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MissionParams {
    pub takeoff_altitude: f32,
    pub climb_complete_altitude: f32,
    pub arm_timeout_ticks: u32,
    pub climb_timeout_ticks: u32,
    pub waypoint_timeout_ticks: u32,
    pub altitude_offset: f32,
    pub waypoint_tolerance_deg: f64,
    /// Haversine acceptance radius; `None` uses the per-axis degree tolerance
    pub waypoint_radius_m: Option<f32>,
    pub stream_interval_us: u32,
}

impl Default for MissionParams {
    fn default() -> Self {
        Self {
            takeoff_altitude: DEFAULT_TAKEOFF_ALT,
            climb_complete_altitude: DEFAULT_CLIMB_ALT,
            arm_timeout_ticks: DEFAULT_ARM_TIMEOUT,
            climb_timeout_ticks: DEFAULT_CLIMB_TIMEOUT,
            waypoint_timeout_ticks: DEFAULT_WAYPOINT_TIMEOUT,
            altitude_offset: DEFAULT_ALT_OFFSET,
            waypoint_tolerance_deg: DEFAULT_WAYPOINT_TOLERANCE_DEG,
            waypoint_radius_m: None,
            stream_interval_us: DEFAULT_STREAM_INTERVAL_US,
        }
    }
}

impl MissionParams {
    /// Register mission parameters with default values
    pub fn register_defaults(store: &mut ParameterStore) -> Result<(), ParameterError> {
        let f = ParamFlags::empty();
        store.register("MIS_TKOFF_ALT", ParamValue::Float(DEFAULT_TAKEOFF_ALT), f)?;
        store.register("MIS_CLIMB_ALT", ParamValue::Float(DEFAULT_CLIMB_ALT), f)?;
        store.register("MIS_ARM_TMO", ParamValue::Int(DEFAULT_ARM_TIMEOUT as i32), f)?;
        store.register("MIS_CLIMB_TMO", ParamValue::Int(DEFAULT_CLIMB_TIMEOUT as i32), f)?;
        store.register("MIS_WP_TMO", ParamValue::Int(DEFAULT_WAYPOINT_TIMEOUT as i32), f)?;
        store.register("MIS_ALT_OFFSET", ParamValue::Float(DEFAULT_ALT_OFFSET), f)?;
        store.register(
            "MIS_WP_TOL",
            ParamValue::Float(DEFAULT_WAYPOINT_TOLERANCE_DEG as f32),
            f,
        )?;
        store.register("MIS_WP_RADIUS", ParamValue::Float(0.0), f)?;
        store.register(
            "MIS_STREAM_US",
            ParamValue::Int(DEFAULT_STREAM_INTERVAL_US as i32),
            f,
        )?;
        Ok(())
    }

    /// Load mission parameters from the store, falling back to defaults
    /// for anything missing or out of range
    pub fn from_store(store: &ParameterStore) -> Self {
        let defaults = Self::default();

        let float = |name: &str, default: f32| store.get(name).map(|v| v.as_f32()).unwrap_or(default);
        let ticks = |name: &str, default: u32| match store.get(name).map(|v| v.as_i32()) {
            Some(v) if v >= 0 => v as u32,
            _ => default,
        };

        let tolerance = match store.get("MIS_WP_TOL").map(|v| v.as_f32()) {
            // f32 storage cannot hold the default exactly
            Some(v) if v > 0.0 && v != DEFAULT_WAYPOINT_TOLERANCE_DEG as f32 => v as f64,
            _ => defaults.waypoint_tolerance_deg,
        };

        let radius = float("MIS_WP_RADIUS", 0.0);

        let stream_interval_us = match store.get("MIS_STREAM_US").map(|v| v.as_i32()) {
            Some(v) if v > 0 => v as u32,
            _ => defaults.stream_interval_us,
        };

        Self {
            takeoff_altitude: float("MIS_TKOFF_ALT", defaults.takeoff_altitude),
            climb_complete_altitude: float("MIS_CLIMB_ALT", defaults.climb_complete_altitude),
            arm_timeout_ticks: ticks("MIS_ARM_TMO", defaults.arm_timeout_ticks),
            climb_timeout_ticks: ticks("MIS_CLIMB_TMO", defaults.climb_timeout_ticks),
            waypoint_timeout_ticks: ticks("MIS_WP_TMO", defaults.waypoint_timeout_ticks),
            altitude_offset: float("MIS_ALT_OFFSET", defaults.altitude_offset),
            waypoint_tolerance_deg: tolerance,
            waypoint_radius_m: if radius > 0.0 { Some(radius) } else { None },
            stream_interval_us,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_defaults() {
        let mut store = ParameterStore::new();
        MissionParams::register_defaults(&mut store).unwrap();

        assert!(store.get("MIS_TKOFF_ALT").is_some());
        assert!(store.get("MIS_WP_TMO").is_some());
        assert!(store.get("MIS_WP_RADIUS").is_some());
        assert_eq!(store.count(), 9);
    }

    #[test]
    fn test_from_store_defaults() {
        let mut store = ParameterStore::new();
        MissionParams::register_defaults(&mut store).unwrap();

        let params = MissionParams::from_store(&store);
        assert_eq!(params, MissionParams::default());
        assert_eq!(params.waypoint_tolerance_deg, 0.0001);
        assert_eq!(params.arm_timeout_ticks, 60);
        assert_eq!(params.waypoint_timeout_ticks, 300);
        assert!(params.waypoint_radius_m.is_none());
    }

    #[test]
    fn test_from_store_custom_values() {
        let mut store = ParameterStore::new();
        MissionParams::register_defaults(&mut store).unwrap();

        store.set("MIS_TKOFF_ALT", ParamValue::Float(35.0)).unwrap();
        store.set("MIS_WP_TMO", ParamValue::Int(120)).unwrap();
        store.set("MIS_WP_RADIUS", ParamValue::Float(3.0)).unwrap();
        store.set("MIS_WP_TOL", ParamValue::Float(0.0005)).unwrap();

        let params = MissionParams::from_store(&store);
        assert!((params.takeoff_altitude - 35.0).abs() < f32::EPSILON);
        assert_eq!(params.waypoint_timeout_ticks, 120);
        assert_eq!(params.waypoint_radius_m, Some(3.0));
        assert!((params.waypoint_tolerance_deg - 0.0005).abs() < 1e-9);
    }

    #[test]
    fn test_from_store_rejects_negative_timeouts() {
        let mut store = ParameterStore::new();
        MissionParams::register_defaults(&mut store).unwrap();
        store.set("MIS_ARM_TMO", ParamValue::Int(-5)).unwrap();

        let params = MissionParams::from_store(&store);
        assert_eq!(params.arm_timeout_ticks, DEFAULT_ARM_TIMEOUT);
    }

    #[test]
    fn test_from_empty_store_uses_defaults() {
        let store = ParameterStore::new();
        assert_eq!(MissionParams::from_store(&store), MissionParams::default());
    }
}
