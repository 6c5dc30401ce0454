//! Mission Management Types
//!
//! Waypoint storage, operator inputs, flight phases and the per-tick
//! transition logic of the mission state machine.
//!
//! # Mission Storage
//!
//! - Fixed-size waypoint list (max 50 waypoints)
//! - In-memory only (no persistence)
//! - Replaced wholesale by the operator while the mission is idle
//!
//! # Note
//!
//! Nothing in this module logs. Progress and failures are returned as
//! [`MissionEvent`]s for the host to report.

pub mod controller;
pub mod event;
pub mod input;
pub mod phase;

use core::fmt;

use heapless::Vec;

pub use controller::{MissionController, ModeRequest, TimerAction, Transition};
pub use event::{MissionEvent, UnexpectedCondition, MAX_TICK_EVENTS};
pub use input::{InputRejected, MissionInput, MissionInputs, StartOutcome};
pub use phase::FlightPhase;

/// Maximum number of waypoints in a mission
pub const MAX_WAYPOINTS: usize = 50;

/// Mission waypoint in geodetic coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Waypoint {
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
    /// Altitude in meters, as supplied by the operator
    pub altitude: f32,
}

impl Waypoint {
    pub fn new(latitude: f64, longitude: f64, altitude: f32) -> Self {
        Self {
            latitude,
            longitude,
            altitude,
        }
    }
}

/// Waypoint storage errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    /// More than [`MAX_WAYPOINTS`] waypoints
    Full,
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Full => write!(f, "mission full (max {} waypoints)", MAX_WAYPOINTS),
        }
    }
}

/// Mission storage
///
/// Ordered waypoint list consumed front to back.
#[derive(Debug, Clone, Default)]
pub struct MissionStorage {
    waypoints: Vec<Waypoint, MAX_WAYPOINTS>,
}

impl MissionStorage {
    pub const fn new() -> Self {
        Self {
            waypoints: Vec::new(),
        }
    }

    pub fn count(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn clear(&mut self) {
        self.waypoints.clear();
    }

    /// Append a waypoint
    pub fn add_waypoint(&mut self, waypoint: Waypoint) -> Result<(), StorageError> {
        self.waypoints.push(waypoint).map_err(|_| StorageError::Full)
    }

    /// Replace the whole list
    ///
    /// On error the previous list is left untouched.
    pub fn replace(&mut self, waypoints: &[Waypoint]) -> Result<(), StorageError> {
        if waypoints.len() > MAX_WAYPOINTS {
            return Err(StorageError::Full);
        }
        self.waypoints.clear();
        self.waypoints
            .extend_from_slice(waypoints)
            .map_err(|_| StorageError::Full)
    }

    pub fn get_waypoint(&self, index: usize) -> Option<&Waypoint> {
        self.waypoints.get(index)
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wp(i: usize) -> Waypoint {
        Waypoint::new(51.0 + i as f64 * 0.001, -2.6, 100.0)
    }

    #[test]
    fn test_mission_storage_creation() {
        let storage = MissionStorage::new();
        assert_eq!(storage.count(), 0);
        assert!(storage.is_empty());
        assert!(storage.get_waypoint(0).is_none());
    }

    #[test]
    fn test_add_and_get_waypoint() {
        let mut storage = MissionStorage::new();
        storage.add_waypoint(wp(0)).unwrap();
        storage.add_waypoint(wp(1)).unwrap();

        assert_eq!(storage.count(), 2);
        assert_eq!(storage.get_waypoint(1), Some(&wp(1)));
        assert!(storage.get_waypoint(2).is_none());
    }

    #[test]
    fn test_mission_full() {
        let mut storage = MissionStorage::new();
        for i in 0..MAX_WAYPOINTS {
            assert!(storage.add_waypoint(wp(i)).is_ok());
        }
        assert_eq!(storage.add_waypoint(wp(MAX_WAYPOINTS)), Err(StorageError::Full));
    }

    #[test]
    fn test_replace_is_atomic_on_overflow() {
        let mut storage = MissionStorage::new();
        storage.replace(&[wp(0), wp(1)]).unwrap();

        let mut too_many: Vec<Waypoint, 64> = Vec::new();
        for i in 0..(MAX_WAYPOINTS + 1) {
            too_many.push(wp(i)).unwrap();
        }
        assert_eq!(storage.replace(&too_many), Err(StorageError::Full));
        assert_eq!(storage.waypoints(), &[wp(0), wp(1)]);
    }

    #[test]
    fn test_replace_and_clear() {
        let mut storage = MissionStorage::new();
        storage.replace(&[wp(3)]).unwrap();
        assert_eq!(storage.waypoints(), &[wp(3)]);

        storage.clear();
        assert!(storage.is_empty());
    }
}
