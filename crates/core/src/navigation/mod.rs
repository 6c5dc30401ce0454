//! Navigation types and utilities
//!
//! Setpoint representation and the arrival checks used by the waypoint
//! phase.

mod geo;
mod types;

pub use geo::{has_arrived, haversine_distance, target_error};
pub use types::{ArrivalCheck, TargetSetpoint};
