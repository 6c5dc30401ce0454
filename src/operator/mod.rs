//! Operator interface: stdin console and waypoint files

pub mod console;
pub mod waypoints;

pub use console::{run_console, OperatorCommand};
pub use waypoints::{load_waypoints, parse_waypoints};
