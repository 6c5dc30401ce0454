//! sortie - Supervisory mission controller for a MAVLink multicopter
//!
//! Host side of the controller. The mission logic itself lives in the
//! `no_std` [`sortie_core`] crate; this crate connects it to a vehicle over
//! MAVLink/UDP, an operator console on stdin, and the `log` facade.
//!
//! # Modules
//!
//! - [`communication`]: MAVLink transport, framing, telemetry decoding and command dispatch
//! - [`operator`]: Console commands and waypoint files
//! - [`runtime`]: The single-task mission loop and log reporting
//! - [`config`]: Command-line options and parameter overrides
//! - [`error`]: Host error type

pub mod communication;
pub mod config;
pub mod error;
pub mod operator;
pub mod runtime;

pub use error::LinkError;
