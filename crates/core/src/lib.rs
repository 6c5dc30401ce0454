//! sortie_core - Pure no_std mission logic for the sortie supervisory controller
//!
//! This crate contains the platform-agnostic flight-mission state machine
//! and its data model. It can be tested on host without any runtime,
//! transport, or logging backend.
//!
//! # Design Principles
//!
//! - **Zero cfg**: No `#[cfg(feature = ...)]` directives allowed
//! - **Pure no_std**: No std library dependencies
//! - **Trait abstractions**: The command channel is injected via [`traits::CommandDispatcher`]
//! - **No logging**: Everything worth reporting is returned as a [`mission::MissionEvent`]
//!
//! # Modules
//!
//! - [`mission`]: Waypoints, operator inputs, flight phases and the transition logic
//! - [`scheduler`]: Tick scheduler owning the mission context and in-state timer
//! - [`telemetry`]: Last-write-wins telemetry snapshot
//! - [`navigation`]: Setpoint type and arrival checks
//! - [`parameters`]: Parameter store and mission tuning parameters
//! - [`traits`]: Command dispatcher abstraction and a recording implementation

#![no_std]

pub mod mission;
pub mod navigation;
pub mod parameters;
pub mod scheduler;
pub mod telemetry;
pub mod traits;

pub use mission::{FlightPhase, MissionEvent, MissionInput, Waypoint};
pub use parameters::MissionParams;
pub use scheduler::{MissionScheduler, TickReport};
pub use telemetry::{FlightMode, Position, TelemetryStore, TelemetryUpdate, VehicleStatus};
pub use traits::CommandDispatcher;
