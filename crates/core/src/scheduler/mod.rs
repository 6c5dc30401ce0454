//! Tick scheduler for the mission state machine
//!
//! This module drives the mission without any async runtime dependency.
//! The host calls [`MissionScheduler::tick`] once per period and feeds
//! telemetry and operator requests in between; all three appear
//! sequential to the mission logic.
//!
//! # Components
//!
//! - [`types`]: Tick rate, in-state timer and tick report
//! - [`mission`]: The scheduler owning phase, timer and mission context
//!
//! # Example
//!
//! ```rust
//! use sortie_core::scheduler::MissionScheduler;
//! use sortie_core::traits::RecordingDispatcher;
//! use sortie_core::{FlightPhase, MissionParams};
//!
//! let mut scheduler = MissionScheduler::new(MissionParams::default());
//! let mut dispatcher = RecordingDispatcher::new();
//!
//! // No telemetry yet: the mission waits in init
//! let report = scheduler.tick(&mut dispatcher);
//! assert_eq!(report.phase, FlightPhase::Init);
//! assert_eq!(report.timer, 1);
//! ```

pub mod mission;
pub mod types;

pub use mission::MissionScheduler;
pub use types::{InStateTimer, TickRate, TickReport, DEFAULT_TICK_PERIOD_MS};
