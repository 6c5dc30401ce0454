//! MAVLink vehicle link
//!
//! Everything that knows about the MAVLink wire format lives here. The
//! core mission logic only sees [`sortie_core::TelemetryUpdate`]s coming in
//! and [`sortie_core::CommandDispatcher`] calls going out.
//!
//! # Modules
//!
//! - `transport`: Datagram transport trait, UDP and mock implementations
//! - `parser`: Datagram → MAVLink 2.0 messages, filtered to the vehicle
//! - `writer`: MAVLink 2.0 frame encoding with our ids and sequence
//! - `telemetry`: Vehicle messages → telemetry updates
//! - `dispatcher`: Mission requests → queued MAVLink messages
//! - `mode`: ArduCopter custom mode numbers

pub mod dispatcher;
pub mod mode;
pub mod parser;
pub mod telemetry;
pub mod transport;
pub mod writer;

pub use dispatcher::{gcs_heartbeat, CommandTarget, MavlinkDispatcher};
pub use parser::{MavlinkParser, ParserStats};
pub use transport::{MockTransport, VehicleTransport};
pub use writer::{MavlinkWriter, WriterStats};

/// Component id the controller sends with (MAV_COMP_ID_MISSIONPLANNER)
pub const CONTROLLER_COMPONENT_ID: u8 = 190;
