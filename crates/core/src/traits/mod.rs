//! Core traits for platform-agnostic mission control.
//!
//! This module provides trait abstractions that decouple the mission logic
//! from the vehicle link that carries its requests.
//!
//! # Design
//!
//! - Trait definitions are pure and have no feature gates
//! - Recording implementations are always available for host testing
//! - The MAVLink implementation lives in the host crate

pub mod dispatcher;

pub use dispatcher::{CommandDispatcher, RecordingDispatcher, RECORDING_CAPACITY};
