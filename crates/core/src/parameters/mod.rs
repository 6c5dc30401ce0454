//! Parameter management types
//!
//! In-memory parameter store and the mission tuning parameters built on it.
//! The host crate applies start-up overrides through
//! [`ParameterStore::set_from_str`].

pub mod error;
pub mod mission;
pub mod storage;

pub use error::ParameterError;
pub use mission::MissionParams;
pub use storage::{ParamEntry, ParamFlags, ParamValue, ParameterStore, MAX_PARAMS, PARAM_NAME_LEN};
