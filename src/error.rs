use std::path::PathBuf;

use sortie_core::parameters::ParameterError;

/// Errors raised by the host side of the controller.
#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    #[error("Encode error: {0}")]
    Encode(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("No vehicle endpoint known yet")]
    NoPeer,

    #[error("Transport closed")]
    Closed,

    #[error("{}:{line}: {reason}", .path.display())]
    WaypointParse {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("Too many waypoints in {}: {count}", .path.display())]
    WaypointOverflow { path: PathBuf, count: usize },

    #[error("Parameter override '{spec}': {reason}")]
    ParameterOverride { spec: String, reason: String },

    #[error("Parameter {name}: {error}")]
    Parameter { name: String, error: ParameterError },

    #[error("Unknown command '{0}' (try: start, pause, mode <0-3>, waypoints <file>, status)")]
    UnknownCommand(String),

    #[error("{command}: {reason}")]
    InvalidArgument {
        command: &'static str,
        reason: String,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
