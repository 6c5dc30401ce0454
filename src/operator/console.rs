//! Operator console
//!
//! Reads commands from stdin, one per line, and forwards them to the
//! mission loop over a channel:
//!
//! - `start`: launch the mission, or resume it when paused
//! - `pause`: hold position
//! - `mode <code>`: while paused, 0 manual, 1 loiter, 2 guided, 3 RTL
//! - `waypoints <file>`: replace the waypoint list (before start only)
//! - `status`: log a one-line mission summary
//!
//! Malformed lines are reported and dropped here; validation against the
//! mission state happens in the loop.

use std::path::PathBuf;

use log::{error, info};
use sortie_core::Waypoint;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;

use super::waypoints::load_waypoints;
use crate::error::LinkError;

/// Command delivered to the mission loop
#[derive(Debug, Clone, PartialEq)]
pub enum OperatorCommand {
    Start,
    Pause,
    Mode(i32),
    Waypoints(Vec<Waypoint>),
    Status,
}

/// A parsed console line, before any file is read
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Start,
    Pause,
    Mode(i32),
    Waypoints(PathBuf),
    Status,
}

/// Parse one console line; blank lines yield `None`
pub fn parse_command(line: &str) -> Result<Option<ConsoleCommand>, LinkError> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(None);
    };
    let rest: Vec<&str> = words.collect();

    let command = match (verb.to_ascii_lowercase().as_str(), rest.as_slice()) {
        ("start", []) => ConsoleCommand::Start,
        ("pause", []) => ConsoleCommand::Pause,
        ("status", []) => ConsoleCommand::Status,
        ("mode", [code]) => {
            let code = code.parse().map_err(|_| LinkError::InvalidArgument {
                command: "mode",
                reason: format!("'{code}' is not an integer"),
            })?;
            ConsoleCommand::Mode(code)
        }
        ("mode", _) => {
            return Err(LinkError::InvalidArgument {
                command: "mode",
                reason: "expected exactly one mode code".to_string(),
            })
        }
        ("waypoints", [path]) => ConsoleCommand::Waypoints(PathBuf::from(path)),
        ("waypoints", _) => {
            return Err(LinkError::InvalidArgument {
                command: "waypoints",
                reason: "expected exactly one file path".to_string(),
            })
        }
        _ => return Err(LinkError::UnknownCommand(line.trim().to_string())),
    };

    Ok(Some(command))
}

/// Resolve a console command into a loop command, loading files as needed
pub async fn resolve(command: ConsoleCommand) -> Result<OperatorCommand, LinkError> {
    Ok(match command {
        ConsoleCommand::Start => OperatorCommand::Start,
        ConsoleCommand::Pause => OperatorCommand::Pause,
        ConsoleCommand::Mode(code) => OperatorCommand::Mode(code),
        ConsoleCommand::Status => OperatorCommand::Status,
        ConsoleCommand::Waypoints(path) => {
            let waypoints = load_waypoints(&path).await?;
            info!("Loaded {} waypoints from {}", waypoints.len(), path.display());
            OperatorCommand::Waypoints(waypoints)
        }
    })
}

/// Forward console lines from `input` until EOF or the loop goes away
pub async fn run_console<R>(input: R, commands: mpsc::Sender<OperatorCommand>)
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => {
                info!("Operator console closed");
                return;
            }
            Err(e) => {
                error!("Operator console read failed: {}", e);
                return;
            }
        };

        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                error!("{}", e);
                continue;
            }
        };

        match resolve(command).await {
            Ok(command) => {
                if commands.send(command).await.is_err() {
                    return;
                }
            }
            Err(e) => error!("{}", e),
        }
    }
}
