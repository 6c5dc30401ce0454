//! MAVLink Datagram Parser
//!
//! Turns received UDP datagrams into MAVLink 2.0 messages using
//! rust-mavlink's `read_v2_msg()`. A datagram may carry several frames
//! back to back; all of them are returned.
//!
//! Messages from systems other than the configured vehicle are dropped
//! here so the rest of the controller only ever sees its own vehicle.

use std::io::Cursor;

use mavlink::common::MavMessage;
use mavlink::error::MessageReadError;
use mavlink::peek_reader::PeekReader;
use mavlink::MavHeader;

/// Parser statistics for diagnostics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParserStats {
    /// Messages successfully parsed and accepted
    pub messages_received: u32,
    /// Frames with a valid checksum that failed to decode
    pub parse_errors: u32,
    /// Valid frames from a system other than the vehicle
    pub foreign_messages: u32,
}

/// MAVLink datagram parser
#[derive(Debug)]
pub struct MavlinkParser {
    /// Only messages from this system id are accepted
    vehicle_system_id: u8,
    stats: ParserStats,
}

impl MavlinkParser {
    pub fn new(vehicle_system_id: u8) -> Self {
        Self {
            vehicle_system_id,
            stats: ParserStats::default(),
        }
    }

    pub fn stats(&self) -> ParserStats {
        self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = ParserStats::default();
    }

    /// Parse every MAVLink 2.0 frame in a datagram
    ///
    /// Bytes that do not form a valid frame are skipped. Parsing stops at
    /// the first decode error; frames decoded before it are still returned.
    pub fn parse_datagram(&mut self, data: &[u8]) -> Vec<(MavHeader, MavMessage)> {
        let mut messages = Vec::new();
        let mut reader = PeekReader::new(Cursor::new(data));

        loop {
            match mavlink::read_v2_msg::<MavMessage, _>(&mut reader) {
                Ok((header, msg)) => {
                    if header.system_id != self.vehicle_system_id {
                        self.stats.foreign_messages += 1;
                        continue;
                    }
                    self.stats.messages_received += 1;
                    messages.push((header, msg));
                }
                Err(MessageReadError::Io(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                    break;
                }
                Err(_) => {
                    self.stats.parse_errors += 1;
                    break;
                }
            }
        }

        messages
    }
}
