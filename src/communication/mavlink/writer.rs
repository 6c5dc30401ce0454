//! MAVLink Message Writer
//!
//! Serializes outbound messages into MAVLink 2.0 frames with the
//! controller's own system/component ids and a wrapping sequence number.

use std::io::Cursor;

use mavlink::common::MavMessage;
use mavlink::MavHeader;

use crate::error::LinkError;

/// Largest MAVLink 2.0 frame (header + payload + checksum + signature)
pub const MAX_FRAME_SIZE: usize = 280;

/// Writer statistics for diagnostics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriterStats {
    /// Frames successfully encoded
    pub messages_encoded: u32,
    /// Frames that failed to encode
    pub encode_errors: u32,
}

/// MAVLink 2.0 frame encoder
#[derive(Debug)]
pub struct MavlinkWriter {
    system_id: u8,
    component_id: u8,
    sequence: u8,
    stats: WriterStats,
}

impl MavlinkWriter {
    pub fn new(system_id: u8, component_id: u8) -> Self {
        Self {
            system_id,
            component_id,
            sequence: 0,
            stats: WriterStats::default(),
        }
    }

    pub fn stats(&self) -> WriterStats {
        self.stats
    }

    pub fn sequence(&self) -> u8 {
        self.sequence
    }

    /// Encode one message into a frame, consuming a sequence number
    pub fn encode(&mut self, message: &MavMessage) -> Result<Vec<u8>, LinkError> {
        let header = MavHeader {
            system_id: self.system_id,
            component_id: self.component_id,
            sequence: self.sequence,
        };
        self.sequence = self.sequence.wrapping_add(1);

        let mut buf = Cursor::new(Vec::with_capacity(MAX_FRAME_SIZE));
        match mavlink::write_v2_msg(&mut buf, header, message) {
            Ok(_) => {
                self.stats.messages_encoded += 1;
                Ok(buf.into_inner())
            }
            Err(e) => {
                self.stats.encode_errors += 1;
                Err(LinkError::Encode(format!("{e:?}")))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::communication::mavlink::parser::MavlinkParser;
    use mavlink::common::{MavAutopilot, MavModeFlag, MavState, MavType, HEARTBEAT_DATA};

    fn gcs_heartbeat() -> MavMessage {
        MavMessage::HEARTBEAT(HEARTBEAT_DATA {
            custom_mode: 0,
            mavtype: MavType::MAV_TYPE_GCS,
            autopilot: MavAutopilot::MAV_AUTOPILOT_INVALID,
            base_mode: MavModeFlag::empty(),
            system_status: MavState::MAV_STATE_ACTIVE,
            mavlink_version: 3,
        })
    }

    #[test]
    fn test_sequence_wraps() {
        let mut writer = MavlinkWriter::new(255, 190);
        for _ in 0..256 {
            writer.encode(&gcs_heartbeat()).unwrap();
        }
        assert_eq!(writer.sequence(), 0);
        assert_eq!(writer.stats().messages_encoded, 256);
    }

    #[test]
    fn test_frame_carries_our_ids() {
        let mut writer = MavlinkWriter::new(255, 190);
        writer.encode(&gcs_heartbeat()).unwrap();
        let frame = writer.encode(&gcs_heartbeat()).unwrap();
        assert!(frame.len() <= MAX_FRAME_SIZE);

        let mut parser = MavlinkParser::new(255);
        let messages = parser.parse_datagram(&frame);
        assert_eq!(messages.len(), 1);
        let (header, _) = &messages[0];
        assert_eq!(header.component_id, 190);
        assert_eq!(header.sequence, 1);
    }
}
