//! MAVLink Command Dispatcher
//!
//! Implements the core [`CommandDispatcher`] by building MAVLink messages
//! and queueing them in an outbox. The mission loop drains the outbox after
//! every tick or operator request and hands the frames to the transport, so
//! the state machine never waits on I/O.
//!
//! # Message Mapping
//!
//! | Request | Message |
//! |---|---|
//! | `request_message_interval` | COMMAND_LONG `MAV_CMD_SET_MESSAGE_INTERVAL` |
//! | `set_mode` | COMMAND_LONG `MAV_CMD_DO_SET_MODE` (custom mode) |
//! | `arm` | COMMAND_LONG `MAV_CMD_COMPONENT_ARM_DISARM` |
//! | `takeoff` | COMMAND_LONG `MAV_CMD_NAV_TAKEOFF` |
//! | `land` | COMMAND_LONG `MAV_CMD_NAV_LAND` |
//! | `publish_setpoint` | SET_POSITION_TARGET_GLOBAL_INT |

use mavlink::common::{
    MavAutopilot, MavCmd, MavFrame, MavMessage, MavModeFlag, MavState, MavType,
    PositionTargetTypemask, COMMAND_LONG_DATA, HEARTBEAT_DATA,
    SET_POSITION_TARGET_GLOBAL_INT_DATA,
};
use sortie_core::navigation::TargetSetpoint;
use sortie_core::{CommandDispatcher, FlightMode};

use super::mode::to_custom_mode;

/// Vehicle the commands are addressed to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandTarget {
    pub system_id: u8,
    pub component_id: u8,
}

impl Default for CommandTarget {
    fn default() -> Self {
        Self {
            system_id: 1,
            component_id: 1, // MAV_COMP_ID_AUTOPILOT1
        }
    }
}

/// Dispatcher that turns mission requests into queued MAVLink messages
#[derive(Debug, Default)]
pub struct MavlinkDispatcher {
    target: CommandTarget,
    outbox: Vec<MavMessage>,
}

impl MavlinkDispatcher {
    pub fn new(target: CommandTarget) -> Self {
        Self {
            target,
            outbox: Vec::new(),
        }
    }

    pub fn target(&self) -> CommandTarget {
        self.target
    }

    /// Number of messages waiting to be sent
    pub fn pending(&self) -> usize {
        self.outbox.len()
    }

    /// Take every queued message, oldest first
    pub fn drain(&mut self) -> Vec<MavMessage> {
        std::mem::take(&mut self.outbox)
    }

    fn command_long(&mut self, command: MavCmd, params: [f32; 7]) {
        let [param1, param2, param3, param4, param5, param6, param7] = params;
        self.outbox.push(MavMessage::COMMAND_LONG(COMMAND_LONG_DATA {
            target_system: self.target.system_id,
            target_component: self.target.component_id,
            command,
            confirmation: 0,
            param1,
            param2,
            param3,
            param4,
            param5,
            param6,
            param7,
        }));
    }
}

impl CommandDispatcher for MavlinkDispatcher {
    fn request_message_interval(&mut self, message_id: u32, interval_us: u32) {
        self.command_long(
            MavCmd::MAV_CMD_SET_MESSAGE_INTERVAL,
            [message_id as f32, interval_us as f32, 0.0, 0.0, 0.0, 0.0, 0.0],
        );
    }

    fn set_mode(&mut self, mode: FlightMode) {
        let base_mode = MavModeFlag::MAV_MODE_FLAG_CUSTOM_MODE_ENABLED.bits() as f32;
        self.command_long(
            MavCmd::MAV_CMD_DO_SET_MODE,
            [base_mode, to_custom_mode(mode) as f32, 0.0, 0.0, 0.0, 0.0, 0.0],
        );
    }

    fn arm(&mut self) {
        self.command_long(
            MavCmd::MAV_CMD_COMPONENT_ARM_DISARM,
            [1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
        );
    }

    fn takeoff(&mut self, altitude: f32) {
        self.command_long(
            MavCmd::MAV_CMD_NAV_TAKEOFF,
            [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, altitude],
        );
    }

    fn land(&mut self) {
        self.command_long(MavCmd::MAV_CMD_NAV_LAND, [0.0; 7]);
    }

    fn publish_setpoint(&mut self, setpoint: &TargetSetpoint) {
        // Position only
        let type_mask = PositionTargetTypemask::POSITION_TARGET_TYPEMASK_VX_IGNORE
            | PositionTargetTypemask::POSITION_TARGET_TYPEMASK_VY_IGNORE
            | PositionTargetTypemask::POSITION_TARGET_TYPEMASK_VZ_IGNORE
            | PositionTargetTypemask::POSITION_TARGET_TYPEMASK_AX_IGNORE
            | PositionTargetTypemask::POSITION_TARGET_TYPEMASK_AY_IGNORE
            | PositionTargetTypemask::POSITION_TARGET_TYPEMASK_AZ_IGNORE
            | PositionTargetTypemask::POSITION_TARGET_TYPEMASK_YAW_IGNORE
            | PositionTargetTypemask::POSITION_TARGET_TYPEMASK_YAW_RATE_IGNORE;

        self.outbox.push(MavMessage::SET_POSITION_TARGET_GLOBAL_INT(
            SET_POSITION_TARGET_GLOBAL_INT_DATA {
                target_system: self.target.system_id,
                target_component: self.target.component_id,
                coordinate_frame: MavFrame::MAV_FRAME_GLOBAL_INT,
                type_mask,
                lat_int: setpoint.lat_e7(),
                lon_int: setpoint.lon_e7(),
                alt: setpoint.altitude,
                ..Default::default()
            },
        ));
    }
}

/// Heartbeat identifying the controller as a ground station
pub fn gcs_heartbeat() -> MavMessage {
    MavMessage::HEARTBEAT(HEARTBEAT_DATA {
        custom_mode: 0,
        mavtype: MavType::MAV_TYPE_GCS,
        autopilot: MavAutopilot::MAV_AUTOPILOT_INVALID,
        base_mode: MavModeFlag::empty(),
        system_status: MavState::MAV_STATE_ACTIVE,
        mavlink_version: 3,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_command(dispatcher: &mut MavlinkDispatcher) -> COMMAND_LONG_DATA {
        let mut messages = dispatcher.drain();
        assert_eq!(messages.len(), 1);
        match messages.remove(0) {
            MavMessage::COMMAND_LONG(cmd) => cmd,
            other => panic!("expected COMMAND_LONG, got {:?}", other),
        }
    }

    #[test]
    fn test_message_interval() {
        let mut dispatcher = MavlinkDispatcher::default();
        dispatcher.request_message_interval(33, 1_000_000);

        let cmd = single_command(&mut dispatcher);
        assert_eq!(cmd.command, MavCmd::MAV_CMD_SET_MESSAGE_INTERVAL);
        assert_eq!(cmd.param1, 33.0);
        assert_eq!(cmd.param2, 1_000_000.0);
        assert_eq!(cmd.target_system, 1);
    }

    #[test]
    fn test_set_mode_uses_custom_mode() {
        let mut dispatcher = MavlinkDispatcher::default();
        dispatcher.set_mode(FlightMode::Guided);

        let cmd = single_command(&mut dispatcher);
        assert_eq!(cmd.command, MavCmd::MAV_CMD_DO_SET_MODE);
        assert_eq!(cmd.param1, 1.0);
        assert_eq!(cmd.param2, 4.0);
    }

    #[test]
    fn test_arm_and_takeoff() {
        let mut dispatcher = MavlinkDispatcher::new(CommandTarget {
            system_id: 7,
            component_id: 1,
        });
        dispatcher.arm();
        let cmd = single_command(&mut dispatcher);
        assert_eq!(cmd.command, MavCmd::MAV_CMD_COMPONENT_ARM_DISARM);
        assert_eq!(cmd.param1, 1.0);
        assert_eq!(cmd.target_system, 7);

        dispatcher.takeoff(20.0);
        let cmd = single_command(&mut dispatcher);
        assert_eq!(cmd.command, MavCmd::MAV_CMD_NAV_TAKEOFF);
        assert_eq!(cmd.param7, 20.0);
    }

    #[test]
    fn test_land() {
        let mut dispatcher = MavlinkDispatcher::default();
        dispatcher.land();
        assert_eq!(
            single_command(&mut dispatcher).command,
            MavCmd::MAV_CMD_NAV_LAND
        );
    }

    #[test]
    fn test_setpoint_encoding() {
        let mut dispatcher = MavlinkDispatcher::default();
        dispatcher.publish_setpoint(&TargetSetpoint::new(51.424, -2.672, 70.0));

        let messages = dispatcher.drain();
        let MavMessage::SET_POSITION_TARGET_GLOBAL_INT(sp) = &messages[0] else {
            panic!("expected setpoint, got {:?}", messages[0]);
        };
        assert_eq!(sp.lat_int, 514_240_000);
        assert_eq!(sp.lon_int, -26_720_000);
        assert_eq!(sp.alt, 70.0);
        assert!(sp
            .type_mask
            .contains(PositionTargetTypemask::POSITION_TARGET_TYPEMASK_VX_IGNORE));
        assert_eq!(sp.coordinate_frame, MavFrame::MAV_FRAME_GLOBAL_INT);
    }

    #[test]
    fn test_drain_empties_outbox() {
        let mut dispatcher = MavlinkDispatcher::default();
        dispatcher.arm();
        dispatcher.land();
        assert_eq!(dispatcher.pending(), 2);
        assert_eq!(dispatcher.drain().len(), 2);
        assert_eq!(dispatcher.pending(), 0);
    }
}
