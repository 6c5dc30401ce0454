//! Inbound telemetry decoding
//!
//! Maps vehicle MAVLink messages onto core [`TelemetryUpdate`]s. Messages
//! the controller has no use for decode to `None`.
//!
//! | Message | Update |
//! |---|---|
//! | HEARTBEAT | `Status` (armed flag, `MAV_STATE`, custom mode) |
//! | GLOBAL_POSITION_INT | `Position` (degE7 → deg, mm → m) |
//! | LOCAL_POSITION_NED | `LocalPosition` |
//! | ATTITUDE_QUATERNION | `Attitude` |
//! | BATTERY_STATUS / SYS_STATUS | `Battery` (percent remaining) |

use mavlink::common::{MavAutopilot, MavMessage, MavModeFlag};
use sortie_core::{Position, TelemetryUpdate, VehicleStatus};

use super::mode::from_custom_mode;

/// Decode a vehicle message into a telemetry update
pub fn decode(msg: &MavMessage) -> Option<TelemetryUpdate> {
    match msg {
        MavMessage::HEARTBEAT(hb) => {
            // Heartbeats from non-autopilot components share the system id
            if hb.autopilot == MavAutopilot::MAV_AUTOPILOT_INVALID {
                return None;
            }
            Some(TelemetryUpdate::Status(VehicleStatus {
                armed: hb.base_mode.contains(MavModeFlag::MAV_MODE_FLAG_SAFETY_ARMED),
                system_status: hb.system_status as u8,
                mode: from_custom_mode(hb.custom_mode),
            }))
        }
        MavMessage::GLOBAL_POSITION_INT(pos) => Some(TelemetryUpdate::Position(Position::new(
            pos.lat as f64 * 1e-7,
            pos.lon as f64 * 1e-7,
            pos.alt as f32 / 1000.0,
        ))),
        MavMessage::LOCAL_POSITION_NED(local) => {
            Some(TelemetryUpdate::LocalPosition([local.x, local.y, local.z]))
        }
        MavMessage::ATTITUDE_QUATERNION(att) => {
            Some(TelemetryUpdate::Attitude([att.q1, att.q2, att.q3, att.q4]))
        }
        MavMessage::BATTERY_STATUS(battery) => battery_percent(battery.battery_remaining),
        MavMessage::SYS_STATUS(status) => battery_percent(status.battery_remaining),
        _ => None,
    }
}

/// -1 means the autopilot does not estimate remaining capacity
fn battery_percent(remaining: i8) -> Option<TelemetryUpdate> {
    (remaining >= 0).then(|| TelemetryUpdate::Battery(remaining as f32))
}
