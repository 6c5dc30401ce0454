//! ArduCopter custom mode mapping
//!
//! The core works with [`FlightMode`] tags; the autopilot speaks numeric
//! custom modes in HEARTBEAT and DO_SET_MODE. This is the only place the
//! two meet.

use sortie_core::FlightMode;

/// ArduCopter STABILIZE
pub const COPTER_MODE_STABILIZE: u32 = 0;
/// ArduCopter GUIDED
pub const COPTER_MODE_GUIDED: u32 = 4;
/// ArduCopter LOITER
pub const COPTER_MODE_LOITER: u32 = 5;
/// ArduCopter RTL
pub const COPTER_MODE_RTL: u32 = 6;
/// ArduCopter LAND
pub const COPTER_MODE_LAND: u32 = 9;

/// Custom mode number for a flight mode
pub fn to_custom_mode(mode: FlightMode) -> u32 {
    match mode {
        FlightMode::Manual => COPTER_MODE_STABILIZE,
        FlightMode::Guided => COPTER_MODE_GUIDED,
        FlightMode::Loiter => COPTER_MODE_LOITER,
        FlightMode::Rtl => COPTER_MODE_RTL,
        FlightMode::Land => COPTER_MODE_LAND,
        FlightMode::Other(n) => n,
    }
}

/// Flight mode for a heartbeat custom mode number
pub fn from_custom_mode(custom_mode: u32) -> FlightMode {
    match custom_mode {
        COPTER_MODE_STABILIZE => FlightMode::Manual,
        COPTER_MODE_GUIDED => FlightMode::Guided,
        COPTER_MODE_LOITER => FlightMode::Loiter,
        COPTER_MODE_RTL => FlightMode::Rtl,
        COPTER_MODE_LAND => FlightMode::Land,
        n => FlightMode::Other(n),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_modes_round_trip() {
        for mode in [
            FlightMode::Manual,
            FlightMode::Loiter,
            FlightMode::Guided,
            FlightMode::Rtl,
            FlightMode::Land,
        ] {
            assert_eq!(from_custom_mode(to_custom_mode(mode)), mode);
        }
    }

    #[test]
    fn test_unknown_custom_mode_is_carried() {
        // ArduCopter AUTO
        assert_eq!(from_custom_mode(3), FlightMode::Other(3));
        assert_eq!(to_custom_mode(FlightMode::Other(3)), 3);
    }

    #[test]
    fn test_guided_number() {
        assert_eq!(to_custom_mode(FlightMode::Guided), 4);
        assert_eq!(to_custom_mode(FlightMode::Rtl), 6);
    }
}
