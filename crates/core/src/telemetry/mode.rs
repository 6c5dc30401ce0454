//! Flight mode tags
//!
//! Autopilot-agnostic names for the modes the controller requests or
//! observes. Mapping to autopilot-specific custom mode numbers happens at
//! the link boundary.

use core::fmt;

/// Autopilot operating mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlightMode {
    /// Pilot-stabilised manual flight
    Manual,
    /// Hold current position
    Loiter,
    /// Follow externally supplied setpoints
    Guided,
    /// Return to launch
    Rtl,
    /// Autonomous landing
    Land,
    /// Any other mode, carried as the raw custom mode number
    Other(u32),
}

impl FlightMode {
    /// Map an operator manual-mode code to a mode
    ///
    /// 0 = manual, 1 = loiter, 2 = guided, 3 = RTL. Anything else is `None`.
    pub fn from_operator_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(FlightMode::Manual),
            1 => Some(FlightMode::Loiter),
            2 => Some(FlightMode::Guided),
            3 => Some(FlightMode::Rtl),
            _ => None,
        }
    }

    /// Mode name for logging
    pub fn as_str(&self) -> &'static str {
        match self {
            FlightMode::Manual => "MANUAL",
            FlightMode::Loiter => "LOITER",
            FlightMode::Guided => "GUIDED",
            FlightMode::Rtl => "RTL",
            FlightMode::Land => "LAND",
            FlightMode::Other(_) => "OTHER",
        }
    }
}

impl fmt::Display for FlightMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlightMode::Other(n) => write!(f, "OTHER({})", n),
            mode => f.write_str(mode.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;
    use std::format;

    use super::*;

    #[test]
    fn test_operator_codes() {
        assert_eq!(FlightMode::from_operator_code(0), Some(FlightMode::Manual));
        assert_eq!(FlightMode::from_operator_code(1), Some(FlightMode::Loiter));
        assert_eq!(FlightMode::from_operator_code(2), Some(FlightMode::Guided));
        assert_eq!(FlightMode::from_operator_code(3), Some(FlightMode::Rtl));
        assert_eq!(FlightMode::from_operator_code(4), None);
        assert_eq!(FlightMode::from_operator_code(-1), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", FlightMode::Rtl), "RTL");
        assert_eq!(format!("{}", FlightMode::Other(17)), "OTHER(17)");
    }
}
