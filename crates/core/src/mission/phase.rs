//! Flight phase of the mission state machine

use core::fmt;

/// Mission flight phase
///
/// Normal progression is `Init -> Arming -> Climbing -> OnWay -> Rtl`, with
/// `Landing` and `Exit` reached through fallbacks and timeouts. `Exit` is
/// terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlightPhase {
    /// Waiting for the autopilot to report standby
    #[default]
    Init,
    /// Ready; waiting for the operator, then arming
    Arming,
    /// Takeoff issued, climbing to mission altitude
    Climbing,
    /// Traversing the waypoint list
    OnWay,
    /// Landing in place
    Landing,
    /// Returning to launch
    Rtl,
    /// Mission finished or aborted; nothing more is commanded
    Exit,
}

impl FlightPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlightPhase::Init => "init",
            FlightPhase::Arming => "arming",
            FlightPhase::Climbing => "climbing",
            FlightPhase::OnWay => "on_way",
            FlightPhase::Landing => "landing",
            FlightPhase::Rtl => "RTL",
            FlightPhase::Exit => "exit",
        }
    }

    /// Phases in which the vehicle may be airborne and a pause is meaningful
    pub fn is_pausable(&self) -> bool {
        matches!(
            self,
            FlightPhase::Climbing | FlightPhase::OnWay | FlightPhase::Landing | FlightPhase::Rtl
        )
    }

    /// Phases that stay frozen while the mission input is paused
    pub fn freezes_on_pause(&self) -> bool {
        self.is_pausable() || *self == FlightPhase::Exit
    }
}

impl fmt::Display for FlightPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_init() {
        assert_eq!(FlightPhase::default(), FlightPhase::Init);
    }

    #[test]
    fn test_pausable_phases() {
        assert!(!FlightPhase::Init.is_pausable());
        assert!(!FlightPhase::Arming.is_pausable());
        assert!(FlightPhase::Climbing.is_pausable());
        assert!(FlightPhase::OnWay.is_pausable());
        assert!(FlightPhase::Landing.is_pausable());
        assert!(FlightPhase::Rtl.is_pausable());
        assert!(!FlightPhase::Exit.is_pausable());
        assert!(FlightPhase::Exit.freezes_on_pause());
        assert!(!FlightPhase::Arming.freezes_on_pause());
    }
}
