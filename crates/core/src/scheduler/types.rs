//! Core types for the tick scheduler
//!
//! - `TickRate`: Fixed tick period configuration
//! - `InStateTimer`: Ticks spent in the current phase
//! - `TickReport`: Everything that happened during one tick

use heapless::Vec;

use crate::mission::{
    FlightPhase, MissionEvent, MissionInput, TimerAction, UnexpectedCondition, MAX_TICK_EVENTS,
};

/// Default tick period (1 Hz)
pub const DEFAULT_TICK_PERIOD_MS: u32 = 1_000;

/// Tick period configuration
///
/// Timeouts are counted in ticks, so changing the period scales every
/// mission timeout with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickRate {
    /// Period between ticks in milliseconds (must be non-zero)
    pub period_ms: u32,
}

impl TickRate {
    /// Create a tick rate, rejecting a zero period
    pub const fn new(period_ms: u32) -> Option<Self> {
        if period_ms == 0 {
            None
        } else {
            Some(Self { period_ms })
        }
    }

    /// Tick period in microseconds
    #[inline]
    pub const fn period_us(&self) -> u64 {
        self.period_ms as u64 * 1_000
    }

    /// Wall-clock seconds covered by `ticks` ticks
    #[inline]
    pub fn seconds(&self, ticks: u32) -> f32 {
        ticks as f32 * self.period_ms as f32 / 1_000.0
    }
}

impl Default for TickRate {
    fn default() -> Self {
        Self {
            period_ms: DEFAULT_TICK_PERIOD_MS,
        }
    }
}

/// Number of ticks spent in the current phase
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InStateTimer {
    ticks: u32,
}

impl InStateTimer {
    pub const fn new() -> Self {
        Self { ticks: 0 }
    }

    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    /// Commit the outcome of one tick
    pub fn commit(&mut self, phase_changed: bool, action: TimerAction) {
        self.ticks = if phase_changed {
            0
        } else {
            match action {
                TimerAction::Advance => self.ticks.saturating_add(1),
                TimerAction::Restart => 1,
                TimerAction::Hold => self.ticks,
            }
        };
    }
}

/// Outcome of a single tick
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    /// Tick sequence number, starting at 1
    pub tick: u64,
    /// Phase before the tick
    pub previous: FlightPhase,
    /// Phase after the tick
    pub phase: FlightPhase,
    /// In-state timer after the tick
    pub timer: u32,
    /// Operator input the tick was evaluated with
    pub input: MissionInput,
    pub events: Vec<MissionEvent, MAX_TICK_EVENTS>,
    /// Set when the tick fell back to `landing`
    pub fallback: Option<UnexpectedCondition>,
}

impl TickReport {
    pub fn phase_changed(&self) -> bool {
        self.previous != self.phase
    }
}
