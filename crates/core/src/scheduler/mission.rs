//! Mission Scheduler
//!
//! Owns the flight phase, the in-state timer, the mission context, the
//! operator inputs and the telemetry snapshot. It is the only writer of
//! phase and timer: telemetry updates and operator requests only change
//! what the next tick observes.

use heapless::Vec;

use super::types::{InStateTimer, TickReport};
use crate::mission::{
    FlightPhase, InputRejected, MissionController, MissionEvent, MissionInput, MissionInputs,
    ModeRequest, StartOutcome, TimerAction, Waypoint,
};
use crate::parameters::MissionParams;
use crate::telemetry::{FlightMode, TelemetryStore, TelemetryUpdate};
use crate::traits::CommandDispatcher;

/// Drives the mission state machine one tick at a time
#[derive(Debug, Clone)]
pub struct MissionScheduler {
    phase: FlightPhase,
    timer: InStateTimer,
    tick_count: u64,
    controller: MissionController,
    inputs: MissionInputs,
    telemetry: TelemetryStore,
}

impl MissionScheduler {
    pub fn new(params: MissionParams) -> Self {
        Self {
            phase: FlightPhase::Init,
            timer: InStateTimer::new(),
            tick_count: 0,
            controller: MissionController::new(params),
            inputs: MissionInputs::new(),
            telemetry: TelemetryStore::new(),
        }
    }

    pub fn phase(&self) -> FlightPhase {
        self.phase
    }

    /// Ticks spent in the current phase
    pub fn timer(&self) -> u32 {
        self.timer.ticks()
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn input(&self) -> MissionInput {
        self.inputs.input()
    }

    pub fn inputs(&self) -> &MissionInputs {
        &self.inputs
    }

    pub fn controller(&self) -> &MissionController {
        &self.controller
    }

    pub fn telemetry(&self) -> &TelemetryStore {
        &self.telemetry
    }

    /// Relative altitude above the arming point, if known
    pub fn relative_altitude(&self) -> Option<f32> {
        self.telemetry
            .relative_altitude(self.controller.altitude_origin())
    }

    // ========================================================================
    // Inbound updates
    // ========================================================================

    /// Record a telemetry update for the next tick
    pub fn apply_telemetry(&mut self, update: TelemetryUpdate) {
        self.telemetry.apply(update);
    }

    /// Replace the waypoint list; only allowed before the mission starts
    pub fn set_waypoints(&mut self, waypoints: &[Waypoint]) -> Result<usize, InputRejected> {
        self.inputs.set_waypoints(waypoints)
    }

    /// Operator start
    ///
    /// Launches from `arming`, or resumes a paused mission. Resuming a climb
    /// or a waypoint run requests guided mode again so setpoints are
    /// followed; `landing` and `RTL` resume in whatever mode the vehicle has.
    pub fn request_start(
        &mut self,
        dispatcher: &mut dyn CommandDispatcher,
    ) -> Result<StartOutcome, InputRejected> {
        let outcome = self.inputs.start(self.phase)?;
        if outcome == StartOutcome::Resumed
            && matches!(self.phase, FlightPhase::Climbing | FlightPhase::OnWay)
        {
            self.controller
                .request_mode(FlightMode::Guided, &self.telemetry, dispatcher);
        }
        Ok(outcome)
    }

    /// Operator pause: freezes the mission and asks the vehicle to loiter
    pub fn request_pause(
        &mut self,
        dispatcher: &mut dyn CommandDispatcher,
    ) -> Result<ModeRequest, InputRejected> {
        self.inputs.pause(self.phase)?;
        Ok(self
            .controller
            .request_mode(FlightMode::Loiter, &self.telemetry, dispatcher))
    }

    /// Operator manual mode selection (0 manual, 1 loiter, 2 guided, 3 RTL)
    pub fn select_mode(
        &mut self,
        code: i32,
        dispatcher: &mut dyn CommandDispatcher,
    ) -> Result<ModeRequest, InputRejected> {
        let mode = self.inputs.manual_mode(code)?;
        Ok(self
            .controller
            .request_mode(mode, &self.telemetry, dispatcher))
    }

    // ========================================================================
    // Tick
    // ========================================================================

    /// Evaluate the state machine once and commit the result
    pub fn tick(&mut self, dispatcher: &mut dyn CommandDispatcher) -> TickReport {
        self.tick_count += 1;
        let previous = self.phase;
        let input = self.inputs.input();

        let result = self.controller.evaluate(
            previous,
            input,
            self.timer.ticks(),
            &self.telemetry,
            self.inputs.waypoints(),
            dispatcher,
        );

        let (next, action, events, fallback) = match result {
            Ok(transition) => (transition.next, transition.timer, transition.events, None),
            Err(condition) => {
                let mut events = Vec::new();
                let _ = events.push(MissionEvent::Unexpected(condition));
                (FlightPhase::Landing, TimerAction::Advance, events, Some(condition))
            }
        };

        self.timer.commit(next != previous, action);
        self.phase = next;

        TickReport {
            tick: self.tick_count,
            previous,
            phase: next,
            timer: self.timer.ticks(),
            input,
            events,
            fallback,
        }
    }
}
