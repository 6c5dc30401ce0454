//! Mission Controller
//!
//! The per-tick transition function of the mission state machine. Given the
//! current phase, the operator input, the in-state timer and a telemetry
//! snapshot, [`MissionController::evaluate`] decides the next phase and
//! issues autopilot requests through a [`CommandDispatcher`].
//!
//! The controller owns the mission context that survives across ticks:
//! the current setpoint, waypoint progress and the altitude origin captured
//! at arming. It never touches the phase or the
//! timer; those belong to the scheduler, which applies the returned
//! [`Transition`].
//!
//! # Transitions
//!
//! | Phase | Input | Outcome |
//! |-------|-------|---------|
//! | init | idle | `arming` once status is ready (streams + guided requested) |
//! | arming | idle | stay, timer restarted |
//! | arming | run | `climbing` once armed, `exit` after the arming timeout, else re-arm |
//! | climbing | run | `on_way` above the climb threshold, `RTL` after the climb timeout |
//! | on_way | run | setpoint per waypoint, advance on arrival, `RTL` after the last or on timeout |
//! | landing | run | land requested every tick |
//! | RTL | run | RTL mode requested every tick until telemetry reports it |
//! | exit | run | nothing |
//! | airborne or exit | paused | frozen |
//!
//! Every other combination is an [`UnexpectedCondition`].

use heapless::Vec;

use super::event::{MissionEvent, UnexpectedCondition, MAX_TICK_EVENTS};
use super::input::MissionInput;
use super::phase::FlightPhase;
use super::MissionStorage;
use crate::navigation::{has_arrived, target_error, ArrivalCheck, TargetSetpoint};
use crate::parameters::MissionParams;
use crate::telemetry::{FlightMode, TelemetryStore};
use crate::traits::CommandDispatcher;

/// GLOBAL_POSITION_INT
pub const MSG_ID_GLOBAL_POSITION_INT: u32 = 33;
/// LOCAL_POSITION_NED
pub const MSG_ID_LOCAL_POSITION_NED: u32 = 32;
/// BATTERY_STATUS
pub const MSG_ID_BATTERY_STATUS: u32 = 147;

/// Telemetry streams requested when the autopilot becomes ready
pub const TELEMETRY_STREAMS: [u32; 3] = [
    MSG_ID_GLOBAL_POSITION_INT,
    MSG_ID_LOCAL_POSITION_NED,
    MSG_ID_BATTERY_STATUS,
];

/// How the scheduler updates the in-state timer when the phase is unchanged
///
/// A phase change always resets the timer to zero regardless of the action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerAction {
    /// Increment by one
    Advance,
    /// Reset to zero, then increment
    Restart,
    /// Leave untouched
    Hold,
}

/// Result of one evaluation
#[derive(Clone, Debug, PartialEq)]
pub struct Transition {
    pub next: FlightPhase,
    pub timer: TimerAction,
    pub events: Vec<MissionEvent, MAX_TICK_EVENTS>,
}

impl Transition {
    /// Move to `next` (or stay, when `next` is the current phase) with the
    /// timer advancing
    fn new(next: FlightPhase) -> Self {
        Self {
            next,
            timer: TimerAction::Advance,
            events: Vec::new(),
        }
    }

    /// Replace the target phase, keeping the events gathered so far
    fn redirect(mut self, next: FlightPhase) -> Self {
        self.next = next;
        self
    }

    fn restart_timer(mut self) -> Self {
        self.timer = TimerAction::Restart;
        self
    }

    fn hold_timer(mut self) -> Self {
        self.timer = TimerAction::Hold;
        self
    }

    fn push(&mut self, event: MissionEvent) {
        let _ = self.events.push(event);
    }

    fn with(mut self, event: MissionEvent) -> Self {
        self.push(event);
        self
    }
}

/// Outcome of a mode change request
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModeRequest {
    /// Request sent to the autopilot
    Requested(FlightMode),
    /// Telemetry already reports the mode; nothing sent
    AlreadySet(FlightMode),
}

impl ModeRequest {
    pub fn mode(&self) -> FlightMode {
        match self {
            ModeRequest::Requested(mode) | ModeRequest::AlreadySet(mode) => *mode,
        }
    }

    pub fn into_event(self) -> MissionEvent {
        match self {
            ModeRequest::Requested(mode) => MissionEvent::ModeRequested(mode),
            ModeRequest::AlreadySet(mode) => MissionEvent::ModeAlreadySet(mode),
        }
    }
}

/// Mission context and transition logic
#[derive(Debug, Clone)]
pub struct MissionController {
    params: MissionParams,
    /// Last published setpoint
    target: Option<TargetSetpoint>,
    waypoint_index: usize,
    /// Setpoint for `waypoint_index` has been published
    en_route: bool,
    /// Absolute altitude when arming succeeded
    altitude_origin: Option<f32>,
}

impl MissionController {
    pub fn new(params: MissionParams) -> Self {
        Self {
            params,
            target: None,
            waypoint_index: 0,
            en_route: false,
            altitude_origin: None,
        }
    }

    pub fn params(&self) -> &MissionParams {
        &self.params
    }

    pub fn target(&self) -> Option<&TargetSetpoint> {
        self.target.as_ref()
    }

    pub fn waypoint_index(&self) -> usize {
        self.waypoint_index
    }

    pub fn is_en_route(&self) -> bool {
        self.en_route
    }

    pub fn altitude_origin(&self) -> Option<f32> {
        self.altitude_origin
    }

    /// Request `mode` unless telemetry already reports it
    ///
    /// Only telemetry suppresses a request, so a lost or refused mode
    /// change is sent again on the next call.
    pub fn request_mode(
        &self,
        mode: FlightMode,
        telemetry: &TelemetryStore,
        dispatcher: &mut dyn CommandDispatcher,
    ) -> ModeRequest {
        if telemetry.mode() == Some(mode) {
            return ModeRequest::AlreadySet(mode);
        }

        dispatcher.set_mode(mode);
        ModeRequest::Requested(mode)
    }

    /// Evaluate one tick
    ///
    /// Total over all inputs: combinations outside the transition table
    /// come back as `Err` for the scheduler to turn into a landing.
    pub fn evaluate(
        &mut self,
        phase: FlightPhase,
        input: MissionInput,
        timer: u32,
        telemetry: &TelemetryStore,
        waypoints: &MissionStorage,
        dispatcher: &mut dyn CommandDispatcher,
    ) -> Result<Transition, UnexpectedCondition> {
        let unexpected = UnexpectedCondition { phase, input };

        match (input, phase) {
            (MissionInput::Idle, FlightPhase::Init) => Ok(self.initialize(telemetry, dispatcher)),
            (MissionInput::Idle, FlightPhase::Arming) => Ok(Transition::new(FlightPhase::Arming)
                .restart_timer()
                .with(MissionEvent::AwaitingOperator)),
            (MissionInput::Run, FlightPhase::Arming) => Ok(self.arm(timer, telemetry, dispatcher)),
            (MissionInput::Run, FlightPhase::Climbing) => Ok(self.climb(timer, telemetry)),
            (MissionInput::Run, FlightPhase::OnWay) => self
                .fly_waypoints(timer, telemetry, waypoints, dispatcher)
                .ok_or(unexpected),
            (MissionInput::Run, FlightPhase::Landing) => {
                dispatcher.land();
                Ok(Transition::new(FlightPhase::Landing).with(MissionEvent::LandRequested))
            }
            (MissionInput::Run, FlightPhase::Rtl) => Ok(self.return_to_launch(telemetry, dispatcher)),
            (MissionInput::Run, FlightPhase::Exit) => Ok(Transition::new(FlightPhase::Exit)),
            (MissionInput::Paused, phase) if phase.freezes_on_pause() => {
                Ok(Transition::new(phase).hold_timer())
            }
            _ => Err(unexpected),
        }
    }

    // ========================================================================
    // Phase handlers
    // ========================================================================

    fn initialize(
        &mut self,
        telemetry: &TelemetryStore,
        dispatcher: &mut dyn CommandDispatcher,
    ) -> Transition {
        match telemetry.status() {
            Some(status) if status.is_ready() => {
                for message_id in TELEMETRY_STREAMS {
                    dispatcher.request_message_interval(message_id, self.params.stream_interval_us);
                }
                let mode = self.request_mode(FlightMode::Guided, telemetry, dispatcher);
                Transition::new(FlightPhase::Arming)
                    .with(MissionEvent::Initialized)
                    .with(mode.into_event())
            }
            _ => Transition::new(FlightPhase::Init).with(MissionEvent::AwaitingReady),
        }
    }

    fn arm(
        &mut self,
        timer: u32,
        telemetry: &TelemetryStore,
        dispatcher: &mut dyn CommandDispatcher,
    ) -> Transition {
        if telemetry.is_armed() {
            self.altitude_origin = telemetry.position().map(|p| p.altitude);
            dispatcher.takeoff(self.params.takeoff_altitude);
            Transition::new(FlightPhase::Climbing).with(MissionEvent::Armed {
                altitude_origin: self.altitude_origin,
                takeoff_altitude: self.params.takeoff_altitude,
            })
        } else if timer > self.params.arm_timeout_ticks {
            Transition::new(FlightPhase::Exit).with(MissionEvent::ArmingFailed)
        } else {
            dispatcher.arm();
            Transition::new(FlightPhase::Arming).with(MissionEvent::ArmRequested)
        }
    }

    fn climb(&mut self, timer: u32, telemetry: &TelemetryStore) -> Transition {
        let relative_altitude = telemetry.relative_altitude(self.altitude_origin);

        match relative_altitude {
            Some(altitude) if altitude > self.params.climb_complete_altitude => {
                Transition::new(FlightPhase::OnWay).with(MissionEvent::ClimbComplete {
                    relative_altitude: altitude,
                })
            }
            _ if timer > self.params.climb_timeout_ticks => {
                Transition::new(FlightPhase::Rtl).with(MissionEvent::AltitudeTimeout)
            }
            _ => Transition::new(FlightPhase::Climbing)
                .with(MissionEvent::Climbing { relative_altitude }),
        }
    }

    /// `None` when the waypoint list does not cover the current index
    fn fly_waypoints(
        &mut self,
        timer: u32,
        telemetry: &TelemetryStore,
        waypoints: &MissionStorage,
        dispatcher: &mut dyn CommandDispatcher,
    ) -> Option<Transition> {
        let index = self.waypoint_index;
        let mut transition = Transition::new(FlightPhase::OnWay);

        if !self.en_route {
            let waypoint = waypoints.get_waypoint(index)?;
            let target = TargetSetpoint::from_waypoint(waypoint, self.params.altitude_offset);
            dispatcher.publish_setpoint(&target);
            self.target = Some(target);
            self.en_route = true;
            transition.push(MissionEvent::SetpointIssued { index, target });
        }

        let target = self.target?;
        let arrived = match telemetry.position() {
            Some(position) => {
                let (d_lat, d_lon) = target_error(position, &target);
                transition.push(MissionEvent::TargetError { d_lat, d_lon });
                has_arrived(position, &target, self.arrival_check())
            }
            None => false,
        };

        if arrived {
            transition.push(MissionEvent::WaypointReached { index });
            if index + 1 < waypoints.count() {
                self.waypoint_index += 1;
                self.en_route = false;
                Some(transition)
            } else {
                Some(
                    transition
                        .redirect(FlightPhase::Rtl)
                        .with(MissionEvent::MissionComplete),
                )
            }
        } else if timer > self.params.waypoint_timeout_ticks {
            Some(
                transition
                    .redirect(FlightPhase::Rtl)
                    .with(MissionEvent::WaypointTimeout { index }),
            )
        } else {
            Some(transition)
        }
    }

    fn return_to_launch(
        &mut self,
        telemetry: &TelemetryStore,
        dispatcher: &mut dyn CommandDispatcher,
    ) -> Transition {
        let transition = Transition::new(FlightPhase::Rtl);
        match self.request_mode(FlightMode::Rtl, telemetry, dispatcher) {
            ModeRequest::Requested(mode) => transition.with(MissionEvent::ModeRequested(mode)),
            ModeRequest::AlreadySet(_) => transition,
        }
    }

    fn arrival_check(&self) -> ArrivalCheck {
        match self.params.waypoint_radius_m {
            Some(radius) => ArrivalCheck::Radius(radius),
            None => ArrivalCheck::AxisTolerance(self.params.waypoint_tolerance_deg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mission::Waypoint;
    use crate::telemetry::{Position, TelemetryUpdate, VehicleStatus};
    use crate::traits::RecordingDispatcher;

    fn status(armed: bool, system_status: u8, mode: FlightMode) -> TelemetryUpdate {
        TelemetryUpdate::Status(VehicleStatus {
            armed,
            system_status,
            mode,
        })
    }

    fn storage(waypoints: &[Waypoint]) -> MissionStorage {
        let mut storage = MissionStorage::new();
        storage.replace(waypoints).unwrap();
        storage
    }

    #[test]
    fn test_init_waits_without_status() {
        let mut controller = MissionController::new(MissionParams::default());
        let mut dispatcher = RecordingDispatcher::new();
        let telemetry = TelemetryStore::new();

        let t = controller
            .evaluate(
                FlightPhase::Init,
                MissionInput::Idle,
                0,
                &telemetry,
                &MissionStorage::new(),
                &mut dispatcher,
            )
            .unwrap();
        assert_eq!(t.next, FlightPhase::Init);
        assert_eq!(t.events.as_slice(), &[MissionEvent::AwaitingReady]);
        assert_eq!(dispatcher.total(), 0);
    }

    #[test]
    fn test_init_ready_requests_streams_and_guided() {
        let mut controller = MissionController::new(MissionParams::default());
        let mut dispatcher = RecordingDispatcher::new();
        let mut telemetry = TelemetryStore::new();
        telemetry.apply(status(false, 3, FlightMode::Other(0)));

        let t = controller
            .evaluate(
                FlightPhase::Init,
                MissionInput::Idle,
                4,
                &telemetry,
                &MissionStorage::new(),
                &mut dispatcher,
            )
            .unwrap();
        assert_eq!(t.next, FlightPhase::Arming);
        assert_eq!(
            dispatcher.intervals.as_slice(),
            &[(33, 1_000_000), (32, 1_000_000), (147, 1_000_000)]
        );
        assert_eq!(dispatcher.modes.as_slice(), &[FlightMode::Guided]);
        assert_eq!(
            t.events.as_slice(),
            &[
                MissionEvent::Initialized,
                MissionEvent::ModeRequested(FlightMode::Guided)
            ]
        );
    }

    #[test]
    fn test_transition_redirect_keeps_events() {
        let stay =
            Transition::new(FlightPhase::OnWay).with(MissionEvent::WaypointReached { index: 0 });
        assert_eq!(stay.next, FlightPhase::OnWay);
        assert_eq!(stay.timer, TimerAction::Advance);

        let moved = stay.redirect(FlightPhase::Rtl).with(MissionEvent::MissionComplete);
        assert_eq!(moved.next, FlightPhase::Rtl);
        assert_eq!(
            moved.events.as_slice(),
            &[
                MissionEvent::WaypointReached { index: 0 },
                MissionEvent::MissionComplete
            ]
        );
    }

    #[test]
    fn test_mode_request_repeated_until_confirmed() {
        let controller = MissionController::new(MissionParams::default());
        let mut dispatcher = RecordingDispatcher::new();
        let mut telemetry = TelemetryStore::new();
        telemetry.apply(status(true, 4, FlightMode::Guided));

        // Vehicle still reports guided, so every call goes out
        for _ in 0..3 {
            assert_eq!(
                controller.request_mode(FlightMode::Rtl, &telemetry, &mut dispatcher),
                ModeRequest::Requested(FlightMode::Rtl)
            );
        }
        assert_eq!(dispatcher.mode_count, 3);

        telemetry.apply(status(true, 4, FlightMode::Rtl));
        assert_eq!(
            controller.request_mode(FlightMode::Rtl, &telemetry, &mut dispatcher),
            ModeRequest::AlreadySet(FlightMode::Rtl)
        );
        assert_eq!(dispatcher.mode_count, 3);

        // Vehicle left RTL on its own; the request goes out again
        telemetry.apply(status(true, 4, FlightMode::Loiter));
        assert_eq!(
            controller.request_mode(FlightMode::Rtl, &telemetry, &mut dispatcher),
            ModeRequest::Requested(FlightMode::Rtl)
        );
        assert_eq!(dispatcher.mode_count, 4);
    }

    #[test]
    fn test_mode_already_reported_not_sent() {
        let controller = MissionController::new(MissionParams::default());
        let mut dispatcher = RecordingDispatcher::new();
        let mut telemetry = TelemetryStore::new();
        telemetry.apply(status(false, 3, FlightMode::Guided));

        let request = controller.request_mode(FlightMode::Guided, &telemetry, &mut dispatcher);
        assert_eq!(request, ModeRequest::AlreadySet(FlightMode::Guided));
        assert_eq!(request.into_event(), MissionEvent::ModeAlreadySet(FlightMode::Guided));
        assert_eq!(dispatcher.mode_count, 0);
    }

    #[test]
    fn test_armed_without_position_leaves_origin_unset() {
        let mut controller = MissionController::new(MissionParams::default());
        let mut dispatcher = RecordingDispatcher::new();
        let mut telemetry = TelemetryStore::new();
        telemetry.apply(status(true, 4, FlightMode::Guided));

        let t = controller
            .evaluate(
                FlightPhase::Arming,
                MissionInput::Run,
                3,
                &telemetry,
                &MissionStorage::new(),
                &mut dispatcher,
            )
            .unwrap();
        assert_eq!(t.next, FlightPhase::Climbing);
        assert_eq!(controller.altitude_origin(), None);
        assert_eq!(dispatcher.last_takeoff_altitude, Some(20.0));

        // Relative altitude stays unknown: never completes the climb
        telemetry.apply(TelemetryUpdate::Position(Position::new(51.0, -2.0, 500.0)));
        let t = controller
            .evaluate(
                FlightPhase::Climbing,
                MissionInput::Run,
                1,
                &telemetry,
                &MissionStorage::new(),
                &mut dispatcher,
            )
            .unwrap();
        assert_eq!(t.next, FlightPhase::Climbing);
        assert_eq!(
            t.events.as_slice(),
            &[MissionEvent::Climbing {
                relative_altitude: None
            }]
        );
    }

    #[test]
    fn test_climb_timeout_goes_to_rtl() {
        let mut controller = MissionController::new(MissionParams::default());
        let mut dispatcher = RecordingDispatcher::new();
        let telemetry = TelemetryStore::new();

        let t = controller
            .evaluate(
                FlightPhase::Climbing,
                MissionInput::Run,
                60,
                &telemetry,
                &MissionStorage::new(),
                &mut dispatcher,
            )
            .unwrap();
        assert_eq!(t.next, FlightPhase::Climbing);

        let t = controller
            .evaluate(
                FlightPhase::Climbing,
                MissionInput::Run,
                61,
                &telemetry,
                &MissionStorage::new(),
                &mut dispatcher,
            )
            .unwrap();
        assert_eq!(t.next, FlightPhase::Rtl);
        assert_eq!(t.events.as_slice(), &[MissionEvent::AltitudeTimeout]);
    }

    #[test]
    fn test_unexpected_combinations() {
        let mut controller = MissionController::new(MissionParams::default());
        let mut dispatcher = RecordingDispatcher::new();
        let telemetry = TelemetryStore::new();
        let waypoints = MissionStorage::new();

        let cases = [
            (FlightPhase::Climbing, MissionInput::Idle),
            (FlightPhase::Rtl, MissionInput::Idle),
            (FlightPhase::Init, MissionInput::Run),
            (FlightPhase::Init, MissionInput::Paused),
            (FlightPhase::Arming, MissionInput::Paused),
        ];
        for (phase, input) in cases {
            let result =
                controller.evaluate(phase, input, 0, &telemetry, &waypoints, &mut dispatcher);
            assert_eq!(result, Err(UnexpectedCondition { phase, input }));
        }
        assert_eq!(dispatcher.total(), 0);
    }

    #[test]
    fn test_on_way_with_missing_waypoint_is_unexpected() {
        let mut controller = MissionController::new(MissionParams::default());
        let mut dispatcher = RecordingDispatcher::new();
        let result = controller.evaluate(
            FlightPhase::OnWay,
            MissionInput::Run,
            0,
            &TelemetryStore::new(),
            &MissionStorage::new(),
            &mut dispatcher,
        );
        assert_eq!(
            result,
            Err(UnexpectedCondition {
                phase: FlightPhase::OnWay,
                input: MissionInput::Run
            })
        );
        assert_eq!(dispatcher.setpoint_count, 0);
    }

    #[test]
    fn test_on_way_without_position_still_times_out() {
        let mut controller = MissionController::new(MissionParams::default());
        let mut dispatcher = RecordingDispatcher::new();
        let telemetry = TelemetryStore::new();
        let waypoints = storage(&[Waypoint::new(51.0, -2.0, 100.0)]);

        let t = controller
            .evaluate(
                FlightPhase::OnWay,
                MissionInput::Run,
                0,
                &telemetry,
                &waypoints,
                &mut dispatcher,
            )
            .unwrap();
        assert_eq!(t.next, FlightPhase::OnWay);
        assert_eq!(dispatcher.setpoint_count, 1);
        let target = dispatcher.last_setpoint().unwrap();
        assert!((target.altitude - 50.0).abs() < 1e-4);

        let t = controller
            .evaluate(
                FlightPhase::OnWay,
                MissionInput::Run,
                301,
                &telemetry,
                &waypoints,
                &mut dispatcher,
            )
            .unwrap();
        assert_eq!(t.next, FlightPhase::Rtl);
        assert_eq!(t.events.as_slice(), &[MissionEvent::WaypointTimeout { index: 0 }]);
        // No re-issue while en route
        assert_eq!(dispatcher.setpoint_count, 1);
    }

    #[test]
    fn test_radius_arrival_when_configured() {
        let params = MissionParams {
            waypoint_radius_m: Some(10.0),
            ..MissionParams::default()
        };
        let mut controller = MissionController::new(params);
        let mut dispatcher = RecordingDispatcher::new();
        let mut telemetry = TelemetryStore::new();
        // 1.2e-4 degrees of longitude off (~8.3 m): outside the degree
        // tolerance, inside the radius
        telemetry.apply(TelemetryUpdate::Position(Position::new(51.4234, -2.67162, 20.0)));
        let waypoints = storage(&[Waypoint::new(51.4234, -2.6715, 70.0)]);

        let t = controller
            .evaluate(
                FlightPhase::OnWay,
                MissionInput::Run,
                0,
                &telemetry,
                &waypoints,
                &mut dispatcher,
            )
            .unwrap();
        assert_eq!(t.next, FlightPhase::Rtl);
        assert!(t.events.contains(&MissionEvent::MissionComplete));
    }

    #[test]
    fn test_landing_requests_land_every_tick() {
        let mut controller = MissionController::new(MissionParams::default());
        let mut dispatcher = RecordingDispatcher::new();
        for timer in 0..3 {
            let t = controller
                .evaluate(
                    FlightPhase::Landing,
                    MissionInput::Run,
                    timer,
                    &TelemetryStore::new(),
                    &MissionStorage::new(),
                    &mut dispatcher,
                )
                .unwrap();
            assert_eq!(t.next, FlightPhase::Landing);
            assert_eq!(t.timer, TimerAction::Advance);
        }
        assert_eq!(dispatcher.land_count, 3);
    }
}
