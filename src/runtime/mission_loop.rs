//! Mission loop
//!
//! Single tokio task that owns the mission scheduler and serializes the
//! three event sources onto it: vehicle datagrams, operator commands and
//! the tick interval. Each handler runs to completion before the next
//! event is taken, so the state machine sees them strictly in sequence.
//!
//! Requests queued by the dispatcher are flushed to the transport after
//! every event. Send failures are logged and dropped; the mission learns
//! the outcome from telemetry like any other request.

use std::future::Future;
use std::time::Duration;

use log::{debug, info, warn};
use mavlink::common::MavMessage;
use sortie_core::scheduler::TickRate;
use sortie_core::{MissionScheduler, TickReport};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

use crate::communication::mavlink::{
    gcs_heartbeat, telemetry, CommandTarget, MavlinkDispatcher, MavlinkParser, MavlinkWriter,
    VehicleTransport, CONTROLLER_COMPONENT_ID,
};
use crate::error::LinkError;
use crate::operator::OperatorCommand;

use super::report::Reporter;

/// Receive buffer size; one UDP datagram of MAVLink frames
const RECV_BUFFER_SIZE: usize = 2048;

/// Identities and timing for the loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopConfig {
    pub tick_rate: TickRate,
    /// Our MAVLink system id
    pub system_id: u8,
    /// Vehicle we supervise
    pub target: CommandTarget,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            tick_rate: TickRate::default(),
            system_id: 255,
            target: CommandTarget::default(),
        }
    }
}

pub struct MissionLoop<T: VehicleTransport> {
    transport: T,
    parser: MavlinkParser,
    writer: MavlinkWriter,
    dispatcher: MavlinkDispatcher,
    scheduler: MissionScheduler,
    reporter: Reporter,
    tick_rate: TickRate,
    recv_buf: Vec<u8>,
    /// Link-level messages sent ahead of dispatcher output
    pending: Vec<MavMessage>,
}

impl<T: VehicleTransport> MissionLoop<T> {
    pub fn new(transport: T, config: LoopConfig, scheduler: MissionScheduler) -> Self {
        Self {
            transport,
            parser: MavlinkParser::new(config.target.system_id),
            writer: MavlinkWriter::new(config.system_id, CONTROLLER_COMPONENT_ID),
            dispatcher: MavlinkDispatcher::new(config.target),
            scheduler,
            reporter: Reporter::new(config.tick_rate),
            tick_rate: config.tick_rate,
            recv_buf: vec![0u8; RECV_BUFFER_SIZE],
            pending: Vec::new(),
        }
    }

    pub fn scheduler(&self) -> &MissionScheduler {
        &self.scheduler
    }

    /// Run until `shutdown` resolves or the transport closes
    ///
    /// Returns the scheduler so the caller can inspect the final state.
    pub async fn run<F>(
        mut self,
        mut commands: mpsc::Receiver<OperatorCommand>,
        shutdown: F,
    ) -> Result<MissionScheduler, LinkError>
    where
        F: Future<Output = ()>,
    {
        let mut interval =
            tokio::time::interval(Duration::from_millis(self.tick_rate.period_ms as u64));
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tokio::pin!(shutdown);

        info!(
            "Mission loop running at {} ms per tick",
            self.tick_rate.period_ms
        );

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Shutdown requested");
                    break;
                }
                received = self.transport.recv(&mut self.recv_buf) => {
                    match received {
                        Ok(len) => {
                            let datagram = self.recv_buf[..len].to_vec();
                            self.handle_datagram(&datagram);
                        }
                        Err(LinkError::Closed) => {
                            warn!("Vehicle link closed");
                            break;
                        }
                        Err(e) => warn!("Vehicle link receive failed: {}", e),
                    }
                }
                Some(command) = commands.recv() => {
                    self.handle_command(command);
                    self.flush().await;
                }
                _ = interval.tick() => {
                    self.tick();
                    self.flush().await;
                }
            }
        }

        let stats = self.parser.stats();
        info!(
            "Mission loop stopped after {} ticks in phase {} ({} messages received, {} sent)",
            self.scheduler.tick_count(),
            self.scheduler.phase(),
            stats.messages_received,
            self.writer.stats().messages_encoded
        );

        Ok(self.scheduler)
    }

    /// Apply every telemetry message in a datagram
    pub fn handle_datagram(&mut self, data: &[u8]) {
        for (_, msg) in self.parser.parse_datagram(data) {
            if let Some(update) = telemetry::decode(&msg) {
                self.scheduler.apply_telemetry(update);
                self.reporter
                    .telemetry(&update, self.scheduler.relative_altitude());
            }
        }
    }

    pub fn handle_command(&mut self, command: OperatorCommand) {
        match command {
            OperatorCommand::Start => {
                let outcome = self.scheduler.request_start(&mut self.dispatcher);
                self.reporter.start(outcome);
            }
            OperatorCommand::Pause => {
                let outcome = self.scheduler.request_pause(&mut self.dispatcher);
                self.reporter.mode_request("Pause", outcome);
            }
            OperatorCommand::Mode(code) => {
                let outcome = self.scheduler.select_mode(code, &mut self.dispatcher);
                self.reporter.mode_request("Mode change", outcome);
            }
            OperatorCommand::Waypoints(waypoints) => {
                let outcome = self.scheduler.set_waypoints(&waypoints);
                self.reporter.waypoints(outcome);
            }
            OperatorCommand::Status => self.log_status(),
        }
    }

    /// One scheduler tick, preceded by our ground station heartbeat
    pub fn tick(&mut self) -> TickReport {
        self.queue_heartbeat();
        let report = self.scheduler.tick(&mut self.dispatcher);
        self.reporter.tick(&report);
        report
    }

    fn queue_heartbeat(&mut self) {
        self.pending.push(gcs_heartbeat());
    }

    async fn flush(&mut self) {
        let mut messages = std::mem::take(&mut self.pending);
        messages.extend(self.dispatcher.drain());

        for msg in messages {
            let frame = match self.writer.encode(&msg) {
                Ok(frame) => frame,
                Err(e) => {
                    warn!("Dropping outbound message: {}", e);
                    continue;
                }
            };
            match self.transport.send(&frame).await {
                Ok(()) => {}
                Err(LinkError::NoPeer) => {
                    debug!("No vehicle endpoint yet, dropping outbound message");
                }
                Err(e) => warn!("Vehicle link send failed: {}", e),
            }
        }
    }

    fn log_status(&self) {
        let scheduler = &self.scheduler;
        let telemetry = scheduler.telemetry();
        let waypoints = scheduler.inputs().waypoints().count();
        let altitude = scheduler
            .relative_altitude()
            .map(|alt| format!("{alt:.1} m"))
            .unwrap_or_else(|| "unknown".to_string());
        let battery = telemetry
            .battery_percent()
            .map(|pct| format!("{pct:.0}%"))
            .unwrap_or_else(|| "unknown".to_string());
        let mode = telemetry
            .mode()
            .map(|mode| mode.to_string())
            .unwrap_or_else(|| "unknown".to_string());

        info!(
            "Status: phase {} for {} ticks, operator {}, waypoint {}/{}, altitude {}, armed {}, mode {}, battery {}",
            scheduler.phase(),
            scheduler.timer(),
            scheduler.input(),
            scheduler.controller().waypoint_index(),
            waypoints,
            altitude,
            telemetry.is_armed(),
            mode,
            battery
        );
    }
}
