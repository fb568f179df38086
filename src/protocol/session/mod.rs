//! Session with one module: owns the bus and the timer, keeps the decoded
//! telemetry and configuration, and runs the configuration operations.
//!
//! Commands take `&mut self`, so a session never has two requests in flight.
//! To share a session between tasks, wrap it in an async mutex
//! (`embassy_sync::mutex::Mutex`); readers that only need telemetry can use
//! [`SharedTelemetry`] instead.
//!
//! Frames received while a command waits for its response are consumed by
//! the command engine and do not reach the snapshot.
use crate::{
    core::{ConfigState, SensorSnapshot, SpnAssignments, DEFAULT_STALE_AFTER_MS},
    error::CommandError,
    protocol::{
        command::ResponseTiming,
        operations::{self, NtcPreset, PressurePreset, ThermocoupleType},
        telemetry::decode_frame,
        transport::traits::{can_bus::CanBus, ossm_timer::OssmTimer},
    },
};
use embassy_futures::yield_now;
use embassy_sync::blocking_mutex::raw::RawMutex;
use futures_util::future::{select, Either};
use futures_util::pin_mut;

mod shared;
pub use shared::{SharedTelemetry, TelemetryState};

//==================================================================================CONFIG
/// Run-time settings of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SessionConfig {
    pub timing: ResponseTiming,
    /// Age after which the snapshot is considered stale.
    pub stale_after_ms: u64,
    /// Idle delay of [`ModuleSession::monitor`] when the bus has nothing queued.
    pub monitor_poll_ms: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            timing: ResponseTiming::DEFAULT,
            stale_after_ms: DEFAULT_STALE_AFTER_MS,
            monitor_poll_ms: 10,
        }
    }
}

/// Outcome of one [`ModuleSession::poll_telemetry`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TelemetryPoll {
    /// Nothing was queued.
    Empty,
    /// A module frame updated the snapshot.
    Decoded,
    /// A frame was read but carried no telemetry.
    Ignored,
}

//==================================================================================SESSION
pub struct ModuleSession<C: CanBus, T: OssmTimer> {
    can_bus: C,
    timer: T,
    config: SessionConfig,
    state: TelemetryState,
}

impl<C: CanBus, T: OssmTimer> ModuleSession<C, T> {
    pub fn new(can_bus: C, timer: T) -> Self {
        Self::with_config(can_bus, timer, SessionConfig::default())
    }

    pub fn with_config(can_bus: C, timer: T, config: SessionConfig) -> Self {
        Self {
            can_bus,
            timer,
            config,
            state: TelemetryState::new(),
        }
    }

    /// Give back the bus and the timer.
    pub fn into_parts(self) -> (C, T) {
        (self.can_bus, self.timer)
    }

    pub fn session_config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn state(&self) -> &TelemetryState {
        &self.state
    }

    pub fn snapshot(&self) -> &SensorSnapshot {
        &self.state.snapshot
    }

    pub fn config_state(&self) -> &ConfigState {
        &self.state.config
    }

    pub fn assignments(&self) -> &SpnAssignments {
        &self.state.assignments
    }

    /// Telemetry frames decoded since the session started.
    pub fn message_count(&self) -> u32 {
        self.state.message_count
    }

    /// `true` after a decoded frame, `false` again after a receive error.
    pub fn is_connected(&self) -> bool {
        self.state.connected
    }

    /// No telemetry decoded within `stale_after_ms`.
    pub fn is_stale(&self) -> bool {
        self.state
            .snapshot
            .is_stale(self.timer.now_ms(), self.config.stale_after_ms)
    }

    //==============================================================TELEMETRY
    /// Read at most one frame and decode it into the snapshot.
    ///
    /// A receive error marks the session disconnected and is returned.
    pub async fn poll_telemetry(&mut self) -> Result<TelemetryPoll, C::Error> {
        let frame = match self.can_bus.try_recv().await {
            Ok(Some(frame)) => frame,
            Ok(None) => return Ok(TelemetryPoll::Empty),
            Err(e) => {
                self.state.connected = false;
                return Err(e);
            }
        };

        if decode_frame(&frame, &mut self.state.snapshot, self.timer.now_ms()) {
            self.state.message_count = self.state.message_count.wrapping_add(1);
            self.state.connected = true;
            Ok(TelemetryPoll::Decoded)
        } else {
            Ok(TelemetryPoll::Ignored)
        }
    }

    /// Decode telemetry until `stop` resolves.
    ///
    /// Receive errors do not end the loop: they mark the session
    /// disconnected and polling resumes after the idle delay.
    pub async fn monitor<S: core::future::Future<Output = ()>>(&mut self, stop: S) {
        self.run_monitor(stop, |_| {}).await
    }

    /// [`monitor`](Self::monitor), publishing the state to `shared` after
    /// every poll.
    pub async fn monitor_shared<M: RawMutex, S: core::future::Future<Output = ()>>(
        &mut self,
        stop: S,
        shared: &SharedTelemetry<M>,
    ) {
        shared.publish(&self.state);
        self.run_monitor(stop, |state| shared.publish(state)).await
    }

    async fn run_monitor<S, F>(&mut self, stop: S, mut on_poll: F)
    where
        S: core::future::Future<Output = ()>,
        F: FnMut(&TelemetryState),
    {
        pin_mut!(stop);
        loop {
            let stopped = {
                let step = self.monitor_step();
                pin_mut!(step);
                let outcome = select(stop.as_mut(), step).await;
                matches!(outcome, Either::Left(_))
            }; // step borrow is dropped here

            if stopped {
                #[cfg(feature = "defmt")]
                defmt::info!("monitor stopped after {=u32} frames", self.state.message_count);
                return;
            }
            on_poll(&self.state);
        }
    }

    /// One poll of the monitor loop. The loop has no fixed frame budget: a
    /// busy bus is drained frame by frame, yielding to the executor after
    /// each one so `stop` and sibling tasks still get to run.
    async fn monitor_step(&mut self) {
        match self.poll_telemetry().await {
            Ok(TelemetryPoll::Decoded) | Ok(TelemetryPoll::Ignored) => yield_now().await,
            Ok(TelemetryPoll::Empty) => self.timer.delay_ms(self.config.monitor_poll_ms).await,
            Err(_e) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("monitor: receive error {}", defmt::Debug2Format(&_e));
                self.timer.delay_ms(self.config.monitor_poll_ms).await;
            }
        }
    }

    //==============================================================OPERATIONS
    pub async fn enable_spn(
        &mut self,
        spn: u16,
        enable: bool,
        input: u8,
    ) -> Result<(), CommandError<C::Error>> {
        let timing = self.config.timing;
        operations::enable_spn(&mut self.can_bus, &mut self.timer, &timing, spn, enable, input)
            .await
    }

    pub async fn set_ntc_preset(
        &mut self,
        input: u8,
        preset: NtcPreset,
    ) -> Result<(), CommandError<C::Error>> {
        let timing = self.config.timing;
        operations::set_ntc_preset(&mut self.can_bus, &mut self.timer, &timing, input, preset)
            .await
    }

    pub async fn set_pressure_preset(
        &mut self,
        input: u8,
        preset: PressurePreset,
    ) -> Result<(), CommandError<C::Error>> {
        let timing = self.config.timing;
        operations::set_pressure_preset(&mut self.can_bus, &mut self.timer, &timing, input, preset)
            .await
    }

    /// Also records the type in [`ConfigState::thermocouple_type`] on success.
    pub async fn set_tc_type(
        &mut self,
        tc_type: ThermocoupleType,
    ) -> Result<(), CommandError<C::Error>> {
        let timing = self.config.timing;
        operations::set_tc_type(&mut self.can_bus, &mut self.timer, &timing, tc_type).await?;
        self.state.config.thermocouple_type = tc_type.as_u8();
        Ok(())
    }

    pub async fn query_config(&mut self) -> Result<(), CommandError<C::Error>> {
        let timing = self.config.timing;
        operations::query_config(
            &mut self.can_bus,
            &mut self.timer,
            &timing,
            &mut self.state.config,
        )
        .await
    }

    /// On error the stored table is partially filled and must not be trusted.
    pub async fn query_spn_assignments(&mut self) -> Result<(), CommandError<C::Error>> {
        let timing = self.config.timing;
        operations::query_spn_assignments(
            &mut self.can_bus,
            &mut self.timer,
            &timing,
            &mut self.state.assignments,
        )
        .await
    }

    /// Counts first, then SPN assignments. Stops at the first failure.
    pub async fn refresh_configuration(&mut self) -> Result<(), CommandError<C::Error>> {
        self.query_config().await?;
        self.query_spn_assignments().await
    }

    pub async fn save_config(&mut self) -> Result<(), CommandError<C::Error>> {
        let timing = self.config.timing;
        operations::save_config(&mut self.can_bus, &mut self.timer, &timing).await
    }

    pub async fn reset_config(&mut self) -> Result<(), CommandError<C::Error>> {
        let timing = self.config.timing;
        operations::reset_config(&mut self.can_bus, &mut self.timer, &timing).await
    }
}
