//! Telemetry state readable from other tasks.
use crate::core::{ConfigState, SensorSnapshot, SpnAssignments};
use core::cell::RefCell;
use embassy_sync::blocking_mutex::{raw::RawMutex, Mutex};

/// Everything a display needs from a session.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TelemetryState {
    pub snapshot: SensorSnapshot,
    pub config: ConfigState,
    pub assignments: SpnAssignments,
    pub message_count: u32,
    pub connected: bool,
}

impl TelemetryState {
    pub const fn new() -> Self {
        Self {
            snapshot: SensorSnapshot::new(),
            config: ConfigState::new(),
            assignments: SpnAssignments::new(),
            message_count: 0,
            connected: false,
        }
    }
}

impl Default for TelemetryState {
    fn default() -> Self {
        Self::new()
    }
}

/// Single writer, many readers. Each access is a short critical section and
/// readers always get a copy.
pub struct SharedTelemetry<M: RawMutex> {
    inner: Mutex<M, RefCell<TelemetryState>>,
}

impl<M: RawMutex> SharedTelemetry<M> {
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(TelemetryState::new())),
        }
    }

    /// Replace the stored state.
    pub fn publish(&self, state: &TelemetryState) {
        self.inner.lock(|cell| *cell.borrow_mut() = *state);
    }

    pub fn state(&self) -> TelemetryState {
        self.inner.lock(|cell| *cell.borrow())
    }

    pub fn snapshot(&self) -> SensorSnapshot {
        self.inner.lock(|cell| cell.borrow().snapshot)
    }

    pub fn config(&self) -> ConfigState {
        self.inner.lock(|cell| cell.borrow().config)
    }
}

impl<M: RawMutex> Default for SharedTelemetry<M> {
    fn default() -> Self {
        Self::new()
    }
}
