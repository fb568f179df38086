//! Minimal abstraction for an asynchronous CAN bus. Allows the library to plug
//! into various implementations (embedded HAL, SocketCAN, test doubles).
use crate::protocol::transport::can_frame::CanFrame;
use futures_util::Future;

/// Contract to send and poll CAN frames asynchronously.
pub trait CanBus {
    type Error: core::fmt::Debug;
    /// Emit a frame on the bus. Asynchronous to accommodate non-blocking drivers.
    fn send<'a>(
        &'a mut self,
        frame: &'a CanFrame,
    ) -> impl Future<Output = Result<(), Self::Error>> + 'a;
    /// Return the next pending frame, or `Ok(None)` when nothing is queued.
    /// Must not wait for traffic: the callers own the polling cadence.
    fn try_recv<'a>(
        &'a mut self,
    ) -> impl Future<Output = Result<Option<CanFrame>, Self::Error>> + 'a;
}
