//! Asynchronous timer abstraction: delays for the response window and a
//! monotonic clock for telemetry timestamps.

/// Timer trait abstraction.
pub trait OssmTimer {
    /// Asynchronously wait for `millis` milliseconds.
    fn delay_ms<'a>(&'a mut self, millis: u32) -> impl core::future::Future<Output = ()> + 'a;

    /// Monotonic milliseconds since an arbitrary origin.
    fn now_ms(&self) -> u64;
}

#[cfg(feature = "embassy")]
/// [`OssmTimer`] backed by the embassy time driver.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbassyTimer;

#[cfg(feature = "embassy")]
impl OssmTimer for EmbassyTimer {
    async fn delay_ms(&mut self, millis: u32) {
        embassy_time::Timer::after_millis(millis as u64).await;
    }

    fn now_ms(&self) -> u64 {
        embassy_time::Instant::now().as_millis()
    }
}
