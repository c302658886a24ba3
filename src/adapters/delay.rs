//! Thread-blocking delay adapter.
//!
//! Implements [`DelayNs`] by sleeping the calling thread, which is what
//! the display loop and the init thread want: only the caller blocks.
//!
//! - **`espidf`**: `std::thread::sleep` maps onto `vTaskDelay`, so this
//!   yields to other FreeRTOS tasks.
//! - **host**: plain `std::thread::sleep` for simulation and tests.

use std::time::Duration;

use embedded_hal::delay::DelayNs;

#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadDelay;

impl ThreadDelay {
    pub fn new() -> Self {
        Self
    }
}

impl DelayNs for ThreadDelay {
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(Duration::from_nanos(u64::from(ns)));
    }

    fn delay_us(&mut self, us: u32) {
        std::thread::sleep(Duration::from_micros(u64::from(us)));
    }

    fn delay_ms(&mut self, ms: u32) {
        std::thread::sleep(Duration::from_millis(u64::from(ms)));
    }
}
