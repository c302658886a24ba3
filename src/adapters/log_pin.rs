//! Log-based LED pin adapter.
//!
//! Implements [`OutputPin`] by writing every level change to the logger
//! with a timestamp relative to start-up, so the host simulation shows
//! the exact blink timing the real LED would. A GPIO `PinDriver` takes
//! its place on the device.

use core::convert::Infallible;
use std::time::Instant;

use embedded_hal::digital::{ErrorType, OutputPin};
use log::info;

pub struct LogPin {
    start: Instant,
    label: &'static str,
}

impl LogPin {
    pub fn new(label: &'static str) -> Self {
        Self {
            start: Instant::now(),
            label,
        }
    }
}

impl ErrorType for LogPin {
    type Error = Infallible;
}

impl OutputPin for LogPin {
    fn set_low(&mut self) -> Result<(), Infallible> {
        info!(
            "LED  | {:>7}ms | {} off",
            self.start.elapsed().as_millis(),
            self.label
        );
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        info!(
            "LED  | {:>7}ms | {} ON",
            self.start.elapsed().as_millis(),
            self.label
        );
        Ok(())
    }
}
