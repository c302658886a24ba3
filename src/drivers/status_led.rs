//! Single status LED driver.
//!
//! Wraps any [`OutputPin`] and only touches the pin when the requested
//! level differs from the last level applied. The very first request
//! always writes so the pin starts from a known state.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: a `PinDriver` in output mode.
//! On host/test: a logging or recording pin.

use embedded_hal::digital::{Error as _, OutputPin};

use crate::app::messages::Color;
use crate::error::{LedError, Result};

pub struct StatusLed<P> {
    pin: P,
    current: Option<Color>,
}

impl<P: OutputPin> StatusLed<P> {
    pub fn new(pin: P) -> Self {
        Self { pin, current: None }
    }

    /// Drive the LED to `color`.
    ///
    /// Returns `Ok(true)` when the pin was written, `Ok(false)` when it
    /// already showed `color`. On error the cached level is left alone so
    /// the next request retries the write.
    pub fn set(&mut self, color: Color) -> Result<bool> {
        if self.current == Some(color) {
            return Ok(false);
        }

        let written = match color {
            Color::On => self.pin.set_high(),
            Color::Off => self.pin.set_low(),
        };
        written.map_err(|e| LedError::WriteFailed(e.kind()))?;

        self.current = Some(color);
        Ok(true)
    }

    /// Last level successfully applied.
    pub fn current(&self) -> Option<Color> {
        self.current
    }

    pub fn pin(&self) -> &P {
        &self.pin
    }
}
