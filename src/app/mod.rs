//! Application core: display arbitration and status indicators.
//!
//! This module contains the widget's rules: which condition wins the LED,
//! how each pattern is timed, and when a firmware event is worth a message.
//! Firmware state is read through **port traits** defined in [`ports`];
//! the LED is any `embedded_hal` output pin, keeping this layer fully
//! testable without real peripherals.

pub mod active_set;
pub mod engine;
pub mod indicators;
pub mod messages;
pub mod patterns;
pub mod ports;
pub mod queue;
pub mod service;
