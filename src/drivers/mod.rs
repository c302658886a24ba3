//! LED output driver and thread helpers.

pub mod status_led;
pub mod task_pin;
