//! Adapters: concrete implementations of the widget's ports and LED traits.
//!
//! | Adapter    | Implements                              | Connects to                 |
//! |------------|-----------------------------------------|-----------------------------|
//! | `board`    | PowerPort, ConnectivityPort, BatteryPort| firmware status (atomics)   |
//! | `delay`    | DelayNs                                 | thread sleep / vTaskDelay   |
//! | `log_pin`  | OutputPin                               | serial log (host simulation)|

pub mod board;
pub mod delay;
pub mod log_pin;
