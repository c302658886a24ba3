//! LED widget library.
//!
//! Priority-arbitrated status indicator for a single LED: power,
//! connectivity and battery state are turned into blink patterns on one
//! shared output. Exposes the pure-logic modules for integration testing.
//! All ESP-IDF-specific code is guarded by `cfg` attributes within each
//! module.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod debounce;
pub mod drivers;
pub mod error;
pub mod events;
