//! Worker thread spawning for the LED widget.
//!
//! The widget runs three threads: the display loop, the init snapshot and
//! the connectivity debouncer. All of them run at the lowest application
//! priority and go through [`spawn_delayed`]; the first two also wait a
//! fixed delay before starting.
//!
//! On ESP-IDF, `std::thread` is a pthread on top of a FreeRTOS task and
//! `esp_pthread_set_cfg()` configures the *next* `pthread_create()` from
//! the calling thread. Config and spawn therefore happen back to back.
//! Elsewhere the core and priority are ignored.

use std::thread::JoinHandle;

use crate::error::{Error, Result};

/// CPU core identifiers for the ESP32 dual-core parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum Core {
    /// Core 0 (PRO_CPU): protocol stacks (BLE, USB).
    Pro = 0,
    /// Core 1 (APP_CPU): application logic, LED timing.
    App = 1,
}

/// Lowest application priority; the LED never competes with input scanning.
pub const LOWEST_APP_PRIORITY: u8 = 1;

/// Spawn a thread pinned to a specific core with explicit priority and stack.
///
/// The `name` parameter must be a null-terminated string (e.g. `"led_process\0"`).
#[cfg(target_os = "espidf")]
pub fn spawn_on_core(
    core: Core,
    priority: u8,
    stack_kb: usize,
    name: &'static str,
    f: impl FnOnce() + Send + 'static,
) -> Result<JoinHandle<()>> {
    // SAFETY: the default config is a plain value; `thread_name` points at a
    // 'static null-terminated string and outlives the spawn below.
    let ret = unsafe {
        let mut cfg = esp_idf_sys::esp_create_default_pthread_config();
        cfg.pin_to_core = core as _;
        cfg.prio = priority as _;
        cfg.stack_size = (stack_kb * 1024) as _;
        cfg.thread_name = name.as_ptr() as *const _;
        esp_idf_sys::esp_pthread_set_cfg(&cfg)
    };
    if ret != esp_idf_sys::ESP_OK as i32 {
        log::error!("esp_pthread_set_cfg failed: {}", ret);
        return Err(Error::Init("pthread config rejected"));
    }

    let display_name = name.trim_end_matches('\0');
    log::info!(
        "Spawning '{}' on {:?} (pri={}, stack={}KB)",
        display_name,
        core,
        priority,
        stack_kb
    );

    std::thread::Builder::new()
        .name(display_name.into())
        .spawn(f)
        .map_err(|_| Error::Init("thread creation failed"))
}

/// Simulation fallback: ignores core affinity and priority.
#[cfg(not(target_os = "espidf"))]
pub fn spawn_on_core(
    _core: Core,
    _priority: u8,
    stack_kb: usize,
    name: &'static str,
    f: impl FnOnce() + Send + 'static,
) -> Result<JoinHandle<()>> {
    let display_name = name.trim_end_matches('\0');
    log::debug!(
        "Spawning '{}' (sim, no core pinning, stack={}KB)",
        display_name,
        stack_kb
    );

    std::thread::Builder::new()
        .name(display_name.into())
        .stack_size(stack_kb * 1024)
        .spawn(f)
        .map_err(|_| Error::Init("thread creation failed"))
}

/// Spawn a low-priority thread that sleeps `start_delay_ms` before
/// running `f`, mirroring a delayed-start kernel thread.
pub fn spawn_delayed(
    name: &'static str,
    stack_kb: usize,
    start_delay_ms: u32,
    f: impl FnOnce() + Send + 'static,
) -> Result<JoinHandle<()>> {
    spawn_on_core(Core::App, LOWEST_APP_PRIORITY, stack_kb, name, move || {
        if start_delay_ms > 0 {
            std::thread::sleep(std::time::Duration::from_millis(u64::from(start_delay_ms)));
        }
        f();
    })
}
