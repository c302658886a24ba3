//! LED Widget: Main Entry Point
//!
//! Message-driven status LED with one display thread and many producers.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                    Firmware (outer ring)                       │
//! │                                                                │
//! │  USB stack   BLE stack   Split link   Fuel gauge               │
//! │        └──────────┴──── EventBus ───┴──────────┘               │
//! │                           │                                    │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                           ▼                                    │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │ WidgetService: Power · Connectivity(debounced) · Battery│   │
//! │  └──────────────────────────┬─────────────────────────────┘    │
//! │                             ▼ MessageQueue (16)                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │ DisplayEngine thread ──▶ StatusLed (OutputPin + Delay) │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use std::sync::Arc;

use anyhow::Result;
use log::{debug, info};

use led_widget::adapters::board::StatusBoard;
use led_widget::adapters::delay::ThreadDelay;
use led_widget::app::engine::DisplayEngine;
use led_widget::app::queue::MessageQueue;
use led_widget::app::service::WidgetService;
use led_widget::config::WidgetConfig;
use led_widget::drivers::task_pin;
use led_widget::events::LocalEventBus;

/// Stack for each widget thread (KB).
const THREAD_STACK_KB: usize = 16;

fn main() -> Result<()> {
    // ── 1. Logging ────────────────────────────────────────────
    #[cfg(feature = "espidf")]
    {
        esp_idf_svc::sys::link_patches();
        esp_idf_logger::init()?;
    }
    #[cfg(not(feature = "espidf"))]
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("LED widget v{}", env!("CARGO_PKG_VERSION"));

    // ── 2. Build-time configuration ───────────────────────────
    let config = WidgetConfig::default();
    config.validate()?;
    let dump =
        serde_json::to_string(&config).map_err(|e| anyhow::anyhow!("config dump: {e}"))?;
    debug!("Config: {}", dump);
    info!(
        "Role {:?} (ble={}, battery={})",
        config.role, config.ble_enabled, config.battery_reporting
    );

    // ── 3. Shared state ───────────────────────────────────────
    let queue = Arc::new(MessageQueue::new());
    let board = Arc::new(StatusBoard::new());

    // ── 4. Display thread ─────────────────────────────────────
    let engine = DisplayEngine::new(
        platform::led_pin()?,
        ThreadDelay::new(),
        &config,
        Arc::clone(&queue),
    );
    let _display = task_pin::spawn_delayed(
        "led_process\0",
        THREAD_STACK_KB,
        config.engine_start_delay_ms,
        move || engine.run(),
    )?;

    // ── 5. Indicators + subscriptions ─────────────────────────
    let widget = Arc::new(WidgetService::new(
        &config,
        &queue,
        Arc::clone(&board),
        Arc::clone(&board),
        Arc::clone(&board),
    )?);
    let mut bus = LocalEventBus::new();
    widget.subscribe(&mut bus)?;
    info!("Subscribed {} event handlers", bus.subscriber_count());

    // ── 6. Boot snapshot ──────────────────────────────────────
    let _init = {
        let widget = Arc::clone(&widget);
        task_pin::spawn_delayed(
            "led_init\0",
            THREAD_STACK_KB,
            config.init_delay_ms,
            move || widget.initialize(&mut ThreadDelay::new()),
        )?
    };

    platform::run(&board, &bus, &queue);
    Ok(())
}

#[cfg(feature = "espidf")]
mod platform {
    use esp_idf_hal::gpio::{Gpio2, Output, PinDriver};
    use esp_idf_hal::peripherals::Peripherals;

    use super::{LocalEventBus, MessageQueue, StatusBoard};

    /// On-board status LED (GPIO2 on most ESP32 dev boards).
    pub fn led_pin() -> anyhow::Result<PinDriver<'static, Gpio2, Output>> {
        let peripherals = Peripherals::take()?;
        Ok(PinDriver::output(peripherals.pins.gpio2)?)
    }

    /// The firmware glue updates `board` and publishes on `bus` from its
    /// own tasks; the main task has nothing left to do.
    pub fn run(_board: &StatusBoard, _bus: &LocalEventBus, _queue: &MessageQueue) {
        loop {
            std::thread::park();
        }
    }
}

#[cfg(not(feature = "espidf"))]
mod platform {
    use std::time::Duration;

    use log::info;

    use led_widget::adapters::log_pin::LogPin;
    use led_widget::app::ports::Transport;
    use led_widget::events::StatusEvent;

    use super::{LocalEventBus, MessageQueue, StatusBoard};

    #[allow(clippy::unnecessary_wraps)]
    pub fn led_pin() -> anyhow::Result<LogPin> {
        Ok(LogPin::new("status"))
    }

    fn wait(ms: u64) {
        std::thread::sleep(Duration::from_millis(ms));
    }

    fn set_profile(
        board: &StatusBoard,
        bus: &LocalEventBus,
        index: u8,
        connected: bool,
        open: bool,
    ) {
        board.set_profile(index, connected, open);
        board.set_peripheral_connected(connected);
        bus.publish(&StatusEvent::BleActiveProfileChanged { index });
        bus.publish(&StatusEvent::SplitPeripheralStatusChanged { connected });
    }

    fn set_battery(board: &StatusBoard, bus: &LocalEventBus, percent: u8) {
        info!("SIM  | battery {}%", percent);
        board.set_state_of_charge(percent);
        bus.publish(&StatusEvent::BatteryStateChanged {
            state_of_charge: percent,
        });
    }

    /// Replay a short session: plug in, pair, connect, flip through
    /// profiles, drain the battery, unplug.
    pub fn run(board: &StatusBoard, bus: &LocalEventBus, queue: &MessageQueue) {
        board.set_transport(Transport::Ble);
        board.set_state_of_charge(35);
        // Let the boot snapshot land first.
        wait(500);

        info!("SIM  | USB attached");
        board.set_usb_powered(true);
        bus.publish(&StatusEvent::UsbConnStateChanged { powered: true });
        wait(300);

        info!("SIM  | profile 1 open (advertising)");
        set_profile(board, bus, 1, false, true);
        wait(2000);

        info!("SIM  | host connected on profile 1");
        set_profile(board, bus, 1, true, false);
        wait(2500);

        info!("SIM  | cycling profiles 2..=4");
        for index in 2..=4 {
            set_profile(board, bus, index, false, index == 4);
            wait(2);
        }
        wait(2000);

        info!("SIM  | USB detached");
        board.set_usb_powered(false);
        bus.publish(&StatusEvent::UsbConnStateChanged { powered: false });
        wait(300);

        for percent in [25, 15, 0, 5] {
            set_battery(board, bus, percent);
            wait(2500);
        }

        info!("SIM  | done, {} message(s) dropped", queue.dropped());
    }
}
