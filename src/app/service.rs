//! Widget service: wires the indicators to the event bus and runs the
//! boot-time snapshot.
//!
//! [`WidgetService`] owns the three indicators, the connectivity
//! debouncer and the process-wide "initialized" flag. Event handlers do
//! nothing until [`initialize`](WidgetService::initialize) has queued the
//! initial snapshot, so events racing the boot never produce a storm of
//! redundant messages.
//!
//! ```text
//!  EventBus ──▶ handlers ──(initialized?)──▶ indicators ──▶ MessageQueue
//!                                  │
//!  init thread ──▶ initialize() ───┘ (snapshot, then set flag)
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use embedded_hal::delay::DelayNs;
use log::info;

use crate::config::{SplitRole, WidgetConfig};
use crate::debounce::Debouncer;
use crate::error::Result;
use crate::events::{EventBus, EventKind, StatusEvent};

use super::indicators::{
    BatteryIndicator, ConnectivityIndicator, PowerIndicator, poll_state_of_charge,
};
use super::ports::{BatteryPort, ConnectivityPort, PowerPort};
use super::queue::MessageQueue;

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct WidgetService<Pw, Bt> {
    config: WidgetConfig,
    initialized: Arc<AtomicBool>,
    power: Arc<Mutex<PowerIndicator<Pw>>>,
    battery: Option<Arc<Mutex<BatteryIndicator>>>,
    battery_port: Bt,
    connectivity: Arc<Debouncer>,
}

impl<Pw, Bt> WidgetService<Pw, Bt>
where
    Pw: PowerPort + Send + 'static,
    Bt: BatteryPort,
{
    /// Build the indicators and start the connectivity debounce worker.
    pub fn new<C>(
        config: &WidgetConfig,
        queue: &Arc<MessageQueue>,
        power: Pw,
        conn: C,
        battery_port: Bt,
    ) -> Result<Self>
    where
        C: ConnectivityPort + Send + 'static,
    {
        let mut connectivity = ConnectivityIndicator::new(conn, Arc::clone(queue), config);
        let debouncer = Debouncer::spawn(
            "led_conn_debounce\0",
            Duration::from_millis(u64::from(config.debounce_ms)),
            move || {
                connectivity.indicate();
            },
        )?;

        let battery = config
            .battery_reporting
            .then(|| Arc::new(Mutex::new(BatteryIndicator::new(Arc::clone(queue)))));

        Ok(Self {
            config: config.clone(),
            initialized: Arc::new(AtomicBool::new(false)),
            power: Arc::new(Mutex::new(PowerIndicator::new(power, Arc::clone(queue)))),
            battery,
            battery_port,
            connectivity: Arc::new(debouncer),
        })
    }

    /// Register the event handlers this build needs.
    ///
    /// - USB power changes: always.
    /// - Central: BLE active profile changes (when BLE is enabled).
    /// - Peripheral: split link status changes.
    /// - Battery changes: when battery reporting is enabled.
    pub fn subscribe(&self, bus: &mut impl EventBus) -> Result<()> {
        {
            let initialized = Arc::clone(&self.initialized);
            let power = Arc::clone(&self.power);
            bus.subscribe(
                EventKind::UsbConnState,
                Box::new(move |_: &StatusEvent| {
                    if initialized.load(Ordering::Acquire) {
                        lock(&power).indicate();
                    }
                }),
            )?;
        }

        let connectivity_kind = match self.config.role {
            SplitRole::Central if self.config.ble_enabled => Some(EventKind::BleActiveProfile),
            SplitRole::Central => None,
            SplitRole::Peripheral => Some(EventKind::SplitPeripheralStatus),
        };
        if let Some(kind) = connectivity_kind {
            let initialized = Arc::clone(&self.initialized);
            let debouncer = Arc::clone(&self.connectivity);
            bus.subscribe(
                kind,
                Box::new(move |_: &StatusEvent| {
                    if initialized.load(Ordering::Acquire) {
                        debouncer.schedule();
                    }
                }),
            )?;
        }

        if let Some(battery) = &self.battery {
            let initialized = Arc::clone(&self.initialized);
            let battery = Arc::clone(battery);
            bus.subscribe(
                EventKind::BatteryState,
                Box::new(move |event: &StatusEvent| {
                    if !initialized.load(Ordering::Acquire) {
                        return;
                    }
                    if let StatusEvent::BatteryStateChanged { state_of_charge } = event {
                        lock(&battery).set_level(*state_of_charge);
                    }
                }),
            )?;
        }

        Ok(())
    }

    /// Queue the initial power, connectivity and battery state, then open
    /// the gate for event handlers. Runs once, on the init thread.
    pub fn initialize(&self, delay: &mut impl DelayNs) {
        lock(&self.power).indicate();

        info!("Indicating initial connectivity status");
        self.connectivity.schedule();

        if let Some(battery) = &self.battery {
            info!("Indicating initial battery status");
            let level = poll_state_of_charge(
                &self.battery_port,
                delay,
                self.config.battery_retry_attempts,
                self.config.battery_retry_interval_ms,
            );
            lock(battery).set_level(level);
        }

        self.initialized.store(true, Ordering::Release);
        info!("Finished initializing LED widget");
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::Acquire)
    }

    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }
}
