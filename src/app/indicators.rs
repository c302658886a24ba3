//! Status indicators: turn firmware state into display messages.
//!
//! Each indicator remembers what it last told the display engine and
//! only queues a message when that changes, so repeated events with the
//! same value are free.
//!
//! | Indicator                | Source                        | Emits                  |
//! |--------------------------|-------------------------------|------------------------|
//! | [`PowerIndicator`]        | USB power                     | `ColorSet`             |
//! | [`ConnectivityIndicator`] | BLE profile / split link      | `PatternToggle` (x1–2) |
//! | [`BatteryIndicator`]      | state of charge               | `PatternToggle`        |

use std::sync::Arc;

use embedded_hal::delay::DelayNs;
use log::{info, warn};

use crate::config::{SplitRole, WidgetConfig};

use super::messages::{Color, Message};
use super::patterns::Condition;
use super::ports::{BatteryPort, ConnectivityPort, PowerPort, Transport};
use super::queue::MessageQueue;

// ───────────────────────────────────────────────────────────────
// Power
// ───────────────────────────────────────────────────────────────

/// Mirrors USB power onto the base colour: lit while powered.
pub struct PowerIndicator<P> {
    power: P,
    queue: Arc<MessageQueue>,
    powered: bool,
}

impl<P: PowerPort> PowerIndicator<P> {
    pub fn new(power: P, queue: Arc<MessageQueue>) -> Self {
        Self {
            power,
            queue,
            powered: false,
        }
    }

    /// Query the power state and queue a colour change if it moved.
    /// Returns `true` when a message was emitted.
    pub fn indicate(&mut self) -> bool {
        let powered = self.power.is_usb_powered();
        if powered == self.powered {
            return false;
        }

        self.queue.enqueue(Message::ColorSet(Color::from_bool(powered)));
        if powered {
            info!("USB powered, set led on");
        } else {
            info!("USB not powered, set led off");
        }
        self.powered = powered;
        true
    }
}

// ───────────────────────────────────────────────────────────────
// Connectivity
// ───────────────────────────────────────────────────────────────

/// Tracks the connectivity condition for this half of the keyboard.
///
/// `Connected` is only ever flashed once: asserting it is always followed
/// by a retraction, and the remembered state falls back to none. The
/// steady connected state is therefore shown as the base colour.
pub struct ConnectivityIndicator<C> {
    conn: C,
    queue: Arc<MessageQueue>,
    role: SplitRole,
    ble_enabled: bool,
    current: Option<Condition>,
}

impl<C: ConnectivityPort> ConnectivityIndicator<C> {
    pub fn new(conn: C, queue: Arc<MessageQueue>, config: &WidgetConfig) -> Self {
        Self {
            conn,
            queue,
            role: config.role,
            ble_enabled: config.ble_enabled,
            current: None,
        }
    }

    /// Resolve the connectivity condition from the current link state.
    pub fn resolve(&self) -> Option<Condition> {
        match self.role {
            SplitRole::Central => self.resolve_central(),
            SplitRole::Peripheral => {
                if self.conn.peripheral_is_connected() {
                    info!("Peripheral connected");
                    Some(Condition::Connected)
                } else {
                    info!("Peripheral not connected");
                    None
                }
            }
        }
    }

    fn resolve_central(&self) -> Option<Condition> {
        if !self.ble_enabled {
            warn!("No connectivity source for this build, indicating none");
            return None;
        }

        // USB output still reports the active BLE profile.
        match self.conn.selected_transport() {
            Transport::Usb | Transport::Ble => {
                let index = self.conn.active_profile_index();
                if self.conn.active_profile_is_connected() {
                    info!("Profile {} connected", index);
                    Some(Condition::Connected)
                } else if self.conn.active_profile_is_open() {
                    info!("Profile {} open", index);
                    Some(Condition::Advertising)
                } else {
                    info!("Profile {} not connected", index);
                    None
                }
            }
        }
    }

    /// Resolve and queue the change. Returns the number of messages queued.
    pub fn indicate(&mut self) -> usize {
        let next = self.resolve();
        if next == self.current {
            return 0;
        }

        self.queue.enqueue(Message::toggle(self.current, next));
        let mut sent = 1;

        let next = if next == Some(Condition::Connected) {
            self.queue
                .enqueue(Message::toggle(Some(Condition::Connected), None));
            sent += 1;
            None
        } else {
            next
        };

        self.current = next;
        sent
    }

    /// Condition this indicator currently holds asserted.
    pub fn current(&self) -> Option<Condition> {
        self.current
    }
}

// ───────────────────────────────────────────────────────────────
// Battery
// ───────────────────────────────────────────────────────────────

/// Map a state of charge to its warning tier. `0` (unknown) maps to none.
pub fn battery_condition(level: u8) -> Option<Condition> {
    match level {
        1..=10 => Some(Condition::Battery10),
        11..=20 => Some(Condition::Battery20),
        21..=30 => Some(Condition::Battery30),
        _ => None,
    }
}

/// Poll the battery until it reports a level, at most `attempts` extra
/// times. Returns whatever the last poll read, possibly still `0`.
pub fn poll_state_of_charge(
    battery: &impl BatteryPort,
    delay: &mut impl DelayNs,
    attempts: u8,
    interval_ms: u32,
) -> u8 {
    let mut level = battery.state_of_charge();
    let mut retry = 0;
    while level == 0 && retry < attempts {
        retry += 1;
        delay.delay_ms(interval_ms);
        level = battery.state_of_charge();
    }
    level
}

pub struct BatteryIndicator {
    queue: Arc<MessageQueue>,
    current: Option<Condition>,
}

impl BatteryIndicator {
    pub fn new(queue: Arc<MessageQueue>) -> Self {
        Self {
            queue,
            current: None,
        }
    }

    /// Queue a tier change for `level`. Returns `true` when a message was
    /// emitted. A level of `0` is ignored entirely.
    pub fn set_level(&mut self, level: u8) -> bool {
        if level == 0 {
            info!("Battery level undetermined (zero)");
            return false;
        }

        info!("Battery level {}", level);
        let next = battery_condition(level);
        if next == self.current {
            return false;
        }

        self.queue.enqueue(Message::toggle(self.current, next));
        self.current = next;
        true
    }

    pub fn current(&self) -> Option<Condition> {
        self.current
    }
}
