//! Shared firmware status snapshot.
//!
//! [`StatusBoard`] is a lock-free mirror of the firmware state the widget
//! queries: the firmware glue (or the host simulation) writes it from its
//! own callbacks, and the indicators read it through the port traits.
//! All fields are atomics so readers and writers on different threads
//! never block each other.

use core::sync::atomic::{AtomicBool, AtomicU8, Ordering};

use crate::app::ports::{BatteryPort, ConnectivityPort, PowerPort, Transport};

#[derive(Debug, Default)]
pub struct StatusBoard {
    usb_powered: AtomicBool,
    transport_ble: AtomicBool,
    profile_index: AtomicU8,
    profile_connected: AtomicBool,
    profile_open: AtomicBool,
    peripheral_connected: AtomicBool,
    state_of_charge: AtomicU8,
}

impl StatusBoard {
    /// Unpowered, USB output, profile 0 neither connected nor open,
    /// split link down, battery undetermined.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_usb_powered(&self, powered: bool) {
        self.usb_powered.store(powered, Ordering::Release);
    }

    pub fn set_transport(&self, transport: Transport) {
        self.transport_ble
            .store(transport == Transport::Ble, Ordering::Release);
    }

    /// Update the active BLE profile in one call.
    pub fn set_profile(&self, index: u8, connected: bool, open: bool) {
        self.profile_index.store(index, Ordering::Release);
        self.profile_connected.store(connected, Ordering::Release);
        self.profile_open.store(open, Ordering::Release);
    }

    pub fn set_peripheral_connected(&self, connected: bool) {
        self.peripheral_connected.store(connected, Ordering::Release);
    }

    pub fn set_state_of_charge(&self, percent: u8) {
        self.state_of_charge
            .store(percent.min(100), Ordering::Release);
    }
}

impl PowerPort for StatusBoard {
    fn is_usb_powered(&self) -> bool {
        self.usb_powered.load(Ordering::Acquire)
    }
}

impl ConnectivityPort for StatusBoard {
    fn selected_transport(&self) -> Transport {
        if self.transport_ble.load(Ordering::Acquire) {
            Transport::Ble
        } else {
            Transport::Usb
        }
    }

    fn active_profile_index(&self) -> u8 {
        self.profile_index.load(Ordering::Acquire)
    }

    fn active_profile_is_connected(&self) -> bool {
        self.profile_connected.load(Ordering::Acquire)
    }

    fn active_profile_is_open(&self) -> bool {
        self.profile_open.load(Ordering::Acquire)
    }

    fn peripheral_is_connected(&self) -> bool {
        self.peripheral_connected.load(Ordering::Acquire)
    }
}

impl BatteryPort for StatusBoard {
    fn state_of_charge(&self) -> u8 {
        self.state_of_charge.load(Ordering::Acquire)
    }
}
