//! Port traits: the boundary between the widget and the keyboard firmware.
//!
//! ```text
//!   Firmware status ──▶ Port trait ──▶ Indicators (domain)
//! ```
//!
//! The indicators query the current power, connectivity and battery state
//! through these traits only. Adapters (see [`crate::adapters`]) back them
//! with whatever the firmware exposes; tests back them with plain structs.
//!
//! The LED itself is not a port here: it is driven through
//! [`embedded_hal::digital::OutputPin`] and
//! [`embedded_hal::delay::DelayNs`] directly.

use std::sync::Arc;

// ───────────────────────────────────────────────────────────────
// Power port
// ───────────────────────────────────────────────────────────────

pub trait PowerPort {
    /// Whether USB is currently supplying power.
    fn is_usb_powered(&self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Connectivity port
// ───────────────────────────────────────────────────────────────

/// Endpoint transport selected for HID output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    Usb,
    Ble,
}

pub trait ConnectivityPort {
    /// Transport currently selected for output (central role).
    fn selected_transport(&self) -> Transport;

    /// Index of the active BLE host profile (central role).
    fn active_profile_index(&self) -> u8;

    /// Active BLE profile has a connected host (central role).
    fn active_profile_is_connected(&self) -> bool;

    /// Active BLE profile is unbonded and advertising (central role).
    fn active_profile_is_open(&self) -> bool;

    /// Link to the central half is up (peripheral role).
    fn peripheral_is_connected(&self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Battery port
// ───────────────────────────────────────────────────────────────

pub trait BatteryPort {
    /// State of charge in percent. `0` means not yet determined.
    fn state_of_charge(&self) -> u8;
}

// ───────────────────────────────────────────────────────────────
// Shared handles
// ───────────────────────────────────────────────────────────────
//
// One status source usually backs all three ports and is shared between
// the event callbacks, the debounce worker and the init thread.

impl<T: PowerPort + ?Sized> PowerPort for Arc<T> {
    fn is_usb_powered(&self) -> bool {
        (**self).is_usb_powered()
    }
}

impl<T: ConnectivityPort + ?Sized> ConnectivityPort for Arc<T> {
    fn selected_transport(&self) -> Transport {
        (**self).selected_transport()
    }

    fn active_profile_index(&self) -> u8 {
        (**self).active_profile_index()
    }

    fn active_profile_is_connected(&self) -> bool {
        (**self).active_profile_is_connected()
    }

    fn active_profile_is_open(&self) -> bool {
        (**self).active_profile_is_open()
    }

    fn peripheral_is_connected(&self) -> bool {
        (**self).peripheral_is_connected()
    }
}

impl<T: BatteryPort + ?Sized> BatteryPort for Arc<T> {
    fn state_of_charge(&self) -> u8 {
        (**self).state_of_charge()
    }
}
