//! Widget configuration parameters
//!
//! All timing constants and role flags for the status LED. The values are
//! fixed at build time: [`WidgetConfig::default`] resolves the role from
//! cargo features the same way the keyboard firmware's Kconfig does, and
//! nothing mutates the config once the widget has started.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Which half of a (possibly split) keyboard this instance runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SplitRole {
    /// Unsplit board or the central half: connectivity follows the active
    /// BLE host profile.
    Central,
    /// Peripheral half: connectivity follows the link to the central.
    Peripheral,
}

/// Core widget configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetConfig {
    // --- Role ---
    pub role: SplitRole,
    /// BLE host profiles are available (central role only).
    pub ble_enabled: bool,
    /// Battery level is reported and indicated.
    pub battery_reporting: bool,

    // --- Patterns ---
    /// On-time of a single low-battery blink (ms)
    pub battery_blink_ms: u16,
    /// Gap between low-battery blinks (ms)
    pub battery_blink_gap_ms: u16,
    /// On-time of the advertising blink (ms)
    pub advertising_blink_ms: u16,
    /// On-time of the connected blink (ms)
    pub connected_blink_ms: u16,
    /// Rest at base colour after every rendered pattern (ms)
    pub interval_ms: u16,

    // --- Timing ---
    /// Quiet period before a connectivity burst is evaluated (ms)
    pub debounce_ms: u32,
    /// Delay before the display thread starts (ms)
    pub engine_start_delay_ms: u32,
    /// Delay before the initial status snapshot is taken (ms)
    pub init_delay_ms: u32,
    /// Battery polls retried while the reading is still undetermined
    pub battery_retry_attempts: u8,
    /// Interval between undetermined battery polls (ms)
    pub battery_retry_interval_ms: u32,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            // Role
            role: if cfg!(feature = "split-peripheral") {
                SplitRole::Peripheral
            } else {
                SplitRole::Central
            },
            ble_enabled: !cfg!(feature = "no-ble"),
            battery_reporting: !cfg!(feature = "no-battery-reporting"),

            // Patterns
            battery_blink_ms: 200,
            battery_blink_gap_ms: 200,
            advertising_blink_ms: 100,
            connected_blink_ms: 1000,
            interval_ms: 500,

            // Timing
            debounce_ms: 16,
            engine_start_delay_ms: 100,
            init_delay_ms: 200,
            battery_retry_attempts: 10,
            battery_retry_interval_ms: 100,
        }
    }
}

impl WidgetConfig {
    /// Reject values that would make a pattern invisible or spin the
    /// display loop without ever sleeping.
    pub fn validate(&self) -> Result<()> {
        if self.battery_blink_ms == 0
            || self.advertising_blink_ms == 0
            || self.connected_blink_ms == 0
        {
            return Err(Error::Config("blink on-time must be non-zero"));
        }
        if self.interval_ms == 0 {
            return Err(Error::Config("interval_ms must be non-zero"));
        }
        if self.debounce_ms == 0 {
            return Err(Error::Config("debounce_ms must be non-zero"));
        }
        if self.battery_retry_attempts > 0 && self.battery_retry_interval_ms == 0 {
            return Err(Error::Config("battery retry interval must be non-zero"));
        }
        Ok(())
    }
}
