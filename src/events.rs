//! Firmware status events and the subscription boundary.
//!
//! Events are produced by the keyboard firmware:
//! - USB stack (power attached / removed)
//! - BLE host stack (active profile switched, connected, advertising)
//! - Split transport (peripheral link up / down)
//! - Fuel gauge (state of charge changed)
//!
//! The widget registers one handler per event kind it cares about and
//! never sees how the bus dispatches them.
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ USB stack   │────▶│              │────▶│ power        │
//! │ BLE stack   │────▶│  EventBus    │────▶│ connectivity │
//! │ Split link  │────▶│ (subscribe)  │────▶│ battery      │
//! │ Fuel gauge  │────▶│              │     │ handlers     │
//! └─────────────┘     └──────────────┘     └──────────────┘
//! ```

use heapless::Vec;

use crate::error::{Error, Result};

/// Maximum number of handlers a [`LocalEventBus`] can hold.
pub const MAX_SUBSCRIBERS: usize = 8;

/// Status notifications delivered by the firmware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusEvent {
    /// USB power attached or removed.
    UsbConnStateChanged { powered: bool },
    /// The active BLE host profile changed (or its connection state did).
    BleActiveProfileChanged { index: u8 },
    /// The split link to the central came up or went down.
    SplitPeripheralStatusChanged { connected: bool },
    /// Battery state of charge changed. `0` means not yet determined.
    BatteryStateChanged { state_of_charge: u8 },
}

/// Subscription key for [`StatusEvent`] variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    UsbConnState,
    BleActiveProfile,
    SplitPeripheralStatus,
    BatteryState,
}

impl StatusEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::UsbConnStateChanged { .. } => EventKind::UsbConnState,
            Self::BleActiveProfileChanged { .. } => EventKind::BleActiveProfile,
            Self::SplitPeripheralStatusChanged { .. } => EventKind::SplitPeripheralStatus,
            Self::BatteryStateChanged { .. } => EventKind::BatteryState,
        }
    }
}

/// Event callback. Runs on whatever thread the bus dispatches from.
pub type Handler = Box<dyn Fn(&StatusEvent) + Send + Sync>;

/// Registration side of the firmware's event bus.
pub trait EventBus {
    fn subscribe(&mut self, kind: EventKind, handler: Handler) -> Result<()>;
}

/// In-process bus: synchronous dispatch on the publisher's thread.
///
/// Used by the host simulation and integration tests, and by firmware
/// glue that has no bus of its own.
pub struct LocalEventBus {
    subscribers: Vec<(EventKind, Handler), MAX_SUBSCRIBERS>,
}

impl LocalEventBus {
    pub fn new() -> Self {
        Self {
            subscribers: Vec::new(),
        }
    }

    /// Deliver `event` to every handler subscribed to its kind.
    /// Returns the number of handlers invoked.
    pub fn publish(&self, event: &StatusEvent) -> usize {
        let kind = event.kind();
        let mut delivered = 0;
        for (_, handler) in self.subscribers.iter().filter(|(k, _)| *k == kind) {
            handler(event);
            delivered += 1;
        }
        delivered
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_subscribed(&self, kind: EventKind) -> bool {
        self.subscribers.iter().any(|(k, _)| *k == kind)
    }
}

impl Default for LocalEventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus for LocalEventBus {
    fn subscribe(&mut self, kind: EventKind, handler: Handler) -> Result<()> {
        self.subscribers
            .push((kind, handler))
            .map_err(|_| Error::Init("event bus subscriber table full"))
    }
}
