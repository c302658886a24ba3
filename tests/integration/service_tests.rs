//! Integration tests for the event bus → WidgetService → MessageQueue path.
//!
//! Firmware state lives in a shared `StatusBoard`; tests mutate it,
//! publish the matching event and assert on the messages queued for the
//! display engine.

use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

use led_widget::adapters::board::StatusBoard;
use led_widget::app::messages::{Color, Message};
use led_widget::app::patterns::Condition;
use led_widget::app::ports::{BatteryPort, Transport};
use led_widget::app::queue::MessageQueue;
use led_widget::app::service::WidgetService;
use led_widget::config::{SplitRole, WidgetConfig};
use led_widget::events::{EventKind, LocalEventBus, StatusEvent};

use super::mock_hw::{NoDelay, drain, settle};

struct Rig {
    board: Arc<StatusBoard>,
    queue: Arc<MessageQueue>,
    service: WidgetService<Arc<StatusBoard>, Arc<StatusBoard>>,
    bus: LocalEventBus,
}

impl Rig {
    fn new(config: &WidgetConfig) -> Self {
        let board = Arc::new(StatusBoard::new());
        let queue = Arc::new(MessageQueue::new());
        let service = WidgetService::new(
            config,
            &queue,
            Arc::clone(&board),
            Arc::clone(&board),
            Arc::clone(&board),
        )
        .unwrap();
        let mut bus = LocalEventBus::new();
        service.subscribe(&mut bus).unwrap();
        Self {
            board,
            queue,
            service,
            bus,
        }
    }

    fn profile(&self, index: u8, connected: bool, open: bool) {
        self.board.set_profile(index, connected, open);
        self.bus
            .publish(&StatusEvent::BleActiveProfileChanged { index });
    }

    fn usb(&self, powered: bool) {
        self.board.set_usb_powered(powered);
        self.bus
            .publish(&StatusEvent::UsbConnStateChanged { powered });
    }

    fn battery(&self, state_of_charge: u8) {
        self.bus
            .publish(&StatusEvent::BatteryStateChanged { state_of_charge });
    }

    /// Number of handlers a battery event reaches.
    fn battery_handlers(&self) -> usize {
        self.bus
            .publish(&StatusEvent::BatteryStateChanged { state_of_charge: 5 })
    }

    /// Initialise against an idle board and discard the snapshot.
    fn initialized(config: &WidgetConfig) -> Self {
        let rig = Self::new(config);
        rig.board.set_state_of_charge(80);
        rig.service.initialize(&mut NoDelay);
        settle();
        drain(&rig.queue);
        rig
    }
}

fn central() -> WidgetConfig {
    WidgetConfig {
        role: SplitRole::Central,
        ble_enabled: true,
        battery_reporting: true,
        // Wide enough that a burst published back-to-back always lands
        // inside one quiet period.
        debounce_ms: 40,
        ..WidgetConfig::default()
    }
}

fn toggle(off: Option<Condition>, on: Option<Condition>) -> Message {
    Message::toggle(off, on)
}

// ── Boot gate ─────────────────────────────────────────────────

#[test]
fn events_before_initialize_are_suppressed() {
    let rig = Rig::new(&central());
    rig.board.set_transport(Transport::Ble);

    rig.usb(true);
    rig.profile(0, false, true);
    rig.battery(15);
    settle();

    assert!(!rig.service.is_initialized());
    assert!(drain(&rig.queue).is_empty(), "no messages before init");
}

#[test]
fn initialize_queues_boot_snapshot() {
    let rig = Rig::new(&central());
    rig.board.set_usb_powered(true);
    rig.board.set_transport(Transport::Ble);
    rig.board.set_profile(2, false, true);
    rig.board.set_state_of_charge(25);

    rig.service.initialize(&mut NoDelay);
    assert!(rig.service.is_initialized());
    settle();

    let msgs = drain(&rig.queue);
    assert_eq!(msgs.len(), 3, "{msgs:?}");
    assert_eq!(msgs[0], Message::ColorSet(Color::On), "power goes first");
    assert!(msgs.contains(&toggle(None, Some(Condition::Battery30))));
    assert!(msgs.contains(&toggle(None, Some(Condition::Advertising))));
}

#[test]
fn initialize_on_idle_board_queues_nothing() {
    let rig = Rig::new(&central());
    rig.service.initialize(&mut NoDelay);
    settle();
    assert!(drain(&rig.queue).is_empty());
}

// ── Battery polling ───────────────────────────────────────────

/// Fuel gauge that reads `0` until it has been polled `ready_after` times.
struct WarmingGauge {
    reads: AtomicU8,
    ready_after: u8,
    level: u8,
}

impl BatteryPort for WarmingGauge {
    fn state_of_charge(&self) -> u8 {
        let n = self.reads.fetch_add(1, Ordering::Relaxed);
        if n >= self.ready_after { self.level } else { 0 }
    }
}

fn gauge_service(
    ready_after: u8,
    level: u8,
) -> (Arc<MessageQueue>, WidgetService<Arc<StatusBoard>, Arc<WarmingGauge>>, Arc<WarmingGauge>) {
    let board = Arc::new(StatusBoard::new());
    let queue = Arc::new(MessageQueue::new());
    let gauge = Arc::new(WarmingGauge {
        reads: AtomicU8::new(0),
        ready_after,
        level,
    });
    let service = WidgetService::new(
        &central(),
        &queue,
        Arc::clone(&board),
        board,
        Arc::clone(&gauge),
    )
    .unwrap();
    (queue, service, gauge)
}

#[test]
fn init_retries_until_battery_is_determined() {
    let (queue, service, gauge) = gauge_service(3, 8);
    service.initialize(&mut NoDelay);

    assert_eq!(gauge.reads.load(Ordering::Relaxed), 4);
    assert_eq!(drain(&queue), [toggle(None, Some(Condition::Battery10))]);
}

#[test]
fn init_gives_up_on_undetermined_battery() {
    let (queue, service, gauge) = gauge_service(u8::MAX, 8);
    service.initialize(&mut NoDelay);

    let attempts = central().battery_retry_attempts;
    assert_eq!(gauge.reads.load(Ordering::Relaxed), attempts + 1);
    assert!(drain(&queue).is_empty());
    assert!(service.is_initialized(), "init completes regardless");
}

// ── Power ─────────────────────────────────────────────────────

#[test]
fn usb_events_set_base_colour_on_change_only() {
    let rig = Rig::initialized(&central());

    rig.usb(true);
    rig.usb(true);
    assert_eq!(drain(&rig.queue), [Message::ColorSet(Color::On)]);

    rig.usb(false);
    assert_eq!(drain(&rig.queue), [Message::ColorSet(Color::Off)]);
}

// ── Battery ───────────────────────────────────────────────────

#[test]
fn discharging_battery_steps_through_tiers() {
    let rig = Rig::initialized(&central());

    for level in [35, 25, 15, 0, 5] {
        rig.battery(level);
    }

    assert_eq!(
        drain(&rig.queue),
        [
            toggle(None, Some(Condition::Battery30)),
            toggle(Some(Condition::Battery30), Some(Condition::Battery20)),
            toggle(Some(Condition::Battery20), Some(Condition::Battery10)),
        ]
    );
}

#[test]
fn charging_battery_retracts_warning() {
    let rig = Rig::initialized(&central());

    rig.battery(9);
    rig.battery(60);

    assert_eq!(
        drain(&rig.queue),
        [
            toggle(None, Some(Condition::Battery10)),
            toggle(Some(Condition::Battery10), None),
        ]
    );
}

// ── Connectivity ──────────────────────────────────────────────

#[test]
fn profile_burst_is_evaluated_once() {
    let rig = Rig::initialized(&central());
    rig.board.set_transport(Transport::Ble);

    for index in 0..4 {
        rig.profile(index, false, true);
    }
    rig.profile(4, true, false);
    settle();

    assert_eq!(
        drain(&rig.queue),
        [
            toggle(None, Some(Condition::Connected)),
            toggle(Some(Condition::Connected), None),
        ]
    );
}

#[test]
fn advertising_then_connect_flashes_connected_once() {
    let rig = Rig::initialized(&central());

    rig.profile(1, false, true);
    settle();
    assert_eq!(
        drain(&rig.queue),
        [toggle(None, Some(Condition::Advertising))]
    );

    rig.profile(1, true, false);
    settle();
    assert_eq!(
        drain(&rig.queue),
        [
            toggle(Some(Condition::Advertising), Some(Condition::Connected)),
            toggle(Some(Condition::Connected), None),
        ]
    );

    // Dropping the host leaves nothing asserted to retract.
    rig.profile(1, false, false);
    settle();
    assert!(drain(&rig.queue).is_empty());

    rig.profile(1, false, true);
    settle();
    assert_eq!(
        drain(&rig.queue),
        [toggle(None, Some(Condition::Advertising))]
    );
}

#[test]
fn usb_transport_still_reports_profile() {
    let rig = Rig::initialized(&central());
    rig.board.set_transport(Transport::Usb);

    rig.profile(3, false, true);
    settle();
    assert_eq!(
        drain(&rig.queue),
        [toggle(None, Some(Condition::Advertising))]
    );
}

// ── Role-dependent subscriptions ──────────────────────────────

#[test]
fn central_subscribes_to_profile_changes() {
    let rig = Rig::new(&central());
    assert!(rig.bus.is_subscribed(EventKind::UsbConnState));
    assert!(rig.bus.is_subscribed(EventKind::BleActiveProfile));
    assert!(!rig.bus.is_subscribed(EventKind::SplitPeripheralStatus));
    assert!(rig.bus.is_subscribed(EventKind::BatteryState));
}

#[test]
fn central_without_ble_has_no_connectivity_source() {
    let config = WidgetConfig {
        ble_enabled: false,
        battery_reporting: false,
        ..central()
    };
    let rig = Rig::initialized(&config);

    assert_eq!(rig.bus.subscriber_count(), 1);
    assert!(rig.bus.is_subscribed(EventKind::UsbConnState));

    rig.board.set_profile(0, true, false);
    assert_eq!(
        rig.bus
            .publish(&StatusEvent::BleActiveProfileChanged { index: 0 }),
        0
    );
    assert_eq!(rig.battery_handlers(), 0);
    settle();
    assert!(drain(&rig.queue).is_empty());
}

#[test]
fn peripheral_follows_split_link() {
    let config = WidgetConfig {
        role: SplitRole::Peripheral,
        ..central()
    };
    let rig = Rig::initialized(&config);

    assert!(rig.bus.is_subscribed(EventKind::SplitPeripheralStatus));
    assert!(!rig.bus.is_subscribed(EventKind::BleActiveProfile));

    // Profile state is irrelevant on the peripheral half.
    rig.board.set_profile(0, true, false);
    rig.board.set_peripheral_connected(true);
    rig.bus
        .publish(&StatusEvent::SplitPeripheralStatusChanged { connected: true });
    settle();
    assert_eq!(
        drain(&rig.queue),
        [
            toggle(None, Some(Condition::Connected)),
            toggle(Some(Condition::Connected), None),
        ]
    );

    rig.board.set_peripheral_connected(false);
    rig.bus
        .publish(&StatusEvent::SplitPeripheralStatusChanged { connected: false });
    settle();
    assert!(drain(&rig.queue).is_empty());
}
