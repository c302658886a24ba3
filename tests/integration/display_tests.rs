//! Integration tests: indicators → MessageQueue → DisplayEngine → LED.
//!
//! The engine is stepped on the test thread against a recording pin and
//! delay. `step()` blocks while nothing is displayed, so every loop here
//! stops once the queue is drained.

use std::sync::Arc;

use led_widget::adapters::board::StatusBoard;
use led_widget::app::engine::DisplayEngine;
use led_widget::app::messages::{Color, Message};
use led_widget::app::patterns::Condition;
use led_widget::app::queue::MessageQueue;
use led_widget::app::service::WidgetService;
use led_widget::config::{SplitRole, WidgetConfig};

use super::mock_hw::{LedLog, LedOp, MockDelay, MockPin, NoDelay, new_log, settle, take};

fn config() -> WidgetConfig {
    WidgetConfig {
        role: SplitRole::Central,
        ble_enabled: true,
        battery_reporting: false,
        ..WidgetConfig::default()
    }
}

fn engine(
    queue: &Arc<MessageQueue>,
    log: &LedLog,
) -> DisplayEngine<MockPin, MockDelay> {
    let mut engine = DisplayEngine::new(
        MockPin(Arc::clone(log)),
        MockDelay(Arc::clone(log)),
        &config(),
        Arc::clone(queue),
    );
    engine.start();
    engine
}

fn run_until_drained(engine: &mut DisplayEngine<MockPin, MockDelay>, queue: &MessageQueue) {
    while !queue.is_empty() {
        engine.step();
    }
}

fn sleeps(ops: &[LedOp], ms: u32) -> usize {
    ops.iter().filter(|op| **op == LedOp::Sleep(ms)).count()
}

#[test]
fn boot_while_connected_flashes_once_on_lit_base() {
    let cfg = config();
    let board = Arc::new(StatusBoard::new());
    let queue = Arc::new(MessageQueue::new());
    let service = WidgetService::new(
        &cfg,
        &queue,
        Arc::clone(&board),
        Arc::clone(&board),
        Arc::clone(&board),
    )
    .unwrap();
    board.set_usb_powered(true);
    board.set_profile(0, true, false);

    service.initialize(&mut NoDelay);
    settle();
    assert_eq!(queue.len(), 3);

    let log = new_log();
    let mut engine = engine(&queue, &log);
    run_until_drained(&mut engine, &queue);

    // Off at start, lit by USB, one dark blink for the connection, then
    // back to the lit base with no further writes.
    assert_eq!(
        take(&log),
        [
            LedOp::Write(Color::Off),
            LedOp::Write(Color::On),
            LedOp::Write(Color::Off),
            LedOp::Sleep(u32::from(cfg.connected_blink_ms)),
            LedOp::Write(Color::On),
            LedOp::Sleep(u32::from(cfg.interval_ms)),
        ]
    );
    assert_eq!(engine.displaying(), None);
    assert_eq!(engine.led().current(), Some(Color::On));
}

#[test]
fn advertising_repeats_until_connected() {
    let cfg = config();
    let queue = Arc::new(MessageQueue::new());
    let log = new_log();
    let mut engine = engine(&queue, &log);
    take(&log);

    queue.enqueue(Message::toggle(None, Some(Condition::Advertising)));
    for _ in 0..3 {
        engine.step();
    }
    let ops = take(&log);
    assert_eq!(sleeps(&ops, u32::from(cfg.advertising_blink_ms)), 3);

    queue.enqueue(Message::toggle(
        Some(Condition::Advertising),
        Some(Condition::Connected),
    ));
    queue.enqueue(Message::toggle(Some(Condition::Connected), None));
    engine.step();
    engine.step();

    let ops = take(&log);
    assert_eq!(sleeps(&ops, u32::from(cfg.connected_blink_ms)), 1);
    assert_eq!(sleeps(&ops, u32::from(cfg.advertising_blink_ms)), 0);
    assert!(engine.state().active.is_empty());
}

#[test]
fn connectivity_outranks_low_battery() {
    let cfg = config();
    let queue = Arc::new(MessageQueue::new());
    let log = new_log();
    let mut engine = engine(&queue, &log);

    queue.enqueue(Message::toggle(None, Some(Condition::Battery10)));
    queue.enqueue(Message::toggle(None, Some(Condition::Advertising)));
    engine.step();
    assert_eq!(engine.displaying(), Some(Condition::Battery10));
    engine.step();
    assert_eq!(engine.displaying(), Some(Condition::Advertising));
    take(&log);

    // Advertising keeps the LED while both are asserted.
    engine.step();
    let ops = take(&log);
    assert_eq!(sleeps(&ops, u32::from(cfg.advertising_blink_ms)), 1);
    assert_eq!(sleeps(&ops, u32::from(cfg.battery_blink_ms)), 0);

    // Retracting it hands the LED back to the battery warning.
    queue.enqueue(Message::toggle(Some(Condition::Advertising), None));
    engine.step();
    assert_eq!(engine.displaying(), Some(Condition::Battery10));
    let ops = take(&log);
    assert_eq!(sleeps(&ops, u32::from(cfg.battery_blink_ms)), 1);
}

#[test]
fn base_colour_change_applies_between_patterns() {
    let cfg = config();
    let queue = Arc::new(MessageQueue::new());
    let log = new_log();
    let mut engine = engine(&queue, &log);

    queue.enqueue(Message::toggle(None, Some(Condition::Battery10)));
    engine.step();
    queue.enqueue(Message::ColorSet(Color::On));
    take(&log);
    engine.step();

    // The blink now inverts to dark. The LED already rests dark after the
    // previous cycle, so only the return to the lit base is written.
    assert_eq!(
        take(&log),
        [
            LedOp::Sleep(u32::from(cfg.battery_blink_ms)),
            LedOp::Write(Color::On),
            LedOp::Sleep(u32::from(cfg.interval_ms)),
        ]
    );
    assert_eq!(engine.state().base, Color::On);
}
