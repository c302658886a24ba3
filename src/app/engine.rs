//! Display engine: the single consumer of the message queue.
//!
//! The engine owns every piece of mutable display state: the active
//! condition set, the base colour and the physical LED. Nothing else
//! touches them, so none of it needs a lock.
//!
//! ```text
//!            ┌─────────── active set empty ───────────┐
//!            ▼                                        │
//!   ┌──────────────────┐  message   ┌──────────────────┴────┐
//!   │ Idle             │──────────▶ │ Displaying(highest)   │
//!   │ blocking dequeue │            │ non-blocking dequeue, │
//!   └──────────────────┘ ◀──────────│ one pattern per loop  │
//!                         all off   └───────────────────────┘
//! ```
//!
//! Priority is re-evaluated from the full active set on every loop, so a
//! higher condition asserted mid-pattern takes over at the next cycle. A
//! pattern in progress is never interrupted.

use std::sync::Arc;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use log::{debug, warn};

use crate::config::WidgetConfig;
use crate::drivers::status_led::StatusLed;
use crate::error::Error;

use super::active_set::ActiveSet;
use super::messages::{Color, Message};
use super::patterns::{Condition, PatternTable};
use super::queue::MessageQueue;

/// Display state owned by the engine thread.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineState {
    pub active: ActiveSet,
    pub base: Color,
}

pub struct DisplayEngine<P, D> {
    state: EngineState,
    led: StatusLed<P>,
    delay: D,
    patterns: PatternTable,
    /// Rest at base colour after each rendered pattern.
    rest_ms: u16,
    queue: Arc<MessageQueue>,
}

impl<P: OutputPin, D: DelayNs> DisplayEngine<P, D> {
    pub fn new(pin: P, delay: D, config: &WidgetConfig, queue: Arc<MessageQueue>) -> Self {
        Self {
            state: EngineState::default(),
            led: StatusLed::new(pin),
            delay,
            patterns: PatternTable::new(config),
            rest_ms: config.interval_ms,
            queue,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Put the LED at the base colour. Call once before [`step`](Self::step).
    pub fn start(&mut self) {
        self.drive(self.state.base, 0);
    }

    /// Start and process messages forever.
    pub fn run(mut self) -> ! {
        self.start();
        loop {
            self.step();
        }
    }

    /// One loop iteration: take a message, apply it, render.
    ///
    /// Blocks for a message only while nothing is displayed; otherwise
    /// drains whatever is pending between pattern cycles.
    pub fn step(&mut self) {
        let msg = if self.state.active.is_empty() {
            Some(self.queue.dequeue())
        } else {
            self.queue.try_dequeue()
        };
        self.process(msg);
    }

    /// Apply an optional message and render the resulting state.
    pub fn process(&mut self, msg: Option<Message>) {
        if let Some(msg) = msg {
            self.apply(msg);
        }

        match self.state.active.highest_index() {
            None => self.drive(self.state.base, 0),
            Some(index) => self.display_pattern(index),
        }
    }

    /// Update state from a single message without rendering.
    pub fn apply(&mut self, msg: Message) {
        match msg {
            Message::ColorSet(color) => {
                debug!("Got a color item from msgq, color {:?}", color);
                self.state.base = color;
            }
            Message::PatternToggle { off, on } => {
                self.state.active.toggle(off, on);
                debug!(
                    "Got a pattern swap item from msgq, pattern off {:?}, pattern on {:?}, current patterns 0b{:05b}",
                    off,
                    on,
                    self.state.active.bits()
                );
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Condition whose pattern is rendered on the next cycle.
    pub fn displaying(&self) -> Option<Condition> {
        self.state.active.highest()
    }

    pub fn led(&self) -> &StatusLed<P> {
        &self.led
    }

    // ── Internal ──────────────────────────────────────────────

    fn display_pattern(&mut self, index: u8) {
        let Some(&pattern) = self.patterns.lookup(index) else {
            warn!("{}", Error::InvalidPattern(index));
            return;
        };

        let base = self.state.base;
        for i in 0..pattern.times {
            self.drive(base.inverse(), pattern.on_ms);
            if i + 1 < pattern.times {
                self.drive(base, pattern.gap_ms);
            }
        }
        self.drive(base, self.rest_ms);
    }

    /// Set the LED (edge-triggered) and hold for `hold_ms`.
    fn drive(&mut self, color: Color, hold_ms: u16) {
        if let Err(e) = self.led.set(color) {
            warn!("Status LED: {}", e);
        }
        if hold_ms > 0 {
            self.delay.delay_ms(u32::from(hold_ms));
        }
    }
}
