//! Bounded message queue between the status indicators and the display
//! engine.
//!
//! ```text
//! ┌──────────────────┐
//! │ event callbacks  │──▶┌──────────────┐     ┌────────────────┐
//! │ debounce worker  │──▶│ MessageQueue │────▶│ DisplayEngine  │
//! │ init thread      │──▶│  (16 slots)  │     │ (one consumer) │
//! └──────────────────┘   └──────────────┘     └────────────────┘
//! ```
//!
//! Producers never block. When the queue is full the new message is
//! dropped: status indication is best-effort and the next real change
//! re-emits. The consumer either blocks until a message arrives or polls.

use core::sync::atomic::{AtomicU32, Ordering};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Channel, TrySendError};
use log::debug;

use super::messages::Message;

/// Maximum number of pending messages.
pub const QUEUE_CAPACITY: usize = 16;

pub struct MessageQueue {
    channel: Channel<CriticalSectionRawMutex, Message, QUEUE_CAPACITY>,
    dropped: AtomicU32,
}

impl MessageQueue {
    pub const fn new() -> Self {
        Self {
            channel: Channel::new(),
            dropped: AtomicU32::new(0),
        }
    }

    /// Queue a message without blocking.
    /// Returns `false` if the queue is full (message dropped).
    pub fn enqueue(&self, msg: Message) -> bool {
        match self.channel.try_send(msg) {
            Ok(()) => true,
            Err(TrySendError::Full(msg)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                debug!("LED message queue full, dropping {:?}", msg);
                false
            }
        }
    }

    /// Wait until a message is available. Consumer side only.
    pub fn dequeue(&self) -> Message {
        futures_lite::future::block_on(self.channel.receive())
    }

    /// Take the next message if one is pending.
    pub fn try_dequeue(&self) -> Option<Message> {
        self.channel.try_receive().ok()
    }

    pub fn len(&self) -> usize {
        self.channel.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channel.is_empty()
    }

    /// Messages dropped on a full queue since boot.
    pub fn dropped(&self) -> u32 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl Default for MessageQueue {
    fn default() -> Self {
        Self::new()
    }
}
