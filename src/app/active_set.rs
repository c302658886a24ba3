//! Bitmask of currently asserted conditions.
//!
//! Bit *i* is set while [`Condition`] with discriminant *i* is asserted.
//! The display engine is the only writer; everything else talks to it
//! through the message queue.

use super::patterns::Condition;

const _: () = assert!(Condition::COUNT <= u8::BITS as usize);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActiveSet(u8);

impl ActiveSet {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub fn insert(&mut self, condition: Condition) {
        self.0 |= 1 << condition.index();
    }

    pub fn remove(&mut self, condition: Condition) {
        self.0 &= !(1 << condition.index());
    }

    /// Clear `off`, then set `on`. Either side may be absent.
    pub fn toggle(&mut self, off: Option<Condition>, on: Option<Condition>) {
        if let Some(off) = off {
            self.remove(off);
        }
        if let Some(on) = on {
            self.insert(on);
        }
    }

    pub fn contains(&self, condition: Condition) -> bool {
        self.0 & (1 << condition.index()) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn bits(&self) -> u8 {
        self.0
    }

    /// Position of the highest set bit.
    pub fn highest_index(&self) -> Option<u8> {
        if self.0 == 0 {
            None
        } else {
            Some((u8::BITS - 1 - self.0.leading_zeros()) as u8)
        }
    }

    /// Highest-priority asserted condition.
    pub fn highest(&self) -> Option<Condition> {
        self.highest_index().and_then(Condition::from_index)
    }
}
