//! Intent messages sent from the status indicators to the display engine.

use super::patterns::Condition;

/// Steady-state LED level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Color {
    #[default]
    Off,
    On,
}

impl Color {
    /// The level used for a blink on top of this base colour.
    pub const fn inverse(self) -> Self {
        match self {
            Self::Off => Self::On,
            Self::On => Self::Off,
        }
    }

    pub const fn from_bool(on: bool) -> Self {
        if on { Self::On } else { Self::Off }
    }
}

/// Messages the display engine consumes, strictly in FIFO order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    /// Replace the base colour.
    ColorSet(Color),
    /// Retract `off` and assert `on` as one step.
    PatternToggle {
        off: Option<Condition>,
        on: Option<Condition>,
    },
}

impl Message {
    pub const fn toggle(off: Option<Condition>, on: Option<Condition>) -> Self {
        Self::PatternToggle { off, on }
    }
}
