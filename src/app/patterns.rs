//! Status conditions and their blink patterns.
//!
//! Every [`Condition`] owns exactly one [`Pattern`]. The discriminant is
//! both the bit position in the [`ActiveSet`](super::active_set::ActiveSet)
//! and the arbitration priority: a higher discriminant wins.
//!
//! | Condition     | Blinks | On-time                | Gap                      |
//! |---------------|--------|------------------------|--------------------------|
//! | `Battery30`   | 3      | `battery_blink_ms`     | `battery_blink_gap_ms`   |
//! | `Battery20`   | 2      | `battery_blink_ms`     | `battery_blink_gap_ms`   |
//! | `Battery10`   | 1      | `battery_blink_ms`     | `battery_blink_gap_ms`   |
//! | `Advertising` | 1      | `advertising_blink_ms` | 0                        |
//! | `Connected`   | 1      | `connected_blink_ms`   | 0                        |

use core::fmt;

use crate::config::WidgetConfig;

/// A status category that can be asserted on the LED.
///
/// Lowest priority first. "No condition" is `Option::<Condition>::None`
/// and can never be stored in the active set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Condition {
    /// Battery at or below 30%.
    Battery30 = 0,
    /// Battery at or below 20%.
    Battery20 = 1,
    /// Battery at or below 10%.
    Battery10 = 2,
    /// Active BLE profile is open and advertising.
    Advertising = 3,
    /// Link just came up.
    Connected = 4,
}

impl Condition {
    pub const COUNT: usize = 5;

    /// All conditions in priority order, lowest first.
    pub const ALL: [Condition; Self::COUNT] = [
        Condition::Battery30,
        Condition::Battery20,
        Condition::Battery10,
        Condition::Advertising,
        Condition::Connected,
    ];

    /// Bit position / table index of this condition.
    pub const fn index(self) -> u8 {
        self as u8
    }

    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Battery30 => write!(f, "battery<=30%"),
            Self::Battery20 => write!(f, "battery<=20%"),
            Self::Battery10 => write!(f, "battery<=10%"),
            Self::Advertising => write!(f, "advertising"),
            Self::Connected => write!(f, "connected"),
        }
    }
}

/// One blink pattern: `times` pulses of `on_ms`, separated by `gap_ms`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pattern {
    pub times: u8,
    pub on_ms: u16,
    pub gap_ms: u16,
}

/// Immutable condition → pattern registry, built once at engine start.
#[derive(Debug, Clone)]
pub struct PatternTable {
    patterns: [Pattern; Condition::COUNT],
}

impl PatternTable {
    pub fn new(config: &WidgetConfig) -> Self {
        let battery = |times| Pattern {
            times,
            on_ms: config.battery_blink_ms,
            gap_ms: config.battery_blink_gap_ms,
        };

        // Must match the discriminant order of `Condition`.
        Self {
            patterns: [
                battery(3),
                battery(2),
                battery(1),
                Pattern {
                    times: 1,
                    on_ms: config.advertising_blink_ms,
                    gap_ms: 0,
                },
                Pattern {
                    times: 1,
                    on_ms: config.connected_blink_ms,
                    gap_ms: 0,
                },
            ],
        }
    }

    /// Pattern at a raw table index, `None` when out of range.
    pub fn lookup(&self, index: u8) -> Option<&Pattern> {
        self.patterns.get(index as usize)
    }

    pub fn get(&self, condition: Condition) -> &Pattern {
        &self.patterns[condition.index() as usize]
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
