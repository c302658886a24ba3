//! Unified error types for the LED widget.
//!
//! Nothing in the widget is fatal: every variant ends up in a log line and
//! the caller carries on. All variants are `Copy` so the display loop can
//! pass them around without allocation.

use core::fmt;

use embedded_hal::digital::ErrorKind;

// ---------------------------------------------------------------------------
// Top-level widget error
// ---------------------------------------------------------------------------

/// Every fallible operation in the widget funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The LED output rejected a write.
    Led(LedError),
    /// A pattern index outside the pattern table was requested.
    InvalidPattern(u8),
    /// Startup could not complete (thread spawn, bus subscription).
    Init(&'static str),
    /// Configuration is invalid.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Led(e) => write!(f, "led: {e}"),
            Self::InvalidPattern(index) => write!(f, "invalid pattern index {index}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// LED errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedError {
    /// The pin driver reported an error while driving the output.
    WriteFailed(ErrorKind),
}

impl fmt::Display for LedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WriteFailed(kind) => write!(f, "pin write failed ({kind:?})"),
        }
    }
}

impl From<LedError> for Error {
    fn from(e: LedError) -> Self {
        Self::Led(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Widget-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
