//! Error types for ccdebug-core
//!
//! The debug link only knows three failure conditions. They are reported as
//! `Result` values and also latched into the session so callers that poll
//! [`Session::last_error`](crate::Session::last_error) see the same thing.

use core::fmt;

/// Core error type - no_std compatible, Copy for efficiency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Error {
    /// The debugger does not currently own the pins
    NotActive,
    /// The operation needs the target to be in debug mode
    NotDebugging,
    /// The target never signalled ready; the link is presumed lost and
    /// debug mode has been left
    NotWired,
}

impl Error {
    /// Numeric error code as reported over adapter protocols (0 is "no error")
    pub const fn code(self) -> u8 {
        match self {
            Self::NotActive => 1,
            Self::NotDebugging => 2,
            Self::NotWired => 3,
        }
    }

    /// Decode a numeric error code, `None` for code 0 or unknown codes
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::NotActive),
            2 => Some(Self::NotDebugging),
            3 => Some(Self::NotWired),
            _ => None,
        }
    }

    /// Whether this error means the debug session is gone and `enter()` is
    /// needed before anything else will work
    pub const fn is_link_lost(self) -> bool {
        matches!(self, Self::NotWired)
    }
}

/// Numeric code for an optional last error (`None` maps to 0)
pub const fn error_code(err: Option<Error>) -> u8 {
    match err {
        Some(e) => e.code(),
        None => 0,
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotActive => write!(f, "debugger is not active"),
            Self::NotDebugging => write!(f, "target is not in debug mode"),
            Self::NotWired => write!(f, "target did not respond (check wiring)"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

/// Result type alias using the core Error type
pub type Result<T> = core::result::Result<T, Error>;
