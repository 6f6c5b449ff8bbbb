//! Error types for the Linux GPIO backend

use gpiocdev::line::Offset;
use thiserror::Error;

/// Linux GPIO specific errors
#[derive(Debug, Error)]
pub enum LinuxGpioError {
    /// Failed to request GPIO lines
    #[error("Failed to request GPIO lines on '{path}': {source}")]
    LineRequestFailed {
        path: String,
        #[source]
        source: gpiocdev::Error,
    },

    /// GPIO chip or device not specified
    #[error("No GPIO chip specified. Use dev=/dev/gpiochipN or gpiochip=N")]
    NoDevice,

    /// Two debug lines mapped to the same GPIO
    #[error("{first} and {second} both use GPIO line {offset}")]
    SharedLine {
        first: &'static str,
        second: &'static str,
        offset: Offset,
    },
}

/// Result type for Linux GPIO operations
pub type Result<T> = std::result::Result<T, LinuxGpioError>;
