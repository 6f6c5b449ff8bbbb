//! ccdebug-linux-gpio - Linux GPIO backend for the CC Debug interface
//!
//! This crate drives the RST, DC and DD debug lines through the Linux
//! character device GPIO interface (gpiocdev), so a Raspberry Pi or any
//! other board with spare GPIOs can act as a CC Debugger.
//!
//! # Example
//!
//! ```no_run
//! use ccdebug_core::Session;
//! use ccdebug_linux_gpio::{LinuxGpioConfig, LinuxGpioPins};
//!
//! let config = LinuxGpioConfig::new("/dev/gpiochip0", 24, 23, 22);
//! //                                 device          RST DC  DD
//!
//! let pins = LinuxGpioPins::open(&config)?;
//! let mut session = Session::new(pins);
//! session.enter()?;
//! println!("Chip ID: {:04X}", session.chip_id()?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Usage with the ccdebugger CLI
//!
//! ```bash
//! ccdebugger info -p linux_gpio:dev=/dev/gpiochip0,rst=24,dc=23,dd=22
//!
//! # Slower timing for long wires
//! ccdebugger info -p linux_gpio:gpiochip=0,rst=24,dc=23,dd=22,unit_ns=5000
//! ```
//!
//! # Wiring
//!
//! | Target Pin | GPIO Function | Description |
//! |------------|---------------|-------------|
//! | RESET_N    | RST (output)  | Reset, held low during debug entry |
//! | P2.2       | DC (output)   | Debug clock |
//! | P2.1       | DD (in/out)   | Debug data, turned around per command |
//! | GND        | GND           | Ground |
//!
//! The target must share a ground and I/O voltage with the host.
//!
//! # System Requirements
//!
//! - Linux kernel 4.8+ with GPIO character device support (kernel 5.5+ for v2 API)
//! - Access to `/dev/gpiochipN` devices (may require root or udev rules)

pub mod device;
pub mod error;

// Re-exports
pub use device::{parse_options, LinuxGpioConfig, LinuxGpioPins};
pub use error::{LinuxGpioError, Result};

use ccdebug_core::pins::DebugPins;

/// Open the debug lines and return boxed pins
///
/// This is a convenience function for use in the CLI programmer dispatch.
/// See [`parse_options`] for the accepted keys.
pub fn open_linux_gpio(
    options: &[(&str, &str)],
) -> std::result::Result<Box<dyn DebugPins>, Box<dyn std::error::Error>> {
    let config = parse_options(options)?;
    let pins = LinuxGpioPins::open(&config)?;
    Ok(Box::new(pins))
}
