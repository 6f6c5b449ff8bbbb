//! ccdebug-core - Protocol engine for the CC Debug two-wire interface
//!
//! This crate drives the debug interface found on TI CC111x/CC243x/CC253x/
//! CC254x parts by bitbanging three GPIO lines: reset (RST), debug clock (DC)
//! and the bidirectional debug data line (DD). It is `no_std` compatible so
//! the same engine can run on a host with GPIO access or on a
//! microcontroller acting as a debug adapter.
//!
//! The pieces, leaves first:
//!
//! - [`pins::DebugPins`] - the GPIO backend a [`Session`] is built on
//! - [`bitbang`] - raw clocking of bytes over DC/DD
//! - [`Session`] - active / debug-mode state, gating and the ready-wait
//! - [`instruction::InstructionTable`] - the replaceable opcode map
//! - command dispatch (`exec`, `chip_id`, `halt`, ...) on [`Session`]
//!
//! # Features
//!
//! - `std` - Enable standard library support, `std::error::Error` and
//!   loading instruction tables from TOML files
//!
//! # Example
//!
//! ```ignore
//! use ccdebug_core::{pins::DebugPins, Session};
//!
//! fn identify<P: DebugPins>(pins: P) -> ccdebug_core::Result<u16> {
//!     let mut session = Session::new(pins);
//!     session.enter()?;
//!     let id = session.chip_id()?;
//!     session.exit()?;
//!     Ok(id)
//! }
//! ```

#![no_std]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

#[cfg(any(feature = "std", test))]
extern crate std;

pub mod bitbang;
pub mod chip;
mod dispatch;
pub mod error;
mod handshake;
pub mod instruction;
pub mod pins;
pub mod session;
pub mod status;
#[cfg(feature = "std")]
pub mod table_file;
pub mod timing;
mod transport;
pub mod xdata;

#[cfg(test)]
mod mock;

pub use error::{Error, Result};
pub use handshake::debug_entry_sequence;
pub use instruction::{ExtendedInstruction, Instruction, InstructionTable};
pub use pins::{DebugPins, Direction, Level, Pin};
pub use session::{Session, SessionConfig};
pub use status::{DebugConfig, DebugStatus};
