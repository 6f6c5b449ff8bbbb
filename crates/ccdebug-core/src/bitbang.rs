//! Bit-level helpers for the DC/DD lines
//!
//! These are ungated: they assume the caller already checked the session
//! state and turned DD the right way. [`Session`](crate::Session) wraps
//! them with the active/debug-mode checks.
//!
//! Bits go MSB first. The debugger changes DD while DC is low and the
//! target samples on the rising edge; in the other direction the target
//! presents its bit after the rising edge and the debugger samples while DC
//! is high.

use crate::pins::{DebugPins, Level, Pin};
use crate::timing::BIT_HALF_PERIOD;

/// Emit one DC pulse without touching DD
pub fn clock_pulse<P: DebugPins + ?Sized>(pins: &mut P) {
    pins.write_pin(Pin::Clock, Level::High);
    pins.delay(BIT_HALF_PERIOD);
    pins.write_pin(Pin::Clock, Level::Low);
    pins.delay(BIT_HALF_PERIOD);
}

/// Run the clock for a number of cycles
pub fn run_clock<P: DebugPins + ?Sized>(pins: &mut P, cycles: usize) {
    for _ in 0..cycles {
        clock_pulse(pins);
    }
}

/// Shift a byte out on DD (DD must already be an output)
pub fn write_byte<P: DebugPins + ?Sized>(pins: &mut P, byte: u8) {
    for bit in (0..8).rev() {
        pins.write_pin(Pin::Data, Level::from_bit(byte, bit));
        pins.write_pin(Pin::Clock, Level::High);
        pins.delay(BIT_HALF_PERIOD);
        pins.write_pin(Pin::Clock, Level::Low);
        pins.delay(BIT_HALF_PERIOD);
    }
}

/// Shift a byte in from DD (DD must already be an input)
pub fn read_byte<P: DebugPins + ?Sized>(pins: &mut P) -> u8 {
    let mut byte = 0u8;
    for _ in 0..8 {
        pins.write_pin(Pin::Clock, Level::High);
        pins.delay(BIT_HALF_PERIOD);
        byte <<= 1;
        if pins.read_pin(Pin::Data).is_high() {
            byte |= 1;
        }
        pins.write_pin(Pin::Clock, Level::Low);
        pins.delay(BIT_HALF_PERIOD);
    }
    byte
}

/// Write multiple bytes
pub fn write_bytes<P: DebugPins + ?Sized>(pins: &mut P, bytes: &[u8]) {
    for &byte in bytes {
        write_byte(pins, byte);
    }
}

/// Read multiple bytes
pub fn read_bytes<P: DebugPins + ?Sized>(pins: &mut P, buf: &mut [u8]) {
    for byte in buf.iter_mut() {
        *byte = read_byte(pins);
    }
}
