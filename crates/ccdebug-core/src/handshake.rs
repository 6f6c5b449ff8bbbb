//! Debug mode entry and exit
//!
//! Entry is a fixed waveform rather than a byte exchange: two DC pulses
//! while RST is held low. The target gives no acknowledgement, so the
//! session assumes success once the sequence has been sent.

use crate::error::Result;
use crate::instruction::Instruction;
use crate::pins::{DebugPins, Level, Pin};
use crate::session::Session;
use crate::timing::{ENTRY_CLOCK_PATTERN, ENTRY_RESET_HOLD};

/// Send the debug-request waveform
///
/// ```text
/// RST ‾‾\____________________________/‾‾‾‾‾‾
/// DC  _______/‾‾\__/‾‾\____________________
///        200   3  3  3  4      200
/// ```
pub fn debug_entry_sequence<P: DebugPins + ?Sized>(pins: &mut P) {
    pins.write_pin(Pin::Reset, Level::Low);
    pins.delay(ENTRY_RESET_HOLD);

    for (i, &hold) in ENTRY_CLOCK_PATTERN.iter().enumerate() {
        let level = if i % 2 == 0 { Level::High } else { Level::Low };
        pins.write_pin(Pin::Clock, level);
        pins.delay(hold);
    }

    pins.write_pin(Pin::Reset, Level::High);
    pins.delay(ENTRY_RESET_HOLD);
}

impl<P: DebugPins> Session<P> {
    /// Put the target into debug mode
    ///
    /// Clears the latched error. Fails with
    /// [`Error::NotActive`](crate::Error::NotActive) when the debugger does
    /// not own the pins.
    pub fn enter(&mut self) -> Result<()> {
        self.check_active()?;
        self.last_error = None;

        debug_entry_sequence(&mut self.pins);
        self.in_debug_mode = true;

        log::debug!("ccdebug: entered debug mode");
        Ok(())
    }

    /// Resume the target and leave debug mode
    ///
    /// The status byte the target answers with is discarded. Debug mode is
    /// left even if the exchange times out, in which case
    /// [`Error::NotWired`](crate::Error::NotWired) is returned.
    pub fn exit(&mut self) -> Result<()> {
        self.check_debugging()?;

        let result = self.command_u8(Instruction::Resume, &[]).map(|_| ());
        self.in_debug_mode = false;

        log::debug!("ccdebug: left debug mode");
        result
    }
}
