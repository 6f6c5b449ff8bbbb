//! Debug session state
//!
//! A [`Session`] owns the pin backend for one physical debug link and tracks
//! the three protocol states:
//!
//! ```text
//!               set_active(true)              enter()
//!   Inactive  ------------------>  Active  ------------>  Active +
//!             <------------------          <------------  Debugging
//!               set_active(false)          exit() / timeout
//! ```
//!
//! Sessions start out active and not debugging. Deactivating from debug mode
//! runs the exit sequence first, so debug mode can never outlive the pins.
//!
//! Every command that talks to the target checks the state first and fails
//! with [`Error::NotActive`] or [`Error::NotDebugging`] without touching any
//! pin. Failures are also latched and can be read back with
//! [`Session::last_error`].

use crate::error::{Error, Result};
use crate::instruction::{InstructionTable, TABLE_LEN};
use crate::pins::{DebugPins, Direction, Level, Pin};
use crate::timing::DEFAULT_READY_WAIT_CYCLES;

/// Session construction options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Ready-wait budget (in 8-clock cycles) for every dispatched command
    pub ready_wait_cycles: u8,
    /// Instruction table to start with
    pub table: InstructionTable,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ready_wait_cycles: DEFAULT_READY_WAIT_CYCLES,
            table: InstructionTable::CC254X,
        }
    }
}

impl SessionConfig {
    /// Set the ready-wait budget
    pub fn with_ready_wait_cycles(mut self, cycles: u8) -> Self {
        self.ready_wait_cycles = cycles;
        self
    }

    /// Set the initial instruction table
    pub fn with_table(mut self, table: InstructionTable) -> Self {
        self.table = table;
        self
    }
}

/// One debug link
///
/// The session is not synchronized. The two-wire link has no way to share
/// the bus, so hosts that need several logical users must serialize access
/// to the session themselves.
pub struct Session<P: DebugPins> {
    pub(crate) pins: P,
    pub(crate) active: bool,
    pub(crate) in_debug_mode: bool,
    pub(crate) data_direction: Direction,
    pub(crate) last_error: Option<Error>,
    pub(crate) table: InstructionTable,
    pub(crate) ready_wait_cycles: u8,
}

impl<P: DebugPins> Session<P> {
    /// Take over the pins with the default configuration
    pub fn new(pins: P) -> Self {
        Self::with_config(pins, SessionConfig::default())
    }

    /// Take over the pins with an explicit configuration
    pub fn with_config(pins: P, config: SessionConfig) -> Self {
        let mut session = Self {
            pins,
            active: false,
            in_debug_mode: false,
            data_direction: Direction::Input,
            last_error: None,
            table: config.table,
            ready_wait_cycles: config.ready_wait_cycles,
        };
        session.reset_state();
        session
    }

    /// Put the pins into their idle state and restore defaults
    ///
    /// Drives RST, DC and DD low, turns DD into an input, loads the CC254x
    /// instruction table and marks the session active and not debugging.
    pub fn initialize(&mut self) {
        self.table = InstructionTable::CC254X;
        self.reset_state();
    }

    /// Idle pins, active and not debugging; the table is left alone
    fn reset_state(&mut self) {
        self.drive_pins();
        self.active = true;
        self.in_debug_mode = false;
        self.last_error = None;
        log::debug!(
            "ccdebug: session initialized (table v{})",
            self.table.version()
        );
    }

    /// Last latched error, `None` if the last state change succeeded
    pub fn last_error(&self) -> Option<Error> {
        self.last_error
    }

    /// Whether the debugger owns the pins
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Whether the target completed the debug entry sequence
    pub fn in_debug_mode(&self) -> bool {
        self.in_debug_mode
    }

    /// Last requested direction of DD
    pub fn data_direction(&self) -> Direction {
        self.data_direction
    }

    /// Ready-wait budget used by dispatched commands
    pub fn ready_wait_cycles(&self) -> u8 {
        self.ready_wait_cycles
    }

    /// Borrow the pin backend
    pub fn pins(&self) -> &P {
        &self.pins
    }

    /// Mutably borrow the pin backend
    ///
    /// Changing pin state behind the session's back breaks its direction
    /// tracking; this is meant for inspection and test doubles.
    pub fn pins_mut(&mut self) -> &mut P {
        &mut self.pins
    }

    /// Activate or deactivate the debugger
    ///
    /// Activating reclaims the pins (outputs, low) and expects DD as an
    /// input. Deactivating leaves debug mode first if needed, then releases
    /// every line as a low input. Requests for the current state are no-ops
    /// and do not touch the pins.
    ///
    /// The latched error is cleared on entry. The only error this can
    /// return is one from the exit sequence, and the pins are released
    /// regardless.
    pub fn set_active(&mut self, on: bool) -> Result<()> {
        self.last_error = None;

        if on == self.active {
            return Ok(());
        }

        if on {
            self.active = true;
            self.drive_pins();
            log::debug!("ccdebug: activated");
            return Ok(());
        }

        let exited = if self.in_debug_mode {
            self.exit()
        } else {
            Ok(())
        };

        self.active = false;
        self.in_debug_mode = false;
        for pin in Pin::ALL {
            self.pins.configure_pin(pin, Direction::Input);
            self.pins.write_pin(pin, Level::Low);
        }
        log::debug!("ccdebug: deactivated, pins released");

        exited
    }

    /// Replace the whole instruction table from its raw form
    ///
    /// Returns the new table's version.
    pub fn update_instruction_table(&mut self, table: [u8; TABLE_LEN]) -> u8 {
        self.set_instruction_table(InstructionTable::from_bytes(table))
    }

    /// Replace the whole instruction table
    ///
    /// Returns the new table's version.
    pub fn set_instruction_table(&mut self, table: InstructionTable) -> u8 {
        self.table = table;
        log::debug!("ccdebug: instruction table v{} loaded", table.version());
        table.version()
    }

    /// Version of the current instruction table
    pub fn instruction_table_version(&self) -> u8 {
        self.table.version()
    }

    /// Current instruction table
    pub fn instruction_table(&self) -> &InstructionTable {
        &self.table
    }

    /// Deactivate and hand the pin backend back
    pub fn release(mut self) -> P {
        if let Err(e) = self.set_active(false) {
            log::warn!("ccdebug: exit during release failed: {}", e);
        }
        self.pins
    }

    /// Hand the pin backend back as it is
    ///
    /// Unlike [`release`](Self::release) nothing is sent and the lines keep
    /// their current directions, so a halted target stays in debug mode.
    pub fn into_pins(self) -> P {
        self.pins
    }

    /// Record a failure and return it
    pub(crate) fn fail<T>(&mut self, err: Error) -> Result<T> {
        self.last_error = Some(err);
        Err(err)
    }

    /// Gate for operations that need the pins
    pub(crate) fn check_active(&mut self) -> Result<()> {
        if !self.active {
            return self.fail(Error::NotActive);
        }
        Ok(())
    }

    /// Gate for operations that need debug mode
    pub(crate) fn check_debugging(&mut self) -> Result<()> {
        self.check_active()?;
        if !self.in_debug_mode {
            return self.fail(Error::NotDebugging);
        }
        Ok(())
    }

    /// Drive all lines low as outputs, then hand DD over to the target
    fn drive_pins(&mut self) {
        for pin in Pin::ALL {
            self.pins.configure_pin(pin, Direction::Output);
            self.pins.write_pin(pin, Level::Low);
        }
        self.data_direction = Direction::Output;
        self.set_data_direction(Direction::Input);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instruction::Instruction;
    use crate::mock::{Event, MockPins};

    #[test]
    fn test_new_session_is_active_not_debugging() {
        let session = Session::new(MockPins::new());
        assert!(session.is_active());
        assert!(!session.in_debug_mode());
        assert_eq!(session.last_error(), None);
        assert_eq!(session.instruction_table_version(), 1);
        assert_eq!(session.data_direction(), Direction::Input);
        assert_eq!(session.pins().direction(Pin::Data), Direction::Input);
        assert_eq!(session.pins().direction(Pin::Clock), Direction::Output);
        assert_eq!(session.pins().direction(Pin::Reset), Direction::Output);
    }

    #[test]
    fn test_config_table_survives_initialize() {
        let table = InstructionTable::CC254X.with_version(9);
        let session = Session::with_config(
            MockPins::new(),
            SessionConfig::default()
                .with_table(table)
                .with_ready_wait_cycles(10),
        );
        assert_eq!(session.instruction_table_version(), 9);
        assert_eq!(session.ready_wait_cycles(), 10);
    }

    #[test]
    fn test_with_config_keeps_custom_opcodes() {
        let table = InstructionTable::CC254X
            .with_version(3)
            .with_opcode(Instruction::Halt, 0x44);
        let mut session =
            Session::with_config(MockPins::new(), SessionConfig::default().with_table(table));
        assert_eq!(session.instruction_table(), &table);
        assert!(session.is_active());
        assert_eq!(session.pins().direction(Pin::Data), Direction::Input);

        session.initialize();
        assert_eq!(session.instruction_table(), &InstructionTable::CC254X);
        assert_eq!(session.instruction_table_version(), 1);
    }

    #[test]
    fn test_set_active_same_state_is_noop() {
        let mut session = Session::new(MockPins::new());
        session.pins_mut().reset_log();
        session.set_active(true).unwrap();
        assert_eq!(session.pins().pin_activity(), 0);

        session.set_active(false).unwrap();
        session.pins_mut().reset_log();
        session.set_active(false).unwrap();
        assert_eq!(session.pins().pin_activity(), 0);
    }

    #[test]
    fn test_deactivate_releases_pins() {
        let mut session = Session::new(MockPins::new());
        session.set_active(false).unwrap();
        assert!(!session.is_active());
        for pin in Pin::ALL {
            assert_eq!(session.pins().direction(pin), Direction::Input);
        }

        session.set_active(true).unwrap();
        assert!(session.is_active());
        assert_eq!(session.pins().direction(Pin::Clock), Direction::Output);
        assert_eq!(session.pins().direction(Pin::Data), Direction::Input);
    }

    #[test]
    fn test_deactivate_from_debug_mode_exits_first() {
        let mut session = Session::new(MockPins::new());
        session.enter().unwrap();
        session.pins_mut().reset_log();
        session.pins_mut().respond(&[0x00]);

        session.set_active(false).unwrap();
        assert!(!session.in_debug_mode());
        assert!(!session.is_active());

        let pins = session.pins();
        assert_eq!(
            pins.sampled_bytes(),
            [InstructionTable::CC254X.opcode(Instruction::Resume)]
        );

        // The RESUME exchange happens before any line is released
        let first_release = pins
            .events
            .iter()
            .position(|e| *e == Event::Configure(Pin::Reset, Direction::Input))
            .unwrap();
        let last_read = pins
            .events
            .iter()
            .rposition(|e| *e == Event::Read(Pin::Data))
            .unwrap();
        assert!(last_read < first_release);
    }

    #[test]
    fn test_set_active_clears_error() {
        let mut session = Session::new(MockPins::new());
        assert_eq!(session.halt(), Err(Error::NotDebugging));
        assert_eq!(session.last_error(), Some(Error::NotDebugging));
        session.set_active(true).unwrap();
        assert_eq!(session.last_error(), None);
    }

    #[test]
    fn test_update_instruction_table() {
        let mut session = Session::new(MockPins::new());
        let mut raw = InstructionTable::CC254X.to_bytes();
        raw[0] = 7;
        assert_eq!(session.update_instruction_table(raw), 7);
        assert_eq!(session.instruction_table_version(), 7);
        assert_eq!(session.instruction_table().to_bytes(), raw);
    }

    #[test]
    fn test_release_returns_pins_inactive() {
        let mut session = Session::new(MockPins::new());
        session.enter().unwrap();
        session.pins_mut().respond(&[0x00]);
        let pins = session.release();
        assert_eq!(pins.direction(Pin::Reset), Direction::Input);
        assert_eq!(pins.direction(Pin::Data), Direction::Input);
    }

    #[test]
    fn test_release_after_failed_command_frees_pins() {
        let mut session = Session::new(MockPins::stuck_high());
        session.enter().unwrap();
        assert_eq!(session.chip_id(), Err(Error::NotWired));
        let pins = session.release();
        for pin in Pin::ALL {
            assert_eq!(pins.direction(pin), Direction::Input);
        }
    }

    #[test]
    fn test_into_pins_leaves_lines_driven() {
        let mut session = Session::new(MockPins::new());
        session.enter().unwrap();
        session.pins_mut().reset_log();
        let pins = session.into_pins();
        assert_eq!(pins.pin_activity(), 0);
        assert_eq!(pins.direction(Pin::Reset), Direction::Output);
        assert_eq!(pins.direction(Pin::Clock), Direction::Output);
    }
}
