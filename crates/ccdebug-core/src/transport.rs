//! Byte transport over DC/DD
//!
//! Gated wrappers around [`bitbang`](crate::bitbang) that keep the session's
//! view of the DD direction in sync and implement the ready-wait.

use crate::bitbang;
use crate::error::{Error, Result};
use crate::pins::{DebugPins, Direction, Level, Pin};
use crate::session::Session;
use crate::timing::{DIR_CHANGE_SETTLE, SAMPLE_SETTLE, WAIT_CYCLE_CLOCKS};

impl<P: DebugPins> Session<P> {
    /// Turn DD around, skipping the reconfiguration if it already points
    /// the requested way
    pub(crate) fn set_data_direction(&mut self, direction: Direction) {
        if direction == self.data_direction {
            return;
        }

        self.pins.write_pin(Pin::Data, Level::Low);
        self.pins.configure_pin(Pin::Data, direction);
        self.pins.write_pin(Pin::Data, Level::Low);

        self.data_direction = direction;
    }

    /// Clock one byte out to the target, MSB first
    ///
    /// Requires debug mode. Nothing is sent when the check fails.
    pub fn write_byte(&mut self, data: u8) -> Result<()> {
        self.check_debugging()?;
        self.set_data_direction(Direction::Output);
        log::trace!("ccdebug: >> {:02X}", data);
        bitbang::write_byte(&mut self.pins, data);
        Ok(())
    }

    /// Clock one byte in from the target, MSB first
    ///
    /// Only requires the session to be active.
    pub fn read_byte(&mut self) -> Result<u8> {
        self.check_active()?;
        self.set_data_direction(Direction::Input);
        let data = bitbang::read_byte(&mut self.pins);
        log::trace!("ccdebug: << {:02X}", data);
        Ok(data)
    }

    /// Hand DD to the target and wait until it signals ready
    ///
    /// While DD reads high the target is busy; each poll then runs
    /// [`WAIT_CYCLE_CLOCKS`] clocks and spends one cycle of the budget. When
    /// the budget runs out the link is treated as lost: debug mode is left
    /// and [`Error::NotWired`] is returned. The budget counter is 8 bits and
    /// wraps, so a budget of 0 allows 256 wait cycles.
    pub fn switch_to_read(&mut self, max_wait_cycles: u8) -> Result<()> {
        self.check_debugging()?;
        self.set_data_direction(Direction::Input);
        self.pins.delay(DIR_CHANGE_SETTLE);

        let mut remaining = max_wait_cycles;
        let mut waited = false;

        while self.pins.read_pin(Pin::Data).is_high() {
            bitbang::run_clock(&mut self.pins, WAIT_CYCLE_CLOCKS);
            waited = true;

            remaining = remaining.wrapping_sub(1);
            if remaining == 0 {
                log::warn!(
                    "ccdebug: target not ready after {} wait cycles, leaving debug mode",
                    max_wait_cycles
                );
                self.in_debug_mode = false;
                return self.fail(Error::NotWired);
            }
        }

        if waited {
            self.pins.delay(SAMPLE_SETTLE);
        }

        Ok(())
    }

    /// Take DD back for writing
    ///
    /// Not gated; this only changes direction.
    pub fn switch_to_write(&mut self) {
        self.set_data_direction(Direction::Output);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{Event, MockPins};

    fn debugging() -> Session<MockPins> {
        let mut session = Session::new(MockPins::new());
        session.enter().unwrap();
        session.pins_mut().reset_log();
        session
    }

    #[test]
    fn test_write_then_read_loopback() {
        let mut session = Session::new(MockPins::loopback());
        session.enter().unwrap();
        session.write_byte(0xA5).unwrap();
        assert_eq!(session.read_byte(), Ok(0xA5));
    }

    #[test]
    fn test_write_byte_forces_output() {
        let mut session = debugging();
        assert_eq!(session.data_direction(), Direction::Input);
        session.write_byte(0x3C).unwrap();
        assert_eq!(session.data_direction(), Direction::Output);
        assert_eq!(session.pins().direction(Pin::Data), Direction::Output);
        assert_eq!(session.pins().sampled_byte(0), Some(0x3C));
    }

    #[test]
    fn test_direction_changes_are_debounced() {
        let mut session = debugging();
        session.write_byte(0x01).unwrap();
        session.write_byte(0x02).unwrap();
        session.switch_to_write();

        let reconfigs = session
            .pins()
            .events
            .iter()
            .filter(|e| matches!(e, Event::Configure(Pin::Data, _)))
            .count();
        assert_eq!(reconfigs, 1);
    }

    #[test]
    fn test_write_byte_requires_debug_mode() {
        let mut session = Session::new(MockPins::new());
        session.pins_mut().reset_log();
        assert_eq!(session.write_byte(0xFF), Err(Error::NotDebugging));
        assert_eq!(session.pins().pin_activity(), 0);

        session.set_active(false).unwrap();
        session.pins_mut().reset_log();
        assert_eq!(session.write_byte(0xFF), Err(Error::NotActive));
        assert_eq!(session.last_error(), Some(Error::NotActive));
        assert_eq!(session.pins().pin_activity(), 0);
    }

    #[test]
    fn test_read_byte_only_needs_active() {
        let mut session = Session::new(MockPins::new());
        session.pins_mut().queue_bytes(&[0x5A]);
        assert_eq!(session.read_byte(), Ok(0x5A));

        session.set_active(false).unwrap();
        assert_eq!(session.read_byte(), Err(Error::NotActive));
    }

    #[test]
    fn test_switch_to_read_timeout() {
        let mut session = Session::new(MockPins::stuck_high());
        session.enter().unwrap();
        session.pins_mut().reset_log();

        assert_eq!(session.switch_to_read(3), Err(Error::NotWired));
        assert_eq!(session.last_error(), Some(Error::NotWired));
        assert!(!session.in_debug_mode());
        assert!(session.is_active());

        // Three polls, each followed by one 8-clock wait cycle
        let pins = session.pins();
        assert_eq!(pins.clock_rising_edges(), 3 * WAIT_CYCLE_CLOCKS);
        let polls = pins
            .events
            .iter()
            .filter(|e| **e == Event::Read(Pin::Data))
            .count();
        assert_eq!(polls, 3);
    }

    #[test]
    fn test_switch_to_read_ready_immediately() {
        let mut session = debugging();
        session.pins_mut().respond(&[]);
        session.write_byte(0x30).unwrap();
        session.pins_mut().reset_log();

        session.switch_to_read(250).unwrap();
        assert_eq!(
            session.pins().events,
            [
                Event::Write(Pin::Data, Level::Low),
                Event::Configure(Pin::Data, Direction::Input),
                Event::Write(Pin::Data, Level::Low),
                Event::Delay(DIR_CHANGE_SETTLE),
                Event::Read(Pin::Data),
            ]
        );
    }

    #[test]
    fn test_switch_to_read_settles_after_wait() {
        let mut session = debugging();
        session.pins_mut().queue_bytes(&[0x80]); // busy once, then ready
        session.switch_to_read(250).unwrap();

        let pins = session.pins();
        assert_eq!(pins.clock_rising_edges(), WAIT_CYCLE_CLOCKS);
        assert_eq!(pins.events.last(), Some(&Event::Delay(SAMPLE_SETTLE)));
        assert!(session.in_debug_mode());
    }

    #[test]
    fn test_switch_to_read_zero_budget_wraps() {
        let mut session = debugging();
        // Busy for two wait cycles, then ready
        session.pins_mut().queue_bytes(&[0xC0]);
        assert_eq!(session.switch_to_read(0), Ok(()));
        assert!(session.in_debug_mode());
        assert_eq!(session.pins().clock_rising_edges(), 2 * WAIT_CYCLE_CLOCKS);
    }

    #[test]
    fn test_switch_to_read_zero_budget_allows_256_cycles() {
        let mut session = Session::new(MockPins::stuck_high());
        session.enter().unwrap();
        session.pins_mut().reset_log();

        assert_eq!(session.switch_to_read(0), Err(Error::NotWired));
        assert_eq!(session.pins().clock_rising_edges(), 256 * WAIT_CYCLE_CLOCKS);
    }

    #[test]
    fn test_switch_to_write_is_ungated() {
        let mut session = Session::new(MockPins::new());
        session.set_active(false).unwrap();
        session.switch_to_write();
        assert_eq!(session.data_direction(), Direction::Output);
        assert_eq!(session.last_error(), None);
    }
}
