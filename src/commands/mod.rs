//! CLI command implementations
//!
//! Each command gets a session that is already in debug mode and works on
//! any [`DebugPins`] backend, so the same code runs against real GPIOs and
//! the emulated target.

pub mod control;
pub mod erase;
pub mod exec;
pub mod info;
mod list;
pub mod xdata;

pub use list::list_programmers;

use ccdebug_core::pins::DebugPins;
use ccdebug_core::Session;

/// Session over whatever programmer was picked on the command line
pub type DebugSession = Session<Box<dyn DebugPins>>;

/// What happens to the target after a successful command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Teardown {
    /// Resume the CPU and release every line
    Release,
    /// Leave the target in the state the command put it in
    KeepDebugging,
}

/// Run a command and tear the session down
///
/// A failing command always releases the pins, whatever `teardown` says.
pub fn run_command<P, F>(
    mut session: Session<P>,
    teardown: Teardown,
    command: F,
) -> (P, Result<(), Box<dyn std::error::Error>>)
where
    P: DebugPins,
    F: FnOnce(&mut Session<P>) -> Result<(), Box<dyn std::error::Error>>,
{
    let result = command(&mut session);
    let pins = match (&result, teardown) {
        (Ok(()), Teardown::KeepDebugging) => session.into_pins(),
        // release() logs a failed exit itself
        _ => session.release(),
    };
    (pins, result)
}

#[cfg(all(test, feature = "dummy"))]
pub(crate) fn test_session() -> Session<ccdebug_dummy::DummyTarget> {
    let mut session = Session::new(ccdebug_dummy::DummyTarget::new_default());
    session.enter().unwrap();
    session
}

#[cfg(all(test, feature = "dummy"))]
mod tests {
    use super::*;
    use ccdebug_core::pins::{Direction, Pin};

    #[test]
    fn test_failed_command_releases_pins() {
        let mut session = test_session();
        session.pins_mut().set_wired(false);
        let (pins, result) = run_command(session, Teardown::KeepDebugging, info::run_info);
        assert!(result.is_err());
        for pin in Pin::ALL {
            assert_eq!(pins.direction(pin), Direction::Input);
        }
    }

    #[test]
    fn test_release_resumes_target() {
        let session = test_session();
        let (pins, result) = run_command(session, Teardown::Release, info::run_status);
        assert!(result.is_ok());
        assert!(!pins.is_halted());
        assert_eq!(pins.direction(Pin::Clock), Direction::Input);
    }

    #[test]
    fn test_keep_debugging_leaves_target_halted() {
        let session = test_session();
        let (pins, result) = run_command(session, Teardown::KeepDebugging, control::run_halt);
        assert!(result.is_ok());
        assert!(pins.is_halted());
        assert_eq!(pins.direction(Pin::Clock), Direction::Output);
    }
}
