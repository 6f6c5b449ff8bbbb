//! CPU control commands

use ccdebug_core::pins::DebugPins;
use ccdebug_core::{DebugConfig, DebugStatus, Session};

use super::info::{print_config, print_status};

/// Halt the CPU
pub fn run_halt<P: DebugPins>(session: &mut Session<P>) -> Result<(), Box<dyn std::error::Error>> {
    let status = DebugStatus::from_bits_retain(session.halt()?);
    print_status(status);
    Ok(())
}

/// Resume the CPU
pub fn run_resume<P: DebugPins>(
    session: &mut Session<P>,
) -> Result<(), Box<dyn std::error::Error>> {
    let status = DebugStatus::from_bits_retain(session.resume()?);
    print_status(status);
    Ok(())
}

/// Execute one instruction and show where the CPU ended up
pub fn run_step<P: DebugPins>(session: &mut Session<P>) -> Result<(), Box<dyn std::error::Error>> {
    let acc = session.step()?;
    let pc = session.pc()?;
    println!("A:             0x{:02X}", acc);
    println!("PC:            0x{:04X}", pc);
    Ok(())
}

/// Write the debug configuration byte
pub fn run_set_config<P: DebugPins>(
    session: &mut Session<P>,
    value: u8,
) -> Result<(), Box<dyn std::error::Error>> {
    let applied = session.set_debug_config(DebugConfig::from_bits_retain(value))?;
    print_config(applied);
    if applied.bits() != value {
        log::warn!(
            "Target applied 0x{:02X} instead of 0x{:02X}",
            applied.bits(),
            value
        );
    }
    Ok(())
}

#[cfg(all(test, feature = "dummy"))]
mod tests {
    use super::*;
    use crate::commands::test_session;

    #[test]
    fn test_resume_then_halt() {
        let mut session = test_session();
        run_resume(&mut session).unwrap();
        assert!(!session.pins().is_halted());
        run_halt(&mut session).unwrap();
        assert!(session.pins().is_halted());
    }

    #[test]
    fn test_step_advances_pc() {
        let mut session = test_session();
        run_step(&mut session).unwrap();
        assert_eq!(session.pins().pc(), 1);
    }

    #[test]
    fn test_set_config() {
        let mut session = test_session();
        run_set_config(&mut session, 0x22).unwrap();
        assert_eq!(session.pins().debug_config(), 0x22);
    }
}
