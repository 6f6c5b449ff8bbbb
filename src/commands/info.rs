//! Info and status commands

use ccdebug_core::chip::ChipId;
use ccdebug_core::pins::DebugPins;
use ccdebug_core::{DebugConfig, DebugStatus, Session};

/// Status bits with their display names, most significant first
const STATUS_BITS: [(DebugStatus, &str); 8] = [
    (DebugStatus::CHIP_ERASE_BUSY, "chip erase busy"),
    (DebugStatus::PCON_IDLE, "PCON idle"),
    (DebugStatus::CPU_HALTED, "CPU halted"),
    (DebugStatus::PM_ACTIVE, "power mode active"),
    (DebugStatus::HALT_STATUS, "halted by debugger"),
    (DebugStatus::DEBUG_LOCKED, "debug locked"),
    (DebugStatus::OSCILLATOR_STABLE, "oscillator stable"),
    (DebugStatus::STACK_OVERFLOW, "stack overflow"),
];

const CONFIG_BITS: [(DebugConfig, &str); 5] = [
    (DebugConfig::SOFT_POWER_MODE, "soft power mode"),
    (DebugConfig::TIMERS_OFF, "timers off"),
    (DebugConfig::DMA_PAUSE, "DMA paused"),
    (DebugConfig::TIMER_SUSPEND, "timers suspended"),
    (DebugConfig::SEL_FLASH_INFO_PAGE, "flash info page selected"),
];

/// Show chip identification and debug state
pub fn run_info<P: DebugPins>(session: &mut Session<P>) -> Result<(), Box<dyn std::error::Error>> {
    let id = ChipId::from(session.chip_id()?);
    let pc = session.pc()?;
    let status = session.debug_status()?;
    let config = session.debug_config()?;

    println!("Chip:          {}", id);
    println!("Chip ID:       0x{:04X}", id.0);
    println!("PC:            0x{:04X}", pc);
    println!(
        "Instructions:  table v{}",
        session.instruction_table_version()
    );
    print_status(status);
    print_config(config);

    if status.is_locked() {
        println!();
        println!("The debug interface is locked; only chip erase will work.");
    }

    Ok(())
}

/// Read and decode the debug status
pub fn run_status<P: DebugPins>(
    session: &mut Session<P>,
) -> Result<(), Box<dyn std::error::Error>> {
    let status = session.debug_status()?;
    print_status(status);
    Ok(())
}

/// Print a decoded status byte
pub fn print_status(status: DebugStatus) {
    println!(
        "Status:        0x{:02X} ({})",
        status.bits(),
        describe(status, &STATUS_BITS)
    );
}

/// Print a decoded configuration byte
pub fn print_config(config: DebugConfig) {
    println!(
        "Config:        0x{:02X} ({})",
        config.bits(),
        describe(config, &CONFIG_BITS)
    );
}

fn describe<F: bitflags::Flags + Copy>(value: F, names: &[(F, &str)]) -> String {
    let set: Vec<&str> = names
        .iter()
        .filter(|(flag, _)| value.contains(*flag))
        .map(|(_, name)| *name)
        .collect();
    if set.is_empty() {
        "none".to_string()
    } else {
        set.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe() {
        let status = DebugStatus::CPU_HALTED | DebugStatus::OSCILLATOR_STABLE;
        assert_eq!(
            describe(status, &STATUS_BITS),
            "CPU halted, oscillator stable"
        );
        assert_eq!(describe(DebugConfig::empty(), &CONFIG_BITS), "none");
    }

    #[cfg(feature = "dummy")]
    #[test]
    fn test_info_on_dummy() {
        let mut session = crate::commands::test_session();
        run_info(&mut session).unwrap();
        run_status(&mut session).unwrap();
        assert!(session.in_debug_mode());
    }
}
