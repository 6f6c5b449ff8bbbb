//! Debug status and configuration bytes

use bitflags::bitflags;

bitflags! {
    /// Debug status byte returned by READ_STATUS (and by HALT, RESUME,
    /// CHIP_ERASE)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct DebugStatus: u8 {
        /// A chip erase is still running
        const CHIP_ERASE_BUSY   = 1 << 7;
        /// PCON.IDLE is set
        const PCON_IDLE         = 1 << 6;
        /// The CPU is halted
        const CPU_HALTED        = 1 << 5;
        /// Power mode 1-3 was selected
        const PM_ACTIVE         = 1 << 4;
        /// Halted by a HALT command or breakpoint, not by a step
        const HALT_STATUS       = 1 << 3;
        /// The debug lock bit is set; only CHIP_ERASE is accepted
        const DEBUG_LOCKED      = 1 << 2;
        /// Oscillators are stable
        const OSCILLATOR_STABLE = 1 << 1;
        /// Stack overflowed
        const STACK_OVERFLOW    = 1 << 0;
    }
}

bitflags! {
    /// Debug configuration byte used by RD_CONFIG / WR_CONFIG
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct DebugConfig: u8 {
        /// Keep the digital regulator on in power modes (CC254x)
        const SOFT_POWER_MODE     = 1 << 5;
        /// Stop timers while halted
        const TIMERS_OFF          = 1 << 3;
        /// Pause DMA while halted
        const DMA_PAUSE           = 1 << 2;
        /// Suspend timers while halted
        const TIMER_SUSPEND       = 1 << 1;
        /// Map the flash information page instead of the first page
        const SEL_FLASH_INFO_PAGE = 1 << 0;
    }
}

impl DebugStatus {
    /// CPU is halted
    pub fn is_halted(self) -> bool {
        self.contains(Self::CPU_HALTED)
    }

    /// Chip erase still running
    pub fn is_erase_busy(self) -> bool {
        self.contains(Self::CHIP_ERASE_BUSY)
    }

    /// Debug interface is locked
    pub fn is_locked(self) -> bool {
        self.contains(Self::DEBUG_LOCKED)
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        DebugConfig::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_helpers() {
        let status = DebugStatus::from_bits_retain(0xB2);
        assert!(status.is_halted());
        assert!(status.is_erase_busy());
        assert!(!status.is_locked());
        assert!(status.contains(DebugStatus::PM_ACTIVE));
    }

    #[test]
    fn test_unknown_config_bits_retained() {
        let config = DebugConfig::from_bits_retain(0x4A);
        assert_eq!(config.bits(), 0x4A);
        assert!(config.contains(DebugConfig::TIMERS_OFF | DebugConfig::TIMER_SUSPEND));
    }
}
