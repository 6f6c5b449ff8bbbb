//! Protocol timing, in calibration-delay units
//!
//! Only the ratios matter. The absolute length of a unit is chosen by the
//! [`DebugPins`](crate::pins::DebugPins) backend.

/// Reset hold before and after the debug-request clock pattern
pub const ENTRY_RESET_HOLD: u32 = 200;

/// Debug-request pattern on DC while RST is low: high, low, high, low
pub const ENTRY_CLOCK_PATTERN: [u32; 4] = [3, 3, 3, 4];

/// Each half of a DC period while clocking bits
pub const BIT_HALF_PERIOD: u32 = 2;

/// Settle time after turning DD around before it is sampled
pub const DIR_CHANGE_SETTLE: u32 = 2;

/// Extra hold after the target signalled ready following a wait
pub const SAMPLE_SETTLE: u32 = 2;

/// Clock pulses per ready-wait cycle
pub const WAIT_CYCLE_CLOCKS: usize = 8;

/// Ready-wait budget used by every dispatched command
pub const DEFAULT_READY_WAIT_CYCLES: u8 = 250;
