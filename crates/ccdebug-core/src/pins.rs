//! Pin capability for the two-wire debug link
//!
//! A [`Session`](crate::Session) never touches hardware directly. It drives
//! the three debug lines through a [`DebugPins`] implementation, which makes
//! it possible to run the same protocol engine over Linux GPIO, a
//! microcontroller's port registers, or an in-memory emulated target.

/// The three lines of the debug connector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pin {
    /// RESET_N, active low
    Reset,
    /// Debug clock (DC), always driven by the debugger
    Clock,
    /// Debug data (DD), bidirectional
    Data,
}

impl Pin {
    /// All pins, in the order backends configure them
    pub const ALL: [Pin; 3] = [Pin::Clock, Pin::Data, Pin::Reset];

    /// Index for backends that keep per-pin state in an array
    pub const fn index(self) -> usize {
        match self {
            Self::Reset => 0,
            Self::Clock => 1,
            Self::Data => 2,
        }
    }

    /// Short connector name
    pub const fn name(self) -> &'static str {
        match self {
            Self::Reset => "RST",
            Self::Clock => "DC",
            Self::Data => "DD",
        }
    }
}

/// Pin direction as seen from the debugger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    /// High impedance, the debugger samples the line
    #[default]
    Input,
    /// The debugger drives the line
    Output,
}

/// Logic level of a line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Level {
    /// Logic 0
    #[default]
    Low,
    /// Logic 1
    High,
}

impl Level {
    /// True for [`Level::High`]
    #[inline]
    pub const fn is_high(self) -> bool {
        matches!(self, Self::High)
    }

    /// Level carrying bit `bit` of `byte`
    #[inline]
    pub const fn from_bit(byte: u8, bit: u32) -> Self {
        if (byte >> bit) & 1 != 0 {
            Self::High
        } else {
            Self::Low
        }
    }
}

impl From<bool> for Level {
    fn from(high: bool) -> Self {
        if high {
            Self::High
        } else {
            Self::Low
        }
    }
}

impl From<Level> for bool {
    fn from(level: Level) -> Self {
        level.is_high()
    }
}

/// Raw GPIO operations needed by the debug protocol
///
/// Implementations contain no protocol logic. Hardware faults are reported
/// through the `log` facade rather than returned, matching how a bitbang
/// master treats its lines: a failing GPIO shows up as a protocol timeout
/// one layer up.
pub trait DebugPins {
    /// Set the direction of a line
    fn configure_pin(&mut self, pin: Pin, direction: Direction);

    /// Drive a line to the given level
    fn write_pin(&mut self, pin: Pin, level: Level);

    /// Sample a line
    fn read_pin(&mut self, pin: Pin) -> Level;

    /// Wait for `units` calibration-delay units
    ///
    /// One unit is the shortest pulse width the target reliably observes.
    /// All protocol timing is expressed as multiples of it (see
    /// [`timing`](crate::timing)), so backends only need to calibrate this
    /// single quantum.
    fn delay(&mut self, units: u32);
}

impl<P: DebugPins + ?Sized> DebugPins for &mut P {
    fn configure_pin(&mut self, pin: Pin, direction: Direction) {
        (**self).configure_pin(pin, direction)
    }

    fn write_pin(&mut self, pin: Pin, level: Level) {
        (**self).write_pin(pin, level)
    }

    fn read_pin(&mut self, pin: Pin) -> Level {
        (**self).read_pin(pin)
    }

    fn delay(&mut self, units: u32) {
        (**self).delay(units)
    }
}

#[cfg(feature = "std")]
impl<P: DebugPins + ?Sized> DebugPins for std::boxed::Box<P> {
    fn configure_pin(&mut self, pin: Pin, direction: Direction) {
        (**self).configure_pin(pin, direction)
    }

    fn write_pin(&mut self, pin: Pin, level: Level) {
        (**self).write_pin(pin, level)
    }

    fn read_pin(&mut self, pin: Pin) -> Level {
        (**self).read_pin(pin)
    }

    fn delay(&mut self, units: u32) {
        (**self).delay(units)
    }
}
