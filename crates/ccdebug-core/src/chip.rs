//! Chip identification
//!
//! GET_CHIP_ID returns the chip number in the high byte and the silicon
//! revision in the low byte.

use core::fmt;

/// Known parts speaking the CC Debug protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChipFamily {
    /// CC1110
    Cc1110,
    /// CC2510
    Cc2510,
    /// CC2511
    Cc2511,
    /// CC2530
    Cc2530,
    /// CC2531
    Cc2531,
    /// CC2533
    Cc2533,
    /// CC2540
    Cc2540,
    /// CC2541
    Cc2541,
    /// CC2543
    Cc2543,
    /// CC2544
    Cc2544,
    /// CC2545
    Cc2545,
}

impl ChipFamily {
    /// Match a chip number (high byte of the chip ID)
    pub const fn from_chip_number(number: u8) -> Option<Self> {
        Some(match number {
            0x01 => Self::Cc1110,
            0x81 => Self::Cc2510,
            0x91 => Self::Cc2511,
            0xA5 => Self::Cc2530,
            0xB5 => Self::Cc2531,
            0x95 => Self::Cc2533,
            0x8D => Self::Cc2540,
            0x41 => Self::Cc2541,
            0x43 => Self::Cc2543,
            0x44 => Self::Cc2544,
            0x45 => Self::Cc2545,
            _ => return None,
        })
    }

    /// Part name
    pub const fn name(self) -> &'static str {
        match self {
            Self::Cc1110 => "CC1110",
            Self::Cc2510 => "CC2510",
            Self::Cc2511 => "CC2511",
            Self::Cc2530 => "CC2530",
            Self::Cc2531 => "CC2531",
            Self::Cc2533 => "CC2533",
            Self::Cc2540 => "CC2540",
            Self::Cc2541 => "CC2541",
            Self::Cc2543 => "CC2543",
            Self::Cc2544 => "CC2544",
            Self::Cc2545 => "CC2545",
        }
    }
}

impl fmt::Display for ChipFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Chip ID word as returned by [`Session::chip_id`](crate::Session::chip_id)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChipId(pub u16);

impl ChipId {
    /// Chip number
    pub const fn number(self) -> u8 {
        (self.0 >> 8) as u8
    }

    /// Silicon revision
    pub const fn revision(self) -> u8 {
        self.0 as u8
    }

    /// Known part, if any
    pub const fn family(self) -> Option<ChipFamily> {
        ChipFamily::from_chip_number(self.number())
    }
}

impl From<u16> for ChipId {
    fn from(raw: u16) -> Self {
        Self(raw)
    }
}

impl fmt::Display for ChipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.family() {
            Some(family) => write!(f, "{} rev 0x{:02X}", family, self.revision()),
            None => write!(
                f,
                "unknown chip 0x{:02X} rev 0x{:02X}",
                self.number(),
                self.revision()
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::string::ToString;

    #[test]
    fn test_decode_known_chip() {
        let id = ChipId(0xA524);
        assert_eq!(id.number(), 0xA5);
        assert_eq!(id.revision(), 0x24);
        assert_eq!(id.family(), Some(ChipFamily::Cc2530));
        assert_eq!(id.to_string(), "CC2530 rev 0x24");
    }

    #[test]
    fn test_decode_unknown_chip() {
        let id = ChipId::from(0x1203);
        assert_eq!(id.family(), None);
        assert_eq!(id.to_string(), "unknown chip 0x12 rev 0x03");
    }
}
