//! XDATA access and PC control through injected 8051 instructions
//!
//! These helpers only compose `exec*` calls; they do not know anything
//! about flash controllers.

use crate::error::Result;
use crate::pins::DebugPins;
use crate::session::Session;

/// 8051 opcodes used by the helpers
pub mod opcodes {
    /// NOP
    pub const NOP: u8 = 0x00;
    /// LJMP addr16
    pub const LJMP: u8 = 0x02;
    /// MOV A,#data
    pub const MOV_A_IMM: u8 = 0x74;
    /// MOV DPTR,#data16
    pub const MOV_DPTR_IMM: u8 = 0x90;
    /// INC DPTR
    pub const INC_DPTR: u8 = 0xA3;
    /// MOVX A,@DPTR
    pub const MOVX_A_DPTR: u8 = 0xE0;
    /// MOVX @DPTR,A
    pub const MOVX_DPTR_A: u8 = 0xF0;
}

impl<P: DebugPins> Session<P> {
    /// Read `buf.len()` bytes of XDATA starting at `addr`
    ///
    /// DPTR and A are clobbered. Addresses wrap at 0xFFFF like DPTR does.
    pub fn read_xdata(&mut self, addr: u16, buf: &mut [u8]) -> Result<()> {
        self.exec_immediate(opcodes::MOV_DPTR_IMM, addr)?;
        for byte in buf.iter_mut() {
            *byte = self.exec(opcodes::MOVX_A_DPTR)?;
            self.exec(opcodes::INC_DPTR)?;
        }
        Ok(())
    }

    /// Write `data` to XDATA starting at `addr`
    ///
    /// DPTR and A are clobbered.
    pub fn write_xdata(&mut self, addr: u16, data: &[u8]) -> Result<()> {
        self.exec_immediate(opcodes::MOV_DPTR_IMM, addr)?;
        for &byte in data {
            self.exec2(opcodes::MOV_A_IMM, byte)?;
            self.exec(opcodes::MOVX_DPTR_A)?;
            self.exec(opcodes::INC_DPTR)?;
        }
        Ok(())
    }

    /// Move the program counter with an injected LJMP
    pub fn set_pc(&mut self, addr: u16) -> Result<()> {
        self.exec_immediate(opcodes::LJMP, addr).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::mock::MockPins;

    #[test]
    fn test_read_xdata_sequence() {
        let mut session = Session::new(MockPins::new());
        session.enter().unwrap();
        session.pins_mut().reset_log();

        // MOV DPTR, then MOVX/INC per byte
        for acc in [0x00, 0xDE, 0x00, 0xAD, 0x00] {
            session.pins_mut().respond(&[acc]);
        }

        let mut buf = [0u8; 2];
        session.read_xdata(0x6270, &mut buf).unwrap();
        assert_eq!(buf, [0xDE, 0xAD]);
        assert_eq!(
            session.pins().sampled_bytes(),
            [
                0x53, 0x90, 0x62, 0x70, //
                0x51, 0xE0, 0x51, 0xA3, //
                0x51, 0xE0, 0x51, 0xA3,
            ]
        );
    }

    #[test]
    fn test_write_xdata_sequence() {
        let mut session = Session::new(MockPins::new());
        session.enter().unwrap();
        session.pins_mut().reset_log();
        for _ in 0..4 {
            session.pins_mut().respond(&[0x00]);
        }

        session.write_xdata(0x0100, &[0x42]).unwrap();
        assert_eq!(
            session.pins().sampled_bytes(),
            [0x53, 0x90, 0x01, 0x00, 0x52, 0x74, 0x42, 0x51, 0xF0, 0x51, 0xA3]
        );
    }

    #[test]
    fn test_set_pc() {
        let mut session = Session::new(MockPins::new());
        session.enter().unwrap();
        session.pins_mut().reset_log();
        session.pins_mut().respond(&[0x00]);

        session.set_pc(0x1234).unwrap();
        assert_eq!(session.pins().sampled_bytes(), [0x53, 0x02, 0x12, 0x34]);
    }

    #[test]
    fn test_xdata_aborts_on_lost_link() {
        let mut session = Session::new(MockPins::stuck_high());
        session.enter().unwrap();
        let mut buf = [0u8; 4];
        assert_eq!(session.read_xdata(0, &mut buf), Err(Error::NotWired));
        assert!(!session.in_debug_mode());
    }
}
