//! Command dispatch
//!
//! Every command has the same shape: opcode and operands out, wait for the
//! target to turn ready, response bytes in, DD back to output.
//! A ready-wait timeout surfaces as [`Error::NotWired`] and leaves debug mode;
//! callers must `enter()` again before retrying.
//!
//! [`Error::NotWired`]: crate::Error::NotWired

use crate::error::Result;
use crate::instruction::Instruction;
use crate::pins::DebugPins;
use crate::session::Session;
use crate::status::{DebugConfig, DebugStatus};

impl<P: DebugPins> Session<P> {
    /// Run one command and fill `response`
    fn command(
        &mut self,
        instruction: Instruction,
        operands: &[u8],
        response: &mut [u8],
    ) -> Result<()> {
        self.check_debugging()?;
        debug_assert_eq!(operands.len(), instruction.operand_len());
        debug_assert_eq!(response.len(), instruction.response_len());

        let opcode = self.table.opcode(instruction);
        log::trace!(
            "ccdebug: {} ({:02X}) {:02X?}",
            instruction.name(),
            opcode,
            operands
        );

        self.write_byte(opcode)?;
        for &operand in operands {
            self.write_byte(operand)?;
        }

        self.switch_to_read(self.ready_wait_cycles)?;
        for byte in response.iter_mut() {
            *byte = self.read_byte()?;
        }
        self.switch_to_write();

        Ok(())
    }

    pub(crate) fn command_u8(&mut self, instruction: Instruction, operands: &[u8]) -> Result<u8> {
        let mut response = [0u8; 1];
        self.command(instruction, operands, &mut response)?;
        Ok(response[0])
    }

    fn command_u16(&mut self, instruction: Instruction) -> Result<u16> {
        let mut response = [0u8; 2];
        self.command(instruction, &[], &mut response)?;
        Ok(u16::from_be_bytes(response))
    }

    /// Execute a one-byte CPU instruction, returns the accumulator
    pub fn exec(&mut self, oc0: u8) -> Result<u8> {
        self.command_u8(Instruction::DebugInstr1, &[oc0])
    }

    /// Execute a two-byte CPU instruction, returns the accumulator
    pub fn exec2(&mut self, oc0: u8, oc1: u8) -> Result<u8> {
        self.command_u8(Instruction::DebugInstr2, &[oc0, oc1])
    }

    /// Execute a three-byte CPU instruction, returns the accumulator
    pub fn exec3(&mut self, oc0: u8, oc1: u8, oc2: u8) -> Result<u8> {
        self.command_u8(Instruction::DebugInstr3, &[oc0, oc1, oc2])
    }

    /// Execute an instruction taking a 16-bit immediate, returns the
    /// accumulator
    ///
    /// Sent as a three-byte instruction with the immediate high byte first.
    pub fn exec_immediate(&mut self, oc0: u8, imm: u16) -> Result<u8> {
        let [high, low] = imm.to_be_bytes();
        self.command_u8(Instruction::DebugInstr3, &[oc0, high, low])
    }

    /// Read the chip ID word (chip number high, revision low)
    pub fn chip_id(&mut self) -> Result<u16> {
        self.command_u16(Instruction::GetChipId)
    }

    /// Read the program counter
    pub fn pc(&mut self) -> Result<u16> {
        self.command_u16(Instruction::GetPc)
    }

    /// Read the raw debug status byte
    pub fn status(&mut self) -> Result<u8> {
        self.command_u8(Instruction::ReadStatus, &[])
    }

    /// Resume CPU execution, returns the debug status
    pub fn resume(&mut self) -> Result<u8> {
        self.command_u8(Instruction::Resume, &[])
    }

    /// Halt the CPU, returns the debug status
    pub fn halt(&mut self) -> Result<u8> {
        self.command_u8(Instruction::Halt, &[])
    }

    /// Execute one CPU instruction, returns the accumulator
    pub fn step(&mut self) -> Result<u8> {
        self.command_u8(Instruction::StepInstr, &[])
    }

    /// Read the raw debug configuration byte
    pub fn config(&mut self) -> Result<u8> {
        self.command_u8(Instruction::ReadConfig, &[])
    }

    /// Write the debug configuration byte, returns the value the target
    /// applied
    pub fn set_config(&mut self, value: u8) -> Result<u8> {
        self.command_u8(Instruction::WriteConfig, &[value])
    }

    /// Start a full chip erase, returns the debug status
    ///
    /// This wipes the flash and the lock bits without asking. The erase runs
    /// on after this returns; poll [`Session::debug_status`] until
    /// [`DebugStatus::CHIP_ERASE_BUSY`] clears.
    pub fn chip_erase(&mut self) -> Result<u8> {
        log::debug!("ccdebug: chip erase requested");
        self.command_u8(Instruction::ChipErase, &[])
    }

    /// Read and decode the debug status
    pub fn debug_status(&mut self) -> Result<DebugStatus> {
        self.status().map(DebugStatus::from_bits_retain)
    }

    /// Read and decode the debug configuration
    pub fn debug_config(&mut self) -> Result<DebugConfig> {
        self.config().map(DebugConfig::from_bits_retain)
    }

    /// Write the debug configuration, returns what the target applied
    pub fn set_debug_config(&mut self, config: DebugConfig) -> Result<DebugConfig> {
        self.set_config(config.bits())
            .map(DebugConfig::from_bits_retain)
    }
}
