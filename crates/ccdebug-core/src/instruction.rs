//! Debug instruction table
//!
//! Every CC Debug command starts with an opcode byte. The opcodes are not
//! identical across chip families, so the session looks them up in a
//! replaceable table instead of hard-coding them. The raw form is 16 bytes:
//!
//! | Slot   | Meaning                                   |
//! |--------|-------------------------------------------|
//! | 0      | table version                             |
//! | 1..=12 | dispatched instructions ([`Instruction`]) |
//! | 13..=15| reserved ([`ExtendedInstruction`])        |
//!
//! The default is the CC254x set (version 1).

/// Size of the raw table
pub const TABLE_LEN: usize = 16;

/// Slot holding the table version
pub const VERSION_SLOT: usize = 0;

/// Instructions the session knows how to dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Instruction {
    /// Halt the CPU
    Halt = 1,
    /// Resume execution
    Resume = 2,
    /// Read the debug configuration byte
    ReadConfig = 3,
    /// Write the debug configuration byte
    WriteConfig = 4,
    /// Execute a one-byte CPU instruction
    DebugInstr1 = 5,
    /// Execute a two-byte CPU instruction
    DebugInstr2 = 6,
    /// Execute a three-byte CPU instruction
    DebugInstr3 = 7,
    /// Read chip ID and revision
    GetChipId = 8,
    /// Read the program counter
    GetPc = 9,
    /// Read the debug status byte
    ReadStatus = 10,
    /// Execute a single CPU instruction
    StepInstr = 11,
    /// Erase the whole flash, including lock bits
    ChipErase = 12,
}

impl Instruction {
    /// All dispatched instructions in slot order
    pub const ALL: [Instruction; 12] = [
        Self::Halt,
        Self::Resume,
        Self::ReadConfig,
        Self::WriteConfig,
        Self::DebugInstr1,
        Self::DebugInstr2,
        Self::DebugInstr3,
        Self::GetChipId,
        Self::GetPc,
        Self::ReadStatus,
        Self::StepInstr,
        Self::ChipErase,
    ];

    /// Slot in the raw table
    pub const fn slot(self) -> usize {
        self as usize
    }

    /// Number of bytes that follow the opcode
    pub const fn operand_len(self) -> usize {
        match self {
            Self::WriteConfig | Self::DebugInstr1 => 1,
            Self::DebugInstr2 => 2,
            Self::DebugInstr3 => 3,
            _ => 0,
        }
    }

    /// Number of bytes the target answers with
    pub const fn response_len(self) -> usize {
        match self {
            Self::GetChipId | Self::GetPc => 2,
            _ => 1,
        }
    }

    /// Name as used in TI's debug interface documentation
    pub const fn name(self) -> &'static str {
        match self {
            Self::Halt => "HALT",
            Self::Resume => "RESUME",
            Self::ReadConfig => "RD_CONFIG",
            Self::WriteConfig => "WR_CONFIG",
            Self::DebugInstr1 => "DEBUG_INSTR_1",
            Self::DebugInstr2 => "DEBUG_INSTR_2",
            Self::DebugInstr3 => "DEBUG_INSTR_3",
            Self::GetChipId => "GET_CHIP_ID",
            Self::GetPc => "GET_PC",
            Self::ReadStatus => "READ_STATUS",
            Self::StepInstr => "STEP_INSTR",
            Self::ChipErase => "CHIP_ERASE",
        }
    }
}

/// Reserved slots for instructions some families add
///
/// These are carried along with the table but nothing dispatches them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ExtendedInstruction {
    /// Set a hardware breakpoint
    SetHwBreakpoint = 13,
    /// Query the flash bank mode
    GetBankMode = 14,
    /// Burst write to the DBGDATA register
    BurstWrite = 15,
}

impl ExtendedInstruction {
    /// All extended instructions in slot order
    pub const ALL: [ExtendedInstruction; 3] =
        [Self::SetHwBreakpoint, Self::GetBankMode, Self::BurstWrite];

    /// Slot in the raw table
    pub const fn slot(self) -> usize {
        self as usize
    }

    /// Name as used in TI's debug interface documentation
    pub const fn name(self) -> &'static str {
        match self {
            Self::SetHwBreakpoint => "SET_HW_BRKPNT",
            Self::GetBankMode => "GET_BM",
            Self::BurstWrite => "BURST_WRITE",
        }
    }
}

/// Opcode map for one chip family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstructionTable {
    version: u8,
    opcodes: [u8; 12],
    extended: [Option<u8>; 3],
}

impl InstructionTable {
    /// CC254x instruction set
    pub const CC254X: Self = Self {
        version: 1,
        opcodes: [
            0x40, // HALT
            0x48, // RESUME
            0x20, // RD_CONFIG
            0x18, // WR_CONFIG
            0x51, // DEBUG_INSTR + 1b
            0x52, // DEBUG_INSTR + 2b
            0x53, // DEBUG_INSTR + 3b
            0x68, // GET_CHIP_ID
            0x28, // GET_PC
            0x30, // READ_STATUS
            0x58, // STEP_INSTR
            0x10, // CHIP_ERASE
        ],
        extended: [None; 3],
    };

    /// Build a table from a version and the 12 dispatched opcodes in slot order
    pub const fn new(version: u8, opcodes: [u8; 12]) -> Self {
        Self {
            version,
            opcodes,
            extended: [None; 3],
        }
    }

    /// Decode the raw 16-byte form
    ///
    /// A zero byte in an extended slot means the instruction is not
    /// available on this family.
    pub fn from_bytes(bytes: [u8; TABLE_LEN]) -> Self {
        let mut opcodes = [0u8; 12];
        opcodes.copy_from_slice(&bytes[1..13]);
        let extended = [bytes[13], bytes[14], bytes[15]].map(|b| (b != 0).then_some(b));
        Self {
            version: bytes[VERSION_SLOT],
            opcodes,
            extended,
        }
    }

    /// Encode into the raw 16-byte form
    pub fn to_bytes(&self) -> [u8; TABLE_LEN] {
        let mut bytes = [0u8; TABLE_LEN];
        bytes[VERSION_SLOT] = self.version;
        bytes[1..13].copy_from_slice(&self.opcodes);
        for (slot, opcode) in bytes[13..].iter_mut().zip(self.extended) {
            *slot = opcode.unwrap_or(0);
        }
        bytes
    }

    /// Table version
    pub const fn version(&self) -> u8 {
        self.version
    }

    /// Opcode for a dispatched instruction
    pub const fn opcode(&self, instruction: Instruction) -> u8 {
        self.opcodes[instruction.slot() - 1]
    }

    /// Opcode for a reserved instruction, if this family has one
    pub const fn extended(&self, instruction: ExtendedInstruction) -> Option<u8> {
        self.extended[instruction.slot() - 13]
    }

    /// Return a copy with one dispatched opcode replaced
    pub const fn with_opcode(mut self, instruction: Instruction, opcode: u8) -> Self {
        self.opcodes[instruction.slot() - 1] = opcode;
        self
    }

    /// Return a copy with one reserved opcode set or cleared
    pub const fn with_extended(
        mut self,
        instruction: ExtendedInstruction,
        opcode: Option<u8>,
    ) -> Self {
        self.extended[instruction.slot() - 13] = opcode;
        self
    }

    /// Return a copy with a different version
    pub const fn with_version(mut self, version: u8) -> Self {
        self.version = version;
        self
    }

    /// Look up which dispatched instruction an opcode belongs to
    pub fn instruction_for(&self, opcode: u8) -> Option<Instruction> {
        Instruction::ALL
            .into_iter()
            .find(|&i| self.opcode(i) == opcode)
    }
}

impl Default for InstructionTable {
    fn default() -> Self {
        Self::CC254X
    }
}
