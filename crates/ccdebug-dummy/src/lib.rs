//! ccdebug-dummy - Emulated CC Debug target
//!
//! This crate provides a [`DebugPins`] implementation that behaves like a
//! target chip on the other end of the wires. It decodes the waveform the
//! session produces (entry sequence, bytes clocked in on DC rising edges),
//! runs the command, and drives DD with the busy/ready signal and response
//! bits. It's useful for testing and development without real hardware.
//!
//! The CPU model is a tiny subset of 8051: just enough for the XDATA and PC
//! helpers (`MOV A,#`, `MOV DPTR,#`, `MOVX`, `INC DPTR`, `LJMP`, ...).

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

use alloc::format;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use ccdebug_core::instruction::{Instruction, InstructionTable};
use ccdebug_core::pins::{DebugPins, Direction, Level, Pin};
use ccdebug_core::status::DebugStatus;
use ccdebug_core::xdata::opcodes;

/// Configuration for the emulated target
#[derive(Debug, Clone)]
pub struct DummyConfig {
    /// Value returned by GET_CHIP_ID
    pub chip_id: u16,
    /// Program counter after reset
    pub pc: u16,
    /// Ready-wait cycles the target stays busy after each command
    pub busy_cycles: u8,
    /// Number of status reads that still report CHIP_ERASE_BUSY after an erase
    pub erase_busy_reads: u8,
    /// False emulates an unconnected target (DD stuck high)
    pub wired: bool,
    /// Opcodes the target understands
    pub table: InstructionTable,
    /// XDATA size in bytes
    pub xdata_size: usize,
}

impl Default for DummyConfig {
    fn default() -> Self {
        Self {
            chip_id: 0xA524, // CC2530 rev 0x24
            pc: 0x0000,
            busy_cycles: 0,
            erase_busy_reads: 2,
            wired: true,
            table: InstructionTable::CC254X,
            xdata_size: 0x10000,
        }
    }
}

/// Parse dummy programmer options
///
/// Accepted keys: `chip_id`, `pc`, `busy`, `erase_busy`, `wired`.
/// Numbers may be decimal or `0x`-prefixed hex.
pub fn parse_options(options: &[(&str, &str)]) -> Result<DummyConfig, String> {
    let mut config = DummyConfig::default();

    for (key, value) in options {
        match *key {
            "chip_id" => {
                config.chip_id = parse_number(value)
                    .and_then(|v| u16::try_from(v).ok())
                    .ok_or_else(|| format!("Invalid chip_id value: {}", value))?;
            }
            "pc" => {
                config.pc = parse_number(value)
                    .and_then(|v| u16::try_from(v).ok())
                    .ok_or_else(|| format!("Invalid pc value: {}", value))?;
            }
            "busy" => {
                config.busy_cycles = parse_number(value)
                    .and_then(|v| u8::try_from(v).ok())
                    .ok_or_else(|| format!("Invalid busy value: {}", value))?;
            }
            "erase_busy" => {
                config.erase_busy_reads = parse_number(value)
                    .and_then(|v| u8::try_from(v).ok())
                    .ok_or_else(|| format!("Invalid erase_busy value: {}", value))?;
            }
            "wired" => {
                config.wired = match *value {
                    "1" | "yes" | "true" => true,
                    "0" | "no" | "false" => false,
                    _ => return Err(format!("Invalid wired value: {}", value)),
                };
            }
            _ => {
                log::warn!("dummy: Unknown option: {}={}", key, value);
            }
        }
    }

    Ok(config)
}

fn parse_number(value: &str) -> Option<u32> {
    match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16).ok(),
        None => value.parse().ok(),
    }
}

/// What DD carries while the debugger has it as an input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// No command pending
    Idle,
    /// Command running, DD high until the given number of wait cycles passed
    Busy(u8),
    /// Response ready, DD low until the first clock
    Ready,
    /// Shifting out response bits
    Sending,
}

/// Emulated target chip
pub struct DummyTarget {
    config: DummyConfig,

    // Lines as driven by the debugger
    directions: [Direction; 3],
    levels: [Level; 3],

    // Link state
    debug_mode: bool,
    entry_pulses: u8,
    shift: u8,
    bit_count: u8,
    command: Vec<u8>,
    phase: Phase,
    wait_clocks: usize,
    response: [u8; 2],
    response_len: usize,
    response_bit: usize,
    out_level: Level,

    // CPU state
    accumulator: u8,
    dptr: u16,
    pc: u16,
    halted: bool,
    debug_config: u8,
    erase_busy: u8,
    erase_count: usize,
    xdata: Vec<u8>,

    // Statistics
    pin_writes: usize,
    delay_units: u64,
    opcode_log: Vec<u8>,
}

impl DummyTarget {
    /// Create a new target with the given configuration
    pub fn new(config: DummyConfig) -> Self {
        let xdata = vec![0u8; config.xdata_size.max(1)];
        let pc = config.pc;
        Self {
            config,
            directions: [Direction::Input; 3],
            levels: [Level::Low; 3],
            debug_mode: false,
            entry_pulses: 0,
            shift: 0,
            bit_count: 0,
            command: Vec::new(),
            phase: Phase::Idle,
            wait_clocks: 0,
            response: [0; 2],
            response_len: 0,
            response_bit: 0,
            out_level: Level::Low,
            accumulator: 0,
            dptr: 0,
            pc,
            halted: false,
            debug_config: 0,
            erase_busy: 0,
            erase_count: 0,
            xdata,
            pin_writes: 0,
            delay_units: 0,
            opcode_log: Vec::new(),
        }
    }

    /// Create a new target with default configuration (CC2530)
    pub fn new_default() -> Self {
        Self::new(DummyConfig::default())
    }

    /// Get the configuration
    pub fn config(&self) -> &DummyConfig {
        &self.config
    }

    /// Whether the target saw a valid debug entry sequence
    pub fn in_debug_mode(&self) -> bool {
        self.debug_mode
    }

    /// Direction the debugger last set on a line
    pub fn direction(&self, pin: Pin) -> Direction {
        self.directions[pin.index()]
    }

    /// Whether the CPU is halted
    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// Current debug configuration byte
    pub fn debug_config(&self) -> u8 {
        self.debug_config
    }

    /// Current program counter
    pub fn pc(&self) -> u16 {
        self.pc
    }

    /// Current accumulator
    pub fn accumulator(&self) -> u8 {
        self.accumulator
    }

    /// Number of chip erases executed
    pub fn erase_count(&self) -> usize {
        self.erase_count
    }

    /// XDATA contents
    pub fn xdata(&self) -> &[u8] {
        &self.xdata
    }

    /// Mutable XDATA contents
    pub fn xdata_mut(&mut self) -> &mut [u8] {
        &mut self.xdata
    }

    /// Number of `write_pin` calls seen
    pub fn pin_writes(&self) -> usize {
        self.pin_writes
    }

    /// Total calibration units spent in `delay`
    pub fn delay_units(&self) -> u64 {
        self.delay_units
    }

    /// Opcodes of every command received, in order
    pub fn opcode_log(&self) -> &[u8] {
        &self.opcode_log
    }

    /// Emulate plugging or unplugging the target
    pub fn set_wired(&mut self, wired: bool) {
        self.config.wired = wired;
    }

    fn status(&self) -> DebugStatus {
        let mut status = DebugStatus::OSCILLATOR_STABLE;
        if self.halted {
            status |= DebugStatus::CPU_HALTED | DebugStatus::HALT_STATUS;
        }
        if self.erase_busy > 0 {
            status |= DebugStatus::CHIP_ERASE_BUSY;
        }
        status
    }

    fn reset_link(&mut self) {
        self.shift = 0;
        self.bit_count = 0;
        self.command.clear();
        self.phase = Phase::Idle;
        self.wait_clocks = 0;
        self.response_bit = 0;
        self.out_level = Level::Low;
    }

    fn on_reset_edge(&mut self, level: Level) {
        match level {
            Level::Low => {
                self.entry_pulses = 0;
                self.debug_mode = false;
            }
            Level::High => {
                self.reset_link();
                self.pc = self.config.pc;
                if self.entry_pulses == 2 {
                    log::debug!("dummy: entered debug mode");
                    self.debug_mode = true;
                    self.halted = true;
                } else {
                    self.halted = false;
                }
                self.entry_pulses = 0;
            }
        }
    }

    fn on_clock_rising(&mut self) {
        if self.levels[Pin::Reset.index()] == Level::Low {
            self.entry_pulses = self.entry_pulses.saturating_add(1);
            return;
        }
        if !self.debug_mode {
            return;
        }

        if self.directions[Pin::Data.index()] == Direction::Output {
            self.shift = (self.shift << 1) | self.levels[Pin::Data.index()].is_high() as u8;
            self.bit_count += 1;
            if self.bit_count == 8 {
                let byte = self.shift;
                self.shift = 0;
                self.bit_count = 0;
                self.byte_received(byte);
            }
            return;
        }

        match self.phase {
            Phase::Busy(remaining) => {
                self.wait_clocks += 1;
                if self.wait_clocks == 8 {
                    self.wait_clocks = 0;
                    self.phase = if remaining <= 1 {
                        Phase::Ready
                    } else {
                        Phase::Busy(remaining - 1)
                    };
                }
            }
            Phase::Ready | Phase::Sending => {
                self.phase = Phase::Sending;
                if self.response_bit < self.response_len * 8 {
                    let byte = self.response[self.response_bit / 8];
                    let bit = 7 - (self.response_bit % 8) as u32;
                    self.out_level = Level::from_bit(byte, bit);
                    self.response_bit += 1;
                } else {
                    self.out_level = Level::Low;
                }
            }
            Phase::Idle => {}
        }
    }

    fn byte_received(&mut self, byte: u8) {
        self.command.push(byte);

        let opcode = self.command[0];
        let instruction = match self.config.table.instruction_for(opcode) {
            Some(instruction) => instruction,
            None => {
                log::warn!("dummy: unknown opcode 0x{:02X}", opcode);
                self.opcode_log.push(opcode);
                self.command.clear();
                let status = self.status().bits();
                self.respond(&[status]);
                return;
            }
        };

        if self.command.len() < 1 + instruction.operand_len() {
            return;
        }

        self.opcode_log.push(opcode);
        let command = core::mem::take(&mut self.command);
        self.execute(instruction, &command[1..]);
    }

    fn respond(&mut self, bytes: &[u8]) {
        self.response[..bytes.len()].copy_from_slice(bytes);
        self.response_len = bytes.len();
        self.response_bit = 0;
        self.wait_clocks = 0;
        self.out_level = Level::Low;
        self.phase = match self.config.busy_cycles {
            0 => Phase::Ready,
            n => Phase::Busy(n),
        };
    }

    fn execute(&mut self, instruction: Instruction, operands: &[u8]) {
        log::trace!("dummy: {} {:02X?}", instruction.name(), operands);
        match instruction {
            Instruction::Halt => {
                self.halted = true;
                let status = self.status().bits();
                self.respond(&[status]);
            }
            Instruction::Resume => {
                self.halted = false;
                let status = self.status().bits();
                self.respond(&[status]);
            }
            Instruction::ReadConfig => {
                let config = self.debug_config;
                self.respond(&[config]);
            }
            Instruction::WriteConfig => {
                self.debug_config = operands[0];
                self.respond(&[operands[0]]);
            }
            Instruction::DebugInstr1 | Instruction::DebugInstr2 | Instruction::DebugInstr3 => {
                self.execute_cpu(operands);
                let acc = self.accumulator;
                self.respond(&[acc]);
            }
            Instruction::GetChipId => {
                let id = self.config.chip_id.to_be_bytes();
                self.respond(&id);
            }
            Instruction::GetPc => {
                let pc = self.pc.to_be_bytes();
                self.respond(&pc);
            }
            Instruction::ReadStatus => {
                let status = self.status().bits();
                self.erase_busy = self.erase_busy.saturating_sub(1);
                self.respond(&[status]);
            }
            Instruction::StepInstr => {
                self.pc = self.pc.wrapping_add(1);
                let acc = self.accumulator;
                self.respond(&[acc]);
            }
            Instruction::ChipErase => {
                self.erase_count += 1;
                self.erase_busy = self.config.erase_busy_reads;
                self.debug_config = 0;
                let status = self.status().bits();
                self.respond(&[status]);
            }
        }
    }

    fn execute_cpu(&mut self, code: &[u8]) {
        let imm16 = || u16::from_be_bytes([code[1], code[2]]);
        match code[0] {
            opcodes::NOP => {}
            opcodes::LJMP if code.len() == 3 => self.pc = imm16(),
            opcodes::MOV_A_IMM if code.len() >= 2 => self.accumulator = code[1],
            opcodes::MOV_DPTR_IMM if code.len() == 3 => self.dptr = imm16(),
            opcodes::INC_DPTR => self.dptr = self.dptr.wrapping_add(1),
            opcodes::MOVX_A_DPTR => {
                let addr = self.xdata_index();
                self.accumulator = self.xdata[addr];
            }
            opcodes::MOVX_DPTR_A => {
                let addr = self.xdata_index();
                self.xdata[addr] = self.accumulator;
            }
            0xE4 => self.accumulator = 0, // CLR A
            0x04 => self.accumulator = self.accumulator.wrapping_add(1), // INC A
            other => log::debug!("dummy: ignoring CPU opcode 0x{:02X}", other),
        }
    }

    fn xdata_index(&self) -> usize {
        self.dptr as usize % self.xdata.len()
    }
}

impl DebugPins for DummyTarget {
    fn configure_pin(&mut self, pin: Pin, direction: Direction) {
        self.directions[pin.index()] = direction;
        if pin == Pin::Data && direction == Direction::Output {
            // Debugger took DD back; whatever was pending is dropped
            self.shift = 0;
            self.bit_count = 0;
            if self.phase == Phase::Sending {
                self.phase = Phase::Idle;
            }
        }
    }

    fn write_pin(&mut self, pin: Pin, level: Level) {
        self.pin_writes += 1;
        let previous = self.levels[pin.index()];
        self.levels[pin.index()] = level;

        if self.directions[pin.index()] != Direction::Output || previous == level {
            return;
        }

        match pin {
            Pin::Reset => self.on_reset_edge(level),
            Pin::Clock if level == Level::High => self.on_clock_rising(),
            _ => {}
        }
    }

    fn read_pin(&mut self, pin: Pin) -> Level {
        if pin != Pin::Data {
            return self.levels[pin.index()];
        }
        if !self.config.wired {
            return Level::High;
        }
        if self.directions[pin.index()] == Direction::Output {
            return self.levels[pin.index()];
        }
        match self.phase {
            Phase::Busy(_) => Level::High,
            Phase::Ready | Phase::Idle => Level::Low,
            Phase::Sending => self.out_level,
        }
    }

    fn delay(&mut self, units: u32) {
        self.delay_units += units as u64;
    }
}
