//! CLI argument parsing

use crate::programmers;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Parse a string as a hex or decimal u32
fn parse_hex_u32(s: &str) -> Result<u32, String> {
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16).map_err(|e| format!("Invalid hex value: {}", e))
    } else {
        s.parse::<u32>().map_err(|e| format!("Invalid number: {}", e))
    }
}

/// Parse a string as a hex or decimal u16
fn parse_hex_u16(s: &str) -> Result<u16, String> {
    let value = parse_hex_u32(s)?;
    u16::try_from(value).map_err(|_| format!("Value out of range for 16 bits: {}", s))
}

/// Parse a byte; bare digits are read as hex, like opcode listings
fn parse_byte(s: &str) -> Result<u8, String> {
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    u8::from_str_radix(digits, 16).map_err(|e| format!("Invalid byte '{}': {}", s, e))
}

/// Generate dynamic help text for the programmer argument
fn programmer_help() -> String {
    format!(
        "Programmer to use [available: {}]",
        programmers::programmer_names_short()
    )
}

#[derive(Parser)]
#[command(name = "ccdebugger")]
#[command(author, version, about = "CC Debug interface tool for TI CC111x/CC25xx chips", long_about = None)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Connection options shared across commands
#[derive(clap::Args, Debug, Clone)]
pub struct ConnectArgs {
    /// Programmer to use
    #[arg(short, long, help = programmer_help())]
    pub programmer: String,

    /// Instruction table file (TOML format) replacing the CC254x defaults
    #[arg(long)]
    pub table: Option<PathBuf>,

    /// Wait cycles (8 clocks each) allowed for the target to become ready
    #[arg(long, default_value_t = 250)]
    pub ready_wait: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show chip id, program counter, status and configuration
    Info {
        #[command(flatten)]
        connect: ConnectArgs,
    },

    /// Read and decode the debug status
    Status {
        #[command(flatten)]
        connect: ConnectArgs,
    },

    /// Halt the CPU and leave it in debug mode
    Halt {
        #[command(flatten)]
        connect: ConnectArgs,
    },

    /// Resume CPU execution and leave debug mode
    Resume {
        #[command(flatten)]
        connect: ConnectArgs,
    },

    /// Execute a single CPU instruction
    Step {
        #[command(flatten)]
        connect: ConnectArgs,
    },

    /// Erase the whole flash, including the lock bits
    Erase {
        #[command(flatten)]
        connect: ConnectArgs,

        /// Confirm the erase
        #[arg(long)]
        yes: bool,
    },

    /// Execute one CPU instruction given as 1-3 hex bytes
    Exec {
        #[command(flatten)]
        connect: ConnectArgs,

        /// Instruction bytes (hex, e.g. 74 5A)
        #[arg(required = true, num_args = 1..=3, value_parser = parse_byte)]
        bytes: Vec<u8>,
    },

    /// Dump XDATA memory
    ReadXdata {
        #[command(flatten)]
        connect: ConnectArgs,

        /// Start address (hex, e.g., 0xF000)
        #[arg(long, value_parser = parse_hex_u16)]
        addr: u16,

        /// Number of bytes to read (hex or decimal)
        #[arg(long, default_value = "16", value_parser = parse_hex_u32)]
        len: u32,
    },

    /// Write the debug configuration byte
    SetConfig {
        #[command(flatten)]
        connect: ConnectArgs,

        /// Configuration byte (hex)
        #[arg(value_parser = parse_byte)]
        value: u8,
    },

    /// List supported programmers
    ListProgrammers,
}
