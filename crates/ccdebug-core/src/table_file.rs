//! Instruction table files
//!
//! Tables for other chip families can be kept in TOML files:
//!
//! ```toml
//! version = 2
//! halt = 0x44
//! resume = 0x4C
//! rd_config = 0x24
//! wr_config = 0x1D
//! debug_instr_1 = 0x55
//! debug_instr_2 = 0x56
//! debug_instr_3 = 0x57
//! get_chip_id = 0x68
//! get_pc = 0x28
//! read_status = 0x34
//! step_instr = 0x5C
//! chip_erase = 0x14
//!
//! # Optional reserved instructions
//! set_hw_brkpnt = "0x3B"
//! ```
//!
//! Values may be integers or strings holding hex (`"0x44"`) or decimal.

use std::fs;
use std::path::{Path, PathBuf};
use std::string::String;

use crate::instruction::{ExtendedInstruction, Instruction, InstructionTable};

/// Errors loading an instruction table file
#[derive(Debug, thiserror::Error)]
pub enum TableFileError {
    /// The file could not be read
    #[error("failed to read instruction table {}: {}", .path.display(), .source)]
    Io {
        /// File that failed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML or is missing keys
    #[error("invalid instruction table: {0}")]
    Parse(#[from] toml::de::Error),
}

/// TOML instruction table structure
#[derive(Debug, serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlTable {
    #[serde(deserialize_with = "deserialize_byte")]
    version: u8,
    #[serde(deserialize_with = "deserialize_byte")]
    halt: u8,
    #[serde(deserialize_with = "deserialize_byte")]
    resume: u8,
    #[serde(deserialize_with = "deserialize_byte")]
    rd_config: u8,
    #[serde(deserialize_with = "deserialize_byte")]
    wr_config: u8,
    #[serde(deserialize_with = "deserialize_byte")]
    debug_instr_1: u8,
    #[serde(deserialize_with = "deserialize_byte")]
    debug_instr_2: u8,
    #[serde(deserialize_with = "deserialize_byte")]
    debug_instr_3: u8,
    #[serde(deserialize_with = "deserialize_byte")]
    get_chip_id: u8,
    #[serde(deserialize_with = "deserialize_byte")]
    get_pc: u8,
    #[serde(deserialize_with = "deserialize_byte")]
    read_status: u8,
    #[serde(deserialize_with = "deserialize_byte")]
    step_instr: u8,
    #[serde(deserialize_with = "deserialize_byte")]
    chip_erase: u8,
    #[serde(default, deserialize_with = "deserialize_opt_byte")]
    set_hw_brkpnt: Option<u8>,
    #[serde(default, deserialize_with = "deserialize_opt_byte")]
    get_bm: Option<u8>,
    #[serde(default, deserialize_with = "deserialize_opt_byte")]
    burst_write: Option<u8>,
}

impl From<TomlTable> for InstructionTable {
    fn from(t: TomlTable) -> Self {
        InstructionTable::new(
            t.version,
            [
                t.halt,
                t.resume,
                t.rd_config,
                t.wr_config,
                t.debug_instr_1,
                t.debug_instr_2,
                t.debug_instr_3,
                t.get_chip_id,
                t.get_pc,
                t.read_status,
                t.step_instr,
                t.chip_erase,
            ],
        )
        .with_extended(ExtendedInstruction::SetHwBreakpoint, t.set_hw_brkpnt)
        .with_extended(ExtendedInstruction::GetBankMode, t.get_bm)
        .with_extended(ExtendedInstruction::BurstWrite, t.burst_write)
    }
}

#[derive(serde::Deserialize)]
#[serde(untagged)]
enum ByteOrStr {
    Int(u8),
    Str(String),
}

/// Deserialize a u8 that can be hex (0x...) or decimal
fn deserialize_byte<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::Deserialize;

    match ByteOrStr::deserialize(deserializer)? {
        ByteOrStr::Int(n) => Ok(n),
        ByteOrStr::Str(s) => parse_byte(&s).map_err(serde::de::Error::custom),
    }
}

fn deserialize_opt_byte<'de, D>(deserializer: D) -> Result<Option<u8>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    deserialize_byte(deserializer).map(Some)
}

/// Parse a byte that can be hex (0x...) or decimal
pub fn parse_byte(s: &str) -> Result<u8, String> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u8::from_str_radix(hex, 16).map_err(|e| std::format!("invalid hex byte '{}': {}", s, e))
    } else {
        s.parse()
            .map_err(|e| std::format!("invalid byte '{}': {}", s, e))
    }
}

/// Parse an instruction table from TOML text
pub fn parse(content: &str) -> Result<InstructionTable, TableFileError> {
    let table: TomlTable = toml::from_str(content)?;
    Ok(table.into())
}

/// Load an instruction table from a TOML file
pub fn load(path: &Path) -> Result<InstructionTable, TableFileError> {
    let content = fs::read_to_string(path).map_err(|source| TableFileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let table = parse(&content)?;
    log::debug!(
        "Loaded instruction table v{} from {}",
        table.version(),
        path.display()
    );
    Ok(table)
}

/// Render a table in the file format accepted by [`parse`]
pub fn to_toml(table: &InstructionTable) -> String {
    use core::fmt::Write;

    let mut out = String::new();
    let _ = writeln!(out, "version = {}", table.version());
    for instruction in Instruction::ALL {
        let _ = writeln!(
            out,
            "{} = 0x{:02X}",
            instruction.name().to_ascii_lowercase(),
            table.opcode(instruction)
        );
    }
    for instruction in ExtendedInstruction::ALL {
        if let Some(opcode) = table.extended(instruction) {
            let _ = writeln!(
                out,
                "{} = 0x{:02X}",
                instruction.name().to_ascii_lowercase(),
                opcode
            );
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::format;

    const CC2530_LIKE: &str = r#"
version = 2
halt = 0x44
resume = "0x4C"
rd_config = 0x24
wr_config = 0x1D
debug_instr_1 = 0x55
debug_instr_2 = 0x56
debug_instr_3 = 0x57
get_chip_id = 0x68
get_pc = 0x28
read_status = 0x34
step_instr = 0x5C
chip_erase = "20"
set_hw_brkpnt = "0x3B"
"#;

    #[test]
    fn test_parse_table() {
        let table = parse(CC2530_LIKE).unwrap();
        assert_eq!(table.version(), 2);
        assert_eq!(table.opcode(Instruction::Halt), 0x44);
        assert_eq!(table.opcode(Instruction::Resume), 0x4C);
        assert_eq!(table.opcode(Instruction::ChipErase), 20);
        assert_eq!(
            table.extended(ExtendedInstruction::SetHwBreakpoint),
            Some(0x3B)
        );
        assert_eq!(table.extended(ExtendedInstruction::BurstWrite), None);
    }

    #[test]
    fn test_missing_key_rejected() {
        let content = CC2530_LIKE.replace("get_pc = 0x28\n", "");
        assert!(matches!(parse(&content), Err(TableFileError::Parse(_))));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let content = std::format!("{}\nbogus = 1\n", CC2530_LIKE);
        assert!(parse(&content).is_err());
    }

    #[test]
    fn test_default_table_renders_to_parseable_toml() {
        let rendered = to_toml(&InstructionTable::CC254X);
        assert!(rendered.contains("get_chip_id = 0x68"));
        assert_eq!(parse(&rendered).unwrap(), InstructionTable::CC254X);
    }

    #[test]
    fn test_parse_byte() {
        assert_eq!(parse_byte("0x1f"), Ok(0x1F));
        assert_eq!(parse_byte(" 200 "), Ok(200));
        assert!(parse_byte("0x100").is_err());
        assert!(parse_byte("abc").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let path =
            std::env::temp_dir().join(format!("ccdebug-table-{}.toml", std::process::id()));
        fs::write(&path, CC2530_LIKE).unwrap();
        let table = load(&path);
        fs::remove_file(&path).unwrap();
        assert_eq!(table.unwrap().version(), 2);

        assert!(matches!(load(&path), Err(TableFileError::Io { .. })));
    }
}
