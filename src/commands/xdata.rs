//! XDATA dump command

use ccdebug_core::pins::DebugPins;
use ccdebug_core::Session;

/// Bytes per hexdump line
const LINE_LEN: usize = 16;

/// Read and hexdump `len` bytes of XDATA starting at `addr`
pub fn run_read_xdata<P: DebugPins>(
    session: &mut Session<P>,
    addr: u16,
    len: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    if addr as u64 + len as u64 > 0x1_0000 {
        return Err(format!(
            "Range 0x{:04X}+0x{:X} runs past the end of XDATA",
            addr, len
        )
        .into());
    }

    let mut buf = vec![0u8; len as usize];
    session.read_xdata(addr, &mut buf)?;

    for line in hexdump(addr, &buf) {
        println!("{}", line);
    }
    Ok(())
}

fn hexdump(addr: u16, data: &[u8]) -> Vec<String> {
    data.chunks(LINE_LEN)
        .enumerate()
        .map(|(i, chunk)| {
            let hex: Vec<String> = chunk.iter().map(|b| format!("{:02X}", b)).collect();
            let ascii: String = chunk
                .iter()
                .map(|&b| {
                    if b.is_ascii_graphic() || b == b' ' {
                        b as char
                    } else {
                        '.'
                    }
                })
                .collect();
            format!(
                "{:04X}: {:<width$}  {}",
                addr as usize + i * LINE_LEN,
                hex.join(" "),
                ascii,
                width = LINE_LEN * 3 - 1
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hexdump() {
        let lines = hexdump(0xF000, b"hello world, hi!ok");
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("F000: 68 65 6C 6C 6F"));
        assert!(lines[0].ends_with("hello world, hi!"));
        assert!(lines[1].starts_with("F010: 6F 6B"));
    }

    #[cfg(feature = "dummy")]
    #[test]
    fn test_read_xdata_range_check() {
        let mut session = crate::commands::test_session();
        assert!(run_read_xdata(&mut session, 0xFFF0, 0x20).is_err());
        run_read_xdata(&mut session, 0xFFF0, 0x10).unwrap();
    }
}
