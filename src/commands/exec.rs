//! Exec command implementation

use ccdebug_core::pins::DebugPins;
use ccdebug_core::Session;

/// Execute one injected instruction and print the accumulator
pub fn run_exec<P: DebugPins>(
    session: &mut Session<P>,
    bytes: &[u8],
) -> Result<(), Box<dyn std::error::Error>> {
    let acc = exec_bytes(session, bytes)?;
    println!("A: 0x{:02X}", acc);
    Ok(())
}

/// Dispatch 1-3 instruction bytes to the matching DEBUG_INSTR variant
pub fn exec_bytes<P: DebugPins>(
    session: &mut Session<P>,
    bytes: &[u8],
) -> Result<u8, Box<dyn std::error::Error>> {
    let acc = match *bytes {
        [oc0] => session.exec(oc0)?,
        [oc0, oc1] => session.exec2(oc0, oc1)?,
        [oc0, oc1, oc2] => session.exec3(oc0, oc1, oc2)?,
        _ => {
            return Err(format!(
                "An instruction is 1 to 3 bytes long, got {}",
                bytes.len()
            )
            .into())
        }
    };
    Ok(acc)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(feature = "dummy")]
    #[test]
    fn test_exec_bytes() {
        let mut session = crate::commands::test_session();
        assert_eq!(exec_bytes(&mut session, &[0x74, 0x42]).unwrap(), 0x42);
        assert_eq!(exec_bytes(&mut session, &[0x00]).unwrap(), 0x42);
        exec_bytes(&mut session, &[0x02, 0x12, 0x34]).unwrap();
        assert_eq!(session.pins().pc(), 0x1234);
    }

    #[cfg(feature = "dummy")]
    #[test]
    fn test_exec_bytes_length() {
        let mut session = crate::commands::test_session();
        assert!(exec_bytes(&mut session, &[]).is_err());
        assert!(exec_bytes(&mut session, &[0; 4]).is_err());
        assert!(session.pins().opcode_log().is_empty());
    }
}
