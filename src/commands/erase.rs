//! Erase command implementation

use indicatif::{ProgressBar, ProgressStyle};
use std::time::{Duration, Instant};

use ccdebug_core::pins::DebugPins;
use ccdebug_core::Session;

/// Give up on an erase that is still busy after this long
const ERASE_TIMEOUT: Duration = Duration::from_secs(10);

/// Interval between status polls
const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Run a full chip erase and wait for it to finish
pub fn run_erase<P: DebugPins>(session: &mut Session<P>) -> Result<(), Box<dyn std::error::Error>> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message("Erasing chip (this may take a while)...");
    pb.enable_steady_tick(Duration::from_millis(100));

    session.chip_erase()?;
    let polls = wait_for_erase(session, ERASE_TIMEOUT, POLL_INTERVAL)?;
    log::debug!("Erase finished after {} status polls", polls);

    pb.finish_with_message("Chip erase complete");
    Ok(())
}

/// Poll the debug status until CHIP_ERASE_BUSY clears
///
/// Returns the number of status reads it took.
pub fn wait_for_erase<P: DebugPins>(
    session: &mut Session<P>,
    timeout: Duration,
    interval: Duration,
) -> Result<usize, Box<dyn std::error::Error>> {
    let start = Instant::now();
    let mut polls = 0;

    loop {
        let status = session.debug_status()?;
        polls += 1;
        if !status.is_erase_busy() {
            return Ok(polls);
        }
        if start.elapsed() > timeout {
            return Err(format!("Chip erase still busy after {:?}", timeout).into());
        }
        std::thread::sleep(interval);
    }
}
