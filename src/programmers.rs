//! Programmer registration and dispatch
//!
//! This module provides a centralized registry for all programmers, with support
//! for feature-gated inclusion and dynamic help text generation.

use ccdebug_core::pins::DebugPins;
use thiserror::Error;

/// Information about a programmer
pub struct ProgrammerInfo {
    /// Primary name (used for matching)
    pub name: &'static str,
    /// Alternative names/aliases
    pub aliases: &'static [&'static str],
    /// Short description
    pub description: &'static str,
}

/// Errors from resolving a programmer string
#[derive(Debug, Error)]
pub enum ProgrammerError {
    /// Name matches no compiled-in programmer
    #[error("Unknown programmer: {name}\n\n{help}\nUse 'ccdebugger list-programmers' for more details")]
    Unknown { name: String, help: String },

    /// Options rejected by the programmer
    #[error("Invalid {programmer} parameters: {message}")]
    InvalidOptions {
        programmer: &'static str,
        message: String,
    },
}

/// Get information about all available programmers (enabled at compile time)
#[allow(unused_mut, clippy::vec_init_then_push)]
pub fn available_programmers() -> Vec<ProgrammerInfo> {
    let mut programmers = Vec::new();

    #[cfg(feature = "dummy")]
    programmers.push(ProgrammerInfo {
        name: "dummy",
        aliases: &[],
        description: "Emulated CC2530 target for testing (chip_id=,pc=,busy=,wired=)",
    });

    #[cfg(feature = "linux-gpio")]
    programmers.push(ProgrammerInfo {
        name: "linux_gpio",
        aliases: &["linux-gpio"],
        description: "Linux GPIO bitbang (dev=/dev/gpiochipN,rst=N,dc=N,dd=N,unit_ns=N)",
    });

    programmers
}

/// Generate help text listing all available programmers
pub fn programmer_help() -> String {
    let programmers = available_programmers();

    if programmers.is_empty() {
        return "No programmers available (recompile with programmer features enabled)".to_string();
    }

    let mut help = String::from("Available programmers:\n");

    for p in &programmers {
        help.push_str(&format!("  {:12} - {}\n", p.name, p.description));
    }

    help
}

/// Generate a short list of programmer names for CLI help
pub fn programmer_names_short() -> String {
    let programmers = available_programmers();
    let names: Vec<&str> = programmers.iter().map(|p| p.name).collect();
    names.join(", ")
}

/// Resolve a name or alias to the canonical programmer name
pub fn find_programmer(name: &str) -> Option<&'static str> {
    available_programmers()
        .into_iter()
        .find(|p| p.name == name || p.aliases.contains(&name))
        .map(|p| p.name)
}

/// Open the pins behind a programmer string
///
/// The programmer string can be just the name (e.g., "dummy") or include
/// parameters (e.g., "linux_gpio:gpiochip=0,rst=24,dc=23,dd=22").
#[allow(unused_variables)]
pub fn open_programmer(programmer: &str) -> Result<Box<dyn DebugPins>, Box<dyn std::error::Error>> {
    let (name, options) = parse_programmer_string(programmer);

    let canonical_name = match find_programmer(name) {
        Some(n) => n,
        None => return Err(unknown_programmer_error(name).into()),
    };

    match canonical_name {
        #[cfg(feature = "dummy")]
        "dummy" => {
            let config = ccdebug_dummy::parse_options(&options).map_err(|message| {
                ProgrammerError::InvalidOptions {
                    programmer: "dummy",
                    message,
                }
            })?;
            log::info!("Using emulated target (chip id 0x{:04X})", config.chip_id);
            Ok(Box::new(ccdebug_dummy::DummyTarget::new(config)))
        }

        #[cfg(feature = "linux-gpio")]
        "linux_gpio" => {
            log::info!("Opening Linux GPIO programmer...");

            let pins = ccdebug_linux_gpio::open_linux_gpio(&options).map_err(|e| {
                format!(
                    "Failed to open linux_gpio: {}\n\
                     Make sure the device exists and you have read/write permissions.",
                    e
                )
            })?;
            Ok(pins)
        }

        _ => Err(unknown_programmer_error(name).into()),
    }
}

/// Parse a programmer string into name and options
///
/// Format: "name" or "name:option1=value1,option2=value2"
pub fn parse_programmer_string(s: &str) -> (&str, Vec<(&str, &str)>) {
    if let Some((name, opts)) = s.split_once(':') {
        let options: Vec<_> = opts
            .split(',')
            .filter_map(|opt| opt.split_once('='))
            .collect();
        (name, options)
    } else {
        (s, Vec::new())
    }
}

fn unknown_programmer_error(name: &str) -> ProgrammerError {
    ProgrammerError::Unknown {
        name: name.to_string(),
        help: programmer_help(),
    }
}
