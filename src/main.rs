//! ccdebugger - Command line front end for the CC Debug interface
//!
//! Talks to TI CC111x/CC243x/CC253x/CC254x parts over their two-wire debug
//! port. The pin backend is picked with `-p`:
//!
//! - **dummy** - emulated target, no hardware needed
//! - **linux_gpio** - RST/DC/DD on a Linux GPIO chip
//!
//! Every command enters debug mode (which resets and halts the target),
//! does its work and, except for `halt`, `step` and `resume`, resumes the CPU
//! on the way out. A failing command always releases the pins.

mod cli;
mod commands;
mod programmers;

use clap::Parser;
use cli::{Cli, Commands, ConnectArgs};
use commands::{DebugSession, Teardown};

use ccdebug_core::{table_file, Session, SessionConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    // Set log level based on verbosity
    match cli.verbose {
        0 => {} // default (info)
        1 => log::set_max_level(log::LevelFilter::Debug),
        _ => log::set_max_level(log::LevelFilter::Trace),
    }

    match cli.command {
        Commands::Info { connect } => run(&connect, Teardown::Release, commands::info::run_info),
        Commands::Status { connect } => {
            run(&connect, Teardown::Release, commands::info::run_status)
        }
        Commands::Halt { connect } => {
            run(&connect, Teardown::KeepDebugging, commands::control::run_halt)
        }
        Commands::Resume { connect } => {
            run(&connect, Teardown::KeepDebugging, commands::control::run_resume)
        }
        Commands::Step { connect } => {
            run(&connect, Teardown::KeepDebugging, commands::control::run_step)
        }
        Commands::Erase { connect, yes } => {
            if !yes {
                return Err("Chip erase wipes the whole flash and the lock bits.\n\
                            Re-run with --yes to confirm."
                    .into());
            }
            run(&connect, Teardown::Release, commands::erase::run_erase)
        }
        Commands::Exec { connect, bytes } => run(&connect, Teardown::Release, |session| {
            commands::exec::run_exec(session, &bytes)
        }),
        Commands::ReadXdata { connect, addr, len } => {
            run(&connect, Teardown::Release, |session| {
                commands::xdata::run_read_xdata(session, addr, len)
            })
        }
        Commands::SetConfig { connect, value } => {
            run(&connect, Teardown::Release, |session| {
                commands::control::run_set_config(session, value)
            })
        }
        Commands::ListProgrammers => {
            commands::list_programmers();
            Ok(())
        }
    }
}

/// Open a session, run one command on it and tear it down
fn run<F>(
    connect: &ConnectArgs,
    teardown: Teardown,
    command: F,
) -> Result<(), Box<dyn std::error::Error>>
where
    F: FnOnce(&mut DebugSession) -> Result<(), Box<dyn std::error::Error>>,
{
    let session = open_session(connect)?;
    let (_pins, result) = commands::run_command(session, teardown, command);
    result
}

/// Open the programmer, build the session and enter debug mode
fn open_session(args: &ConnectArgs) -> Result<DebugSession, Box<dyn std::error::Error>> {
    let pins = programmers::open_programmer(&args.programmer)?;

    let mut config = SessionConfig::default().with_ready_wait_cycles(args.ready_wait);
    if let Some(path) = &args.table {
        config = config.with_table(table_file::load(path)?);
    }

    let mut session = Session::with_config(pins, config);
    if let Err(e) = session.enter() {
        drop(session.release());
        return Err(e.into());
    }
    log::debug!("Target in debug mode");
    Ok(session)
}
