//! cli
//!
//! Command-line interface layer for clrtools.
//!
//! # Responsibilities
//!
//! - Build the parser from the registered command descriptors
//! - Parse arguments and global options
//! - Load the run configuration and dispatch to the selected command
//!
//! # Architecture
//!
//! The subcommand surface is generated, not hand-written: every descriptor in
//! [`commands::registry`] becomes one subcommand via the [`crate::engine`].

pub mod args;
pub mod builder;
pub mod commands;
pub mod dispatch;

pub use args::{Cli, GlobalArgs, DEFAULT_CONFIG_FILE, DEFAULT_SECTION};
pub use builder::{CommandLine, ParsedInvocation};
pub use dispatch::{DispatchError, DispatchOptions, Dispatcher, ExitStatus};

use crate::core::config::Config;
use anyhow::Result;
use std::ffi::OsString;
use std::io::IsTerminal;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<ExitStatus> {
    let cli = CommandLine::new(commands::registry())?;
    cli.main(std::env::args_os())
}

impl CommandLine {
    /// Parse `argv`, load the configuration and run the selected command.
    ///
    /// Usage problems are returned as `clap::Error`; a reported domain error
    /// yields [`ExitStatus::Failure`]; any other failure is returned.
    pub fn main<I, T>(&self, argv: I) -> Result<ExitStatus>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let parsed = self.try_parse_from(argv)?;
        init_logging(parsed.global.debug);

        if parsed.selected.is_none() {
            return Err(self.usage_error().into());
        }

        let config = Config::load(&parsed.global.config, &parsed.global.name)?;
        let dispatcher = Dispatcher::new(DispatchOptions {
            raise_errors: parsed.global.raiseerr,
        });

        match dispatcher.dispatch(&parsed, Arc::new(config)) {
            Ok(status) => Ok(status),
            Err(DispatchError::Command(err)) => Err(err.into()),
            Err(DispatchError::Unclassified(err)) => Err(err),
            Err(err @ DispatchError::NoSubcommand) => Err(err.into()),
        }
    }
}

/// Install the stderr log subscriber.
///
/// `--debug` forces the `debug` level; otherwise `RUST_LOG` applies, with
/// `warn` as the fallback. Later calls are no-ops.
pub fn init_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .try_init();
}
