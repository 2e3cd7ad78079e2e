//! cli::args
//!
//! Global command-line options, defined with clap derive.
//!
//! Subcommands are not declared here: the parser builder attaches one per
//! registered command descriptor at startup.
//!
//! # Global Flags
//!
//! - `-c` / `--config <path>`: Alternate config file (default `clrtools.toml`)
//! - `-n` / `--name <section>`: Config section to use (default `data-warehouse`)
//! - `--raiseerr`: Propagate command failures with full detail
//! - `--debug`: Enable debug logging

use clap::{Args, Parser};
use std::path::PathBuf;

/// Config file read when `-c/--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "clrtools.toml";

/// Config section used when `-n/--name` is not given.
pub const DEFAULT_SECTION: &str = "data-warehouse";

/// clrtools - Command line tool for the CLR data warehouse
#[derive(Parser, Debug)]
#[command(name = "clrtools")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Options accepted before the subcommand.
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct GlobalArgs {
    /// Alternate config file
    #[arg(short = 'c', long = "config", value_name = "PATH", default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Name of section in config file to use for the config
    #[arg(short = 'n', long = "name", value_name = "SECTION", default_value = DEFAULT_SECTION)]
    pub name: String,

    /// Raise a full error instead of a short message when a command fails
    #[arg(long)]
    pub raiseerr: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Default for GlobalArgs {
    fn default() -> Self {
        GlobalArgs {
            config: PathBuf::from(DEFAULT_CONFIG_FILE),
            name: DEFAULT_SECTION.to_string(),
            raiseerr: false,
            debug: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_apply() {
        let cli = Cli::try_parse_from(["clrtools"]).unwrap();
        assert_eq!(cli.global, GlobalArgs::default());
    }

    #[test]
    fn short_and_long_forms() {
        let cli =
            Cli::try_parse_from(["clrtools", "-c", "other.toml", "--name", "staging"]).unwrap();
        assert_eq!(cli.global.config, PathBuf::from("other.toml"));
        assert_eq!(cli.global.name, "staging");

        let cli = Cli::try_parse_from(["clrtools", "--raiseerr", "--debug"]).unwrap();
        assert!(cli.global.raiseerr);
        assert!(cli.global.debug);
    }
}
