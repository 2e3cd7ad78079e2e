//! clrtools - Command line tool for the CLR data warehouse
//!
//! The subcommands of clrtools are generated from a registry of typed command
//! descriptors instead of being wired into the argument parser by hand.
//!
//! # Architecture
//!
//! - [`cli`] - Argument surface, parser builder, dispatcher and the commands
//! - [`engine`] - Descriptor model, signature reconciliation, command trait
//! - [`core`] - Naming rule and run configuration
//! - [`ui`] - User-facing output
//!
//! # Correctness Invariants
//!
//! 1. Subcommand names are a pure function of the command type identifier
//! 2. Every parameter of a command is covered by a declared spec
//! 3. A broken command set stops the program before any argument is parsed
//! 4. Only domain errors are softened into a message; everything else propagates

pub mod cli;
pub mod core;
pub mod engine;
pub mod ui;
