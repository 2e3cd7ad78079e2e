//! engine
//!
//! The command-generation engine: turns typed command descriptors into a
//! consistent subcommand surface.
//!
//! # Architecture
//!
//! ```text
//! descriptor -> derive name -> reconcile signature -> ReconciledCommand
//! ```
//!
//! - [`descriptor`] - Descriptor model: signature, flag specs, positional help
//! - [`command`] - The [`Command`] trait and the domain [`CommandError`]
//! - [`reconcile`] - Positional/flag split and spec cross-check
//!
//! The parser builder and dispatcher of the CLI layer consume the
//! reconciled commands.
//!
//! # Invariants
//!
//! - Every positional parameter has help text; every flag parameter has a spec
//! - Violations surface as [`ConfigurationError`] before any parsing
//! - Positional order always follows the invocation signature

pub mod command;
pub mod descriptor;
pub mod reconcile;

pub use command::{Command, CommandError, FlagValues};
pub use descriptor::{
    ArgValue, CommandDescriptor, CommandFactory, FlagAction, FlagSpec, Parameter, ValueType,
};
pub use reconcile::{reconcile, ConfigurationError, ReconciledCommand, SignatureSplit};
