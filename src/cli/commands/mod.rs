//! cli::commands
//!
//! The commands shipped with clrtools and their registry.
//!
//! # Adding a Command
//!
//! 1. Create a module with a `Command` implementation and a `descriptor()`
//! 2. Append its descriptor to [`registry`]
//!
//! The subcommand name is derived from the descriptor's type identifier, so
//! `CommandShowImportTargets` is invoked as `clrtools show-import-targets`.
//! Registry order is the order subcommands are listed in `--help`.

mod import;
mod show_import_targets;

pub use import::{ImportCommand, IMPORT_TARGETS};
pub use show_import_targets::ShowImportTargetsCommand;

use crate::engine::CommandDescriptor;

/// All command descriptors, in listing order.
pub fn registry() -> Vec<CommandDescriptor> {
    vec![
        import::descriptor(),
        show_import_targets::descriptor(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::builder::CommandLine;

    #[test]
    fn registry_builds_a_parser() {
        let cli = CommandLine::new(registry()).unwrap();
        let names: Vec<_> = cli.commands().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["import", "show-import-targets"]);
        cli.command().debug_assert();
    }
}
