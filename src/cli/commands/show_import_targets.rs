//! show-import-targets command - Display the available import targets

use super::import::IMPORT_TARGETS;
use crate::engine::{ArgValue, Command, CommandDescriptor, FlagValues};
use crate::ui::output;
use anyhow::Result;

/// Descriptor for `clrtools show-import-targets`.
pub fn descriptor() -> CommandDescriptor {
    CommandDescriptor::new(
        "CommandShowImportTargets",
        "Display the available targets for a data import.",
        |_config| Box::new(ShowImportTargetsCommand),
    )
}

/// Command to list the import targets, one per line.
pub struct ShowImportTargetsCommand;

impl Command for ShowImportTargetsCommand {
    fn invoke(&self, _positional: &[ArgValue], _flags: &FlagValues) -> Result<()> {
        output::print(output::format_list(IMPORT_TARGETS, ""));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::reconcile;

    #[test]
    fn takes_no_arguments() {
        let d = descriptor();
        assert!(d.signature.is_empty());
        assert!(d.flag_specs.is_none());
        assert!(d.positional_help.is_none());

        let split = reconcile(&d).unwrap();
        assert!(split.positional.is_empty());
        assert!(split.flags.is_empty());
    }

    #[test]
    fn invoke_succeeds() {
        assert!(ShowImportTargetsCommand
            .invoke(&[], &FlagValues::new())
            .is_ok());
    }
}
