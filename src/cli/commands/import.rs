//! import command - Import a data file into the warehouse
//!
//! Loading itself is not wired up yet; the command validates its inputs,
//! reports what it would import and which database the run is configured
//! for.

use crate::core::config::Config;
use crate::engine::{
    ArgValue, Command, CommandDescriptor, CommandError, FlagSpec, FlagValues, Parameter, ValueType,
};
use crate::ui::output;
use anyhow::Result;
use std::sync::Arc;

/// Targets a data file can be imported into.
pub const IMPORT_TARGETS: &[&str] = &[
    "GDWHCoA",
    "ECONCoA",
    "QuasiiSingle",
    "YieldCurve",
    "inflation",
];

/// Descriptor for `clrtools import`.
pub fn descriptor() -> CommandDescriptor {
    CommandDescriptor::new("CommandImport", "Import data into the DWH.", |config| {
        Box::new(ImportCommand::new(config))
    })
    .param(Parameter::positional("file"))
    .param(Parameter::keyword("target", ArgValue::Null))
    .param(Parameter::keyword("quarter", ArgValue::Int(0)))
    .param(Parameter::keyword("force", false))
    .positional_help("file", "Path to the file to be imported.")
    .flag(
        "target",
        FlagSpec::new('t', "target")
            .default_value("generic")
            .required(true)
            .help("Defines the target for the import."),
    )
    .flag(
        "quarter",
        FlagSpec::new('q', "quarter")
            .value_type(ValueType::Int)
            .required(true)
            .help("Sets the year/quarter for the import, e.g. 20183."),
    )
    .flag(
        "force",
        FlagSpec::new('f', "force")
            .default_value(false)
            .store_true()
            .help("Replace data that is already there."),
    )
}

/// Command to import a data file.
pub struct ImportCommand {
    config: Arc<Config>,
}

impl ImportCommand {
    pub fn new(config: Arc<Config>) -> Self {
        ImportCommand { config }
    }
}

impl Command for ImportCommand {
    fn invoke(&self, positional: &[ArgValue], flags: &FlagValues) -> Result<()> {
        let file = positional
            .first()
            .and_then(ArgValue::as_str)
            .ok_or_else(|| CommandError::MissingArgument("file".to_string()))?;
        let target = flags
            .str("target")?
            .ok_or_else(|| CommandError::MissingArgument("target".to_string()))?;
        let quarter = flags.int("quarter")?;
        let force = flags.flag("force")?;

        check_target(target)?;
        check_quarter(quarter)?;

        output::print(format!(
            "Import attempt for target {} quarter {} from file {}",
            target, quarter, file
        ));
        output::print(format!("force is {}", force));

        let database = self
            .config
            .main_option("database", None)
            .map_err(CommandError::from)?;
        output::print(format!(
            "Config-Info: database = {}",
            database.as_deref().unwrap_or("none")
        ));

        Ok(())
    }
}

fn check_target(target: &str) -> Result<(), CommandError> {
    if IMPORT_TARGETS.contains(&target) {
        Ok(())
    } else {
        Err(CommandError::new(format!(
            "unknown import target '{}'; run 'clrtools show-import-targets' for the list",
            target
        )))
    }
}

/// Quarters are written `YYYYQ`, e.g. `20183` for the third quarter of 2018.
fn check_quarter(quarter: i64) -> Result<(), CommandError> {
    let year = quarter / 10;
    let q = quarter % 10;
    if (1000..=9999).contains(&year) && (1..=4).contains(&q) {
        Ok(())
    } else {
        Err(CommandError::new(format!(
            "invalid quarter '{}': expected YYYYQ with Q in 1..4, e.g. 20183",
            quarter
        )))
    }
}
