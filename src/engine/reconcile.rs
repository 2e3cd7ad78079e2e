//! engine::reconcile
//!
//! Reconciles a descriptor's invocation signature against its declared specs.
//!
//! # Rules
//!
//! - The trailing parameters that carry a default become flags, in order.
//! - All other parameters are positional, in order.
//! - Every positional must have an entry in `positional_help`.
//! - Every flag must have an entry in `flag_specs`.
//! - Short and long option names are unique within a command and never
//!   take the parser's `-h`/`--help`.
//!
//! Any violation is a [`ConfigurationError`]. Reconciliation runs while the
//! parser is built, so a broken descriptor stops the program before any
//! argument is parsed.

use super::descriptor::{CommandDescriptor, FlagAction, FlagSpec, Parameter, ValueType};
use crate::core::naming::{self, NamingError};
use std::collections::HashSet;

/// Option names the parser reserves on every subcommand.
const RESERVED_SHORT: char = 'h';
const RESERVED_LONG: &str = "help";
use thiserror::Error;

/// Fatal errors in the command set, detected at startup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error(transparent)]
    InvalidName(#[from] NamingError),

    #[error("{command}: missing spec for option '{param}'")]
    MissingFlagSpec { command: String, param: String },

    #[error("{command}: missing spec for arg '{param}'")]
    MissingPositionalHelp { command: String, param: String },

    #[error("{command}: parameter '{param}' without default follows a parameter with default")]
    DefaultOrder { command: String, param: String },

    #[error("{command}: default for option '{param}' is {actual}, expected {expected}")]
    InvalidDefault {
        command: String,
        param: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("{command}: duplicate parameter '{param}'")]
    DuplicateParameter { command: String, param: String },

    #[error("{command}: option name '{flag}' is already in use")]
    DuplicateFlag { command: String, flag: String },

    #[error("subcommand '{name}' is derived from both {first} and {second}")]
    DuplicateName {
        name: String,
        first: String,
        second: String,
    },
}

/// Positional and flag parameter names of a signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureSplit {
    pub positional: Vec<&'static str>,
    pub flags: Vec<&'static str>,
}

/// A positional argument ready to be registered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionalArg {
    pub name: &'static str,
    pub help: &'static str,
}

/// A flag argument ready to be registered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagArg {
    pub name: &'static str,
    pub spec: FlagSpec,
}

/// A descriptor with its derived name and validated argument layout.
#[derive(Debug, Clone)]
pub struct ReconciledCommand {
    pub name: String,
    pub positional: Vec<PositionalArg>,
    pub flags: Vec<FlagArg>,
    pub descriptor: CommandDescriptor,
}

impl ReconciledCommand {
    /// Derive the name and reconcile the signature of a descriptor.
    pub fn from_descriptor(descriptor: CommandDescriptor) -> Result<Self, ConfigurationError> {
        let name = naming::derive_name(descriptor.type_identifier)?;
        let split = reconcile(&descriptor)?;

        // reconcile() guarantees every lookup below succeeds.
        let positional = split
            .positional
            .iter()
            .filter_map(|param| {
                let help = descriptor.positional_help.as_ref()?.get(param)?;
                Some(PositionalArg {
                    name: *param,
                    help: *help,
                })
            })
            .collect();
        let flags = split
            .flags
            .iter()
            .filter_map(|param| {
                let spec = descriptor.flag_specs.as_ref()?.get(param)?;
                Some(FlagArg {
                    name: *param,
                    spec: spec.clone(),
                })
            })
            .collect();

        tracing::debug!(
            command = descriptor.type_identifier,
            name = %name,
            positional = ?split.positional,
            flags = ?split.flags,
            "reconciled command"
        );

        Ok(ReconciledCommand {
            name,
            positional,
            flags,
            descriptor,
        })
    }

    /// Names of the positional parameters, in signature order.
    pub fn positional_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.positional.iter().map(|p| p.name)
    }

    /// Names of the flag parameters, in signature order.
    pub fn flag_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.flags.iter().map(|f| f.name)
    }
}

/// Split a signature into positional and flag names.
///
/// The last `d` parameters carrying a default are flags; the rest are
/// positional. `command` is only used in error messages.
pub fn split_signature(
    command: &str,
    signature: &[Parameter],
) -> Result<SignatureSplit, ConfigurationError> {
    let mut seen = HashSet::new();
    for param in signature {
        if !seen.insert(param.name) {
            return Err(ConfigurationError::DuplicateParameter {
                command: command.to_string(),
                param: param.name.to_string(),
            });
        }
    }

    let defaults = signature
        .iter()
        .rev()
        .take_while(|p| p.has_default())
        .count();
    let (head, tail) = signature.split_at(signature.len() - defaults);

    // A defaulted parameter inside the positional prefix means a required
    // parameter comes after it.
    if let Some(pos) = head.iter().rposition(Parameter::has_default) {
        return Err(ConfigurationError::DefaultOrder {
            command: command.to_string(),
            param: head[pos + 1].name.to_string(),
        });
    }

    Ok(SignatureSplit {
        positional: head.iter().map(|p| p.name).collect(),
        flags: tail.iter().map(|p| p.name).collect(),
    })
}

/// Split a descriptor's signature and check it against its spec tables.
pub fn reconcile(descriptor: &CommandDescriptor) -> Result<SignatureSplit, ConfigurationError> {
    let command = descriptor.type_identifier;
    let split = split_signature(command, &descriptor.signature)?;

    for param in &split.flags {
        let spec = descriptor
            .flag_specs
            .as_ref()
            .and_then(|specs| specs.get(param))
            .ok_or_else(|| ConfigurationError::MissingFlagSpec {
                command: command.to_string(),
                param: param.to_string(),
            })?;
        check_default(command, param, spec)?;
    }
    check_option_names(command, &split.flags, descriptor)?;

    for param in &split.positional {
        let covered = descriptor
            .positional_help
            .as_ref()
            .is_some_and(|help| help.contains_key(param));
        if !covered {
            return Err(ConfigurationError::MissingPositionalHelp {
                command: command.to_string(),
                param: param.to_string(),
            });
        }
    }

    Ok(split)
}

/// Reject option names that collide with each other or with `-h`/`--help`.
fn check_option_names(
    command: &str,
    flags: &[&'static str],
    descriptor: &CommandDescriptor,
) -> Result<(), ConfigurationError> {
    let Some(specs) = descriptor.flag_specs.as_ref() else {
        return Ok(());
    };

    let mut shorts = HashSet::from([RESERVED_SHORT]);
    let mut longs = HashSet::from([RESERVED_LONG]);
    for spec in flags.iter().filter_map(|param| specs.get(param)) {
        if !shorts.insert(spec.short) {
            return Err(ConfigurationError::DuplicateFlag {
                command: command.to_string(),
                flag: format!("-{}", spec.short),
            });
        }
        if !longs.insert(spec.long) {
            return Err(ConfigurationError::DuplicateFlag {
                command: command.to_string(),
                flag: format!("--{}", spec.long),
            });
        }
    }
    Ok(())
}

/// A default the parser would apply must have the flag's value type.
fn check_default(command: &str, param: &str, spec: &FlagSpec) -> Result<(), ConfigurationError> {
    let Some(default) = &spec.default else {
        return Ok(());
    };
    if spec.required || default.is_null() {
        return Ok(());
    }

    let expected = match (spec.action, spec.value_type) {
        (FlagAction::StoreTrue, _) => "boolean",
        (FlagAction::Store, ValueType::Str) => "string",
        (FlagAction::Store, ValueType::Int) => "integer",
    };
    if default.kind() == expected {
        Ok(())
    } else {
        Err(ConfigurationError::InvalidDefault {
            command: command.to_string(),
            param: param.to_string(),
            expected,
            actual: default.kind(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::Config;
    use crate::engine::command::{Command, FlagValues};
    use crate::engine::descriptor::{ArgValue, ValueType};
    use std::sync::Arc;

    struct Noop;

    impl Command for Noop {
        fn invoke(&self, _: &[ArgValue], _: &FlagValues) -> anyhow::Result<()> {
            Ok(())
        }
    }

    fn noop(_: Arc<Config>) -> Box<dyn Command> {
        Box::new(Noop)
    }

    fn import_like() -> CommandDescriptor {
        CommandDescriptor::new("CommandImport", "Import data.", noop)
            .param(Parameter::positional("file"))
            .param(Parameter::keyword("target", ArgValue::Null))
            .param(Parameter::keyword("quarter", ArgValue::Int(0)))
            .param(Parameter::keyword("force", false))
            .positional_help("file", "Path to the file.")
            .flag("target", FlagSpec::new('t', "target").required(true))
            .flag(
                "quarter",
                FlagSpec::new('q', "quarter")
                    .value_type(ValueType::Int)
                    .required(true),
            )
            .flag("force", FlagSpec::new('f', "force").store_true())
    }

    #[test]
    fn splits_trailing_defaults_into_flags() {
        let split = reconcile(&import_like()).unwrap();
        assert_eq!(split.positional, ["file"]);
        assert_eq!(split.flags, ["target", "quarter", "force"]);
    }

    #[test]
    fn no_defaults_means_no_flags() {
        let split = split_signature(
            "CommandCopy",
            &[Parameter::positional("src"), Parameter::positional("dst")],
        )
        .unwrap();
        assert_eq!(split.positional, ["src", "dst"]);
        assert!(split.flags.is_empty());
    }

    #[test]
    fn empty_signature_without_tables_is_valid() {
        let d = CommandDescriptor::new("CommandShowImportTargets", "", noop);
        let split = reconcile(&d).unwrap();
        assert!(split.positional.is_empty());
        assert!(split.flags.is_empty());
    }

    #[test]
    fn positional_without_tables_is_rejected() {
        let d =
            CommandDescriptor::new("CommandShow", "", noop).param(Parameter::positional("rev"));
        assert_eq!(
            reconcile(&d),
            Err(ConfigurationError::MissingPositionalHelp {
                command: "CommandShow".to_string(),
                param: "rev".to_string(),
            })
        );
    }

    #[test]
    fn flag_without_spec_is_rejected() {
        let mut d = import_like();
        d.flag_specs.as_mut().unwrap().remove("quarter");
        let err = reconcile(&d).unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::MissingFlagSpec {
                command: "CommandImport".to_string(),
                param: "quarter".to_string(),
            }
        );
        assert!(err.to_string().contains("quarter"));
    }

    #[test]
    fn positional_without_help_is_rejected() {
        let mut d = import_like();
        d.positional_help.as_mut().unwrap().remove("file");
        assert!(matches!(
            reconcile(&d),
            Err(ConfigurationError::MissingPositionalHelp { .. })
        ));
    }

    #[test]
    fn required_after_default_is_rejected() {
        let err = split_signature(
            "CommandBad",
            &[
                Parameter::keyword("force", false),
                Parameter::positional("file"),
            ],
        )
        .unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::DefaultOrder {
                command: "CommandBad".to_string(),
                param: "file".to_string(),
            }
        );
    }

    #[test]
    fn required_flag_may_carry_any_default() {
        // Never applied by the parser, so the type does not matter.
        let mut d = import_like();
        d.flag_specs.as_mut().unwrap().insert(
            "quarter",
            FlagSpec::new('q', "quarter")
                .value_type(ValueType::Int)
                .default_value("generic")
                .required(true),
        );
        assert!(reconcile(&d).is_ok());
    }

    #[test]
    fn optional_flag_default_must_match_type() {
        let mut d = import_like();
        d.flag_specs.as_mut().unwrap().insert(
            "quarter",
            FlagSpec::new('q', "quarter")
                .value_type(ValueType::Int)
                .default_value("generic"),
        );
        assert_eq!(
            reconcile(&d),
            Err(ConfigurationError::InvalidDefault {
                command: "CommandImport".to_string(),
                param: "quarter".to_string(),
                expected: "integer",
                actual: "string",
            })
        );
    }

    #[test]
    fn duplicate_parameter_is_rejected() {
        let err = split_signature(
            "CommandBad",
            &[Parameter::positional("file"), Parameter::positional("file")],
        )
        .unwrap_err();
        assert!(matches!(err, ConfigurationError::DuplicateParameter { .. }));
    }

    #[test]
    fn shared_short_option_is_rejected() {
        let mut d = import_like();
        d.flag_specs
            .as_mut()
            .unwrap()
            .insert("force", FlagSpec::new('t', "force").store_true());
        assert_eq!(
            reconcile(&d),
            Err(ConfigurationError::DuplicateFlag {
                command: "CommandImport".to_string(),
                flag: "-t".to_string(),
            })
        );
    }

    #[test]
    fn shared_long_option_is_rejected() {
        let mut d = import_like();
        d.flag_specs
            .as_mut()
            .unwrap()
            .insert("force", FlagSpec::new('f', "target").store_true());
        let err = reconcile(&d).unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::DuplicateFlag {
                command: "CommandImport".to_string(),
                flag: "--target".to_string(),
            }
        );
        assert_eq!(
            err.to_string(),
            "CommandImport: option name '--target' is already in use"
        );
    }

    #[test]
    fn help_option_names_are_reserved() {
        let mut d = import_like();
        d.flag_specs
            .as_mut()
            .unwrap()
            .insert("target", FlagSpec::new('h', "host").required(true));
        assert!(matches!(
            reconcile(&d),
            Err(ConfigurationError::DuplicateFlag { flag, .. }) if flag == "-h"
        ));

        let mut d = import_like();
        d.flag_specs
            .as_mut()
            .unwrap()
            .insert("target", FlagSpec::new('t', "help").required(true));
        assert!(matches!(
            reconcile(&d),
            Err(ConfigurationError::DuplicateFlag { flag, .. }) if flag == "--help"
        ));
    }

    #[test]
    fn reconciled_command_carries_help_and_specs_in_order() {
        let reconciled = ReconciledCommand::from_descriptor(import_like()).unwrap();
        assert_eq!(reconciled.name, "import");
        assert_eq!(
            reconciled.positional,
            [PositionalArg {
                name: "file",
                help: "Path to the file."
            }]
        );
        let flags: Vec<_> = reconciled.flag_names().collect();
        assert_eq!(flags, ["target", "quarter", "force"]);
        assert_eq!(reconciled.flags[1].spec.short, 'q');
    }

    #[test]
    fn bad_identifier_fails_reconciliation() {
        let d = CommandDescriptor::new("Import", "", noop);
        assert!(matches!(
            ReconciledCommand::from_descriptor(d),
            Err(ConfigurationError::InvalidName(NamingError::MissingPrefix(_)))
        ));
    }
}
