//! cli::builder
//!
//! Builds the clap parser tree from command descriptors.
//!
//! # Construction
//!
//! For every eligible descriptor, in registration order:
//! 1. Derive the subcommand name from the type identifier
//! 2. Reconcile the signature against the declared specs
//! 3. Register the flags, then the positionals in signature order
//!
//! Any failure aborts construction of the whole parser.
//!
//! # Parsing
//!
//! [`CommandLine::try_parse_from`] yields a [`ParsedInvocation`] holding the
//! selected command and its raw values, ready for the dispatcher.

use super::args::{Cli, GlobalArgs};
use crate::engine::reconcile::FlagArg;
use crate::engine::{
    ArgValue, CommandDescriptor, ConfigurationError, FlagAction, FlagValues, ReconciledCommand,
    ValueType,
};
use clap::error::ErrorKind;
use clap::{value_parser, Arg, ArgAction, ArgMatches, CommandFactory, FromArgMatches};
use std::ffi::OsString;

/// Message reported when no subcommand is given.
pub const TOO_FEW_ARGUMENTS: &str = "too few arguments";

/// The parsed command line of one run.
#[derive(Debug)]
pub struct ParsedInvocation<'a> {
    pub global: GlobalArgs,
    /// The chosen subcommand, if any.
    pub selected: Option<&'a ReconciledCommand>,
    /// One value per positional parameter, in signature order.
    pub positional_values: Vec<ArgValue>,
    /// One value per flag parameter, in signature order.
    pub flag_values: FlagValues,
}

/// The generated command-line parser.
#[derive(Debug)]
pub struct CommandLine {
    root: clap::Command,
    commands: Vec<ReconciledCommand>,
}

impl CommandLine {
    /// Build the parser from descriptors.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigurationError`] found; no partial parser is
    /// ever produced.
    pub fn new(
        descriptors: impl IntoIterator<Item = CommandDescriptor>,
    ) -> Result<Self, ConfigurationError> {
        Self::with_prog(None, descriptors)
    }

    /// Build the parser with an explicit program name.
    pub fn with_prog(
        prog: Option<&str>,
        descriptors: impl IntoIterator<Item = CommandDescriptor>,
    ) -> Result<Self, ConfigurationError> {
        let mut root = Cli::command();
        if let Some(prog) = prog {
            root = root.name(prog.to_string());
        }

        let mut commands: Vec<ReconciledCommand> = Vec::new();
        for descriptor in descriptors {
            if !descriptor.is_eligible() {
                tracing::debug!(command = descriptor.type_identifier, "skipping internal command");
                continue;
            }

            let reconciled = ReconciledCommand::from_descriptor(descriptor)?;
            if let Some(existing) = commands.iter().find(|c| c.name == reconciled.name) {
                return Err(ConfigurationError::DuplicateName {
                    name: reconciled.name.clone(),
                    first: existing.descriptor.type_identifier.to_string(),
                    second: reconciled.descriptor.type_identifier.to_string(),
                });
            }

            root = root.subcommand(subcommand(&reconciled));
            commands.push(reconciled);
        }

        Ok(CommandLine { root, commands })
    }

    /// The reconciled commands, in registration order.
    pub fn commands(&self) -> &[ReconciledCommand] {
        &self.commands
    }

    /// Find a command by its subcommand name.
    pub fn find(&self, name: &str) -> Option<&ReconciledCommand> {
        self.commands.iter().find(|c| c.name == name)
    }

    /// The clap command tree.
    pub fn command(&self) -> clap::Command {
        self.root.clone()
    }

    /// The usage error reported when no subcommand was selected.
    pub fn usage_error(&self) -> clap::Error {
        self.root
            .clone()
            .error(ErrorKind::MissingSubcommand, TOO_FEW_ARGUMENTS)
    }

    /// Parse a command line (including the program name).
    ///
    /// A missing subcommand is not a parse error: `selected` is `None`.
    pub fn try_parse_from<I, T>(&self, argv: I) -> Result<ParsedInvocation<'_>, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = self.root.clone().try_get_matches_from(argv)?;
        let global = GlobalArgs::from_arg_matches(&matches)?;

        let Some((name, sub_matches)) = matches.subcommand() else {
            return Ok(ParsedInvocation {
                global,
                selected: None,
                positional_values: Vec::new(),
                flag_values: FlagValues::new(),
            });
        };

        // clap only accepts registered subcommand names.
        let selected = self
            .find(name)
            .ok_or_else(|| self.root.clone().error(ErrorKind::InvalidSubcommand, name))?;

        let positional_values = selected
            .positional
            .iter()
            .map(|p| {
                sub_matches
                    .get_one::<String>(p.name)
                    .map(|v| ArgValue::Str(v.clone()))
                    .unwrap_or(ArgValue::Null)
            })
            .collect();

        let flag_values = selected
            .flags
            .iter()
            .map(|f| {
                let fallback = signature_default(&selected.descriptor, f.name);
                (f.name.to_string(), flag_value(sub_matches, f, fallback))
            })
            .collect();

        Ok(ParsedInvocation {
            global,
            selected: Some(selected),
            positional_values,
            flag_values,
        })
    }
}

/// Build the clap subcommand for a reconciled command.
fn subcommand(command: &ReconciledCommand) -> clap::Command {
    let mut sub = clap::Command::new(command.name.clone()).about(command.descriptor.about);

    for flag in &command.flags {
        sub = sub.arg(flag_arg(flag));
    }

    // Positionals bind in registration order, which must be signature order.
    for positional in &command.positional {
        sub = sub.arg(
            Arg::new(positional.name)
                .help(positional.help)
                .required(true)
                .action(ArgAction::Set)
                .value_parser(value_parser!(String)),
        );
    }

    sub
}

fn flag_arg(flag: &FlagArg) -> Arg {
    let spec = &flag.spec;
    let arg = Arg::new(flag.name)
        .short(spec.short)
        .long(spec.long)
        .help(spec.help)
        .required(spec.required);

    match spec.action {
        FlagAction::StoreTrue => arg.action(ArgAction::SetTrue),
        FlagAction::Store => {
            let arg = arg
                .action(ArgAction::Set)
                .value_name(spec.long.to_uppercase());
            let arg = match spec.value_type {
                ValueType::Str => arg.value_parser(value_parser!(String)),
                ValueType::Int => arg.value_parser(value_parser!(i64)),
            };
            match &spec.default {
                Some(default) if !spec.required && !default.is_null() => {
                    arg.default_value(default.to_string())
                }
                _ => arg,
            }
        }
    }
}

/// Read a flag's value, falling back to the signature default.
///
/// An absent switch takes its declared default, `false` when none is set.
fn flag_value(matches: &ArgMatches, flag: &FlagArg, fallback: ArgValue) -> ArgValue {
    let parsed = match (flag.spec.action, flag.spec.value_type) {
        (FlagAction::StoreTrue, _) => {
            let declared = flag.spec.default.as_ref().and_then(ArgValue::as_bool);
            let set = matches.get_flag(flag.name) || declared.unwrap_or(false);
            Some(ArgValue::Bool(set))
        }
        (FlagAction::Store, ValueType::Str) => matches
            .get_one::<String>(flag.name)
            .map(|v| ArgValue::Str(v.clone())),
        (FlagAction::Store, ValueType::Int) => {
            matches.get_one::<i64>(flag.name).map(|v| ArgValue::Int(*v))
        }
    };
    parsed.unwrap_or(fallback)
}

fn signature_default(descriptor: &CommandDescriptor, name: &str) -> ArgValue {
    descriptor
        .signature
        .iter()
        .find(|p| p.name == name)
        .and_then(|p| p.default.clone())
        .unwrap_or(ArgValue::Null)
}
