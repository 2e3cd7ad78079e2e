//! engine::command
//!
//! Command trait and the domain error commands raise.
//!
//! # Architecture
//!
//! Every subcommand is a type implementing [`Command`]. The dispatcher
//! constructs one instance per run through the descriptor's factory and
//! calls [`Command::invoke`] exactly once with the parsed positional values
//! (in signature order) followed by the flag values (by name).
//!
//! # Errors
//!
//! Commands signal expected, user-facing failures by returning a
//! [`CommandError`]. The dispatcher reports those as a short message. Any
//! other error a command returns is treated as unclassified and propagated
//! unchanged.

use super::descriptor::ArgValue;
use crate::core::config::ConfigError;
use thiserror::Error;

/// Expected failure raised by a command body.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Free-form failure message.
    #[error("{0}")]
    Message(String),

    /// A configuration lookup failed inside the command.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The command asked for an argument it was not given.
    #[error("missing argument '{0}'")]
    MissingArgument(String),

    /// An argument had a different type than the command expected.
    #[error("argument '{name}' expected {expected}, got {actual}")]
    ArgumentType {
        name: String,
        expected: &'static str,
        actual: &'static str,
    },
}

impl CommandError {
    /// Create a free-form command error.
    pub fn new(message: impl Into<String>) -> Self {
        CommandError::Message(message.into())
    }
}

/// Parsed flag values, in signature order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlagValues {
    values: Vec<(String, ArgValue)>,
}

impl FlagValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a value, replacing an earlier one with the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: ArgValue) {
        let name = name.into();
        match self.values.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = value,
            None => self.values.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&ArgValue> {
        self.values.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ArgValue)> {
        self.values.iter().map(|(n, v)| (n.as_str(), v))
    }

    fn require(&self, name: &str) -> Result<&ArgValue, CommandError> {
        self.get(name)
            .ok_or_else(|| CommandError::MissingArgument(name.to_string()))
    }

    /// Get a string flag. `Null` yields `None`.
    pub fn str(&self, name: &str) -> Result<Option<&str>, CommandError> {
        match self.require(name)? {
            ArgValue::Str(s) => Ok(Some(s)),
            ArgValue::Null => Ok(None),
            other => Err(type_error(name, "string", other)),
        }
    }

    /// Get an integer flag.
    pub fn int(&self, name: &str) -> Result<i64, CommandError> {
        match self.require(name)? {
            ArgValue::Int(i) => Ok(*i),
            other => Err(type_error(name, "integer", other)),
        }
    }

    /// Get a boolean switch.
    pub fn flag(&self, name: &str) -> Result<bool, CommandError> {
        match self.require(name)? {
            ArgValue::Bool(b) => Ok(*b),
            other => Err(type_error(name, "boolean", other)),
        }
    }
}

impl FromIterator<(String, ArgValue)> for FlagValues {
    fn from_iter<I: IntoIterator<Item = (String, ArgValue)>>(iter: I) -> Self {
        let mut values = FlagValues::new();
        for (name, value) in iter {
            values.insert(name, value);
        }
        values
    }
}

fn type_error(name: &str, expected: &'static str, actual: &ArgValue) -> CommandError {
    CommandError::ArgumentType {
        name: name.to_string(),
        expected,
        actual: actual.kind(),
    }
}

/// A subcommand implementation.
///
/// Instances are created per run by the descriptor's factory, which hands
/// them the run configuration.
pub trait Command {
    /// Run the command.
    ///
    /// `positional` holds one value per positional parameter, in signature
    /// order. `flags` holds one value per keyword parameter.
    ///
    /// Return a [`CommandError`] (wrapped in `anyhow::Error`) for expected
    /// failures; any other error is reported as unclassified.
    fn invoke(&self, positional: &[ArgValue], flags: &FlagValues) -> anyhow::Result<()>;
}
