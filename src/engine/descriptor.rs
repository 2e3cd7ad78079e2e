//! engine::descriptor
//!
//! Self-describing command metadata.
//!
//! A [`CommandDescriptor`] carries everything the parser builder needs to
//! turn a command into a subcommand: its type identifier, help text, the
//! ordered invocation signature, the flag table, the positional help table
//! and a factory producing a fresh instance bound to the run configuration.
//!
//! # Signature Convention
//!
//! Parameters without a default are positional arguments; the trailing
//! parameters that carry a default become optional flags. Each positional
//! needs an entry in `positional_help`, each flag an entry in `flag_specs`.
//!
//! # Example
//!
//! ```
//! use clrtools::engine::descriptor::{ArgValue, CommandDescriptor, FlagSpec, Parameter, ValueType};
//! use clrtools::engine::command::{Command, FlagValues};
//! use clrtools::core::config::Config;
//! use std::sync::Arc;
//!
//! struct Greet;
//!
//! impl Command for Greet {
//!     fn invoke(&self, positional: &[ArgValue], flags: &FlagValues) -> anyhow::Result<()> {
//!         println!("hello {} x{}", positional[0], flags.int("times")?);
//!         Ok(())
//!     }
//! }
//!
//! let descriptor = CommandDescriptor::new("CommandGreet", "Say hello", |_cfg: Arc<Config>| {
//!     Box::new(Greet) as Box<dyn Command>
//! })
//! .param(Parameter::positional("who"))
//! .param(Parameter::keyword("times", ArgValue::Int(1)))
//! .positional_help("who", "Whom to greet.")
//! .flag("times", FlagSpec::new('x', "times").value_type(ValueType::Int).help("Repeat count."));
//!
//! assert_eq!(descriptor.signature.len(), 2);
//! ```

use crate::core::config::Config;
use crate::engine::command::Command;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Identifier of the abstract base command; never exposed as a subcommand.
pub const ABSTRACT_COMMAND: &str = "AbstractCommand";

/// A raw argument value handed to a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgValue {
    /// Text value.
    Str(String),
    /// Integer value.
    Int(i64),
    /// Boolean switch.
    Bool(bool),
    /// No value.
    Null,
}

impl ArgValue {
    /// Borrow the text of a [`ArgValue::Str`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ArgValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Get the integer of a [`ArgValue::Int`].
    pub fn as_int(&self) -> Option<i64> {
        match self {
            ArgValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Get the boolean of a [`ArgValue::Bool`].
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ArgValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Check for [`ArgValue::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, ArgValue::Null)
    }

    /// Short name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            ArgValue::Str(_) => "string",
            ArgValue::Int(_) => "integer",
            ArgValue::Bool(_) => "boolean",
            ArgValue::Null => "none",
        }
    }
}

impl fmt::Display for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgValue::Str(s) => write!(f, "{}", s),
            ArgValue::Int(i) => write!(f, "{}", i),
            ArgValue::Bool(b) => write!(f, "{}", b),
            ArgValue::Null => write!(f, "none"),
        }
    }
}

impl From<&str> for ArgValue {
    fn from(s: &str) -> Self {
        ArgValue::Str(s.to_string())
    }
}

impl From<String> for ArgValue {
    fn from(s: String) -> Self {
        ArgValue::Str(s)
    }
}

impl From<i64> for ArgValue {
    fn from(i: i64) -> Self {
        ArgValue::Int(i)
    }
}

impl From<bool> for ArgValue {
    fn from(b: bool) -> Self {
        ArgValue::Bool(b)
    }
}

/// Type a value-taking flag is parsed as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValueType {
    #[default]
    Str,
    Int,
}

/// How a flag consumes the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlagAction {
    /// Takes a value.
    #[default]
    Store,
    /// Takes no value; present means `true`.
    StoreTrue,
}

/// Parser specification for one optional flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagSpec {
    /// Short form, e.g. `t` for `-t`.
    pub short: char,
    /// Long form without dashes, e.g. `target` for `--target`.
    pub long: &'static str,
    /// Value used when the flag is absent and not required.
    pub default: Option<ArgValue>,
    pub value_type: ValueType,
    pub required: bool,
    pub action: FlagAction,
    pub help: &'static str,
}

impl FlagSpec {
    /// Create a value-taking string flag with no default.
    pub fn new(short: char, long: &'static str) -> Self {
        FlagSpec {
            short,
            long,
            default: None,
            value_type: ValueType::Str,
            required: false,
            action: FlagAction::Store,
            help: "",
        }
    }

    pub fn default_value(mut self, value: impl Into<ArgValue>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn value_type(mut self, value_type: ValueType) -> Self {
        self.value_type = value_type;
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Make this a boolean switch.
    pub fn store_true(mut self) -> Self {
        self.action = FlagAction::StoreTrue;
        self
    }

    pub fn help(mut self, help: &'static str) -> Self {
        self.help = help;
        self
    }
}

/// One parameter of a command's invocation signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: &'static str,
    /// `Some` when the parameter carries a default value.
    pub default: Option<ArgValue>,
}

impl Parameter {
    /// A parameter without a default.
    pub fn positional(name: &'static str) -> Self {
        Parameter {
            name,
            default: None,
        }
    }

    /// A parameter with a default.
    pub fn keyword(name: &'static str, default: impl Into<ArgValue>) -> Self {
        Parameter {
            name,
            default: Some(default.into()),
        }
    }

    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }
}

/// Builds a command instance bound to the run configuration.
pub type CommandFactory = fn(Arc<Config>) -> Box<dyn Command>;

/// Metadata and constructor for one invocable subcommand.
#[derive(Clone)]
pub struct CommandDescriptor {
    /// CamelCase identifier starting with `Command`.
    pub type_identifier: &'static str,
    /// Help text shown for the subcommand.
    pub about: &'static str,
    /// Ordered parameters, receiver excluded.
    pub signature: Vec<Parameter>,
    pub flag_specs: Option<BTreeMap<&'static str, FlagSpec>>,
    pub positional_help: Option<BTreeMap<&'static str, &'static str>>,
    pub factory: CommandFactory,
}

impl CommandDescriptor {
    /// Create a descriptor with an empty signature and no spec tables.
    pub fn new(
        type_identifier: &'static str,
        about: &'static str,
        factory: CommandFactory,
    ) -> Self {
        CommandDescriptor {
            type_identifier,
            about,
            signature: Vec::new(),
            flag_specs: None,
            positional_help: None,
            factory,
        }
    }

    /// Append a parameter to the signature.
    pub fn param(mut self, parameter: Parameter) -> Self {
        self.signature.push(parameter);
        self
    }

    /// Declare the flag specification for a parameter.
    pub fn flag(mut self, name: &'static str, spec: FlagSpec) -> Self {
        self.flag_specs
            .get_or_insert_with(BTreeMap::new)
            .insert(name, spec);
        self
    }

    /// Declare the help string for a positional parameter.
    pub fn positional_help(mut self, name: &'static str, help: &'static str) -> Self {
        self.positional_help
            .get_or_insert_with(BTreeMap::new)
            .insert(name, help);
        self
    }

    /// Whether this descriptor should become a subcommand.
    ///
    /// The abstract base and identifiers starting with `_` are internal.
    pub fn is_eligible(&self) -> bool {
        !self.type_identifier.starts_with('_') && self.type_identifier != ABSTRACT_COMMAND
    }

    /// Construct a fresh command instance.
    pub fn instantiate(&self, config: Arc<Config>) -> Box<dyn Command> {
        (self.factory)(config)
    }
}

impl fmt::Debug for CommandDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandDescriptor")
            .field("type_identifier", &self.type_identifier)
            .field("about", &self.about)
            .field("signature", &self.signature)
            .field("flag_specs", &self.flag_specs)
            .field("positional_help", &self.positional_help)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::command::FlagValues;

    struct Noop;

    impl Command for Noop {
        fn invoke(&self, _: &[ArgValue], _: &FlagValues) -> anyhow::Result<()> {
            Ok(())
        }
    }

    fn noop(_: Arc<Config>) -> Box<dyn Command> {
        Box::new(Noop)
    }

    #[test]
    fn builder_fills_tables_lazily() {
        let d = CommandDescriptor::new("CommandNoop", "", noop);
        assert!(d.flag_specs.is_none());
        assert!(d.positional_help.is_none());

        let d = d
            .param(Parameter::positional("file"))
            .positional_help("file", "A file.");
        assert_eq!(
            d.positional_help.as_ref().unwrap().get("file"),
            Some(&"A file.")
        );
        assert!(d.flag_specs.is_none());
    }

    #[test]
    fn eligibility_skips_internal_descriptors() {
        assert!(CommandDescriptor::new("CommandNoop", "", noop).is_eligible());
        assert!(!CommandDescriptor::new("_CommandNoop", "", noop).is_eligible());
        assert!(!CommandDescriptor::new(ABSTRACT_COMMAND, "", noop).is_eligible());
    }

    #[test]
    fn flag_spec_setters() {
        let spec = FlagSpec::new('q', "quarter")
            .value_type(ValueType::Int)
            .required(true)
            .help("Quarter.");
        assert_eq!(spec.value_type, ValueType::Int);
        assert!(spec.required);
        assert_eq!(spec.action, FlagAction::Store);
        assert_eq!(spec.default, None);

        let switch = FlagSpec::new('f', "force").default_value(false).store_true();
        assert_eq!(switch.action, FlagAction::StoreTrue);
        assert_eq!(switch.default, Some(ArgValue::Bool(false)));
    }

    #[test]
    fn arg_value_display_and_accessors() {
        assert_eq!(ArgValue::from("x").to_string(), "x");
        assert_eq!(ArgValue::Int(20183).to_string(), "20183");
        assert_eq!(ArgValue::Null.to_string(), "none");
        assert_eq!(ArgValue::Int(3).as_int(), Some(3));
        assert_eq!(ArgValue::Bool(true).as_str(), None);
        assert!(ArgValue::Null.is_null());
    }
}
