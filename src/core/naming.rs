//! core::naming
//!
//! Subcommand naming rules.
//!
//! Every command type is identified by a CamelCase identifier carrying the
//! fixed [`COMMAND_PREFIX`]. The subcommand name is derived from the words
//! after that prefix:
//!
//! ```text
//! CommandShowImportTargets  ->  show-import-targets
//! CommandImport             ->  import
//! ```

use thiserror::Error;

/// Marker prefix every command identifier starts with.
pub const COMMAND_PREFIX: &str = "Command";

/// Separator placed between the words of a derived name.
pub const NAME_SEPARATOR: char = '-';

/// Errors from subcommand name derivation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NamingError {
    /// The identifier has nothing after the prefix.
    #[error("command identifier '{0}' must be longer than the 'Command' prefix")]
    TooShort(String),

    /// The identifier does not start with the prefix.
    #[error("command identifier must start with 'Command' but doesn't: '{0}'")]
    MissingPrefix(String),

    /// The first word after the prefix is not capitalized.
    #[error("command identifier is supposed to be in CamelCase but isn't: '{0}'")]
    NotCamelCase(String),
}

/// Derive the canonical subcommand name from a command type identifier.
///
/// Strips [`COMMAND_PREFIX`], splits the rest at every uppercase character
/// and joins the lower-cased words with [`NAME_SEPARATOR`].
///
/// While the parser is built, a [`NamingError`] is wrapped into
/// `ConfigurationError::InvalidName` (see `crate::engine::reconcile`).
///
/// # Example
///
/// ```
/// use clrtools::core::naming::derive_name;
///
/// assert_eq!(derive_name("CommandShowImportTargets").unwrap(), "show-import-targets");
/// assert_eq!(derive_name("CommandImport").unwrap(), "import");
/// assert!(derive_name("Command").is_err());
/// ```
pub fn derive_name(identifier: &str) -> Result<String, NamingError> {
    let Some(core) = identifier.strip_prefix(COMMAND_PREFIX) else {
        return Err(NamingError::MissingPrefix(identifier.to_string()));
    };

    let Some(first) = core.chars().next() else {
        return Err(NamingError::TooShort(identifier.to_string()));
    };
    if !first.is_uppercase() {
        return Err(NamingError::NotCamelCase(identifier.to_string()));
    }

    let mut bounds: Vec<usize> = core
        .char_indices()
        .filter(|(_, c)| c.is_uppercase())
        .map(|(i, _)| i)
        .collect();
    bounds.push(core.len());

    let words: Vec<String> = bounds
        .windows(2)
        .map(|w| core[w[0]..w[1]].to_lowercase())
        .collect();

    Ok(words.join(&NAME_SEPARATOR.to_string()))
}
