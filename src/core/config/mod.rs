//! core::config
//!
//! Run configuration handed to every command.
//!
//! # File Format
//!
//! The configuration file is TOML. Each table is a named section holding a
//! flat mapping from key to value; scalars are read as strings. Top-level
//! scalar keys are defaults visible in every section.
//!
//! ```toml
//! root = "/srv/dwh"
//!
//! [data-warehouse]
//! database = "sqlite:///%(here)s/dwh.db"
//! staging = "%(root)s/staging"
//! ```
//!
//! # Interpolation
//!
//! Values may reference other keys of the same section (or the defaults)
//! as `%(key)s`. `%%` yields a literal `%`. The builtin `here` is the
//! absolute directory containing the config file.
//!
//! # Example
//!
//! ```no_run
//! use clrtools::core::config::Config;
//! use std::path::Path;
//!
//! let config = Config::load(Path::new("clrtools.toml"), "data-warehouse").unwrap();
//! let database = config.main_option("database", None).unwrap();
//! println!("database: {:?}", database);
//! ```

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the builtin variable holding the config file's directory.
pub const HERE: &str = "here";

/// Maximum nesting of `%(key)s` references before giving up.
const MAX_INTERPOLATION_DEPTH: usize = 10;

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("no config file '{file}' found, or file has no '[{section}]' section")]
    MissingSection { file: String, section: String },

    #[error("bad interpolation in '[{section}]' option '{key}': {message}")]
    Interpolation {
        section: String,
        key: String,
        message: String,
    },
}

/// A scalar config value as it appears in the file.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
}

impl Scalar {
    fn into_string(self) -> String {
        match self {
            Scalar::Text(s) => s,
            Scalar::Integer(i) => i.to_string(),
            Scalar::Float(f) => f.to_string(),
            Scalar::Boolean(b) => b.to_string(),
        }
    }
}

/// A top-level entry: either a section table or a default value.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Entry {
    Section(BTreeMap<String, Scalar>),
    Default(Scalar),
}

/// Sectioned configuration for one run.
///
/// Created once per process and shared read-only with the selected command.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path of the file this configuration was read from, if any.
    file_name: Option<PathBuf>,
    /// Name of the main section (`-n/--name`).
    main_section: String,
    /// Values visible in every section, including [`HERE`].
    defaults: BTreeMap<String, String>,
    /// Raw (uninterpolated) section contents.
    sections: BTreeMap<String, BTreeMap<String, String>>,
}

impl Config {
    /// Create a configuration with no backing file.
    ///
    /// The main section exists and is empty; `here` is the empty string.
    pub fn empty(main_section: &str) -> Self {
        let mut defaults = BTreeMap::new();
        defaults.insert(HERE.to_string(), String::new());

        let mut sections = BTreeMap::new();
        sections.insert(main_section.to_string(), BTreeMap::new());

        Config {
            file_name: None,
            main_section: main_section.to_string(),
            defaults,
            sections,
        }
    }

    /// Load configuration from a file.
    ///
    /// A missing file is skipped: the result has no sections, so reading
    /// any option later fails with [`ConfigError::MissingSection`].
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path, main_section: &str) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "config file not found, no sections loaded");
            let mut defaults = BTreeMap::new();
            defaults.insert(HERE.to_string(), here_dir(path));
            return Ok(Config {
                file_name: Some(path.to_path_buf()),
                main_section: main_section.to_string(),
                defaults,
                sections: BTreeMap::new(),
            });
        }

        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let mut config = Self::parse(&contents, path)?;
        config.main_section = main_section.to_string();
        tracing::debug!(
            path = %path.display(),
            sections = config.sections.len(),
            "loaded config file"
        );
        Ok(config)
    }

    /// Parse TOML contents as if read from `path`.
    fn parse(contents: &str, path: &Path) -> Result<Self, ConfigError> {
        let entries: BTreeMap<String, Entry> =
            toml::from_str(contents).map_err(|e| ConfigError::ParseError {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        let mut defaults = BTreeMap::new();
        let mut sections = BTreeMap::new();
        for (name, entry) in entries {
            match entry {
                Entry::Section(values) => {
                    let values = values
                        .into_iter()
                        .map(|(k, v)| (k, v.into_string()))
                        .collect();
                    sections.insert(name, values);
                }
                Entry::Default(value) => {
                    defaults.insert(name, value.into_string());
                }
            }
        }

        // `here` always wins over a user-supplied default of the same name.
        defaults.insert(HERE.to_string(), here_dir(path));

        Ok(Config {
            file_name: Some(path.to_path_buf()),
            main_section: String::new(),
            defaults,
            sections,
        })
    }

    /// Path of the config file, if one was requested.
    pub fn file_name(&self) -> Option<&Path> {
        self.file_name.as_deref()
    }

    /// Name of the main section.
    pub fn main_section(&self) -> &str {
        &self.main_section
    }

    /// Check whether a section exists.
    pub fn has_section(&self, name: &str) -> bool {
        self.sections.contains_key(name)
    }

    /// Return all options of a section, interpolated, including defaults.
    pub fn section(&self, name: &str) -> Result<BTreeMap<String, String>, ConfigError> {
        let raw = self.raw_section(name)?;

        let mut keys: Vec<&String> = self.defaults.keys().collect();
        keys.extend(raw.keys());

        keys.into_iter()
            .map(|key| {
                let value = self.interpolate(name, raw, key)?;
                Ok((key.clone(), value))
            })
            .collect()
    }

    /// Return an option from the given section, or `default` if unset.
    ///
    /// # Errors
    ///
    /// Fails with [`ConfigError::MissingSection`] if the section is absent.
    pub fn section_option(
        &self,
        section: &str,
        key: &str,
        default: Option<&str>,
    ) -> Result<Option<String>, ConfigError> {
        let raw = self.raw_section(section)?;
        if raw.contains_key(key) || self.defaults.contains_key(key) {
            self.interpolate(section, raw, key).map(Some)
        } else {
            Ok(default.map(str::to_string))
        }
    }

    /// Return an option from the main section (`-n/--name`).
    pub fn main_option(
        &self,
        key: &str,
        default: Option<&str>,
    ) -> Result<Option<String>, ConfigError> {
        self.section_option(&self.main_section, key, default)
    }

    fn raw_section(&self, name: &str) -> Result<&BTreeMap<String, String>, ConfigError> {
        self.sections
            .get(name)
            .ok_or_else(|| ConfigError::MissingSection {
                file: self
                    .file_name
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default(),
                section: name.to_string(),
            })
    }

    /// Look up `key` in a section, falling back to the defaults.
    fn lookup<'a>(&'a self, raw: &'a BTreeMap<String, String>, key: &str) -> Option<&'a str> {
        raw.get(key)
            .or_else(|| self.defaults.get(key))
            .map(String::as_str)
    }

    fn interpolate(
        &self,
        section: &str,
        raw: &BTreeMap<String, String>,
        key: &str,
    ) -> Result<String, ConfigError> {
        let fail = |message: String| ConfigError::Interpolation {
            section: section.to_string(),
            key: key.to_string(),
            message,
        };

        let value = self
            .lookup(raw, key)
            .ok_or_else(|| fail(format!("option '{}' not found", key)))?;
        self.expand(raw, value, 0).map_err(fail)
    }

    fn expand(
        &self,
        raw: &BTreeMap<String, String>,
        value: &str,
        depth: usize,
    ) -> Result<String, String> {
        if depth > MAX_INTERPOLATION_DEPTH {
            return Err(format!(
                "recursion limit exceeded while expanding '{}'",
                value
            ));
        }

        let mut out = String::with_capacity(value.len());
        let mut rest = value;
        while let Some(pos) = rest.find('%') {
            out.push_str(&rest[..pos]);
            rest = &rest[pos..];

            if let Some(after) = rest.strip_prefix("%%") {
                out.push('%');
                rest = after;
            } else if let Some(after) = rest.strip_prefix("%(") {
                let end = after
                    .find(")s")
                    .ok_or_else(|| format!("unterminated reference in '{}'", value))?;
                let name = &after[..end];
                let referenced = self
                    .lookup(raw, name)
                    .ok_or_else(|| format!("reference to unknown option '{}'", name))?;
                out.push_str(&self.expand(raw, referenced, depth + 1)?);
                rest = &after[end + 2..];
            } else {
                return Err(format!("'%' must be followed by '%' or '(' in '{}'", value));
            }
        }
        out.push_str(rest);

        Ok(out)
    }
}

/// Absolute directory of a config file path.
fn here_dir(path: &Path) -> String {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    absolute
        .parent()
        .map(|p| p.display().to_string())
        .unwrap_or_default()
}
