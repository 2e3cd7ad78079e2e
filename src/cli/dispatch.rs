//! cli::dispatch
//!
//! Runs the selected command and translates its failures.
//!
//! # Error Boundary
//!
//! Only [`CommandError`] is intercepted. With raise mode off it is printed
//! as a one-line message and the run fails with [`ExitStatus::Failure`].
//! With raise mode on it is handed back to the caller unchanged. Every
//! other error propagates as [`DispatchError::Unclassified`].

use super::builder::{ParsedInvocation, TOO_FEW_ARGUMENTS};
use crate::core::config::Config;
use crate::engine::CommandError;
use crate::ui::output;
use std::process::ExitCode;
use std::sync::Arc;
use thiserror::Error;

/// Outcome of a completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    /// A command failed with a reported domain error.
    Failure,
}

impl ExitStatus {
    pub fn is_success(self) -> bool {
        self == ExitStatus::Success
    }
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        match status {
            ExitStatus::Success => ExitCode::SUCCESS,
            ExitStatus::Failure => ExitCode::FAILURE,
        }
    }
}

/// Dispatch behaviour for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchOptions {
    /// Propagate domain errors instead of reporting them.
    pub raise_errors: bool,
}

/// Errors that escape the dispatcher.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// No subcommand was selected.
    #[error("{}", TOO_FEW_ARGUMENTS)]
    NoSubcommand,

    /// A domain error, propagated because raise mode is on.
    #[error(transparent)]
    Command(CommandError),

    /// Any other failure of the command body.
    #[error(transparent)]
    Unclassified(anyhow::Error),
}

/// Constructs and invokes the selected command.
#[derive(Debug, Clone, Default)]
pub struct Dispatcher {
    options: DispatchOptions,
}

impl Dispatcher {
    pub fn new(options: DispatchOptions) -> Self {
        Dispatcher { options }
    }

    /// Run the selected command with the parsed values.
    ///
    /// The command is constructed with `config` as its only input, then
    /// invoked with the positional values followed by the flag values.
    pub fn dispatch(
        &self,
        parsed: &ParsedInvocation<'_>,
        config: Arc<Config>,
    ) -> Result<ExitStatus, DispatchError> {
        let Some(selected) = parsed.selected else {
            return Err(DispatchError::NoSubcommand);
        };

        tracing::debug!(
            command = %selected.name,
            positional = ?parsed.positional_values,
            flags = ?parsed.flag_values,
            "dispatching command"
        );

        let command = selected.descriptor.instantiate(config);
        let Err(err) = command.invoke(&parsed.positional_values, &parsed.flag_values) else {
            return Ok(ExitStatus::Success);
        };

        match err.downcast::<CommandError>() {
            Ok(domain) if self.options.raise_errors => Err(DispatchError::Command(domain)),
            Ok(domain) => {
                tracing::debug!(command = %selected.name, error = %domain, "command failed");
                output::error(&domain);
                Ok(ExitStatus::Failure)
            }
            Err(other) => Err(DispatchError::Unclassified(other)),
        }
    }
}
