//! ui
//!
//! User-facing output.
//!
//! # Modules
//!
//! - [`output`] - Output formatting and display
//!
//! # Design
//!
//! Command results go to stdout; failures reported by the dispatcher go to
//! stderr through [`output::error`]. Diagnostics use `tracing` instead.

pub mod output;
