//! core
//!
//! Core rules and configuration for clrtools.
//!
//! # Modules
//!
//! - [`naming`] - Subcommand naming rule
//! - [`config`] - Sectioned run configuration

pub mod config;
pub mod naming;
