//! # keycloak-admin CLI
//!
//! Operator command line for the realm user administration service.

pub mod cli;
pub mod commands;
pub mod error;
pub mod output;
pub mod telemetry;

pub use error::{CliError, CliResult};
