//! CLI module for aeroquery
//!
//! Provides command-line interface for:
//! - analyze: Print the result header of a query
//! - explain: Print the logical plan
//! - pipeline: Print the physical pipeline

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command, QueryArgs, Stage};
pub use commands::{respond, run, run_command};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_query, write_response};
