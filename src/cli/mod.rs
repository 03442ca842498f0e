//! Command-line interface definitions for the `autovaas` binary.
//!
//! This module centralises the clap parser structures so both the main binary
//! and the build script can reuse them when generating the manual page.

use camino::Utf8PathBuf;
use clap::Parser;

/// Top-level CLI for the `autovaas` binary.
#[derive(Debug, Parser)]
#[command(
    name = "autovaas",
    about = "Batch-create, batch-delete, or reset VaaS lab instances from a JSON batch file",
    arg_required_else_help = true
)]
pub(crate) enum Cli {
    /// Create the instances described in the batch file.
    #[command(name = "create", about = "Create the instances described in the batch file")]
    Create(CreateCommand),
    /// Delete the instances described in the batch file.
    #[command(name = "delete", about = "Delete the instances described in the batch file")]
    Delete(DeleteCommand),
    /// Reset instances to service defaults by deleting then recreating them.
    #[command(
        name = "clear",
        about = "Delete then recreate the instances, resetting them to service defaults"
    )]
    Clear(ClearCommand),
}

/// Arguments for the `autovaas create` subcommand.
#[derive(Debug, Parser)]
pub(crate) struct CreateCommand {
    /// Path to the JSON file describing the instance batch.
    #[arg(value_name = "JSON_FILE")]
    pub(crate) json_file: Utf8PathBuf,
    /// Source dataset CSVs from this directory instead of service defaults.
    ///
    /// The directory is scanned recursively; any of the canonical dataset
    /// filenames found under it are uploaded with their real contents.
    #[arg(long, value_name = "PATH")]
    pub(crate) dir: Option<Utf8PathBuf>,
}

/// Arguments for the `autovaas delete` subcommand.
#[derive(Debug, Parser)]
pub(crate) struct DeleteCommand {
    /// Path to the JSON file describing the instance batch.
    #[arg(value_name = "JSON_FILE")]
    pub(crate) json_file: Utf8PathBuf,
}

/// Arguments for the `autovaas clear` subcommand.
#[derive(Debug, Parser)]
pub(crate) struct ClearCommand {
    /// Path to the JSON file describing the instance batch.
    #[arg(value_name = "JSON_FILE")]
    pub(crate) json_file: Utf8PathBuf,
}
