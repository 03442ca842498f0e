//! Binary entry point for the autovaas CLI.

use std::io::{self, Write};
use std::process;

use clap::Parser;
use thiserror::Error;

use autovaas::{
    HttpSubmitter, RunAction, RunConfig, RunError, RunOrchestrator, SubmitError, VaasConfig,
    load_batch,
};

mod cli;

use cli::{Cli, ClearCommand, CreateCommand, DeleteCommand};

#[derive(Debug, Error)]
enum CliError {
    #[error("input error: {0}")]
    Input(String),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("invalid arguments: {0}")]
    Arguments(String),
    #[error("run failed: {0}")]
    Run(#[from] RunError<SubmitError>),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let exit_code = match dispatch(cli).await {
        Ok(()) => 0,
        Err(err) => {
            report_error(&err);
            1
        }
    };

    process::exit(exit_code);
}

async fn dispatch(cli: Cli) -> Result<(), CliError> {
    let (run, json_file) = match cli {
        Cli::Create(CreateCommand { json_file, dir }) => (
            RunConfig::new(RunAction::Create, dir)
                .map_err(|err| CliError::Arguments(err.to_string()))?,
            json_file,
        ),
        Cli::Delete(DeleteCommand { json_file }) => (
            RunConfig::new(RunAction::Delete, None)
                .map_err(|err| CliError::Arguments(err.to_string()))?,
            json_file,
        ),
        Cli::Clear(ClearCommand { json_file }) => (
            RunConfig::new(RunAction::Clear, None)
                .map_err(|err| CliError::Arguments(err.to_string()))?,
            json_file,
        ),
    };

    let instances = load_batch(&json_file).map_err(|err| CliError::Input(err.to_string()))?;

    let config = VaasConfig::load_without_cli_args()
        .map_err(|err| CliError::Config(err.to_string()))?;
    config
        .validate()
        .map_err(|err| CliError::Config(err.to_string()))?;
    let submitter = HttpSubmitter::new().map_err(|err| CliError::Config(err.to_string()))?;

    let orchestrator = RunOrchestrator::new(submitter, config);
    let mut stdout = io::stdout();
    let summary = orchestrator.execute(&run, &instances, &mut stdout).await?;

    writeln!(
        stdout,
        "Done: {} submissions ({} created, {} deleted, {} failed, {} ambiguous)",
        summary.submissions, summary.created, summary.deleted, summary.failed, summary.ambiguous
    )
    .ok();

    Ok(())
}

fn report_error(err: &CliError) {
    write_error(io::stderr(), err);
}

fn write_error(mut target: impl Write, err: &CliError) {
    writeln!(target, "{err}").ok();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_error_renders_input_errors() {
        let mut buf = Vec::new();
        let err = CliError::Input(String::from("cannot read batch file"));
        write_error(&mut buf, &err);
        let rendered = String::from_utf8(buf).expect("utf8");
        assert!(
            rendered.contains("input error: cannot read batch file"),
            "rendered: {rendered}"
        );
    }

    #[test]
    fn clap_parses_create_with_directory() {
        let cli = Cli::try_parse_from(["autovaas", "create", "batch.json", "--dir", "/data"])
            .expect("create with --dir should parse");
        match cli {
            Cli::Create(command) => {
                assert_eq!(command.json_file, "batch.json");
                assert_eq!(command.dir.as_deref(), Some(camino::Utf8Path::new("/data")));
            }
            other => panic!("unexpected parse: {other:?}"),
        }
    }

    #[test]
    fn clap_rejects_clear_with_directory() {
        let result = Cli::try_parse_from(["autovaas", "clear", "batch.json", "--dir", "/data"]);
        assert!(result.is_err(), "clear has no --dir variant");
    }

    #[test]
    fn clap_rejects_unknown_action() {
        let result = Cli::try_parse_from(["autovaas", "reset", "batch.json"]);
        assert!(result.is_err());
    }
}
