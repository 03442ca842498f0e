//! Orchestrates batch submissions against the VaaS endpoint.
//!
//! A run walks the instance batch in input order: build the multipart form,
//! submit it, classify the response, and report a one-line outcome. The
//! composite `clear` action is purely a local composition: a full delete pass
//! over the batch followed by a full create pass, never interleaved.

use std::io::Write;

use camino::Utf8PathBuf;
use thiserror::Error;

use crate::classify::{Action, Outcome, classify};
use crate::config::VaasConfig;
use crate::datasets::{REQUIRED_DATASETS, ScanError, scan_datasets};
use crate::form::{FormError, build_form};
use crate::record::InstanceRecord;
use crate::submit::Submitter;

/// Actions the operator can request for a batch.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RunAction {
    /// Create every instance in the batch.
    Create,
    /// Delete every instance in the batch.
    Delete,
    /// Delete then recreate every instance, resetting it to service defaults.
    Clear,
}

/// Per-invocation run settings, built once from CLI input and passed down.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RunConfig {
    /// Action to perform over the batch.
    pub action: RunAction,
    /// Directory to source dataset files from; `None` uploads placeholders so
    /// the service applies its own defaults.
    pub source_dir: Option<Utf8PathBuf>,
}

impl RunConfig {
    /// Builds a run configuration, enforcing that `clear` never sources
    /// datasets from a directory (the reset semantics rely on the service
    /// applying its defaults on the recreate pass).
    ///
    /// # Errors
    ///
    /// Returns [`RunConfigError::ClearWithDirectory`] for that combination.
    pub fn new(
        action: RunAction,
        source_dir: Option<Utf8PathBuf>,
    ) -> Result<Self, RunConfigError> {
        if action == RunAction::Clear && source_dir.is_some() {
            return Err(RunConfigError::ClearWithDirectory);
        }
        Ok(Self { action, source_dir })
    }
}

/// Errors raised while constructing a [`RunConfig`].
#[derive(Clone, Copy, Debug, Error, Eq, PartialEq)]
pub enum RunConfigError {
    /// Raised when `clear` is combined with a dataset directory.
    #[error("clear does not accept a dataset directory")]
    ClearWithDirectory,
}

/// Totals accumulated over one run.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct RunSummary {
    /// Submissions actually sent to the service.
    pub submissions: usize,
    /// Submissions classified as successful creations.
    pub created: usize,
    /// Submissions classified as successful deletions.
    pub deleted: usize,
    /// Submissions rejected by the service with a non-200 status.
    pub failed: usize,
    /// Submissions whose response text matched no known marker.
    pub ambiguous: usize,
}

/// Errors that abort a run.
#[derive(Debug, Error)]
pub enum RunError<SubmitterError>
where
    SubmitterError: std::error::Error + 'static,
{
    /// Raised when the dataset directory root cannot be scanned.
    #[error(transparent)]
    Scan(#[from] ScanError),
    /// Raised when a dataset file cannot be read while building a form.
    /// Aborts the run rather than submitting a silently incomplete upload.
    #[error("cannot build submission for instance {instance}: {source}")]
    Build {
        /// Instance whose submission was being assembled.
        instance: String,
        /// Underlying form assembly error.
        #[source]
        source: FormError,
    },
    /// Raised when a submission cannot be sent. A broken connection likely
    /// affects every remaining instance, so the run stops here.
    #[error("submission failed for instance {instance}: {source}")]
    Transport {
        /// Instance whose submission failed to send.
        instance: String,
        /// Underlying transport error.
        #[source]
        source: SubmitterError,
    },
}

/// Executes batch runs using the provided submitter.
#[derive(Debug)]
pub struct RunOrchestrator<S: Submitter> {
    submitter: S,
    config: VaasConfig,
}

impl<S: Submitter> RunOrchestrator<S> {
    /// Creates a new orchestrator.
    #[must_use]
    pub const fn new(submitter: S, config: VaasConfig) -> Self {
        Self { submitter, config }
    }

    /// Runs the requested action over the batch, writing one outcome line per
    /// submission (and any scan warnings) to `out`.
    ///
    /// Remote failures and ambiguous outcomes are reported and the run
    /// continues with the next instance; scan, build, and transport errors
    /// abort the run.
    ///
    /// # Errors
    ///
    /// Returns [`RunError`] when the dataset directory cannot be scanned, a
    /// dataset file cannot be read, or a submission cannot be sent.
    pub async fn execute<W: Write>(
        &self,
        run: &RunConfig,
        instances: &[InstanceRecord],
        out: &mut W,
    ) -> Result<RunSummary, RunError<S::Error>> {
        let files = self.resolve_datasets(run, out)?;
        let source_dir = run.source_dir.as_deref();

        let mut summary = RunSummary::default();
        match run.action {
            RunAction::Create => {
                self.run_pass(Action::Create, instances, &files, source_dir, out, &mut summary)
                    .await?;
            }
            RunAction::Delete => {
                self.run_pass(Action::Delete, instances, &files, source_dir, out, &mut summary)
                    .await?;
            }
            RunAction::Clear => {
                // Delete outcomes never block the recreate pass: a missing
                // delete target is a normal precondition when provisioning
                // from scratch.
                self.run_pass(Action::Delete, instances, &files, source_dir, out, &mut summary)
                    .await?;
                self.run_pass(Action::Create, instances, &files, source_dir, out, &mut summary)
                    .await?;
            }
        }

        Ok(summary)
    }

    /// Resolves which dataset names to attach for this run.
    ///
    /// With a source directory, only the canonical files actually found under
    /// it are attached, with their real contents. Without one, every
    /// canonical name is attached as a zero-length placeholder, which tells
    /// the service to fall back to its own default datasets.
    fn resolve_datasets<W: Write>(
        &self,
        run: &RunConfig,
        out: &mut W,
    ) -> Result<Vec<&'static str>, RunError<S::Error>> {
        match &run.source_dir {
            Some(dir) => {
                let report = scan_datasets(dir)?;
                for warning in &report.warnings {
                    writeln!(out, "warning: {warning}").ok();
                }
                Ok(report.matched)
            }
            None => Ok(REQUIRED_DATASETS.to_vec()),
        }
    }

    async fn run_pass<W: Write>(
        &self,
        action: Action,
        instances: &[InstanceRecord],
        files: &[&str],
        source_dir: Option<&camino::Utf8Path>,
        out: &mut W,
        summary: &mut RunSummary,
    ) -> Result<(), RunError<S::Error>> {
        let url = self.config.endpoint(action);

        for record in instances {
            let form =
                build_form(record, files, source_dir).map_err(|err| RunError::Build {
                    instance: record.instance_name.clone(),
                    source: err,
                })?;

            let response =
                self.submitter
                    .submit(&url, form)
                    .await
                    .map_err(|err| RunError::Transport {
                        instance: record.instance_name.clone(),
                        source: err,
                    })?;
            summary.submissions += 1;

            let name = record.instance_name.as_str();
            match classify(response.status, &response.body, action) {
                Outcome::Success => match action {
                    Action::Create => {
                        summary.created += 1;
                        writeln!(out, "Created instance: {name}").ok();
                    }
                    Action::Delete => {
                        summary.deleted += 1;
                        writeln!(out, "Deleted instance: {name}").ok();
                    }
                },
                Outcome::Failure(detail) => {
                    summary.failed += 1;
                    writeln!(out, "{action} failed for instance {name}: {detail}").ok();
                }
                Outcome::Ambiguous => {
                    summary.ambiguous += 1;
                    writeln!(
                        out,
                        "Could not perform {action}; check whether instance {name} exists."
                    )
                    .ok();
                }
            }
        }

        Ok(())
    }
}
