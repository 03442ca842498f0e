//! Core library for the autovaas batch provisioning tool.
//!
//! The crate builds multipart submissions for a remote
//! virtualization-as-a-service endpoint from JSON-described instance records
//! and a fixed set of dataset files, submits them over TLS, and classifies
//! the service's free-text responses into per-instance outcomes. The
//! composite `clear` action resets instances by deleting and recreating them.

pub mod classify;
pub mod config;
pub mod datasets;
pub mod form;
pub mod record;
pub mod run;
pub mod submit;
pub mod test_support;

pub use classify::{
    Action, CREATE_SUCCESS_MARKER, DELETE_SUCCESS_MARKER, Outcome, classify,
};
pub use config::{ConfigError, DEFAULT_SERVICE_URL, VaasConfig};
pub use datasets::{REQUIRED_DATASETS, ScanError, ScanReport, scan_datasets};
pub use form::{FormBody, FormError, build_form};
pub use record::{BatchError, FORM_FIELD_COUNT, InstanceRecord, load_batch};
pub use run::{
    RunAction, RunConfig, RunConfigError, RunError, RunOrchestrator, RunSummary,
};
pub use submit::{HttpSubmitter, RawResponse, SubmitError, SubmitFuture, Submitter};
