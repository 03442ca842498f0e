//! End-to-end batch run scenarios against a scripted submitter.

use std::fs;

use camino::Utf8PathBuf;
use tempfile::TempDir;

use autovaas::test_support::{RecordedSubmission, ScriptedSubmitter};
use autovaas::{
    FORM_FIELD_COUNT, InstanceRecord, REQUIRED_DATASETS, RunAction, RunConfig, RunError,
    RunOrchestrator, VaasConfig,
};

const SERVICE_URL: &str = "https://vaas.test.internal";

fn record(name: &str) -> InstanceRecord {
    InstanceRecord {
        instance_name: String::from(name),
        owner_first_name: String::from("Ada"),
        email: String::from("ada@example.com"),
        ..InstanceRecord::default()
    }
}

fn orchestrator(submitter: ScriptedSubmitter) -> RunOrchestrator<ScriptedSubmitter> {
    RunOrchestrator::new(
        submitter,
        VaasConfig {
            service_url: String::from(SERVICE_URL),
        },
    )
}

fn file_part_names(submission: &RecordedSubmission) -> Vec<String> {
    submission
        .parts()
        .iter()
        .filter(|part| part.filename.is_some())
        .map(|part| part.name.clone())
        .collect()
}

fn assert_all_file_parts_empty(submission: &RecordedSubmission) {
    for part in submission.parts() {
        if part.filename.is_some() {
            assert!(
                part.payload.is_empty(),
                "file part {} should be a placeholder",
                part.name
            );
        }
    }
}

// Scenario A: one instance, create, no directory.
#[tokio::test]
async fn create_without_directory_submits_all_placeholder_datasets() {
    let submitter = ScriptedSubmitter::new();
    submitter.push_response(200, "You will be redirected");

    let run = RunConfig::new(RunAction::Create, None).expect("run config");
    let mut out = Vec::new();
    let summary = orchestrator(submitter.clone())
        .execute(&run, &[record("lab-1")], &mut out)
        .await
        .expect("run should succeed");

    assert_eq!(summary.submissions, 1);
    assert_eq!(summary.created, 1);

    let submissions = submitter.submissions();
    let submission = submissions.first().expect("one submission");
    assert_eq!(submission.url, format!("{SERVICE_URL}/create"));

    let parts = submission.parts();
    assert_eq!(parts.len(), FORM_FIELD_COUNT + REQUIRED_DATASETS.len());
    assert_eq!(file_part_names(submission), REQUIRED_DATASETS);
    assert_all_file_parts_empty(submission);
}

// Scenario B: two instances, delete; a remote failure on the first does not
// prevent the second submission.
#[tokio::test]
async fn delete_batch_continues_past_a_remote_failure() {
    let submitter = ScriptedSubmitter::new();
    submitter.push_response(500, "boom");
    submitter.push_response(200, "Successfully deleted");

    let run = RunConfig::new(RunAction::Delete, None).expect("run config");
    let batch = [record("lab-1"), record("lab-2")];
    let mut out = Vec::new();
    let summary = orchestrator(submitter.clone())
        .execute(&run, &batch, &mut out)
        .await
        .expect("run should continue past remote failures");

    assert_eq!(summary.submissions, 2);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.deleted, 1);

    let urls = submitter
        .submissions()
        .iter()
        .map(|submission| submission.url.clone())
        .collect::<Vec<_>>();
    assert_eq!(
        urls,
        [
            format!("{SERVICE_URL}/delete"),
            format!("{SERVICE_URL}/delete")
        ]
    );
}

// Scenario B, transport variant: a broken connection aborts the batch.
#[tokio::test]
async fn delete_batch_aborts_on_a_transport_error() {
    let submitter = ScriptedSubmitter::new();
    submitter.push_transport_error("connection refused");

    let run = RunConfig::new(RunAction::Delete, None).expect("run config");
    let batch = [record("lab-1"), record("lab-2")];
    let mut out = Vec::new();
    let err = orchestrator(submitter.clone())
        .execute(&run, &batch, &mut out)
        .await
        .expect_err("transport errors abort the run");

    assert!(matches!(err, RunError::Transport { .. }), "got {err:?}");
    assert_eq!(submitter.submissions().len(), 1);
}

// Scenario C: clear resets to service defaults with placeholder uploads in
// both passes.
#[tokio::test]
async fn clear_resets_with_placeholders_in_both_passes() {
    let submitter = ScriptedSubmitter::new();
    submitter.push_response(200, "Successfully deleted");
    submitter.push_response(200, "You will be redirected");

    let run = RunConfig::new(RunAction::Clear, None).expect("run config");
    let mut out = Vec::new();
    let summary = orchestrator(submitter.clone())
        .execute(&run, &[record("lab-1")], &mut out)
        .await
        .expect("run should succeed");

    assert_eq!(summary.submissions, 2);
    assert_eq!(summary.deleted, 1);
    assert_eq!(summary.created, 1);

    let submissions = submitter.submissions();
    let urls = submissions
        .iter()
        .map(|submission| submission.url.as_str())
        .collect::<Vec<_>>();
    assert_eq!(
        urls,
        [
            format!("{SERVICE_URL}/delete"),
            format!("{SERVICE_URL}/create")
        ]
    );
    for submission in &submissions {
        assert_eq!(file_part_names(submission), REQUIRED_DATASETS);
        assert_all_file_parts_empty(submission);
    }
}

#[tokio::test]
async fn create_with_directory_attaches_only_discovered_datasets() {
    let dir = TempDir::new().expect("temp dir");
    let nested = dir.path().join("exports");
    fs::create_dir_all(&nested).expect("nested dir");
    fs::write(nested.join("labels.csv"), "role,loc\n").expect("labels");
    fs::write(dir.path().join("vens.csv"), "hostname\nweb-1\n").expect("vens");
    let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf8 dir");

    let submitter = ScriptedSubmitter::new();
    submitter.push_response(200, "You will be redirected");

    let run = RunConfig::new(RunAction::Create, Some(root)).expect("run config");
    let mut out = Vec::new();
    orchestrator(submitter.clone())
        .execute(&run, &[record("lab-1")], &mut out)
        .await
        .expect("run should succeed");

    let submissions = submitter.submissions();
    let submission = submissions.first().expect("one submission");
    assert_eq!(
        file_part_names(submission),
        ["vens.csv", "labels.csv"],
        "discovered subset in canonical order"
    );

    let parts = submission.parts();
    let vens = parts
        .iter()
        .find(|part| part.name == "vens.csv")
        .expect("vens part");
    assert_eq!(vens.payload, b"hostname\nweb-1\n");
}
