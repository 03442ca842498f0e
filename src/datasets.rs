//! Canonical dataset files and the directory scanner that resolves them.
//!
//! The remote service ingests up to thirteen CSV datasets per instance. A run
//! either uploads placeholders for all of them (the service then applies its
//! own defaults) or sources real files from an operator-supplied directory.
//! The scanner walks that directory and reports which canonical names exist.

use std::collections::HashSet;

use camino::{Utf8Path, Utf8PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// The thirteen canonical dataset filenames, in upload order.
pub const REQUIRED_DATASETS: [&str; 13] = [
    "vens.csv",
    "processes.csv",
    "traffic.csv",
    "wklds.csv",
    "iplists.csv",
    "svcs.csv",
    "svcs_meta.csv",
    "labeldimensions.csv",
    "labels.csv",
    "rulesets.csv",
    "rules.csv",
    "denyrules.csv",
    "adgroups.csv",
];

/// Result of scanning a dataset directory.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ScanReport {
    /// Canonical dataset names found under the root, in [`REQUIRED_DATASETS`]
    /// order regardless of where the walk encountered them.
    pub matched: Vec<&'static str>,
    /// Entries the walk could not inspect. The scan is best-effort: a
    /// partially inaccessible tree still yields whatever is reachable.
    pub warnings: Vec<String>,
}

/// Errors raised by the directory scanner.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum ScanError {
    /// Raised when the scan root itself cannot be opened.
    #[error("cannot scan dataset directory {root}: {message}")]
    RootUnreadable {
        /// Directory the operator asked to scan.
        root: Utf8PathBuf,
        /// Operating system error message.
        message: String,
    },
}

/// Scans `root` recursively for the canonical dataset files.
///
/// A regular file anywhere under `root` whose base name exactly matches one
/// of [`REQUIRED_DATASETS`] marks that dataset as present. Directories and
/// unrelated files are skipped. Errors on individual entries are collected as
/// warnings without aborting the walk.
///
/// # Errors
///
/// Returns [`ScanError::RootUnreadable`] when the root itself is missing or
/// cannot be opened; deeper failures only produce warnings.
pub fn scan_datasets(root: &Utf8Path) -> Result<ScanReport, ScanError> {
    let mut found: HashSet<&'static str> = HashSet::new();
    let mut warnings = Vec::new();

    for entry in WalkDir::new(root.as_std_path()).follow_links(false) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) if err.depth() == 0 => {
                return Err(ScanError::RootUnreadable {
                    root: root.to_owned(),
                    message: err.to_string(),
                });
            }
            Err(err) => {
                warnings.push(format!("skipping unreadable entry: {err}"));
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        if let Some(name) = entry.file_name().to_str()
            && let Some(required) = REQUIRED_DATASETS.iter().copied().find(|dataset| *dataset == name)
        {
            found.insert(required);
        }
    }

    // Canonical order, not encounter order.
    let matched = REQUIRED_DATASETS
        .iter()
        .copied()
        .filter(|name| found.contains(name))
        .collect();

    Ok(ScanReport { matched, warnings })
}
