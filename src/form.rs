//! Multipart form assembly for instance submissions.
//!
//! The remote service accepts `multipart/form-data` uploads only. Each
//! submission carries every instance attribute as a text field, in canonical
//! order, followed by one file part per resolved dataset. File parts are
//! either streamed from the operator's dataset directory or uploaded with a
//! zero-length payload so the service substitutes its own defaults.

use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use thiserror::Error;
use uuid::Uuid;

use crate::record::InstanceRecord;

/// A finalised multipart request body and the header that describes it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FormBody {
    /// The complete multipart payload, boundary markers included.
    pub bytes: Vec<u8>,
    /// `Content-Type` header value carrying the boundary.
    pub content_type: String,
}

/// Errors raised while assembling a multipart form.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum FormError {
    /// Raised when a dataset file the scanner reported as present cannot be
    /// read back. The submission must not proceed with a silently incomplete
    /// upload, so this aborts the build.
    #[error("cannot read dataset file {path}: {message}")]
    DatasetUnreadable {
        /// Full path of the unreadable dataset file.
        path: Utf8PathBuf,
        /// Operating system error message.
        message: String,
    },
}

/// Builds the multipart body for one instance submission.
///
/// Text fields come first, one per record attribute in canonical order
/// (empty values included), then one file part per name in `file_names`.
/// With `source_dir` set the file contents are read from `source_dir/name`;
/// without it every file part is a zero-length placeholder. The caller is
/// responsible for passing `file_names` in canonical dataset order.
///
/// # Errors
///
/// Returns [`FormError::DatasetUnreadable`] when a sourced dataset file
/// cannot be read.
pub fn build_form(
    record: &InstanceRecord,
    file_names: &[&str],
    source_dir: Option<&Utf8Path>,
) -> Result<FormBody, FormError> {
    let boundary = format!("----autovaas-{}", Uuid::new_v4().simple());
    let mut bytes = Vec::new();

    for (name, value) in record.form_fields() {
        append_text_field(&mut bytes, &boundary, name, value);
    }

    for name in file_names.iter().copied() {
        let payload = match source_dir {
            Some(dir) => {
                let path = dir.join(name);
                fs::read(&path).map_err(|err| FormError::DatasetUnreadable {
                    path,
                    message: err.to_string(),
                })?
            }
            None => Vec::new(),
        };
        append_file_field(&mut bytes, &boundary, name, &payload);
    }

    bytes.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());

    Ok(FormBody {
        bytes,
        content_type: format!("multipart/form-data; boundary={boundary}"),
    })
}

fn append_text_field(bytes: &mut Vec<u8>, boundary: &str, name: &str, value: &str) {
    bytes.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
        )
        .as_bytes(),
    );
}

fn append_file_field(bytes: &mut Vec<u8>, boundary: &str, name: &str, payload: &[u8]) {
    bytes.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"; \
             filename=\"{name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    bytes.extend_from_slice(payload);
    bytes.extend_from_slice(b"\r\n");
}
