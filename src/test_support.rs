//! Test support utilities shared across unit and integration tests.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::form::FormBody;
use crate::submit::{RawResponse, SubmitError, SubmitFuture, Submitter};

/// Scripted submitter that returns pre-seeded responses in FIFO order.
///
/// Used to drive deterministic submission outcomes without a network.
#[derive(Clone, Debug, Default)]
pub struct ScriptedSubmitter {
    responses: Rc<RefCell<VecDeque<Result<RawResponse, SubmitError>>>>,
    submissions: Rc<RefCell<Vec<RecordedSubmission>>>,
}

/// Records a single submission made through [`ScriptedSubmitter`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RecordedSubmission {
    /// Target URL the form was posted to.
    pub url: String,
    /// Content-type header, boundary included.
    pub content_type: String,
    /// Raw multipart body.
    pub bytes: Vec<u8>,
}

impl RecordedSubmission {
    /// Splits the recorded body into its multipart parts.
    #[must_use]
    pub fn parts(&self) -> Vec<FormPart> {
        split_form_parts(&self.bytes, &self.content_type)
    }
}

impl ScriptedSubmitter {
    /// Creates a new submitter with no queued responses.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of all submissions recorded so far.
    #[must_use]
    pub fn submissions(&self) -> Vec<RecordedSubmission> {
        self.submissions.borrow().clone()
    }

    /// Queues a response with the given status and body text.
    pub fn push_response(&self, status: u16, body: impl Into<String>) {
        self.responses.borrow_mut().push_back(Ok(RawResponse {
            status,
            body: body.into(),
        }));
    }

    /// Queues a transport-level failure.
    pub fn push_transport_error(&self, message: impl Into<String>) {
        self.responses
            .borrow_mut()
            .push_back(Err(SubmitError::Transport {
                message: message.into(),
            }));
    }
}

impl Submitter for ScriptedSubmitter {
    type Error = SubmitError;

    fn submit<'a>(
        &'a self,
        url: &'a str,
        form: FormBody,
    ) -> SubmitFuture<'a, RawResponse, Self::Error> {
        self.submissions.borrow_mut().push(RecordedSubmission {
            url: url.to_owned(),
            content_type: form.content_type.clone(),
            bytes: form.bytes,
        });
        let result = self.responses.borrow_mut().pop_front().unwrap_or_else(|| {
            Err(SubmitError::Transport {
                message: String::from("no scripted response available"),
            })
        });
        Box::pin(async move { result })
    }
}

/// One parsed part of a multipart body.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FormPart {
    /// Part name from the content-disposition header.
    pub name: String,
    /// Submitted filename, present only for file parts.
    pub filename: Option<String>,
    /// Part payload with the trailing CRLF removed.
    pub payload: Vec<u8>,
}

/// Extracts the boundary from a `multipart/form-data` content-type value.
#[must_use]
pub fn form_boundary(content_type: &str) -> Option<&str> {
    content_type.strip_prefix("multipart/form-data; boundary=")
}

/// Parses a multipart body into its parts, in emission order.
///
/// Malformed segments are skipped rather than reported; assertions on the
/// parsed parts will catch anything structurally wrong.
#[must_use]
pub fn split_form_parts(bytes: &[u8], content_type: &str) -> Vec<FormPart> {
    let Some(boundary) = form_boundary(content_type) else {
        return Vec::new();
    };
    let text = String::from_utf8_lossy(bytes);
    let delimiter = format!("--{boundary}");

    let mut parts = Vec::new();
    for segment in text.split(delimiter.as_str()) {
        // Skips the empty preamble and the trailing "--" terminator.
        let Some(section) = segment.strip_prefix("\r\n") else {
            continue;
        };
        let Some((headers, raw_payload)) = section.split_once("\r\n\r\n") else {
            continue;
        };
        let Some(name) = disposition_attribute(headers, "name") else {
            continue;
        };
        let payload = raw_payload.strip_suffix("\r\n").unwrap_or(raw_payload);
        parts.push(FormPart {
            name: name.to_owned(),
            filename: disposition_attribute(headers, "filename").map(str::to_owned),
            payload: payload.as_bytes().to_vec(),
        });
    }
    parts
}

/// Looks up a quoted attribute in a content-disposition header block.
///
/// The leading `"; "` in the marker keeps `name` from matching inside
/// `filename`.
fn disposition_attribute<'a>(headers: &'a str, key: &str) -> Option<&'a str> {
    let marker = format!("; {key}=\"");
    let (_, rest) = headers.split_once(marker.as_str())?;
    rest.split('"').next()
}
