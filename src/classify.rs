//! Classification of the service's free-text responses.
//!
//! The VaaS service reports business outcomes only through human-readable
//! page content; the HTTP status stays 200 whether or not the operation took
//! effect. The marker substrings below are therefore a compatibility contract
//! with the live service's response text and must be preserved verbatim.
//! Anything the markers do not match falls through to [`Outcome::Ambiguous`].

use std::fmt;

/// Wire-level actions the service exposes. The composite `clear` is a local
/// composition of these two and never reaches the wire itself.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Action {
    /// Provision a new instance via the `/create` endpoint.
    Create,
    /// Remove an instance via the `/delete` endpoint.
    Delete,
}

impl Action {
    /// Returns the URL path suffix for this action.
    #[must_use]
    pub const fn endpoint_path(self) -> &'static str {
        match self {
            Self::Create => "/create",
            Self::Delete => "/delete",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create => f.write_str("create"),
            Self::Delete => f.write_str("delete"),
        }
    }
}

/// Page text the service renders after a successful deletion.
pub const DELETE_SUCCESS_MARKER: &str = "Successfully deleted";

/// Page text the service renders on the post-creation redirect page.
pub const CREATE_SUCCESS_MARKER: &str = "You will be redirected";

/// Business-level outcome of one submission.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Outcome {
    /// The response matched the success marker for the submitted action.
    Success,
    /// The service returned a non-200 status; carries the body verbatim.
    Failure(String),
    /// A 200 response whose text matched no known marker. Typically means
    /// the instance did not exist (delete) or already existed (create).
    Ambiguous,
}

/// Classifies a raw response for the given action, first match wins.
#[must_use]
pub fn classify(status: u16, body: &str, action: Action) -> Outcome {
    if status != 200 {
        return Outcome::Failure(body.to_owned());
    }
    match action {
        Action::Delete if body.contains(DELETE_SUCCESS_MARKER) => Outcome::Success,
        Action::Create if body.contains(CREATE_SUCCESS_MARKER) => Outcome::Success,
        _ => Outcome::Ambiguous,
    }
}
