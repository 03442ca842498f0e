//! HTTP submission of assembled multipart forms.
//!
//! The submitter posts a form to the remote endpoint and hands back the raw
//! status and body. It deliberately does not interpret the response; turning
//! the service's free-text pages into outcomes is the classifier's job.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use thiserror::Error;

use crate::form::FormBody;

const HTTP_TIMEOUT: Duration = Duration::from_secs(60);

/// Raw response from one submission.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RawResponse {
    /// HTTP status code returned by the service.
    pub status: u16,
    /// Response body decoded as text.
    pub body: String,
}

/// Errors raised while submitting a form.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum SubmitError {
    /// Raised when the HTTP client cannot be constructed.
    #[error("cannot build HTTP client: {message}")]
    Client {
        /// Error message from the client builder.
        message: String,
    },
    /// Raised when the request cannot be established or sent. There is no
    /// retry; a broken connection aborts the run.
    #[error("transport error: {message}")]
    Transport {
        /// Error message from the transport layer.
        message: String,
    },
}

/// Future returned by submitter operations.
pub type SubmitFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

/// Minimal interface for posting a multipart form to an endpoint.
pub trait Submitter {
    /// Error type returned by the submitter.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Posts `form` to `url` and returns the raw status and body.
    fn submit<'a>(&'a self, url: &'a str, form: FormBody)
    -> SubmitFuture<'a, RawResponse, Self::Error>;
}

/// Submitter backed by a real HTTPS client.
///
/// Certificate verification is disabled: the VaaS endpoint presents a
/// self-signed internal certificate, and trusting it is an explicit decision
/// made here rather than a transport default.
#[derive(Clone, Debug)]
pub struct HttpSubmitter {
    client: reqwest::Client,
}

impl HttpSubmitter {
    /// Creates a submitter with TLS verification disabled and a fixed
    /// request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`SubmitError::Client`] when the underlying client cannot be
    /// constructed.
    pub fn new() -> Result<Self, SubmitError> {
        let client = reqwest::Client::builder()
            .danger_accept_invalid_certs(true)
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|err| SubmitError::Client {
                message: err.to_string(),
            })?;
        Ok(Self { client })
    }

    async fn post_form(&self, url: &str, form: FormBody) -> Result<RawResponse, SubmitError> {
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, form.content_type)
            .body(form.bytes)
            .send()
            .await
            .map_err(|err| SubmitError::Transport {
                message: err.to_string(),
            })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|err| SubmitError::Transport {
                message: err.to_string(),
            })?;

        Ok(RawResponse { status, body })
    }
}

impl Submitter for HttpSubmitter {
    type Error = SubmitError;

    fn submit<'a>(
        &'a self,
        url: &'a str,
        form: FormBody,
    ) -> SubmitFuture<'a, RawResponse, Self::Error> {
        Box::pin(self.post_form(url, form))
    }
}
