//! Typed view of a raw HTTP response.
//!
//! An [`Envelope`] records the status code and either the decoded success
//! body or the decoded error body. Decoding is best-effort: a body that does
//! not match the declared shape is recorded as absent, never raised, so the
//! status code always survives to the error policy.

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::error::ErrorResponse;
use super::policy::ExpectedStatus;
use super::transport::RawResponse;

/// Result of a single call, before the status policy is applied.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T, E> {
    /// The status was in the success set. `None` if the body was empty or
    /// could not be decoded.
    Success(Option<T>),
    /// The status was outside the success set. `None` if the body was empty
    /// or not a recognizable error shape.
    Failure(Option<E>),
}

/// A decoded response tagged with its status code.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope<T, E = ErrorResponse> {
    status_code: u16,
    outcome: Outcome<T, E>,
}

impl<T, E> Envelope<T, E> {
    /// Create an envelope from an already-decoded outcome.
    pub fn new(status_code: u16, outcome: Outcome<T, E>) -> Self {
        Self {
            status_code,
            outcome,
        }
    }

    /// The transport status code.
    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    /// Whether the status was outside the success set.
    pub fn has_error(&self) -> bool {
        matches!(self.outcome, Outcome::Failure(_))
    }

    /// The decoded success body, if any.
    pub fn success_value(&self) -> Option<&T> {
        match &self.outcome {
            Outcome::Success(value) => value.as_ref(),
            Outcome::Failure(_) => None,
        }
    }

    /// The decoded error body, if any.
    pub fn error_value(&self) -> Option<&E> {
        match &self.outcome {
            Outcome::Failure(value) => value.as_ref(),
            Outcome::Success(_) => None,
        }
    }

    pub fn outcome(&self) -> &Outcome<T, E> {
        &self.outcome
    }

    pub fn into_outcome(self) -> Outcome<T, E> {
        self.outcome
    }

    pub(crate) fn into_success_value(self) -> Option<T> {
        match self.outcome {
            Outcome::Success(value) => value,
            Outcome::Failure(_) => None,
        }
    }
}

impl<T: DeserializeOwned, E: DeserializeOwned> Envelope<T, E> {
    /// Decode a raw response.
    ///
    /// `success` decides which status codes are decoded as `T`; everything
    /// else is decoded as `E`.
    pub fn from_response(response: &RawResponse, success: &ExpectedStatus) -> Self {
        let status_code = response.status;

        let outcome = if success.contains(status_code) {
            Outcome::Success(decode_success(response))
        } else {
            Outcome::Failure(decode_failure(response))
        };

        Self {
            status_code,
            outcome,
        }
    }
}

fn decode_success<T: DeserializeOwned>(response: &RawResponse) -> Option<T> {
    if response.is_empty() {
        return None;
    }

    match decode_body(response) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(
                status = response.status,
                content_type = response.content_type.as_deref().unwrap_or("unknown"),
                "Failed to decode response body: {}",
                e
            );
            None
        }
    }
}

fn decode_failure<E: DeserializeOwned>(response: &RawResponse) -> Option<E> {
    if response.is_empty() {
        return None;
    }

    decode_body(response)
        .map_err(|e| debug!(status = response.status, "Error body not recognized: {}", e))
        .ok()
}

/// Decode a body according to its content type.
///
/// The body is parsed as JSON first. A `text/*` body that is not valid JSON
/// for `T` is then offered to `T` as a JSON string, so text endpoints can
/// target `String`.
fn decode_body<T: DeserializeOwned>(response: &RawResponse) -> serde_json::Result<T> {
    match serde_json::from_slice(&response.body) {
        Ok(value) => Ok(value),
        Err(e) if is_text(response.content_type.as_deref()) => {
            let text = String::from_utf8_lossy(&response.body).into_owned();
            serde_json::from_value(serde_json::Value::String(text)).map_err(|_| e)
        }
        Err(e) => Err(e),
    }
}

fn is_text(content_type: Option<&str>) -> bool {
    content_type
        .map(|ct| ct.trim().to_ascii_lowercase().starts_with("text/"))
        .unwrap_or(false)
}
