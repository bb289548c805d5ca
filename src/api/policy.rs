//! Status code policy for JIRA responses.
//!
//! Endpoint methods hand an [`Envelope`] to one of the functions here to
//! either obtain the decoded value or a uniform [`ApiError::Jira`].

use std::fmt;

use tracing::debug;

use super::envelope::Envelope;
use super::error::{ApiError, ErrorDetails, JiraError, Result};

/// The set of status codes an endpoint accepts as success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpectedStatus {
    /// Any 2xx status.
    Success,
    /// Exactly this status.
    Code(u16),
    /// Any of these statuses.
    OneOf(Vec<u16>),
}

impl ExpectedStatus {
    /// 200, the convention for reads.
    pub const OK: Self = Self::Code(200);
    /// 201, the convention for creates.
    pub const CREATED: Self = Self::Code(201);
    /// 204, the convention for updates, deletes and transitions.
    pub const NO_CONTENT: Self = Self::Code(204);

    /// Accept any of the given codes.
    pub fn one_of(codes: impl IntoIterator<Item = u16>) -> Self {
        Self::OneOf(codes.into_iter().collect())
    }

    /// Whether `status_code` counts as success.
    pub fn contains(&self, status_code: u16) -> bool {
        match self {
            Self::Success => (200..300).contains(&status_code),
            Self::Code(code) => *code == status_code,
            Self::OneOf(codes) => codes.contains(&status_code),
        }
    }
}

impl Default for ExpectedStatus {
    fn default() -> Self {
        Self::Success
    }
}

impl fmt::Display for ExpectedStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "2xx"),
            Self::Code(code) => write!(f, "{}", code),
            Self::OneOf(codes) => {
                let codes: Vec<String> = codes.iter().map(u16::to_string).collect();
                write!(f, "{}", codes.join("|"))
            }
        }
    }
}

/// Return the success value, or raise a [`JiraError`].
///
/// With `expected`, success means the status code is in that set whatever
/// the envelope recorded. Without it, success means the envelope has no
/// error. The returned value is `None` when the body was empty or could not
/// be decoded.
pub fn unwrap_or_raise<T, E: ErrorDetails>(
    envelope: Envelope<T, E>,
    expected: Option<&ExpectedStatus>,
) -> Result<Option<T>> {
    let accepted = match expected {
        Some(expected) => expected.contains(envelope.status_code()),
        None => !envelope.has_error(),
    };

    if accepted {
        return Ok(envelope.into_success_value());
    }

    Err(raise(envelope, expected))
}

/// Like [`unwrap_or_raise`], but a success without a body is an error.
///
/// # Errors
///
/// Returns [`ApiError::InvalidResponse`] when the status is accepted but the
/// body was empty or not decodable.
pub fn require<T, E: ErrorDetails>(
    envelope: Envelope<T, E>,
    expected: Option<&ExpectedStatus>,
) -> Result<T> {
    let status_code = envelope.status_code();
    unwrap_or_raise(envelope, expected)?.ok_or_else(|| {
        ApiError::InvalidResponse(format!("HTTP {} response carried no usable body", status_code))
    })
}

/// Check the status code and discard any body.
///
/// Used by endpoints that return no content.
pub fn assert_status<T, E: ErrorDetails>(
    envelope: Envelope<T, E>,
    expected: &ExpectedStatus,
) -> Result<()> {
    if expected.contains(envelope.status_code()) {
        Ok(())
    } else {
        Err(raise(envelope, Some(expected)))
    }
}

/// Build the message for a failed response.
///
/// Priority: joined `errorMessages`, then `message`, then the status code.
pub fn compose_message<E: ErrorDetails>(status_code: u16, details: Option<&E>) -> String {
    if let Some(details) = details {
        let messages = details.error_messages();
        if !messages.is_empty() {
            return messages.join(", ");
        }
        if let Some(message) = details.message().filter(|m| !m.is_empty()) {
            return message.to_string();
        }
    }
    status_code.to_string()
}

fn raise<T, E: ErrorDetails>(envelope: Envelope<T, E>, expected: Option<&ExpectedStatus>) -> ApiError {
    let status_code = envelope.status_code();
    let details = envelope.error_value();
    let message = compose_message(status_code, details);
    let errors = details.map(ErrorDetails::field_errors).unwrap_or_default();

    debug!(
        status_code,
        expected = %expected.cloned().unwrap_or_default(),
        message = %message,
        "response rejected"
    );

    ApiError::Jira(JiraError {
        status_code,
        message,
        errors,
    })
}
