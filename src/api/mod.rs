//! JIRA API client and types.
//!
//! The pieces, leaf first: [`timestamp`] converts JIRA's date format,
//! [`Envelope`] decodes a raw response into a success or error body,
//! [`policy`] turns an envelope into a value or an [`ApiError`], and [`Page`]
//! tracks offset pagination. [`JiraClient`] ties them to a [`Transport`].

mod auth;
mod client;
mod envelope;
pub mod error;
mod page;
pub mod policy;
mod query;
pub mod timestamp;
mod transport;
pub mod types;

pub use auth::{delete_token, get_token, store_token, Auth, TOKEN_ENV_VAR};
pub use client::JiraClient;
pub use envelope::{Envelope, Outcome};
pub use error::{ApiError, ErrorDetails, ErrorResponse, JiraError, Result};
pub use page::{Page, PageRequest, DEFAULT_PAGE_SIZE};
pub use policy::ExpectedStatus;
pub use query::{BoardQuery, IssueQuery, SprintQuery};
pub use timestamp::TimestampError;
pub use transport::{HttpRequest, RawResponse, ReqwestTransport, Transport, DEFAULT_TIMEOUT_SECS};
pub use types::{Board, Comment, CreateIssueRequest, CreatedIssue, CurrentUser, Issue, Sprint};
