//! jira-rest - a typed async client for the JIRA REST API.
//!
//! Endpoint methods live on [`JiraClient`]. Every call either returns a typed
//! value or an [`ApiError`](api::ApiError) carrying the status code, the best
//! available server message and any field-level validation errors. List
//! endpoints return a [`Page`](api::Page) that can be continued with
//! [`Page::next_page`](api::Page::next_page).

pub mod api;
pub mod config;
pub mod error;
pub mod logging;

pub use api::JiraClient;
pub use config::{Config, Profile, Settings};
pub use error::{Error, Result};
