//! JIRA API request and response types.
//!
//! These types model the JIRA REST API v3 and Agile 1.0 payloads used by
//! [`JiraClient`](super::JiraClient). Timestamp fields use the JIRA wire
//! format via [`timestamp::jira`](super::timestamp::jira).

use std::fmt;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use super::timestamp::jira as jira_timestamp;

fn default_true() -> bool {
    true
}

/// The current authenticated user.
///
/// Returned by `GET /rest/api/3/myself`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    pub account_id: String,
    pub display_name: String,
    /// May be empty if hidden by the user's privacy settings.
    #[serde(default)]
    pub email_address: String,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(default)]
    pub time_zone: Option<String>,
}

/// A JIRA issue.
///
/// Returned by `GET /rest/api/3/issue/{issueKey}` or as part of search results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    pub id: String,
    /// The issue key (e.g., "PROJ-123").
    pub key: String,
    #[serde(rename = "self")]
    pub self_url: String,
    pub fields: IssueFields,
}

impl Issue {
    pub fn summary(&self) -> &str {
        &self.fields.summary
    }

    pub fn status(&self) -> &str {
        &self.fields.status.name
    }

    /// Get the assignee display name, or "Unassigned" if not set.
    pub fn assignee_name(&self) -> &str {
        self.fields
            .assignee
            .as_ref()
            .map(|u| u.display_name.as_str())
            .unwrap_or("Unassigned")
    }

    pub fn project_key(&self) -> Option<&str> {
        self.fields.project.as_ref().map(|p| p.key.as_str())
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.key, self.fields.summary)
    }
}

/// Issue fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueFields {
    pub summary: String,
    /// The description in Atlassian Document Format.
    #[serde(default)]
    pub description: Option<Value>,
    pub status: Status,
    pub issuetype: IssueType,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub assignee: Option<User>,
    #[serde(default)]
    pub reporter: Option<User>,
    #[serde(default)]
    pub project: Option<Project>,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default, with = "jira_timestamp::option", skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<FixedOffset>>,
    #[serde(default, with = "jira_timestamp::option", skip_serializing_if = "Option::is_none")]
    pub updated: Option<DateTime<FixedOffset>>,
    #[serde(
        default,
        rename = "resolutiondate",
        with = "jira_timestamp::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub resolution_date: Option<DateTime<FixedOffset>>,
    /// Due date as `yyyy-MM-dd`; JIRA sends it without a time component.
    #[serde(default)]
    pub duedate: Option<String>,
}

/// Issue status.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Status {
    pub id: String,
    /// The status name (e.g., "To Do", "In Progress", "Done").
    pub name: String,
    #[serde(default)]
    pub status_category: Option<StatusCategory>,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Groups statuses into to-do, in-progress and done.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCategory {
    pub id: u32,
    pub key: String,
    pub name: String,
}

/// Issue type (Bug, Story, Task, Epic, etc.).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueType {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub subtask: bool,
}

/// Issue priority.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Priority {
    pub id: String,
    pub name: String,
}

/// A JIRA user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub account_id: String,
    pub display_name: String,
    #[serde(default)]
    pub email_address: Option<String>,
    #[serde(default = "default_true")]
    pub active: bool,
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name)
    }
}

/// A JIRA project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    /// The project key (e.g., "PROJ").
    pub key: String,
    pub name: String,
}

/// A comment on an issue.
///
/// Returned in pages by `GET /rest/api/3/issue/{issueKey}/comment`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    /// The body in Atlassian Document Format.
    pub body: Value,
    #[serde(default)]
    pub author: Option<User>,
    #[serde(with = "jira_timestamp")]
    pub created: DateTime<FixedOffset>,
    #[serde(default, with = "jira_timestamp::option", skip_serializing_if = "Option::is_none")]
    pub updated: Option<DateTime<FixedOffset>>,
}

/// Request body for `POST /rest/api/3/issue/{issueKey}/comment`.
#[derive(Debug, Clone, Serialize)]
pub struct AddCommentRequest {
    pub body: Value,
}

impl AddCommentRequest {
    /// Wrap plain text in a single-paragraph ADF document.
    pub fn plain_text(text: &str) -> Self {
        Self {
            body: json!({
                "type": "doc",
                "version": 1,
                "content": [{
                    "type": "paragraph",
                    "content": [{"type": "text", "text": text}]
                }]
            }),
        }
    }
}

/// A workflow transition available for an issue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transition {
    pub id: String,
    pub name: String,
    /// The status the issue moves to.
    #[serde(default)]
    pub to: Option<Status>,
}

/// Returned by `GET /rest/api/3/issue/{issueKey}/transitions`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionsResponse {
    #[serde(default)]
    pub transitions: Vec<Transition>,
}

/// Request body for `POST /rest/api/3/issue/{issueKey}/transitions`.
#[derive(Debug, Clone, Serialize)]
pub struct TransitionRequest {
    pub transition: TransitionId,
}

#[derive(Debug, Clone, Serialize)]
pub struct TransitionId {
    pub id: String,
}

/// Request body for `PUT /rest/api/3/issue/{issueKey}/assignee`.
///
/// A `None` account ID unassigns the issue.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssigneeRequest {
    pub account_id: Option<String>,
}

/// Request body for `POST /rest/api/3/issue`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CreateIssueRequest {
    pub fields: Map<String, Value>,
}

impl CreateIssueRequest {
    /// The minimum JIRA accepts: project, issue type and summary.
    pub fn new(project_key: &str, issue_type: &str, summary: &str) -> Self {
        Self::default()
            .field("project", json!({"key": project_key}))
            .field("issuetype", json!({"name": issue_type}))
            .field("summary", json!(summary))
    }

    /// Set an arbitrary field, including custom fields.
    pub fn field(mut self, name: &str, value: Value) -> Self {
        self.fields.insert(name.to_string(), value);
        self
    }
}

/// Returned by `POST /rest/api/3/issue`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedIssue {
    pub id: String,
    pub key: String,
    #[serde(rename = "self")]
    pub self_url: String,
}

/// Request body for `PUT /rest/api/3/issue/{issueKey}`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct IssueUpdateRequest {
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub fields: Map<String, Value>,
}

impl IssueUpdateRequest {
    pub fn field(mut self, name: &str, value: Value) -> Self {
        self.fields.insert(name.to_string(), value);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// An agile board.
///
/// Returned in pages by `GET /rest/agile/1.0/board`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Board {
    pub id: u64,
    pub name: String,
    /// "scrum", "kanban" or "simple".
    #[serde(rename = "type")]
    pub board_type: String,
    #[serde(default)]
    pub location: Option<BoardLocation>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardLocation {
    #[serde(default)]
    pub project_key: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
}

/// A sprint on a scrum board.
///
/// Returned in pages by `GET /rest/agile/1.0/board/{boardId}/sprint`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sprint {
    pub id: u64,
    pub name: String,
    /// "future", "active" or "closed".
    pub state: String,
    #[serde(default, with = "jira_timestamp::option", skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<FixedOffset>>,
    #[serde(default, with = "jira_timestamp::option", skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<FixedOffset>>,
    #[serde(default, with = "jira_timestamp::option", skip_serializing_if = "Option::is_none")]
    pub complete_date: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub goal: Option<String>,
}

/// Request body for `POST /rest/api/3/issue/{issueKey}/watchers`: the bare
/// account ID as a JSON string.
pub(crate) fn watcher_body(account_id: &str) -> Value {
    Value::String(account_id.to_string())
}
