//! Search parameters for paginated endpoints.
//!
//! Each query is echoed back inside the [`Page`](super::Page) it produced,
//! so the next page is requested with the same query and a new offset.

/// Parameters for `GET /rest/api/3/search`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueQuery {
    /// The JQL query string.
    pub jql: String,
    /// Fields to return; empty means the server default.
    pub fields: Vec<String>,
    /// Entities to expand (e.g. "changelog").
    pub expand: Vec<String>,
}

impl IssueQuery {
    pub fn new(jql: impl Into<String>) -> Self {
        Self {
            jql: jql.into(),
            ..Default::default()
        }
    }

    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn expand<I, S>(mut self, expand: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.expand = expand.into_iter().map(Into::into).collect();
        self
    }

    pub(crate) fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("jql", self.jql.clone())];
        if !self.fields.is_empty() {
            pairs.push(("fields", self.fields.join(",")));
        }
        if !self.expand.is_empty() {
            pairs.push(("expand", self.expand.join(",")));
        }
        pairs
    }
}

/// Parameters for `GET /rest/agile/1.0/board`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardQuery {
    /// Only boards for this project key or ID.
    pub project_key_or_id: Option<String>,
    /// "scrum", "kanban" or "simple".
    pub board_type: Option<String>,
    /// Boards whose name contains this text.
    pub name: Option<String>,
}

impl BoardQuery {
    pub fn for_project(project_key_or_id: impl Into<String>) -> Self {
        Self {
            project_key_or_id: Some(project_key_or_id.into()),
            ..Default::default()
        }
    }

    pub(crate) fn query_pairs(&self) -> Vec<(&'static str, String)> {
        [
            ("projectKeyOrId", &self.project_key_or_id),
            ("type", &self.board_type),
            ("name", &self.name),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.clone().map(|v| (key, v)))
        .collect()
    }
}

/// Parameters for `GET /rest/agile/1.0/board/{boardId}/sprint`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SprintQuery {
    pub board_id: u64,
    /// Comma-separated states: "future", "active", "closed".
    pub state: Option<String>,
}

impl SprintQuery {
    pub fn new(board_id: u64) -> Self {
        Self {
            board_id,
            state: None,
        }
    }

    pub fn state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }
}
