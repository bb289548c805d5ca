//! JIRA API client implementation.
//!
//! Every endpoint method follows the same path: build an [`HttpRequest`],
//! send it through the injected [`Transport`], decode the reply into an
//! [`Envelope`] and let the status [`policy`] decide between the value and
//! an [`ApiError`]. List endpoints wrap the result in a [`Page`] that
//! remembers the query it came from.

use std::sync::Arc;

use serde::de::{DeserializeOwned, IgnoredAny};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument};

use super::auth::Auth;
use super::envelope::Envelope;
use super::error::{ApiError, Result};
use super::page::{Page, PageRequest, DEFAULT_PAGE_SIZE};
use super::policy::{self, ExpectedStatus};
use super::query::{BoardQuery, IssueQuery, SprintQuery};
use super::transport::{HttpRequest, ReqwestTransport, Transport};
use super::types::{
    watcher_body, AddCommentRequest, AssigneeRequest, Board, Comment, CreateIssueRequest,
    CreatedIssue, CurrentUser, Issue, IssueUpdateRequest, Sprint, Transition, TransitionId,
    TransitionRequest, TransitionsResponse,
};
use crate::config::{Config, ConfigError, Profile, Settings};

const API_BASE: &str = "/rest/api/3";
const AGILE_BASE: &str = "/rest/agile/1.0";

/// The JIRA API client.
///
/// Cheap to clone; clones share the transport. Calls observe the client's
/// cancellation token, see [`with_cancellation`](Self::with_cancellation).
/// [`first_page`](Self::first_page) uses the configured page size.
#[derive(Debug, Clone)]
pub struct JiraClient {
    transport: Arc<dyn Transport>,
    cancel: CancellationToken,
    page_size: u32,
}

impl JiraClient {
    /// Create a client over an existing transport.
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            cancel: CancellationToken::new(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Create a client from a profile and validate the connection.
    ///
    /// The API token comes from the OS keyring, or `JIRA_API_TOKEN`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No token can be found for the profile
    /// - The HTTP client cannot be built
    /// - Connection validation fails
    #[instrument(skip(profile, settings), fields(profile_name = %profile.name))]
    pub async fn connect(profile: &Profile, settings: &Settings) -> Result<Self> {
        info!("Creating JIRA client for profile");

        let auth = Auth::resolve(&profile.name, &profile.email)?;
        let transport = ReqwestTransport::with_timeout(&profile.url, auth, settings.timeout())?;
        let client = Self::new(Arc::new(transport)).with_page_size(settings.page_size);

        client.validate_connection().await?;

        info!("JIRA client created and connection validated");
        Ok(client)
    }

    /// Connect using a named profile from `config`, or its default profile.
    pub async fn from_config(config: &Config, profile_name: Option<&str>) -> crate::Result<Self> {
        let profile = match profile_name {
            Some(name) => config
                .profile(name)
                .ok_or_else(|| ConfigError::ProfileNotFound(name.to_string()))?,
            None => config.default_profile()?,
        };
        Ok(Self::connect(profile, &config.settings).await?)
    }

    /// Create a client with explicit credentials.
    ///
    /// Does NOT validate the connection.
    pub fn with_credentials(base_url: &str, email: &str, token: &str) -> Result<Self> {
        let transport = ReqwestTransport::new(base_url, Auth::new(email, token))?;
        Ok(Self::new(Arc::new(transport)))
    }

    /// A client sharing this transport whose calls stop when `token` fires.
    pub fn with_cancellation(&self, token: CancellationToken) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            cancel: token,
            page_size: self.page_size,
        }
    }

    /// Set the page size used by [`first_page`](Self::first_page).
    ///
    /// Zero falls back to the default size.
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = if page_size == 0 {
            DEFAULT_PAGE_SIZE
        } else {
            page_size
        };
        self
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// The first page of a list endpoint, at the configured page size.
    pub fn first_page(&self) -> PageRequest {
        PageRequest::first(self.page_size)
    }

    /// The token observed by this client's calls.
    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Validate the connection by calling the /myself endpoint.
    #[instrument(skip(self))]
    pub async fn validate_connection(&self) -> Result<CurrentUser> {
        debug!("Validating JIRA connection");

        let user = self.get_current_user().await.map_err(|e| {
            error!("Connection validation failed: {}", e);
            match e {
                ApiError::Network(_) => ApiError::ConnectionFailed(e.to_string()),
                e if e.is_unauthorized() => e,
                ApiError::Jira(_) => ApiError::ConnectionFailed(e.to_string()),
                e => e,
            }
        })?;

        info!("Connected as user: {}", user.display_name);
        Ok(user)
    }

    /// Get the current authenticated user.
    ///
    /// Calls `GET /rest/api/3/myself`.
    #[instrument(skip(self))]
    pub async fn get_current_user(&self) -> Result<CurrentUser> {
        let request = HttpRequest::get(format!("{}/myself", API_BASE));
        self.fetch(request, ExpectedStatus::OK).await
    }

    /// Get a single issue by key (e.g. "PROJ-123").
    #[instrument(skip(self), fields(issue_key = %key))]
    pub async fn get_issue(&self, key: &str) -> Result<Issue> {
        require_arg(key, "issue key")?;

        let issue: Issue = self
            .fetch(HttpRequest::get(issue_path(key, "")), ExpectedStatus::OK)
            .await?;

        debug!("Fetched issue: {}", issue.key);
        Ok(issue)
    }

    /// Search for issues using JQL.
    ///
    /// The returned page carries `query`; pass it back with
    /// [`Page::next_page`] to continue the search.
    #[instrument(skip(self, query), fields(jql = %query.jql, start_at = page.start_at))]
    pub async fn search_issues(
        &self,
        query: &IssueQuery,
        page: PageRequest,
    ) -> Result<Page<Issue, IssueQuery>> {
        let request = HttpRequest::get(format!("{}/search", API_BASE))
            .query_pairs(query.query_pairs())
            .query_pairs(page.query_pairs());

        let result = self.fetch_page(request, query.clone()).await?;
        debug!(
            "Found {} issues (total: {:?})",
            result.count(),
            result.total()
        );
        Ok(result)
    }

    /// Create an issue. JIRA answers 201 with the new key.
    #[instrument(skip(self, issue))]
    pub async fn create_issue(&self, issue: &CreateIssueRequest) -> Result<CreatedIssue> {
        let request = HttpRequest::post(format!("{}/issue", API_BASE)).json(issue)?;
        let created: CreatedIssue = self.fetch(request, ExpectedStatus::CREATED).await?;

        info!(issue_key = %created.key, "Created issue");
        Ok(created)
    }

    /// Update fields of an issue.
    #[instrument(skip(self, update), fields(issue_key = %key))]
    pub async fn update_issue(&self, key: &str, update: &IssueUpdateRequest) -> Result<()> {
        require_arg(key, "issue key")?;
        if update.is_empty() {
            return Err(ApiError::InvalidArgument(
                "update must change at least one field".to_string(),
            ));
        }

        let request = HttpRequest::put(issue_path(key, "")).json(update)?;
        self.execute(request, ExpectedStatus::NO_CONTENT).await
    }

    /// Delete an issue, optionally with its subtasks.
    #[instrument(skip(self), fields(issue_key = %key))]
    pub async fn delete_issue(&self, key: &str, delete_subtasks: bool) -> Result<()> {
        require_arg(key, "issue key")?;

        let mut request = HttpRequest::delete(issue_path(key, ""));
        if delete_subtasks {
            request = request.query("deleteSubtasks", true);
        }
        self.execute(request, ExpectedStatus::NO_CONTENT).await
    }

    /// Get the transitions available for an issue.
    #[instrument(skip(self), fields(issue_key = %key))]
    pub async fn get_transitions(&self, key: &str) -> Result<Vec<Transition>> {
        require_arg(key, "issue key")?;

        let response: TransitionsResponse = self
            .fetch(
                HttpRequest::get(issue_path(key, "/transitions")),
                ExpectedStatus::OK,
            )
            .await?;
        Ok(response.transitions)
    }

    /// Move an issue through a workflow transition.
    #[instrument(skip(self), fields(issue_key = %key))]
    pub async fn transition_issue(&self, key: &str, transition_id: &str) -> Result<()> {
        require_arg(key, "issue key")?;
        require_arg(transition_id, "transition id")?;

        let body = TransitionRequest {
            transition: TransitionId {
                id: transition_id.to_string(),
            },
        };
        let request = HttpRequest::post(issue_path(key, "/transitions")).json(&body)?;
        self.execute(request, ExpectedStatus::NO_CONTENT).await
    }

    /// Assign an issue, or unassign it with `None`.
    #[instrument(skip(self), fields(issue_key = %key))]
    pub async fn assign_issue(&self, key: &str, account_id: Option<&str>) -> Result<()> {
        require_arg(key, "issue key")?;

        let body = AssigneeRequest {
            account_id: account_id.map(str::to_string),
        };
        let request = HttpRequest::put(issue_path(key, "/assignee")).json(&body)?;
        self.execute(request, ExpectedStatus::NO_CONTENT).await
    }

    /// Add a watcher to an issue. Accepts 200 and 204 as success.
    #[instrument(skip(self), fields(issue_key = %key))]
    pub async fn add_watcher(&self, key: &str, account_id: &str) -> Result<()> {
        require_arg(key, "issue key")?;
        require_arg(account_id, "account id")?;

        let request =
            HttpRequest::post(issue_path(key, "/watchers")).json(&watcher_body(account_id))?;
        self.execute(request, ExpectedStatus::one_of([200, 204]))
            .await
    }

    /// Get one page of comments on an issue.
    ///
    /// The page carries the issue key as its search parameters.
    #[instrument(skip(self), fields(issue_key = %key, start_at = page.start_at))]
    pub async fn get_comments(&self, key: &str, page: PageRequest) -> Result<Page<Comment, String>> {
        require_arg(key, "issue key")?;

        let request = HttpRequest::get(issue_path(key, "/comment"))
            .query("orderBy", "created")
            .query_pairs(page.query_pairs());
        self.fetch_page(request, key.to_string()).await
    }

    /// Add a plain-text comment to an issue.
    #[instrument(skip(self, text), fields(issue_key = %key))]
    pub async fn add_comment(&self, key: &str, text: &str) -> Result<Comment> {
        require_arg(key, "issue key")?;
        require_arg(text, "comment text")?;

        let request = HttpRequest::post(issue_path(key, "/comment"))
            .json(&AddCommentRequest::plain_text(text))?;
        self.fetch(request, ExpectedStatus::CREATED).await
    }

    /// List agile boards.
    ///
    /// The agile API flags the final page with `isLast`.
    #[instrument(skip(self, query), fields(start_at = page.start_at))]
    pub async fn list_boards(
        &self,
        query: &BoardQuery,
        page: PageRequest,
    ) -> Result<Page<Board, BoardQuery>> {
        let request = HttpRequest::get(format!("{}/board", AGILE_BASE))
            .query_pairs(query.query_pairs())
            .query_pairs(page.query_pairs());
        self.fetch_page(request, query.clone()).await
    }

    /// List the sprints of a scrum board.
    #[instrument(skip(self, query), fields(board_id = query.board_id, start_at = page.start_at))]
    pub async fn get_board_sprints(
        &self,
        query: &SprintQuery,
        page: PageRequest,
    ) -> Result<Page<Sprint, SprintQuery>> {
        let mut request = HttpRequest::get(format!("{}/board/{}/sprint", AGILE_BASE, query.board_id));
        if let Some(state) = &query.state {
            request = request.query("state", state);
        }
        let request = request.query_pairs(page.query_pairs());
        self.fetch_page(request, query.clone()).await
    }

    /// Send a request and decode the reply.
    async fn send<T: DeserializeOwned>(
        &self,
        request: HttpRequest,
        expected: &ExpectedStatus,
    ) -> Result<Envelope<T>> {
        let method = request.method.clone();
        let path = request.path.clone();

        let response = self.transport.send(request, &self.cancel).await?;
        debug!(%method, %path, status = response.status, "Request completed");

        Ok(Envelope::from_response(&response, expected))
    }

    /// Send a request whose reply must carry a body.
    async fn fetch<T: DeserializeOwned>(
        &self,
        request: HttpRequest,
        expected: ExpectedStatus,
    ) -> Result<T> {
        let envelope = self.send(request, &expected).await?;
        policy::require(envelope, Some(&expected))
    }

    /// Send a request whose reply body is ignored.
    async fn execute(&self, request: HttpRequest, expected: ExpectedStatus) -> Result<()> {
        let envelope = self.send::<IgnoredAny>(request, &expected).await?;
        policy::assert_status(envelope, &expected)
    }

    /// Fetch a page and attach the query that produced it.
    async fn fetch_page<T: DeserializeOwned, P>(
        &self,
        request: HttpRequest,
        search_params: P,
    ) -> Result<Page<T, P>> {
        let page: Page<T> = self.fetch(request, ExpectedStatus::OK).await?;
        Ok(page.with_search_params(search_params))
    }
}

/// Fail fast on empty required arguments, before any network call.
fn require_arg(value: &str, name: &str) -> Result<()> {
    if value.trim().is_empty() {
        Err(ApiError::invalid_argument(name))
    } else {
        Ok(())
    }
}

fn issue_path(key: &str, suffix: &str) -> String {
    format!("{}/issue/{}{}", API_BASE, urlencoding::encode(key), suffix)
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use reqwest::Method;
    use serde_json::{json, Value};

    use super::*;
    use crate::api::transport::RawResponse;

    /// Replays canned responses and records every request.
    #[derive(Debug, Default)]
    struct StubTransport {
        responses: Mutex<VecDeque<RawResponse>>,
        requests: Mutex<Vec<HttpRequest>>,
    }

    impl StubTransport {
        fn replying(responses: Vec<RawResponse>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses.into()),
                requests: Mutex::new(Vec::new()),
            })
        }

        fn requests(&self) -> Vec<HttpRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for StubTransport {
        async fn send(
            &self,
            request: HttpRequest,
            cancel: &CancellationToken,
        ) -> Result<RawResponse> {
            if cancel.is_cancelled() {
                return Err(ApiError::Cancelled);
            }
            self.requests.lock().unwrap().push(request);
            Ok(self
                .responses
                .lock()
                .unwrap()
                .pop_front()
                .expect("no stubbed response left"))
        }
    }

    fn client_for(stub: &Arc<StubTransport>) -> JiraClient {
        JiraClient::new(stub.clone())
    }

    fn issue_json(key: &str) -> Value {
        json!({
            "id": "10001",
            "key": key,
            "self": format!("https://company.atlassian.net/rest/api/3/issue/{}", key),
            "fields": {
                "summary": format!("Summary of {}", key),
                "status": {"id": "1", "name": "To Do"},
                "issuetype": {"id": "1", "name": "Task"},
                "created": "2021-01-05T10:15:30.000+0200"
            }
        })
    }

    fn search_json(start_at: u32, keys: &[&str], total: u32) -> Value {
        json!({
            "startAt": start_at,
            "maxResults": 3,
            "total": total,
            "issues": keys.iter().map(|k| issue_json(k)).collect::<Vec<_>>()
        })
    }

    #[tokio::test]
    async fn test_get_issue() {
        let stub = StubTransport::replying(vec![RawResponse::json(200, &issue_json("PROJ-1"))]);
        let issue = client_for(&stub).get_issue("PROJ-1").await.unwrap();

        assert_eq!(issue.key, "PROJ-1");
        let requests = stub.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, Method::GET);
        assert_eq!(requests[0].path, "/rest/api/3/issue/PROJ-1");
    }

    #[tokio::test]
    async fn test_get_issue_not_found() {
        let stub = StubTransport::replying(vec![RawResponse::json(
            404,
            &json!({"errorMessages": ["Issue does not exist"], "errors": {}}),
        )]);
        let err = client_for(&stub).get_issue("NOPE-1").await.unwrap_err();

        assert_eq!(err.to_string(), "Issue does not exist");
        assert_eq!(err.status_code(), Some(404));
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_get_issue_unreadable_body() {
        let stub = StubTransport::replying(vec![RawResponse::new(200, b"<html/>".to_vec())]);
        let err = client_for(&stub).get_issue("PROJ-1").await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_issue_key_is_encoded() {
        let stub = StubTransport::replying(vec![RawResponse::json(200, &issue_json("A B"))]);
        client_for(&stub).get_issue("A B").await.unwrap();
        assert_eq!(stub.requests()[0].path, "/rest/api/3/issue/A%20B");
    }

    #[tokio::test]
    async fn test_empty_key_fails_before_request() {
        let stub = StubTransport::replying(Vec::new());
        let client = client_for(&stub);

        assert!(matches!(
            client.get_issue("  ").await,
            Err(ApiError::InvalidArgument(_))
        ));
        assert!(matches!(
            client.delete_issue("", false).await,
            Err(ApiError::InvalidArgument(_))
        ));
        assert!(matches!(
            client.update_issue("PROJ-1", &IssueUpdateRequest::default()).await,
            Err(ApiError::InvalidArgument(_))
        ));
        assert!(stub.requests().is_empty());
    }

    #[tokio::test]
    async fn test_search_continuation_changes_only_offset() {
        let stub = StubTransport::replying(vec![
            RawResponse::json(200, &search_json(0, &["P-1", "P-2", "P-3"], 5)),
            RawResponse::json(200, &search_json(3, &["P-4", "P-5"], 5)),
        ]);
        let client = client_for(&stub);
        let query = IssueQuery::new("project = P ORDER BY key").fields(["summary"]);

        let first = client
            .search_issues(&query, PageRequest::first(3))
            .await
            .unwrap();
        assert_eq!(first.count(), 3);
        assert!(!first.is_last_page());
        assert_eq!(first.next_page(), PageRequest::new(3, 3));
        assert_eq!(first.search_params(), &query);

        let second = client
            .search_issues(first.search_params(), first.next_page())
            .await
            .unwrap();
        let keys: Vec<_> = second.iter().map(|i| i.key.as_str()).collect();
        assert_eq!(keys, vec!["P-4", "P-5"]);
        assert!(second.is_last_page());

        let requests = stub.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].path, requests[1].path);
        assert_eq!(requests[0].query_value("startAt"), Some("0"));
        assert_eq!(requests[1].query_value("startAt"), Some("3"));

        let without_offset = |r: &HttpRequest| -> Vec<(String, String)> {
            r.query.iter().filter(|(k, _)| k != "startAt").cloned().collect()
        };
        assert_eq!(without_offset(&requests[0]), without_offset(&requests[1]));
        assert_eq!(requests[1].query_value("jql"), Some("project = P ORDER BY key"));
        assert_eq!(requests[1].query_value("fields"), Some("summary"));
    }

    #[tokio::test]
    async fn test_list_boards_is_last_flag() {
        let stub = StubTransport::replying(vec![RawResponse::json(
            200,
            &json!({
                "maxResults": 50,
                "startAt": 0,
                "isLast": true,
                "values": [{"id": 84, "name": "scrum board", "type": "scrum"}]
            }),
        )]);
        let page = client_for(&stub)
            .list_boards(&BoardQuery::for_project("PROJ"), PageRequest::default())
            .await
            .unwrap();

        assert_eq!(page.count(), 1);
        assert_eq!(page.total(), None);
        assert!(page.is_last_page());
        assert_eq!(page.search_params(), &BoardQuery::for_project("PROJ"));
        assert_eq!(stub.requests()[0].query_value("projectKeyOrId"), Some("PROJ"));
        assert_eq!(stub.requests()[0].path, "/rest/agile/1.0/board");
    }

    #[tokio::test]
    async fn test_get_board_sprints() {
        let stub = StubTransport::replying(vec![RawResponse::json(
            200,
            &json!({
                "maxResults": 1,
                "startAt": 0,
                "isLast": false,
                "values": [{"id": 37, "name": "Sprint 1", "state": "active",
                            "startDate": "2015-04-11T15:22:00.000+1000"}]
            }),
        )]);
        let query = SprintQuery::new(84).state("active");
        let page = client_for(&stub)
            .get_board_sprints(&query, PageRequest::first(1))
            .await
            .unwrap();

        assert!(page.has_more());
        assert_eq!(page.next_page(), PageRequest::new(1, 1));
        assert_eq!(page.items()[0].name, "Sprint 1");
        assert_eq!(stub.requests()[0].path, "/rest/agile/1.0/board/84/sprint");
        assert_eq!(stub.requests()[0].query_value("state"), Some("active"));
    }

    #[tokio::test]
    async fn test_create_issue_expects_created() {
        let stub = StubTransport::replying(vec![RawResponse::json(
            201,
            &json!({"id": "10002", "key": "PROJ-2", "self": "https://x/rest/api/3/issue/10002"}),
        )]);
        let created = client_for(&stub)
            .create_issue(&CreateIssueRequest::new("PROJ", "Task", "New"))
            .await
            .unwrap();

        assert_eq!(created.key, "PROJ-2");
        let request = &stub.requests()[0];
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.body.as_ref().unwrap()["fields"]["summary"], "New");
    }

    #[tokio::test]
    async fn test_create_issue_validation_errors() {
        let stub = StubTransport::replying(vec![RawResponse::json(
            400,
            &json!({"errorMessages": [], "errors": {"summary": "You must specify a summary of the issue."}}),
        )]);
        let err = client_for(&stub)
            .create_issue(&CreateIssueRequest::default())
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "400");
        assert_eq!(
            err.field_errors().unwrap().get("summary").map(String::as_str),
            Some("You must specify a summary of the issue.")
        );
    }

    #[tokio::test]
    async fn test_delete_issue_no_content() {
        let stub = StubTransport::replying(vec![
            RawResponse::new(204, Vec::new()),
            RawResponse::json(200, &json!({})),
        ]);
        let client = client_for(&stub);

        client.delete_issue("PROJ-1", true).await.unwrap();
        assert_eq!(stub.requests()[0].method, Method::DELETE);
        assert_eq!(stub.requests()[0].query_value("deleteSubtasks"), Some("true"));

        let err = client.delete_issue("PROJ-1", false).await.unwrap_err();
        assert_eq!(err.status_code(), Some(200));
    }

    #[tokio::test]
    async fn test_add_watcher_accepts_either_code() {
        let stub = StubTransport::replying(vec![
            RawResponse::new(204, Vec::new()),
            RawResponse::new(200, Vec::new()),
        ]);
        let client = client_for(&stub);

        client.add_watcher("PROJ-1", "abc").await.unwrap();
        client.add_watcher("PROJ-1", "abc").await.unwrap();
        assert_eq!(stub.requests()[0].body, Some(json!("abc")));
    }

    #[tokio::test]
    async fn test_transition_issue_body() {
        let stub = StubTransport::replying(vec![RawResponse::new(204, Vec::new())]);
        client_for(&stub).transition_issue("PROJ-1", "31").await.unwrap();

        let request = &stub.requests()[0];
        assert_eq!(request.path, "/rest/api/3/issue/PROJ-1/transitions");
        assert_eq!(request.body, Some(json!({"transition": {"id": "31"}})));
    }

    #[tokio::test]
    async fn test_assign_issue_unassign() {
        let stub = StubTransport::replying(vec![RawResponse::new(204, Vec::new())]);
        client_for(&stub).assign_issue("PROJ-1", None).await.unwrap();
        assert_eq!(stub.requests()[0].body, Some(json!({"accountId": null})));
    }

    #[tokio::test]
    async fn test_comments_page_remembers_issue_key() {
        let stub = StubTransport::replying(vec![RawResponse::json(
            200,
            &json!({
                "startAt": 0,
                "maxResults": 1,
                "total": 2,
                "comments": [{
                    "id": "1",
                    "body": {"type": "doc", "version": 1, "content": []},
                    "created": "2021-01-05T10:15:30.000+0200"
                }]
            }),
        )]);
        let page = client_for(&stub)
            .get_comments("PROJ-1", PageRequest::first(1))
            .await
            .unwrap();

        assert_eq!(page.search_params(), "PROJ-1");
        assert!(page.has_more());
    }

    #[tokio::test]
    async fn test_cancelled_client() {
        let stub = StubTransport::replying(Vec::new());
        let token = CancellationToken::new();
        let client = client_for(&stub).with_cancellation(token.clone());
        token.cancel();

        let err = client.get_current_user().await.unwrap_err();
        assert!(matches!(err, ApiError::Cancelled));
        assert!(client.cancellation_token().is_cancelled());
    }

    #[tokio::test]
    async fn test_validate_connection_wraps_server_errors() {
        let stub = StubTransport::replying(vec![RawResponse::new(503, Vec::new())]);
        let err = client_for(&stub).validate_connection().await.unwrap_err();
        assert!(matches!(err, ApiError::ConnectionFailed(_)));
    }

    #[tokio::test]
    async fn test_from_config_unknown_profile() {
        let err = JiraClient::from_config(&Config::default(), Some("missing"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            crate::Error::Config(ConfigError::ProfileNotFound(name)) if name == "missing"
        ));
    }

    #[tokio::test]
    async fn test_configured_page_size_reaches_request() {
        let stub = StubTransport::replying(vec![
            RawResponse::json(200, &search_json(0, &["P-1"], 1)),
            RawResponse::json(200, &search_json(0, &["P-1"], 1)),
        ]);
        let settings = Settings {
            page_size: 25,
            ..Settings::default()
        };
        let client = client_for(&stub).with_page_size(settings.page_size);
        assert_eq!(client.first_page(), PageRequest::first(25));

        let query = IssueQuery::new("project = P");
        client.search_issues(&query, client.first_page()).await.unwrap();

        let cancellable = client.with_cancellation(CancellationToken::new());
        cancellable
            .search_issues(&query, cancellable.first_page())
            .await
            .unwrap();

        let requests = stub.requests();
        assert_eq!(requests[0].query_value("maxResults"), Some("25"));
        assert_eq!(requests[1].query_value("maxResults"), Some("25"));
    }

    #[test]
    fn test_default_page_size() {
        let stub = StubTransport::replying(Vec::new());
        assert_eq!(client_for(&stub).first_page(), PageRequest::default());
        assert_eq!(client_for(&stub).with_page_size(0).page_size(), DEFAULT_PAGE_SIZE);
    }

    #[tokio::test]
    async fn test_validate_connection_keeps_unauthorized() {
        let stub = StubTransport::replying(vec![RawResponse::new(401, Vec::new())]);
        let err = client_for(&stub).validate_connection().await.unwrap_err();
        assert!(err.is_unauthorized());
    }
}
