//! Offset-based pagination over list endpoints.
//!
//! JIRA list endpoints return a window of results together with `startAt`,
//! `maxResults` and usually `total`; the agile endpoints send `isLast`
//! instead of a reliable total. A [`Page`] holds one such window plus the
//! query that produced it, so the next window is requested with
//! [`Page::search_params`] and [`Page::next_page`]:
//!
//! ```no_run
//! # async fn run(client: jira_rest::JiraClient) -> jira_rest::api::Result<()> {
//! use jira_rest::api::{IssueQuery, PageRequest};
//!
//! let mut page = client
//!     .search_issues(&IssueQuery::new("project = PROJ"), PageRequest::first(50))
//!     .await?;
//! loop {
//!     for issue in &page {
//!         println!("{}", issue);
//!     }
//!     if !page.has_more() {
//!         break;
//!     }
//!     page = client.search_issues(page.search_params(), page.next_page()).await?;
//! }
//! # Ok(())
//! # }
//! ```

use serde::{Deserialize, Serialize};

/// Page size used when the caller does not choose one.
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// Offset and size of a page to request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Index of the first item (0-based).
    pub start_at: u32,
    /// Maximum number of items to return.
    pub max_results: u32,
}

impl PageRequest {
    pub fn new(start_at: u32, max_results: u32) -> Self {
        Self {
            start_at,
            max_results,
        }
    }

    /// The first page with the given size.
    pub fn first(max_results: u32) -> Self {
        Self::new(0, max_results)
    }

    /// Query parameters understood by JIRA list endpoints.
    pub fn query_pairs(&self) -> [(&'static str, u32); 2] {
        [("startAt", self.start_at), ("maxResults", self.max_results)]
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::first(DEFAULT_PAGE_SIZE)
    }
}

/// One page of a list result.
///
/// `P` is the query that produced the page. It lives only in memory and is
/// never serialized. A page is immutable; fetching the next one produces a
/// new `Page`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    rename_all = "camelCase",
    bound(
        serialize = "T: Serialize",
        deserialize = "T: Deserialize<'de>, P: Default"
    )
)]
pub struct Page<T, P = ()> {
    #[serde(default)]
    start_at: u32,
    #[serde(default)]
    max_results: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    total: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    is_last: Option<bool>,
    #[serde(
        default,
        rename = "values",
        alias = "issues",
        alias = "comments",
        alias = "worklogs"
    )]
    items: Vec<T>,
    #[serde(skip)]
    search_params: P,
}

impl<T> Page<T> {
    /// Create a page without search parameters.
    pub fn new(items: Vec<T>, start_at: u32, max_results: u32, total: Option<u32>) -> Self {
        Self {
            start_at,
            max_results,
            total,
            is_last: None,
            items,
            search_params: (),
        }
    }
}

impl<T, P> Page<T, P> {
    /// Record the server's explicit last-page flag.
    pub fn with_last_flag(mut self, is_last: bool) -> Self {
        self.is_last = Some(is_last);
        self
    }

    /// Attach the query that produced this page.
    pub fn with_search_params<Q>(self, search_params: Q) -> Page<T, Q> {
        Page {
            start_at: self.start_at,
            max_results: self.max_results,
            total: self.total,
            is_last: self.is_last,
            items: self.items,
            search_params,
        }
    }

    /// Number of items in this page.
    pub fn count(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Offset of the first item within the full result set.
    pub fn start_at(&self) -> u32 {
        self.start_at
    }

    pub fn max_results(&self) -> u32 {
        self.max_results
    }

    /// Total across all pages, if the server reported it.
    pub fn total(&self) -> Option<u32> {
        self.total
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    pub fn search_params(&self) -> &P {
        &self.search_params
    }

    /// Offset of the item following this page.
    pub fn next_offset(&self) -> u32 {
        let count = u32::try_from(self.count()).unwrap_or(u32::MAX);
        self.start_at.saturating_add(count)
    }

    /// The request for the page after this one, with the same page size.
    pub fn next_page(&self) -> PageRequest {
        PageRequest::new(self.next_offset(), self.max_results)
    }

    /// Whether this is known to be the final page.
    ///
    /// Uses `total` when present, the server's `isLast` flag otherwise. With
    /// neither the answer is `false`; callers stop on an empty page.
    pub fn is_last_page(&self) -> bool {
        match self.total {
            Some(total) => self.next_offset() >= total,
            None => self.is_last.unwrap_or(false),
        }
    }

    /// Whether requesting [`next_page`](Self::next_page) can yield more items.
    pub fn has_more(&self) -> bool {
        !self.is_last_page() && !self.is_empty()
    }

    /// Iterate over this page's items. Does not fetch further pages.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }
}

impl<T, P> IntoIterator for Page<T, P> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T, P> IntoIterator for &'a Page<T, P> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
