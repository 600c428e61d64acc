//! Page-index pagination for GitHub list endpoints.
//!
//! GitHub list endpoints take `page` (1-based) and `per_page` (max 100). The
//! [`Paginator`] drives a single-page fetch from page 1 upwards and
//! concatenates the results in page order.

use crate::errors::GitHubResult;
use std::future::Future;
use tracing::debug;

/// Default page size used by GitHub.
pub const DEFAULT_PER_PAGE: u32 = 30;

/// Largest page size GitHub accepts.
pub const MAX_PER_PAGE: u32 = 100;

/// Pagination parameters for one list request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationParams {
    /// Page number (1-indexed).
    pub page: u32,
    /// Items per page (1..=100).
    pub per_page: u32,
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl PaginationParams {
    /// Creates parameters for the first page with the default size.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the page number.
    pub fn page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }

    /// Sets items per page.
    pub fn per_page(mut self, per_page: u32) -> Self {
        self.per_page = clamp_per_page(per_page);
        self
    }

    /// Converts to query parameters.
    pub fn to_query(&self) -> Vec<(String, String)> {
        vec![
            ("per_page".to_string(), self.per_page.to_string()),
            ("page".to_string(), self.page.to_string()),
        ]
    }
}

fn clamp_per_page(per_page: u32) -> u32 {
    per_page.clamp(1, MAX_PER_PAGE)
}

/// When the [`Paginator`] stops asking for more pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StopRule {
    /// Stop after a page shorter than the requested size (or an empty page).
    #[default]
    ShortPage,
    /// Stop only once a page comes back empty.
    EmptyPage,
}

/// Aggregates a page-indexed listing into one ordered vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    per_page: u32,
    stop_rule: StopRule,
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(DEFAULT_PER_PAGE)
    }
}

impl Paginator {
    /// Creates a paginator with the given page size and the short-page rule.
    pub fn new(per_page: u32) -> Self {
        Self {
            per_page: clamp_per_page(per_page),
            stop_rule: StopRule::ShortPage,
        }
    }

    /// Sets the stop rule.
    pub fn with_stop_rule(mut self, stop_rule: StopRule) -> Self {
        self.stop_rule = stop_rule;
        self
    }

    /// Gets the page size.
    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Gets the stop rule.
    pub fn stop_rule(&self) -> StopRule {
        self.stop_rule
    }

    /// Fetches pages starting at 1 until the stop rule fires.
    ///
    /// The first failing page aborts the whole aggregation; nothing fetched
    /// so far is returned.
    pub async fn collect_all<T, F, Fut>(&self, mut fetch_page: F) -> GitHubResult<Vec<T>>
    where
        F: FnMut(PaginationParams) -> Fut,
        Fut: Future<Output = GitHubResult<Vec<T>>>,
    {
        let mut all_items = Vec::new();
        let mut params = PaginationParams::new().per_page(self.per_page);

        loop {
            let items = fetch_page(params).await?;
            let count = items.len();
            debug!(page = params.page, per_page = params.per_page, count, "Fetched page");

            if count == 0 {
                break;
            }
            all_items.extend(items);

            if self.stop_rule == StopRule::ShortPage && count < params.per_page as usize {
                break;
            }
            params.page += 1;
        }

        debug!(
            pages = params.page,
            total = all_items.len(),
            "Pagination complete"
        );
        Ok(all_items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::GitHubError;
    use std::cell::RefCell;

    fn serve(total: usize) -> impl Fn(PaginationParams) -> Vec<usize> {
        move |params: PaginationParams| {
            let start = (params.page as usize - 1) * params.per_page as usize;
            let end = (start + params.per_page as usize).min(total);
            (start.min(total)..end).collect()
        }
    }

    #[test]
    fn test_pagination_params() {
        let params = PaginationParams::new().page(2).per_page(50);
        let query = params.to_query();

        assert!(query.contains(&("page".to_string(), "2".to_string())));
        assert!(query.contains(&("per_page".to_string(), "50".to_string())));
    }

    #[test]
    fn test_per_page_limit() {
        assert_eq!(PaginationParams::new().per_page(200).per_page, 100);
        assert_eq!(PaginationParams::new().per_page(0).per_page, 1);
        assert_eq!(PaginationParams::new().page(0).page, 1);
    }

    #[tokio::test]
    async fn test_short_page_stops_early() {
        let source = serve(45);
        let calls = RefCell::new(Vec::new());

        let items = Paginator::new(30)
            .collect_all(|params| {
                calls.borrow_mut().push(params.page);
                let page = source(params);
                async move { Ok::<_, GitHubError>(page) }
            })
            .await
            .unwrap();

        assert_eq!(items, (0..45).collect::<Vec<_>>());
        assert_eq!(*calls.borrow(), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_empty_page_rule_needs_extra_fetch() {
        let source = serve(45);
        let calls = RefCell::new(0u32);

        let items = Paginator::new(30)
            .with_stop_rule(StopRule::EmptyPage)
            .collect_all(|params| {
                *calls.borrow_mut() += 1;
                let page = source(params);
                async move { Ok::<_, GitHubError>(page) }
            })
            .await
            .unwrap();

        assert_eq!(items.len(), 45);
        assert_eq!(*calls.borrow(), 3);
    }

    #[tokio::test]
    async fn test_error_aborts_aggregation() {
        let source = serve(100);

        let result = Paginator::new(10)
            .collect_all(|params| {
                let page = source(params);
                async move {
                    if params.page == 3 {
                        Err(GitHubError::from_response(502, "bad gateway".to_string(), None))
                    } else {
                        Ok(page)
                    }
                }
            })
            .await;

        let error = result.unwrap_err();
        assert_eq!(error.message(), "bad gateway");
    }

    #[tokio::test]
    async fn test_empty_listing() {
        let items: Vec<usize> = Paginator::default()
            .collect_all(|_| async { Ok(Vec::new()) })
            .await
            .unwrap();
        assert!(items.is_empty());
    }
}
