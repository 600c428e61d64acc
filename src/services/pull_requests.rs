//! Pull request operations.

use crate::client::{GitHubAdminClient, Record};
use crate::errors::GitHubResult;
use crate::pagination::{PaginationParams, Paginator};
use crate::services::repositories::Direction;
use serde::{Deserialize, Serialize};

/// Service for pull request operations.
pub struct PullRequestsService<'a> {
    client: &'a GitHubAdminClient,
}

impl<'a> PullRequestsService<'a> {
    /// Creates a new pull requests service.
    pub fn new(client: &'a GitHubAdminClient) -> Self {
        Self { client }
    }

    /// Lists one page of pull requests.
    pub async fn list(
        &self,
        owner: &str,
        repo: &str,
        state: PullRequestStateFilter,
        page: PaginationParams,
    ) -> GitHubResult<Vec<Record>> {
        self.client
            .get_page(
                &format!("/repos/{}/{}/pulls", owner, repo),
                &ListPullRequestsParams { state },
                page,
            )
            .await
    }

    /// Lists every pull request in the given state.
    pub async fn list_all(
        &self,
        owner: &str,
        repo: &str,
        state: PullRequestStateFilter,
        per_page: u32,
    ) -> GitHubResult<Vec<Record>> {
        Paginator::new(per_page)
            .collect_all(move |page| self.list(owner, repo, state, page))
            .await
    }

    // Reviews

    /// Lists one page of reviews on a pull request.
    pub async fn list_reviews(
        &self,
        owner: &str,
        repo: &str,
        pull_number: u64,
        page: PaginationParams,
    ) -> GitHubResult<Vec<Record>> {
        self.client
            .get_page(
                &format!("/repos/{}/{}/pulls/{}/reviews", owner, repo, pull_number),
                &(),
                page,
            )
            .await
    }

    /// Lists every review on a pull request.
    pub async fn list_all_reviews(
        &self,
        owner: &str,
        repo: &str,
        pull_number: u64,
        per_page: u32,
    ) -> GitHubResult<Vec<Record>> {
        Paginator::new(per_page)
            .collect_all(move |page| self.list_reviews(owner, repo, pull_number, page))
            .await
    }

    /// Lists one page of conversation comments on a pull request.
    ///
    /// These live on the pull request's issue, so the issue comments
    /// endpoint is used.
    pub async fn list_review_comments(
        &self,
        owner: &str,
        repo: &str,
        pull_number: u64,
        direction: Direction,
        page: PaginationParams,
    ) -> GitHubResult<Vec<Record>> {
        self.client
            .get_page(
                &format!("/repos/{}/{}/issues/{}/comments", owner, repo, pull_number),
                &ListCommentsParams { direction },
                page,
            )
            .await
    }

    /// Lists every conversation comment on a pull request.
    pub async fn list_all_review_comments(
        &self,
        owner: &str,
        repo: &str,
        pull_number: u64,
        direction: Direction,
        per_page: u32,
    ) -> GitHubResult<Vec<Record>> {
        Paginator::new(per_page)
            .collect_all(move |page| {
                self.list_review_comments(owner, repo, pull_number, direction, page)
            })
            .await
    }
}

/// Pull request state filter.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PullRequestStateFilter {
    /// Open pull requests.
    Open,
    /// Closed and merged pull requests.
    Closed,
    /// Every pull request.
    #[default]
    All,
}

#[derive(Debug, Clone, Serialize)]
struct ListPullRequestsParams {
    state: PullRequestStateFilter,
}

#[derive(Debug, Clone, Serialize)]
struct ListCommentsParams {
    direction: Direction,
}
