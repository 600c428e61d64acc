//! Repository operations.

use crate::client::{GitHubAdminClient, Record};
use crate::errors::GitHubResult;
use crate::pagination::{PaginationParams, Paginator, MAX_PER_PAGE};
use serde::{Deserialize, Serialize};

/// Service for repository operations.
pub struct RepositoriesService<'a> {
    client: &'a GitHubAdminClient,
}

impl<'a> RepositoriesService<'a> {
    /// Creates a new repositories service.
    pub fn new(client: &'a GitHubAdminClient) -> Self {
        Self { client }
    }

    /// Creates a repository in an organization.
    pub async fn create_for_org(
        &self,
        org: &str,
        name: &str,
        visibility: Visibility,
    ) -> GitHubResult<Record> {
        let request = CreateRepoRequest {
            name: name.to_string(),
            visibility,
        };
        self.client
            .post(&format!("/orgs/{}/repos", org), &request)
            .await
    }

    /// Gets a repository.
    pub async fn get(&self, owner: &str, repo: &str) -> GitHubResult<Record> {
        self.client
            .get(&format!("/repos/{}/{}", owner, repo))
            .await
    }

    /// Lists one page of repositories in an organization.
    pub async fn list_for_org(
        &self,
        org: &str,
        params: &ListOrgReposParams,
        page: PaginationParams,
    ) -> GitHubResult<Vec<Record>> {
        self.client
            .get_page(&format!("/orgs/{}/repos", org), params, page)
            .await
    }

    /// Lists every repository in an organization.
    pub async fn list_all_for_org(
        &self,
        org: &str,
        params: &ListOrgReposParams,
        per_page: u32,
    ) -> GitHubResult<Vec<Record>> {
        Paginator::new(per_page)
            .collect_all(move |page| self.list_for_org(org, params, page))
            .await
    }

    /// Lists one page of a user's repositories.
    pub async fn list_for_user(
        &self,
        username: &str,
        params: &ListUserReposParams,
        page: PaginationParams,
    ) -> GitHubResult<Vec<Record>> {
        self.client
            .get_page(&format!("/users/{}/repos", username), params, page)
            .await
    }

    /// Lists every repository of a user.
    pub async fn list_all_for_user(
        &self,
        username: &str,
        params: &ListUserReposParams,
        per_page: u32,
    ) -> GitHubResult<Vec<Record>> {
        Paginator::new(per_page)
            .collect_all(move |page| self.list_for_user(username, params, page))
            .await
    }

    // Branches

    /// Lists one page of branches.
    ///
    /// `protected` of `None` lists every branch.
    pub async fn list_branches(
        &self,
        owner: &str,
        repo: &str,
        protected: Option<bool>,
        page: PaginationParams,
    ) -> GitHubResult<Vec<Record>> {
        self.client
            .get_page(
                &format!("/repos/{}/{}/branches", owner, repo),
                &ListBranchesParams { protected },
                page,
            )
            .await
    }

    /// Lists every branch, 100 per page.
    pub async fn list_all_branches(
        &self,
        owner: &str,
        repo: &str,
        protected: Option<bool>,
    ) -> GitHubResult<Vec<Record>> {
        Paginator::new(MAX_PER_PAGE)
            .collect_all(move |page| self.list_branches(owner, repo, protected, page))
            .await
    }

    /// Gets a branch.
    pub async fn get_branch(&self, owner: &str, repo: &str, branch: &str) -> GitHubResult<Record> {
        self.client
            .get(&format!("/repos/{}/{}/branches/{}", owner, repo, branch))
            .await
    }

    /// Deletes a branch by removing its git reference.
    pub async fn delete_branch(&self, owner: &str, repo: &str, branch: &str) -> GitHubResult<()> {
        self.client
            .delete(&format!("/repos/{}/{}/git/refs/heads/{}", owner, repo, branch))
            .await?;
        Ok(())
    }

    // Commits

    /// Gets a commit. `page` pages through the commit's changed files.
    pub async fn get_commit(
        &self,
        owner: &str,
        repo: &str,
        reference: &str,
        page: PaginationParams,
    ) -> GitHubResult<Record> {
        self.client
            .get_with_params(
                &format!("/repos/{}/{}/commits/{}", owner, repo, reference),
                &page.to_query(),
            )
            .await
    }

    /// Lists one page of statuses for a commit.
    pub async fn list_commit_statuses(
        &self,
        owner: &str,
        repo: &str,
        sha: &str,
        page: PaginationParams,
    ) -> GitHubResult<Vec<Record>> {
        self.client
            .get_page(&format!("/repos/{}/{}/statuses/{}", owner, repo, sha), &(), page)
            .await
    }

    /// Lists every status for a commit.
    pub async fn list_all_commit_statuses(
        &self,
        owner: &str,
        repo: &str,
        sha: &str,
        per_page: u32,
    ) -> GitHubResult<Vec<Record>> {
        Paginator::new(per_page)
            .collect_all(move |page| self.list_commit_statuses(owner, repo, sha, page))
            .await
    }

    // Teams, tags and collaborators

    /// Lists one page of teams with access to the repository.
    pub async fn list_teams(
        &self,
        owner: &str,
        repo: &str,
        page: PaginationParams,
    ) -> GitHubResult<Vec<Record>> {
        self.client
            .get_page(&format!("/repos/{}/{}/teams", owner, repo), &(), page)
            .await
    }

    /// Lists every team with access to the repository.
    pub async fn list_all_teams(&self, owner: &str, repo: &str, per_page: u32) -> GitHubResult<Vec<Record>> {
        Paginator::new(per_page)
            .collect_all(move |page| self.list_teams(owner, repo, page))
            .await
    }

    /// Lists one page of tags.
    pub async fn list_tags(
        &self,
        owner: &str,
        repo: &str,
        page: PaginationParams,
    ) -> GitHubResult<Vec<Record>> {
        self.client
            .get_page(&format!("/repos/{}/{}/tags", owner, repo), &(), page)
            .await
    }

    /// Lists every tag.
    pub async fn list_all_tags(&self, owner: &str, repo: &str, per_page: u32) -> GitHubResult<Vec<Record>> {
        Paginator::new(per_page)
            .collect_all(move |page| self.list_tags(owner, repo, page))
            .await
    }

    /// Lists one page of collaborators.
    pub async fn list_collaborators(
        &self,
        owner: &str,
        repo: &str,
        params: &ListCollaboratorsParams,
        page: PaginationParams,
    ) -> GitHubResult<Vec<Record>> {
        self.client
            .get_page(&format!("/repos/{}/{}/collaborators", owner, repo), params, page)
            .await
    }

    /// Lists every collaborator.
    pub async fn list_all_collaborators(
        &self,
        owner: &str,
        repo: &str,
        params: &ListCollaboratorsParams,
        per_page: u32,
    ) -> GitHubResult<Vec<Record>> {
        Paginator::new(per_page)
            .collect_all(move |page| self.list_collaborators(owner, repo, params, page))
            .await
    }

    // Issues and releases

    /// Comments on an issue or pull request.
    pub async fn comment_on_issue(
        &self,
        owner: &str,
        repo: &str,
        issue_number: u64,
        body: &str,
    ) -> GitHubResult<Record> {
        let request = CommentRequest {
            body: body.to_string(),
        };
        self.client
            .post(
                &format!("/repos/{}/{}/issues/{}/comments", owner, repo, issue_number),
                &request,
            )
            .await
    }

    /// Creates a release.
    pub async fn create_release(
        &self,
        owner: &str,
        repo: &str,
        request: &CreateReleaseRequest,
    ) -> GitHubResult<Record> {
        self.client
            .post(&format!("/repos/{}/{}/releases", owner, repo), request)
            .await
    }

    // Webhooks

    /// Lists repository webhooks.
    pub async fn list_hooks(&self, owner: &str, repo: &str) -> GitHubResult<Record> {
        self.client
            .get(&format!("/repos/{}/{}/hooks", owner, repo))
            .await
    }

    /// Creates a repository webhook from a caller-built payload.
    pub async fn create_hook<B: Serialize>(&self, owner: &str, repo: &str, payload: &B) -> GitHubResult<Record> {
        self.client
            .post(&format!("/repos/{}/{}/hooks", owner, repo), payload)
            .await
    }
}

/// Repository visibility.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// Public.
    Public,
    /// Private.
    #[default]
    Private,
    /// Internal (GitHub Enterprise).
    Internal,
}

#[derive(Debug, Clone, Serialize)]
struct CreateRepoRequest {
    name: String,
    visibility: Visibility,
}

/// Repository type filter.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum RepoType {
    /// All repositories.
    #[default]
    All,
    /// Public repositories.
    Public,
    /// Private repositories.
    Private,
    /// Forks.
    Forks,
    /// Sources (non-forks).
    Sources,
    /// Member repositories.
    Member,
    /// Owner repositories.
    Owner,
}

/// Sort field for repository lists.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum RepoSort {
    /// Creation time.
    #[default]
    Created,
    /// Last update.
    Updated,
    /// Last push.
    Pushed,
    /// Full name.
    FullName,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Ascending.
    #[default]
    Asc,
    /// Descending.
    Desc,
}

/// Filters for listing organization repositories.
#[derive(Debug, Clone, Serialize)]
pub struct ListOrgReposParams {
    /// Type filter.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub repo_type: Option<RepoType>,
    /// Sort field.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<RepoSort>,
}

impl Default for ListOrgReposParams {
    fn default() -> Self {
        Self {
            repo_type: Some(RepoType::All),
            sort: Some(RepoSort::Created),
        }
    }
}

/// Filters for listing a user's repositories.
#[derive(Debug, Clone, Serialize)]
pub struct ListUserReposParams {
    /// Type filter.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub repo_type: Option<RepoType>,
    /// Sort direction.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
}

impl Default for ListUserReposParams {
    fn default() -> Self {
        Self {
            repo_type: Some(RepoType::All),
            direction: Some(Direction::Asc),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
struct ListBranchesParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    protected: Option<bool>,
}

/// Collaborator permission filter.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CollaboratorPermission {
    /// Read.
    Pull,
    /// Triage.
    Triage,
    /// Write.
    Push,
    /// Maintain.
    Maintain,
    /// Admin.
    Admin,
}

/// Collaborator affiliation filter.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Affiliation {
    /// Outside collaborators.
    Outside,
    /// Direct collaborators.
    Direct,
    /// Everyone with access.
    All,
}

/// Filters for listing collaborators. Absent filters are not sent.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ListCollaboratorsParams {
    /// Permission filter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permission: Option<CollaboratorPermission>,
    /// Affiliation filter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub affiliation: Option<Affiliation>,
}

#[derive(Debug, Clone, Serialize)]
struct CommentRequest {
    body: String,
}

/// Request to create a release.
#[derive(Debug, Clone, Serialize)]
pub struct CreateReleaseRequest {
    /// Tag name.
    pub tag_name: String,
    /// Release name. GitHub names the release after the tag when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Release notes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// Let GitHub generate the notes.
    pub generate_release_notes: bool,
    /// Mark as pre-release.
    pub prerelease: bool,
}

impl CreateReleaseRequest {
    /// Creates a release request with only a tag.
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            name: None,
            body: None,
            generate_release_notes: false,
            prerelease: false,
        }
    }

    /// Sets the release name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the release notes.
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Lets GitHub generate the release notes.
    pub fn generate_release_notes(mut self, generate: bool) -> Self {
        self.generate_release_notes = generate;
        self
    }

    /// Marks the release as a pre-release.
    pub fn prerelease(mut self, prerelease: bool) -> Self {
        self.prerelease = prerelease;
        self
    }
}
