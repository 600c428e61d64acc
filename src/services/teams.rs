//! Team operations: membership, repository grants and discussions.

use crate::client::{GitHubAdminClient, Record};
use crate::errors::GitHubResult;
use crate::pagination::{PaginationParams, Paginator, StopRule, DEFAULT_PER_PAGE};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Service for team operations.
pub struct TeamsService<'a> {
    client: &'a GitHubAdminClient,
}

impl<'a> TeamsService<'a> {
    /// Creates a new teams service.
    pub fn new(client: &'a GitHubAdminClient) -> Self {
        Self { client }
    }

    /// Creates a team.
    pub async fn create(&self, org: &str, name: &str, privacy: TeamPrivacy) -> GitHubResult<Record> {
        let request = CreateTeamRequest {
            name: name.to_string(),
            privacy,
        };
        self.client
            .post(&format!("/orgs/{}/teams", org), &request)
            .await
    }

    /// Gets a team by slug.
    pub async fn get_by_slug(&self, org: &str, team_slug: &str) -> GitHubResult<Record> {
        self.client
            .get(&format!("/orgs/{}/teams/{}", org, team_slug))
            .await
    }

    /// Lists one page of teams in an organization.
    pub async fn list(&self, org: &str, page: PaginationParams) -> GitHubResult<Vec<Record>> {
        self.client
            .get_page(&format!("/orgs/{}/teams", org), &(), page)
            .await
    }

    /// Lists every team in an organization.
    pub async fn list_all(&self, org: &str, per_page: u32) -> GitHubResult<Vec<Record>> {
        Paginator::new(per_page)
            .collect_all(move |page| self.list(org, page))
            .await
    }

    // Repositories

    /// Grants the team a permission on a repository.
    pub async fn grant_repository(
        &self,
        org: &str,
        team_slug: &str,
        owner: &str,
        repo: &str,
        permission: TeamRepoPermission,
    ) -> GitHubResult<Record> {
        let request = AddTeamRepoRequest { permission };
        self.client
            .put(
                &format!("/orgs/{}/teams/{}/repos/{}/{}", org, team_slug, owner, repo),
                &request,
            )
            .await
    }

    // Members

    /// Adds or updates team membership for a user.
    pub async fn add_member(
        &self,
        org: &str,
        team_slug: &str,
        username: &str,
        role: TeamMemberRole,
    ) -> GitHubResult<Record> {
        let request = AddTeamMemberRequest { role };
        self.client
            .put(
                &format!("/orgs/{}/teams/{}/memberships/{}", org, team_slug, username),
                &request,
            )
            .await
    }

    /// Removes a user from a team.
    pub async fn remove_member(&self, org: &str, team_slug: &str, username: &str) -> GitHubResult<()> {
        self.client
            .delete(&format!(
                "/orgs/{}/teams/{}/memberships/{}",
                org, team_slug, username
            ))
            .await?;
        Ok(())
    }

    /// Lists one page of team members.
    pub async fn list_members(
        &self,
        org: &str,
        team_slug: &str,
        page: PaginationParams,
    ) -> GitHubResult<Vec<Record>> {
        self.client
            .get_page(&format!("/orgs/{}/teams/{}/members", org, team_slug), &(), page)
            .await
    }

    /// Lists every team member.
    pub async fn list_all_members(
        &self,
        org: &str,
        team_slug: &str,
        per_page: u32,
    ) -> GitHubResult<Vec<Record>> {
        Paginator::new(per_page)
            .collect_all(move |page| self.list_members(org, team_slug, page))
            .await
    }

    // Discussions

    /// Starts a discussion on the team page. The title doubles as the body.
    pub async fn create_discussion(
        &self,
        org: &str,
        team_slug: &str,
        title: &str,
        private: bool,
    ) -> GitHubResult<Record> {
        let request = CreateDiscussionRequest {
            title: title.to_string(),
            body: title.to_string(),
            private,
        };
        self.client
            .post(
                &format!("/orgs/{}/teams/{}/discussions", org, team_slug),
                &request,
            )
            .await
    }

    /// Lists one page of team discussions.
    pub async fn list_discussions(
        &self,
        org: &str,
        team_slug: &str,
        page: PaginationParams,
    ) -> GitHubResult<Vec<Record>> {
        self.client
            .get_page(
                &format!("/orgs/{}/teams/{}/discussions", org, team_slug),
                &(),
                page,
            )
            .await
    }

    /// Finds a discussion by exact title, scanning pages until one matches.
    ///
    /// Scanning stops at the first empty page. If nothing matches and
    /// `create_if_missing` is set, the discussion is created and returned.
    pub async fn find_discussion(
        &self,
        org: &str,
        team_slug: &str,
        title: &str,
        create_if_missing: bool,
        private: bool,
    ) -> GitHubResult<Option<Record>> {
        let mut page = PaginationParams::new().per_page(DEFAULT_PER_PAGE);

        loop {
            let discussions = self.list_discussions(org, team_slug, page).await?;
            if discussions.is_empty() {
                break;
            }

            if let Some(found) = discussions
                .into_iter()
                .find(|d| d.get("title").and_then(|t| t.as_str()) == Some(title))
            {
                debug!(org, team_slug, page = page.page, "Found team discussion");
                return Ok(Some(found));
            }
            page = page.page(page.page + 1);
        }

        if create_if_missing {
            debug!(org, team_slug, "Creating missing team discussion");
            return self
                .create_discussion(org, team_slug, title, private)
                .await
                .map(Some);
        }

        Ok(None)
    }

    /// Lists every team discussion, stopping at the first empty page.
    pub async fn list_all_discussions(
        &self,
        org: &str,
        team_slug: &str,
        per_page: u32,
    ) -> GitHubResult<Vec<Record>> {
        Paginator::new(per_page)
            .with_stop_rule(StopRule::EmptyPage)
            .collect_all(move |page| self.list_discussions(org, team_slug, page))
            .await
    }

    /// Comments on a team discussion.
    pub async fn create_discussion_comment(
        &self,
        org: &str,
        team_slug: &str,
        discussion_number: u64,
        body: &str,
    ) -> GitHubResult<Record> {
        let request = CommentRequest {
            body: body.to_string(),
        };
        self.client
            .post(
                &format!(
                    "/orgs/{}/teams/{}/discussions/{}/comments",
                    org, team_slug, discussion_number
                ),
                &request,
            )
            .await
    }
}

/// Team privacy level.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TeamPrivacy {
    /// Visible only to organization owners and team members.
    Secret,
    /// Visible to every organization member.
    #[default]
    Closed,
}

/// Team member role.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TeamMemberRole {
    /// Regular member.
    #[default]
    Member,
    /// Team maintainer.
    Maintainer,
}

/// Team repository permission.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TeamRepoPermission {
    /// Read.
    Pull,
    /// Read and manage issues.
    Triage,
    /// Read and write.
    #[default]
    Push,
    /// Write and manage settings.
    Maintain,
    /// Full control.
    Admin,
}

#[derive(Debug, Clone, Serialize)]
struct CreateTeamRequest {
    name: String,
    privacy: TeamPrivacy,
}

#[derive(Debug, Clone, Serialize)]
struct AddTeamMemberRequest {
    role: TeamMemberRole,
}

#[derive(Debug, Clone, Serialize)]
struct AddTeamRepoRequest {
    permission: TeamRepoPermission,
}

#[derive(Debug, Clone, Serialize)]
struct CreateDiscussionRequest {
    title: String,
    body: String,
    private: bool,
}

#[derive(Debug, Clone, Serialize)]
struct CommentRequest {
    body: String,
}
