//! Organization operations.

use crate::client::{GitHubAdminClient, Record};
use crate::errors::GitHubResult;
use crate::pagination::{PaginationParams, Paginator};
use serde::{Deserialize, Serialize};

/// Service for organization operations.
pub struct OrganizationsService<'a> {
    client: &'a GitHubAdminClient,
}

impl<'a> OrganizationsService<'a> {
    /// Creates a new organizations service.
    pub fn new(client: &'a GitHubAdminClient) -> Self {
        Self { client }
    }

    // Members

    /// Lists one page of organization members.
    pub async fn list_members(&self, org: &str, page: PaginationParams) -> GitHubResult<Vec<Record>> {
        self.client
            .get_page(&format!("/orgs/{}/members", org), &(), page)
            .await
    }

    /// Lists every organization member.
    pub async fn list_all_members(&self, org: &str, per_page: u32) -> GitHubResult<Vec<Record>> {
        Paginator::new(per_page)
            .collect_all(move |page| self.list_members(org, page))
            .await
    }

    /// Invites a user to the organization, or updates their role.
    pub async fn set_membership(
        &self,
        org: &str,
        username: &str,
        role: MembershipRole,
    ) -> GitHubResult<Record> {
        let request = SetMembershipRequest { role };
        self.client
            .put(&format!("/orgs/{}/memberships/{}", org, username), &request)
            .await
    }

    /// Grants a user plain membership of the organization.
    pub async fn grant_membership(&self, org: &str, username: &str) -> GitHubResult<Record> {
        self.set_membership(org, username, MembershipRole::Member)
            .await
    }
}

/// Membership role.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum MembershipRole {
    /// Organization owner.
    Admin,
    /// Regular member.
    #[default]
    Member,
}

#[derive(Debug, Clone, Serialize)]
struct SetMembershipRequest {
    role: MembershipRole,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::{fixtures, MockResponse, MockTransport};
    use std::sync::Arc;

    fn client(mock: &MockTransport) -> GitHubAdminClient {
        GitHubAdminClient::builder()
            .user("admin")
            .token("ghp_token")
            .transport(Arc::new(mock.clone()))
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_list_all_members_stops_on_short_page() {
        let mock = MockTransport::new();
        let full: Vec<_> = (0..3).map(|i| fixtures::user(&format!("u{}", i))).collect();
        mock.on_get("/orgs/acme/members", MockResponse::ok(&full));
        mock.on_get("/orgs/acme/members", MockResponse::ok(&[fixtures::user("last")]));
        let client = client(&mock);

        let members = client
            .organizations()
            .list_all_members("acme", 3)
            .await
            .unwrap();

        assert_eq!(members.len(), 4);
        assert_eq!(members[3]["login"], "last");
        let queries: Vec<_> = mock
            .requests()
            .into_iter()
            .filter_map(|r| r.query)
            .collect();
        assert_eq!(queries, vec!["per_page=3&page=1", "per_page=3&page=2"]);
    }

    #[tokio::test]
    async fn test_grant_membership() {
        let mock = MockTransport::new();
        mock.on_put(
            "/orgs/acme/memberships/octocat",
            MockResponse::ok(&serde_json::json!({"state": "pending", "role": "member"})),
        );
        let client = client(&mock);

        let membership = client
            .organizations()
            .grant_membership("acme", "octocat")
            .await
            .unwrap();

        assert_eq!(membership["state"], "pending");
        assert_eq!(
            mock.requests()[0].json_body(),
            Some(serde_json::json!({"role": "member"}))
        );
    }
}
