//! REST calls over the real transport.

use super::*;
use integrations_github_admin::{GitHubAdminClient, ProxyConfig, TeamPrivacy, TeamRepoPermission};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn test_get_repository_sends_basic_auth_and_accept() {
    let mock_server = setup_mock_server().await;

    rest_mock("GET", "/repos/acme/api")
        .and(header("user-agent", "integrations-github-admin/0.1.0"))
        .respond_with(success_response(json!({
            "id": 7,
            "node_id": "R_acme_api",
            "full_name": "acme/api"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let repo = client.repositories().get("acme", "api").await.unwrap();

    assert_eq!(repo["node_id"], "R_acme_api");
}

#[tokio::test]
async fn test_create_team_posts_json_body() {
    let mock_server = setup_mock_server().await;

    rest_mock("POST", "/orgs/acme/teams")
        .and(header("content-type", "application/json"))
        .and(body_json(json!({"name": "platform", "privacy": "closed"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 1,
            "slug": "platform"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let team = client
        .teams()
        .create("acme", "platform", TeamPrivacy::Closed)
        .await
        .unwrap();

    assert_eq!(team["slug"], "platform");
}

#[tokio::test]
async fn test_grant_repository_to_team() {
    let mock_server = setup_mock_server().await;

    rest_mock("PUT", "/orgs/acme/teams/platform/repos/acme/api")
        .and(body_json(json!({"permission": "maintain"})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let result = client
        .teams()
        .grant_repository("acme", "platform", "acme", "api", TeamRepoPermission::Maintain)
        .await
        .unwrap();

    assert!(result.is_null());
}

#[tokio::test]
async fn test_delete_branch_targets_git_ref() {
    let mock_server = setup_mock_server().await;

    Mock::given(method("DELETE"))
        .and(path("/repos/acme/api/git/refs/heads/feature/login"))
        .and(header("Authorization", BASIC_AUTH))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    client
        .repositories()
        .delete_branch("acme", "api", "feature/login")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_list_protected_branches_filters_by_query() {
    let mock_server = setup_mock_server().await;

    rest_mock("GET", "/repos/acme/api/branches")
        .and(query_param("protected", "true"))
        .and(query_param("per_page", "100"))
        .and(query_param("page", "1"))
        .respond_with(success_response(json!([{"name": "main", "protected": true}])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let branches = client
        .repositories()
        .list_all_branches("acme", "api", Some(true))
        .await
        .unwrap();

    assert_eq!(branches.len(), 1);
    assert_eq!(branches[0]["name"], "main");
}

#[tokio::test]
async fn test_http_proxy_carries_rest_requests() {
    let proxy_server = setup_mock_server().await;

    rest_mock("GET", "/users/octocat")
        .respond_with(success_response(json!({"login": "octocat"})))
        .expect(1)
        .mount(&proxy_server)
        .await;

    let client = GitHubAdminClient::builder()
        .user("octocat")
        .token("ghp_test")
        .base_url("http://github.invalid")
        .proxy(ProxyConfig {
            http: Some(proxy_server.uri()),
            https: None,
        })
        .build()
        .unwrap();

    let user = client.users().get("octocat").await.unwrap();
    assert_eq!(user["login"], "octocat");

    let received = proxy_server.received_requests().await.unwrap();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].url.host_str(), Some("github.invalid"));
}
