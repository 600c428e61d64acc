//! Error classification over the real transport.

use super::*;
use integrations_github_admin::GitHubErrorKind;
use serde_json::json;
use wiremock::ResponseTemplate;

#[tokio::test]
async fn test_not_found_keeps_raw_body() {
    let mock_server = setup_mock_server().await;

    rest_mock("GET", "/users/ghost")
        .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let error = client.users().get("ghost").await.unwrap_err();

    assert_eq!(*error.kind(), GitHubErrorKind::NotFound);
    assert_eq!(error.status_code(), Some(404));
    assert_eq!(error.message(), "not found");
}

#[tokio::test]
async fn test_graphql_errors_on_success_status() {
    let mock_server = setup_mock_server().await;

    graphql_mock()
        .respond_with(success_response(json!({
            "data": null,
            "errors": [{ "message": "bad field" }, { "message": "no access" }]
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let error = client
        .branch_protection()
        .list_repository_branch_protection_rules("acme", "api")
        .await
        .unwrap_err();

    assert_eq!(*error.kind(), GitHubErrorKind::QueryError);
    assert_eq!(error.message(), "Error 1: bad field.\nError 2: no access");
}

#[tokio::test]
async fn test_rate_limit_headers_are_attached() {
    let mock_server = setup_mock_server().await;

    rest_mock("GET", "/orgs/acme/members")
        .respond_with(
            ResponseTemplate::new(403)
                .set_body_string("API rate limit exceeded")
                .insert_header("x-ratelimit-limit", "5000")
                .insert_header("x-ratelimit-remaining", "0")
                .insert_header("x-ratelimit-reset", "1700000000"),
        )
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let error = client
        .organizations()
        .list_all_members("acme", 30)
        .await
        .unwrap_err();

    let info = error.rate_limit().expect("rate limit info");
    assert_eq!(info.limit, 5000);
    assert_eq!(info.remaining, 0);
    assert_eq!(info.reset_at.timestamp(), 1_700_000_000);
    assert_eq!(client.metrics().snapshot().requests_rate_limited, 1);
}

#[tokio::test]
async fn test_unreachable_host_is_connection_failure() {
    let client = integrations_github_admin::GitHubAdminClient::builder()
        .user("octocat")
        .token("ghp_test")
        .base_url("http://127.0.0.1:1")
        .build()
        .unwrap();

    let error = client.users().get("octocat").await.unwrap_err();

    assert_eq!(*error.kind(), GitHubErrorKind::ConnectionFailed);
}
