//! Page aggregation over the real transport.

use super::*;
use serde_json::{json, Value};
use test_case::test_case;
use wiremock::matchers::query_param;

fn members(range: std::ops::Range<usize>) -> Value {
    Value::Array(
        range
            .map(|i| json!({"id": i, "login": format!("user{}", i)}))
            .collect(),
    )
}

/// Mounts `fetches` pages over `total` records; each page is expected exactly once.
async fn mount_member_pages(server: &wiremock::MockServer, total: usize, per_page: usize, fetches: usize) {
    for page in 1..=fetches {
        let start = ((page - 1) * per_page).min(total);
        let end = (page * per_page).min(total);
        rest_mock("GET", "/orgs/acme/members")
            .and(query_param("per_page", per_page.to_string()))
            .and(query_param("page", page.to_string()))
            .respond_with(success_response(members(start..end)))
            .expect(1)
            .mount(server)
            .await;
    }
}

#[test_case(0, 30, 1 ; "no records")]
#[test_case(9, 10, 1 ; "single short page")]
#[test_case(45, 30, 2 ; "short second page")]
#[test_case(60, 30, 3 ; "exact multiple needs a trailing empty page")]
#[test_case(250, 100, 3 ; "maximum page size")]
#[tokio::test]
async fn test_list_all_members_fetch_count(total: usize, per_page: usize, fetches: usize) {
    let mock_server = setup_mock_server().await;
    mount_member_pages(&mock_server, total, per_page, fetches).await;

    let client = client_for(&mock_server);
    let all = client
        .organizations()
        .list_all_members("acme", per_page as u32)
        .await
        .unwrap();

    assert_eq!(all.len(), total);
    let ids: Vec<u64> = all.iter().filter_map(|m| m["id"].as_u64()).collect();
    assert_eq!(ids, (0..total as u64).collect::<Vec<_>>());
}

#[tokio::test]
async fn test_discussions_stop_only_on_empty_page() {
    let mock_server = setup_mock_server().await;
    let path = "/orgs/acme/teams/platform/discussions";

    rest_mock("GET", path)
        .and(query_param("page", "1"))
        .respond_with(success_response(json!([{"number": 1, "title": "a"}])))
        .expect(1)
        .mount(&mock_server)
        .await;
    rest_mock("GET", path)
        .and(query_param("page", "2"))
        .respond_with(success_response(json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let discussions = client
        .teams()
        .list_all_discussions("acme", "platform", 30)
        .await
        .unwrap();

    assert_eq!(discussions.len(), 1);
}

#[tokio::test]
async fn test_failed_page_discards_partial_results() {
    let mock_server = setup_mock_server().await;

    rest_mock("GET", "/orgs/acme/members")
        .and(query_param("page", "1"))
        .respond_with(success_response(members(0..2)))
        .expect(1)
        .mount(&mock_server)
        .await;
    rest_mock("GET", "/orgs/acme/members")
        .and(query_param("page", "2"))
        .respond_with(wiremock::ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let error = client
        .organizations()
        .list_all_members("acme", 2)
        .await
        .unwrap_err();

    assert_eq!(error.status_code(), Some(500));
    assert_eq!(error.message(), "boom");
}

#[tokio::test]
async fn test_repeated_listing_returns_same_aggregate() {
    let mock_server = setup_mock_server().await;
    for (page, range) in [(1, 0..30), (2, 30..45)] {
        rest_mock("GET", "/orgs/acme/members")
            .and(query_param("page", page.to_string()))
            .respond_with(success_response(members(range)))
            .expect(2)
            .mount(&mock_server)
            .await;
    }

    let client = client_for(&mock_server);
    let first = client.organizations().list_all_members("acme", 30).await.unwrap();
    let second = client.organizations().list_all_members("acme", 30).await.unwrap();

    assert_eq!(first.len(), 45);
    assert_eq!(first, second);
    assert_eq!(mock_server.received_requests().await.unwrap().len(), 4);
}
