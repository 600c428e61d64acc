//! Replaying branch protection rules between repositories.

use super::*;
use integrations_github_admin::mocks::fixtures;
use integrations_github_admin::CreateBranchProtectionRuleInput;
use serde_json::json;
use wiremock::matchers::body_string_contains;

#[tokio::test]
async fn test_copy_rule_to_another_repository() {
    let mock_server = setup_mock_server().await;

    let mut source_rule = fixtures::branch_protection_rule("BPR_src", "release/*");
    source_rule["pushAllowances"] = fixtures::allowances(&["U_1", "T_2"]);

    graphql_mock()
        .and(body_string_contains("repository(owner: \\\"acme\\\", name: \\\"api\\\")"))
        .respond_with(success_response(json!({
            "data": { "repository": { "branchProtectionRules": { "nodes": [source_rule] } } }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;
    rest_mock("GET", "/repos/acme/web")
        .respond_with(success_response(fixtures::repository("acme", "web")))
        .expect(1)
        .mount(&mock_server)
        .await;
    graphql_mock()
        .and(body_string_contains("createBranchProtectionRule"))
        .and(body_string_contains("repositoryId: \\\"R_acme_web\\\""))
        .and(body_string_contains("pushActorIds: [\\\"U_1\\\", \\\"T_2\\\"]"))
        .respond_with(success_response(json!({
            "data": {
                "createBranchProtectionRule": {
                    "clientMutationId": null,
                    "branchProtectionRule": { "pattern": "release/*" }
                }
            }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let rules = client
        .branch_protection()
        .list_repository_branch_protection_rules("acme", "api")
        .await
        .unwrap();
    let target = client.repositories().get("acme", "web").await.unwrap();

    let created = client
        .branch_protection()
        .create_repository_branch_protection_rule_by_template(&rules[0], &target)
        .await
        .unwrap();

    assert_eq!(
        created.branch_protection_rule.map(|r| r.pattern).as_deref(),
        Some("release/*")
    );
}

#[tokio::test]
async fn test_merged_rule_unions_existing_allowances() {
    let mock_server = setup_mock_server().await;

    let mut source_rule = fixtures::branch_protection_rule("BPR_src", "main");
    source_rule["reviewDismissalAllowances"] = fixtures::allowances(&["U_1", "U_2"]);
    let mut target_rule = fixtures::branch_protection_rule("BPR_dst", "main");
    target_rule["reviewDismissalAllowances"] = fixtures::allowances(&["U_2", "U_3"]);

    graphql_mock()
        .and(body_string_contains("createBranchProtectionRule"))
        .and(body_string_contains(
            "reviewDismissalActorIds: [\\\"U_1\\\", \\\"U_2\\\", \\\"U_3\\\"]",
        ))
        .respond_with(success_response(json!({
            "data": { "createBranchProtectionRule": { "branchProtectionRule": { "pattern": "main" } } }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let source = serde_json::from_value(source_rule).unwrap();
    let target = serde_json::from_value(target_rule).unwrap();
    let input = CreateBranchProtectionRuleInput::merged(&source, &target, "R_acme_web");

    let client = client_for(&mock_server);
    client.branch_protection().create_rule(&input).await.unwrap();
}

#[tokio::test]
async fn test_update_status_checks_and_delete() {
    let mock_server = setup_mock_server().await;

    graphql_mock()
        .and(body_string_contains("updateBranchProtectionRule"))
        .and(body_string_contains("requiredStatusCheckContexts: [\\\"ci/test\\\"]"))
        .and(body_string_contains("requiresStrictStatusChecks: true"))
        .respond_with(success_response(json!({
            "data": { "updateBranchProtectionRule": { "branchProtectionRule": { "pattern": "main" } } }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;
    graphql_mock()
        .and(body_string_contains("deleteBranchProtectionRule"))
        .respond_with(success_response(json!({
            "data": { "deleteBranchProtectionRule": { "clientMutationId": null } }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let service = client.branch_protection();
    service
        .update_required_status_check_context_to_branch_policy("BPR_1", &["ci/test".to_string()])
        .await
        .unwrap();
    let deleted = service
        .delete_repository_branch_protection_rule("BPR_1")
        .await
        .unwrap();

    assert!(deleted.branch_protection_rule.is_none());
}
