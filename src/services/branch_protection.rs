//! Branch protection rules over the GraphQL API.
//!
//! Rules are read with their allowance connections so that a rule from one
//! repository can be replayed onto another as a template. Allowances hold
//! actor node ids; when two rules are combined the ids are unioned in
//! first-seen order.

use crate::client::{GitHubAdminClient, Record};
use crate::errors::{GitHubError, GitHubErrorKind, GitHubResult};
use crate::graphql::{self, string_literal, MutationDocument};
use crate::observability::TracingHooks;
use serde::{Deserialize, Serialize};

const TEAM_USER_ACTOR: &str = "actor { ... on Team { name id } ... on User { login id } }";
const TEAM_USER_APP_ACTOR: &str =
    "actor { ... on Team { name id } ... on User { login id } ... on App { name id } }";

const MUTATION_SELECTION: &str = "clientMutationId branchProtectionRule { pattern }";

/// Builds the query listing the first 100 rules of a repository.
pub fn rules_query(owner: &str, repo: &str) -> String {
    let allowances = |field: &str, actor: &str| {
        format!(
            "{}(first: 100) {{ totalCount nodes {{ {} }} }}",
            field, actor
        )
    };

    format!(
        "query {{ repository(owner: {}, name: {}) {{ branchProtectionRules(first: 100) {{ nodes {{ \
         id pattern isAdminEnforced allowsDeletions allowsForcePushes blocksCreations \
         {} {} {} \
         requiredApprovingReviewCount requiredStatusCheckContexts requiredStatusChecks {{ context }} \
         requiresApprovingReviews requiresCodeOwnerReviews requiresCommitSignatures \
         requiresConversationResolution requiresStatusChecks requiresStrictStatusChecks \
         restrictsPushes requiresLinearHistory restrictsReviewDismissals dismissesStaleReviews \
         {} }} }} }} }}",
        string_literal(owner),
        string_literal(repo),
        allowances("bypassForcePushAllowances", TEAM_USER_ACTOR),
        allowances("bypassPullRequestAllowances", TEAM_USER_ACTOR),
        allowances("pushAllowances", TEAM_USER_APP_ACTOR),
        allowances("reviewDismissalAllowances", TEAM_USER_ACTOR),
    )
}

/// A user, team or app referenced by an allowance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// Node id. Absent for actor types the query has no fragment for.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Team or app name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// User login.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub login: Option<String>,
}

/// One allowance entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowanceNode {
    /// The allowed actor.
    #[serde(default)]
    pub actor: Option<Actor>,
}

/// A connection of allowances, e.g. `pushAllowances`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllowanceConnection {
    /// Total number of allowances.
    pub total_count: u32,
    /// The allowances returned.
    #[serde(default)]
    pub nodes: Vec<AllowanceNode>,
}

impl AllowanceConnection {
    /// Actor ids in this connection, deduplicated.
    pub fn actor_ids(&self) -> Vec<String> {
        merge_actor_ids(self, &AllowanceConnection::default())
    }

    fn ids(&self) -> impl Iterator<Item = &str> {
        // totalCount gates the nodes, matching what the API reports.
        let nodes: &[AllowanceNode] = if self.total_count > 0 { &self.nodes } else { &[] };
        nodes
            .iter()
            .filter_map(|node| node.actor.as_ref()?.id.as_deref())
    }
}

/// Unions the actor ids of two connections: ids of `first`, then ids of
/// `second` not seen yet.
pub fn merge_actor_ids(first: &AllowanceConnection, second: &AllowanceConnection) -> Vec<String> {
    let mut ids: Vec<String> = Vec::new();
    for id in first.ids().chain(second.ids()) {
        if !ids.iter().any(|seen| seen == id) {
            ids.push(id.to_string());
        }
    }
    ids
}

/// A required status check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCheck {
    /// Status check context name.
    pub context: String,
}

/// A branch protection rule as read from a repository.
///
/// Every flag is required; a response missing one fails to deserialize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct BranchProtectionRule {
    /// Rule node id.
    pub id: String,
    /// Branch name pattern.
    pub pattern: String,
    pub is_admin_enforced: bool,
    pub allows_deletions: bool,
    pub allows_force_pushes: bool,
    pub blocks_creations: bool,
    pub bypass_force_push_allowances: AllowanceConnection,
    pub bypass_pull_request_allowances: AllowanceConnection,
    pub push_allowances: AllowanceConnection,
    pub required_approving_review_count: Option<u32>,
    pub required_status_check_contexts: Option<Vec<String>>,
    #[serde(default)]
    pub required_status_checks: Option<Vec<StatusCheck>>,
    pub requires_approving_reviews: bool,
    pub requires_code_owner_reviews: bool,
    pub requires_commit_signatures: bool,
    pub requires_conversation_resolution: bool,
    pub requires_status_checks: bool,
    pub requires_strict_status_checks: bool,
    pub restricts_pushes: bool,
    pub requires_linear_history: bool,
    pub restricts_review_dismissals: bool,
    pub review_dismissal_allowances: AllowanceConnection,
    #[serde(default)]
    pub dismisses_stale_reviews: Option<bool>,
}

/// Input of the `createBranchProtectionRule` mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct CreateBranchProtectionRuleInput {
    pub repository_id: String,
    pub pattern: String,
    pub allows_deletions: bool,
    pub allows_force_pushes: bool,
    pub blocks_creations: bool,
    pub bypass_force_push_actor_ids: Vec<String>,
    pub bypass_pull_request_actor_ids: Vec<String>,
    pub is_admin_enforced: bool,
    pub push_actor_ids: Vec<String>,
    pub dismisses_stale_reviews: bool,
    pub required_approving_review_count: u32,
    pub required_status_check_contexts: Vec<String>,
    pub requires_approving_reviews: bool,
    pub requires_code_owner_reviews: bool,
    pub requires_commit_signatures: bool,
    pub requires_conversation_resolution: bool,
    pub requires_linear_history: bool,
    pub requires_status_checks: bool,
    pub requires_strict_status_checks: bool,
    pub restricts_pushes: bool,
    pub restricts_review_dismissals: bool,
    pub review_dismissal_actor_ids: Vec<String>,
}

impl CreateBranchProtectionRuleInput {
    /// Replays `template` onto the repository with the given node id.
    ///
    /// A missing approving review count becomes 0 and a missing stale review
    /// flag becomes `true`.
    pub fn from_template(template: &BranchProtectionRule, repository_id: impl Into<String>) -> Self {
        Self::merged(template, template, repository_id)
    }

    /// Like [`from_template`](Self::from_template), but each allowance list is
    /// the union of the template's and `repository_rule`'s actors.
    pub fn merged(
        template: &BranchProtectionRule,
        repository_rule: &BranchProtectionRule,
        repository_id: impl Into<String>,
    ) -> Self {
        Self {
            repository_id: repository_id.into(),
            pattern: template.pattern.clone(),
            allows_deletions: template.allows_deletions,
            allows_force_pushes: template.allows_force_pushes,
            blocks_creations: template.blocks_creations,
            bypass_force_push_actor_ids: merge_actor_ids(
                &template.bypass_force_push_allowances,
                &repository_rule.bypass_force_push_allowances,
            ),
            bypass_pull_request_actor_ids: merge_actor_ids(
                &template.bypass_pull_request_allowances,
                &repository_rule.bypass_pull_request_allowances,
            ),
            is_admin_enforced: template.is_admin_enforced,
            push_actor_ids: merge_actor_ids(
                &template.push_allowances,
                &repository_rule.push_allowances,
            ),
            dismisses_stale_reviews: template.dismisses_stale_reviews.unwrap_or(true),
            required_approving_review_count: template.required_approving_review_count.unwrap_or(0),
            required_status_check_contexts: template
                .required_status_check_contexts
                .clone()
                .unwrap_or_default(),
            requires_approving_reviews: template.requires_approving_reviews,
            requires_code_owner_reviews: template.requires_code_owner_reviews,
            requires_commit_signatures: template.requires_commit_signatures,
            requires_conversation_resolution: template.requires_conversation_resolution,
            requires_linear_history: template.requires_linear_history,
            requires_status_checks: template.requires_status_checks,
            requires_strict_status_checks: template.requires_strict_status_checks,
            restricts_pushes: template.restricts_pushes,
            restricts_review_dismissals: template.restricts_review_dismissals,
            review_dismissal_actor_ids: merge_actor_ids(
                &template.review_dismissal_allowances,
                &repository_rule.review_dismissal_allowances,
            ),
        }
    }
}

/// A required status check in mutation input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequiredStatusCheckInput {
    /// Status check context name.
    pub context: String,
}

/// `updateBranchProtectionRule` input that turns on strict status checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct UpdateRequiredStatusChecksInput {
    pub branch_protection_rule_id: String,
    pub requires_status_checks: bool,
    pub requires_strict_status_checks: bool,
    pub dismisses_stale_reviews: bool,
    pub required_status_check_contexts: Vec<String>,
    pub required_status_checks: Vec<RequiredStatusCheckInput>,
}

impl UpdateRequiredStatusChecksInput {
    /// Requires exactly `contexts` on the rule.
    pub fn new(rule_id: impl Into<String>, contexts: &[String]) -> Self {
        Self {
            branch_protection_rule_id: rule_id.into(),
            requires_status_checks: true,
            requires_strict_status_checks: true,
            dismisses_stale_reviews: true,
            required_status_check_contexts: contexts.to_vec(),
            required_status_checks: contexts
                .iter()
                .map(|context| RequiredStatusCheckInput {
                    context: context.clone(),
                })
                .collect(),
        }
    }
}

/// `updateBranchProtectionRule` input that changes the branch pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct UpdatePatternInput {
    pub branch_protection_rule_id: String,
    pub pattern: String,
}

/// Input of the `deleteBranchProtectionRule` mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct DeleteBranchProtectionRuleInput {
    pub branch_protection_rule_id: String,
}

/// Pattern of the rule a mutation touched.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RulePattern {
    /// Branch name pattern.
    pub pattern: String,
}

/// Payload returned by the branch protection mutations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchProtectionMutation {
    /// Echo of the client mutation id, usually `None`.
    #[serde(default)]
    pub client_mutation_id: Option<String>,
    /// The created or updated rule. `None` for deletions.
    #[serde(default)]
    pub branch_protection_rule: Option<RulePattern>,
}

/// Service for branch protection rules.
pub struct BranchProtectionService<'a> {
    client: &'a GitHubAdminClient,
}

impl<'a> BranchProtectionService<'a> {
    /// Creates a new branch protection service.
    pub fn new(client: &'a GitHubAdminClient) -> Self {
        Self { client }
    }

    /// Lists the first 100 branch protection rules of a repository.
    pub async fn list_repository_branch_protection_rules(
        &self,
        owner: &str,
        repo: &str,
    ) -> GitHubResult<Vec<BranchProtectionRule>> {
        let response = self.client.graphql(&rules_query(owner, repo)).await?;
        graphql::extract(
            response,
            &["data", "repository", "branchProtectionRules", "nodes"],
        )
    }

    /// Creates a copy of `template` on `repository`, a repository record as
    /// returned by [`RepositoriesService::get`](crate::services::RepositoriesService::get).
    pub async fn create_repository_branch_protection_rule_by_template(
        &self,
        template: &BranchProtectionRule,
        repository: &Record,
    ) -> GitHubResult<BranchProtectionMutation> {
        let repository_id = repository
            .get("node_id")
            .and_then(|id| id.as_str())
            .ok_or_else(|| {
                GitHubError::new(
                    GitHubErrorKind::InvalidParameter,
                    "Repository record has no node_id",
                )
            })?;

        self.create_rule(&CreateBranchProtectionRuleInput::from_template(
            template,
            repository_id,
        ))
        .await
    }

    /// Creates a rule from a fully built input.
    pub async fn create_rule(
        &self,
        input: &CreateBranchProtectionRuleInput,
    ) -> GitHubResult<BranchProtectionMutation> {
        self.mutate("createBranchProtectionRule", input, &input.pattern)
            .await
    }

    /// Makes the rule require exactly the given status check contexts.
    pub async fn update_required_status_check_context_to_branch_policy(
        &self,
        rule_id: &str,
        contexts: &[String],
    ) -> GitHubResult<BranchProtectionMutation> {
        let input = UpdateRequiredStatusChecksInput::new(rule_id, contexts);
        self.mutate("updateBranchProtectionRule", &input, rule_id)
            .await
    }

    /// Changes the branch pattern the rule applies to.
    pub async fn change_branch_regex_pattern_policies(
        &self,
        rule_id: &str,
        pattern: &str,
    ) -> GitHubResult<BranchProtectionMutation> {
        let input = UpdatePatternInput {
            branch_protection_rule_id: rule_id.to_string(),
            pattern: pattern.to_string(),
        };
        self.mutate("updateBranchProtectionRule", &input, rule_id)
            .await
    }

    /// Deletes a rule.
    pub async fn delete_repository_branch_protection_rule(
        &self,
        rule_id: &str,
    ) -> GitHubResult<BranchProtectionMutation> {
        let input = DeleteBranchProtectionRuleInput {
            branch_protection_rule_id: rule_id.to_string(),
        };
        let document = MutationDocument::new("deleteBranchProtectionRule", &input, "clientMutationId")?;
        self.send(document, rule_id).await
    }

    async fn mutate<I: Serialize>(
        &self,
        name: &'static str,
        input: &I,
        target: &str,
    ) -> GitHubResult<BranchProtectionMutation> {
        let document = MutationDocument::new(name, input, MUTATION_SELECTION)?;
        self.send(document, target).await
    }

    async fn send(
        &self,
        document: MutationDocument,
        target: &str,
    ) -> GitHubResult<BranchProtectionMutation> {
        let response = self.client.graphql(&document.render()).await?;
        TracingHooks::on_branch_protection_change(document.name(), target);
        graphql::extract(response, &["data", document.name()])
    }
}
