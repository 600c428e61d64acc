//! Copies every branch protection rule of one repository onto another.
//!
//! Rules the target already has for the same pattern are replaced by a merged
//! rule whose allowances are the union of both.
//!
//! # Usage
//!
//! ```bash
//! export GITHUB_USER="octocat"
//! export GITHUB_TOKEN="ghp_..."
//! cargo run --example copy_branch_protection -- acme/api acme/web
//! ```

use integrations_github_admin::{CreateBranchProtectionRuleInput, GitHubAdminClient};
use tracing_subscriber::EnvFilter;

fn parse_repo(arg: Option<String>) -> Result<(String, String), Box<dyn std::error::Error>> {
    let arg = arg.ok_or("usage: copy_branch_protection <owner/source> <owner/target>")?;
    let (owner, name) = arg
        .split_once('/')
        .ok_or_else(|| format!("expected owner/name, got {}", arg))?;
    Ok((owner.to_string(), name.to_string()))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .init();

    let mut args = std::env::args().skip(1);
    let (source_owner, source_repo) = parse_repo(args.next())?;
    let (target_owner, target_repo) = parse_repo(args.next())?;

    let client = GitHubAdminClient::from_env()?;
    let protection = client.branch_protection();

    let source_rules = protection
        .list_repository_branch_protection_rules(&source_owner, &source_repo)
        .await?;
    let target = client.repositories().get(&target_owner, &target_repo).await?;
    let target_id = target["node_id"].as_str().ok_or("target has no node_id")?;
    let existing = protection
        .list_repository_branch_protection_rules(&target_owner, &target_repo)
        .await?;

    for rule in &source_rules {
        match existing.iter().find(|r| r.pattern == rule.pattern) {
            Some(current) => {
                let input = CreateBranchProtectionRuleInput::merged(rule, current, target_id);
                protection
                    .delete_repository_branch_protection_rule(&current.id)
                    .await?;
                protection.create_rule(&input).await?;
                println!("merged {}", rule.pattern);
            }
            None => {
                protection
                    .create_repository_branch_protection_rule_by_template(rule, &target)
                    .await?;
                println!("copied {}", rule.pattern);
            }
        }
    }

    let snapshot = client.metrics().snapshot();
    println!(
        "{} requests, {} failed",
        snapshot.requests_total, snapshot.requests_failed
    );

    Ok(())
}
