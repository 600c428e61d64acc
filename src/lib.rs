//! # GitHub Organization Administration Client
//!
//! An async client for the GitHub administration tasks an organization runs
//! day to day:
//! - Organization membership, teams, team discussions
//! - Repositories, branches, commits, releases, webhooks, collaborators
//! - Pull requests and their reviews and comments
//! - Branch protection rules over GraphQL, including replaying a rule from
//!   one repository onto another
//!
//! Every list endpoint comes in a single-page form and an `*_all` form that
//! aggregates pages in order. Records are returned as decoded JSON
//! ([`Record`]); failures, including GraphQL payloads carrying `errors`,
//! surface as a single [`GitHubError`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use integrations_github_admin::{GitHubAdminClient, TeamPrivacy};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = GitHubAdminClient::builder()
//!         .user("octocat")
//!         .token("ghp_xxxxxxxxxxxx")
//!         .build()?;
//!
//!     let team = client.teams().create("acme", "platform", TeamPrivacy::Closed).await?;
//!     println!("created {}", team["slug"]);
//!
//!     for repo in client.repositories().list_all_for_org("acme", &Default::default(), 100).await? {
//!         println!("{}", repo["full_name"]);
//!     }
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// Core modules
pub mod config;
pub mod errors;

// Authentication
pub mod auth;

// HTTP transport and response handling
pub mod response;
pub mod transport;

// Client
pub mod client;

// Pagination handling
pub mod pagination;

// GraphQL document building
pub mod graphql;

// API Services
pub mod services;

// Observability
pub mod observability;

// Mocks for testing
pub mod mocks;

// Re-exports for convenience
pub use auth::{AuthScheme, Credentials};
pub use client::{GitHubAdminClient, GitHubAdminClientBuilder, Record};
pub use config::{GitHubAdminConfig, GitHubAdminConfigBuilder, ProxyConfig};
pub use errors::{GitHubError, GitHubErrorKind, GitHubResult};
pub use pagination::{PaginationParams, Paginator, StopRule};
pub use services::*;
pub use transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};
