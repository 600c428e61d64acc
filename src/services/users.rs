//! User operations.

use crate::client::{GitHubAdminClient, Record};
use crate::errors::GitHubResult;

/// Service for user operations.
pub struct UsersService<'a> {
    client: &'a GitHubAdminClient,
}

impl<'a> UsersService<'a> {
    /// Creates a new users service.
    pub fn new(client: &'a GitHubAdminClient) -> Self {
        Self { client }
    }

    /// Gets a user by username.
    pub async fn get(&self, username: &str) -> GitHubResult<Record> {
        self.client.get(&format!("/users/{}", username)).await
    }
}
