//! GitHub API service implementations, one per endpoint group.

mod branch_protection;
mod organizations;
mod pull_requests;
mod repositories;
mod teams;
mod users;

pub use branch_protection::*;
pub use organizations::*;
pub use pull_requests::*;
pub use repositories::*;
pub use teams::*;
pub use users::*;
