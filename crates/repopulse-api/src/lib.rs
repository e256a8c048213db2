// GitHub API client - the upstream half of the fetch adapter
pub mod github;

// Re-export common types
pub use github::{GitHubClient, GitHubError, GitHubRepo, SearchResponse};
