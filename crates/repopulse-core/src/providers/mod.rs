// Host implementations for upstream repository APIs
pub mod github;

pub use github::GitHubHost;
