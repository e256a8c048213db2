// GitHub host implementation - bridges the API client with the RepoHost trait
use async_trait::async_trait;
use repopulse_api::{GitHubClient, GitHubRepo};

use crate::models::{FetchedPage, RepoRecord};
use crate::search::{RepoHost, SearchFilter};
use crate::{Error, Result};

/// Wrapper around GitHubClient that implements RepoHost
pub struct GitHubHost {
    client: GitHubClient,
}

impl GitHubHost {
    pub fn new(token: Option<String>) -> Self {
        Self {
            client: GitHubClient::new(token),
        }
    }

    /// For GitHub Enterprise instances
    pub fn with_base_url(token: Option<String>, base_url: String) -> Self {
        Self {
            client: GitHubClient::with_base_url(token, base_url),
        }
    }
}

#[async_trait]
impl RepoHost for GitHubHost {
    async fn search(&self, filter: &SearchFilter) -> Result<FetchedPage> {
        let response = self
            .client
            .search_repositories(filter.language.as_deref(), filter.created_after)
            .await
            .map_err(|e| Error::FetchError(e.to_string()))?;

        Ok(FetchedPage {
            total_count: response.total_count,
            items: response.items.into_iter().map(github_to_record).collect(),
        })
    }
}

/// Convert the GitHub payload to our internal record
fn github_to_record(gh: GitHubRepo) -> RepoRecord {
    RepoRecord {
        id: gh.id,
        node_id: gh.node_id,
        name: gh.name,
        full_name: gh.full_name,
        description: gh.description,
        url: gh.html_url,
        stars: gh.stargazers_count,
        forks: gh.forks_count,
        language: gh.language,
        created_at: gh.created_at,
        updated_at: gh.updated_at,
        is_private: gh.is_private,
        is_fork: gh.fork,
        is_archived: gh.archived,
        is_disabled: gh.disabled,
    }
}
