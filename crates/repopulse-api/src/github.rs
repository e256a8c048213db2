use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

const GITHUB_API_BASE: &str = "https://api.github.com";
const GITHUB_V3_JSON: &str = "application/vnd.github.v3+json";

#[derive(Error, Debug)]
pub enum GitHubError {
    #[error("API request failed with status {status}: {message}")]
    RequestFailed { status: u16, message: String },

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    ParseError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GitHubError>;

/// Thin client for the GitHub repository search endpoint.
///
/// One request per call, no retry and no caching. Failures carry the
/// upstream status and body so callers can log something useful.
pub struct GitHubClient {
    client: reqwest::Client,
    token: Option<String>,
    base_url: String,
}

impl GitHubClient {
    pub fn new(token: Option<String>) -> Self {
        Self::with_base_url(token, GITHUB_API_BASE.to_string())
    }

    /// For GitHub Enterprise instances (and tests against a local server)
    pub fn with_base_url(token: Option<String>, base_url: String) -> Self {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_static("repopulse/0.1.0"),
        );
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static(GITHUB_V3_JSON),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            token,
            base_url,
        }
    }

    /// Search repositories by language and earliest creation date.
    ///
    /// Issues `GET /search/repositories?q=language:<l> created:>=<date>`.
    /// Any non-2xx status is an error; the caller decides what to do with it.
    pub async fn search_repositories(
        &self,
        language: Option<&str>,
        created_after: NaiveDate,
    ) -> Result<SearchResponse> {
        let url = format!("{}/search/repositories", self.base_url);
        let query = build_search_query(language, created_after);
        debug!("GitHub search query: {}", query);

        let mut request = self.client.get(&url).query(&[("q", query.as_str())]);

        if let Some(ref token) = self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(GitHubError::RequestFailed { status, message });
        }

        let results: SearchResponse = response.json().await?;
        Ok(results)
    }
}

/// Build the `q` parameter for the search endpoint.
fn build_search_query(language: Option<&str>, created_after: NaiveDate) -> String {
    let created = format!("created:>={}", created_after.format("%Y-%m-%d"));
    match language {
        Some(lang) => format!("language:{} {}", lang, created),
        None => created,
    }
}

/// Response envelope of `/search/repositories`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub total_count: u32,
    #[serde(default)]
    pub incomplete_results: bool,
    pub items: Vec<GitHubRepo>,
}

/// The subset of the GitHub repository payload we care about
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubRepo {
    pub id: i64,
    pub node_id: String,
    pub name: String,
    pub full_name: String,
    #[serde(rename = "private")]
    pub is_private: bool,
    pub html_url: String,
    pub description: Option<String>,
    pub fork: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub stargazers_count: u32,
    #[serde(default)]
    pub forks_count: u32,
    pub language: Option<String>,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub disabled: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_query_with_language() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        assert_eq!(
            build_search_query(Some("rust"), date),
            "language:rust created:>=2024-01-15"
        );
    }

    #[test]
    fn test_build_query_without_language() {
        let date = NaiveDate::from_ymd_opt(2023, 6, 1).unwrap();
        assert_eq!(build_search_query(None, date), "created:>=2023-06-01");
    }

    #[test]
    fn test_parse_search_response() {
        let payload = r#"{
            "total_count": 1,
            "incomplete_results": false,
            "items": [{
                "id": 1296269,
                "node_id": "MDEwOlJlcG9zaXRvcnkxMjk2MjY5",
                "name": "Hello-World",
                "full_name": "octocat/Hello-World",
                "private": false,
                "html_url": "https://github.com/octocat/Hello-World",
                "description": "This your first repo!",
                "fork": false,
                "created_at": "2011-01-26T19:01:12Z",
                "updated_at": "2011-01-26T19:14:43Z",
                "stargazers_count": 80,
                "forks_count": 9,
                "language": "C",
                "archived": false,
                "disabled": false
            }]
        }"#;

        let response: SearchResponse = serde_json::from_str(payload).unwrap();
        assert_eq!(response.total_count, 1);
        assert_eq!(response.items.len(), 1);

        let repo = &response.items[0];
        assert_eq!(repo.id, 1296269);
        assert_eq!(repo.full_name, "octocat/Hello-World");
        assert_eq!(repo.stargazers_count, 80);
        assert_eq!(repo.forks_count, 9);
        assert!(!repo.is_private);
    }

    #[test]
    fn test_parse_response_with_missing_counts() {
        // Search results sometimes omit fields; counts default to zero
        let payload = r#"{
            "total_count": 1,
            "items": [{
                "id": 7,
                "node_id": "abc",
                "name": "sparse",
                "full_name": "someone/sparse",
                "private": false,
                "html_url": "https://github.com/someone/sparse",
                "description": null,
                "fork": false,
                "created_at": "2020-03-01T00:00:00Z",
                "updated_at": "2020-03-02T00:00:00Z",
                "language": null
            }]
        }"#;

        let response: SearchResponse = serde_json::from_str(payload).unwrap();
        let repo = &response.items[0];
        assert_eq!(repo.stargazers_count, 0);
        assert_eq!(repo.forks_count, 0);
        assert!(repo.language.is_none());
    }
}
