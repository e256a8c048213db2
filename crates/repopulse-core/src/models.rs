use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::trend::Trend;

/// A repository as reported by the host API - read-only input to scoring
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepoRecord {
    pub id: i64,
    pub node_id: String,
    pub name: String,
    pub full_name: String,
    pub description: Option<String>,
    pub url: String,
    pub stars: u32,
    pub forks: u32,
    pub language: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_private: bool,
    pub is_fork: bool,
    pub is_archived: bool,
    pub is_disabled: bool,
}

/// One page of search results from a repository host
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchedPage {
    pub total_count: u32,
    pub items: Vec<RepoRecord>,
}

/// A repository enriched with its popularity score and movement label
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredRepo {
    #[serde(flatten)]
    pub repo: RepoRecord,
    pub popularity_score: f64,
    pub trend: Trend,
}
