use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use repopulse_store::ScoreStore;
use tracing::{debug, info};

use crate::models::{FetchedPage, ScoredRepo};
use crate::prefs::PreferenceService;
use crate::scoring::ScoreCalculator;
use crate::trend::TrendTracker;
use crate::Result;

/// Filter accepted by a repository host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchFilter {
    pub language: Option<String>,
    pub created_after: NaiveDate,
}

/// Trait for repository hosts - keeps the upstream API swappable and the
/// orchestration testable.
///
/// Implementations translate their own error type into the crate's generic
/// fetch error before returning.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RepoHost: Send + Sync {
    async fn search(&self, filter: &SearchFilter) -> Result<FetchedPage>;
}

/// Coordinates fetch, scoring, and trend recording for one search request.
pub struct SearchEngine {
    host: Box<dyn RepoHost>,
    calculator: ScoreCalculator,
    trends: TrendTracker,
}

impl SearchEngine {
    pub fn new(host: Box<dyn RepoHost>, store: Arc<ScoreStore>) -> Self {
        Self {
            host,
            calculator: ScoreCalculator::new(PreferenceService::new(Arc::clone(&store))),
            trends: TrendTracker::new(store),
        }
    }

    /// Fetch matching repositories and return them scored and classified.
    ///
    /// Stars and forks normalize against the maxima of the fetched page;
    /// the recency window is anchored at the filter's creation date. A
    /// fetch failure fails the whole request, and an empty page writes
    /// nothing.
    pub async fn search_scored(
        &self,
        filter: &SearchFilter,
        user_id: i64,
    ) -> Result<Vec<ScoredRepo>> {
        let page = self.host.search(filter).await?;
        info!(
            "Fetched {} of {} matching repositories",
            page.items.len(),
            page.total_count
        );

        let max_stars = page.items.iter().map(|r| r.stars).max().unwrap_or(0);
        let max_forks = page.items.iter().map(|r| r.forks).max().unwrap_or(0);

        let mut scored = Vec::with_capacity(page.items.len());
        for repo in page.items {
            let popularity_score = self.calculator.popularity_score(
                repo.stars,
                repo.forks,
                repo.updated_at.date_naive(),
                max_stars,
                max_forks,
                filter.created_after,
                user_id,
            )?;
            let trend = self
                .trends
                .record_and_classify(repo.id, &repo.name, popularity_score)?;

            debug!("{} scored {} ({})", repo.full_name, popularity_score, trend);
            scored.push(ScoredRepo {
                repo,
                popularity_score,
                trend,
            });
        }

        Ok(scored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RepoRecord;
    use crate::scoring::ScoreWeights;
    use crate::trend::Trend;
    use crate::Error;
    use chrono::{Duration, Utc};

    fn record(id: i64, name: &str, stars: u32, forks: u32) -> RepoRecord {
        let now = Utc::now();
        RepoRecord {
            id,
            node_id: format!("node-{}", id),
            name: name.to_string(),
            full_name: format!("octo/{}", name),
            description: None,
            url: format!("https://github.com/octo/{}", name),
            stars,
            forks,
            language: Some("Rust".to_string()),
            created_at: now - Duration::days(20),
            updated_at: now - Duration::days(10),
            is_private: false,
            is_fork: false,
            is_archived: false,
            is_disabled: false,
        }
    }

    fn filter_30_days() -> SearchFilter {
        SearchFilter {
            language: Some("rust".to_string()),
            created_after: Utc::now().date_naive() - Duration::days(30),
        }
    }

    fn engine_for(page: FetchedPage, store: Arc<ScoreStore>) -> SearchEngine {
        let mut host = MockRepoHost::new();
        host.expect_search().returning(move |_| Ok(page.clone()));
        SearchEngine::new(Box::new(host), store)
    }

    #[tokio::test]
    async fn test_first_run_scores_and_reports_no_history() {
        let store = Arc::new(ScoreStore::open_in_memory().unwrap());
        let page = FetchedPage {
            total_count: 2,
            items: vec![record(1, "alpha", 100, 50), record(2, "beta", 50, 25)],
        };
        let engine = engine_for(page, Arc::clone(&store));

        let results = engine.search_scored(&filter_30_days(), 1).await.unwrap();

        assert_eq!(results.len(), 2);
        // default weights, norms 1.0/1.0 and recency 1 - 10/30
        assert_eq!(results[0].popularity_score, 0.93);
        assert_eq!(results[1].popularity_score, 0.53);
        assert!(results.iter().all(|r| r.trend == Trend::NotAvailable));

        // every scoring appended a sample
        assert_eq!(store.sample_count(1).unwrap(), 1);
        assert_eq!(store.sample_count(2).unwrap(), 1);
    }

    #[tokio::test]
    async fn test_repeat_run_classifies_against_history() {
        let store = Arc::new(ScoreStore::open_in_memory().unwrap());
        let page = FetchedPage {
            total_count: 1,
            items: vec![record(1, "alpha", 100, 50)],
        };
        let engine = engine_for(page, Arc::clone(&store));
        let filter = filter_30_days();

        let first = engine.search_scored(&filter, 1).await.unwrap();
        assert_eq!(first[0].trend, Trend::NotAvailable);

        let second = engine.search_scored(&filter, 1).await.unwrap();
        assert_eq!(second[0].trend, Trend::Same);

        assert_eq!(store.sample_count(1).unwrap(), 2);
    }

    #[tokio::test]
    async fn test_saved_preferences_shape_the_score() {
        let store = Arc::new(ScoreStore::open_in_memory().unwrap());
        PreferenceService::new(Arc::clone(&store))
            .save(&ScoreWeights {
                user_id: 7,
                stars_weight: 1.0,
                forks_weight: 0.0,
                recency_weight: 0.0,
            })
            .unwrap();

        let page = FetchedPage {
            total_count: 2,
            items: vec![record(1, "alpha", 100, 50), record(2, "beta", 80, 10)],
        };
        let engine = engine_for(page, Arc::clone(&store));

        let results = engine.search_scored(&filter_30_days(), 7).await.unwrap();

        // stars-only weighting: scores are the normalized star counts
        assert_eq!(results[0].popularity_score, 1.0);
        assert_eq!(results[1].popularity_score, 0.8);
    }

    #[tokio::test]
    async fn test_empty_page_writes_nothing() {
        let store = Arc::new(ScoreStore::open_in_memory().unwrap());
        let page = FetchedPage {
            total_count: 0,
            items: vec![],
        };
        let engine = engine_for(page, Arc::clone(&store));

        let results = engine.search_scored(&filter_30_days(), 1).await.unwrap();

        assert!(results.is_empty());
        assert_eq!(store.sample_count(1).unwrap(), 0);
    }

    #[tokio::test]
    async fn test_fetch_failure_fails_the_whole_request() {
        let store = Arc::new(ScoreStore::open_in_memory().unwrap());
        let mut host = MockRepoHost::new();
        host.expect_search()
            .returning(|_| Err(Error::FetchError("status 503".to_string())));
        let engine = SearchEngine::new(Box::new(host), Arc::clone(&store));

        let result = engine.search_scored(&filter_30_days(), 1).await;

        assert!(matches!(result, Err(Error::FetchError(_))));
        assert_eq!(store.sample_count(1).unwrap(), 0);
    }

    #[tokio::test]
    async fn test_filter_is_passed_to_the_host() {
        let store = Arc::new(ScoreStore::open_in_memory().unwrap());
        let filter = filter_30_days();
        let expected = filter.clone();

        let mut host = MockRepoHost::new();
        host.expect_search()
            .withf(move |f| *f == expected)
            .returning(|_| {
                Ok(FetchedPage {
                    total_count: 0,
                    items: vec![],
                })
            });
        let engine = SearchEngine::new(Box::new(host), store);

        engine.search_scored(&filter, 1).await.unwrap();
    }
}
