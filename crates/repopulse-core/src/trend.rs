use std::sync::Arc;

use chrono::Utc;
use repopulse_store::ScoreStore;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::Result;

/// Direction of a repository's score relative to its previous sample
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Trend {
    Up,
    Down,
    Same,
    #[serde(rename = "N/A")]
    NotAvailable,
}

impl Trend {
    /// Compare a fresh score against the previously recorded one.
    ///
    /// No history and a stored zero both mean there is nothing meaningful
    /// to compare against, so both classify as N/A.
    pub fn classify(current: f64, previous: Option<f64>) -> Self {
        match previous {
            None => Trend::NotAvailable,
            Some(prev) if prev == 0.0 => Trend::NotAvailable,
            Some(prev) if current > prev => Trend::Up,
            Some(prev) if current < prev => Trend::Down,
            Some(_) => Trend::Same,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Trend::Up => "Up",
            Trend::Down => "Down",
            Trend::Same => "Same",
            Trend::NotAvailable => "N/A",
        }
    }
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Appends score samples and derives the movement label.
pub struct TrendTracker {
    store: Arc<ScoreStore>,
}

impl TrendTracker {
    pub fn new(store: Arc<ScoreStore>) -> Self {
        Self { store }
    }

    /// Record the new score and classify it against the previous sample.
    ///
    /// The sample is written no matter what the classification says, and
    /// classification only ever sees the sample that existed before this
    /// call.
    pub fn record_and_classify(
        &self,
        repo_id: i64,
        repo_name: &str,
        new_score: f64,
    ) -> Result<Trend> {
        let previous = self.store.latest_sample(repo_id)?;
        self.store
            .insert_sample(repo_id, repo_name, new_score, Utc::now())?;

        let trend = Trend::classify(new_score, previous.as_ref().map(|s| s.score));
        debug!("Repo {} trend: {}", repo_id, trend);
        Ok(trend)
    }
}
