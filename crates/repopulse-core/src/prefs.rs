use std::sync::Arc;

use repopulse_store::{PreferenceRow, ScoreStore};
use tracing::debug;

use crate::scoring::ScoreWeights;
use crate::{Error, Result};

/// Weight triple applied when a user never saved preferences.
/// These values are never written to the store.
pub const DEFAULT_STARS_WEIGHT: f64 = 0.5;
pub const DEFAULT_FORKS_WEIGHT: f64 = 0.3;
pub const DEFAULT_RECENCY_WEIGHT: f64 = 0.2;

/// CRUD over per-user weight triples, with a constant fallback.
#[derive(Clone)]
pub struct PreferenceService {
    store: Arc<ScoreStore>,
}

impl PreferenceService {
    pub fn new(store: Arc<ScoreStore>) -> Self {
        Self { store }
    }

    /// Insert a new triple for the user.
    ///
    /// No uniqueness check here; callers are expected not to save twice
    /// for the same user.
    pub fn save(&self, weights: &ScoreWeights) -> Result<ScoreWeights> {
        let row = self.store.insert_preferences(
            weights.user_id,
            weights.stars_weight,
            weights.forks_weight,
            weights.recency_weight,
        )?;
        debug!("Saved preferences for user {}", weights.user_id);
        Ok(row_to_weights(&row))
    }

    /// Overwrite the stored triple, keeping the original row.
    pub fn update(&self, weights: &ScoreWeights) -> Result<ScoreWeights> {
        let updated = self
            .store
            .update_preferences(
                weights.user_id,
                weights.stars_weight,
                weights.forks_weight,
                weights.recency_weight,
            )?
            .ok_or(Error::PreferenceNotFound(weights.user_id))?;
        Ok(row_to_weights(&updated))
    }

    /// Remove the stored triple.
    pub fn delete(&self, user_id: i64) -> Result<()> {
        if !self.store.delete_preferences(user_id)? {
            return Err(Error::PreferenceNotFound(user_id));
        }
        debug!("Deleted preferences for user {}", user_id);
        Ok(())
    }

    /// Stored triple for the user, if any. Absence is not an error.
    pub fn get(&self, user_id: i64) -> Result<Option<ScoreWeights>> {
        Ok(self
            .store
            .find_preferences(user_id)?
            .map(|row| row_to_weights(&row)))
    }

    /// The constant default triple, tagged with the user id.
    pub fn default_for(user_id: i64) -> ScoreWeights {
        ScoreWeights {
            user_id,
            stars_weight: DEFAULT_STARS_WEIGHT,
            forks_weight: DEFAULT_FORKS_WEIGHT,
            recency_weight: DEFAULT_RECENCY_WEIGHT,
        }
    }

    /// Stored weights when present, the default triple otherwise.
    pub fn effective(&self, user_id: i64) -> Result<ScoreWeights> {
        Ok(self.get(user_id)?.unwrap_or_else(|| Self::default_for(user_id)))
    }
}

fn row_to_weights(row: &PreferenceRow) -> ScoreWeights {
    ScoreWeights {
        user_id: row.user_id,
        stars_weight: row.stars_weight,
        forks_weight: row.forks_weight,
        recency_weight: row.recency_weight,
    }
}
