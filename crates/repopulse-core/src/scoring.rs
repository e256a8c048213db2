use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::prefs::PreferenceService;
use crate::Result;

/// Relative importance of stars, forks, and recency for one user.
///
/// The weights are taken as-is: nothing requires them to sum to 1 or even
/// to be positive.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ScoreWeights {
    pub user_id: i64,
    pub stars_weight: f64,
    pub forks_weight: f64,
    pub recency_weight: f64,
}

/// Per-factor view of one score computation. Never persisted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ScoreBreakdown {
    pub stars_weight: f64,
    pub forks_weight: f64,
    pub recency_weight: f64,
    pub stars_factor: f64,
    pub forks_factor: f64,
    pub recency_factor: f64,
    pub final_score: f64,
}

/// Computes popularity scores using the requesting user's weights.
pub struct ScoreCalculator {
    prefs: PreferenceService,
}

impl ScoreCalculator {
    pub fn new(prefs: PreferenceService) -> Self {
        Self { prefs }
    }

    /// Popularity score of a repository for the given user.
    ///
    /// Stars and forks normalize against the page maxima; recency
    /// normalizes against the window between `earliest_created` and today.
    pub fn popularity_score(
        &self,
        stars: u32,
        forks: u32,
        updated_at: NaiveDate,
        max_stars: u32,
        max_forks: u32,
        earliest_created: NaiveDate,
        user_id: i64,
    ) -> Result<f64> {
        let weights = self.prefs.effective(user_id)?;
        Ok(score_with_weights(
            stars,
            forks,
            updated_at,
            max_stars,
            max_forks,
            earliest_created,
            &weights,
        ))
    }

    /// Same computation, but returns every factor alongside the final score.
    pub fn breakdown(
        &self,
        stars: u32,
        forks: u32,
        updated_at: NaiveDate,
        max_stars: u32,
        max_forks: u32,
        earliest_created: NaiveDate,
        user_id: i64,
    ) -> Result<ScoreBreakdown> {
        let weights = self.prefs.effective(user_id)?;
        Ok(breakdown_with_weights(
            stars,
            forks,
            updated_at,
            max_stars,
            max_forks,
            earliest_created,
            &weights,
        ))
    }
}

/// Weighted popularity score, rounded to two decimals.
pub fn score_with_weights(
    stars: u32,
    forks: u32,
    updated_at: NaiveDate,
    max_stars: u32,
    max_forks: u32,
    earliest_created: NaiveDate,
    weights: &ScoreWeights,
) -> f64 {
    let today = Utc::now().date_naive();
    let norm_stars = normalize_stars(stars, max_stars);
    let norm_forks = normalize_forks(forks, max_forks);
    let norm_recency = normalize_recency((today - updated_at).num_days(), earliest_created, today);

    round_to_two(
        weights.stars_weight * norm_stars
            + weights.forks_weight * norm_forks
            + weights.recency_weight * norm_recency,
    )
}

/// Breakdown variant: each weighted factor rounded individually, the final
/// score rounded from the unrounded factor sum.
pub fn breakdown_with_weights(
    stars: u32,
    forks: u32,
    updated_at: NaiveDate,
    max_stars: u32,
    max_forks: u32,
    earliest_created: NaiveDate,
    weights: &ScoreWeights,
) -> ScoreBreakdown {
    let today = Utc::now().date_naive();
    let stars_factor = weights.stars_weight * normalize_stars(stars, max_stars);
    let forks_factor = weights.forks_weight * normalize_forks(forks, max_forks);
    let recency_factor = weights.recency_weight
        * normalize_recency((today - updated_at).num_days(), earliest_created, today);
    let final_score = stars_factor + forks_factor + recency_factor;

    ScoreBreakdown {
        stars_weight: weights.stars_weight,
        forks_weight: weights.forks_weight,
        recency_weight: weights.recency_weight,
        stars_factor: round_to_two(stars_factor),
        forks_factor: round_to_two(forks_factor),
        recency_factor: round_to_two(recency_factor),
        final_score: round_to_two(final_score),
    }
}

/// Star count relative to the page maximum.
///
/// A page where every repository has zero stars normalizes to 0.0 rather
/// than dividing by zero.
pub fn normalize_stars(stars: u32, max_stars: u32) -> f64 {
    if max_stars == 0 {
        return 0.0;
    }
    stars as f64 / max_stars as f64
}

/// Fork count relative to the page maximum. Same zero rule as stars.
pub fn normalize_forks(forks: u32, max_forks: u32) -> f64 {
    if max_forks == 0 {
        return 0.0;
    }
    forks as f64 / max_forks as f64
}

/// Recency relative to the age window between `earliest_created` and today.
///
/// 1.0 means updated today, 0.0 means untouched since the window opened.
/// A zero-day window counts as fully recent. The value is not clamped, so
/// an update date in the future pushes it above 1.0.
pub fn normalize_recency(
    days_since_update: i64,
    earliest_created: NaiveDate,
    today: NaiveDate,
) -> f64 {
    let window_days = (today - earliest_created).num_days();
    if window_days == 0 {
        return 1.0;
    }
    1.0 - (days_since_update as f64 / window_days as f64)
}

/// Round half-up to two decimal places.
fn round_to_two(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
