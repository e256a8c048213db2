// Core business logic: scoring, trend tracking, preferences, search orchestration
pub mod config;
pub mod error;
pub mod models;
pub mod prefs;
pub mod providers;
pub mod scoring;
pub mod search;
pub mod trend;

pub use config::Config;
pub use error::Error;
pub use prefs::PreferenceService;
pub use scoring::{ScoreBreakdown, ScoreCalculator, ScoreWeights};
pub use search::{RepoHost, SearchEngine, SearchFilter};
pub use trend::{Trend, TrendTracker};

/// Crate-wide result alias so signatures stay short
pub type Result<T> = std::result::Result<T, Error>;
