// SQLite-backed persistence for score history and user preferences

pub mod store;

pub use store::{PreferenceRow, ScoreSample, ScoreStore, StoreError};
