use gloo::storage::errors::StorageError;
use gloo::storage::{LocalStorage, Storage};
use mazechase_core::{HighScore, HighScoreStore, StoreError};

use crate::utils::StorageKey;

impl StorageKey for HighScore {
    const KEY: &'static str = "mazechase:high-score:v1";
}

/// Browser `localStorage` backing for the high score.
#[derive(Copy, Clone, Debug, Default)]
pub(crate) struct LocalHighScores;

impl HighScoreStore for LocalHighScores {
    fn load(&mut self) -> Result<Option<HighScore>, StoreError> {
        match LocalStorage::get::<HighScore>(HighScore::KEY) {
            Ok(high_score) => Ok(Some(high_score)),
            Err(StorageError::KeyNotFound(_)) => Ok(None),
            Err(err) => Err(store_error(err)),
        }
    }

    fn save(&mut self, high_score: &HighScore) -> Result<(), StoreError> {
        LocalStorage::set(HighScore::KEY, high_score).map_err(store_error)
    }
}

fn store_error(err: StorageError) -> StoreError {
    match err {
        StorageError::SerdeError(err) => StoreError::Corrupt(err.to_string()),
        err => StoreError::Unavailable(err.to_string()),
    }
}
