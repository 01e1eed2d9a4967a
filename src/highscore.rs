//! Best-score persistence
//!
//! A single integer stored as a decimal string under
//! [`HIGH_SCORE_KEY`](crate::consts::HIGH_SCORE_KEY).

use crate::consts::HIGH_SCORE_KEY;
use crate::platform::KeyValueStore;

/// The persisted best score plus its in-memory copy
#[derive(Debug, Clone)]
pub struct HighScoreStore<S: KeyValueStore> {
    store: S,
    best: u32,
}

impl<S: KeyValueStore> HighScoreStore<S> {
    /// Open the store and read the saved best score
    pub fn open(store: S) -> Self {
        let best = read_best(&store);
        log::info!("High score loaded: {}", best);
        Self { store, best }
    }

    /// Best score known to this session
    pub fn best(&self) -> u32 {
        self.best
    }

    /// Read the persisted value (0 if absent, unparseable, or unreadable)
    pub fn load(&self) -> u32 {
        read_best(&self.store)
    }

    /// Check if a score would set a new record
    pub fn qualifies(&self, score: u32) -> bool {
        score > self.best
    }

    /// Record a finished round's score. Returns true if it set a new record.
    pub fn submit(&mut self, score: u32) -> bool {
        if !self.qualifies(score) {
            return false;
        }
        self.save(score);
        true
    }

    /// Overwrite the best score and persist it
    pub fn save(&mut self, score: u32) {
        self.best = score;
        match self.store.set(HIGH_SCORE_KEY, &score.to_string()) {
            Ok(()) => log::info!("High score saved ({})", score),
            Err(e) => log::warn!("Could not save high score: {}", e),
        }
    }

    /// Forget the best score and erase it from storage
    pub fn clear(&mut self) {
        self.best = 0;
        match self.store.remove(HIGH_SCORE_KEY) {
            Ok(()) => log::info!("High score cleared"),
            Err(e) => log::warn!("Could not clear high score: {}", e),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

fn read_best<S: KeyValueStore>(store: &S) -> u32 {
    match store.get(HIGH_SCORE_KEY) {
        Ok(Some(raw)) => raw.trim().parse().unwrap_or_else(|_| {
            log::warn!("Ignoring malformed high score {:?}", raw);
            0
        }),
        Ok(None) => 0,
        Err(e) => {
            log::warn!("Could not read high score: {}", e);
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{MemoryStore, StorageError};

    /// A store whose every call fails
    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable)
        }
        fn set(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable)
        }
        fn remove(&mut self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable)
        }
    }

    #[test]
    fn test_absent_is_zero() {
        let scores = HighScoreStore::open(MemoryStore::new());
        assert_eq!(scores.best(), 0);
        assert_eq!(scores.load(), 0);
    }

    #[test]
    fn test_reads_existing_value() {
        let store = MemoryStore::new().with_entry(HIGH_SCORE_KEY, "42");
        assert_eq!(HighScoreStore::open(store).best(), 42);
    }

    #[test]
    fn test_malformed_is_zero() {
        for raw in ["", "abc", "-5", "12.5", "99999999999999"] {
            let store = MemoryStore::new().with_entry(HIGH_SCORE_KEY, raw);
            assert_eq!(HighScoreStore::open(store).best(), 0, "raw {raw:?}");
        }
    }

    #[test]
    fn test_submit_only_on_strictly_greater() {
        let mut scores = HighScoreStore::open(MemoryStore::new().with_entry(HIGH_SCORE_KEY, "10"));
        assert!(!scores.submit(10));
        assert!(!scores.submit(3));
        assert_eq!(scores.load(), 10);

        assert!(scores.submit(11));
        assert_eq!(scores.best(), 11);
        assert_eq!(scores.store().get(HIGH_SCORE_KEY), Ok(Some("11".to_string())));
    }

    #[test]
    fn test_clear_erases_value() {
        let mut scores = HighScoreStore::open(MemoryStore::new());
        scores.save(7);
        scores.clear();
        assert_eq!(scores.best(), 0);
        assert_eq!(scores.load(), 0);
        assert!(!scores.store().contains(HIGH_SCORE_KEY));
    }

    #[test]
    fn test_broken_storage_degrades() {
        let mut scores = HighScoreStore::open(BrokenStore);
        assert_eq!(scores.best(), 0);
        assert!(scores.submit(5));
        // Still tracked in memory for this session
        assert_eq!(scores.best(), 5);
        scores.clear();
        assert_eq!(scores.best(), 0);
    }
}
