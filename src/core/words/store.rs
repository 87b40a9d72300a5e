//! Exclusion Store
//!
//! Words that must not be handed out again: a fixed banned list seeded at
//! startup plus every word accepted since the last reset.

use indexmap::IndexSet;
use std::sync::{PoisonError, RwLock};

/// Lower-case and trim a word the way every stored entry is kept.
pub fn normalize_word(word: &str) -> String {
    word.trim().to_lowercase()
}

/// Banned + used word set shared by all generation requests.
///
/// The lock is never held across an await point. Poisoned locks are recovered.
#[derive(Debug)]
pub struct ExclusionStore {
    banned: IndexSet<String>,
    used: RwLock<IndexSet<String>>,
}

impl ExclusionStore {
    pub fn new<I, S>(banned: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let banned = banned
            .into_iter()
            .map(|w| normalize_word(w.as_ref()))
            .filter(|w| !w.is_empty())
            .collect();

        Self {
            banned,
            used: RwLock::new(IndexSet::new()),
        }
    }

    /// True if the word is banned or was already issued.
    pub fn contains(&self, word: &str) -> bool {
        let word = normalize_word(word);
        self.banned.contains(&word) || self.read_used().contains(&word)
    }

    /// Record issued words. Words already present are skipped.
    pub fn add_all<I, S>(&self, words: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut used = self.write_used();
        for word in words {
            let word = word.into();
            if !self.banned.contains(&word) {
                used.insert(word);
            }
        }
    }

    /// Check and record in one step under the write lock, so concurrent
    /// callers can never both accept the same word. Returns the accepted
    /// words in candidate order; a repeat within `candidates` is accepted once.
    pub fn accept_new<I>(&self, candidates: I) -> Vec<String>
    where
        I: IntoIterator<Item = String>,
    {
        let mut used = self.write_used();
        let accepted = candidates
            .into_iter()
            .map(|w| normalize_word(&w))
            .filter(|w| !w.is_empty() && !self.banned.contains(w) && used.insert(w.clone()))
            .collect();
        accepted
    }

    /// Forget every used word. Returns how many were cleared.
    pub fn reset(&self) -> usize {
        let mut used = self.write_used();
        let cleared = used.len();
        used.clear();
        cleared
    }

    /// Used words in issue order, followed by the banned words.
    pub fn snapshot(&self) -> Vec<String> {
        let used = self.read_used();
        used.iter().chain(self.banned.iter()).cloned().collect()
    }

    pub fn used_len(&self) -> usize {
        self.read_used().len()
    }

    pub fn banned_len(&self) -> usize {
        self.banned.len()
    }

    fn read_used(&self) -> std::sync::RwLockReadGuard<'_, IndexSet<String>> {
        self.used.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_used(&self) -> std::sync::RwLockWriteGuard<'_, IndexSet<String>> {
        self.used.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for ExclusionStore {
    fn default() -> Self {
        Self::new(Vec::<String>::new())
    }
}
