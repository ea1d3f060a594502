//! In-memory key-value store with a reverse value index and nested transactions.
//!
//! Every open transaction keeps an undo record: for each key it touched, the
//! value the key held before the first touch (`None` when the key was absent).
//! Rolling back replays that record; committing folds it into the enclosing
//! transaction so the outer transaction can still undo the inner one's work.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use crate::core::error::{ErrorCode, KvError, Result};
use crate::core::journal::Journal;

pub const NO_TRANSACTION: &str = "NO TRANSACTION";

#[derive(Debug)]
struct Transaction {
    undo: HashMap<String, Option<String>>,
    journal: Journal,
}

impl Transaction {
    fn open() -> Self {
        Self {
            undo: HashMap::new(),
            journal: Journal::begin(),
        }
    }
}

#[derive(Default)]
pub struct KvStore {
    data: HashMap<String, String>,
    index: HashMap<String, BTreeSet<String>>,
    transactions: Vec<Transaction>,
}

impl KvStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.data.get(key).map(String::as_str)
    }

    pub fn counts(&self, value: &str) -> usize {
        self.index.get(value).map_or(0, BTreeSet::len)
    }

    /// Keys currently holding `value`, in ascending order.
    pub fn find(&self, value: &str) -> Vec<String> {
        self.index
            .get(value)
            .map(|keys| keys.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn depth(&self) -> usize {
        self.transactions.len()
    }

    pub fn set(&mut self, key: &str, value: &str) {
        self.remember(key);
        self.write(key, value);
        tracing::debug!(key, value, "set");

        if let Some(tx) = self.transactions.last_mut() {
            tx.journal.record(format!("SET {key} {value}"));
        }
    }

    pub fn unset(&mut self, key: &str) {
        if !self.data.contains_key(key) {
            return;
        }

        self.remember(key);
        self.remove(key);
        tracing::debug!(key, "unset");

        if let Some(tx) = self.transactions.last_mut() {
            tx.journal.record(format!("UNSET {key}"));
        }
    }

    pub fn begin(&mut self) {
        self.transactions.push(Transaction::open());
        tracing::info!(depth = self.depth(), "transaction opened");
    }

    pub fn rollback(&mut self) -> Result<Journal> {
        let tx = self.pop()?;
        for (key, prior) in tx.undo {
            match prior {
                Some(value) => self.write(&key, &value),
                None => self.remove(&key),
            }
        }

        tracing::info!(depth = self.depth(), changes = tx.journal.len(), "transaction rolled back");
        Ok(tx.journal)
    }

    pub fn commit(&mut self) -> Result<Journal> {
        let tx = self.pop()?;
        if let Some(parent) = self.transactions.last_mut() {
            for (key, prior) in tx.undo {
                parent.undo.entry(key).or_insert(prior);
            }
        }

        tracing::info!(depth = self.depth(), changes = tx.journal.len(), "transaction committed");
        Ok(tx.journal)
    }

    fn pop(&mut self) -> Result<Transaction> {
        self.transactions
            .pop()
            .ok_or_else(|| KvError::message(ErrorCode::NoTransaction, NO_TRANSACTION))
    }

    /// Records the pre-transaction value of `key` on first touch.
    fn remember(&mut self, key: &str) {
        let Some(tx) = self.transactions.last_mut() else {
            return;
        };
        if !tx.undo.contains_key(key) {
            tx.undo.insert(key.to_string(), self.data.get(key).cloned());
        }
    }

    fn write(&mut self, key: &str, value: &str) {
        if let Some(old) = self.data.insert(key.to_string(), value.to_string()) {
            self.unindex(key, &old);
        }
        self.index
            .entry(value.to_string())
            .or_default()
            .insert(key.to_string());
    }

    fn remove(&mut self, key: &str) {
        if let Some(old) = self.data.remove(key) {
            self.unindex(key, &old);
        }
    }

    fn unindex(&mut self, key: &str, value: &str) {
        if let Some(keys) = self.index.get_mut(value) {
            keys.remove(key);
            if keys.is_empty() {
                self.index.remove(value);
            }
        }
    }
}

impl fmt::Debug for KvStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KvStore")
            .field("data", &self.data)
            .field("index", &self.index)
            .field("depth", &self.depth())
            .finish()
    }
}
