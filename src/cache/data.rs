use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::key::RequestKey;

/// A memoized API response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub key: RequestKey,
    pub value: Value,
    pub created_at: DateTime<Utc>,
}

impl CacheEntry {
    pub fn new(key: RequestKey, value: Value) -> Self {
        Self {
            key,
            value,
            created_at: Utc::now(),
        }
    }
}

/// On-disk layout of a session file.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SessionFile {
    pub entries: Vec<CacheEntry>,
}

/// In-memory state of one browsing session.
#[derive(Debug, Default)]
pub struct SessionData {
    pub entries: HashMap<RequestKey, CacheEntry>,
}

impl SessionData {
    pub fn get(&self, key: &RequestKey) -> Option<Value> {
        self.entries.get(key).map(|entry| entry.value.clone())
    }

    /// Stores `value` under `key`, replacing any previous entry.
    pub fn put(&mut self, key: RequestKey, value: Value) {
        self.entries
            .insert(key.clone(), CacheEntry::new(key, value));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn to_file(&self) -> SessionFile {
        let mut entries: Vec<CacheEntry> = self.entries.values().cloned().collect();
        entries.sort_by(|a, b| a.key.cmp(&b.key));
        SessionFile { entries }
    }
}

impl From<SessionFile> for SessionData {
    fn from(file: SessionFile) -> Self {
        let entries = file
            .entries
            .into_iter()
            .map(|entry| (entry.key.clone(), entry))
            .collect();
        Self { entries }
    }
}
