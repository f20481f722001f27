use dashmap::DashMap;

use super::protocol::Pair;

/// In-memory key/value store backing a storage node.
///
/// Nothing is persisted; a restarted node comes back empty.
pub struct KeyStore {
    data: DashMap<i64, String>,
}

impl KeyStore {
    pub fn new() -> Self {
        Self {
            data: DashMap::new(),
        }
    }

    /// Stores `value` under `key`, replacing any previous value.
    pub fn put(&self, key: i64, value: String) -> Pair {
        self.data.insert(key, value.clone());
        Pair { key, value }
    }

    pub fn get(&self, key: i64) -> Option<Pair> {
        self.data.get(&key).map(|entry| Pair {
            key,
            value: entry.value().clone(),
        })
    }

    /// Every stored pair, ordered by key.
    pub fn all(&self) -> Vec<Pair> {
        let mut pairs: Vec<Pair> = self
            .data
            .iter()
            .map(|entry| Pair {
                key: *entry.key(),
                value: entry.value().clone(),
            })
            .collect();
        pairs.sort_by_key(|pair| pair.key);
        pairs
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl Default for KeyStore {
    fn default() -> Self {
        Self::new()
    }
}
