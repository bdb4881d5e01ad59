use serde::{de::DeserializeOwned, Serialize};
use std::{
    collections::HashMap,
    fmt,
    sync::{Mutex, MutexGuard, PoisonError},
};

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum KeySegment {
    Name(String),
    Id(i64),
}

/// Hierarchical cache key, e.g. `["hosts", 1, "remotes"]`.
///
/// Invalidation works on prefixes, so invalidating `["hosts"]` drops the host
/// list along with every per-host entry beneath it.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct QueryKey {
    segments: Vec<KeySegment>,
}

impl QueryKey {
    pub fn resource(name: &str) -> Self {
        Self {
            segments: vec![KeySegment::Name(name.to_string())],
        }
    }

    pub fn id(mut self, id: i64) -> Self {
        self.segments.push(KeySegment::Id(id));
        self
    }

    pub fn name(mut self, name: &str) -> Self {
        self.segments.push(KeySegment::Name(name.to_string()));
        self
    }

    pub fn starts_with(&self, prefix: &QueryKey) -> bool {
        self.segments.starts_with(&prefix.segments)
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self
            .segments
            .iter()
            .map(|segment| match segment {
                KeySegment::Name(name) => format!("\"{name}\""),
                KeySegment::Id(id) => id.to_string(),
            })
            .collect();

        write!(f, "[{}]", rendered.join(", "))
    }
}

#[derive(Debug, Default)]
struct CacheState {
    entries: HashMap<QueryKey, serde_json::Value>,
    generation: u64,
}

/// Client side cache of successful read responses.
#[derive(Debug, Default)]
pub struct QueryCache {
    state: Mutex<CacheState>,
}

impl QueryCache {
    fn lock(&self) -> MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get<T: DeserializeOwned>(&self, key: &QueryKey) -> Option<T> {
        let mut state = self.lock();

        let value = state.entries.get(key)?.clone();

        match serde_json::from_value(value) {
            Ok(decoded) => Some(decoded),
            Err(err) => {
                tracing::warn!("dropping undecodable cache entry {key}: {err}");
                state.entries.remove(key);
                None
            }
        }
    }

    /// Bumped by every invalidation. Readers capture it before issuing a
    /// request and hand it back to [`QueryCache::insert_if_current`].
    pub fn generation(&self) -> u64 {
        self.lock().generation
    }

    pub fn insert<T: Serialize>(&self, key: QueryKey, value: &T) {
        let generation = self.generation();
        self.insert_if_current(key, value, generation);
    }

    /// Stores `value` unless an invalidation happened since `generation` was
    /// read, in which case the response may predate a mutation.
    pub fn insert_if_current<T: Serialize>(
        &self,
        key: QueryKey,
        value: &T,
        generation: u64,
    ) -> bool {
        let encoded = match serde_json::to_value(value) {
            Ok(encoded) => encoded,
            Err(err) => {
                tracing::warn!("not caching {key}: {err}");
                return false;
            }
        };

        let mut state = self.lock();
        if state.generation != generation {
            return false;
        }

        state.entries.insert(key, encoded);

        true
    }

    pub fn invalidate(&self, prefix: &QueryKey) -> usize {
        let mut state = self.lock();

        let starting_len = state.entries.len();
        state.entries.retain(|key, _| !key.starts_with(prefix));
        state.generation += 1;

        let invalidated = starting_len - state.entries.len();
        tracing::debug!("invalidated {invalidated} cache entries under {prefix}");

        invalidated
    }

    pub fn contains(&self, key: &QueryKey) -> bool {
        self.lock().entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_and_item_keys_are_distinct() {
        let cache = QueryCache::default();

        cache.insert(QueryKey::resource("hosts"), &vec![1, 2, 3]);
        cache.insert(QueryKey::resource("hosts").id(1), &"host one");

        let list: Vec<i64> = cache.get(&QueryKey::resource("hosts")).unwrap();
        let item: String = cache.get(&QueryKey::resource("hosts").id(1)).unwrap();

        assert_eq!(list, vec![1, 2, 3]);
        assert_eq!(item, "host one");
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_invalidate_drops_prefix_only() {
        let cache = QueryCache::default();

        cache.insert(QueryKey::resource("hosts"), &Vec::<i64>::new());
        cache.insert(QueryKey::resource("hosts").id(1).name("remotes"), &0);
        cache.insert(QueryKey::resource("remotes"), &Vec::<i64>::new());

        let invalidated = cache.invalidate(&QueryKey::resource("hosts"));

        assert_eq!(invalidated, 2);
        assert!(!cache.contains(&QueryKey::resource("hosts")));
        assert!(cache.contains(&QueryKey::resource("remotes")));
    }

    #[test]
    fn test_stale_insert_is_rejected_after_invalidation() {
        let cache = QueryCache::default();

        let generation = cache.generation();
        cache.invalidate(&QueryKey::resource("tags"));

        let stored = cache.insert_if_current(QueryKey::resource("tags"), &vec!["old"], generation);

        assert!(!stored);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_undecodable_entry_is_dropped() {
        let cache = QueryCache::default();

        cache.insert(QueryKey::resource("tags"), &"not a list");

        let decoded: Option<Vec<i64>> = cache.get(&QueryKey::resource("tags"));

        assert!(decoded.is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_key_display() {
        let key = QueryKey::resource("hosts").id(7).name("remotes");

        assert_eq!(key.to_string(), r#"["hosts", 7, "remotes"]"#);
    }
}
