//! Caching helpers shared by the storage layer and the Riot client
//!
//! Two kinds of cache live here:
//! - File cache: small JSON documents (the Data Dragon champion table) kept
//!   under the user's cache directory
//! - Memory cache: an LRU of parsed timeline payloads, which are immutable
//!   once stored and therefore safe to memoize

use lru::LruCache;
use serde_json::Value;
use std::{
    fs,
    io::{Read, Write},
    num::NonZeroUsize,
    path::{Path, PathBuf},
    sync::Mutex,
};

/// Base directory for cached files: `~/.cache/lol-stats`
pub fn cache_root() -> PathBuf {
    let base = dirs::cache_dir().unwrap_or_else(|| {
        let mut home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        home.push(".cache");
        home
    });
    base.join("lol-stats")
}

/// Path: ~/.cache/lol-stats/champions_{locale}.json
pub fn champion_data_path(locale: &str) -> PathBuf {
    cache_root().join(format!("champions_{}.json", locale))
}

/// Try to read a file into a String
pub fn try_read_to_string(path: &Path) -> Option<String> {
    let mut f = fs::File::open(path).ok()?;
    let mut s = String::new();

    f.read_to_string(&mut s).ok()?;

    Some(s)
}

/// Write a string to file
pub fn write_string(path: &Path, contents: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut f = fs::File::create(path)?;
    f.write_all(contents.as_bytes())
}

/// Bounded memory cache of timeline payloads keyed by match id
pub struct TimelineCache {
    entries: Mutex<LruCache<String, Value>>,
    capacity: usize,
}

impl TimelineCache {
    /// Create a cache holding at most `capacity` timelines (minimum one)
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            capacity: capacity.get(),
        }
    }

    pub fn get(&self, match_id: &str) -> Option<Value> {
        self.lock().get(match_id).cloned()
    }

    pub fn put(&self, match_id: &str, timeline: Value) {
        self.lock().put(match_id.to_string(), timeline);
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Current number of entries and the configured capacity
    pub fn stats(&self) -> (usize, usize) {
        (self.lock().len(), self.capacity)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, LruCache<String, Value>> {
        // Entries are plain values; a poisoned lock still holds a usable cache.
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn test_champion_data_path_layout() {
        let path = champion_data_path("es_MX");
        assert!(path.ends_with("lol-stats/champions_es_MX.json"));
    }

    #[test]
    fn test_write_and_read_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("champions.json");

        write_string(&path, "{\"1\":\"Annie\"}").unwrap();
        assert_eq!(
            try_read_to_string(&path).as_deref(),
            Some("{\"1\":\"Annie\"}")
        );
    }

    #[test]
    fn test_read_missing_file() {
        let dir = tempdir().unwrap();
        assert!(try_read_to_string(&dir.path().join("missing.json")).is_none());
    }

    #[test]
    fn test_timeline_cache_evicts_least_recent() {
        let cache = TimelineCache::new(2);
        cache.put("a", json!({"frames": 1}));
        cache.put("b", json!({"frames": 2}));
        assert!(cache.get("a").is_some());
        cache.put("c", json!({"frames": 3}));

        assert!(cache.get("b").is_none());
        assert_eq!(cache.get("a"), Some(json!({"frames": 1})));
        assert_eq!(cache.stats(), (2, 2));
    }

    #[test]
    fn test_timeline_cache_zero_capacity_holds_one() {
        let cache = TimelineCache::new(0);
        cache.put("a", json!(1));
        assert_eq!(cache.stats(), (1, 1));
        cache.clear();
        assert_eq!(cache.stats(), (0, 1));
    }
}
