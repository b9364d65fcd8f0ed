//! Detection result caching.
//!
//! Language detection is comparatively expensive (an extra LLM round trip),
//! and detection results for identical text are stable, so the full outcome —
//! including "no detected language" — is cached for [`DETECTION_TTL`] keyed by
//! a content hash of the text. The store is behind the [`DetectionCache`]
//! trait so a process-external backend can be injected; the bundled
//! [`MemoryDetectionCache`] is an in-process map shared across provider
//! instances via `Arc`.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use log::debug;
use parking_lot::RwLock;
use sha2::{Digest, Sha256};

/// Retention window for cached detection results
pub const DETECTION_TTL: Duration = Duration::from_secs(30 * 24 * 60 * 60);

/// Cache key for a detection lookup: a content hash of the classified text
pub fn detection_cache_key(text: &str) -> String {
    format!("lang_detect:{:x}", Sha256::digest(text.as_bytes()))
}

/// Key-value store with per-entry TTL used by language detection
///
/// `get` returns `None` on a miss or expired entry; the inner value is the
/// cached detection result, where `None` means "no detected language" was
/// cached. Implementations must tolerate concurrent readers and writers;
/// last-writer-wins on racing `put`s for the same key is acceptable.
pub trait DetectionCache: Send + Sync {
    /// Look up a cached detection result
    fn get(&self, key: &str) -> Option<Option<String>>;

    /// Store a detection result for `ttl`
    fn put(&self, key: &str, value: Option<String>, ttl: Duration);
}

struct CacheEntry {
    value: Option<String>,
    expires_at: Instant,
}

/// In-process detection cache
#[derive(Default)]
pub struct MemoryDetectionCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl MemoryDetectionCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries, including expired ones not yet evicted
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether the cache holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Drop all entries
    pub fn clear(&self) {
        self.entries.write().clear();
    }
}

impl DetectionCache for MemoryDetectionCache {
    fn get(&self, key: &str) -> Option<Option<String>> {
        {
            let entries = self.entries.read();
            match entries.get(key) {
                Some(entry) if entry.expires_at > Instant::now() => {
                    debug!("detection cache hit for {}", key);
                    return Some(entry.value.clone());
                }
                Some(_) => {}
                None => {
                    debug!("detection cache miss for {}", key);
                    return None;
                }
            }
        }

        // Entry exists but expired; evict it under the write lock
        self.entries.write().remove(key);
        debug!("detection cache entry expired for {}", key);
        None
    }

    fn put(&self, key: &str, value: Option<String>, ttl: Duration) {
        let entry = CacheEntry {
            value,
            expires_at: Instant::now() + ttl,
        };
        self.entries.write().insert(key.to_string(), entry);
    }
}
