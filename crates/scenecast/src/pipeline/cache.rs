//! Per-scene result cache.
//!
//! Scenes are keyed by a SHA-256 fingerprint of their text and of every
//! setting that influences the result. Identical scenes, whether in one job
//! or across jobs sharing a cache, are computed at most once: concurrent
//! callers for the same key wait for the in-flight computation instead of
//! starting their own.

use std::{
    future::Future,
    sync::{Arc, Mutex, PoisonError},
};

use indexmap::IndexMap;
use log::trace;
use serde::Serialize;
use sha2::{Digest, Sha256};
use tokio::sync::OnceCell;

use scenecast_core::semantic::Scene;

use crate::config::AppConfig;

/// Hex-encoded SHA-256 of a scene's inputs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// The settings a cached scene depends on, hashed once per job.
#[derive(Debug, Clone)]
pub struct Fingerprint(Vec<u8>);

#[derive(Serialize)]
struct FingerprintInput<'a> {
    classifier: &'a scenecast_text::ClassifierConfig,
    extractor: &'a scenecast_text::ExtractorConfig,
    layout: &'a crate::config::LayoutConfig,
    enriched: bool,
}

impl Fingerprint {
    /// Fingerprints the settings of `config` that affect scene content.
    ///
    /// # Errors
    ///
    /// Fails only if the configuration cannot be serialized.
    pub fn new(config: &AppConfig, enriched: bool) -> Result<Self, serde_json::Error> {
        let input = FingerprintInput {
            classifier: config.classifier(),
            extractor: config.extractor(),
            layout: config.layout(),
            enriched,
        };
        serde_json::to_vec(&input).map(Self)
    }

    /// Key for a scene with `text` under these settings.
    pub fn key(&self, text: &str) -> CacheKey {
        let mut hasher = Sha256::new();
        hasher.update((text.len() as u64).to_le_bytes());
        hasher.update(text.as_bytes());
        hasher.update(&self.0);
        CacheKey(hex::encode(hasher.finalize()))
    }
}

type Slot = Arc<OnceCell<Scene>>;

/// Bounded LRU cache of finished scenes.
#[derive(Debug)]
pub struct SceneCache {
    capacity: usize,
    entries: Mutex<IndexMap<CacheKey, Slot>>,
}

impl SceneCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: Mutex::new(IndexMap::new()),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of entries, including computations still in flight.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, IndexMap<CacheKey, Slot>> {
        // Entries stay consistent even if a holder panicked
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the slot for `key`, marking it most recently used.
    fn slot(&self, key: &CacheKey) -> Slot {
        let mut entries = self.lock();
        if let Some(index) = entries.get_index_of(key) {
            let last = entries.len() - 1;
            entries.move_index(index, last);
            return Arc::clone(&entries[last]);
        }

        if entries.len() >= self.capacity {
            if let Some((evicted, _)) = entries.shift_remove_index(0) {
                trace!(key = evicted.as_str(); "Evicted cached scene");
            }
        }
        let slot = Slot::default();
        entries.insert(key.clone(), Arc::clone(&slot));
        slot
    }

    /// Returns the cached scene for `key`, or computes it with `init`.
    ///
    /// Only one `init` runs per key at a time; other callers wait for its
    /// result. A failed `init` leaves the key empty so a later call can try
    /// again.
    ///
    /// # Errors
    ///
    /// Returns the error of `init`.
    pub async fn get_or_try_insert_with<E, F, Fut>(&self, key: &CacheKey, init: F) -> Result<Scene, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Scene, E>>,
    {
        let slot = self.slot(key);
        if let Some(scene) = slot.get() {
            trace!(key = key.as_str(); "Scene cache hit");
            return Ok(scene.clone());
        }
        slot.get_or_try_init(init).await.cloned()
    }

    /// Drops the entry for `key`, returning its scene if one was computed.
    pub fn remove(&self, key: &CacheKey) -> Option<Scene> {
        let slot = self.lock().shift_remove(key)?;
        trace!(key = key.as_str(); "Removed cached scene");
        slot.get().cloned()
    }

    /// Returns the cached scene for `key` without computing it.
    pub fn get(&self, key: &CacheKey) -> Option<Scene> {
        let entries = self.lock();
        entries.get(key).and_then(|slot| slot.get().cloned())
    }
}

impl Default for SceneCache {
    fn default() -> Self {
        Self::new(256)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use scenecast_core::semantic::{Archetype, SceneQuality};

    use super::*;

    fn scene(title: &str) -> Scene {
        Scene {
            id: Scene::id_for_index(0),
            index: 0,
            title: title.to_string(),
            archetype: Archetype::Flow,
            confidence: 0.5,
            text_span: title.to_string(),
            start_ms: 0,
            duration_ms: 1_000,
            nodes: Vec::new(),
            edges: Vec::new(),
            quality: SceneQuality::default(),
        }
    }

    fn key(text: &str) -> CacheKey {
        Fingerprint::new(&AppConfig::default(), false)
            .unwrap()
            .key(text)
    }

    #[test]
    fn test_key_depends_on_settings() {
        let config = AppConfig::default();
        let plain = Fingerprint::new(&config, false).unwrap();
        let enriched = Fingerprint::new(&config, true).unwrap();
        assert_eq!(plain.key("a"), plain.key("a"));
        assert_ne!(plain.key("a"), plain.key("b"));
        assert_ne!(plain.key("a"), enriched.key("a"));
        assert_eq!(plain.key("a").as_str().len(), 64);
    }

    #[tokio::test]
    async fn test_computes_once_per_key() {
        let cache = SceneCache::new(8);
        let counter = AtomicUsize::new(0);
        let calls = &counter;
        for _ in 0..3 {
            let result: Result<Scene, ()> = cache
                .get_or_try_insert_with(&key("same"), move || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(scene("same"))
                })
                .await;
            assert_eq!(result.unwrap().title, "same");
        }
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_init_is_not_cached() {
        let cache = SceneCache::new(8);
        let failed: Result<Scene, &str> = cache
            .get_or_try_insert_with(&key("x"), || async { Err("boom") })
            .await;
        assert!(failed.is_err());
        assert!(cache.get(&key("x")).is_none());

        let retried: Result<Scene, &str> = cache
            .get_or_try_insert_with(&key("x"), || async { Ok(scene("x")) })
            .await;
        assert!(retried.is_ok());
    }

    #[tokio::test]
    async fn test_removed_key_is_computed_again() {
        let cache = SceneCache::new(8);
        let _: Result<Scene, ()> = cache
            .get_or_try_insert_with(&key("x"), || async { Ok(scene("first")) })
            .await;
        assert_eq!(cache.remove(&key("x")).unwrap().title, "first");
        assert!(cache.is_empty());
        assert!(cache.remove(&key("x")).is_none());

        let again: Result<Scene, ()> = cache
            .get_or_try_insert_with(&key("x"), || async { Ok(scene("second")) })
            .await;
        assert_eq!(again.unwrap().title, "second");
    }

    #[tokio::test]
    async fn test_least_recently_used_is_evicted() {
        let cache = SceneCache::new(2);
        for text in ["a", "b"] {
            let _: Result<Scene, ()> = cache
                .get_or_try_insert_with(&key(text), move || async move { Ok(scene(text)) })
                .await;
        }
        // Touch "a" so "b" becomes the oldest
        let _: Result<Scene, ()> = cache
            .get_or_try_insert_with(&key("a"), || async { Ok(scene("a")) })
            .await;
        let _: Result<Scene, ()> = cache
            .get_or_try_insert_with(&key("c"), || async { Ok(scene("c")) })
            .await;

        assert_eq!(cache.len(), 2);
        assert!(cache.get(&key("a")).is_some());
        assert!(cache.get(&key("b")).is_none());
        assert!(cache.get(&key("c")).is_some());
    }
}
