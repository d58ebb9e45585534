use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::Digest;

use crate::provider::{EmbedError, EmbedProvider};

const CACHE_VERSION: u32 = 1;

/// Cache key for a text: sha256 of the exact content.
pub fn text_key(text: &str) -> String {
    let mut hasher = sha2::Sha256::new();
    hasher.update(text.as_bytes());
    hex::encode(hasher.finalize())
}

/// Storage port for previously computed embeddings.
///
/// Keys are exact-content hashes (`text_key`), so a hit is always safe to
/// reuse across runs.
pub trait EmbeddingCache {
    fn get(&self, key: &str) -> Option<Vec<f32>>;
    fn put(&mut self, key: &str, vector: Vec<f32>);

    /// Persist, for caches with a backing store. No-op by default.
    fn save(&self) -> Result<(), String> {
        Ok(())
    }
}

/// In-memory cache; lives for one run.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: BTreeMap<String, Vec<f32>>,
}

impl MemoryCache {
    pub fn new() -> MemoryCache {
        MemoryCache::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl EmbeddingCache for MemoryCache {
    fn get(&self, key: &str) -> Option<Vec<f32>> {
        self.entries.get(key).cloned()
    }

    fn put(&mut self, key: &str, vector: Vec<f32>) {
        self.entries.insert(key.to_string(), vector);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheManifest {
    version: u32,
    model: String,
    entries: BTreeMap<String, Vec<f32>>,
}

impl CacheManifest {
    fn empty(model: &str) -> CacheManifest {
        CacheManifest {
            version: CACHE_VERSION,
            model: model.to_string(),
            entries: BTreeMap::new(),
        }
    }
}

/// JSON-file-backed cache, keyed by content hash and tagged with the model
/// name. A version or model mismatch resets the cache rather than serving
/// vectors from a different embedding space.
#[derive(Debug)]
pub struct FileCache {
    manifest: CacheManifest,
    path: PathBuf,
    pub reset: bool,
    pub reset_reason: Option<String>,
}

impl FileCache {
    pub fn load_or_create(path: &Path, model: &str) -> Result<FileCache, String> {
        let mut reset = false;
        let mut reset_reason = None;

        let manifest = if path.exists() {
            let bytes = std::fs::read(path)
                .map_err(|e| format!("read cache {}: {}", path.display(), e))?;
            match serde_json::from_slice::<CacheManifest>(&bytes) {
                Ok(manifest) if manifest.version != CACHE_VERSION => {
                    reset = true;
                    reset_reason = Some(format!(
                        "cache version mismatch ({} != {})",
                        manifest.version, CACHE_VERSION
                    ));
                    CacheManifest::empty(model)
                }
                Ok(manifest) if manifest.model != model => {
                    reset = true;
                    reset_reason = Some(format!(
                        "cache model mismatch ({} != {})",
                        manifest.model, model
                    ));
                    CacheManifest::empty(model)
                }
                Ok(manifest) => manifest,
                Err(err) => {
                    reset = true;
                    reset_reason = Some(format!("cache parse failed: {}", err));
                    CacheManifest::empty(model)
                }
            }
        } else {
            CacheManifest::empty(model)
        };

        Ok(FileCache {
            manifest,
            path: path.to_path_buf(),
            reset,
            reset_reason,
        })
    }

    pub fn len(&self) -> usize {
        self.manifest.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.manifest.entries.is_empty()
    }
}

impl EmbeddingCache for FileCache {
    fn get(&self, key: &str) -> Option<Vec<f32>> {
        self.manifest.entries.get(key).cloned()
    }

    fn put(&mut self, key: &str, vector: Vec<f32>) {
        self.manifest.entries.insert(key.to_string(), vector);
    }

    fn save(&self) -> Result<(), String> {
        let json = serde_json::to_vec(&self.manifest)
            .map_err(|e| format!("serialize cache: {}", e))?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| format!("create cache dir {}: {}", parent.display(), e))?;
            }
        }
        std::fs::write(&self.path, json)
            .map_err(|e| format!("write cache {}: {}", self.path.display(), e))
    }
}

/// Wraps a provider with a cache: only texts missing from the cache reach
/// the inner provider, batched in one call.
pub struct CachedProvider<P, C> {
    inner: P,
    cache: RefCell<C>,
}

impl<P: EmbedProvider, C: EmbeddingCache> CachedProvider<P, C> {
    pub fn new(inner: P, cache: C) -> CachedProvider<P, C> {
        CachedProvider {
            inner,
            cache: RefCell::new(cache),
        }
    }

    /// Persist the underlying cache, if it has a backing store.
    pub fn persist(&self) -> Result<(), String> {
        self.cache.borrow().save()
    }

    pub fn into_cache(self) -> C {
        self.cache.into_inner()
    }
}

impl<P: EmbedProvider, C: EmbeddingCache> EmbedProvider for CachedProvider<P, C> {
    fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbedError> {
        let keys: Vec<String> = texts.iter().map(|t| text_key(t)).collect();

        let mut out: Vec<Option<Vec<f32>>> = Vec::with_capacity(texts.len());
        let mut missing: Vec<usize> = Vec::new();
        {
            let cache = self.cache.borrow();
            for (i, key) in keys.iter().enumerate() {
                match cache.get(key) {
                    Some(v) => out.push(Some(v)),
                    None => {
                        out.push(None);
                        missing.push(i);
                    }
                }
            }
        }

        if !missing.is_empty() {
            let batch: Vec<String> = missing.iter().map(|&i| texts[i].clone()).collect();
            let fresh = self.inner.encode(&batch)?;
            if fresh.len() != batch.len() {
                return Err(EmbedError::Protocol(format!(
                    "provider returned {} vectors for {} texts",
                    fresh.len(),
                    batch.len()
                )));
            }
            let mut cache = self.cache.borrow_mut();
            for (&i, vector) in missing.iter().zip(fresh) {
                cache.put(&keys[i], vector.clone());
                out[i] = Some(vector);
            }
        }

        Ok(out.into_iter().map(|v| v.unwrap_or_default()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    struct CountingProvider {
        calls: Rc<Cell<usize>>,
        texts_seen: Rc<Cell<usize>>,
    }

    impl EmbedProvider for CountingProvider {
        fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbedError> {
            self.calls.set(self.calls.get() + 1);
            self.texts_seen.set(self.texts_seen.get() + texts.len());
            Ok(texts.iter().map(|t| vec![t.len() as f32, 1.0]).collect())
        }
    }

    fn counting() -> (CountingProvider, Rc<Cell<usize>>, Rc<Cell<usize>>) {
        let calls = Rc::new(Cell::new(0));
        let texts = Rc::new(Cell::new(0));
        (
            CountingProvider {
                calls: calls.clone(),
                texts_seen: texts.clone(),
            },
            calls,
            texts,
        )
    }

    #[test]
    fn repeated_text_hits_cache() {
        let (provider, calls, texts_seen) = counting();
        let cached = CachedProvider::new(provider, MemoryCache::new());

        let input = vec!["saúde".to_string(), "educação".to_string()];
        let first = cached.encode(&input).unwrap();
        let second = cached.encode(&input).unwrap();

        assert_eq!(first, second);
        assert_eq!(calls.get(), 1, "second pass must be served from cache");
        assert_eq!(texts_seen.get(), 2);
    }

    #[test]
    fn only_misses_reach_the_provider() {
        let (provider, _, texts_seen) = counting();
        let cached = CachedProvider::new(provider, MemoryCache::new());

        cached.encode(&["a".to_string()]).unwrap();
        cached
            .encode(&["a".to_string(), "bb".to_string(), "ccc".to_string()])
            .unwrap();

        assert_eq!(texts_seen.get(), 3, "cached `a` must not be re-sent");
    }

    #[test]
    fn file_cache_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("embeddings.json");

        let mut cache = FileCache::load_or_create(&path, "nomic-embed-text").unwrap();
        assert!(!cache.reset);
        cache.put(&text_key("saúde"), vec![0.25, 0.5]);
        cache.save().unwrap();

        let reloaded = FileCache::load_or_create(&path, "nomic-embed-text").unwrap();
        assert!(!reloaded.reset);
        assert_eq!(reloaded.get(&text_key("saúde")), Some(vec![0.25, 0.5]));
    }

    #[test]
    fn model_mismatch_resets_the_cache() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("embeddings.json");

        let mut cache = FileCache::load_or_create(&path, "nomic-embed-text").unwrap();
        cache.put(&text_key("saúde"), vec![1.0]);
        cache.save().unwrap();

        let other = FileCache::load_or_create(&path, "qwen3-embedding:0.6b").unwrap();
        assert!(other.reset);
        assert!(other.get(&text_key("saúde")).is_none());
        assert!(other.reset_reason.unwrap().contains("model mismatch"));
    }

    #[test]
    fn version_mismatch_resets_the_cache() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("embeddings.json");
        std::fs::write(
            &path,
            br#"{"version":99,"model":"nomic-embed-text","entries":{}}"#,
        )
        .unwrap();

        let cache = FileCache::load_or_create(&path, "nomic-embed-text").unwrap();
        assert!(cache.reset);
        assert!(cache.reset_reason.unwrap().contains("version mismatch"));
    }

    #[test]
    fn corrupt_cache_file_resets() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("embeddings.json");
        std::fs::write(&path, b"not json").unwrap();

        let cache = FileCache::load_or_create(&path, "nomic-embed-text").unwrap();
        assert!(cache.reset);
        assert!(cache.is_empty());
    }

    #[test]
    fn text_key_is_content_addressed() {
        assert_eq!(text_key("abc"), text_key("abc"));
        assert_ne!(text_key("abc"), text_key("abd"));
        assert_eq!(text_key("abc").len(), 64);
    }
}
