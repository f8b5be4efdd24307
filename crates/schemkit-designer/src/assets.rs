//! Symbol asset loading.
//!
//! An [`AssetSource`] fetches raw SVG text by path. The [`AssetLoader`] on top
//! of it parses documents and memoizes them per path; concurrent loads of the
//! same path share a single in-flight fetch. Failed loads are not cached, so a
//! later call retries.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use schemkit_core::{thread_safe_map, AssetError, ThreadSafeMap};
use tokio::sync::OnceCell;

use crate::svg::{parse_document, SvgDocument};

/// Source of raw asset text.
#[async_trait]
pub trait AssetSource: Send + Sync {
    /// Fetches the asset at `path`.
    async fn fetch(&self, path: &str) -> Result<String, AssetError>;
}

/// Reads assets from a directory on disk.
#[derive(Debug, Clone)]
pub struct DirAssetSource {
    root: PathBuf,
}

impl DirAssetSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &PathBuf {
        &self.root
    }
}

#[async_trait]
impl AssetSource for DirAssetSource {
    async fn fetch(&self, path: &str) -> Result<String, AssetError> {
        let full = self.root.join(path);
        tokio::fs::read_to_string(&full).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AssetError::NotFound {
                    path: path.to_string(),
                }
            } else {
                AssetError::ReadFailed {
                    path: path.to_string(),
                    reason: e.to_string(),
                }
            }
        })
    }
}

/// In-memory assets, with a fetch counter and optional simulated latency.
#[derive(Debug, Default)]
pub struct MemoryAssetSource {
    assets: HashMap<String, String>,
    latency: Option<Duration>,
    fetches: AtomicUsize,
}

impl MemoryAssetSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// The symbol files shipped in `assets/symbols`.
    pub fn with_builtin_symbols() -> Self {
        let mut source = Self::new();
        for (path, text) in [
            (
                "symbols/resistor.svg",
                include_str!("../../../assets/symbols/resistor.svg"),
            ),
            (
                "symbols/inductor.svg",
                include_str!("../../../assets/symbols/inductor.svg"),
            ),
            (
                "symbols/capacitor.svg",
                include_str!("../../../assets/symbols/capacitor.svg"),
            ),
            (
                "symbols/nmos.svg",
                include_str!("../../../assets/symbols/nmos.svg"),
            ),
            (
                "symbols/pmos.svg",
                include_str!("../../../assets/symbols/pmos.svg"),
            ),
        ] {
            source.insert(path, text);
        }
        source
    }

    pub fn insert(&mut self, path: impl Into<String>, text: impl Into<String>) {
        self.assets.insert(path.into(), text.into());
    }

    pub fn remove(&mut self, path: &str) -> Option<String> {
        self.assets.remove(path)
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with_asset(mut self, path: impl Into<String>, text: impl Into<String>) -> Self {
        self.insert(path, text);
        self
    }

    /// Delays every fetch by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Number of fetches served so far, including failed ones.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AssetSource for MemoryAssetSource {
    async fn fetch(&self, path: &str) -> Result<String, AssetError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        self.assets
            .get(path)
            .cloned()
            .ok_or_else(|| AssetError::NotFound {
                path: path.to_string(),
            })
    }
}

type DocumentSlot = Arc<OnceCell<Arc<SvgDocument>>>;

/// Parsing, memoizing front end of an [`AssetSource`].
pub struct AssetLoader {
    source: Arc<dyn AssetSource>,
    documents: ThreadSafeMap<String, DocumentSlot>,
}

impl AssetLoader {
    pub fn new(source: impl AssetSource + 'static) -> Self {
        Self::from_arc(Arc::new(source))
    }

    pub fn from_arc(source: Arc<dyn AssetSource>) -> Self {
        Self {
            source,
            documents: thread_safe_map(),
        }
    }

    /// Loads and parses the document at `path`.
    pub async fn load(&self, path: &str) -> Result<Arc<SvgDocument>, AssetError> {
        let slot = {
            let mut documents = self.documents.lock();
            documents
                .entry(path.to_string())
                .or_insert_with(|| Arc::new(OnceCell::new()))
                .clone()
        };

        if let Some(doc) = slot.get() {
            tracing::trace!("Asset cache hit: {}", path);
            return Ok(doc.clone());
        }

        let doc = slot
            .get_or_try_init(|| async {
                tracing::debug!("Fetching asset {}", path);
                let text = self.source.fetch(path).await?;
                let doc = parse_document(&text).map_err(|e| AssetError::ParseFailed {
                    path: path.to_string(),
                    reason: e.to_string(),
                })?;
                Ok::<_, AssetError>(Arc::new(doc))
            })
            .await?;
        Ok(doc.clone())
    }

    /// True when `path` has been loaded successfully.
    pub fn is_cached(&self, path: &str) -> bool {
        self.documents
            .lock()
            .get(path)
            .is_some_and(|slot| slot.initialized())
    }

    /// Drops the memoized document for `path`.
    pub fn invalidate(&self, path: &str) {
        self.documents.lock().remove(path);
    }

    pub fn clear(&self) {
        self.documents.lock().clear();
    }
}

impl std::fmt::Debug for AssetLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetLoader")
            .field("documents", &self.documents.lock().len())
            .finish()
    }
}
