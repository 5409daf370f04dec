use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use crate::core::types::LabelEntry;
use crate::error::{FetchError, ResolveError, Result};
use crate::tdnet::archive::decode_text;
use crate::tdnet::parsing::labels::global_entries;

/// Where published taxonomy label linkbases come from.
pub trait LabelSource: Send + Sync {
    /// Raw bytes of the label linkbase for `namespace` (e.g. `jppfs_cor`).
    fn fetch(&self, namespace: &str) -> std::result::Result<Vec<u8>, FetchError>;
}

/// Shared, read-mostly store of parsed global labels keyed by namespace.
pub struct TaxonomyCache {
    source: Box<dyn LabelSource>,
    labels: RwLock<HashMap<String, Arc<Vec<LabelEntry>>>>,
}

impl TaxonomyCache {
    pub fn new<S: LabelSource + 'static>(source: S) -> Self {
        Self {
            source: Box::new(source),
            labels: RwLock::new(HashMap::new()),
        }
    }

    pub fn from_dir<P: Into<PathBuf>>(root: P) -> Self {
        Self::new(DirectorySource::new(root))
    }

    /// Global labels of `namespace`, fetched and parsed on first use.
    ///
    /// A transient fetch failure is retried once.
    pub fn labels(&self, namespace: &str) -> Result<Arc<Vec<LabelEntry>>> {
        if let Some(entries) = self
            .labels
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(namespace)
        {
            return Ok(Arc::clone(entries));
        }

        let bytes = self.fetch_with_retry(namespace)?;
        let unavailable = |reason: String| ResolveError::TaxonomyUnavailable {
            namespace: namespace.to_string(),
            reason,
        };
        let text = decode_text(&bytes).map_err(|e| unavailable(e.to_string()))?;
        let entries = global_entries(namespace, &text).map_err(|e| unavailable(e.to_string()))?;
        log::info!("Loaded {} global labels for {}", entries.len(), namespace);

        let mut labels = self.labels.write().unwrap_or_else(|e| e.into_inner());
        let entries = labels
            .entry(namespace.to_string())
            .or_insert_with(|| Arc::new(entries));
        Ok(Arc::clone(entries))
    }

    fn fetch_with_retry(&self, namespace: &str) -> Result<Vec<u8>> {
        let error = match self.source.fetch(namespace) {
            Ok(bytes) => return Ok(bytes),
            Err(FetchError::Transient(reason)) => {
                log::warn!("Retrying taxonomy fetch for {}: {}", namespace, reason);
                match self.source.fetch(namespace) {
                    Ok(bytes) => return Ok(bytes),
                    Err(e) => e,
                }
            }
            Err(e) => e,
        };
        Err(ResolveError::TaxonomyUnavailable {
            namespace: namespace.to_string(),
            reason: error.to_string(),
        })
    }

    /// Namespaces currently held in memory, sorted.
    pub fn cached_namespaces(&self) -> Vec<String> {
        let mut namespaces: Vec<String> = self
            .labels
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .keys()
            .cloned()
            .collect();
        namespaces.sort();
        namespaces
    }
}

/// Label linkbases under a local taxonomy directory.
///
/// The file for `jppfs_cor` is any `*lab.xml` named `jppfs_…` or
/// `jppfs-<date>…`; when several versions match the greatest path wins.
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    fn find(&self, namespace: &str) -> std::io::Result<Option<PathBuf>> {
        let stem = namespace.replace("_cor", "");
        let mut best: Option<PathBuf> = None;
        let mut pending = vec![self.root.clone()];

        while let Some(dir) = pending.pop() {
            for entry in std::fs::read_dir(&dir)? {
                let path = entry?.path();
                if path.is_dir() {
                    pending.push(path);
                    continue;
                }
                let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                    continue;
                };
                if is_label_file_for(name, &stem)
                    && best.as_ref().map_or(true, |b| path > *b)
                {
                    best = Some(path);
                }
            }
        }
        Ok(best)
    }
}

fn is_label_file_for(name: &str, stem: &str) -> bool {
    let Some(rest) = name.strip_prefix(stem) else {
        return false;
    };
    let versioned = rest.starts_with('_')
        || (rest.starts_with('-') && rest[1..].starts_with(|c: char| c.is_ascii_digit()));
    versioned && name.ends_with("lab.xml")
}

impl LabelSource for DirectorySource {
    fn fetch(&self, namespace: &str) -> std::result::Result<Vec<u8>, FetchError> {
        if !self.root.is_dir() {
            return Err(FetchError::Fatal(format!(
                "taxonomy directory {} does not exist",
                self.root.display()
            )));
        }
        let path = self
            .find(namespace)
            .map_err(|e| FetchError::Transient(e.to_string()))?
            .ok_or_else(|| {
                FetchError::Fatal(format!(
                    "no label linkbase for {} under {}",
                    namespace,
                    self.root.display()
                ))
            })?;
        log::debug!("Reading labels for {} from {}", namespace, path.display());
        read_file(&path)
    }
}

fn read_file(path: &Path) -> std::result::Result<Vec<u8>, FetchError> {
    std::fs::read(path).map_err(|e| FetchError::Transient(format!("{}: {}", path.display(), e)))
}

/// Label linkbases held in memory, keyed by namespace.
#[derive(Clone, Debug, Default)]
pub struct StaticSource {
    files: HashMap<String, Vec<u8>>,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, namespace: &str, bytes: impl Into<Vec<u8>>) -> Self {
        self.files.insert(namespace.to_string(), bytes.into());
        self
    }
}

impl LabelSource for StaticSource {
    fn fetch(&self, namespace: &str) -> std::result::Result<Vec<u8>, FetchError> {
        self.files
            .get(namespace)
            .cloned()
            .ok_or_else(|| FetchError::Fatal(format!("no labels for {}", namespace)))
    }
}
