//! Bundle Configuration Cache
//!
//! Read-through cache in front of a [`ConfigProvider`], keyed by
//! (entity type, bundle). Entries live until the host invalidates them.
//!
//! First population is compute-then-publish-or-discard: the provider is called
//! without holding the lock, and if another caller published an entry for the
//! same key in the meantime, that entry wins and the fresh value is dropped.

use crate::config::{BundleConfig, ConfigProvider};
use crate::error::TitleError;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Composite cache key
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BundleKey {
    pub entity_type: String,
    pub bundle: String,
}

impl BundleKey {
    pub fn new(entity_type: &str, bundle: &str) -> Self {
        Self {
            entity_type: entity_type.to_string(),
            bundle: bundle.to_string(),
        }
    }
}

impl std::fmt::Display for BundleKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.entity_type, self.bundle)
    }
}

/// Cached bundle settings. Unconfigured bundles are cached as the default
/// (disabled) configuration.
pub struct BundleConfigCache {
    provider: Arc<dyn ConfigProvider>,
    entries: RwLock<HashMap<BundleKey, Arc<BundleConfig>>>,
}

impl BundleConfigCache {
    pub fn new(provider: Arc<dyn ConfigProvider>) -> Self {
        Self {
            provider,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Get settings for a bundle, loading them on first access.
    pub fn get(&self, entity_type: &str, bundle: &str) -> Result<Arc<BundleConfig>, TitleError> {
        let key = BundleKey::new(entity_type, bundle);
        if let Some(config) = self.entries.read().get(&key) {
            return Ok(Arc::clone(config));
        }

        let loaded = match self.provider.get(entity_type, bundle)? {
            Some(config) => config,
            None => {
                debug!(bundle = %key, "No title configuration, treating as disabled");
                BundleConfig::default()
            }
        };

        let mut entries = self.entries.write();
        let published = entries.entry(key).or_insert_with(|| Arc::new(loaded));
        Ok(Arc::clone(published))
    }

    /// Drop one cached entry so the next access reloads it.
    pub fn invalidate(&self, entity_type: &str, bundle: &str) {
        self.entries
            .write()
            .remove(&BundleKey::new(entity_type, bundle));
    }

    pub fn invalidate_all(&self) {
        self.entries.write().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl std::fmt::Debug for BundleConfigCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BundleConfigCache")
            .field("entries", &self.len())
            .finish_non_exhaustive()
    }
}
