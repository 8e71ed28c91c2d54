//! Bundle Labels
//!
//! Human-readable names used when a bundle has no title pattern.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Resolves a human-readable label for an entity type / bundle pair.
pub trait BundleLabelResolver: Send + Sync {
    fn label(&self, entity_type: &str, bundle: &str) -> String;
}

/// Labels taken from configuration.
///
/// When the bundle name equals the entity type (entity types without bundles)
/// the entity type label is used. Unknown names fall back to the machine name.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConfiguredLabels {
    /// Entity type labels: `node` → `Content`
    #[serde(default)]
    pub entity_types: HashMap<String, String>,

    /// Bundle labels per entity type: `node` → `article` → `Article`
    #[serde(default)]
    pub bundles: HashMap<String, HashMap<String, String>>,
}

impl ConfiguredLabels {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entity_type(mut self, entity_type: &str, label: &str) -> Self {
        self.entity_types
            .insert(entity_type.to_string(), label.to_string());
        self
    }

    pub fn with_bundle(mut self, entity_type: &str, bundle: &str, label: &str) -> Self {
        self.bundles
            .entry(entity_type.to_string())
            .or_default()
            .insert(bundle.to_string(), label.to_string());
        self
    }
}

impl BundleLabelResolver for ConfiguredLabels {
    fn label(&self, entity_type: &str, bundle: &str) -> String {
        if bundle == entity_type {
            return self
                .entity_types
                .get(entity_type)
                .cloned()
                .unwrap_or_else(|| entity_type.to_string());
        }
        self.bundles
            .get(entity_type)
            .and_then(|bundles| bundles.get(bundle))
            .cloned()
            .unwrap_or_else(|| bundle.to_string())
    }
}
