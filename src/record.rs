//! Record Adapter
//!
//! The narrow view of a content record the engine works against. Hosts adapt
//! their own entity types by implementing [`TitleRecord`]; [`EntityRecord`] is a
//! self-contained implementation used by the CLI and tests.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Persisted identifier of a record.
///
/// Hosts use numeric or string identifiers; both are kept as their textual form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        RecordId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<u64> for RecordId {
    fn from(id: u64) -> Self {
        RecordId(id.to_string())
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        RecordId(id.to_string())
    }
}

impl From<String> for RecordId {
    fn from(id: String) -> Self {
        RecordId(id)
    }
}

impl Serialize for RecordId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0.parse::<u64>() {
            Ok(numeric) if numeric.to_string() == self.0 => serializer.serialize_u64(numeric),
            _ => serializer.serialize_str(&self.0),
        }
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Number(u64),
            Text(String),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Number(n) => RecordId::from(n),
            RawId::Text(s) => RecordId::from(s),
        })
    }
}

/// Identity of a record within one processing pass.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RecordKey {
    /// A stored record, identified by type and persisted id.
    Persisted { entity_type: String, id: RecordId },
    /// A record without a persisted id, identified by an in-memory handle.
    Transient(u64),
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKey::Persisted { entity_type, id } => write!(f, "{}:{}", entity_type, id),
            RecordKey::Transient(handle) => write!(f, "transient:{}", handle),
        }
    }
}

/// Content record as seen by the title engine.
pub trait TitleRecord {
    /// Machine name of the entity type, e.g. `node`.
    fn entity_type(&self) -> &str;

    /// Machine name of the bundle, e.g. `article`.
    fn bundle(&self) -> &str;

    /// Persisted identifier; `None` for records not saved yet.
    fn id(&self) -> Option<RecordId>;

    /// Whether the entity type declares a title (label) attribute.
    fn has_title_attribute(&self) -> bool;

    /// Name of the title attribute, `None` when the entity type has none.
    fn title_attribute_name(&self) -> Option<&str>;

    /// Current title value; empty when unset.
    fn title(&self) -> &str;

    fn set_title(&mut self, title: &str);

    /// Key used by the [`ProcessingContext`](crate::guard::ProcessingContext)
    /// and in reports.
    fn record_key(&self) -> RecordKey;

    /// Handle of this in-memory record that does not change when the record
    /// receives a persisted id. `None` when the host has no such handle.
    fn instance_key(&self) -> Option<RecordKey> {
        None
    }

    /// Raw value of a named field, used by token resolvers.
    fn field(&self, _name: &str) -> Option<String> {
        None
    }
}

static NEXT_INSTANCE: AtomicU64 = AtomicU64::new(1);

fn next_instance() -> u64 {
    NEXT_INSTANCE.fetch_add(1, Ordering::Relaxed)
}

fn default_title_attribute() -> Option<String> {
    Some("title".to_string())
}

/// Plain record with a field map.
///
/// `title_attribute: null` in serialized form models an entity type without a
/// title attribute.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityRecord {
    pub entity_type: String,
    pub bundle: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(default = "default_title_attribute")]
    pub title_attribute: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, String>,
    #[serde(skip, default = "next_instance")]
    instance: u64,
}

impl EntityRecord {
    /// Create an unsaved record with a `title` attribute.
    pub fn new(entity_type: impl Into<String>, bundle: impl Into<String>) -> Self {
        Self {
            entity_type: entity_type.into(),
            bundle: bundle.into(),
            id: None,
            title_attribute: default_title_attribute(),
            title: String::new(),
            fields: BTreeMap::new(),
            instance: next_instance(),
        }
    }

    pub fn with_id(mut self, id: impl Into<RecordId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Use a different title attribute name, or none at all.
    pub fn with_title_attribute(mut self, name: Option<&str>) -> Self {
        self.title_attribute = name.map(str::to_string);
        self
    }
}

impl TitleRecord for EntityRecord {
    fn entity_type(&self) -> &str {
        &self.entity_type
    }

    fn bundle(&self) -> &str {
        &self.bundle
    }

    fn id(&self) -> Option<RecordId> {
        self.id.clone()
    }

    fn has_title_attribute(&self) -> bool {
        self.title_attribute.is_some()
    }

    fn title_attribute_name(&self) -> Option<&str> {
        self.title_attribute.as_deref()
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    fn record_key(&self) -> RecordKey {
        match &self.id {
            Some(id) => RecordKey::Persisted {
                entity_type: self.entity_type.clone(),
                id: id.clone(),
            },
            None => RecordKey::Transient(self.instance),
        }
    }

    fn instance_key(&self) -> Option<RecordKey> {
        Some(RecordKey::Transient(self.instance))
    }

    fn field(&self, name: &str) -> Option<String> {
        self.fields.get(name).cloned()
    }
}
