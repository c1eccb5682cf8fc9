use crate::ids::{EntityReference, RecordId};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A candidate row from the target collection.
///
/// `id` is unique within the collection. `display_value` is the label shown
/// to the user and is NOT guaranteed to be unique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetRecord {
    pub id: RecordId,
    pub display_value: String,
    /// Full attribute bag as returned by the store.
    pub attributes: Map<String, Value>,
}

impl TargetRecord {
    /// Creates a record with an empty attribute bag.
    pub fn new(id: impl Into<RecordId>, display_value: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_value: display_value.into(),
            attributes: Map::new(),
        }
    }

    /// Builds a record from a raw attribute bag.
    ///
    /// The id is read from `<collection>id`, then from `fallback_id`. Returns
    /// `None` when neither yields a non-empty id.
    pub fn from_attributes(
        collection: &str,
        display_attribute: &str,
        attributes: Map<String, Value>,
        fallback_id: Option<&str>,
    ) -> Option<Self> {
        let id_key = format!("{collection}id");
        let id = attributes
            .get(&id_key)
            .and_then(Value::as_str)
            .or(fallback_id)
            .filter(|id| !id.trim().is_empty())?
            .to_string();

        let display_value = attribute_text(attributes.get(display_attribute));

        Some(Self {
            id: RecordId::new(id),
            display_value,
            attributes,
        })
    }

    /// Case-insensitive substring match against the display value.
    pub fn display_contains(&self, needle_lowercase: &str) -> bool {
        self.display_value.to_lowercase().contains(needle_lowercase)
    }
}

/// Renders an attribute value as label text. Missing and null values are empty.
pub fn attribute_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// A row currently materialized in the host's relationship dataset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SelectedRow {
    pub id: RecordId,
    pub display_value: String,
}

impl SelectedRow {
    pub fn new(id: impl Into<RecordId>, display_value: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_value: display_value.into(),
        }
    }
}

impl From<&TargetRecord> for SelectedRow {
    fn from(record: &TargetRecord) -> Self {
        Self {
            id: record.id.clone(),
            display_value: record.display_value.clone(),
        }
    }
}

/// Logical link between a host record and a target record.
///
/// Edges are owned by the remote store; this type only describes one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RelationshipEdge {
    pub host_entity_type: String,
    pub host_id: RecordId,
    pub target_entity_type: String,
    pub target_id: RecordId,
    pub relationship_name: String,
}

impl RelationshipEdge {
    /// Builds the edge linking `host` and `target` under `relationship_name`.
    pub fn between(
        host: &EntityReference,
        target: &EntityReference,
        relationship_name: impl Into<String>,
    ) -> Self {
        Self {
            host_entity_type: host.entity_type.clone(),
            host_id: host.id.clone(),
            target_entity_type: target.entity_type.clone(),
            target_id: target.id.clone(),
            relationship_name: relationship_name.into(),
        }
    }

    pub fn host(&self) -> EntityReference {
        EntityReference::new(self.host_entity_type.clone(), self.host_id.clone())
    }

    pub fn target(&self) -> EntityReference {
        EntityReference::new(self.target_entity_type.clone(), self.target_id.clone())
    }

    /// Whether this edge joins the two references, in either direction.
    pub fn joins(&self, a: &EntityReference, b: &EntityReference) -> bool {
        let (host, target) = (self.host(), self.target());
        (host == *a && target == *b) || (host == *b && target == *a)
    }
}
