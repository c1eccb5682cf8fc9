use serde::{Deserialize, Serialize};

/// Entity metadata resolved once per target collection.
///
/// The primary name attribute is a precondition for building any search
/// strategy, since it names the display attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityMetadata {
    pub logical_name: String,
    pub primary_name_attribute: String,
    /// Plural label, e.g. "Accounts".
    pub display_collection_name: String,
    /// Singular label, e.g. "Account".
    pub display_name: String,
    /// Web API collection segment, e.g. "accounts". Empty when the store does
    /// not address collections by a separate name.
    #[serde(default)]
    pub entity_set_name: String,
}

impl EntityMetadata {
    /// Header text shown above the option list.
    pub fn all_records_label(&self) -> String {
        format!("All {}", self.display_collection_name)
    }

    /// Label of the "create new" action.
    pub fn new_record_label(&self) -> String {
        format!("New {}", self.display_name)
    }
}
