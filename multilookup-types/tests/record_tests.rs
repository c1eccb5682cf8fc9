use multilookup_types::{
    EntityMetadata, EntityReference, RecordId, RelationshipEdge, SelectedRow, TargetRecord,
    attribute_text,
};
use pretty_assertions::assert_eq;
use serde_json::{Map, Value, json};
use std::collections::HashSet;
use std::str::FromStr;

fn attrs(value: Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap()
}

// ── RecordId ────────────────────────────────────────────────────

#[test]
fn record_id_display_matches_input() {
    let id = RecordId::new("42");
    assert_eq!(id.to_string(), "42");
    assert_eq!(id.as_str(), "42");
}

#[test]
fn record_id_parse_trims() {
    let id = RecordId::parse("  7 ").unwrap();
    assert_eq!(id, RecordId::from("7"));
}

#[test]
fn record_id_parse_rejects_blank() {
    assert!(RecordId::parse("   ").is_err());
    assert!(RecordId::from_str("").is_err());
}

#[test]
fn record_id_serializes_transparently() {
    let json = serde_json::to_string(&RecordId::new("abc")).unwrap();
    assert_eq!(json, "\"abc\"");
}

#[test]
fn record_id_hash_and_eq() {
    let mut set = HashSet::new();
    set.insert(RecordId::new("1"));
    set.insert(RecordId::new("1"));
    assert_eq!(set.len(), 1);
}

// ── EntityReference ─────────────────────────────────────────────

#[test]
fn entity_reference_serializes_camel_case() {
    let reference = EntityReference::new("account", "42");
    let json = serde_json::to_value(&reference).unwrap();
    assert_eq!(json, json!({"entityType": "account", "id": "42"}));
}

#[test]
fn entity_reference_display() {
    let reference = EntityReference::new("contact", "7");
    assert_eq!(reference.to_string(), "contact(7)");
}

// ── TargetRecord ────────────────────────────────────────────────

#[test]
fn from_attributes_reads_collection_id() {
    let record = TargetRecord::from_attributes(
        "account",
        "name",
        attrs(json!({"accountid": "42", "name": "Globex"})),
        None,
    )
    .unwrap();

    assert_eq!(record.id, RecordId::new("42"));
    assert_eq!(record.display_value, "Globex");
    assert_eq!(record.attributes.len(), 2);
}

#[test]
fn from_attributes_uses_fallback_id() {
    let record = TargetRecord::from_attributes(
        "account",
        "name",
        attrs(json!({"name": "Initech"})),
        Some("99"),
    )
    .unwrap();
    assert_eq!(record.id.as_str(), "99");
}

#[test]
fn from_attributes_without_any_id_is_none() {
    let record =
        TargetRecord::from_attributes("account", "name", attrs(json!({"name": "x"})), None);
    assert!(record.is_none());
}

#[test]
fn from_attributes_missing_display_is_empty() {
    let record = TargetRecord::from_attributes(
        "account",
        "name",
        attrs(json!({"accountid": "1", "name": null})),
        None,
    )
    .unwrap();
    assert_eq!(record.display_value, "");
}

#[test]
fn display_contains_is_case_insensitive_on_record_side() {
    let record = TargetRecord::new("1", "Acme Corp");
    assert!(record.display_contains("acme"));
    assert!(record.display_contains("corp"));
    assert!(!record.display_contains("globex"));
}

#[test]
fn attribute_text_renders_scalars() {
    assert_eq!(attribute_text(Some(&json!("a"))), "a");
    assert_eq!(attribute_text(Some(&json!(12))), "12");
    assert_eq!(attribute_text(Some(&json!(true))), "true");
    assert_eq!(attribute_text(Some(&Value::Null)), "");
    assert_eq!(attribute_text(None), "");
}

// ── SelectedRow / RelationshipEdge ──────────────────────────────

#[test]
fn selected_row_from_target_record() {
    let record = TargetRecord::new("42", "Globex");
    let row = SelectedRow::from(&record);
    assert_eq!(row, SelectedRow::new("42", "Globex"));
}

#[test]
fn edge_joins_in_either_direction() {
    let host = EntityReference::new("contact", "c1");
    let target = EntityReference::new("account", "a1");
    let edge = RelationshipEdge::between(&host, &target, "contact_accounts");

    assert!(edge.joins(&host, &target));
    assert!(edge.joins(&target, &host));
    assert!(!edge.joins(&host, &EntityReference::new("account", "a2")));
    assert_eq!(edge.host(), host);
    assert_eq!(edge.target(), target);
}

// ── EntityMetadata ──────────────────────────────────────────────

#[test]
fn metadata_labels() {
    let metadata = EntityMetadata {
        logical_name: "account".into(),
        primary_name_attribute: "name".into(),
        display_collection_name: "Accounts".into(),
        display_name: "Account".into(),
        entity_set_name: "accounts".into(),
    };
    assert_eq!(metadata.all_records_label(), "All Accounts");
    assert_eq!(metadata.new_record_label(), "New Account");
}

#[test]
fn metadata_entity_set_name_defaults_when_absent() {
    let metadata: EntityMetadata = serde_json::from_value(json!({
        "logical_name": "account",
        "primary_name_attribute": "name",
        "display_collection_name": "Accounts",
        "display_name": "Account"
    }))
    .unwrap();
    assert!(metadata.entity_set_name.is_empty());
}
