use multilookup_types::{
    EntityMetadata, SearchMode, SearchStrategyConfig, WordMatch, parse_search_columns,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn account_metadata() -> EntityMetadata {
    EntityMetadata {
        logical_name: "account".into(),
        primary_name_attribute: "name".into(),
        display_collection_name: "Accounts".into(),
        display_name: "Account".into(),
        entity_set_name: "accounts".into(),
    }
}

// ── SearchMode / WordMatch ──────────────────────────────────────

#[test]
fn search_mode_defaults_to_simple() {
    assert_eq!(SearchMode::default(), SearchMode::Simple);
}

#[test]
fn search_mode_parses_names_and_option_codes() {
    assert_eq!("simple".parse::<SearchMode>().unwrap(), SearchMode::Simple);
    assert_eq!("Advanced".parse::<SearchMode>().unwrap(), SearchMode::Advanced);
    assert_eq!("0".parse::<SearchMode>().unwrap(), SearchMode::Simple);
    assert_eq!("1".parse::<SearchMode>().unwrap(), SearchMode::Advanced);
    assert!("fuzzy".parse::<SearchMode>().is_err());
}

#[test]
fn word_match_serializes_lowercase() {
    assert_eq!(serde_json::to_string(&WordMatch::Any).unwrap(), "\"any\"");
    assert_eq!(serde_json::to_string(&WordMatch::All).unwrap(), "\"all\"");
    assert_eq!(WordMatch::Any.to_string(), "any");
}

#[test]
fn word_match_parse() {
    assert_eq!(" ANY ".parse::<WordMatch>().unwrap(), WordMatch::Any);
    assert!("some".parse::<WordMatch>().is_err());
}

// ── SearchStrategyConfig ────────────────────────────────────────

#[test]
fn config_from_metadata_uses_primary_name() {
    let config = SearchStrategyConfig::from_metadata(&account_metadata());
    assert_eq!(config.collection, "account");
    assert_eq!(config.display_attribute, "name");
    assert_eq!(config.id_attribute(), "accountid");
    assert_eq!(config.filter, None);
    assert_eq!(config.order, None);
    assert!(config.search_columns.is_empty());
    assert!(!config.best_effort);
    assert_eq!(config.word_match, WordMatch::All);
}

#[test]
fn config_builders_drop_blank_filter_and_order() {
    let config = SearchStrategyConfig::new("account", "name")
        .with_filter(Some("  ".into()))
        .with_order(Some(String::new()));
    assert_eq!(config.filter, None);
    assert_eq!(config.order, None);
}

#[test]
fn config_builders_keep_values() {
    let config = SearchStrategyConfig::new("account", "name")
        .with_filter(Some("statecode eq 0".into()))
        .with_order(Some("name asc".into()))
        .with_search_columns(vec!["name".into(), "ticker".into()])
        .with_best_effort(true)
        .with_word_match(WordMatch::Any);

    assert_eq!(config.filter.as_deref(), Some("statecode eq 0"));
    assert_eq!(config.order.as_deref(), Some("name asc"));
    assert_eq!(config.search_columns, vec!["name", "ticker"]);
    assert!(config.best_effort);
    assert_eq!(config.word_match, WordMatch::Any);
}

// ── parse_search_columns ────────────────────────────────────────

#[test]
fn parse_search_columns_splits_and_trims() {
    assert_eq!(parse_search_columns("name, ticker ,,"), vec!["name", "ticker"]);
    assert!(parse_search_columns("").is_empty());
}

proptest! {
    #[test]
    fn parse_search_columns_never_yields_blank_entries(setting in "[a-z ,]{0,40}") {
        for column in parse_search_columns(&setting) {
            prop_assert!(!column.is_empty());
            prop_assert_eq!(column.trim(), column.as_str());
        }
    }
}
