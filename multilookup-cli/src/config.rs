//! TOML configuration for the `multilookup` binary.
//!
//! ```toml
//! [store]
//! base_url = "https://contoso.crm.dynamics.com"
//! access_token = "..."
//!
//! [lookup]
//! host_entity = "contact"
//! host_id = "c1"
//! relationship = "contact_accounts"
//! target_entity = "account"
//! search_mode = "advanced"
//! search_columns = "name,tickersymbol"
//! ```

use anyhow::{Context, Result, bail};
use multilookup_engine::LookupSettings;
use multilookup_store::WebApiConfig;
use multilookup_types::{EntityReference, SearchMode, WordMatch, parse_search_columns};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Default config file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "multilookup.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub store: WebApiConfig,
    pub lookup: LookupConfig,
}

/// The `[lookup]` table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LookupConfig {
    pub host_entity: String,
    pub host_id: String,
    pub relationship: String,
    pub target_entity: String,
    #[serde(default)]
    pub search_mode: SearchMode,
    #[serde(default)]
    pub filter: Option<String>,
    #[serde(default)]
    pub order: Option<String>,
    /// Comma-separated column list for full-text search.
    #[serde(default)]
    pub search_columns: String,
    #[serde(default)]
    pub best_effort: bool,
    #[serde(default)]
    pub match_words: WordMatch,
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

fn default_debounce_ms() -> u64 {
    400
}

impl AppConfig {
    /// Reads and parses a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).context("Failed to parse TOML")?;
        if config.store.base_url.trim().is_empty() {
            bail!("[store] base_url is required");
        }
        Ok(config)
    }

    /// Replaces the configured token when `token` is set.
    #[must_use]
    pub fn with_token(mut self, token: Option<String>) -> Self {
        if let Some(token) = token.filter(|t| !t.is_empty()) {
            self.store.access_token = Some(token);
        }
        self
    }
}

impl LookupConfig {
    pub fn to_settings(&self) -> LookupSettings {
        LookupSettings::new(
            EntityReference::new(self.host_entity.clone(), self.host_id.clone()),
            self.relationship.clone(),
            self.target_entity.clone(),
        )
        .with_search_mode(self.search_mode)
        .with_filter(self.filter.clone())
        .with_order(self.order.clone())
        .with_search_columns(parse_search_columns(&self.search_columns))
        .with_best_effort(self.best_effort)
        .with_word_match(self.match_words)
        .with_debounce(Duration::from_millis(self.debounce_ms))
    }
}
