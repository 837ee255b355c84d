//! Per-request output configuration.
//!
//! A scan request may carry a JSON document choosing which optional fields to
//! emit and a free-text block of tree rules for the generated prompt. Parsing
//! is best-effort: an absent or malformed document falls back to the
//! documented defaults and never fails the caller.

use serde::Deserialize;
use tracing::warn;

/// Ten independent toggles for optional record fields. `editorId` and
/// `magickaCost` default on, everything else off.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FieldConfig {
    pub editor_id: bool,
    pub magicka_cost: bool,
    pub minimum_skill: bool,
    pub casting_type: bool,
    pub delivery: bool,
    pub charge_time: bool,
    pub plugin: bool,
    pub effects: bool,
    pub effect_names: bool,
    pub keywords: bool,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            editor_id: true,
            magicka_cost: true,
            minimum_skill: false,
            casting_type: false,
            delivery: false,
            charge_time: false,
            plugin: false,
            effects: false,
            effect_names: false,
            keywords: false,
        }
    }
}

impl FieldConfig {
    /// Parse the legacy fields-only document (flags at the top level).
    pub fn parse(document: &str) -> Self {
        if document.trim().is_empty() {
            return Self::default();
        }
        match serde_json::from_str(document) {
            Ok(config) => config,
            Err(e) => {
                warn!(error = %e, "failed to parse field config, using defaults");
                Self::default()
            }
        }
    }
}

/// A [`FieldConfig`] plus the user's tree-creation rules, inserted verbatim
/// into the generated prompt.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScanConfig {
    pub fields: FieldConfig,
    pub tree_rules_prompt: String,
}

impl ScanConfig {
    pub fn parse(document: &str) -> Self {
        if document.trim().is_empty() {
            return Self::default();
        }
        match serde_json::from_str(document) {
            Ok(config) => config,
            Err(e) => {
                warn!(error = %e, "failed to parse scan config, using defaults");
                Self::default()
            }
        }
    }

    /// Wrap a fields-only document in a config with empty tree rules.
    pub fn from_fields(fields: FieldConfig) -> Self {
        Self {
            fields,
            tree_rules_prompt: String::new(),
        }
    }
}
