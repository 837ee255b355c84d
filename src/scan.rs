//! Catalog scanning, document assembly and single-spell detail lookup.
//!
//! Two scan modes share one record shape: the full scan walks every spell in
//! the catalog and applies the whole filter battery, while the tome scan walks
//! teaching items, deduplicates by taught spell and trusts books to imply
//! player relevance. Both wrap their records in a [`ScanDocument`] carrying a
//! timestamp and the instruction block for the downstream tree builder.

use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;
use tracing::{error, info, warn};

use crate::catalog::{Catalog, FormId, FormIdHasher, FormRef, Spell, SpellKind};
use crate::classify::non_player_reason;
use crate::encoding::sanitize_text;
use crate::error::{Result, SpellscanError};
use crate::fields::ScanConfig;
use crate::record::{
    effect_record, format_form_id, plugin_name, primary_school, school_name, skill_level_name,
    spell_record, Record,
};
use crate::weakening::Effectiveness;

// ------------- ScanPolicy -------------
/// Policy constants whose derivation is external to the scanner. Both are
/// runtime-configurable rather than hard-coded.
#[derive(Debug, Clone)]
pub struct ScanPolicy {
    /// Computed costs above this are treated as an NPC-only signal.
    pub cost_limit: f32,
    /// Hex-looking names at least this long count as broken names.
    pub hex_name_min_len: usize,
}

impl Default for ScanPolicy {
    fn default() -> Self {
        Self {
            cost_limit: 1000.0,
            hex_name_min_len: 6,
        }
    }
}

// ------------- ScanStats -------------
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScanStats {
    pub kept: usize,
    pub skipped: usize,
    pub filtered: usize,
    pub duplicates: usize,
}

// ------------- ScanDocument -------------
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanDocument {
    pub scan_timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scan_mode: Option<String>,
    pub spell_count: usize,
    pub spells: Vec<Record>,
    pub llm_prompt: String,
}

impl ScanDocument {
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|e| {
            error!(error = %e, "failed to serialize scan document");
            String::from("{}")
        })
    }
}

#[derive(Debug)]
pub struct ScanOutcome {
    pub document: ScanDocument,
    pub stats: ScanStats,
}

fn scan_timestamp() -> String {
    chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

// ------------- Instruction block -------------

/// Output-format instructions for the external tree builder. Opaque free text
/// as far as this crate is concerned; appended after the user's tree rules.
pub const SYSTEM_INSTRUCTIONS: &str = r#"
## OUTPUT FORMAT REQUIREMENTS (CRITICAL - Follow exactly)

You MUST return ONLY valid JSON matching this exact schema. No explanations, no markdown code blocks, just raw JSON.

```json
{
  "version": "1.0",
  "schools": {
    "Alteration": {
      "root": "0xFORMID_OF_ROOT_SPELL",
      "nodes": [
        {
          "formId": "0xFORMID",
          "children": ["0xCHILD_FORMID_1", "0xCHILD_FORMID_2"],
          "prerequisites": ["0xPREREQ_FORMID"],
          "tier": 1
        }
      ]
    },
    "Conjuration": { ... },
    "Destruction": { ... },
    "Illusion": { ... },
    "Restoration": { ... }
  }
}
```

### Field Requirements:
- **formId**: The hex FormID from the spell data (e.g., "0x00012FCD"). MUST match exactly.
- **children**: Array of formIds that this spell unlocks. Empty array [] if none.
- **prerequisites**: Array of formIds required before learning. Empty array [] for root spells.
- **tier**: Integer depth in tree. Root = 1, children of root = 2, etc.
- **root**: The formId of the single root spell for each school.

### Critical Rules:
1. Use ONLY formIds in the output - names/descriptions are NOT needed (retrieved in-game)
2. Every spell from the input MUST appear exactly once in the output
3. Each school has exactly ONE root spell (prerequisites = [])
4. FormIds must be EXACT matches from the spell data - no modifications
5. Return raw JSON only - no markdown, no explanations, no code fences

## SPELL DATA:
"#;

/// The user's tree rules (under their own heading, when present) followed by
/// the fixed system instructions.
pub fn llm_prompt(tree_rules: &str) -> String {
    let mut prompt = String::new();
    if !tree_rules.is_empty() {
        prompt.push_str("## TREE CREATION RULES\n\n");
        prompt.push_str(tree_rules);
        prompt.push_str("\n\n");
    }
    prompt.push_str(SYSTEM_INSTRUCTIONS);
    prompt
}

// ------------- Name heuristics -------------

/// Display names that are really form ids, e.g. "0x000A26FF".
fn looks_like_form_id(name: &str) -> bool {
    name.starts_with("0x") || name.starts_with("0X")
}

/// Names made up entirely of hex digits and spaces. Long enough ones are
/// treated as broken names; a legitimate hex-looking name is an accepted
/// false positive.
fn is_hex_like(name: &str, min_len: usize) -> bool {
    !name.is_empty()
        && name.len() >= min_len
        && name.chars().all(|c| c.is_ascii_hexdigit() || c == ' ')
}

/// At least one effect must carry a real name: non-empty, longer than two
/// characters and not form-id shaped.
fn has_valid_effect(spell: &Spell) -> bool {
    spell.effects.iter().any(|effect| {
        let name = sanitize_text(&effect.name);
        name.len() > 2 && !looks_like_form_id(&name)
    })
}

// ------------- Full scan -------------

enum Verdict {
    Keep,
    Skip(&'static str),
    Filter(&'static str),
}

fn full_scan_verdict(spell: &Spell, policy: &ScanPolicy) -> Verdict {
    if spell.kind != SpellKind::Spell {
        return Verdict::Skip("not a spell");
    }
    let name = sanitize_text(&spell.name);
    let has_editor_id = spell
        .editor_id
        .as_deref()
        .is_some_and(|id| !id.is_empty());
    if name.is_empty() || !has_editor_id {
        return Verdict::Skip("missing name or editor id");
    }
    if looks_like_form_id(&name) {
        return Verdict::Filter("form-id-shaped name");
    }
    if is_hex_like(&name, policy.hex_name_min_len) {
        return Verdict::Filter("hex-shaped name");
    }
    if let Some(reason) = spell.editor_id.as_deref().and_then(non_player_reason) {
        return Verdict::Filter(reason);
    }
    let (school, _) = primary_school(spell);
    if school.is_none() {
        return Verdict::Filter("no resolvable school");
    }
    if spell.magicka_cost > policy.cost_limit {
        return Verdict::Filter("cost above limit");
    }
    if !has_valid_effect(spell) {
        return Verdict::Filter("no valid effect");
    }
    Verdict::Keep
}

/// Scan every spell-kind entity in the catalog.
pub fn scan_all(catalog: &dyn Catalog, config: &ScanConfig, policy: &ScanPolicy) -> ScanOutcome {
    info!(total = catalog.spells().len(), "starting full spell scan");
    let mut stats = ScanStats::default();
    let mut records = Vec::new();

    for spell in catalog.spells() {
        match full_scan_verdict(spell, policy) {
            Verdict::Keep => {
                records.push(spell_record(catalog, spell, &config.fields, None));
                stats.kept += 1;
            }
            Verdict::Skip(_) => {
                stats.skipped += 1;
            }
            Verdict::Filter(reason) => {
                info!(
                    form_id = %format_form_id(spell.form_id),
                    reason,
                    "filtering spell"
                );
                stats.filtered += 1;
            }
        }
    }

    info!(
        kept = stats.kept,
        skipped = stats.skipped,
        filtered = stats.filtered,
        "full scan complete"
    );

    let document = ScanDocument {
        scan_timestamp: scan_timestamp(),
        scan_mode: None,
        spell_count: records.len(),
        spells: records,
        llm_prompt: llm_prompt(&config.tree_rules_prompt),
    };
    ScanOutcome { document, stats }
}

// ------------- Tome scan -------------

/// Scan spells through the teaching items that grant them. Duplicate teaching
/// routes collapse to the first book seen per spell; books imply player
/// relevance, so the full scan's heuristic filters do not apply here.
pub fn scan_tomes(catalog: &dyn Catalog, config: &ScanConfig) -> ScanOutcome {
    info!(total = catalog.books().len(), "starting spell tome scan");
    let mut stats = ScanStats::default();
    let mut seen: HashSet<FormId, FormIdHasher> = HashSet::default();
    let mut records = Vec::new();

    for book in catalog.books() {
        let Some(taught) = book.teaches else { continue };
        let Some(FormRef::Spell(spell)) = catalog.form_by_id(taught) else {
            continue;
        };
        if !seen.insert(spell.form_id) {
            stats.duplicates += 1;
            continue;
        }
        if sanitize_text(&spell.name).is_empty() {
            stats.skipped += 1;
            continue;
        }
        let (school, _) = primary_school(spell);
        if school.is_none() {
            stats.skipped += 1;
            continue;
        }
        records.push(spell_record(catalog, spell, &config.fields, Some(book)));
        stats.kept += 1;
    }

    info!(
        kept = stats.kept,
        duplicates = stats.duplicates,
        "tome scan complete"
    );

    let document = ScanDocument {
        scan_timestamp: scan_timestamp(),
        scan_mode: Some(String::from("spell_tomes")),
        spell_count: records.len(),
        spells: records,
        llm_prompt: llm_prompt(&config.tree_rules_prompt),
    };
    ScanOutcome { document, stats }
}

// ------------- Detail lookup -------------

/// Parse a form id from hex input, with or without a 0x prefix, case
/// insensitively. Anything beyond 8 digits is truncated with a warning; a
/// non-hex character is a hard input-format error.
pub fn parse_form_id(input: &str) -> Result<FormId> {
    let stripped = input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
        .unwrap_or(input);
    let digits: String = if stripped.chars().count() > 8 {
        warn!(input, "form id longer than 8 digits, truncating");
        stripped.chars().take(8).collect()
    } else {
        stripped.to_owned()
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(SpellscanError::Identifier {
            input: input.to_owned(),
            message: String::from("expected hex digits"),
        });
    }
    FormId::from_str_radix(&digits, 16).map_err(|e| SpellscanError::Identifier {
        input: input.to_owned(),
        message: e.to_string(),
    })
}

fn resolve_spell(catalog: &dyn Catalog, form_id: FormId) -> Result<&Spell> {
    match catalog.form_by_id(form_id) {
        Some(FormRef::Spell(spell)) => Ok(spell),
        Some(_) => Err(SpellscanError::WrongKind(form_id)),
        None => Err(SpellscanError::NotFound(form_id)),
    }
}

/// Resolve one spell and emit its enriched detail record as compact JSON.
/// All failure paths degrade to an empty string; nothing propagates.
pub fn spell_info(
    catalog: &dyn Catalog,
    weakening: &dyn Effectiveness,
    form_id_input: &str,
) -> String {
    let form_id = match parse_form_id(form_id_input) {
        Ok(id) => id,
        Err(e) => {
            error!(error = %e, "invalid form id in detail lookup");
            return String::new();
        }
    };

    let spell = match resolve_spell(catalog, form_id) {
        Ok(spell) => spell,
        Err(e) => {
            warn!(error = %e, "detail lookup failed");
            return String::new();
        }
    };

    let mut record = Record::new();
    // The caller's identifier is echoed back unchanged.
    record.insert("formId".into(), Value::from(form_id_input));
    record.insert("name".into(), Value::from(sanitize_text(&spell.name)));
    record.insert(
        "editorId".into(),
        Value::from(spell.editor_id.as_deref().unwrap_or("")),
    );

    let (school, minimum_skill) = primary_school(spell);
    let level = skill_level_name(minimum_skill);
    record.insert("school".into(), Value::from(school_name(school)));
    record.insert("level".into(), Value::from(level));
    record.insert("skillLevel".into(), Value::from(level)); // alias
    record.insert("minimumSkill".into(), Value::from(minimum_skill));

    record.insert("cost".into(), Value::from(spell.magicka_cost));
    record.insert("magickaCost".into(), Value::from(spell.magicka_cost)); // alias

    record.insert("type".into(), Value::from(spell.casting_type.name()));
    record.insert("castingType".into(), Value::from(spell.casting_type.name())); // alias

    record.insert("delivery".into(), Value::from(spell.delivery.name()));
    record.insert("chargeTime".into(), Value::from(spell.charge_time));
    record.insert("plugin".into(), Value::from(plugin_name(catalog, form_id)));

    let mut effects = Vec::new();
    let mut effect_names = Vec::new();
    let mut description = String::new();
    for effect in &spell.effects {
        effect_names.push(Value::from(sanitize_text(&effect.name)));
        let entry = effect_record(effect);
        // The first effect's description doubles as the spell description.
        if description.is_empty() {
            if let Some(Value::String(text)) = entry.get("description") {
                description = text.clone();
            }
        }
        effects.push(Value::Object(entry));
    }
    record.insert("effects".into(), Value::Array(effects));
    record.insert("effectNames".into(), Value::Array(effect_names));
    record.insert("description".into(), Value::from(description));

    if weakening.is_early_learned(form_id) {
        let ratio = weakening.effectiveness(form_id);
        record.insert("isWeakened".into(), Value::from(true));
        record.insert("effectiveness".into(), Value::from((ratio * 100.0) as i64));
        let scaled: Vec<Value> = spell
            .effects
            .iter()
            .map(|effect| {
                let mut entry = Record::new();
                entry.insert("name".into(), Value::from(sanitize_text(&effect.name)));
                entry.insert("originalMagnitude".into(), Value::from(effect.magnitude));
                entry.insert(
                    "scaledMagnitude".into(),
                    Value::from((effect.magnitude * ratio) as i64),
                );
                entry.insert("duration".into(), Value::from(effect.duration));
                Value::Object(entry)
            })
            .collect();
        record.insert("scaledEffects".into(), Value::Array(scaled));
    } else {
        record.insert("isWeakened".into(), Value::from(false));
        record.insert("effectiveness".into(), Value::from(100));
    }

    serde_json::to_string(&record).unwrap_or_else(|e| {
        error!(error = %e, "failed to serialize spell info");
        String::new()
    })
}
