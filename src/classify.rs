//! Heuristic classification of editor ids into player-relevant and not.
//!
//! The host data carries no reliable "is player-learnable" flag, so exclusion
//! is decided by an ordered list of substring and prefix rules over the
//! internal identifier. False positives and negatives are an accepted
//! tradeoff. Rules are data (a reason paired with a predicate) so new ones can
//! be added without touching any call site.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // quest spells follow an MG<two digits> naming scheme
    static ref MG_QUEST: Regex = Regex::new(r"^mg[0-9]{2}").unwrap();
}

/// One exclusion rule. Predicates receive the lowercased editor id.
pub struct Rule {
    pub reason: &'static str,
    pub matches: fn(&str) -> bool,
}

/// Ordered exclusion rules; the first match wins.
pub const RULES: &[Rule] = &[
    Rule { reason: "trap", matches: |id| id.contains("trap") },
    Rule { reason: "creature ability", matches: |id| id.starts_with("cr") },
    Rule { reason: "altar blessing", matches: |id| id.contains("altar") },
    Rule { reason: "shrine blessing", matches: |id| id.contains("shrine") },
    Rule { reason: "blessing spell", matches: |id| id.contains("blessing") && id.contains("spell") },
    Rule { reason: "dungeon spell", matches: |id| id.starts_with("dun") },
    Rule { reason: "perk spell", matches: |id| id.starts_with("perk") },
    Rule { reason: "hazard", matches: |id| id.contains("hazard") },
    Rule { reason: "npc power", matches: |id| id.starts_with("power") },
    Rule { reason: "test spell", matches: |id| id.starts_with("test") },
    Rule { reason: "college quest spell", matches: |id| MG_QUEST.is_match(id) },
    Rule { reason: "mgr spell", matches: |id| id.starts_with("mgr") },
    Rule { reason: "shout variant", matches: |id| id.contains("voice") },
    Rule { reason: "pet teleport", matches: |id| id.contains("teleport") && id.contains("pet") },
    Rule { reason: "left hand variant", matches: |id| id.contains("lefthand") },
    Rule { reason: "right hand variant", matches: |id| id.contains("righthand") },
    Rule { reason: "copy variant", matches: |id| id.contains("copy") },
];

/// Why an editor id is excluded from player-facing output, if it is.
pub fn non_player_reason(editor_id: &str) -> Option<&'static str> {
    let lowered = editor_id.to_lowercase();
    RULES
        .iter()
        .find(|rule| (rule.matches)(&lowered))
        .map(|rule| rule.reason)
}

pub fn is_non_player_spell(editor_id: &str) -> bool {
    non_player_reason(editor_id).is_some()
}
