//! Projection of one catalog spell into one output record.
//!
//! Records are ordered maps: the four essential fields always lead, tome
//! fields (when scanning via books) follow directly, and optional fields are
//! appended per [`FieldConfig`]. All three entry points (full scan, tome scan,
//! detail lookup) share the helpers here so field logic lives in one place.

use serde_json::{json, Map, Value};

use crate::catalog::{Book, Catalog, Effect, FormId, School, Spell, LIGHT_PLUGIN_MARKER};
use crate::encoding::sanitize_text;
use crate::fields::FieldConfig;

pub type Record = Map<String, Value>;

/// `0x` + 8 uppercase hex digits, zero-padded.
pub fn format_form_id(form_id: FormId) -> String {
    format!("0x{form_id:08X}")
}

pub fn school_name(school: Option<School>) -> &'static str {
    school.map(|s| s.name()).unwrap_or("Unknown")
}

pub fn skill_level_name(minimum_skill: u32) -> &'static str {
    match minimum_skill {
        0..=24 => "Novice",
        25..=49 => "Apprentice",
        50..=74 => "Adept",
        75..=99 => "Expert",
        _ => "Master",
    }
}

/// Resolve the owning plugin of a form through the catalog's mod-index
/// lookups. A high byte of 0xFE routes through the 12-bit light-plugin index.
pub fn plugin_name(catalog: &dyn Catalog, form_id: FormId) -> String {
    let mod_index = (form_id >> 24) as u8;
    let resolved = if mod_index == LIGHT_PLUGIN_MARKER {
        let light_index = ((form_id >> 12) & 0xFFF) as u16;
        catalog.light_plugin_by_index(light_index)
    } else {
        catalog.plugin_by_index(mod_index)
    };
    resolved.map(str::to_owned).unwrap_or_else(|| String::from("Unknown"))
}

/// School and minimum skill are taken from the first effect only; a spell
/// without effects resolves to no school.
pub fn primary_school(spell: &Spell) -> (Option<School>, u32) {
    match spell.effects.first() {
        Some(effect) => (effect.school, effect.minimum_skill),
        None => (None, 0),
    }
}

pub fn effect_record(effect: &Effect) -> Record {
    let mut record = Record::new();
    record.insert("name".into(), json!(sanitize_text(&effect.name)));
    record.insert("magnitude".into(), json!(effect.magnitude));
    record.insert("duration".into(), json!(effect.duration));
    record.insert("area".into(), json!(effect.area));
    if !effect.description.is_empty() {
        record.insert("description".into(), json!(sanitize_text(&effect.description)));
    }
    record
}

/// Build the record for one kept spell. `tome` adds the two teaching-item
/// fields directly after the essential ones.
pub fn spell_record(
    catalog: &dyn Catalog,
    spell: &Spell,
    fields: &FieldConfig,
    tome: Option<&Book>,
) -> Record {
    let (school, minimum_skill) = primary_school(spell);
    let mut record = Record::new();

    // Essential fields, regardless of configuration.
    record.insert("formId".into(), json!(format_form_id(spell.form_id)));
    record.insert("name".into(), json!(sanitize_text(&spell.name)));
    record.insert("school".into(), json!(school_name(school)));
    record.insert("skillLevel".into(), json!(skill_level_name(minimum_skill)));

    if let Some(book) = tome {
        record.insert("tomeFormId".into(), json!(format_form_id(book.form_id)));
        record.insert("tomeName".into(), json!(sanitize_text(&book.name)));
    }

    if fields.editor_id {
        if let Some(editor_id) = spell.editor_id.as_deref().filter(|id| !id.is_empty()) {
            record.insert("editorId".into(), json!(editor_id));
        }
    }
    if fields.magicka_cost {
        record.insert("magickaCost".into(), json!(spell.magicka_cost));
    }
    if fields.minimum_skill {
        record.insert("minimumSkill".into(), json!(minimum_skill));
    }
    if fields.casting_type {
        record.insert("castingType".into(), json!(spell.casting_type.name()));
    }
    if fields.delivery {
        record.insert("delivery".into(), json!(spell.delivery.name()));
    }
    if fields.charge_time {
        record.insert("chargeTime".into(), json!(spell.charge_time));
    }
    if fields.plugin {
        record.insert("plugin".into(), json!(plugin_name(catalog, spell.form_id)));
    }

    // Full effect records take precedence over the flat name list.
    if fields.effects {
        let effects: Vec<Value> = spell
            .effects
            .iter()
            .map(|effect| Value::Object(effect_record(effect)))
            .collect();
        record.insert("effects".into(), Value::Array(effects));
    } else if fields.effect_names {
        let names: Vec<Value> = spell
            .effects
            .iter()
            .map(|effect| json!(sanitize_text(&effect.name)))
            .collect();
        record.insert("effectNames".into(), Value::Array(names));
    }

    if fields.keywords {
        if let Some(keywords) = &spell.keywords {
            let kept: Vec<Value> = keywords
                .iter()
                .filter(|keyword| !keyword.is_empty())
                .map(|keyword| json!(keyword))
                .collect();
            record.insert("keywords".into(), Value::Array(kept));
        }
    }

    record
}
