use std::sync::Arc;

use serde_json::Value;
use spellscan::catalog::{
    Book, CastingType, Delivery, Effect, InMemoryCatalog, School, Spell, SpellKind,
};
use spellscan::interface::ScannerService;
use spellscan::scan::{parse_form_id, spell_info, ScanPolicy};
use spellscan::weakening::{NoWeakening, WeakeningTable};

fn catalog_with_firebolt() -> InMemoryCatalog {
    let mut catalog = InMemoryCatalog::new();
    catalog.register_plugin(0x00, "Skyrim.esm");
    catalog.add_spell(Spell {
        form_id: 0x12FCD,
        editor_id: Some(String::from("Firebolt")),
        name: b"Firebolt".to_vec(),
        kind: SpellKind::Spell,
        casting_type: CastingType::FireAndForget,
        delivery: Delivery::Aimed,
        charge_time: 0.5,
        magicka_cost: 41.0,
        effects: vec![Effect {
            name: b"Fire Damage".to_vec(),
            magnitude: 40.0,
            duration: 1,
            area: 0,
            description: b"Burns the target.".to_vec(),
            school: Some(School::Destruction),
            minimum_skill: 25,
        }],
        keywords: None,
    });
    catalog.add_book(Book {
        form_id: 0x2000,
        name: b"Tome: Firebolt".to_vec(),
        teaches: Some(0x12FCD),
    });
    catalog
}

fn lookup(form_id: &str) -> Value {
    let catalog = catalog_with_firebolt();
    let raw = spell_info(&catalog, &NoWeakening, form_id);
    assert!(!raw.is_empty(), "lookup of {form_id} unexpectedly empty");
    serde_json::from_str(&raw).expect("valid detail json")
}

#[test]
fn parser_round_trips_rendered_form_ids() {
    assert_eq!(parse_form_id("0x00012FCD").expect("parse"), 0x12FCD);
    assert_eq!(parse_form_id("00012FCD").expect("parse"), 0x12FCD);
    assert_eq!(parse_form_id("0X00012fcd").expect("parse"), 0x12FCD);
    assert_eq!(parse_form_id("12fcd").expect("parse"), 0x12FCD);
}

#[test]
fn overlong_input_is_truncated() {
    // first eight digits survive, the tail is dropped
    assert_eq!(parse_form_id("0x00012FCD99").expect("parse"), 0x00012FCD);
}

#[test]
fn invalid_characters_are_an_error() {
    assert!(parse_form_id("zz1234").is_err());
    assert!(parse_form_id("").is_err());
    assert!(parse_form_id("0x").is_err());
}

#[test]
fn detail_document_carries_aliases() {
    let detail = lookup("0x00012FCD");
    assert_eq!(detail["formId"], "0x00012FCD");
    assert_eq!(detail["name"], "Firebolt");
    assert_eq!(detail["editorId"], "Firebolt");
    assert_eq!(detail["school"], "Destruction");
    assert_eq!(detail["level"], detail["skillLevel"]);
    assert_eq!(detail["skillLevel"], "Apprentice");
    assert_eq!(detail["minimumSkill"], 25);
    assert_eq!(detail["cost"], detail["magickaCost"]);
    assert_eq!(detail["type"], detail["castingType"]);
    assert_eq!(detail["castingType"], "Fire and Forget");
    assert_eq!(detail["delivery"], "Aimed");
    assert_eq!(detail["plugin"], "Skyrim.esm");
    assert_eq!(detail["description"], "Burns the target.");
    assert_eq!(detail["effectNames"][0], "Fire Damage");
    assert_eq!(detail["effects"][0]["magnitude"], 40.0);
}

#[test]
fn unweakened_spells_report_full_effectiveness() {
    let detail = lookup("12FCD");
    assert_eq!(detail["isWeakened"], false);
    assert_eq!(detail["effectiveness"], 100);
    assert!(detail.get("scaledEffects").is_none());
}

#[test]
fn early_learned_spells_get_scaled_effects() {
    let catalog = catalog_with_firebolt();
    let mut weakening = WeakeningTable::new();
    weakening.set(0x12FCD, 0.5);

    let raw = spell_info(&catalog, &weakening, "0x00012FCD");
    let detail: Value = serde_json::from_str(&raw).expect("valid detail json");
    assert_eq!(detail["isWeakened"], true);
    assert_eq!(detail["effectiveness"], 50);
    let scaled = &detail["scaledEffects"][0];
    assert_eq!(scaled["name"], "Fire Damage");
    assert_eq!(scaled["originalMagnitude"], 40.0);
    assert_eq!(scaled["scaledMagnitude"], 20);
    assert_eq!(scaled["duration"], 1);
}

#[test]
fn failures_surface_as_empty_strings() {
    let catalog = catalog_with_firebolt();
    // malformed identifier
    assert_eq!(spell_info(&catalog, &NoWeakening, "zz1234"), "");
    // nothing at this id
    assert_eq!(spell_info(&catalog, &NoWeakening, "0x00099999"), "");
    // a book is the wrong kind of form
    assert_eq!(spell_info(&catalog, &NoWeakening, "0x00002000"), "");
}

#[test]
fn service_wires_catalog_and_weakening_together() {
    let mut weakening = WeakeningTable::new();
    weakening.set(0x12FCD, 0.5);
    let service = ScannerService::new(
        Arc::new(catalog_with_firebolt()),
        Arc::new(weakening),
        ScanPolicy::default(),
    );

    let detail: Value =
        serde_json::from_str(&service.spell_info("0x00012FCD")).expect("valid detail json");
    assert_eq!(detail["effectiveness"], 50);

    let scan: Value = serde_json::from_str(&service.scan_all("")).expect("valid scan json");
    assert_eq!(scan["spellCount"], 1);
    let tomes: Value = serde_json::from_str(&service.scan_tomes("")).expect("valid scan json");
    assert_eq!(tomes["scanMode"], "spell_tomes");
}
