use spellscan::catalog::{
    CastingType, Delivery, Effect, InMemoryCatalog, School, Spell, SpellKind,
};
use spellscan::fields::FieldConfig;
use spellscan::record::{format_form_id, plugin_name, skill_level_name, spell_record};

fn effect(name: &str, school: Option<School>, minimum_skill: u32) -> Effect {
    Effect {
        name: name.as_bytes().to_vec(),
        magnitude: 25.0,
        duration: 5,
        area: 0,
        description: Vec::new(),
        school,
        minimum_skill,
    }
}

fn spell(form_id: u32, editor_id: &str, name: &str) -> Spell {
    Spell {
        form_id,
        editor_id: Some(editor_id.to_owned()),
        name: name.as_bytes().to_vec(),
        kind: SpellKind::Spell,
        casting_type: CastingType::FireAndForget,
        delivery: Delivery::Aimed,
        charge_time: 0.5,
        magicka_cost: 41.0,
        effects: vec![effect("Frost Damage", Some(School::Destruction), 25)],
        keywords: None,
    }
}

#[test]
fn skill_level_boundaries() {
    let expected = [
        (0, "Novice"),
        (24, "Novice"),
        (25, "Apprentice"),
        (49, "Apprentice"),
        (50, "Adept"),
        (74, "Adept"),
        (75, "Expert"),
        (99, "Expert"),
        (100, "Master"),
        (500, "Master"),
    ];
    for (skill, label) in expected {
        assert_eq!(skill_level_name(skill), label, "minimum skill {skill}");
    }
}

#[test]
fn form_id_renders_padded_uppercase() {
    assert_eq!(format_form_id(0x12FCD), "0x00012FCD");
    assert_eq!(format_form_id(0xFE00_1234), "0xFE001234");
}

#[test]
fn essential_fields_always_present() {
    let catalog = InMemoryCatalog::new();
    let fields = FieldConfig {
        editor_id: false,
        magicka_cost: false,
        ..FieldConfig::default()
    };
    let record = spell_record(&catalog, &spell(0x12FCD, "Frostbite", "Frostbite"), &fields, None);
    assert_eq!(record["formId"], "0x00012FCD");
    assert_eq!(record["name"], "Frostbite");
    assert_eq!(record["school"], "Destruction");
    assert_eq!(record["skillLevel"], "Apprentice");
    assert!(!record.contains_key("editorId"));
    assert!(!record.contains_key("magickaCost"));
}

#[test]
fn school_unknown_without_effects() {
    let catalog = InMemoryCatalog::new();
    let mut s = spell(0x100, "OddOne", "Odd One");
    s.effects.clear();
    let record = spell_record(&catalog, &s, &FieldConfig::default(), None);
    assert_eq!(record["school"], "Unknown");
    assert_eq!(record["skillLevel"], "Novice");
}

#[test]
fn optional_fields_follow_configuration() {
    let mut catalog = InMemoryCatalog::new();
    catalog.register_plugin(0x00, "Skyrim.esm");
    let fields = FieldConfig {
        minimum_skill: true,
        casting_type: true,
        delivery: true,
        charge_time: true,
        plugin: true,
        ..FieldConfig::default()
    };
    let record = spell_record(&catalog, &spell(0x12FCD, "Frostbite", "Frostbite"), &fields, None);
    assert_eq!(record["editorId"], "Frostbite");
    assert_eq!(record["magickaCost"], 41.0);
    assert_eq!(record["minimumSkill"], 25);
    assert_eq!(record["castingType"], "Fire and Forget");
    assert_eq!(record["delivery"], "Aimed");
    assert_eq!(record["chargeTime"], 0.5);
    assert_eq!(record["plugin"], "Skyrim.esm");
}

#[test]
fn plugin_resolution_regular_light_and_unknown() {
    let mut catalog = InMemoryCatalog::new();
    catalog.register_plugin(0x05, "Dawnguard.esm");
    catalog.register_light_plugin(0x123, "SmallMod.esl");

    assert_eq!(plugin_name(&catalog, 0x0500_0001), "Dawnguard.esm");
    // high byte 0xFE routes through the 12-bit light index
    assert_eq!(plugin_name(&catalog, 0xFE12_3456), "SmallMod.esl");
    assert_eq!(plugin_name(&catalog, 0x7700_0001), "Unknown");
}

#[test]
fn full_effects_take_precedence_over_names() {
    let catalog = InMemoryCatalog::new();
    let mut s = spell(0x200, "IceSpike", "Ice Spike");
    s.effects[0].description = b"Deals frost damage.".to_vec();
    let fields = FieldConfig {
        effects: true,
        effect_names: true,
        ..FieldConfig::default()
    };
    let record = spell_record(&catalog, &s, &fields, None);
    assert!(record.contains_key("effects"));
    assert!(!record.contains_key("effectNames"));
    let effects = record["effects"].as_array().expect("effects array");
    assert_eq!(effects[0]["name"], "Frost Damage");
    assert_eq!(effects[0]["magnitude"], 25.0);
    assert_eq!(effects[0]["duration"], 5);
    assert_eq!(effects[0]["area"], 0);
    assert_eq!(effects[0]["description"], "Deals frost damage.");
}

#[test]
fn empty_descriptions_are_omitted() {
    let catalog = InMemoryCatalog::new();
    let fields = FieldConfig {
        effects: true,
        ..FieldConfig::default()
    };
    let record = spell_record(&catalog, &spell(0x201, "IceSpike", "Ice Spike"), &fields, None);
    let effects = record["effects"].as_array().expect("effects array");
    assert!(effects[0].get("description").is_none());
}

#[test]
fn effect_names_flag_emits_flat_list() {
    let catalog = InMemoryCatalog::new();
    let mut s = spell(0x202, "IceStorm", "Ice Storm");
    s.effects.push(effect("Slow", Some(School::Alteration), 50));
    let fields = FieldConfig {
        effect_names: true,
        ..FieldConfig::default()
    };
    let record = spell_record(&catalog, &s, &fields, None);
    let names = record["effectNames"].as_array().expect("name list");
    assert_eq!(names.len(), 2);
    assert_eq!(names[0], "Frost Damage");
    assert_eq!(names[1], "Slow");
}

#[test]
fn keywords_skip_empty_entries() {
    let catalog = InMemoryCatalog::new();
    let mut s = spell(0x203, "Frostbite", "Frostbite");
    s.keywords = Some(vec![
        String::from("MagicDamageFrost"),
        String::new(),
        String::from("MagicHands"),
    ]);
    let fields = FieldConfig {
        keywords: true,
        ..FieldConfig::default()
    };
    let record = spell_record(&catalog, &s, &fields, None);
    let keywords = record["keywords"].as_array().expect("keyword list");
    assert_eq!(keywords.len(), 2);

    // no keyword list on the entity means no keywords field at all
    let bare = spell(0x204, "Frostbite2", "Frostbite");
    let record = spell_record(&catalog, &bare, &fields, None);
    assert!(!record.contains_key("keywords"));
}

#[test]
fn corrupted_names_are_sanitized() {
    let catalog = InMemoryCatalog::new();
    let mut s = spell(0x205, "OblivionsEmbrace", "placeholder");
    s.name = vec![b'O', b'b', b'l', b'i', b'v', b'i', b'o', b'n', 0x92, b's'];
    let record = spell_record(&catalog, &s, &FieldConfig::default(), None);
    assert_eq!(record["name"], "Oblivion's");
}
