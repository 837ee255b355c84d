//! The host catalog: entities the scanner reads, and the lookup services it
//! consumes. The core never mutates catalog entities and never retains them
//! beyond a single call; everything here is handed out as borrowed references.
//!
//! `InMemoryCatalog` is the provided implementation, loadable from a serde
//! snapshot so the binary and the tests can stand in for a live host.

use std::collections::HashMap;
use std::hash::BuildHasherDefault;

use seahash::SeaHasher;
use serde::{Deserialize, Serialize};

use crate::error::Result;

// ------------- FormId -------------
/// Stable 32-bit entity identifier. The high byte encodes the contributing
/// plugin; 0xFE marks a light plugin addressed by a 12-bit sub-index.
pub type FormId = u32;

pub type FormIdHasher = BuildHasherDefault<SeaHasher>;

pub const LIGHT_PLUGIN_MARKER: u8 = 0xFE;

// ------------- School -------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum School {
    Alteration,
    Conjuration,
    Destruction,
    Illusion,
    Restoration,
}

impl School {
    pub fn name(&self) -> &'static str {
        match self {
            School::Alteration => "Alteration",
            School::Conjuration => "Conjuration",
            School::Destruction => "Destruction",
            School::Illusion => "Illusion",
            School::Restoration => "Restoration",
        }
    }
}

// ------------- CastingType -------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CastingType {
    ConstantEffect,
    FireAndForget,
    Concentration,
    Scroll,
}

impl CastingType {
    pub fn name(&self) -> &'static str {
        match self {
            CastingType::ConstantEffect => "Constant Effect",
            CastingType::FireAndForget => "Fire and Forget",
            CastingType::Concentration => "Concentration",
            CastingType::Scroll => "Scroll",
        }
    }
}

// ------------- Delivery -------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Delivery {
    OnSelf,
    Touch,
    Aimed,
    TargetActor,
    TargetLocation,
}

impl Delivery {
    pub fn name(&self) -> &'static str {
        match self {
            Delivery::OnSelf => "Self",
            Delivery::Touch => "Touch",
            Delivery::Aimed => "Aimed",
            Delivery::TargetActor => "Target Actor",
            Delivery::TargetLocation => "Target Location",
        }
    }
}

// ------------- SpellKind -------------
/// The host distinguishes several spell-like entity kinds; only `Spell` is
/// player-castable in the sense the scanner cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SpellKind {
    Spell,
    Ability,
    Power,
    LesserPower,
    Disease,
    Voice,
}

// ------------- Effect -------------
/// One effect of a spell. Name and description arrive as raw bytes because
/// upstream text may carry legacy-encoding corruption; the school and minimum
/// skill live on the effect, not the spell.
#[derive(Debug, Clone)]
pub struct Effect {
    pub name: Vec<u8>,
    pub magnitude: f32,
    pub duration: u32,
    pub area: u32,
    pub description: Vec<u8>,
    pub school: Option<School>,
    pub minimum_skill: u32,
}

// ------------- Spell -------------
#[derive(Debug, Clone)]
pub struct Spell {
    pub form_id: FormId,
    pub editor_id: Option<String>,
    pub name: Vec<u8>,
    pub kind: SpellKind,
    pub casting_type: CastingType,
    pub delivery: Delivery,
    pub charge_time: f32,
    pub magicka_cost: f32,
    pub effects: Vec<Effect>,
    pub keywords: Option<Vec<String>>,
}

// ------------- Book -------------
/// A teaching item. At most one taught spell; several books may teach the
/// same one.
#[derive(Debug, Clone)]
pub struct Book {
    pub form_id: FormId,
    pub name: Vec<u8>,
    pub teaches: Option<FormId>,
}

/// A form resolved by id, of whichever kind the catalog holds at that id.
#[derive(Debug, Clone, Copy)]
pub enum FormRef<'a> {
    Spell(&'a Spell),
    Book(&'a Book),
}

// ------------- Catalog -------------
/// What the scanner needs from the host: enumerate by kind, look up by id,
/// and resolve plugin names from mod indexes.
pub trait Catalog {
    fn spells(&self) -> &[Spell];
    fn books(&self) -> &[Book];
    fn form_by_id(&self, form_id: FormId) -> Option<FormRef<'_>>;
    fn plugin_by_index(&self, index: u8) -> Option<&str>;
    fn light_plugin_by_index(&self, index: u16) -> Option<&str>;
}

#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    spells: Vec<Spell>,
    books: Vec<Book>,
    spell_index: HashMap<FormId, usize, FormIdHasher>,
    book_index: HashMap<FormId, usize, FormIdHasher>,
    plugins: HashMap<u8, String>,
    light_plugins: HashMap<u16, String>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_spell(&mut self, spell: Spell) {
        self.spell_index.insert(spell.form_id, self.spells.len());
        self.spells.push(spell);
    }

    pub fn add_book(&mut self, book: Book) {
        self.book_index.insert(book.form_id, self.books.len());
        self.books.push(book);
    }

    pub fn register_plugin(&mut self, index: u8, name: impl Into<String>) {
        self.plugins.insert(index, name.into());
    }

    pub fn register_light_plugin(&mut self, index: u16, name: impl Into<String>) {
        self.light_plugins.insert(index, name.into());
    }
}

impl Catalog for InMemoryCatalog {
    fn spells(&self) -> &[Spell] {
        &self.spells
    }
    fn books(&self) -> &[Book] {
        &self.books
    }
    fn form_by_id(&self, form_id: FormId) -> Option<FormRef<'_>> {
        if let Some(&i) = self.spell_index.get(&form_id) {
            return Some(FormRef::Spell(&self.spells[i]));
        }
        if let Some(&i) = self.book_index.get(&form_id) {
            return Some(FormRef::Book(&self.books[i]));
        }
        None
    }
    fn plugin_by_index(&self, index: u8) -> Option<&str> {
        self.plugins.get(&index).map(String::as_str)
    }
    fn light_plugin_by_index(&self, index: u16) -> Option<&str> {
        self.light_plugins.get(&index).map(String::as_str)
    }
}

// ------------- Snapshots -------------
// Serde-friendly mirror of the catalog, with text as strings. Conversion to
// the byte-carrying runtime types happens on load.

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectSnapshot {
    pub name: String,
    #[serde(default)]
    pub magnitude: f32,
    #[serde(default)]
    pub duration: u32,
    #[serde(default)]
    pub area: u32,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub school: Option<School>,
    #[serde(default)]
    pub minimum_skill: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpellSnapshot {
    pub form_id: FormId,
    #[serde(default)]
    pub editor_id: Option<String>,
    pub name: String,
    pub kind: SpellKind,
    pub casting_type: CastingType,
    pub delivery: Delivery,
    #[serde(default)]
    pub charge_time: f32,
    #[serde(default)]
    pub magicka_cost: f32,
    #[serde(default)]
    pub effects: Vec<EffectSnapshot>,
    #[serde(default)]
    pub keywords: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookSnapshot {
    pub form_id: FormId,
    pub name: String,
    #[serde(default)]
    pub teaches: Option<FormId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginSnapshot {
    pub index: u16,
    #[serde(default)]
    pub light: bool,
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogSnapshot {
    #[serde(default)]
    pub spells: Vec<SpellSnapshot>,
    #[serde(default)]
    pub books: Vec<BookSnapshot>,
    #[serde(default)]
    pub plugins: Vec<PluginSnapshot>,
    /// Early-learned spells and their effectiveness ratios, consumed by the
    /// weakening collaborator rather than the catalog itself.
    #[serde(default)]
    pub early_learned: HashMap<String, f32>,
}

impl From<EffectSnapshot> for Effect {
    fn from(s: EffectSnapshot) -> Self {
        Self {
            name: s.name.into_bytes(),
            magnitude: s.magnitude,
            duration: s.duration,
            area: s.area,
            description: s.description.into_bytes(),
            school: s.school,
            minimum_skill: s.minimum_skill,
        }
    }
}

impl From<SpellSnapshot> for Spell {
    fn from(s: SpellSnapshot) -> Self {
        Self {
            form_id: s.form_id,
            editor_id: s.editor_id,
            name: s.name.into_bytes(),
            kind: s.kind,
            casting_type: s.casting_type,
            delivery: s.delivery,
            charge_time: s.charge_time,
            magicka_cost: s.magicka_cost,
            effects: s.effects.into_iter().map(Effect::from).collect(),
            keywords: s.keywords,
        }
    }
}

impl From<BookSnapshot> for Book {
    fn from(s: BookSnapshot) -> Self {
        Self {
            form_id: s.form_id,
            name: s.name.into_bytes(),
            teaches: s.teaches,
        }
    }
}

impl InMemoryCatalog {
    pub fn from_snapshot(snapshot: CatalogSnapshot) -> Self {
        let mut catalog = Self::new();
        for spell in snapshot.spells {
            catalog.add_spell(spell.into());
        }
        for book in snapshot.books {
            catalog.add_book(book.into());
        }
        for plugin in snapshot.plugins {
            if plugin.light {
                catalog.register_light_plugin(plugin.index & 0xFFF, plugin.name);
            } else {
                catalog.register_plugin((plugin.index & 0xFF) as u8, plugin.name);
            }
        }
        catalog
    }
}

impl CatalogSnapshot {
    pub fn from_json(document: &str) -> Result<Self> {
        Ok(serde_json::from_str(document)?)
    }
}
