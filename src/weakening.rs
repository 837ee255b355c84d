//! The early-learned effectiveness collaborator.
//!
//! Whether a spell counts as learned earlier than intended, and how much its
//! magnitudes are scaled down for it, is decided outside this crate. The core
//! only ever asks the two questions below, so the dependency is an injected
//! capability that tests can swap for a fake.

use std::collections::HashMap;

use crate::catalog::{FormId, FormIdHasher};

pub trait Effectiveness {
    fn is_early_learned(&self, form_id: FormId) -> bool;
    /// Current effectiveness ratio in [0, 1]. Only meaningful for forms that
    /// are early-learned.
    fn effectiveness(&self, form_id: FormId) -> f32;
}

/// No spell is ever weakened. Used when no effectiveness data is wired in.
#[derive(Debug, Default)]
pub struct NoWeakening;

impl Effectiveness for NoWeakening {
    fn is_early_learned(&self, _form_id: FormId) -> bool {
        false
    }
    fn effectiveness(&self, _form_id: FormId) -> f32 {
        1.0
    }
}

/// Fixed per-form ratios, typically loaded from a catalog snapshot.
#[derive(Debug, Default)]
pub struct WeakeningTable {
    ratios: HashMap<FormId, f32, FormIdHasher>,
}

impl WeakeningTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, form_id: FormId, ratio: f32) {
        self.ratios.insert(form_id, ratio);
    }

    /// Build from the snapshot's `earlyLearned` map, whose keys are form ids
    /// rendered in hex. Unparseable keys are dropped.
    pub fn from_entries<'a>(entries: impl IntoIterator<Item = (&'a str, f32)>) -> Self {
        let mut table = Self::new();
        for (key, ratio) in entries {
            let digits = key
                .strip_prefix("0x")
                .or_else(|| key.strip_prefix("0X"))
                .unwrap_or(key);
            if let Ok(form_id) = FormId::from_str_radix(digits, 16) {
                table.set(form_id, ratio);
            }
        }
        table
    }
}

impl Effectiveness for WeakeningTable {
    fn is_early_learned(&self, form_id: FormId) -> bool {
        self.ratios.contains_key(&form_id)
    }
    fn effectiveness(&self, form_id: FormId) -> f32 {
        self.ratios.get(&form_id).copied().unwrap_or(1.0)
    }
}
