//! Text-in/text-out surface over the scanner.
//!
//! `ScannerService` wires a catalog and an effectiveness collaborator together
//! and exposes the public operations exactly as the host calls them:
//! configuration documents come in as strings, finished JSON blobs go out as
//! strings. All four operations run synchronously on the calling thread and
//! share no mutable state, so a service can be called concurrently.

use std::sync::Arc;

use crate::catalog::Catalog;
use crate::fields::{FieldConfig, ScanConfig};
use crate::scan::{self, ScanOutcome, ScanPolicy};
use crate::weakening::Effectiveness;

pub struct ScannerService {
    catalog: Arc<dyn Catalog + Send + Sync>,
    weakening: Arc<dyn Effectiveness + Send + Sync>,
    policy: ScanPolicy,
}

impl ScannerService {
    pub fn new(
        catalog: Arc<dyn Catalog + Send + Sync>,
        weakening: Arc<dyn Effectiveness + Send + Sync>,
        policy: ScanPolicy,
    ) -> Self {
        Self {
            catalog,
            weakening,
            policy,
        }
    }

    /// Full scan; `config_document` is the combined fields + tree-rules form.
    pub fn scan_all(&self, config_document: &str) -> String {
        let config = ScanConfig::parse(config_document);
        self.run_full(&config).document.to_json()
    }

    /// Full scan with the legacy fields-only configuration form.
    pub fn scan_all_with_fields(&self, fields_document: &str) -> String {
        let config = ScanConfig::from_fields(FieldConfig::parse(fields_document));
        self.run_full(&config).document.to_json()
    }

    /// Deduplicated scan through teaching items.
    pub fn scan_tomes(&self, config_document: &str) -> String {
        let config = ScanConfig::parse(config_document);
        scan::scan_tomes(self.catalog.as_ref(), &config)
            .document
            .to_json()
    }

    /// Single-spell detail document, or the empty string on any failure.
    pub fn spell_info(&self, form_id: &str) -> String {
        scan::spell_info(self.catalog.as_ref(), self.weakening.as_ref(), form_id)
    }

    fn run_full(&self, config: &ScanConfig) -> ScanOutcome {
        scan::scan_all(self.catalog.as_ref(), config, &self.policy)
    }
}
