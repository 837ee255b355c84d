//! Spellscan – a read-only projection pipeline over a game-content catalog.
//!
//! The crate walks an in-memory catalog of spells and the tomes that teach
//! them, drops entries that are not player-facing, projects the survivors into
//! configurable JSON records and packages the result with an instruction block
//! for an external text-generation service that arranges the records into
//! per-school trees.
//!
//! ## Modules
//! * [`catalog`] – The entity model, the `Catalog` trait the host implements,
//!   an in-memory implementation and serde snapshot types.
//! * [`encoding`] – Byte-level sanitization of legacy-encoded display text.
//! * [`classify`] – Ordered heuristic rules excluding non-player spells.
//! * [`fields`] – Per-request field toggles and tree-rules text, parsed
//!   best-effort from JSON with documented defaults.
//! * [`record`] – Projection of one spell into one ordered record.
//! * [`scan`] – Full and tome scan drivers, document assembly, form-id
//!   parsing and the single-spell detail lookup.
//! * [`weakening`] – The injected early-learned effectiveness collaborator.
//! * [`interface`] – [`interface::ScannerService`], the strings-in/strings-out
//!   surface the host calls.
//! * [`server`] – A thin axum router exposing the service over HTTP.
//!
//! ## Quick Start
//! ```
//! use std::sync::Arc;
//! use spellscan::catalog::InMemoryCatalog;
//! use spellscan::interface::ScannerService;
//! use spellscan::scan::ScanPolicy;
//! use spellscan::weakening::NoWeakening;
//!
//! let catalog = Arc::new(InMemoryCatalog::new());
//! let service = ScannerService::new(catalog, Arc::new(NoWeakening), ScanPolicy::default());
//! let document = service.scan_all("");
//! assert!(document.contains("\"spellCount\": 0"));
//! ```

pub mod catalog;
pub mod classify;
pub mod encoding;
pub mod error;
pub mod fields;
pub mod interface;
pub mod record;
pub mod scan;
pub mod server;
pub mod weakening;
