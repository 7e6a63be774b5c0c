//! # sharpsync
//!
//! Core library keeping three representations of a C# data entity
//! consistent: its source-text declaration, an in-memory structural
//! model, and a backing SQLite table.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! workspace → directory scanning
//!   ↓
//! store     → SQLite reconciliation (create / migrate / rebuild), row ops
//!   ↓
//! context   → backend probing, atomic file-level edit application
//!   ↓
//! mutate    → the five canonical source edits (byte-range splices)
//!   ↓
//! parser    → CST backend (logos lexer + rowan green tree) and
//!             pattern (regex) fallback
//!   ↓
//! model     → Entity / Property snapshot types
//!   ↓
//! base      → Primitives (BOM handling, splice, identifier shape)
//! ```
//!
//! ## Synchronization contract
//!
//! The parser and mutator are two faces of one backend capability,
//! selected once at startup by [`context::SyncContext::detect`] and never
//! switched mid-run. The mutator edits source text only — it never
//! patches the model. Callers re-parse after every successful edit and
//! hand the refreshed snapshot to the reconciler; model and source
//! cannot drift because the file is the sole source of truth.

/// Foundation primitives: BOM stripping, byte splicing, identifier shape
pub mod base;

/// Entity / Property model — the shared snapshot shape
pub mod model;

/// Structural parsers: lossless CST backend and regex fallback
pub mod parser;

/// Source mutation: five canonical edits, byte-range precise
pub mod mutate;

/// Backend capability interface, probing, and file-level application
pub mod context;

/// SQLite schema reconciliation and row operations
pub mod store;

/// Recursive directory scanning for entity files
pub mod workspace;

// Re-export the primary surface
pub use context::{BackendKind, CstBackend, PatternBackend, SyncBackend, SyncContext};
pub use model::{Entity, Property};
pub use mutate::EditFailed;
pub use store::{
    EntityStore, ReconcileAction, ReconcileReport, RowSynthesizer, SEED_ROW_COUNT, SampleValues,
    StoreError,
};
pub use workspace::scan_directory;
