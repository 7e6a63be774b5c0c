//! Backend selection and file-level application
//!
//! The CST and pattern implementations are two faces of one capability:
//! parse text into an [`Entity`], and apply the five canonical edits back
//! into that text. [`SyncContext`] binds one of them, chosen once at
//! construction by capability probing, and owns the file-level concerns:
//! atomic read-compute-write and byte-order-mark hygiene.
//!
//! The context holds no state between calls; it is safe to use for
//! different files from independent threads.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};

use crate::base::SourceText;
use crate::model::Entity;
use crate::mutate::{EditFailed, cst, pattern};
use crate::parser::{extract, fallback};

/// One parsing-and-editing capability. Both implementations are plain
/// values so the full contract suite can run against either.
pub trait SyncBackend: Send + Sync {
    fn name(&self) -> &'static str;

    /// Extract the entity snapshot, absent — never an error — when the
    /// text has no eligible class declaration.
    fn parse(&self, text: &str) -> Option<Entity>;

    fn rename_property(&self, text: &str, old: &str, new: &str) -> Result<String, EditFailed>;

    fn change_property_type(
        &self,
        text: &str,
        prop: &str,
        new_type: &str,
        nullable: bool,
    ) -> Result<String, EditFailed>;

    fn set_nullable(&self, text: &str, prop: &str, nullable: bool) -> Result<String, EditFailed>;

    fn add_property(
        &self,
        text: &str,
        name: &str,
        ty: &str,
        nullable: bool,
    ) -> Result<String, EditFailed>;

    fn remove_property(&self, text: &str, prop: &str) -> Result<String, EditFailed>;
}

/// The syntax-tree-backed primary implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct CstBackend;

impl SyncBackend for CstBackend {
    fn name(&self) -> &'static str {
        "cst"
    }

    fn parse(&self, text: &str) -> Option<Entity> {
        extract::entity_from_source(text)
    }

    fn rename_property(&self, text: &str, old: &str, new: &str) -> Result<String, EditFailed> {
        cst::rename_property(text, old, new)
    }

    fn change_property_type(
        &self,
        text: &str,
        prop: &str,
        new_type: &str,
        nullable: bool,
    ) -> Result<String, EditFailed> {
        cst::change_property_type(text, prop, new_type, nullable)
    }

    fn set_nullable(&self, text: &str, prop: &str, nullable: bool) -> Result<String, EditFailed> {
        cst::set_nullable(text, prop, nullable)
    }

    fn add_property(
        &self,
        text: &str,
        name: &str,
        ty: &str,
        nullable: bool,
    ) -> Result<String, EditFailed> {
        cst::add_property(text, name, ty, nullable)
    }

    fn remove_property(&self, text: &str, prop: &str) -> Result<String, EditFailed> {
        cst::remove_property(text, prop)
    }
}

/// The regex fallback implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternBackend;

impl SyncBackend for PatternBackend {
    fn name(&self) -> &'static str {
        "pattern"
    }

    fn parse(&self, text: &str) -> Option<Entity> {
        fallback::entity_from_source(text)
    }

    fn rename_property(&self, text: &str, old: &str, new: &str) -> Result<String, EditFailed> {
        pattern::rename_property(text, old, new)
    }

    fn change_property_type(
        &self,
        text: &str,
        prop: &str,
        new_type: &str,
        nullable: bool,
    ) -> Result<String, EditFailed> {
        pattern::change_property_type(text, prop, new_type, nullable)
    }

    fn set_nullable(&self, text: &str, prop: &str, nullable: bool) -> Result<String, EditFailed> {
        pattern::set_nullable(text, prop, nullable)
    }

    fn add_property(
        &self,
        text: &str,
        name: &str,
        ty: &str,
        nullable: bool,
    ) -> Result<String, EditFailed> {
        pattern::add_property(text, name, ty, nullable)
    }

    fn remove_property(&self, text: &str, prop: &str) -> Result<String, EditFailed> {
        pattern::remove_property(text, prop)
    }
}

/// Which backend a context is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Cst,
    Pattern,
}

/// Snippet the capability probe must parse correctly for the CST backend
/// to be selected.
const PROBE: &str = "public class Probe { public int Id { get; set; } }";

/// An explicitly constructed, injectable parser/mutator context.
///
/// Built once at startup; the backend choice never changes mid-run.
pub struct SyncContext {
    kind: BackendKind,
    backend: Box<dyn SyncBackend>,
}

impl SyncContext {
    /// Probe capabilities and pick a backend: the CST implementation must
    /// demonstrate a correct parse of a known snippet, otherwise the
    /// pattern fallback is used.
    pub fn detect() -> Self {
        let probed = CstBackend
            .parse(PROBE)
            .map(|e| e.name == "Probe" && e.properties.len() == 1)
            .unwrap_or(false);
        let kind = if probed {
            BackendKind::Cst
        } else {
            BackendKind::Pattern
        };
        tracing::debug!(backend = ?kind, "parser backend selected");
        Self::with_kind(kind)
    }

    /// Bind a specific backend (tests run the contract suite this way).
    pub fn with_kind(kind: BackendKind) -> Self {
        let backend: Box<dyn SyncBackend> = match kind {
            BackendKind::Cst => Box::new(CstBackend),
            BackendKind::Pattern => Box::new(PatternBackend),
        };
        Self { kind, backend }
    }

    pub fn kind(&self) -> BackendKind {
        self.kind
    }

    pub fn backend(&self) -> &dyn SyncBackend {
        self.backend.as_ref()
    }

    /// Parse a file into an entity snapshot. Unreadable or ineligible
    /// files are absent, never errors.
    pub fn parse_file(&self, path: &Path) -> Option<Entity> {
        let source = SourceText::from_path(path).ok()?;
        let mut entity = self.backend.parse(source.as_str())?;
        entity.file_path = path.display().to_string();
        entity.last_modified = fs::metadata(path)
            .ok()
            .and_then(|m| m.modified().ok())
            .map(DateTime::<Utc>::from);
        Some(entity)
    }

    /// Atomic edit application: full read (BOM stripped), new content
    /// computed in memory, single write-back. The marker is never
    /// reintroduced. A byte-identical result skips the write.
    fn apply(
        &self,
        path: &Path,
        edit: impl FnOnce(&str) -> Result<String, EditFailed>,
    ) -> Result<(), EditFailed> {
        let source = SourceText::from_path(path).map_err(|_| EditFailed)?;
        let new_text = edit(source.as_str())?;
        if new_text != source.as_str() {
            fs::write(path, new_text).map_err(|_| EditFailed)?;
        }
        Ok(())
    }

    pub fn rename_property(&self, path: &Path, old: &str, new: &str) -> Result<(), EditFailed> {
        self.apply(path, |t| self.backend.rename_property(t, old, new))
    }

    pub fn change_property_type(
        &self,
        path: &Path,
        prop: &str,
        new_type: &str,
        nullable: bool,
    ) -> Result<(), EditFailed> {
        self.apply(path, |t| {
            self.backend.change_property_type(t, prop, new_type, nullable)
        })
    }

    pub fn set_nullable(&self, path: &Path, prop: &str, nullable: bool) -> Result<(), EditFailed> {
        self.apply(path, |t| self.backend.set_nullable(t, prop, nullable))
    }

    pub fn add_property(
        &self,
        path: &Path,
        name: &str,
        ty: &str,
        nullable: bool,
    ) -> Result<(), EditFailed> {
        self.apply(path, |t| self.backend.add_property(t, name, ty, nullable))
    }

    pub fn remove_property(&self, path: &Path, prop: &str) -> Result<(), EditFailed> {
        self.apply(path, |t| self.backend.remove_property(t, prop))
    }
}

impl Default for SyncContext {
    fn default() -> Self {
        Self::detect()
    }
}
