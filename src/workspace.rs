//! Recursive directory scanning for entity files
//!
//! Walks a directory tree for `.cs` files, skipping build output and
//! tooling directories, and parses candidates in parallel. Files that
//! don't parse to an entity — or parse to one with no properties — are
//! simply absent from the result, never errors.

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use rustc_hash::FxHashSet;
use walkdir::WalkDir;

use crate::context::SyncContext;
use crate::model::Entity;

/// Directories that never contain entity sources.
const SKIP_DIRS: &[&str] = &[
    "bin",
    "obj",
    "node_modules",
    ".git",
    ".vs",
    "Migrations",
    "migrations",
    "wwwroot",
];

/// Scan a directory recursively for entity files.
///
/// Results are ordered by file path so repeated scans are stable.
pub fn scan_directory(dir: &Path, ctx: &SyncContext) -> Vec<Entity> {
    if !dir.is_dir() {
        return Vec::new();
    }
    let skip: FxHashSet<&str> = SKIP_DIRS.iter().copied().collect();

    let files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_entry(|e| {
            !(e.file_type().is_dir()
                && e.file_name()
                    .to_str()
                    .map(|name| skip.contains(name))
                    .unwrap_or(false))
        })
        .filter_map(Result::ok)
        .filter(|e| {
            e.file_type().is_file()
                && e.path().extension().and_then(|x| x.to_str()) == Some("cs")
        })
        .map(|e| e.into_path())
        .collect();

    tracing::debug!(dir = %dir.display(), candidates = files.len(), "scanning for entities");

    let mut entities: Vec<Entity> = files
        .par_iter()
        .filter_map(|path| ctx.parse_file(path))
        .filter(|entity| !entity.properties.is_empty())
        .collect();
    entities.sort_by(|a, b| a.file_path.cmp(&b.file_path));
    entities
}
