//! The shared Entity / Property model.
//!
//! An [`Entity`] is a read-through snapshot of one C# class declaration,
//! rebuilt wholesale on every parse. The source file is the sole source of
//! truth: the mutator edits text and the caller re-parses, so there is no
//! incremental patching of a live model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One property of an entity class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
    /// Base type name with any nullability sigil stripped.
    #[serde(rename = "type")]
    pub ty: String,
    pub nullable: bool,
    /// Derived, see [`required_heuristic`].
    pub required: bool,
    pub access: String,
    pub has_getter: bool,
    pub has_setter: bool,
    pub xml_doc: String,
    pub attributes: Vec<String>,
    /// 1-based line of the declaration (including attached attributes).
    pub line_number: u32,
}

/// A parsed entity class.
///
/// Invariant: `properties` retains source declaration order — this order
/// becomes column order in storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub name: String,
    pub namespace: String,
    pub file_path: String,
    pub properties: Vec<Property>,
    pub base_class: String,
    pub interfaces: Vec<String>,
    pub attributes: Vec<String>,
    pub xml_doc: String,
    pub is_partial: bool,
    /// Source file mtime; `None` for text-only parses.
    pub last_modified: Option<DateTime<Utc>>,
}

/// Types exempt from the required inference because they are
/// conventionally reference-like.
const REFERENCE_EXEMPT: &[&str] = &["string", "object"];

/// Derive the `required` flag for a property.
///
/// True when an explicit `required` modifier was present, or — absent
/// that — when the type is non-nullable and not reference-like. This is a
/// declaration-level approximation of value/reference nullability, not a
/// flow analysis, and is deliberately kept that way.
pub fn required_heuristic(explicit: bool, nullable: bool, ty: &str) -> bool {
    explicit || (!nullable && !REFERENCE_EXEMPT.contains(&ty))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_inference() {
        // explicit modifier always wins
        assert!(required_heuristic(true, true, "string"));
        // non-nullable value type
        assert!(required_heuristic(false, false, "int"));
        assert!(required_heuristic(false, false, "Guid"));
        // nullable anything is optional
        assert!(!required_heuristic(false, true, "int"));
        // reference-like types are exempt
        assert!(!required_heuristic(false, false, "string"));
        assert!(!required_heuristic(false, false, "object"));
    }
}
