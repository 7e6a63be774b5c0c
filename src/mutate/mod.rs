//! Source mutation: the five canonical edits
//!
//! Every operation takes the current file text and returns either the
//! full replacement text or [`EditFailed`]. Edits are minimal byte-range
//! splices: formatting, comments, and ordering outside the edited span
//! are preserved byte-for-byte.
//!
//! The mutator never touches the in-memory model. Callers re-parse after
//! every successful edit; that separation eliminates model/source drift
//! by construction.

pub mod cst;
pub mod pattern;

use thiserror::Error;

/// The single failure signal for source edits.
///
/// Every failure mode — target not found, ambiguous match, unreadable
/// file — collapses into this one value. Callers observe outcomes by
/// re-parsing, not by branching on a cause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("source edit could not be applied")]
pub struct EditFailed;

/// The inserted-property template: fixed indentation, fixed accessors.
pub(crate) fn property_stub(name: &str, ty: &str, nullable: bool) -> String {
    let sigil = if nullable { "?" } else { "" };
    format!("        public {ty}{sigil} {name} {{ get; set; }}\n")
}
