//! Structural parsers: source text → Entity model
//!
//! Two interchangeable implementations of one contract:
//! - **CST backend** (primary): logos lexer → recursive-descent parser →
//!   rowan green tree → extraction walk. Lossless, so the mutator can
//!   resolve byte-exact edit ranges from the same tree.
//! - **Pattern backend** (fallback): regex extraction over raw text with
//!   brace-balance scanning. Same model shape, documented degraded mode.
//!
//! ```text
//! Source Text
//!     ↓
//! Lexer (logos) → Tokens with SyntaxKind
//!     ↓
//! Parser → GreenNode tree (immutable, lossless)
//!     ↓
//! SyntaxNode (rowan) → CST with parent pointers
//!     ↓
//! extract → Entity snapshot
//! ```
//!
//! Both backends return `None` — never an error — when no public,
//! non-abstract, non-static class declaration is present: an unparsable
//! or mid-edit file is simply absent from a scan.

#[allow(clippy::module_inception)]
mod parser;

pub mod extract;
pub mod fallback;
mod lexer;
mod syntax_kind;

pub use extract::{entity_from_source, extract_entity};
pub use lexer::{Lexer, Token, tokenize};
pub use parser::{Parse, SyntaxError, parse};
pub use syntax_kind::{CSharpLanguage, SyntaxElement, SyntaxKind, SyntaxNode, SyntaxToken};

/// Re-export rowan types for convenience
pub use rowan::{GreenNode, TextRange, TextSize};

/// Inner text of a `<summary>...</summary>` tag, if one is present.
///
/// Shared by both backends' doc extraction; the scan is a plain substring
/// search, matching across line joins.
pub(crate) fn xml_summary(text: &str) -> Option<&str> {
    let start = text.find("<summary>")? + "<summary>".len();
    let end = text[start..].find("</summary>")? + start;
    Some(text[start..end].trim())
}
