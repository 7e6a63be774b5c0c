//! Foundation primitives for sharpsync.
//!
//! This module provides the text-level building blocks used by every
//! other layer:
//! - [`SourceText`] - BOM-aware source loading
//! - [`splice`] - byte-range replacement
//! - [`line_number`] - offset to 1-based line conversion
//! - [`is_identifier`] - identifier shape checking
//!
//! This module has NO dependencies on other sharpsync modules.

mod text;

pub use text::{SourceText, is_identifier, line_number, splice};

// Re-export text-size types for convenience
pub use text_size::{TextRange, TextSize};
