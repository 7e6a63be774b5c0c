//! Source text handling: BOM stripping, byte splicing, line numbering.

use std::fs;
use std::io;
use std::path::Path;

use text_size::{TextRange, TextSize};

/// UTF-8 byte-order mark. Stripped on read, never written back.
const BOM: char = '\u{feff}';

/// A loaded source file with its byte-order mark removed.
///
/// The mutator computes replacement text against this stripped form and
/// writes it back as-is, so a marker present on disk disappears after the
/// first edit.
#[derive(Debug, Clone)]
pub struct SourceText {
    text: String,
    had_bom: bool,
}

impl SourceText {
    /// Wrap in-memory text, stripping a leading byte-order mark if present.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        match text.strip_prefix(BOM) {
            Some(stripped) => Self {
                text: stripped.to_string(),
                had_bom: true,
            },
            None => Self {
                text,
                had_bom: false,
            },
        }
    }

    /// Read a file from disk, stripping a leading byte-order mark.
    pub fn from_path(path: &Path) -> io::Result<Self> {
        Ok(Self::new(fs::read_to_string(path)?))
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Whether the on-disk form carried a byte-order mark.
    pub fn had_bom(&self) -> bool {
        self.had_bom
    }
}

/// Replace the bytes covered by `range` with `replacement`.
///
/// Offsets are byte offsets into `text`; callers obtain them from syntax
/// token ranges, so they always fall on character boundaries.
pub fn splice(text: &str, range: TextRange, replacement: &str) -> String {
    let start = usize::from(range.start());
    let end = usize::from(range.end());
    let mut out = String::with_capacity(text.len() - (end - start) + replacement.len());
    out.push_str(&text[..start]);
    out.push_str(replacement);
    out.push_str(&text[end..]);
    out
}

/// 1-based line number of the given offset.
pub fn line_number(text: &str, offset: TextSize) -> u32 {
    let upto = &text[..usize::from(offset).min(text.len())];
    upto.bytes().filter(|&b| b == b'\n').count() as u32 + 1
}

/// Check that a candidate name has identifier shape.
///
/// Guards property extraction against stray matches (literals, keywords
/// used in odd positions). Uses Unicode Standard Annex #31 classes, which
/// cover the `[A-Za-z_]\w*` shape the canonical sources use.
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c == '_' || unicode_ident::is_xid_start(c) => {}
        _ => return false,
    }
    chars.all(unicode_ident::is_xid_continue)
}
