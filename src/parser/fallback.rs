//! Pattern-matching fallback parser
//!
//! An independent, regex-driven implementation of the parsing contract,
//! used when the CST backend is unavailable. It reproduces the same
//! Entity/Property shape from raw text, delimiting the class body by
//! brace-balance scanning.
//!
//! Degraded mode, by contract: accuracy drops on deeply nested generics
//! and multi-line attribute lists. Equivalence with the CST backend is
//! required (and tested) only for well-formed, simply-structured input.

use std::sync::LazyLock;

use regex::Regex;

use crate::base::is_identifier;
use crate::model::{Entity, Property, required_heuristic};

static NAMESPACE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|\n)\s*namespace\s+([\w.]+)\s*[{;]").expect("namespace pattern")
});

static CLASS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?s)((?:///[^\n]*\n\s*)*)((?:\[.*?\]\s*\n\s*)*)(public)\s+(partial\s+)?class\s+(\w+)(?:\s*:\s*([\w\s,<>?.]+?))?\s*\{",
    )
    .expect("class pattern")
});

static PROP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?s)((?:\s*///[^\n]*\n)*)((?:\s*\[.*?\]\s*\n)*)\s*(public|protected|private|internal)\s+((?:(?:virtual|override|new|static|readonly)\s+)*)(required\s+)?([\w<>\[\]?,. ]+?)\s+(\w+)\s*\{[^}]*get[^}]*\}",
    )
    .expect("property pattern")
});

static SUMMARY_STRIP: &[char] = &['/', ' ', '\t'];

/// Parse source text with the pattern backend.
pub fn entity_from_source(text: &str) -> Option<Entity> {
    let namespace = NAMESPACE_RE
        .captures(text)
        .map(|c| c[1].trim().to_string())
        .unwrap_or_default();

    let caps = CLASS_RE.captures(text)?;
    let class_match = caps.get(0).expect("whole match");
    let xml_doc = parse_doc_lines(caps.get(1).map(|m| m.as_str()).unwrap_or(""));
    let attributes = parse_attribute_names(caps.get(2).map(|m| m.as_str()).unwrap_or(""));
    let is_partial = caps.get(4).is_some();
    let name = caps[5].to_string();
    let inheritance = caps.get(6).map(|m| m.as_str()).unwrap_or("");

    let mut base_class = String::new();
    let mut interfaces = Vec::new();
    for part in inheritance.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        if looks_like_interface(part) {
            interfaces.push(part.to_string());
        } else {
            base_class = part.to_string();
        }
    }

    // The class body starts at the brace that ended the match.
    let body_open = class_match.end() - 1;
    let body = balanced_block(text, body_open).unwrap_or(&text[class_match.end()..]);
    let body_line_base = line_of(text, class_match.end());
    let properties = parse_properties(body, body_line_base);

    Some(Entity {
        name,
        namespace,
        file_path: String::new(),
        properties,
        base_class,
        interfaces,
        attributes,
        xml_doc,
        is_partial,
        last_modified: None,
    })
}

/// Contents of the brace-balanced block opening at `open` (which must
/// point at a `{`), exclusive of the braces themselves.
pub(crate) fn balanced_block(text: &str, open: usize) -> Option<&str> {
    let bytes = text.as_bytes();
    let mut depth = 0usize;
    let mut i = open;
    while i < bytes.len() {
        match bytes[i] {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[open + 1..i]);
                }
            }
            _ => {}
        }
        i += 1;
    }
    None
}

fn parse_properties(body: &str, line_base: u32) -> Vec<Property> {
    let mut properties = Vec::new();
    for caps in PROP_RE.captures_iter(body) {
        let whole = caps.get(0).expect("whole match");
        let access = caps[3].to_string();
        let extra_mods = caps.get(4).map(|m| m.as_str()).unwrap_or("");
        let explicit_required = caps.get(5).is_some();
        let raw_ty = caps[6].trim().to_string();
        let name = caps[7].to_string();

        // Only externally-visible properties are entity properties
        if access != "public" {
            continue;
        }
        // Accessor keywords and stray matches are not property names
        if matches!(name.as_str(), "get" | "set" | "value" | "return") {
            continue;
        }
        if !is_identifier(&name) {
            continue;
        }
        if extra_mods.contains("static") || extra_mods.contains("const") {
            continue;
        }

        let (ty, nullable) = match raw_ty.strip_suffix('?') {
            Some(inner) => (inner.trim_end().to_string(), true),
            None => (raw_ty, false),
        };

        let block = whole.as_str();
        let has_setter = block.contains("set") || block.contains("init");
        // Anchor the line at the attribute list when present, else at the
        // access modifier, matching where the CST span starts.
        let anchor = match caps.get(2) {
            Some(attrs) if !attrs.as_str().trim().is_empty() => {
                attrs.start() + attrs.as_str().find('[').unwrap_or(0)
            }
            _ => caps.get(3).map(|m| m.start()).unwrap_or(whole.start()),
        };
        let line_number = line_base + count_lines(&body[..anchor]);

        properties.push(Property {
            required: required_heuristic(explicit_required, nullable, &ty),
            name,
            ty,
            nullable,
            access,
            has_getter: true,
            has_setter,
            xml_doc: parse_doc_lines(caps.get(1).map(|m| m.as_str()).unwrap_or("")),
            attributes: parse_attribute_names(caps.get(2).map(|m| m.as_str()).unwrap_or("")),
            line_number,
        });
    }
    properties
}

/// Join `///` lines and take the `<summary>` inner text when present.
fn parse_doc_lines(raw: &str) -> String {
    if raw.trim().is_empty() {
        return String::new();
    }
    let full = raw
        .trim()
        .lines()
        .map(|l| l.trim().trim_start_matches(SUMMARY_STRIP).trim())
        .collect::<Vec<_>>()
        .join(" ");
    match super::xml_summary(&full) {
        Some(inner) => inner.to_string(),
        None => full.trim().to_string(),
    }
}

static ATTR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]").expect("attribute pattern"));

/// Attribute names from raw `[...]` text, arguments stripped.
fn parse_attribute_names(raw: &str) -> Vec<String> {
    ATTR_RE
        .captures_iter(raw)
        .filter_map(|c| {
            let content = c[1].trim();
            let name: String = content
                .chars()
                .take_while(|ch| *ch != '(' && !ch.is_whitespace())
                .collect();
            if name.is_empty() { None } else { Some(name) }
        })
        .collect()
}

fn looks_like_interface(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next() == Some('I') && chars.next().map(|c| c.is_uppercase()).unwrap_or(false)
}

fn count_lines(text: &str) -> u32 {
    text.bytes().filter(|&b| b == b'\n').count() as u32
}

/// 1-based line number of a byte offset.
fn line_of(text: &str, offset: usize) -> u32 {
    count_lines(&text[..offset.min(text.len())]) + 1
}
