//! Pattern-backed edits
//!
//! Textual fallback used when the CST backend is unavailable. Edits match
//! the canonical `public <type> <Name> { ... }` shape and fail closed: an
//! absent or multiply-matching target rejects the edit with the text
//! untouched, never a guessed mutation.

use regex::{Captures, Regex};

use super::{EditFailed, property_stub};

/// Head of a property declaration with the given name.
fn head_re(name: &str) -> Regex {
    Regex::new(&format!(
        r"public\s+[\w<>\[\]?,. ]+\s+{}\s*\{{",
        regex::escape(name)
    ))
    .expect("head pattern")
}

/// Apply `rep` to the single match of `re`, failing closed on zero or
/// multiple matches.
fn apply_once(
    re: &Regex,
    text: &str,
    rep: impl Fn(&Captures) -> String,
) -> Result<String, EditFailed> {
    let mut matches = re.captures_iter(text);
    let first = matches.next().ok_or(EditFailed)?;
    if matches.next().is_some() {
        return Err(EditFailed);
    }
    let whole = first.get(0).expect("whole match");
    let mut out = String::with_capacity(text.len());
    out.push_str(&text[..whole.start()]);
    out.push_str(&rep(&first));
    out.push_str(&text[whole.end()..]);
    Ok(out)
}

/// Rename a property declaration's identifier.
pub fn rename_property(text: &str, old: &str, new: &str) -> Result<String, EditFailed> {
    let re = Regex::new(&format!(
        r"(public\s+[\w<>\[\]?,. ]+\s+){}(\s*\{{)",
        regex::escape(old)
    ))
    .expect("rename pattern");
    apply_once(&re, text, |c| format!("{}{}{}", &c[1], new, &c[2]))
}

/// Replace a property's type text.
pub fn change_property_type(
    text: &str,
    prop_name: &str,
    new_type: &str,
    nullable: bool,
) -> Result<String, EditFailed> {
    let re = Regex::new(&format!(
        r"(public\s+)[\w<>\[\]?,. ]+?(\s+{}\s*\{{)",
        regex::escape(prop_name)
    ))
    .expect("change-type pattern");
    let sigil = if nullable { "?" } else { "" };
    apply_once(&re, text, |c| {
        format!("{}{new_type}{sigil}{}", &c[1], &c[2])
    })
}

/// Add or remove the nullability sigil. Already being in the requested
/// state is a no-op success.
pub fn set_nullable(text: &str, prop_name: &str, nullable: bool) -> Result<String, EditFailed> {
    if head_re(prop_name).find(text).is_none() {
        return Err(EditFailed);
    }
    let nullable_head = Regex::new(&format!(
        r"public\s+[\w<>\[\]?,. ]+\?\s+{}\s*\{{",
        regex::escape(prop_name)
    ))
    .expect("nullable head pattern");
    if nullable == nullable_head.find(text).is_some() {
        // already in the requested state
        return Ok(text.to_string());
    }
    if nullable {
        let re = Regex::new(&format!(
            r"(public\s+)([\w<>\[\]. ]+?)(\s+{}\s*\{{)",
            regex::escape(prop_name)
        ))
        .expect("add-sigil pattern");
        apply_once(&re, text, |c| format!("{}{}?{}", &c[1], &c[2], &c[3]))
    } else {
        let re = Regex::new(&format!(
            r"(public\s+)([\w<>\[\]. ]+?)\?(\s+{}\s*\{{)",
            regex::escape(prop_name)
        ))
        .expect("strip-sigil pattern");
        apply_once(&re, text, |c| format!("{}{}{}", &c[1], &c[2], &c[3]))
    }
}

/// Insert a property after the last one, or before the class-body close.
pub fn add_property(
    text: &str,
    name: &str,
    ty: &str,
    nullable: bool,
) -> Result<String, EditFailed> {
    let class_re = Regex::new(r"public\s+(?:partial\s+)?class\s+\w+").expect("class pattern");
    if class_re.find(text).is_none() {
        return Err(EditFailed);
    }
    let stub = property_stub(name, ty, nullable);
    let last_prop_re =
        Regex::new(r" {4,8}public\s+[\w<>\[\]?,. ]+\s+\w+\s*\{[^}]*\}[^\n]*\n").expect("prop line");
    let insert_at = match last_prop_re.find_iter(text).last() {
        Some(m) => m.end(),
        None => text
            .rfind("    }")
            .or_else(|| text.rfind('}'))
            .ok_or(EditFailed)?,
    };
    let mut out = String::with_capacity(text.len() + stub.len());
    out.push_str(&text[..insert_at]);
    out.push_str(&stub);
    out.push_str(&text[insert_at..]);
    Ok(out)
}

/// Remove a property line together with its preceding doc-comment and
/// attribute lines.
pub fn remove_property(text: &str, prop_name: &str) -> Result<String, EditFailed> {
    let re = Regex::new(&format!(
        r"(?:[ \t]*(?:///[^\n]*\n[ \t]*)*(?:\[[\s\S]*?\]\s*\n[ \t]*)*)?[ \t]*public\s+[\w<>\[\]?,. ]+\s+{}\s*\{{[^}}]*\}}[^\n]*\n",
        regex::escape(prop_name)
    ))
    .expect("remove pattern");
    apply_once(&re, text, |_| String::new())
}
