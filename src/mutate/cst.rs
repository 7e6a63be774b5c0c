//! CST-backed edits
//!
//! Each operation reparses the text, locates the target node, and splices
//! the exact byte range of the affected tokens. The tree is lossless, so
//! ranges map 1:1 onto source bytes.

use rowan::NodeOrToken;

use super::{EditFailed, property_stub};
use crate::base::splice;
use crate::parser::extract::{
    find_entity_class, find_property, property_name_token, property_type_node,
};
use crate::parser::{SyntaxKind, parse};

/// Rename a property: replaces the identifier token only.
pub fn rename_property(text: &str, old: &str, new: &str) -> Result<String, EditFailed> {
    let root = parse(text).syntax();
    let prop = find_property(&root, old).ok_or(EditFailed)?;
    let name = property_name_token(&prop).ok_or(EditFailed)?;
    Ok(splice(text, name.text_range(), new))
}

/// Change a property's type: replaces the type tokens, adding the
/// nullability sigil when requested.
pub fn change_property_type(
    text: &str,
    prop_name: &str,
    new_type: &str,
    nullable: bool,
) -> Result<String, EditFailed> {
    let root = parse(text).syntax();
    let prop = find_property(&root, prop_name).ok_or(EditFailed)?;
    let ty = property_type_node(&prop).ok_or(EditFailed)?;
    let sigil = if nullable { "?" } else { "" };
    Ok(splice(text, ty.text_range(), &format!("{new_type}{sigil}")))
}

/// Toggle a property's nullability: adds or removes exactly one sigil.
/// Already being in the requested state is a no-op success.
pub fn set_nullable(text: &str, prop_name: &str, nullable: bool) -> Result<String, EditFailed> {
    let root = parse(text).syntax();
    let prop = find_property(&root, prop_name).ok_or(EditFailed)?;
    let ty = property_type_node(&prop).ok_or(EditFailed)?;
    // Only a trailing sigil makes the type nullable; a '?' inside generic
    // arguments does not.
    let question = ty
        .children_with_tokens()
        .filter_map(|el| el.into_token())
        .filter(|t| !t.kind().is_trivia())
        .last()
        .filter(|t| t.kind() == SyntaxKind::QUESTION);
    match (nullable, question) {
        (true, Some(_)) | (false, None) => Ok(text.to_string()), // already there
        (true, None) => {
            let end = ty.text_range().end();
            Ok(splice(text, rowan::TextRange::empty(end), "?"))
        }
        (false, Some(q)) => Ok(splice(text, q.text_range(), "")),
    }
}

/// Add a property after the last existing one, or before the class-body
/// closing brace if the class has none.
pub fn add_property(
    text: &str,
    name: &str,
    ty: &str,
    nullable: bool,
) -> Result<String, EditFailed> {
    let root = parse(text).syntax();
    let class = find_entity_class(&root).ok_or(EditFailed)?;
    let body = class
        .children()
        .find(|c| c.kind() == SyntaxKind::CLASS_BODY)
        .ok_or(EditFailed)?;
    let stub = property_stub(name, ty, nullable);

    let last_prop = body
        .children()
        .filter(|c| c.kind() == SyntaxKind::PROPERTY_DECL)
        .last();
    let insert_at = match last_prop {
        Some(prop) => {
            // Past the rest of the property's line, newline included
            let mut at = usize::from(prop.text_range().end());
            let bytes = text.as_bytes();
            while at < bytes.len() && bytes[at] != b'\n' {
                at += 1;
            }
            if at < bytes.len() {
                at += 1;
            }
            at
        }
        None => {
            let close = body
                .children_with_tokens()
                .filter_map(|el| el.into_token())
                .filter(|t| t.kind() == SyntaxKind::R_BRACE)
                .last()
                .ok_or(EditFailed)?;
            usize::from(close.text_range().start())
        }
    };

    let mut out = String::with_capacity(text.len() + stub.len());
    out.push_str(&text[..insert_at]);
    out.push_str(&stub);
    out.push_str(&text[insert_at..]);
    Ok(out)
}

/// Remove a property along with its immediately preceding doc comments,
/// its trailing newline, and its leading indentation. Attribute lists are
/// children of the property node, so the node span already covers them.
pub fn remove_property(text: &str, prop_name: &str) -> Result<String, EditFailed> {
    let root = parse(text).syntax();
    let prop = find_property(&root, prop_name).ok_or(EditFailed)?;

    let mut start = usize::from(prop.text_range().start());
    let mut cur = prop.prev_sibling_or_token();
    while let Some(el) = cur {
        match &el {
            NodeOrToken::Token(t) if t.kind() == SyntaxKind::WHITESPACE => {}
            NodeOrToken::Token(t) if t.kind() == SyntaxKind::DOC_COMMENT => {
                start = usize::from(t.text_range().start());
            }
            _ => break,
        }
        cur = match el {
            NodeOrToken::Node(n) => n.prev_sibling_or_token(),
            NodeOrToken::Token(t) => t.prev_sibling_or_token(),
        };
    }

    let bytes = text.as_bytes();
    let mut end = usize::from(prop.text_range().end());
    // Consume the trailing newline so no blank line is left behind
    if bytes.get(end) == Some(&b'\r') && bytes.get(end + 1) == Some(&b'\n') {
        end += 2;
    } else if bytes.get(end) == Some(&b'\n') {
        end += 1;
    }
    // And the indentation the deleted line sat on
    while start > 0 && matches!(bytes[start - 1], b' ' | b'\t') {
        start -= 1;
    }

    let mut out = String::with_capacity(text.len() - (end - start));
    out.push_str(&text[..start]);
    out.push_str(&text[end..]);
    Ok(out)
}
