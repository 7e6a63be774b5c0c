//! Entity extraction: CST → [`Entity`]
//!
//! Walks the lossless tree and produces the model snapshot. The helpers
//! that locate class/property nodes and their name/type tokens are shared
//! with the mutator, which resolves its byte ranges from the same tokens.

use rowan::NodeOrToken;

use super::syntax_kind::{SyntaxElement, SyntaxKind, SyntaxNode, SyntaxToken};
use crate::base::{is_identifier, line_number};
use crate::model::{Entity, Property, required_heuristic};

/// Parse source text and extract the primary entity, if any.
///
/// `file_path` and `last_modified` are left empty/`None`; the caller owns
/// file-level concerns.
pub fn entity_from_source(text: &str) -> Option<Entity> {
    let parse = super::parser::parse(text);
    let root = parse.syntax();
    extract_entity(&root, text)
}

/// Extract the first public, non-abstract, non-static class as an entity.
pub fn extract_entity(root: &SyntaxNode, text: &str) -> Option<Entity> {
    let class = find_entity_class(root)?;
    let name = class_name_token(&class)?.text().to_string();

    let namespace = root
        .descendants()
        .find(|n| n.kind() == SyntaxKind::NAMESPACE_DECL)
        .and_then(|ns| {
            ns.children()
                .find(|c| c.kind() == SyntaxKind::QUALIFIED_NAME)
        })
        .map(|q| q.text().to_string().trim().to_string())
        .unwrap_or_default();

    let mods = modifier_kinds(&class);
    let is_partial = mods.contains(&SyntaxKind::PARTIAL_KW);

    let mut base_class = String::new();
    let mut interfaces = Vec::new();
    if let Some(bases) = class.children().find(|c| c.kind() == SyntaxKind::BASE_LIST) {
        for ty in bases.children().filter(|c| c.kind() == SyntaxKind::TYPE_REF) {
            let name = ty.text().to_string().trim().to_string();
            if looks_like_interface(&name) {
                interfaces.push(name);
            } else {
                base_class = name;
            }
        }
    }

    let attributes = class
        .children()
        .filter(|c| c.kind() == SyntaxKind::ATTRIBUTE_LIST)
        .flat_map(|list| attribute_names(&list))
        .collect();

    let xml_doc = doc_comment_above(&class);

    let properties = class
        .children()
        .find(|c| c.kind() == SyntaxKind::CLASS_BODY)
        .map(|body| extract_properties(&body, text))
        .unwrap_or_default();

    tracing::trace!(entity = %name, props = properties.len(), "extracted entity");

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

/// First class declaration in document order that is public, non-abstract
/// and non-static. Later candidates in the same file are ignored.
pub(crate) fn find_entity_class(root: &SyntaxNode) -> Option<SyntaxNode> {
    root.descendants()
        .filter(|n| n.kind() == SyntaxKind::CLASS_DECL)
        .find(|class| {
            let mods = modifier_kinds(class);
            mods.contains(&SyntaxKind::PUBLIC_KW)
                && !mods.contains(&SyntaxKind::ABSTRACT_KW)
                && !mods.contains(&SyntaxKind::STATIC_KW)
        })
}

/// First property declaration whose name token matches `name`.
pub(crate) fn find_property(root: &SyntaxNode, name: &str) -> Option<SyntaxNode> {
    root.descendants()
        .filter(|n| n.kind() == SyntaxKind::PROPERTY_DECL)
        .find(|p| {
            property_name_token(p)
                .map(|t| t.text() == name)
                .unwrap_or(false)
        })
}

/// The class's name token: the first identifier after the `class` keyword.
pub(crate) fn class_name_token(class: &SyntaxNode) -> Option<SyntaxToken> {
    token_after(class, SyntaxKind::CLASS_KW)
}

/// The property's name token: the first identifier after the type.
pub(crate) fn property_name_token(prop: &SyntaxNode) -> Option<SyntaxToken> {
    let mut seen_type = false;
    for el in prop.children_with_tokens() {
        match el {
            NodeOrToken::Node(n) if n.kind() == SyntaxKind::TYPE_REF => seen_type = true,
            NodeOrToken::Token(t) if seen_type && t.kind() == SyntaxKind::IDENT => {
                return Some(t);
            }
            _ => {}
        }
    }
    None
}

/// The property's type node.
pub(crate) fn property_type_node(prop: &SyntaxNode) -> Option<SyntaxNode> {
    prop.children().find(|c| c.kind() == SyntaxKind::TYPE_REF)
}

fn token_after(node: &SyntaxNode, anchor: SyntaxKind) -> Option<SyntaxToken> {
    let mut seen = false;
    for el in node.children_with_tokens() {
        if let NodeOrToken::Token(t) = el {
            if t.kind() == anchor {
                seen = true;
            } else if seen && t.kind() == SyntaxKind::IDENT {
                return Some(t);
            }
        }
    }
    None
}

/// Direct-child modifier keywords of a declaration node.
fn modifier_kinds(node: &SyntaxNode) -> Vec<SyntaxKind> {
    node.children_with_tokens()
        .filter_map(|el| el.into_token())
        .map(|t| t.kind())
        .filter(|k| k.is_modifier())
        .collect()
}

/// Interface-name convention: leading `I` followed by an uppercase letter.
fn looks_like_interface(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next() == Some('I') && chars.next().map(|c| c.is_uppercase()).unwrap_or(false)
}

fn extract_properties(body: &SyntaxNode, text: &str) -> Vec<Property> {
    let mut properties = Vec::new();
    for prop in body
        .children()
        .filter(|c| c.kind() == SyntaxKind::PROPERTY_DECL)
    {
        let mods = modifier_kinds(&prop);
        // Only externally-visible, non-static, non-constant properties
        if !mods.contains(&SyntaxKind::PUBLIC_KW) {
            continue;
        }
        if mods.contains(&SyntaxKind::STATIC_KW) || mods.contains(&SyntaxKind::CONST_KW) {
            continue;
        }

        let Some(ty_node) = property_type_node(&prop) else {
            continue;
        };
        let Some(name_token) = property_name_token(&prop) else {
            continue;
        };
        let name = name_token.text().to_string();
        // Defends against stray matches
        if !is_identifier(&name) {
            continue;
        }

        let raw_ty = ty_node.text().to_string().trim().to_string();
        let (ty, nullable) = match raw_ty.strip_suffix('?') {
            Some(inner) => (inner.trim_end().to_string(), true),
            None => (raw_ty, false),
        };

        let accessors = prop
            .children()
            .find(|c| c.kind() == SyntaxKind::ACCESSOR_LIST)
            .map(|a| a.text().to_string())
            .unwrap_or_default();
        let has_getter = accessors.contains("get");
        let has_setter = accessors.contains("set") || accessors.contains("init");
        if !has_getter {
            continue;
        }

        let explicit_required = mods.contains(&SyntaxKind::REQUIRED_KW);
        let attributes = prop
            .children()
            .filter(|c| c.kind() == SyntaxKind::ATTRIBUTE_LIST)
            .flat_map(|list| attribute_names(&list))
            .collect();

        properties.push(Property {
            required: required_heuristic(explicit_required, nullable, &ty),
            name,
            ty,
            nullable,
            access: "public".to_string(),
            has_getter,
            has_setter,
            xml_doc: doc_comment_above(&prop),
            attributes,
            line_number: line_number(text, prop.text_range().start()),
        });
    }
    properties
}

/// Names of the attributes in one `[ ... ]` list: the leading identifier
/// of each comma-separated attribute, arguments ignored.
fn attribute_names(list: &SyntaxNode) -> Vec<String> {
    let mut names = Vec::new();
    let mut expecting = true;
    let mut paren_depth = 0usize;
    for el in list.children_with_tokens() {
        let NodeOrToken::Token(t) = el else { continue };
        match t.kind() {
            SyntaxKind::L_PAREN => paren_depth += 1,
            SyntaxKind::R_PAREN => paren_depth = paren_depth.saturating_sub(1),
            SyntaxKind::COMMA if paren_depth == 0 => expecting = true,
            SyntaxKind::IDENT if expecting && paren_depth == 0 => {
                names.push(t.text().to_string());
                expecting = false;
            }
            _ => {}
        }
    }
    names
}

/// Collect the contiguous `///` lines immediately above a node.
///
/// Whitespace between the comments and the node is transparent; any other
/// sibling stops the scan. If the joined text carries a `<summary>` tag,
/// only its inner text is returned.
fn doc_comment_above(node: &SyntaxNode) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut cur = node.prev_sibling_or_token();
    while let Some(el) = cur {
        match &el {
            NodeOrToken::Token(t) if t.kind() == SyntaxKind::WHITESPACE => {}
            NodeOrToken::Token(t) if t.kind() == SyntaxKind::DOC_COMMENT => {
                lines.push(t.text().trim_start_matches('/').trim().to_string());
            }
            _ => break,
        }
        cur = prev_of(&el);
    }
    if lines.is_empty() {
        return String::new();
    }
    lines.reverse();
    let full = lines.join(" ");
    match super::xml_summary(&full) {
        Some(inner) => inner.to_string(),
        None => full.trim().to_string(),
    }
}

fn prev_of(el: &SyntaxElement) -> Option<SyntaxElement> {
    match el {
        NodeOrToken::Node(n) => n.prev_sibling_or_token(),
        NodeOrToken::Token(t) => t.prev_sibling_or_token(),
    }
}
