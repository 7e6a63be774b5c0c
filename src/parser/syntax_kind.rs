//! Syntax kinds for the Rowan-based CST
//!
//! This enum defines all node and token kinds in the C# subset the
//! entity parser understands. Anything outside that subset still lexes
//! and lands in the tree (as `UNKNOWN_MEMBER` or `ERROR`), so the tree
//! stays lossless.

/// All syntax kinds (tokens and nodes).
///
/// Tokens are leaf nodes (identifiers, keywords, punctuation).
/// Nodes are composite (class declarations, property declarations).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
#[allow(non_camel_case_types)]
pub enum SyntaxKind {
    // =========================================================================
    // TRIVIA (preserved in the tree; doc comments carry the XML docs)
    // =========================================================================
    WHITESPACE = 0,
    LINE_COMMENT,  // //
    DOC_COMMENT,   // ///
    BLOCK_COMMENT, // /* */

    // =========================================================================
    // LITERALS
    // =========================================================================
    IDENT,
    INTEGER,
    DECIMAL,
    STRING, // "..." or @"..."
    CHAR,   // '...'

    // =========================================================================
    // PUNCTUATION
    // =========================================================================
    L_BRACE,   // {
    R_BRACE,   // }
    L_BRACKET, // [
    R_BRACKET, // ]
    L_PAREN,   // (
    R_PAREN,   // )
    SEMICOLON, // ;
    COLON,     // :
    COMMA,     // ,
    DOT,       // .
    QUESTION,  // ?
    LT,        // <
    GT,        // >
    EQ,        // =
    FAT_ARROW, // =>
    PLUS,      // +
    MINUS,     // -
    STAR,      // *
    SLASH,     // /
    PERCENT,   // %
    AMP,       // &
    PIPE,      // |
    BANG,      // !
    TILDE,     // ~
    CARET,     // ^
    AT,        // @

    // =========================================================================
    // KEYWORDS
    // =========================================================================
    NAMESPACE_KW,
    USING_KW,
    CLASS_KW,
    STRUCT_KW,
    INTERFACE_KW,
    ENUM_KW,
    RECORD_KW,
    // modifiers (contiguous: PUBLIC_KW..=CONST_KW, see is_modifier)
    PUBLIC_KW,
    PRIVATE_KW,
    PROTECTED_KW,
    INTERNAL_KW,
    STATIC_KW,
    ABSTRACT_KW,
    SEALED_KW,
    PARTIAL_KW,
    READONLY_KW,
    VIRTUAL_KW,
    OVERRIDE_KW,
    NEW_KW,
    REQUIRED_KW,
    CONST_KW,
    // accessor keywords
    GET_KW,
    SET_KW,
    INIT_KW,

    // =========================================================================
    // NODES
    // =========================================================================
    SOURCE_FILE,
    USING_DIRECTIVE,
    NAMESPACE_DECL,
    QUALIFIED_NAME,
    ATTRIBUTE_LIST,
    CLASS_DECL,
    BASE_LIST,
    CLASS_BODY,
    PROPERTY_DECL,
    TYPE_REF,
    ACCESSOR_LIST,
    UNKNOWN_MEMBER,

    ERROR,

    #[doc(hidden)]
    __LAST,
}

impl SyntaxKind {
    /// Check if this kind is trivia (whitespace or comments).
    ///
    /// Doc comments are trivia structurally: they sit between member
    /// nodes so extraction can walk back over them as siblings.
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            Self::WHITESPACE | Self::LINE_COMMENT | Self::DOC_COMMENT | Self::BLOCK_COMMENT
        )
    }

    /// Check if this is a declaration modifier keyword.
    pub fn is_modifier(self) -> bool {
        (self as u16) >= (Self::PUBLIC_KW as u16) && (self as u16) <= (Self::CONST_KW as u16)
    }

    /// Check if this is an access modifier.
    pub fn is_access_modifier(self) -> bool {
        (self as u16) >= (Self::PUBLIC_KW as u16) && (self as u16) <= (Self::INTERNAL_KW as u16)
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

impl From<rowan::SyntaxKind> for SyntaxKind {
    fn from(raw: rowan::SyntaxKind) -> Self {
        assert!(raw.0 < SyntaxKind::__LAST as u16);
        // Safety: we control all syntax kinds and check bounds above
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }
}

/// Language definition for Rowan
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CSharpLanguage {}

impl rowan::Language for CSharpLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        raw.into()
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

pub type SyntaxNode = rowan::SyntaxNode<CSharpLanguage>;
pub type SyntaxToken = rowan::SyntaxToken<CSharpLanguage>;
pub type SyntaxElement = rowan::SyntaxElement<CSharpLanguage>;
