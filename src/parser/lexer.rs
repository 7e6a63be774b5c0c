//! Logos-based lexer for the C# subset
//!
//! Fast tokenization using the logos crate. Nothing is skipped:
//! whitespace and comments become tokens so the CST retains every byte.

use super::syntax_kind::SyntaxKind;
use logos::Logos;
use rowan::TextSize;

/// A token with its kind, text, and position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: SyntaxKind,
    pub text: &'a str,
    pub offset: TextSize,
}

/// Lexer wrapping the logos-generated tokenizer
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, LogosToken>,
    offset: u32,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            inner: LogosToken::lexer(input),
            offset: 0,
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let logos_token = self.inner.next()?;
        let text = self.inner.slice();
        let offset = TextSize::new(self.offset);
        self.offset += text.len() as u32;

        let kind = match logos_token {
            Ok(t) => t.into(),
            Err(()) => SyntaxKind::ERROR,
        };

        Some(Token { kind, text, offset })
    }
}

/// Tokenize an entire string into a Vec
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    Lexer::new(input).collect()
}

/// Logos token enum - maps to SyntaxKind
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
pub enum LogosToken {
    // =========================================================================
    // TRIVIA
    // =========================================================================
    #[regex(r"[ \t\r\n]+")]
    Whitespace,

    // Must outrank LineComment for the shared '///' prefix
    #[regex(r"///[^\n]*", priority = 10)]
    DocComment,

    #[regex(r"//[^\n]*")]
    LineComment,

    #[regex(r"/\*([^*]|\*[^/])*\*/")]
    BlockComment,

    // =========================================================================
    // LITERALS
    // =========================================================================
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,

    #[regex(r"[0-9]+")]
    Integer,

    #[regex(r"[0-9]*\.[0-9]+([eE][+-]?[0-9]+)?")]
    Decimal,

    #[regex(r#""([^"\\]|\\.)*""#)]
    #[regex(r#"@"([^"]|"")*""#)]
    String,

    #[regex(r"'([^'\\]|\\.)*'")]
    Char,

    // =========================================================================
    // PUNCTUATION (multi-character before single-character)
    // =========================================================================
    #[token("=>")]
    FatArrow,

    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token(";")]
    Semicolon,
    #[token(":")]
    Colon,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token("?")]
    Question,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("=")]
    Eq,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("&")]
    Amp,
    #[token("|")]
    Pipe,
    #[token("!")]
    Bang,
    #[token("~")]
    Tilde,
    #[token("^")]
    Caret,
    #[token("@")]
    At,

    // =========================================================================
    // KEYWORDS
    // =========================================================================
    #[token("namespace")]
    NamespaceKw,
    #[token("using")]
    UsingKw,
    #[token("class")]
    ClassKw,
    #[token("struct")]
    StructKw,
    #[token("interface")]
    InterfaceKw,
    #[token("enum")]
    EnumKw,
    #[token("record")]
    RecordKw,
    #[token("public")]
    PublicKw,
    #[token("private")]
    PrivateKw,
    #[token("protected")]
    ProtectedKw,
    #[token("internal")]
    InternalKw,
    #[token("static")]
    StaticKw,
    #[token("abstract")]
    AbstractKw,
    #[token("sealed")]
    SealedKw,
    #[token("partial")]
    PartialKw,
    #[token("readonly")]
    ReadonlyKw,
    #[token("virtual")]
    VirtualKw,
    #[token("override")]
    OverrideKw,
    #[token("new")]
    NewKw,
    #[token("required")]
    RequiredKw,
    #[token("const")]
    ConstKw,
    #[token("get")]
    GetKw,
    #[token("set")]
    SetKw,
    #[token("init")]
    InitKw,
}

impl From<LogosToken> for SyntaxKind {
    fn from(token: LogosToken) -> Self {
        match token {
            LogosToken::Whitespace => SyntaxKind::WHITESPACE,
            LogosToken::DocComment => SyntaxKind::DOC_COMMENT,
            LogosToken::LineComment => SyntaxKind::LINE_COMMENT,
            LogosToken::BlockComment => SyntaxKind::BLOCK_COMMENT,
            LogosToken::Ident => SyntaxKind::IDENT,
            LogosToken::Integer => SyntaxKind::INTEGER,
            LogosToken::Decimal => SyntaxKind::DECIMAL,
            LogosToken::String => SyntaxKind::STRING,
            LogosToken::Char => SyntaxKind::CHAR,
            LogosToken::FatArrow => SyntaxKind::FAT_ARROW,
            LogosToken::LBrace => SyntaxKind::L_BRACE,
            LogosToken::RBrace => SyntaxKind::R_BRACE,
            LogosToken::LBracket => SyntaxKind::L_BRACKET,
            LogosToken::RBracket => SyntaxKind::R_BRACKET,
            LogosToken::LParen => SyntaxKind::L_PAREN,
            LogosToken::RParen => SyntaxKind::R_PAREN,
            LogosToken::Semicolon => SyntaxKind::SEMICOLON,
            LogosToken::Colon => SyntaxKind::COLON,
            LogosToken::Comma => SyntaxKind::COMMA,
            LogosToken::Dot => SyntaxKind::DOT,
            LogosToken::Question => SyntaxKind::QUESTION,
            LogosToken::Lt => SyntaxKind::LT,
            LogosToken::Gt => SyntaxKind::GT,
            LogosToken::Eq => SyntaxKind::EQ,
            LogosToken::Plus => SyntaxKind::PLUS,
            LogosToken::Minus => SyntaxKind::MINUS,
            LogosToken::Star => SyntaxKind::STAR,
            LogosToken::Slash => SyntaxKind::SLASH,
            LogosToken::Percent => SyntaxKind::PERCENT,
            LogosToken::Amp => SyntaxKind::AMP,
            LogosToken::Pipe => SyntaxKind::PIPE,
            LogosToken::Bang => SyntaxKind::BANG,
            LogosToken::Tilde => SyntaxKind::TILDE,
            LogosToken::Caret => SyntaxKind::CARET,
            LogosToken::At => SyntaxKind::AT,
            LogosToken::NamespaceKw => SyntaxKind::NAMESPACE_KW,
            LogosToken::UsingKw => SyntaxKind::USING_KW,
            LogosToken::ClassKw => SyntaxKind::CLASS_KW,
            LogosToken::StructKw => SyntaxKind::STRUCT_KW,
            LogosToken::InterfaceKw => SyntaxKind::INTERFACE_KW,
            LogosToken::EnumKw => SyntaxKind::ENUM_KW,
            LogosToken::RecordKw => SyntaxKind::RECORD_KW,
            LogosToken::PublicKw => SyntaxKind::PUBLIC_KW,
            LogosToken::PrivateKw => SyntaxKind::PRIVATE_KW,
            LogosToken::ProtectedKw => SyntaxKind::PROTECTED_KW,
            LogosToken::InternalKw => SyntaxKind::INTERNAL_KW,
            LogosToken::StaticKw => SyntaxKind::STATIC_KW,
            LogosToken::AbstractKw => SyntaxKind::ABSTRACT_KW,
            LogosToken::SealedKw => SyntaxKind::SEALED_KW,
            LogosToken::PartialKw => SyntaxKind::PARTIAL_KW,
            LogosToken::ReadonlyKw => SyntaxKind::READONLY_KW,
            LogosToken::VirtualKw => SyntaxKind::VIRTUAL_KW,
            LogosToken::OverrideKw => SyntaxKind::OVERRIDE_KW,
            LogosToken::NewKw => SyntaxKind::NEW_KW,
            LogosToken::RequiredKw => SyntaxKind::REQUIRED_KW,
            LogosToken::ConstKw => SyntaxKind::CONST_KW,
            LogosToken::GetKw => SyntaxKind::GET_KW,
            LogosToken::SetKw => SyntaxKind::SET_KW,
            LogosToken::InitKw => SyntaxKind::INIT_KW,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<SyntaxKind> {
        tokenize(input)
            .into_iter()
            .map(|t| t.kind)
            .filter(|k| !k.is_trivia())
            .collect()
    }

    #[test]
    fn lexes_property_declaration() {
        assert_eq!(
            kinds("public string? Name { get; set; }"),
            vec![
                SyntaxKind::PUBLIC_KW,
                SyntaxKind::IDENT,
                SyntaxKind::QUESTION,
                SyntaxKind::IDENT,
                SyntaxKind::L_BRACE,
                SyntaxKind::GET_KW,
                SyntaxKind::SEMICOLON,
                SyntaxKind::SET_KW,
                SyntaxKind::SEMICOLON,
                SyntaxKind::R_BRACE,
            ]
        );
    }

    #[test]
    fn doc_comment_outranks_line_comment() {
        let toks = tokenize("/// <summary>Hi</summary>\n// plain");
        assert_eq!(toks[0].kind, SyntaxKind::DOC_COMMENT);
        assert_eq!(toks[2].kind, SyntaxKind::LINE_COMMENT);
    }

    #[test]
    fn every_byte_is_covered() {
        let input = "public int Count { get; set; } // trailing\n";
        let total: usize = tokenize(input).iter().map(|t| t.text.len()).sum();
        assert_eq!(total, input.len());
    }

    #[test]
    fn unknown_characters_become_errors() {
        let toks = tokenize("#pragma");
        assert_eq!(toks[0].kind, SyntaxKind::ERROR);
        assert_eq!(toks[0].text, "#");
    }
}
