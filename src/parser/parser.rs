//! Recursive descent parser for the C# subset
//!
//! Builds a rowan GreenNode tree from tokens. The tree is lossless: every
//! token, including whitespace and comments, lands in it, so any node's
//! text range maps back to exact source bytes. Members outside the entity
//! subset (methods, fields, constructors) are consumed into
//! `UNKNOWN_MEMBER` nodes by balanced-delimiter scanning rather than
//! understood, and error recovery always makes progress.

use super::lexer::{Lexer, Token};
use super::syntax_kind::SyntaxKind;
use rowan::{GreenNode, GreenNodeBuilder, TextRange, TextSize};

/// Parse result containing the green tree and any errors
#[derive(Debug, Clone)]
pub struct Parse {
    pub green: GreenNode,
    pub errors: Vec<SyntaxError>,
}

impl Parse {
    /// Get the root syntax node
    pub fn syntax(&self) -> super::SyntaxNode {
        super::SyntaxNode::new_root(self.green.clone())
    }

    /// Check if parsing succeeded without errors
    pub fn ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// A syntax error with location and message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub message: String,
    pub range: TextRange,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>, range: TextRange) -> Self {
        Self {
            message: message.into(),
            range,
        }
    }
}

/// Parse C# source text into a CST
pub fn parse(input: &str) -> Parse {
    let tokens: Vec<_> = Lexer::new(input).collect();
    let mut parser = Parser::new(&tokens);
    parser.parse_source_file();
    parser.finish()
}

/// What a class-body member (or top-level declaration) looks like from
/// a non-consuming scan past its attributes and modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MemberShape {
    /// `<type> <name> {` — a property declaration
    Property,
    /// `class` after modifiers
    Class,
    /// Anything else: method, field, constructor, non-class type decl
    Other,
}

/// The parser state
struct Parser<'a> {
    tokens: &'a [Token<'a>],
    pos: usize,
    builder: GreenNodeBuilder<'static>,
    errors: Vec<SyntaxError>,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token<'a>]) -> Self {
        Self {
            tokens,
            pos: 0,
            builder: GreenNodeBuilder::new(),
            errors: Vec::new(),
        }
    }

    fn finish(self) -> Parse {
        Parse {
            green: self.builder.finish(),
            errors: self.errors,
        }
    }

    // =========================================================================
    // Token inspection
    // =========================================================================

    fn current(&self) -> Option<&Token<'a>> {
        self.tokens.get(self.pos)
    }

    fn current_kind(&self) -> SyntaxKind {
        self.current().map(|t| t.kind).unwrap_or(SyntaxKind::ERROR)
    }

    fn at(&self, kind: SyntaxKind) -> bool {
        self.current_kind() == kind
    }

    fn at_eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Kind at absolute token index, ERROR past the end.
    fn kind_at(&self, idx: usize) -> SyntaxKind {
        self.tokens
            .get(idx)
            .map(|t| t.kind)
            .unwrap_or(SyntaxKind::ERROR)
    }

    /// Index of the first non-trivia token at or after `idx`.
    fn significant(&self, mut idx: usize) -> usize {
        while idx < self.tokens.len() && self.tokens[idx].kind.is_trivia() {
            idx += 1;
        }
        idx
    }

    /// Kind of the next non-trivia token (without consuming anything).
    fn peek(&self) -> SyntaxKind {
        self.kind_at(self.significant(self.pos))
    }

    // =========================================================================
    // Token consumption
    // =========================================================================

    fn bump(&mut self) {
        if let Some(token) = self.current() {
            self.builder.token(token.kind.into(), token.text);
            self.pos += 1;
        }
    }

    fn bump_until(&mut self, end: usize) {
        while self.pos < end && !self.at_eof() {
            self.bump();
        }
    }

    fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: SyntaxKind) -> bool {
        if self.eat(kind) {
            true
        } else {
            self.error(format!("expected {:?}", kind));
            false
        }
    }

    fn skip_trivia(&mut self) {
        while self.current().map(|t| t.kind.is_trivia()).unwrap_or(false) {
            self.bump();
        }
    }

    // =========================================================================
    // Error handling
    // =========================================================================

    fn error(&mut self, message: impl Into<String>) {
        let range = self
            .current()
            .map(|t| TextRange::at(t.offset, TextSize::of(t.text)))
            .unwrap_or_else(|| TextRange::empty(TextSize::new(0)));
        self.errors.push(SyntaxError::new(message, range));
    }

    // =========================================================================
    // Node building helpers
    // =========================================================================

    fn start_node(&mut self, kind: SyntaxKind) {
        self.builder.start_node(kind.into());
    }

    fn finish_node(&mut self) {
        self.builder.finish_node();
    }

    // =========================================================================
    // Lookahead scans (non-consuming)
    // =========================================================================

    /// Scan past attribute lists starting at `idx`; returns the index of
    /// the first token after them.
    fn scan_attribute_lists(&self, idx: usize) -> usize {
        let mut i = self.significant(idx);
        while self.kind_at(i) == SyntaxKind::L_BRACKET {
            let mut depth = 0usize;
            while i < self.tokens.len() {
                match self.kind_at(i) {
                    SyntaxKind::L_BRACKET => depth += 1,
                    SyntaxKind::R_BRACKET => {
                        depth -= 1;
                        if depth == 0 {
                            i += 1;
                            break;
                        }
                    }
                    _ => {}
                }
                i += 1;
            }
            i = self.significant(i);
        }
        i
    }

    /// Scan past modifier keywords starting at `idx`.
    fn scan_modifiers(&self, idx: usize) -> usize {
        let mut i = self.significant(idx);
        while self.kind_at(i).is_modifier() {
            i = self.significant(i + 1);
        }
        i
    }

    /// Try to scan a type reference starting at `idx`: a dotted identifier
    /// path with optional balanced generic arguments, array suffixes, and
    /// a trailing nullability sigil. Returns the index just past the last
    /// type token.
    fn scan_type(&self, idx: usize) -> Option<usize> {
        let mut i = self.significant(idx);
        if self.kind_at(i) != SyntaxKind::IDENT {
            return None;
        }
        i += 1;
        loop {
            let j = self.significant(i);
            match self.kind_at(j) {
                SyntaxKind::DOT => {
                    let k = self.significant(j + 1);
                    if self.kind_at(k) != SyntaxKind::IDENT {
                        return None;
                    }
                    i = k + 1;
                }
                SyntaxKind::LT => {
                    let mut depth = 1usize;
                    let mut k = j + 1;
                    while k < self.tokens.len() && depth > 0 {
                        match self.kind_at(k) {
                            SyntaxKind::LT => depth += 1,
                            SyntaxKind::GT => depth -= 1,
                            SyntaxKind::L_BRACE
                            | SyntaxKind::R_BRACE
                            | SyntaxKind::SEMICOLON => return None,
                            _ => {}
                        }
                        k += 1;
                    }
                    if depth > 0 {
                        return None;
                    }
                    i = k;
                }
                SyntaxKind::L_BRACKET => {
                    // array suffix: [] or [,]
                    let mut k = self.significant(j + 1);
                    while self.kind_at(k) == SyntaxKind::COMMA {
                        k = self.significant(k + 1);
                    }
                    if self.kind_at(k) != SyntaxKind::R_BRACKET {
                        break;
                    }
                    i = k + 1;
                }
                SyntaxKind::QUESTION => {
                    i = j + 1;
                    break;
                }
                _ => break,
            }
        }
        Some(i)
    }

    /// Classify the member starting at the current position.
    fn classify_member(&self) -> MemberShape {
        let i = self.scan_attribute_lists(self.pos);
        let i = self.scan_modifiers(i);
        match self.kind_at(i) {
            SyntaxKind::CLASS_KW => MemberShape::Class,
            SyntaxKind::STRUCT_KW
            | SyntaxKind::INTERFACE_KW
            | SyntaxKind::ENUM_KW
            | SyntaxKind::RECORD_KW => MemberShape::Other,
            _ => {
                if let Some(after_ty) = self.scan_type(i) {
                    let name = self.significant(after_ty);
                    if self.kind_at(name) == SyntaxKind::IDENT
                        && self.kind_at(self.significant(name + 1)) == SyntaxKind::L_BRACE
                    {
                        return MemberShape::Property;
                    }
                }
                MemberShape::Other
            }
        }
    }

    // =========================================================================
    // Grammar rules
    // =========================================================================

    /// SourceFile = (UsingDirective | NamespaceDecl | TypeDecl)*
    fn parse_source_file(&mut self) {
        self.start_node(SyntaxKind::SOURCE_FILE);
        self.parse_items(None);
        self.finish_node();
    }

    /// Shared item loop for the top level and block namespace bodies.
    fn parse_items(&mut self, terminator: Option<SyntaxKind>) {
        loop {
            self.skip_trivia();
            if self.at_eof() {
                if terminator.is_some() {
                    self.error("unexpected end of file");
                }
                break;
            }
            if let Some(t) = terminator {
                if self.at(t) {
                    break;
                }
            }
            let pos_before = self.pos;
            match self.current_kind() {
                SyntaxKind::USING_KW => self.parse_using(),
                SyntaxKind::NAMESPACE_KW => self.parse_namespace(),
                _ => match self.classify_member() {
                    MemberShape::Class => self.parse_class_decl(),
                    MemberShape::Property | MemberShape::Other => self.parse_unknown_member(),
                },
            }
            // Safety: if we didn't make progress, force-skip a token
            if self.pos == pos_before && !self.at_eof() {
                self.error(format!("stuck on token: {:?}", self.current_kind()));
                self.bump();
            }
        }
    }

    /// UsingDirective = 'using' ... ';'
    fn parse_using(&mut self) {
        self.start_node(SyntaxKind::USING_DIRECTIVE);
        self.expect(SyntaxKind::USING_KW);
        while !self.at_eof()
            && !self.at(SyntaxKind::SEMICOLON)
            && !self.at(SyntaxKind::L_BRACE)
            && !self.at(SyntaxKind::R_BRACE)
        {
            self.bump();
        }
        self.eat(SyntaxKind::SEMICOLON);
        self.finish_node();
    }

    /// NamespaceDecl = 'namespace' QualifiedName (';' | '{' Item* '}')
    ///
    /// File-scoped namespaces end at the ';'; the declarations that follow
    /// stay at the source-file level, which is all the entity extraction
    /// needs (first namespace in document order wins).
    fn parse_namespace(&mut self) {
        self.start_node(SyntaxKind::NAMESPACE_DECL);
        self.expect(SyntaxKind::NAMESPACE_KW);
        self.skip_trivia();
        self.parse_qualified_name();
        match self.peek() {
            SyntaxKind::SEMICOLON => {
                self.skip_trivia();
                self.bump();
            }
            SyntaxKind::L_BRACE => {
                self.skip_trivia();
                self.bump();
                self.parse_items(Some(SyntaxKind::R_BRACE));
                self.expect(SyntaxKind::R_BRACE);
            }
            _ => self.error("expected '{' or ';' after namespace name"),
        }
        self.finish_node();
    }

    /// QualifiedName = IDENT ('.' IDENT)*
    fn parse_qualified_name(&mut self) {
        self.start_node(SyntaxKind::QUALIFIED_NAME);
        if !self.eat(SyntaxKind::IDENT) {
            self.error("expected namespace name");
        }
        while self.peek() == SyntaxKind::DOT {
            self.skip_trivia();
            self.bump(); // '.'
            self.skip_trivia();
            if !self.eat(SyntaxKind::IDENT) {
                self.error("expected identifier after '.'");
                break;
            }
        }
        self.finish_node();
    }

    /// ClassDecl = AttributeList* Modifier* 'class' IDENT Generics?
    ///             BaseList? ClassBody
    fn parse_class_decl(&mut self) {
        self.start_node(SyntaxKind::CLASS_DECL);
        self.parse_attribute_lists();
        self.skip_trivia();
        while self.current_kind().is_modifier() {
            self.bump();
            self.skip_trivia();
        }
        self.expect(SyntaxKind::CLASS_KW);
        self.skip_trivia();
        if !self.eat(SyntaxKind::IDENT) {
            self.error("expected class name");
        }
        if self.peek() == SyntaxKind::LT {
            self.skip_trivia();
            self.bump_balanced_angles();
        }
        if self.peek() == SyntaxKind::COLON {
            self.skip_trivia();
            self.parse_base_list();
        }
        self.skip_trivia();
        if self.at(SyntaxKind::L_BRACE) {
            self.parse_class_body();
        } else {
            self.error("expected '{' to open class body");
        }
        self.finish_node();
    }

    /// BaseList = ':' TypeRef (',' TypeRef)*
    fn parse_base_list(&mut self) {
        self.start_node(SyntaxKind::BASE_LIST);
        self.bump(); // ':'
        loop {
            self.skip_trivia();
            if self.at_eof() || self.at(SyntaxKind::L_BRACE) {
                break;
            }
            if self.at(SyntaxKind::COMMA) {
                self.bump();
                continue;
            }
            if let Some(end) = self.scan_type(self.pos) {
                self.parse_type_ref(end);
            } else {
                // `where` constraints and other tail tokens ride along
                self.bump();
            }
        }
        self.finish_node();
    }

    /// ClassBody = '{' Member* '}'
    fn parse_class_body(&mut self) {
        self.start_node(SyntaxKind::CLASS_BODY);
        self.bump(); // '{'
        loop {
            self.skip_trivia();
            if self.at_eof() {
                self.error("unexpected end of file in class body");
                break;
            }
            if self.at(SyntaxKind::R_BRACE) {
                break;
            }
            let pos_before = self.pos;
            match self.classify_member() {
                MemberShape::Property => self.parse_property_decl(),
                MemberShape::Class => self.parse_class_decl(),
                MemberShape::Other => self.parse_unknown_member(),
            }
            if self.pos == pos_before && !self.at_eof() {
                self.error(format!("stuck on token: {:?}", self.current_kind()));
                self.bump();
            }
        }
        self.expect(SyntaxKind::R_BRACE);
        self.finish_node();
    }

    /// PropertyDecl = AttributeList* Modifier* TypeRef IDENT AccessorList
    ///                ('=' ... ';')?
    fn parse_property_decl(&mut self) {
        self.start_node(SyntaxKind::PROPERTY_DECL);
        self.parse_attribute_lists();
        self.skip_trivia();
        while self.current_kind().is_modifier() {
            self.bump();
            self.skip_trivia();
        }
        match self.scan_type(self.pos) {
            Some(end) => self.parse_type_ref(end),
            None => self.error("expected property type"),
        }
        self.skip_trivia();
        if !self.eat(SyntaxKind::IDENT) {
            self.error("expected property name");
        }
        if self.peek() == SyntaxKind::L_BRACE {
            self.skip_trivia();
            self.parse_accessor_list();
        } else {
            self.error("expected accessor list");
        }
        // optional initializer: `= new() { ... };`
        if self.peek() == SyntaxKind::EQ {
            self.skip_trivia();
            let mut depth = 0usize;
            while !self.at_eof() {
                match self.current_kind() {
                    SyntaxKind::L_BRACE => depth += 1,
                    SyntaxKind::R_BRACE => {
                        if depth == 0 {
                            break;
                        }
                        depth -= 1;
                    }
                    SyntaxKind::SEMICOLON => {
                        if depth == 0 {
                            break;
                        }
                    }
                    _ => {}
                }
                self.bump();
            }
            self.eat(SyntaxKind::SEMICOLON);
        }
        self.finish_node();
    }

    /// AccessorList = '{' ... '}' (balanced)
    fn parse_accessor_list(&mut self) {
        self.start_node(SyntaxKind::ACCESSOR_LIST);
        self.bump(); // '{'
        let mut depth = 1usize;
        while depth > 0 && !self.at_eof() {
            match self.current_kind() {
                SyntaxKind::L_BRACE => depth += 1,
                SyntaxKind::R_BRACE => depth -= 1,
                _ => {}
            }
            self.bump();
        }
        self.finish_node();
    }

    /// TypeRef: bump everything up to the pre-scanned end index.
    fn parse_type_ref(&mut self, end: usize) {
        self.start_node(SyntaxKind::TYPE_REF);
        self.bump_until(end);
        self.finish_node();
    }

    /// AttributeList* — zero or more `[ ... ]` groups.
    fn parse_attribute_lists(&mut self) {
        while self.peek() == SyntaxKind::L_BRACKET {
            self.skip_trivia();
            self.start_node(SyntaxKind::ATTRIBUTE_LIST);
            self.bump(); // '['
            let mut depth = 1usize;
            while depth > 0 && !self.at_eof() {
                match self.current_kind() {
                    SyntaxKind::L_BRACKET => depth += 1,
                    SyntaxKind::R_BRACKET => depth -= 1,
                    _ => {}
                }
                self.bump();
            }
            self.finish_node();
        }
    }

    /// Consume a member we don't model (method, field, constructor,
    /// non-class type declaration) by balanced-delimiter scanning. Stops
    /// at a top-level ';', after a balanced '{...}' group, before the
    /// enclosing body's '}', or before something that classifies as a new
    /// property/class/namespace/using.
    fn parse_unknown_member(&mut self) {
        self.start_node(SyntaxKind::UNKNOWN_MEMBER);
        let mut depth = 0usize;
        let mut consumed = false;
        loop {
            if self.at_eof() {
                break;
            }
            let kind = self.current_kind();
            if depth == 0 && kind == SyntaxKind::R_BRACE {
                break;
            }
            if depth == 0
                && consumed
                && matches!(kind, SyntaxKind::NAMESPACE_KW | SyntaxKind::USING_KW)
            {
                break;
            }
            if depth == 0
                && consumed
                && (kind == SyntaxKind::L_BRACKET || kind.is_modifier())
                && self.classify_member() != MemberShape::Other
            {
                break;
            }
            match kind {
                SyntaxKind::L_BRACE => {
                    depth += 1;
                    self.bump();
                }
                SyntaxKind::R_BRACE => {
                    depth -= 1;
                    self.bump();
                    if depth == 0 {
                        break;
                    }
                }
                SyntaxKind::SEMICOLON => {
                    self.bump();
                    if depth == 0 {
                        break;
                    }
                }
                _ => self.bump(),
            }
            consumed = true;
        }
        self.finish_node();
    }

    /// Balanced '<...>' group (generic parameter list).
    fn bump_balanced_angles(&mut self) {
        let mut depth = 0usize;
        while !self.at_eof() {
            match self.current_kind() {
                SyntaxKind::LT => depth += 1,
                SyntaxKind::GT => {
                    depth -= 1;
                    if depth == 0 {
                        self.bump();
                        return;
                    }
                }
                SyntaxKind::L_BRACE | SyntaxKind::SEMICOLON => return,
                _ => {}
            }
            self.bump();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root_text_round_trips(input: &str) {
        let parse = parse(input);
        assert_eq!(parse.syntax().text().to_string(), input, "CST must be lossless");
    }

    #[test]
    fn cst_is_lossless() {
        root_text_round_trips("");
        root_text_round_trips("using System;\n\nnamespace A.B;\n\npublic class C\n{\n    public int X { get; set; }\n}\n");
        root_text_round_trips("public class Weird { void M() { if (true) { } } int f = 3; }");
        root_text_round_trips("#pragma warning disable\nusing System;");
    }

    #[test]
    fn finds_class_and_property_nodes(){
        let parse = parse("public class C { public string Name { get; set; } }");
        let root = parse.syntax();
        let class = root
            .descendants()
            .find(|n| n.kind() == SyntaxKind::CLASS_DECL)
            .expect("class node");
        let prop = class
            .descendants()
            .find(|n| n.kind() == SyntaxKind::PROPERTY_DECL)
            .expect("property node");
        assert_eq!(prop.text().to_string(), "public string Name { get; set; }");
    }

    #[test]
    fn methods_become_unknown_members() {
        let parse = parse("public class C { public int Add(int a, int b) { return a + b; } }");
        let root = parse.syntax();
        assert!(root.descendants().any(|n| n.kind() == SyntaxKind::UNKNOWN_MEMBER));
        assert!(!root.descendants().any(|n| n.kind() == SyntaxKind::PROPERTY_DECL));
    }

    #[test]
    fn property_with_initializer_is_one_node() {
        let src = "public class C { public List<string> Tags { get; set; } = new() { \"a\" }; }";
        let parse = parse(src);
        let prop = parse
            .syntax()
            .descendants()
            .find(|n| n.kind() == SyntaxKind::PROPERTY_DECL)
            .expect("property node");
        assert!(prop.text().to_string().ends_with("= new() { \"a\" };"));
        root_text_round_trips(src);
    }
}
