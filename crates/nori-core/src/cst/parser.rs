//! Hierarchical parser for CS source
//!
//! Builds a structured, lossless CST from the trivia-preserving token
//! stream: source files, namespaces, classes, members with accessor lists
//! and attributes, statements, and precedence-climbing expressions. Every
//! token (trivia included) lands in the tree, so `cst.text() == source`.
//!
//! This is the reference host front-end; the analyzers themselves only
//! consume the resulting tree. Constructs outside the supported subset are
//! wrapped in `Error` nodes and skipped over.

use super::lexer::LexerError;
use super::{CsSyntaxKind, CsSyntaxNode, CstBuilder, CstToken};

/// Parse CS source into a hierarchical CST.
///
/// # Example
///
/// ```rust,ignore
/// use nori_core::cst::parse_cs;
///
/// let source = "class C\n{\n    int M() { return 5; }\n}\n";
/// let (cst, errors) = parse_cs(source);
/// assert!(errors.is_empty());
/// assert_eq!(cst.text().to_string(), source);
/// ```
pub fn parse_cs(source: &str) -> (CsSyntaxNode, Vec<LexerError>) {
    let (tokens, errors) = super::lex_with_trivia(source);
    let cst = parse_tokens(&tokens);
    (cst, errors)
}

fn parse_tokens(tokens: &[CstToken]) -> CsSyntaxNode {
    let mut parser = Parser::new(tokens);
    parser.parse_source_file();
    parser.finish()
}

/// Token stream parser
struct Parser<'a> {
    tokens: &'a [CstToken],
    pos: usize,
    builder: CstBuilder,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [CstToken]) -> Self {
        Self {
            tokens,
            pos: 0,
            builder: CstBuilder::new(),
        }
    }

    fn finish(self) -> CsSyntaxNode {
        self.builder.finish()
    }

    // === token stream helpers ===

    fn current_kind(&self) -> CsSyntaxKind {
        self.tokens
            .get(self.pos)
            .map(|t| t.kind)
            .unwrap_or(CsSyntaxKind::Eof)
    }

    fn at_end(&self) -> bool {
        self.current_kind() == CsSyntaxKind::Eof
    }

    fn at_trivia(&self) -> bool {
        self.current_kind().is_trivia()
    }

    /// Kind of the next non-trivia token, without consuming anything.
    fn peek_kind(&self) -> CsSyntaxKind {
        let mut pos = self.pos;
        while let Some(t) = self.tokens.get(pos) {
            if !t.kind.is_trivia() {
                return t.kind;
            }
            pos += 1;
        }
        CsSyntaxKind::Eof
    }

    /// Kind of the `n`-th non-trivia token from here (0 = current).
    fn peek_nth_kind(&self, n: usize) -> CsSyntaxKind {
        let mut pos = self.pos;
        let mut seen = 0;
        while let Some(t) = self.tokens.get(pos) {
            if !t.kind.is_trivia() {
                if seen == n {
                    return t.kind;
                }
                seen += 1;
            }
            pos += 1;
        }
        CsSyntaxKind::Eof
    }

    fn add_current_token(&mut self) {
        if let Some(t) = self.tokens.get(self.pos) {
            self.builder.token(t.kind, &t.text);
        }
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    /// Add the current token to the tree and advance past it.
    fn bump(&mut self) {
        self.add_current_token();
        self.advance();
    }

    /// Bump all pending trivia into the current node.
    fn consume_trivia(&mut self) {
        while self.at_trivia() {
            self.bump();
        }
    }

    /// Bump the current token if it has the expected kind; otherwise wrap
    /// it in an `Error` node so parsing can continue. A closing brace is
    /// never consumed as recovery: a missing token before `}` is left for
    /// the enclosing scope to close.
    fn expect(&mut self, kind: CsSyntaxKind) {
        if self.current_kind() == kind {
            self.bump();
        } else if !self.at_end() && self.current_kind() != CsSyntaxKind::RBrace {
            self.error_and_recover();
        }
    }

    fn error_and_recover(&mut self) {
        self.builder.start_node(CsSyntaxKind::Error);
        self.bump();
        self.builder.finish_node();
    }

    // === declarations ===

    fn parse_source_file(&mut self) {
        self.builder.start_node(CsSyntaxKind::SourceFile);

        let mut iterations = 0;
        while !self.at_end() {
            iterations += 1;
            if iterations > 100_000 {
                break;
            }

            if self.at_trivia() {
                self.consume_trivia();
                continue;
            }

            match self.current_kind() {
                CsSyntaxKind::UsingKw => self.parse_using_directive(),
                CsSyntaxKind::NamespaceKw => self.parse_namespace(),
                k if k == CsSyntaxKind::ClassKw || k.is_modifier() => self.parse_class(),
                _ => self.error_and_recover(),
            }
        }

        self.builder.finish_node();
    }

    /// `using System.Text;`
    fn parse_using_directive(&mut self) {
        self.builder.start_node(CsSyntaxKind::UsingDirective);
        self.bump(); // using
        self.consume_trivia();
        self.parse_qualified_name();
        self.consume_trivia();
        self.expect(CsSyntaxKind::Semicolon);
        self.builder.finish_node();
    }

    fn parse_qualified_name(&mut self) {
        self.builder.start_node(CsSyntaxKind::QualifiedName);
        self.expect(CsSyntaxKind::Ident);
        while self.peek_kind() == CsSyntaxKind::Dot {
            self.consume_trivia();
            self.bump(); // .
            self.consume_trivia();
            self.expect(CsSyntaxKind::Ident);
        }
        self.builder.finish_node();
    }

    /// `namespace Name.Space { ... }`
    fn parse_namespace(&mut self) {
        self.builder.start_node(CsSyntaxKind::NamespaceDecl);
        self.bump(); // namespace
        self.consume_trivia();
        self.parse_qualified_name();
        self.consume_trivia();
        self.expect(CsSyntaxKind::LBrace);

        let mut iterations = 0;
        loop {
            iterations += 1;
            if iterations > 100_000 {
                break;
            }
            if self.at_trivia() {
                self.consume_trivia();
                continue;
            }
            match self.current_kind() {
                CsSyntaxKind::RBrace | CsSyntaxKind::Eof => break,
                k if k == CsSyntaxKind::ClassKw || k.is_modifier() => self.parse_class(),
                CsSyntaxKind::UsingKw => self.parse_using_directive(),
                _ => self.error_and_recover(),
            }
        }

        self.expect(CsSyntaxKind::RBrace);
        self.builder.finish_node();
    }

    /// `class Name { <members> }`
    fn parse_class(&mut self) {
        self.builder.start_node(CsSyntaxKind::ClassDecl);
        while self.current_kind().is_modifier() {
            self.bump();
            self.consume_trivia();
        }
        self.expect(CsSyntaxKind::ClassKw);
        self.consume_trivia();
        self.expect(CsSyntaxKind::Ident);
        self.consume_trivia();
        self.expect(CsSyntaxKind::LBrace);

        let mut iterations = 0;
        loop {
            iterations += 1;
            if iterations > 100_000 {
                break;
            }
            if self.at_trivia() {
                self.consume_trivia();
                continue;
            }
            match self.current_kind() {
                CsSyntaxKind::RBrace | CsSyntaxKind::Eof => break,
                CsSyntaxKind::LBracket
                | CsSyntaxKind::VoidKw
                | CsSyntaxKind::Ident => self.parse_member(),
                k if k.is_modifier() => self.parse_member(),
                _ => self.error_and_recover(),
            }
        }

        self.expect(CsSyntaxKind::RBrace);
        self.builder.finish_node();
    }

    /// A class member: method, property, or field. The node kind is decided
    /// after the header (`[attrs] modifiers type name`) has been read.
    fn parse_member(&mut self) {
        let checkpoint = self.builder.checkpoint();

        while self.current_kind() == CsSyntaxKind::LBracket {
            self.parse_attribute_list();
            self.consume_trivia();
        }
        while self.current_kind().is_modifier() {
            self.bump();
            self.consume_trivia();
        }
        self.parse_type_ref();
        self.consume_trivia();
        if self.current_kind() == CsSyntaxKind::Ident {
            self.bump(); // member name
        }

        match self.peek_kind() {
            CsSyntaxKind::LParen => {
                self.builder.start_node_at(checkpoint, CsSyntaxKind::MethodDecl);
                self.consume_trivia();
                self.parse_param_list();
                self.consume_trivia();
                match self.current_kind() {
                    CsSyntaxKind::LBrace => self.parse_block(),
                    CsSyntaxKind::Arrow => self.parse_arrow_clause(),
                    _ => self.expect(CsSyntaxKind::Semicolon),
                }
                self.builder.finish_node();
            }
            CsSyntaxKind::LBrace => {
                self.builder.start_node_at(checkpoint, CsSyntaxKind::PropertyDecl);
                self.consume_trivia();
                self.parse_accessor_list();
                self.builder.finish_node();
            }
            CsSyntaxKind::Arrow => {
                self.builder.start_node_at(checkpoint, CsSyntaxKind::PropertyDecl);
                self.consume_trivia();
                self.parse_arrow_clause();
                self.builder.finish_node();
            }
            _ => {
                self.builder.start_node_at(checkpoint, CsSyntaxKind::FieldDecl);
                self.consume_trivia();
                if self.current_kind() == CsSyntaxKind::Eq {
                    self.bump();
                    self.consume_trivia();
                    self.parse_expr();
                    self.consume_trivia();
                }
                self.expect(CsSyntaxKind::Semicolon);
                self.builder.finish_node();
            }
        }
    }

    /// `[Attr]` / `[Attr(args)]` — contents kept flat.
    fn parse_attribute_list(&mut self) {
        self.builder.start_node(CsSyntaxKind::AttributeList);
        self.bump(); // [
        let mut depth = 1usize;
        while !self.at_end() && depth > 0 {
            match self.current_kind() {
                CsSyntaxKind::LBracket => depth += 1,
                CsSyntaxKind::RBracket => depth -= 1,
                _ => {}
            }
            self.bump();
        }
        self.builder.finish_node();
    }

    /// `void` or a possibly-qualified name with optional `[]` suffix.
    fn parse_type_ref(&mut self) {
        self.builder.start_node(CsSyntaxKind::TypeRef);
        if self.current_kind() == CsSyntaxKind::VoidKw || self.current_kind() == CsSyntaxKind::VarKw
        {
            self.bump();
        } else {
            self.expect(CsSyntaxKind::Ident);
            while self.peek_kind() == CsSyntaxKind::Dot
                && self.peek_nth_kind(1) == CsSyntaxKind::Ident
            {
                self.consume_trivia();
                self.bump(); // .
                self.consume_trivia();
                self.bump(); // ident
            }
            if self.peek_kind() == CsSyntaxKind::LBracket
                && self.peek_nth_kind(1) == CsSyntaxKind::RBracket
            {
                self.consume_trivia();
                self.bump(); // [
                self.bump(); // ]
            }
        }
        self.builder.finish_node();
    }

    fn parse_param_list(&mut self) {
        self.builder.start_node(CsSyntaxKind::ParamList);
        self.expect(CsSyntaxKind::LParen);
        let mut iterations = 0;
        loop {
            iterations += 1;
            if iterations > 10_000 {
                break;
            }
            if self.at_trivia() {
                self.consume_trivia();
                continue;
            }
            match self.current_kind() {
                CsSyntaxKind::RParen | CsSyntaxKind::Eof => break,
                CsSyntaxKind::Comma => self.bump(),
                _ => self.parse_param(),
            }
        }
        self.expect(CsSyntaxKind::RParen);
        self.builder.finish_node();
    }

    fn parse_param(&mut self) {
        self.builder.start_node(CsSyntaxKind::Param);
        self.parse_type_ref();
        self.consume_trivia();
        if self.current_kind() == CsSyntaxKind::Ident {
            self.bump();
        }
        self.builder.finish_node();
    }

    /// `{ [attrs] get ...; [attrs] set ...; }`
    fn parse_accessor_list(&mut self) {
        self.builder.start_node(CsSyntaxKind::AccessorList);
        self.expect(CsSyntaxKind::LBrace);
        let mut iterations = 0;
        loop {
            iterations += 1;
            if iterations > 10_000 {
                break;
            }
            if self.at_trivia() {
                self.consume_trivia();
                continue;
            }
            match self.current_kind() {
                CsSyntaxKind::RBrace | CsSyntaxKind::Eof => break,
                CsSyntaxKind::LBracket | CsSyntaxKind::GetKw | CsSyntaxKind::SetKw => {
                    self.parse_accessor();
                }
                _ => self.error_and_recover(),
            }
        }
        self.expect(CsSyntaxKind::RBrace);
        self.builder.finish_node();
    }

    fn parse_accessor(&mut self) {
        self.builder.start_node(CsSyntaxKind::AccessorDecl);
        while self.current_kind() == CsSyntaxKind::LBracket {
            self.parse_attribute_list();
            self.consume_trivia();
        }
        if self.current_kind() == CsSyntaxKind::GetKw || self.current_kind() == CsSyntaxKind::SetKw
        {
            self.bump();
        }
        self.consume_trivia();
        match self.current_kind() {
            CsSyntaxKind::LBrace => self.parse_block(),
            CsSyntaxKind::Arrow => self.parse_arrow_clause(),
            _ => self.expect(CsSyntaxKind::Semicolon),
        }
        self.builder.finish_node();
    }

    /// `=> <expr>;`
    fn parse_arrow_clause(&mut self) {
        self.builder.start_node(CsSyntaxKind::ArrowClause);
        self.expect(CsSyntaxKind::Arrow);
        self.consume_trivia();
        self.parse_expr();
        self.consume_trivia();
        self.expect(CsSyntaxKind::Semicolon);
        self.builder.finish_node();
    }

    // === statements ===

    fn parse_block(&mut self) {
        self.builder.start_node(CsSyntaxKind::Block);
        self.expect(CsSyntaxKind::LBrace);
        let mut iterations = 0;
        loop {
            iterations += 1;
            if iterations > 100_000 {
                break;
            }
            if self.at_trivia() {
                self.consume_trivia();
                continue;
            }
            match self.current_kind() {
                CsSyntaxKind::RBrace | CsSyntaxKind::Eof => break,
                _ => self.parse_statement(),
            }
        }
        self.expect(CsSyntaxKind::RBrace);
        self.builder.finish_node();
    }

    fn parse_statement(&mut self) {
        match self.current_kind() {
            CsSyntaxKind::LBrace => self.parse_block(),
            CsSyntaxKind::ReturnKw => self.parse_return_stmt(),
            CsSyntaxKind::IfKw => self.parse_if_stmt(),
            CsSyntaxKind::WhileKw => self.parse_while_stmt(),
            CsSyntaxKind::DoKw => self.parse_do_stmt(),
            CsSyntaxKind::UsingKw => self.parse_using_stmt(),
            CsSyntaxKind::SwitchKw => self.parse_switch_stmt(),
            CsSyntaxKind::ThrowKw => self.parse_throw_stmt(),
            CsSyntaxKind::BreakKw => self.parse_keyword_stmt(CsSyntaxKind::BreakStmt),
            CsSyntaxKind::ContinueKw => self.parse_keyword_stmt(CsSyntaxKind::ContinueStmt),
            CsSyntaxKind::Semicolon => {
                self.builder.start_node(CsSyntaxKind::EmptyStmt);
                self.bump();
                self.builder.finish_node();
            }
            CsSyntaxKind::VarKw => self.parse_local_decl_stmt(),
            CsSyntaxKind::Ident if self.looks_like_local_decl() => self.parse_local_decl_stmt(),
            _ => self.parse_expr_stmt(),
        }
    }

    /// `Type name = ...;` vs `name.Member(...);` — a declaration starts with
    /// a type followed by another identifier.
    fn looks_like_local_decl(&self) -> bool {
        let mut n = 1;
        // Skip a qualified type head: Ident (. Ident)*
        while self.peek_nth_kind(n) == CsSyntaxKind::Dot
            && self.peek_nth_kind(n + 1) == CsSyntaxKind::Ident
        {
            n += 2;
        }
        // Optional array suffix
        if self.peek_nth_kind(n) == CsSyntaxKind::LBracket
            && self.peek_nth_kind(n + 1) == CsSyntaxKind::RBracket
        {
            n += 2;
        }
        self.peek_nth_kind(n) == CsSyntaxKind::Ident
    }

    fn parse_local_decl_stmt(&mut self) {
        self.builder.start_node(CsSyntaxKind::LocalDeclStmt);
        self.parse_type_ref();
        self.consume_trivia();
        self.expect(CsSyntaxKind::Ident);
        self.consume_trivia();
        if self.current_kind() == CsSyntaxKind::Eq {
            self.bump();
            self.consume_trivia();
            self.parse_expr();
            self.consume_trivia();
        }
        self.expect(CsSyntaxKind::Semicolon);
        self.builder.finish_node();
    }

    fn parse_return_stmt(&mut self) {
        self.builder.start_node(CsSyntaxKind::ReturnStmt);
        self.bump(); // return
        if self.peek_kind() != CsSyntaxKind::Semicolon {
            self.consume_trivia();
            self.parse_expr();
        }
        self.consume_trivia();
        self.expect(CsSyntaxKind::Semicolon);
        self.builder.finish_node();
    }

    fn parse_throw_stmt(&mut self) {
        self.builder.start_node(CsSyntaxKind::ThrowStmt);
        self.bump(); // throw
        if self.peek_kind() != CsSyntaxKind::Semicolon {
            self.consume_trivia();
            self.parse_expr();
        }
        self.consume_trivia();
        self.expect(CsSyntaxKind::Semicolon);
        self.builder.finish_node();
    }

    fn parse_keyword_stmt(&mut self, kind: CsSyntaxKind) {
        self.builder.start_node(kind);
        self.bump();
        self.consume_trivia();
        self.expect(CsSyntaxKind::Semicolon);
        self.builder.finish_node();
    }

    fn parse_if_stmt(&mut self) {
        self.builder.start_node(CsSyntaxKind::IfStmt);
        self.bump(); // if
        self.consume_trivia();
        self.expect(CsSyntaxKind::LParen);
        self.consume_trivia();
        self.parse_expr();
        self.consume_trivia();
        self.expect(CsSyntaxKind::RParen);
        self.consume_trivia();
        self.parse_statement();
        if self.peek_kind() == CsSyntaxKind::ElseKw {
            self.consume_trivia();
            self.builder.start_node(CsSyntaxKind::ElseClause);
            self.bump(); // else
            self.consume_trivia();
            self.parse_statement();
            self.builder.finish_node();
        }
        self.builder.finish_node();
    }

    fn parse_while_stmt(&mut self) {
        self.builder.start_node(CsSyntaxKind::WhileStmt);
        self.bump(); // while
        self.consume_trivia();
        self.expect(CsSyntaxKind::LParen);
        self.consume_trivia();
        self.parse_expr();
        self.consume_trivia();
        self.expect(CsSyntaxKind::RParen);
        self.consume_trivia();
        self.parse_statement();
        self.builder.finish_node();
    }

    fn parse_do_stmt(&mut self) {
        self.builder.start_node(CsSyntaxKind::DoStmt);
        self.bump(); // do
        self.consume_trivia();
        self.parse_statement();
        self.consume_trivia();
        self.expect(CsSyntaxKind::WhileKw);
        self.consume_trivia();
        self.expect(CsSyntaxKind::LParen);
        self.consume_trivia();
        self.parse_expr();
        self.consume_trivia();
        self.expect(CsSyntaxKind::RParen);
        self.consume_trivia();
        self.expect(CsSyntaxKind::Semicolon);
        self.builder.finish_node();
    }

    /// `using (<resource>) <stmt>` — the resource is kept flat.
    fn parse_using_stmt(&mut self) {
        self.builder.start_node(CsSyntaxKind::UsingStmt);
        self.bump(); // using
        self.consume_trivia();
        self.expect(CsSyntaxKind::LParen);
        let mut depth = 1usize;
        while !self.at_end() && depth > 0 {
            match self.current_kind() {
                CsSyntaxKind::LParen => depth += 1,
                CsSyntaxKind::RParen => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                }
                _ => {}
            }
            self.bump();
        }
        self.expect(CsSyntaxKind::RParen);
        self.consume_trivia();
        self.parse_statement();
        self.builder.finish_node();
    }

    /// `switch (<expr>) { ... }` — the section body is kept flat; the
    /// analyzers only need the statement kind, not its internals.
    fn parse_switch_stmt(&mut self) {
        self.builder.start_node(CsSyntaxKind::SwitchStmt);
        self.bump(); // switch
        self.consume_trivia();
        self.expect(CsSyntaxKind::LParen);
        self.consume_trivia();
        self.parse_expr();
        self.consume_trivia();
        self.expect(CsSyntaxKind::RParen);
        self.consume_trivia();
        self.expect(CsSyntaxKind::LBrace);
        let mut depth = 1usize;
        while !self.at_end() && depth > 0 {
            match self.current_kind() {
                CsSyntaxKind::LBrace => depth += 1,
                CsSyntaxKind::RBrace => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                }
                _ => {}
            }
            self.bump();
        }
        self.expect(CsSyntaxKind::RBrace);
        self.builder.finish_node();
    }

    fn parse_expr_stmt(&mut self) {
        self.builder.start_node(CsSyntaxKind::ExprStmt);
        let checkpoint = self.builder.checkpoint();
        self.parse_expr();
        if self.peek_kind() == CsSyntaxKind::Eq {
            // Simple assignment, e.g. `x = 5;`
            self.builder.start_node_at(checkpoint, CsSyntaxKind::BinaryExpr);
            self.consume_trivia();
            self.bump(); // =
            self.consume_trivia();
            self.parse_expr();
            self.builder.finish_node();
        }
        self.consume_trivia();
        self.expect(CsSyntaxKind::Semicolon);
        self.builder.finish_node();
    }

    // === expressions ===

    fn parse_expr(&mut self) {
        self.parse_binary_expr(0);
    }

    fn parse_binary_expr(&mut self, min_precedence: u8) {
        let checkpoint = self.builder.checkpoint();
        self.parse_unary_expr();

        loop {
            let Some(precedence) = binary_precedence(self.peek_kind()) else {
                break;
            };
            if precedence < min_precedence {
                break;
            }
            self.builder.start_node_at(checkpoint, CsSyntaxKind::BinaryExpr);
            self.consume_trivia();
            self.bump(); // operator
            self.consume_trivia();
            self.parse_binary_expr(precedence + 1);
            self.builder.finish_node();
        }
    }

    fn parse_unary_expr(&mut self) {
        match self.current_kind() {
            CsSyntaxKind::Bang | CsSyntaxKind::Minus => {
                self.builder.start_node(CsSyntaxKind::UnaryExpr);
                self.bump();
                self.consume_trivia();
                self.parse_unary_expr();
                self.builder.finish_node();
            }
            _ => self.parse_postfix_expr(),
        }
    }

    fn parse_postfix_expr(&mut self) {
        let checkpoint = self.builder.checkpoint();
        self.parse_primary_expr();

        loop {
            match self.peek_kind() {
                CsSyntaxKind::Dot => {
                    self.builder.start_node_at(checkpoint, CsSyntaxKind::MemberExpr);
                    self.consume_trivia();
                    self.bump(); // .
                    self.consume_trivia();
                    self.expect(CsSyntaxKind::Ident);
                    self.builder.finish_node();
                }
                CsSyntaxKind::LParen => {
                    self.builder.start_node_at(checkpoint, CsSyntaxKind::CallExpr);
                    self.consume_trivia();
                    self.parse_arg_list();
                    self.builder.finish_node();
                }
                _ => break,
            }
        }
    }

    fn parse_primary_expr(&mut self) {
        match self.current_kind() {
            CsSyntaxKind::IntLiteral
            | CsSyntaxKind::StringLiteral
            | CsSyntaxKind::CharLiteral
            | CsSyntaxKind::TrueKw
            | CsSyntaxKind::FalseKw
            | CsSyntaxKind::NullKw => {
                self.builder.start_node(CsSyntaxKind::LiteralExpr);
                self.bump();
                self.builder.finish_node();
            }
            CsSyntaxKind::Ident => {
                self.builder.start_node(CsSyntaxKind::NameExpr);
                self.bump();
                self.builder.finish_node();
            }
            CsSyntaxKind::LParen => {
                self.builder.start_node(CsSyntaxKind::ParenExpr);
                self.bump(); // (
                self.consume_trivia();
                self.parse_expr();
                self.consume_trivia();
                self.expect(CsSyntaxKind::RParen);
                self.builder.finish_node();
            }
            CsSyntaxKind::NewKw => {
                self.builder.start_node(CsSyntaxKind::ObjectCreationExpr);
                self.bump(); // new
                self.consume_trivia();
                self.parse_type_ref();
                if self.peek_kind() == CsSyntaxKind::LParen {
                    self.consume_trivia();
                    self.parse_arg_list();
                }
                self.builder.finish_node();
            }
            _ => self.error_and_recover(),
        }
    }

    fn parse_arg_list(&mut self) {
        self.builder.start_node(CsSyntaxKind::ArgList);
        self.expect(CsSyntaxKind::LParen);
        let mut iterations = 0;
        loop {
            iterations += 1;
            if iterations > 10_000 {
                break;
            }
            if self.at_trivia() {
                self.consume_trivia();
                continue;
            }
            match self.current_kind() {
                CsSyntaxKind::RParen | CsSyntaxKind::Eof => break,
                CsSyntaxKind::Comma => self.bump(),
                _ => self.parse_expr(),
            }
        }
        self.expect(CsSyntaxKind::RParen);
        self.builder.finish_node();
    }
}

/// Binary operator precedence; higher binds tighter.
fn binary_precedence(kind: CsSyntaxKind) -> Option<u8> {
    let precedence = match kind {
        CsSyntaxKind::PipePipe => 1,
        CsSyntaxKind::AmpAmp => 2,
        CsSyntaxKind::EqEq | CsSyntaxKind::Neq => 3,
        CsSyntaxKind::Lt | CsSyntaxKind::Gt | CsSyntaxKind::LtEq | CsSyntaxKind::GtEq => 4,
        CsSyntaxKind::Plus | CsSyntaxKind::Minus => 5,
        CsSyntaxKind::Star | CsSyntaxKind::Slash | CsSyntaxKind::Percent => 6,
        _ => return None,
    };
    Some(precedence)
}
