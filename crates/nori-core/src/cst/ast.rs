//! Typed AST layer over the CST
//!
//! Ergonomic, type-safe wrappers over raw CST nodes. Each wrapper
//! implements `cast()` to safely convert from a CST node.
//!
//! # Example
//!
//! ```ignore
//! use nori_core::cst::{parse_cs, ast::{AstNode, MethodDecl}};
//!
//! let (cst, _) = parse_cs("class C { int M() { return 5; } }");
//! let method = cst.descendants().find_map(MethodDecl::cast).unwrap();
//! assert_eq!(method.name().unwrap(), "M");
//! ```

use super::{CsSyntaxKind, CsSyntaxNode, CsSyntaxToken};

/// Helper trait for casting CST nodes to typed wrappers
pub trait AstNode: Sized {
    fn can_cast(kind: CsSyntaxKind) -> bool;
    fn cast(node: CsSyntaxNode) -> Option<Self>;
    fn syntax(&self) -> &CsSyntaxNode;
}

/// Expression node kinds.
pub fn is_expression(kind: CsSyntaxKind) -> bool {
    matches!(
        kind,
        CsSyntaxKind::LiteralExpr
            | CsSyntaxKind::NameExpr
            | CsSyntaxKind::ParenExpr
            | CsSyntaxKind::UnaryExpr
            | CsSyntaxKind::BinaryExpr
            | CsSyntaxKind::CallExpr
            | CsSyntaxKind::MemberExpr
            | CsSyntaxKind::ObjectCreationExpr
    )
}

fn token_of_kind(parent: &CsSyntaxNode, kind: CsSyntaxKind) -> Option<CsSyntaxToken> {
    parent
        .children_with_tokens()
        .filter_map(|e| e.into_token())
        .find(|t| t.kind() == kind)
}

fn first_expr_child(parent: &CsSyntaxNode) -> Option<CsSyntaxNode> {
    parent.children().find(|n| is_expression(n.kind()))
}

fn first_stmt_child(parent: &CsSyntaxNode) -> Option<CsSyntaxNode> {
    parent.children().find(|n| n.kind().is_statement())
}

macro_rules! ast_node {
    ($(#[$attr:meta])* $name:ident, $kind:expr) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $name {
            syntax: CsSyntaxNode,
        }

        impl AstNode for $name {
            fn can_cast(kind: CsSyntaxKind) -> bool {
                kind == $kind
            }

            fn cast(node: CsSyntaxNode) -> Option<Self> {
                if Self::can_cast(node.kind()) {
                    Some(Self { syntax: node })
                } else {
                    None
                }
            }

            fn syntax(&self) -> &CsSyntaxNode {
                &self.syntax
            }
        }
    };
}

// ============================================================================
// Source structure
// ============================================================================

ast_node!(
    /// Root of a parsed file
    SourceFile,
    CsSyntaxKind::SourceFile
);

impl SourceFile {
    /// All class declarations, including those nested in namespaces.
    pub fn classes(&self) -> impl Iterator<Item = ClassDecl> {
        self.syntax.descendants().filter_map(ClassDecl::cast)
    }
}

ast_node!(ClassDecl, CsSyntaxKind::ClassDecl);

impl ClassDecl {
    pub fn name(&self) -> Option<String> {
        token_of_kind(&self.syntax, CsSyntaxKind::Ident).map(|t| t.text().to_string())
    }

    pub fn methods(&self) -> impl Iterator<Item = MethodDecl> {
        self.syntax.children().filter_map(MethodDecl::cast)
    }

    pub fn properties(&self) -> impl Iterator<Item = PropertyDecl> {
        self.syntax.children().filter_map(PropertyDecl::cast)
    }
}

// ============================================================================
// Members
// ============================================================================

ast_node!(
    /// Method declaration. The name identifier is a direct token child; the
    /// return type's tokens live inside the `TypeRef` child.
    MethodDecl,
    CsSyntaxKind::MethodDecl
);

impl MethodDecl {
    pub fn name(&self) -> Option<String> {
        token_of_kind(&self.syntax, CsSyntaxKind::Ident).map(|t| t.text().to_string())
    }

    pub fn return_type(&self) -> Option<TypeRef> {
        self.syntax.children().find_map(TypeRef::cast)
    }

    pub fn is_void(&self) -> bool {
        self.return_type().map(|t| t.is_void()).unwrap_or(false)
    }

    pub fn param_list(&self) -> Option<CsSyntaxNode> {
        self.syntax
            .children()
            .find(|n| n.kind() == CsSyntaxKind::ParamList)
    }

    pub fn body(&self) -> Option<Block> {
        self.syntax.children().find_map(Block::cast)
    }

    pub fn arrow_clause(&self) -> Option<ArrowClause> {
        self.syntax.children().find_map(ArrowClause::cast)
    }
}

ast_node!(PropertyDecl, CsSyntaxKind::PropertyDecl);

impl PropertyDecl {
    pub fn name(&self) -> Option<String> {
        token_of_kind(&self.syntax, CsSyntaxKind::Ident).map(|t| t.text().to_string())
    }

    pub fn accessor_list(&self) -> Option<AccessorList> {
        self.syntax.children().find_map(AccessorList::cast)
    }

    pub fn arrow_clause(&self) -> Option<ArrowClause> {
        self.syntax.children().find_map(ArrowClause::cast)
    }
}

ast_node!(AccessorList, CsSyntaxKind::AccessorList);

impl AccessorList {
    pub fn accessors(&self) -> impl Iterator<Item = AccessorDecl> {
        self.syntax.children().filter_map(AccessorDecl::cast)
    }
}

ast_node!(AccessorDecl, CsSyntaxKind::AccessorDecl);

impl AccessorDecl {
    pub fn is_getter(&self) -> bool {
        token_of_kind(&self.syntax, CsSyntaxKind::GetKw).is_some()
    }

    pub fn is_setter(&self) -> bool {
        token_of_kind(&self.syntax, CsSyntaxKind::SetKw).is_some()
    }

    pub fn body(&self) -> Option<Block> {
        self.syntax.children().find_map(Block::cast)
    }

    pub fn arrow_clause(&self) -> Option<ArrowClause> {
        self.syntax.children().find_map(ArrowClause::cast)
    }

    /// `get;` / `set;` with no body.
    pub fn is_auto(&self) -> bool {
        self.body().is_none() && self.arrow_clause().is_none()
    }

    pub fn attribute_lists(&self) -> impl Iterator<Item = CsSyntaxNode> {
        self.syntax
            .children()
            .filter(|n| n.kind() == CsSyntaxKind::AttributeList)
    }
}

ast_node!(ArrowClause, CsSyntaxKind::ArrowClause);

impl ArrowClause {
    pub fn expr(&self) -> Option<CsSyntaxNode> {
        first_expr_child(&self.syntax)
    }
}

ast_node!(TypeRef, CsSyntaxKind::TypeRef);

impl TypeRef {
    pub fn is_void(&self) -> bool {
        token_of_kind(&self.syntax, CsSyntaxKind::VoidKw).is_some()
    }

    pub fn text(&self) -> String {
        self.syntax.text().to_string()
    }
}

// ============================================================================
// Statements
// ============================================================================

ast_node!(Block, CsSyntaxKind::Block);

impl Block {
    /// Direct statement children, in source order. A nested block counts as
    /// a statement here.
    pub fn statements(&self) -> impl Iterator<Item = CsSyntaxNode> {
        self.syntax.children().filter(|n| n.kind().is_statement())
    }

    pub fn statement_count(&self) -> usize {
        self.statements().count()
    }
}

ast_node!(ReturnStmt, CsSyntaxKind::ReturnStmt);

impl ReturnStmt {
    pub fn expr(&self) -> Option<CsSyntaxNode> {
        first_expr_child(&self.syntax)
    }
}

ast_node!(ExprStmt, CsSyntaxKind::ExprStmt);

impl ExprStmt {
    pub fn expr(&self) -> Option<CsSyntaxNode> {
        first_expr_child(&self.syntax)
    }
}

ast_node!(IfStmt, CsSyntaxKind::IfStmt);

impl IfStmt {
    pub fn condition(&self) -> Option<CsSyntaxNode> {
        first_expr_child(&self.syntax)
    }

    pub fn then_branch(&self) -> Option<CsSyntaxNode> {
        first_stmt_child(&self.syntax)
    }

    pub fn else_clause(&self) -> Option<ElseClause> {
        self.syntax.children().find_map(ElseClause::cast)
    }
}

ast_node!(ElseClause, CsSyntaxKind::ElseClause);

impl ElseClause {
    pub fn statement(&self) -> Option<CsSyntaxNode> {
        first_stmt_child(&self.syntax)
    }
}

// ============================================================================
// Expressions
// ============================================================================

ast_node!(LiteralExpr, CsSyntaxKind::LiteralExpr);

impl LiteralExpr {
    pub fn token(&self) -> Option<CsSyntaxToken> {
        self.syntax
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .find(|t| !t.kind().is_trivia())
    }
}

ast_node!(ParenExpr, CsSyntaxKind::ParenExpr);

impl ParenExpr {
    pub fn inner(&self) -> Option<CsSyntaxNode> {
        first_expr_child(&self.syntax)
    }
}

ast_node!(UnaryExpr, CsSyntaxKind::UnaryExpr);

impl UnaryExpr {
    pub fn operator(&self) -> Option<CsSyntaxToken> {
        self.syntax
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .find(|t| {
                matches!(t.kind(), CsSyntaxKind::Bang | CsSyntaxKind::Minus)
            })
    }

    pub fn operand(&self) -> Option<CsSyntaxNode> {
        first_expr_child(&self.syntax)
    }
}

ast_node!(BinaryExpr, CsSyntaxKind::BinaryExpr);

impl BinaryExpr {
    pub fn lhs(&self) -> Option<CsSyntaxNode> {
        first_expr_child(&self.syntax)
    }

    pub fn rhs(&self) -> Option<CsSyntaxNode> {
        self.syntax.children().filter(|n| is_expression(n.kind())).nth(1)
    }

    pub fn operator(&self) -> Option<CsSyntaxToken> {
        self.syntax
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .find(|t| !t.kind().is_trivia())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cst::parse_cs;

    fn first_method(source: &str) -> MethodDecl {
        let (cst, errors) = parse_cs(source);
        assert!(errors.is_empty(), "lexer errors: {errors:?}");
        cst.descendants()
            .find_map(MethodDecl::cast)
            .expect("no method in fixture")
    }

    #[test]
    fn method_name_and_body() {
        let method = first_method("class C\n{\n    int MyMethod()\n    {\n        return 5;\n    }\n}");
        assert_eq!(method.name().unwrap(), "MyMethod");
        assert!(!method.is_void());

        let body = method.body().unwrap();
        assert_eq!(body.statement_count(), 1);
        let stmt = body.statements().next().unwrap();
        assert_eq!(stmt.kind(), CsSyntaxKind::ReturnStmt);
    }

    #[test]
    fn void_method() {
        let method = first_method("class C { void M() { Console.WriteLine(); } }");
        assert!(method.is_void());
        let stmt = method.body().unwrap().statements().next().unwrap();
        assert_eq!(stmt.kind(), CsSyntaxKind::ExprStmt);
    }

    #[test]
    fn arrow_method_has_no_block() {
        let method = first_method("class C { int M() => 5; }");
        assert!(method.body().is_none());
        let arrow = method.arrow_clause().unwrap();
        assert_eq!(arrow.expr().unwrap().kind(), CsSyntaxKind::LiteralExpr);
    }

    #[test]
    fn property_accessors() {
        let (cst, _) = parse_cs("class C { string P { get { return \"x\"; } } }");
        let property = cst.descendants().find_map(PropertyDecl::cast).unwrap();
        assert_eq!(property.name().unwrap(), "P");
        let accessors: Vec<_> = property.accessor_list().unwrap().accessors().collect();
        assert_eq!(accessors.len(), 1);
        assert!(accessors[0].is_getter());
        assert!(!accessors[0].is_auto());
    }

    #[test]
    fn auto_property() {
        let (cst, _) = parse_cs("class C { int P { get; set; } }");
        let property = cst.descendants().find_map(PropertyDecl::cast).unwrap();
        let accessors: Vec<_> = property.accessor_list().unwrap().accessors().collect();
        assert_eq!(accessors.len(), 2);
        assert!(accessors.iter().all(|a| a.is_auto()));
    }

    #[test]
    fn if_statement_shape() {
        let (cst, _) = parse_cs("class C { void M() { if (true) { x(); } else { y(); } } }");
        let if_stmt = cst.descendants().find_map(IfStmt::cast).unwrap();
        assert_eq!(if_stmt.condition().unwrap().kind(), CsSyntaxKind::LiteralExpr);
        assert_eq!(if_stmt.then_branch().unwrap().kind(), CsSyntaxKind::Block);
        assert!(if_stmt.else_clause().is_some());
    }
}
