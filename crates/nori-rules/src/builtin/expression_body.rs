//! Expression-bodied member simplification
//!
//! Flags methods and getter-only properties whose block body is a single
//! `return <expr>;` (or, for void methods, a single expression statement)
//! and rewrites them to the compact `=> <expr>;` form.

use std::fmt;

use rowan::{GreenNode, GreenToken, Language, NodeOrToken};
use tracing::trace;

use nori_core::cst::ast::{AstNode, Block, ExprStmt, MethodDecl, PropertyDecl, ReturnStmt};
use nori_core::cst::edit::{GreenElement, TreeEdit};
use nori_core::cst::trivia::{has_comments, has_trailing_comment_on_line};
use nori_core::cst::{CsLanguage, CsSyntaxKind, CsSyntaxNode};
use nori_core::{
    Applicability, CodeSuggestion, Diagnostic, FixSafety, Result, RuleCategory, RuleContext,
    RuleMetadata, Severity, SyntaxRule,
};

/// Stable rule identifier
pub const RULE_ID: &str = "builtin/style/expression-body";

/// Diagnostic message template; substituted with member kind and name.
const MESSAGE: &str = "{0} '{1}' can be expression-bodied";

/// Which flavor of member matched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    Method,
    Property,
}

impl fmt::Display for MemberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemberKind::Method => write!(f, "Method"),
            MemberKind::Property => write!(f, "Property"),
        }
    }
}

/// Shape of the single statement the matcher extracted
#[derive(Debug, Clone)]
enum MatchShape {
    /// `return <expr>;` — the expression survives, the keyword goes
    Return(CsSyntaxNode),
    /// A bare expression statement in a void method
    Expression(CsSyntaxNode),
    /// The sole statement is itself a block; extracted so the validator
    /// can name the rejection
    NestedBlock,
}

/// A member that structurally qualifies for the compact form
#[derive(Debug, Clone)]
pub struct ExpressionBodyMatch {
    member: CsSyntaxNode,
    body: Block,
    kind: MemberKind,
    name: String,
    shape: MatchShape,
}

impl ExpressionBodyMatch {
    pub fn member(&self) -> &CsSyntaxNode {
        &self.member
    }

    pub fn member_kind(&self) -> MemberKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Why a structurally matching member must not be rewritten
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Comments inside the member would be silently discarded
    CommentsPresent,
    /// An accessor attribute has no placement in the compact form
    AttributePresent,
    /// Statements follow a `return` in the same block
    UnreachableCode,
    /// The inner block may carry scoping semantics of its own
    NestedBlock,
}

/// Structural matcher: does this node qualify for expression-bodying?
///
/// Pure; inspects only `MethodDecl` and `PropertyDecl` nodes. Members
/// already in arrow form never match, so the pipeline is idempotent.
/// Control-flow statements, `throw`, and declarations never qualify, with
/// or without braces around their embedded statement.
pub fn match_member(node: &CsSyntaxNode) -> Option<ExpressionBodyMatch> {
    match node.kind() {
        CsSyntaxKind::MethodDecl => match_method(MethodDecl::cast(node.clone())?),
        CsSyntaxKind::PropertyDecl => match_property(PropertyDecl::cast(node.clone())?),
        _ => None,
    }
}

fn match_method(method: MethodDecl) -> Option<ExpressionBodyMatch> {
    if method.arrow_clause().is_some() {
        return None;
    }
    let body = method.body()?;
    let statement = sole_statement(&body)?;

    let shape = match statement.kind() {
        CsSyntaxKind::ReturnStmt => {
            let expr = ReturnStmt::cast(statement)?.expr()?;
            MatchShape::Return(expr)
        }
        CsSyntaxKind::ExprStmt if method.is_void() => {
            let expr = ExprStmt::cast(statement)?.expr()?;
            MatchShape::Expression(expr)
        }
        CsSyntaxKind::Block => MatchShape::NestedBlock,
        _ => return None,
    };

    Some(ExpressionBodyMatch {
        member: method.syntax().clone(),
        name: method.name()?,
        body,
        kind: MemberKind::Method,
        shape,
    })
}

fn match_property(property: PropertyDecl) -> Option<ExpressionBodyMatch> {
    if property.arrow_clause().is_some() {
        return None;
    }
    let accessor_list = property.accessor_list()?;
    let accessors: Vec<_> = accessor_list.accessors().collect();

    // Exactly one accessor, a getter with a real body. Auto-implemented
    // `{ get; set; }` and get+set pairs stay as they are.
    let [getter] = accessors.as_slice() else {
        return None;
    };
    if !getter.is_getter() || getter.arrow_clause().is_some() {
        return None;
    }
    let body = getter.body()?;
    let statement = sole_statement(&body)?;

    let shape = match statement.kind() {
        CsSyntaxKind::ReturnStmt => {
            let expr = ReturnStmt::cast(statement)?.expr()?;
            MatchShape::Return(expr)
        }
        CsSyntaxKind::Block => MatchShape::NestedBlock,
        _ => return None,
    };

    Some(ExpressionBodyMatch {
        member: property.syntax().clone(),
        name: property.name()?,
        body,
        kind: MemberKind::Property,
        shape,
    })
}

fn sole_statement(block: &Block) -> Option<CsSyntaxNode> {
    let mut statements = block.statements();
    let first = statements.next()?;
    if statements.next().is_some() {
        return None;
    }
    Some(first)
}

/// Safety validation over a structural match
pub fn validate(candidate: &ExpressionBodyMatch) -> std::result::Result<(), Rejection> {
    if matches!(candidate.shape, MatchShape::NestedBlock) {
        return Err(Rejection::NestedBlock);
    }

    if accessor_has_attribute(&candidate.member) {
        return Err(Rejection::AttributePresent);
    }

    if has_unreachable_code(&candidate.body) {
        return Err(Rejection::UnreachableCode);
    }

    // Any comment inside the member would be dropped by the rewrite, as
    // would one trailing on the member's closing line. Comments BEFORE the
    // member are siblings in the class body and survive untouched.
    if has_comments(&candidate.member) || has_trailing_comment_on_line(&candidate.member) {
        return Err(Rejection::CommentsPresent);
    }

    Ok(())
}

fn accessor_has_attribute(member: &CsSyntaxNode) -> bool {
    let Some(property) = PropertyDecl::cast(member.clone()) else {
        return false;
    };
    let Some(accessor_list) = property.accessor_list() else {
        return false;
    };
    accessor_list
        .accessors()
        .any(|accessor| accessor.attribute_lists().next().is_some())
}

/// `return x; <more>` — excluded by the one-statement extraction already,
/// re-checked syntactically here ("return ends a block"; no control-flow
/// analysis).
fn has_unreachable_code(body: &Block) -> bool {
    let mut seen_return = false;
    for statement in body.statements() {
        if seen_return {
            return true;
        }
        if statement.kind() == CsSyntaxKind::ReturnStmt {
            seen_return = true;
        }
    }
    false
}

/// Construct the compact member: everything up to the body is kept, the
/// body (or accessor list) becomes ` => <expr>;`.
pub fn rewrite(candidate: &ExpressionBodyMatch) -> GreenNode {
    let expr = match &candidate.shape {
        MatchShape::Return(expr) | MatchShape::Expression(expr) => expr,
        // Rejected by validate(); matcher shape never reaches the rewriter
        MatchShape::NestedBlock => unreachable!("nested blocks are rejected before rewriting"),
    };

    let cut_kind = match candidate.kind {
        MemberKind::Method => CsSyntaxKind::Block,
        MemberKind::Property => CsSyntaxKind::AccessorList,
    };

    let mut children: Vec<GreenElement> = Vec::new();
    for element in candidate.member.children_with_tokens() {
        if element.as_node().map(|n| n.kind()) == Some(cut_kind) {
            break;
        }
        children.push(to_green(&element));
    }
    // The body's leading trivia goes with it; a single space separates the
    // header from the arrow.
    while matches!(&children.last(), Some(NodeOrToken::Token(t))
        if CsLanguage::kind_from_raw(t.kind()).is_trivia())
    {
        children.pop();
    }

    children.push(green_token(CsSyntaxKind::Whitespace, " "));
    children.push(NodeOrToken::Node(GreenNode::new(
        CsLanguage::kind_to_raw(CsSyntaxKind::ArrowClause),
        [
            green_token(CsSyntaxKind::Arrow, "=>"),
            green_token(CsSyntaxKind::Whitespace, " "),
            NodeOrToken::Node(expr.green().into_owned()),
            green_token(CsSyntaxKind::Semicolon, ";"),
        ],
    )));

    GreenNode::new(CsLanguage::kind_to_raw(candidate.member.kind()), children)
}

fn to_green(element: &nori_core::CsSyntaxElement) -> GreenElement {
    match element {
        NodeOrToken::Node(node) => NodeOrToken::Node(node.green().into_owned()),
        NodeOrToken::Token(token) => NodeOrToken::Token(token.green().to_owned()),
    }
}

fn green_token(kind: CsSyntaxKind, text: &str) -> GreenElement {
    NodeOrToken::Token(GreenToken::new(CsLanguage::kind_to_raw(kind), text))
}

/// The rule: diagnose qualifying members, rewrite on request
pub struct SimplifyExpressionBodiedMember {
    metadata: RuleMetadata,
}

impl Default for SimplifyExpressionBodiedMember {
    fn default() -> Self {
        Self::new()
    }
}

impl SimplifyExpressionBodiedMember {
    pub fn new() -> Self {
        Self {
            metadata: RuleMetadata {
                id: RULE_ID.to_string(),
                name: "SimplifyExpressionBodiedMember".to_string(),
                description: "Single-statement bodies can use the expression-bodied form"
                    .to_string(),
                severity: Severity::Warning,
                category: RuleCategory::Style,
                fix_safety: FixSafety::Safe,
            },
        }
    }

    fn message(kind: MemberKind, name: &str) -> String {
        MESSAGE
            .replacen("{0}", &kind.to_string(), 1)
            .replacen("{1}", name, 1)
    }

    /// Re-resolve a diagnostic's member in the current tree and re-run the
    /// matcher and validator against it.
    fn revalidate(
        ctx: &RuleContext<'_>,
        diagnostic: &Diagnostic,
    ) -> Option<ExpressionBodyMatch> {
        let node = ctx
            .document
            .covering_node(diagnostic.location.offset, diagnostic.location.length)?;
        let member = node.ancestors().find(|n| {
            matches!(
                n.kind(),
                CsSyntaxKind::MethodDecl | CsSyntaxKind::PropertyDecl
            )
        })?;
        let candidate = match_member(&member)?;
        if validate(&candidate).is_err() {
            return None;
        }
        Some(candidate)
    }
}

impl SyntaxRule for SimplifyExpressionBodiedMember {
    fn metadata(&self) -> &RuleMetadata {
        &self.metadata
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();

        for node in ctx.document.root().descendants() {
            let Some(candidate) = match_member(&node) else {
                continue;
            };
            if let Err(rejection) = validate(&candidate) {
                trace!(member = %candidate.name(), ?rejection, "suppressing candidate");
                continue;
            }

            let location = ctx.document.location_of(&candidate.member);
            let replacement = rewrite(&candidate);
            let suggestion = CodeSuggestion::new(
                "Use the expression-bodied form",
                nori_core::CsSyntaxNode::new_root(replacement).text().to_string(),
                location.clone(),
                Applicability::Always,
            );

            diagnostics.push(
                Diagnostic::new(
                    RULE_ID,
                    self.metadata.severity,
                    Self::message(candidate.member_kind(), candidate.name()),
                    location,
                )
                .with_code_snippet(ctx.document.line_snippet(&candidate.member))
                .with_suggestion(suggestion),
            );
        }

        diagnostics
    }

    fn fix(&self, ctx: &RuleContext<'_>, diagnostic: &Diagnostic) -> Result<Option<TreeEdit>> {
        let Some(candidate) = Self::revalidate(ctx, diagnostic) else {
            trace!("diagnostic is stale; fix is a no-op");
            return Ok(None);
        };

        Ok(Some(TreeEdit::Replace {
            target: candidate.member.clone(),
            replacement: rewrite(&candidate),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nori_core::cst::parse_cs;

    fn first_candidate(source: &str) -> Option<ExpressionBodyMatch> {
        let (cst, errors) = parse_cs(source);
        assert!(errors.is_empty(), "lexer errors: {errors:?}");
        cst.descendants().find_map(|n| match_member(&n))
    }

    #[test]
    fn matches_single_return_method() {
        let candidate =
            first_candidate("class C { int MyMethod() { return 5; } }").expect("should match");
        assert_eq!(candidate.member_kind(), MemberKind::Method);
        assert_eq!(candidate.name(), "MyMethod");
        assert!(validate(&candidate).is_ok());
    }

    #[test]
    fn matches_void_method_with_expression_statement() {
        let candidate =
            first_candidate("class C { void M() { Console.WriteLine(); } }").expect("should match");
        assert!(validate(&candidate).is_ok());
    }

    #[test]
    fn throw_statement_never_matches() {
        assert!(first_candidate("class C { void M() { throw new NotImplementedException(); } }")
            .is_none());
    }

    #[test]
    fn multi_statement_body_never_matches() {
        assert!(first_candidate(
            "class C { int M() { var x = 1; return x; } }"
        )
        .is_none());
    }

    #[test]
    fn bare_control_flow_never_matches() {
        for source in [
            "class C { int M() { if (x) return 5; } }",
            "class C { int M() { if (x) { return 5; } } }",
            "class C { int M() { while (x) x(); } }",
            "class C { int M() { do x(); while (y); } }",
            "class C { void M() { using (r) x(); } }",
            "class C { int M() { switch (x) { default: return 0; } } }",
        ] {
            assert!(first_candidate(source).is_none(), "matched {source:?}");
        }
    }

    #[test]
    fn arrow_member_is_idempotent() {
        assert!(first_candidate("class C { int M() => 5; }").is_none());
        assert!(first_candidate("class C { string P => \"x\"; }").is_none());
    }

    #[test]
    fn auto_property_never_matches() {
        assert!(first_candidate("class C { int P { get; set; } }").is_none());
    }

    #[test]
    fn get_set_pair_never_matches() {
        assert!(first_candidate(
            "class C { int P { get { return x; } set { x = value; } } }"
        )
        .is_none());
    }

    #[test]
    fn nested_block_rejected_by_validator() {
        let candidate =
            first_candidate("class C { int M() { { return 5; } } }").expect("matcher extracts");
        assert_eq!(validate(&candidate), Err(Rejection::NestedBlock));
    }

    #[test]
    fn comments_rejected_by_validator() {
        let candidate = first_candidate("class C { int M() { return 5; /* comments */ } }")
            .expect("matcher extracts");
        assert_eq!(validate(&candidate), Err(Rejection::CommentsPresent));
    }

    #[test]
    fn accessor_attribute_rejected_by_validator() {
        let candidate = first_candidate("class C { int P { [Test] get { return 5; } } }")
            .expect("matcher extracts");
        assert_eq!(validate(&candidate), Err(Rejection::AttributePresent));
    }

    #[test]
    fn rewrites_method_to_arrow_form() {
        let candidate = first_candidate("class C { int MyMethod() { return 5; } }").unwrap();
        let green = rewrite(&candidate);
        assert_eq!(
            nori_core::CsSyntaxNode::new_root(green).text().to_string(),
            "int MyMethod() => 5;"
        );
    }

    #[test]
    fn rewrites_multiline_property() {
        let candidate = first_candidate(
            "class C {\n    string MyProperty \n    { \n        get \n        {\n            return \"myString\";\n        } \n    }\n}",
        )
        .unwrap();
        let green = rewrite(&candidate);
        assert_eq!(
            nori_core::CsSyntaxNode::new_root(green).text().to_string(),
            "string MyProperty => \"myString\";"
        );
    }

    #[test]
    fn rewrites_void_method_reusing_expression() {
        let candidate = first_candidate("class C { void M() { Console.WriteLine(); } }").unwrap();
        let green = rewrite(&candidate);
        assert_eq!(
            nori_core::CsSyntaxNode::new_root(green).text().to_string(),
            "void M() => Console.WriteLine();"
        );
    }
}
