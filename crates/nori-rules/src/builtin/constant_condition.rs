//! Constant-condition elimination
//!
//! Flags `if` statements whose condition constant-folds to a known
//! boolean. A statically false branch is dead code: the statement is
//! removed outright, or replaced by its `else` branch. A statically true
//! condition dissolves into its `then` branch, discarding any `else`.
//! Both transforms are semantics-preserving under the language's
//! constant-folding rules, so no further validation is needed.

use rowan::{Language, NodeOrToken};
use tracing::trace;

use nori_core::cst::ast::{AstNode, IfStmt};
use nori_core::cst::edit::{GreenElement, TreeEdit, TriviaPolicy};
use nori_core::cst::{CsSyntaxKind, CsSyntaxNode};
use nori_core::{
    Applicability, CodeSuggestion, Diagnostic, FixSafety, Result, RuleCategory, RuleContext,
    RuleMetadata, Severity, SyntaxRule,
};

/// Stable rule identifiers
pub const ALWAYS_FALSE_RULE_ID: &str = "builtin/suspicious/condition-always-false";
pub const ALWAYS_TRUE_RULE_ID: &str = "builtin/suspicious/condition-always-true";

/// Find an `if` whose condition folds to `target`.
pub fn match_constant_condition(
    node: &CsSyntaxNode,
    semantics: &nori_core::SemanticModel,
    target: bool,
) -> Option<IfStmt> {
    let if_stmt = IfStmt::cast(node.clone())?;
    let condition = if_stmt.condition()?;
    let value = semantics.constant_value(&condition)?.as_bool()?;
    (value == target).then_some(if_stmt)
}

/// The statements a branch contributes when its `if` dissolves.
///
/// For a block branch that is the interior between the braces, trimmed of
/// the trivia hugging them; for a bare statement it is the statement
/// itself. No braces are ever duplicated into the parent block.
fn branch_elements(branch: &CsSyntaxNode) -> Vec<GreenElement> {
    let mut elements: Vec<GreenElement> = Vec::new();

    if branch.kind() == CsSyntaxKind::Block {
        let children: Vec<_> = branch.children_with_tokens().collect();
        for element in &children {
            match element {
                NodeOrToken::Token(token)
                    if matches!(token.kind(), CsSyntaxKind::LBrace | CsSyntaxKind::RBrace) =>
                {
                    continue;
                }
                NodeOrToken::Node(node) => elements.push(NodeOrToken::Node(node.green().into_owned())),
                NodeOrToken::Token(token) => {
                    elements.push(NodeOrToken::Token(token.green().to_owned()));
                }
            }
        }
        // Trim the trivia that hugged the braces
        while matches!(elements.first(), Some(NodeOrToken::Token(t))
            if nori_core::CsLanguage::kind_from_raw(t.kind()).is_trivia())
        {
            elements.remove(0);
        }
        while matches!(elements.last(), Some(NodeOrToken::Token(t))
            if nori_core::CsLanguage::kind_from_raw(t.kind()).is_trivia())
        {
            elements.pop();
        }
    } else {
        elements.push(NodeOrToken::Node(branch.green().into_owned()));
    }

    elements
}

/// Build the edit that eliminates a constant `if`.
fn eliminate(if_stmt: &IfStmt, condition_value: bool) -> TreeEdit {
    let target = if_stmt.syntax().clone();

    if condition_value {
        // Keep the then branch, discard any else
        let elements = if_stmt
            .then_branch()
            .map(|branch| branch_elements(&branch))
            .unwrap_or_default();
        if elements.is_empty() {
            TreeEdit::Remove {
                target,
                trivia: TriviaPolicy::KeepNone,
            }
        } else {
            TreeEdit::Splice {
                target,
                replacement: elements,
            }
        }
    } else {
        match if_stmt.else_clause().and_then(|clause| clause.statement()) {
            Some(else_branch) => {
                let elements = branch_elements(&else_branch);
                if elements.is_empty() {
                    TreeEdit::Remove {
                        target,
                        trivia: TriviaPolicy::KeepNone,
                    }
                } else {
                    TreeEdit::Splice {
                        target,
                        replacement: elements,
                    }
                }
            }
            // No else: the whole statement is dead
            None => TreeEdit::Remove {
                target,
                trivia: TriviaPolicy::KeepNone,
            },
        }
    }
}

fn splice_text(edit: &TreeEdit) -> String {
    edit.replacement_text()
}

/// Shared implementation for the false/true rule pair
struct ConstantConditionRule {
    metadata: RuleMetadata,
    target: bool,
    message: &'static str,
}

impl ConstantConditionRule {
    fn check(&self, ctx: &RuleContext<'_>) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();

        for node in ctx.document.root().descendants() {
            let Some(if_stmt) = match_constant_condition(&node, ctx.semantics, self.target) else {
                continue;
            };

            let location = ctx.document.location_of(if_stmt.syntax());
            let edit = eliminate(&if_stmt, self.target);
            let suggestion = CodeSuggestion::new(
                if self.target {
                    "Replace the statement with its then branch"
                } else {
                    "Remove the dead branch"
                },
                splice_text(&edit),
                location.clone(),
                Applicability::Always,
            );

            diagnostics.push(
                Diagnostic::new(
                    self.metadata.id.clone(),
                    self.metadata.severity,
                    self.message,
                    location,
                )
                .with_code_snippet(ctx.document.line_snippet(if_stmt.syntax()))
                .with_suggestion(suggestion),
            );
        }

        diagnostics
    }

    fn fix(&self, ctx: &RuleContext<'_>, diagnostic: &Diagnostic) -> Result<Option<TreeEdit>> {
        let Some(node) = ctx
            .document
            .covering_node(diagnostic.location.offset, diagnostic.location.length)
        else {
            return Ok(None);
        };
        let Some(if_stmt) = node
            .ancestors()
            .find_map(|n| match_constant_condition(&n, ctx.semantics, self.target))
        else {
            trace!("diagnostic is stale; fix is a no-op");
            return Ok(None);
        };
        Ok(Some(eliminate(&if_stmt, self.target)))
    }
}

/// `if (<always false>)` — the branch never runs
pub struct ConditionIsAlwaysFalse {
    inner: ConstantConditionRule,
}

impl Default for ConditionIsAlwaysFalse {
    fn default() -> Self {
        Self::new()
    }
}

impl ConditionIsAlwaysFalse {
    pub fn new() -> Self {
        Self {
            inner: ConstantConditionRule {
                metadata: RuleMetadata {
                    id: ALWAYS_FALSE_RULE_ID.to_string(),
                    name: "ConditionIsAlwaysFalse".to_string(),
                    description: "The condition is a compile-time constant false; the branch is dead"
                        .to_string(),
                    severity: Severity::Warning,
                    category: RuleCategory::Suspicious,
                    fix_safety: FixSafety::Safe,
                },
                target: false,
                message: "Condition is always false",
            },
        }
    }
}

impl SyntaxRule for ConditionIsAlwaysFalse {
    fn metadata(&self) -> &RuleMetadata {
        &self.inner.metadata
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Vec<Diagnostic> {
        self.inner.check(ctx)
    }

    fn fix(&self, ctx: &RuleContext<'_>, diagnostic: &Diagnostic) -> Result<Option<TreeEdit>> {
        self.inner.fix(ctx, diagnostic)
    }
}

/// `if (<always true>)` — the test is pointless and any else is dead
pub struct ConditionIsAlwaysTrue {
    inner: ConstantConditionRule,
}

impl Default for ConditionIsAlwaysTrue {
    fn default() -> Self {
        Self::new()
    }
}

impl ConditionIsAlwaysTrue {
    pub fn new() -> Self {
        Self {
            inner: ConstantConditionRule {
                metadata: RuleMetadata {
                    id: ALWAYS_TRUE_RULE_ID.to_string(),
                    name: "ConditionIsAlwaysTrue".to_string(),
                    description: "The condition is a compile-time constant true; the test is pointless"
                        .to_string(),
                    severity: Severity::Warning,
                    category: RuleCategory::Suspicious,
                    fix_safety: FixSafety::Safe,
                },
                target: true,
                message: "Condition is always true",
            },
        }
    }
}

impl SyntaxRule for ConditionIsAlwaysTrue {
    fn metadata(&self) -> &RuleMetadata {
        &self.inner.metadata
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Vec<Diagnostic> {
        self.inner.check(ctx)
    }

    fn fix(&self, ctx: &RuleContext<'_>, diagnostic: &Diagnostic) -> Result<Option<TreeEdit>> {
        self.inner.fix(ctx, diagnostic)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nori_core::SemanticModel;
    use nori_core::cst::edit::apply_edits;
    use nori_core::cst::parse_cs;

    fn eliminate_first(source: &str, target: bool) -> String {
        let (cst, errors) = parse_cs(source);
        assert!(errors.is_empty());
        let semantics = SemanticModel::new(&cst);
        let if_stmt = cst
            .descendants()
            .find_map(|n| match_constant_condition(&n, &semantics, target))
            .expect("no constant condition found");
        let edit = eliminate(&if_stmt, target);
        apply_edits(&cst, vec![edit]).unwrap().text().to_string()
    }

    #[test]
    fn false_without_else_removes_statement() {
        let result = eliminate_first(
            "class C {\n    void M()\n    {\n        x();\n        if (false) { y(); }\n    }\n}",
            false,
        );
        assert_eq!(
            result,
            "class C {\n    void M()\n    {\n        x();\n    }\n}"
        );
    }

    #[test]
    fn false_with_else_keeps_else_branch() {
        let result =
            eliminate_first("class C { void M() { if (false) { A(); } else { B(); } } }", false);
        assert_eq!(result, "class C { void M() { B(); } }");
    }

    #[test]
    fn true_keeps_then_branch_discarding_else() {
        let result =
            eliminate_first("class C { void M() { if (true) { A(); } else { B(); } } }", true);
        assert_eq!(result, "class C { void M() { A(); } }");
    }

    #[test]
    fn bare_else_statement_survives() {
        let result =
            eliminate_first("class C { void M() { if (false) A(); else B(); } }", false);
        assert_eq!(result, "class C { void M() { B(); } }");
    }

    #[test]
    fn folded_comparison_counts_as_constant() {
        let result =
            eliminate_first("class C { void M() { if (1 == 2) { A(); } else { B(); } } }", false);
        assert_eq!(result, "class C { void M() { B(); } }");
    }

    #[test]
    fn non_constant_condition_never_matches() {
        let (cst, _) = parse_cs("class C { void M() { if (flag) { A(); } } }");
        let semantics = SemanticModel::new(&cst);
        assert!(cst
            .descendants()
            .find_map(|n| match_constant_condition(&n, &semantics, false))
            .is_none());
        assert!(cst
            .descendants()
            .find_map(|n| match_constant_condition(&n, &semantics, true))
            .is_none());
    }

    #[test]
    fn multiline_else_branch_splices_statements() {
        let result = eliminate_first(
            "class C {\n    void M()\n    {\n        if (false)\n        {\n            A();\n        }\n        else\n        {\n            B();\n            C2();\n        }\n    }\n}",
            false,
        );
        assert_eq!(
            result,
            "class C {\n    void M()\n    {\n        B();\n            C2();\n    }\n}"
        );
    }
}
