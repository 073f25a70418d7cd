//! Semantic queries over a parsed document
//!
//! The analyzers ask two questions of the semantic layer: "is this
//! expression a compile-time constant, and what is its value" and "what
//! symbol does this declaration introduce". Both are answered from the
//! tree alone; there is no project-wide binding here.

use std::collections::HashMap;

use crate::cst::ast::{
    AstNode, BinaryExpr, LiteralExpr, ParenExpr, UnaryExpr, is_expression,
};
use crate::cst::{CsSyntaxKind, CsSyntaxNode};

/// A compile-time constant value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstValue {
    Bool(bool),
    Int(i64),
    Str(String),
}

impl ConstValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ConstValue::Bool(value) => Some(*value),
            _ => None,
        }
    }
}

/// Identifier of a declared symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SymbolId(pub u32);

/// Semantic model for one document
#[derive(Debug)]
pub struct SemanticModel {
    symbols: HashMap<String, SymbolId>,
    declarations: HashMap<CsSyntaxNode, SymbolId>,
}

impl SemanticModel {
    /// Build the model by walking the declarations of `root`.
    pub fn new(root: &CsSyntaxNode) -> Self {
        let mut symbols = HashMap::new();
        let mut declarations = HashMap::new();
        let mut next_id = 0u32;

        for node in root.descendants() {
            let is_decl = matches!(
                node.kind(),
                CsSyntaxKind::ClassDecl
                    | CsSyntaxKind::MethodDecl
                    | CsSyntaxKind::PropertyDecl
                    | CsSyntaxKind::FieldDecl
            );
            if !is_decl {
                continue;
            }
            let Some(name) = declared_name(&node) else {
                continue;
            };
            let id = *symbols.entry(name).or_insert_with(|| {
                let id = SymbolId(next_id);
                next_id += 1;
                id
            });
            declarations.insert(node, id);
        }

        Self {
            symbols,
            declarations,
        }
    }

    /// The symbol a declaration node introduces.
    pub fn symbol_of(&self, node: &CsSyntaxNode) -> Option<SymbolId> {
        self.declarations.get(node).copied()
    }

    /// Look up a declared symbol by name.
    pub fn lookup(&self, name: &str) -> Option<SymbolId> {
        self.symbols.get(name).copied()
    }

    /// Evaluate an expression to a compile-time constant, if it is one.
    ///
    /// Follows the host language's constant-folding rules over literals:
    /// parentheses, `!`, unary minus, `&&`/`||`, equality and ordering on
    /// integers, equality on booleans and strings, and integer arithmetic.
    /// Anything touching a name is not constant here.
    pub fn constant_value(&self, expr: &CsSyntaxNode) -> Option<ConstValue> {
        if !is_expression(expr.kind()) {
            return None;
        }

        match expr.kind() {
            CsSyntaxKind::LiteralExpr => {
                let literal = LiteralExpr::cast(expr.clone())?;
                let token = literal.token()?;
                match token.kind() {
                    CsSyntaxKind::TrueKw => Some(ConstValue::Bool(true)),
                    CsSyntaxKind::FalseKw => Some(ConstValue::Bool(false)),
                    CsSyntaxKind::IntLiteral => {
                        token.text().parse::<i64>().ok().map(ConstValue::Int)
                    }
                    CsSyntaxKind::StringLiteral => {
                        let text = token.text();
                        let inner = text
                            .strip_prefix('"')
                            .and_then(|t| t.strip_suffix('"'))
                            .unwrap_or(text);
                        Some(ConstValue::Str(inner.to_string()))
                    }
                    _ => None,
                }
            }
            CsSyntaxKind::ParenExpr => {
                let paren = ParenExpr::cast(expr.clone())?;
                self.constant_value(&paren.inner()?)
            }
            CsSyntaxKind::UnaryExpr => {
                let unary = UnaryExpr::cast(expr.clone())?;
                let operand = self.constant_value(&unary.operand()?)?;
                match (unary.operator()?.kind(), operand) {
                    (CsSyntaxKind::Bang, ConstValue::Bool(b)) => Some(ConstValue::Bool(!b)),
                    (CsSyntaxKind::Minus, ConstValue::Int(i)) => {
                        Some(ConstValue::Int(i.checked_neg()?))
                    }
                    _ => None,
                }
            }
            CsSyntaxKind::BinaryExpr => {
                let binary = BinaryExpr::cast(expr.clone())?;
                let op = binary.operator()?.kind();

                // Short-circuit operators fold even when only one side is
                // needed, matching the language's evaluation order.
                if op == CsSyntaxKind::AmpAmp || op == CsSyntaxKind::PipePipe {
                    let lhs = self.constant_value(&binary.lhs()?)?.as_bool()?;
                    return match (op, lhs) {
                        (CsSyntaxKind::AmpAmp, false) => Some(ConstValue::Bool(false)),
                        (CsSyntaxKind::PipePipe, true) => Some(ConstValue::Bool(true)),
                        _ => {
                            let rhs = self.constant_value(&binary.rhs()?)?.as_bool()?;
                            Some(ConstValue::Bool(rhs))
                        }
                    };
                }

                let lhs = self.constant_value(&binary.lhs()?)?;
                let rhs = self.constant_value(&binary.rhs()?)?;
                fold_binary(op, lhs, rhs)
            }
            _ => None,
        }
    }
}

fn fold_binary(op: CsSyntaxKind, lhs: ConstValue, rhs: ConstValue) -> Option<ConstValue> {
    use ConstValue::{Bool, Int, Str};

    let value = match (op, lhs, rhs) {
        (CsSyntaxKind::EqEq, lhs, rhs) => Bool(lhs == rhs),
        (CsSyntaxKind::Neq, lhs, rhs) => Bool(lhs != rhs),
        (CsSyntaxKind::Lt, Int(a), Int(b)) => Bool(a < b),
        (CsSyntaxKind::Gt, Int(a), Int(b)) => Bool(a > b),
        (CsSyntaxKind::LtEq, Int(a), Int(b)) => Bool(a <= b),
        (CsSyntaxKind::GtEq, Int(a), Int(b)) => Bool(a >= b),
        (CsSyntaxKind::Plus, Int(a), Int(b)) => Int(a.checked_add(b)?),
        (CsSyntaxKind::Plus, Str(a), Str(b)) => Str(format!("{a}{b}")),
        (CsSyntaxKind::Minus, Int(a), Int(b)) => Int(a.checked_sub(b)?),
        (CsSyntaxKind::Star, Int(a), Int(b)) => Int(a.checked_mul(b)?),
        (CsSyntaxKind::Slash, Int(a), Int(b)) => Int(a.checked_div(b)?),
        (CsSyntaxKind::Percent, Int(a), Int(b)) => Int(a.checked_rem(b)?),
        _ => return None,
    };
    Some(value)
}

fn declared_name(node: &CsSyntaxNode) -> Option<String> {
    node.children_with_tokens()
        .filter_map(|e| e.into_token())
        .find(|t| t.kind() == CsSyntaxKind::Ident)
        .map(|t| t.text().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cst::ast::IfStmt;
    use crate::cst::parse_cs;

    fn condition_of(source: &str) -> (SemanticModel, CsSyntaxNode) {
        let (cst, errors) = parse_cs(source);
        assert!(errors.is_empty());
        let model = SemanticModel::new(&cst);
        let condition = cst
            .descendants()
            .find_map(IfStmt::cast)
            .unwrap()
            .condition()
            .unwrap();
        (model, condition)
    }

    fn eval(condition_source: &str) -> Option<ConstValue> {
        let source = format!("class C {{ void M() {{ if ({condition_source}) {{ x(); }} }} }}");
        let (model, condition) = condition_of(&source);
        model.constant_value(&condition)
    }

    #[test]
    fn folds_boolean_literals() {
        assert_eq!(eval("true"), Some(ConstValue::Bool(true)));
        assert_eq!(eval("false"), Some(ConstValue::Bool(false)));
    }

    #[test]
    fn folds_negation_and_parens() {
        assert_eq!(eval("!true"), Some(ConstValue::Bool(false)));
        assert_eq!(eval("(false)"), Some(ConstValue::Bool(false)));
        assert_eq!(eval("!(!false)"), Some(ConstValue::Bool(false)));
    }

    #[test]
    fn folds_integer_comparisons() {
        assert_eq!(eval("1 == 2"), Some(ConstValue::Bool(false)));
        assert_eq!(eval("3 > 2"), Some(ConstValue::Bool(true)));
        assert_eq!(eval("1 + 1 == 2"), Some(ConstValue::Bool(true)));
    }

    #[test]
    fn short_circuit_folding() {
        assert_eq!(eval("false && x"), Some(ConstValue::Bool(false)));
        assert_eq!(eval("true || x"), Some(ConstValue::Bool(true)));
        assert_eq!(eval("true && false"), Some(ConstValue::Bool(false)));
    }

    #[test]
    fn names_are_not_constant() {
        assert_eq!(eval("flag"), None);
        assert_eq!(eval("x == 2"), None);
        assert_eq!(eval("true && flag"), None);
    }

    #[test]
    fn symbols_resolve_declarations() {
        let (cst, _) = parse_cs("class C { int M() { return 5; } int P { get; set; } }");
        let model = SemanticModel::new(&cst);

        assert!(model.lookup("C").is_some());
        assert!(model.lookup("M").is_some());
        assert!(model.lookup("P").is_some());
        assert!(model.lookup("missing").is_none());

        let method = cst
            .descendants()
            .find(|n| n.kind() == CsSyntaxKind::MethodDecl)
            .unwrap();
        assert_eq!(model.symbol_of(&method), model.lookup("M"));
    }
}
