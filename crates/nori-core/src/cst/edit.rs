//! Batched tree replacement for the CS CST
//!
//! Trees are immutable; every fix produces a new root. All edits in one
//! batch are keyed by node identity in the ORIGINAL tree and applied in a
//! single recursive green-tree rebuild, so offsets from one edit can never
//! invalidate another. Subtrees that contain no edit target are reused
//! as-is (structural sharing).

use std::collections::{HashMap, HashSet};

use rowan::{GreenNode, GreenToken, Language, NodeOrToken};

use super::{CsLanguage, CsSyntaxKind, CsSyntaxNode};
use crate::error::NoriError;
use crate::result::Result;

/// A green node or token ready to be spliced into a rebuilt tree.
pub type GreenElement = NodeOrToken<GreenNode, GreenToken>;

/// What happens to the trivia around a removed node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriviaPolicy {
    /// Leave surrounding trivia untouched.
    Keep,
    /// Drop the removed node's line: the whitespace run before it and the
    /// trivia after it up to and including the next newline.
    KeepNone,
}

/// A single tree replacement, addressed against the original tree.
#[derive(Debug, Clone)]
pub enum TreeEdit {
    /// Replace one node with a freshly constructed node.
    Replace {
        target: CsSyntaxNode,
        replacement: GreenNode,
    },
    /// Replace one node with a sequence of elements (used when a statement
    /// dissolves into the statements of one of its branches).
    Splice {
        target: CsSyntaxNode,
        replacement: Vec<GreenElement>,
    },
    /// Remove a node entirely.
    Remove {
        target: CsSyntaxNode,
        trivia: TriviaPolicy,
    },
}

impl TreeEdit {
    pub fn target(&self) -> &CsSyntaxNode {
        match self {
            TreeEdit::Replace { target, .. }
            | TreeEdit::Splice { target, .. }
            | TreeEdit::Remove { target, .. } => target,
        }
    }

    /// Text of the material this edit inserts.
    pub fn replacement_text(&self) -> String {
        match self {
            TreeEdit::Replace { replacement, .. } => green_text(replacement),
            TreeEdit::Splice { replacement, .. } => replacement
                .iter()
                .map(|el| match el {
                    NodeOrToken::Node(n) => green_text(n),
                    NodeOrToken::Token(t) => t.text().to_string(),
                })
                .collect(),
            TreeEdit::Remove { .. } => String::new(),
        }
    }
}

fn green_text(green: &GreenNode) -> String {
    CsSyntaxNode::new_root(green.clone()).text().to_string()
}

enum Action {
    Replace(GreenNode),
    Splice(Vec<GreenElement>),
    Remove(TriviaPolicy),
}

/// Apply a batch of edits against `root`, producing a new root.
///
/// Every target must belong to `root`'s tree instance, and no target may
/// contain another (overlapping rewrites have to be resolved by the caller
/// before they get here).
pub fn apply_edits(root: &CsSyntaxNode, edits: Vec<TreeEdit>) -> Result<CsSyntaxNode> {
    if edits.is_empty() {
        return Ok(root.clone());
    }

    let mut actions: HashMap<CsSyntaxNode, Action> = HashMap::new();
    let mut dirty: HashSet<CsSyntaxNode> = HashSet::new();

    for edit in edits {
        let target = edit.target().clone();

        if target.ancestors().last().as_ref() != Some(root) {
            return Err(NoriError::stale_fix(
                "edit target does not belong to the current tree",
            ));
        }
        if target == *root {
            return Err(NoriError::internal_error("cannot edit the tree root itself"));
        }
        for ancestor in target.ancestors().skip(1) {
            if actions.contains_key(&ancestor) {
                return Err(NoriError::fix_conflict(
                    "edit targets overlap; batch them against disjoint nodes",
                ));
            }
            dirty.insert(ancestor);
        }
        if dirty.contains(&target) || actions.contains_key(&target) {
            return Err(NoriError::fix_conflict(
                "edit targets overlap; batch them against disjoint nodes",
            ));
        }

        let action = match edit {
            TreeEdit::Replace { replacement, .. } => Action::Replace(replacement),
            TreeEdit::Splice { replacement, .. } => Action::Splice(replacement),
            TreeEdit::Remove { trivia, .. } => Action::Remove(trivia),
        };
        actions.insert(target, action);
    }

    let green = rebuild(root, &actions, &dirty);
    Ok(CsSyntaxNode::new_root(green))
}

fn rebuild(
    node: &CsSyntaxNode,
    actions: &HashMap<CsSyntaxNode, Action>,
    dirty: &HashSet<CsSyntaxNode>,
) -> GreenNode {
    let whitespace_raw = CsLanguage::kind_to_raw(CsSyntaxKind::Whitespace);
    let mut children: Vec<GreenElement> = Vec::new();
    // Set after a KeepNone removal: swallow trivia up to and including the
    // removed node's line terminator.
    let mut dropping_line_tail = false;

    for element in node.children_with_tokens() {
        if dropping_line_tail {
            if let Some(token) = element.as_token() {
                if token.kind().is_trivia() {
                    if token.kind() == CsSyntaxKind::Newline {
                        dropping_line_tail = false;
                    }
                    continue;
                }
            }
            dropping_line_tail = false;
        }

        match element {
            NodeOrToken::Node(child) => match actions.get(&child) {
                Some(Action::Replace(green)) => children.push(NodeOrToken::Node(green.clone())),
                Some(Action::Splice(elements)) => children.extend(elements.iter().cloned()),
                Some(Action::Remove(policy)) => {
                    if *policy == TriviaPolicy::KeepNone {
                        while matches!(children.last(), Some(NodeOrToken::Token(t)) if t.kind() == whitespace_raw)
                        {
                            children.pop();
                        }
                        dropping_line_tail = true;
                    }
                }
                None => {
                    if dirty.contains(&child) {
                        children.push(NodeOrToken::Node(rebuild(&child, actions, dirty)));
                    } else {
                        children.push(NodeOrToken::Node(child.green().into_owned()));
                    }
                }
            },
            NodeOrToken::Token(token) => {
                children.push(NodeOrToken::Token(token.green().to_owned()));
            }
        }
    }

    GreenNode::new(CsLanguage::kind_to_raw(node.kind()), children)
}

/// Verify the span-containment invariant of a host-provided tree: every
/// child's range lies within its parent's, and sibling ranges are
/// contiguous and non-overlapping. A violation means the host handed us a
/// corrupted tree, and scanning it would produce garbage offsets.
pub fn validate_containment(root: &CsSyntaxNode) -> Result<()> {
    for node in root.descendants() {
        let range = node.text_range();
        let mut cursor = range.start();
        for element in node.children_with_tokens() {
            let child_range = element.text_range();
            if child_range.start() != cursor || child_range.end() > range.end() {
                return Err(NoriError::malformed_tree(format!(
                    "child span {child_range:?} escapes parent span {range:?}"
                )));
            }
            cursor = child_range.end();
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cst::ast::{AstNode, IfStmt, MethodDecl};
    use crate::cst::parse_cs;

    fn parse(source: &str) -> CsSyntaxNode {
        let (cst, errors) = parse_cs(source);
        assert!(errors.is_empty(), "lexer errors: {errors:?}");
        cst
    }

    #[test]
    fn empty_batch_returns_same_text() {
        let root = parse("class C { int M() { return 5; } }");
        let new_root = apply_edits(&root, Vec::new()).unwrap();
        assert_eq!(new_root.text().to_string(), root.text().to_string());
    }

    #[test]
    fn replace_single_node() {
        let root = parse("class C { int M() { return 5; } }");
        let method = root.descendants().find_map(MethodDecl::cast).unwrap();

        // Stand-in replacement: an identical node parsed from new text.
        let donor = parse("class C { int M() => 5; }");
        let replacement = donor
            .descendants()
            .find_map(MethodDecl::cast)
            .unwrap()
            .syntax()
            .green()
            .into_owned();

        let new_root = apply_edits(
            &root,
            vec![TreeEdit::Replace {
                target: method.syntax().clone(),
                replacement,
            }],
        )
        .unwrap();
        assert_eq!(new_root.text().to_string(), "class C { int M() => 5; }");
    }

    #[test]
    fn remove_statement_drops_its_line() {
        let root = parse("class C {\n    void M()\n    {\n        x();\n        if (false) { y(); }\n    }\n}");
        let if_stmt = root.descendants().find_map(IfStmt::cast).unwrap();

        let new_root = apply_edits(
            &root,
            vec![TreeEdit::Remove {
                target: if_stmt.syntax().clone(),
                trivia: TriviaPolicy::KeepNone,
            }],
        )
        .unwrap();
        assert_eq!(
            new_root.text().to_string(),
            "class C {\n    void M()\n    {\n        x();\n    }\n}"
        );
    }

    #[test]
    fn stale_target_is_rejected() {
        let root = parse("class C { int M() { return 5; } }");
        let other = parse("class C { int M() { return 5; } }");
        let foreign = other.descendants().find_map(MethodDecl::cast).unwrap();

        let err = apply_edits(
            &root,
            vec![TreeEdit::Remove {
                target: foreign.syntax().clone(),
                trivia: TriviaPolicy::Keep,
            }],
        )
        .unwrap_err();
        assert!(matches!(err, NoriError::StaleFix { .. }));
    }

    #[test]
    fn overlapping_targets_are_rejected() {
        let root = parse("class C { void M() { if (false) { y(); } } }");
        let if_stmt = root.descendants().find_map(IfStmt::cast).unwrap();
        let inner = if_stmt.then_branch().unwrap();

        let err = apply_edits(
            &root,
            vec![
                TreeEdit::Remove {
                    target: if_stmt.syntax().clone(),
                    trivia: TriviaPolicy::Keep,
                },
                TreeEdit::Remove {
                    target: inner,
                    trivia: TriviaPolicy::Keep,
                },
            ],
        )
        .unwrap_err();
        assert!(matches!(err, NoriError::FixConflict { .. }));
    }

    #[test]
    fn batch_replaces_against_one_snapshot() {
        let root = parse("class C { int A() { return 1; } int B() { return 2; } }");
        let methods: Vec<_> = root.descendants().filter_map(MethodDecl::cast).collect();
        assert_eq!(methods.len(), 2);

        let donor = parse("class C { int A() => 1; int B() => 2; }");
        let replacements: Vec<_> = donor.descendants().filter_map(MethodDecl::cast).collect();

        let edits = methods
            .iter()
            .zip(&replacements)
            .map(|(old, new)| TreeEdit::Replace {
                target: old.syntax().clone(),
                replacement: new.syntax().green().into_owned(),
            })
            .collect();

        let new_root = apply_edits(&root, edits).unwrap();
        assert_eq!(
            new_root.text().to_string(),
            "class C { int A() => 1; int B() => 2; }"
        );
    }

    #[test]
    fn containment_holds_for_parsed_trees() {
        let root = parse("class C {\n    int M()\n    {\n        return 5;\n    }\n}");
        assert!(validate_containment(&root).is_ok());
    }
}
