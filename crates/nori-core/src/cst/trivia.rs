//! Trivia queries over the CS CST
//!
//! Trivia tokens (whitespace, newlines, comments, directives) live in the
//! tree exactly where they occurred, as siblings of the nodes they separate.
//! The helpers here answer the questions validators ask: does a subtree
//! carry comments, and what trivia surrounds a node on its own line.

use rowan::Direction;

use super::{CsSyntaxKind, CsSyntaxNode, CsSyntaxToken};

/// Whether any comment token occurs anywhere inside `node`.
pub fn has_comments(node: &CsSyntaxNode) -> bool {
    node.descendants_with_tokens()
        .filter_map(|e| e.into_token())
        .any(|t| t.kind().is_comment())
}

/// Whether a comment follows `node` on the same line, before the next
/// non-trivia sibling.
pub fn has_trailing_comment_on_line(node: &CsSyntaxNode) -> bool {
    for element in node.siblings_with_tokens(Direction::Next).skip(1) {
        match element.into_token() {
            Some(token) if token.kind() == CsSyntaxKind::Newline => return false,
            Some(token) if token.kind().is_comment() => return true,
            Some(token) if token.kind().is_trivia() => continue,
            _ => return false,
        }
    }
    false
}

/// The contiguous run of trivia tokens immediately preceding `node` among
/// its siblings, in source order.
pub fn leading_trivia(node: &CsSyntaxNode) -> Vec<CsSyntaxToken> {
    let mut run = Vec::new();
    for element in node.siblings_with_tokens(Direction::Prev).skip(1) {
        match element.into_token() {
            Some(token) if token.kind().is_trivia() => run.push(token),
            _ => break,
        }
    }
    run.reverse();
    run
}

/// The trivia tokens following `node` up to and including the next newline.
pub fn trailing_trivia(node: &CsSyntaxNode) -> Vec<CsSyntaxToken> {
    let mut run = Vec::new();
    for element in node.siblings_with_tokens(Direction::Next).skip(1) {
        match element.into_token() {
            Some(token) if token.kind().is_trivia() => {
                let is_newline = token.kind() == CsSyntaxKind::Newline;
                run.push(token);
                if is_newline {
                    break;
                }
            }
            _ => break,
        }
    }
    run
}
