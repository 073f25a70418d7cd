//! Concrete Syntax Tree (CST) for CS source
//!
//! A lossless syntax tree built on the Rowan library. The CST preserves
//! all source information including whitespace and comments, enabling
//! source-to-source transformations that keep surrounding formatting
//! intact.
//!
//! ## Architecture
//!
//! Rowan's green/red tree pattern:
//!
//! - **Green tree**: immutable, position-independent storage. Identical
//!   subtrees are shared; cloning is cheap (Arc internally).
//! - **Red tree**: on-demand view with parent pointers, providing the
//!   typed AST-like API and parent/sibling navigation.
//!
//! Rewrites never mutate in place. [`edit::apply_edits`] produces a new
//! root from an old root, reusing every untouched green subtree.
//!
//! ## Trivia
//!
//! Trivia tokens sit in the tree exactly where they occurred, so
//! `parse_cs(source).text() == source` holds for every input the lexer
//! accepts.

mod builder;
mod language;
mod lexer;
mod parser;
mod syntax_kind;

pub mod ast;
pub mod edit;
pub mod trivia;

pub use builder::CstBuilder;
pub use language::{CsLanguage, CsSyntaxElement, CsSyntaxNode, CsSyntaxToken};
pub use lexer::{CstLexResult, CstToken, LexerError, lex_with_trivia};
pub use parser::parse_cs;
pub use syntax_kind::CsSyntaxKind;

#[cfg(test)]
mod tests;
