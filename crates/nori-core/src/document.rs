//! Parsed document plumbing
//!
//! A `Document` bundles the source text, the CST root for that exact text,
//! and the offset table used to position diagnostics. Construction checks
//! the host contract: the tree must reproduce the text, and spans must
//! nest properly.

use std::path::{Path, PathBuf};

use crate::cst::edit::validate_containment;
use crate::cst::{CsSyntaxNode, parse_cs};
use crate::diagnostics::{Location, SourceMap};
use crate::error::NoriError;
use crate::result::Result;

/// One source file, parsed
#[derive(Debug)]
pub struct Document {
    path: PathBuf,
    text: String,
    root: CsSyntaxNode,
    source_map: SourceMap,
}

impl Document {
    /// Parse source text into a document.
    pub fn parse(path: impl Into<PathBuf>, text: impl Into<String>) -> Result<Self> {
        let path = path.into();
        let text = text.into();
        let (root, errors) = parse_cs(&text);
        if let Some(error) = errors.first() {
            return Err(NoriError::parse_error(path, error.message.clone()));
        }
        Self::new(path, text, root)
    }

    /// Wrap a host-provided tree, verifying the host contract.
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>, root: CsSyntaxNode) -> Result<Self> {
        let path = path.into();
        let text = text.into();

        if root.text().to_string() != text {
            return Err(NoriError::malformed_tree(format!(
                "tree text does not match document text for '{}'",
                path.display()
            )));
        }
        validate_containment(&root)?;

        let source_map = SourceMap::new(&text);
        Ok(Self {
            path,
            text,
            root,
            source_map,
        })
    }

    /// Read and parse a file from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| NoriError::io_error(path.to_path_buf(), e))?;
        Self::parse(path.to_path_buf(), text)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn root(&self) -> &CsSyntaxNode {
        &self.root
    }

    pub fn source_map(&self) -> &SourceMap {
        &self.source_map
    }

    /// Smallest node covering the byte span, used to re-resolve a
    /// diagnostic's target in the current tree.
    pub fn covering_node(&self, offset: usize, length: usize) -> Option<CsSyntaxNode> {
        let start = rowan::TextSize::try_from(offset).ok()?;
        let end = rowan::TextSize::try_from(offset + length).ok()?;
        if end > self.root.text_range().end() {
            return None;
        }
        let range = rowan::TextRange::new(start, end);
        match self.root.covering_element(range) {
            rowan::NodeOrToken::Node(node) => Some(node),
            rowan::NodeOrToken::Token(token) => token.parent(),
        }
    }

    /// Location of a node in this document.
    pub fn location_of(&self, node: &CsSyntaxNode) -> Location {
        let range = node.text_range();
        self.source_map.span_to_location(
            usize::from(range.start())..usize::from(range.end()),
            &self.text,
            &self.path,
        )
    }

    /// The source line containing the node's start, for snippets.
    pub fn line_snippet(&self, node: &CsSyntaxNode) -> String {
        let start = usize::from(node.text_range().start());
        let line_start = self.text[..start].rfind('\n').map(|i| i + 1).unwrap_or(0);
        let line_end = self.text[start..]
            .find('\n')
            .map(|i| start + i)
            .unwrap_or(self.text.len());
        self.text[line_start..line_end].to_string()
    }
}
