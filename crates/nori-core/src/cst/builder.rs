//! Green-tree builder for the CS CST

use rowan::{GreenNode, GreenNodeBuilder, Language};

use super::{CsLanguage, CsSyntaxKind, CsSyntaxNode};

/// Thin wrapper over `rowan::GreenNodeBuilder` that speaks [`CsSyntaxKind`].
pub struct CstBuilder {
    inner: GreenNodeBuilder<'static>,
}

impl Default for CstBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CstBuilder {
    pub fn new() -> Self {
        Self {
            inner: GreenNodeBuilder::new(),
        }
    }

    pub fn start_node(&mut self, kind: CsSyntaxKind) {
        self.inner.start_node(CsLanguage::kind_to_raw(kind));
    }

    pub fn finish_node(&mut self) {
        self.inner.finish_node();
    }

    pub fn token(&mut self, kind: CsSyntaxKind, text: &str) {
        self.inner.token(CsLanguage::kind_to_raw(kind), text);
    }

    /// Record a position so a node can later be wrapped around everything
    /// emitted since (used for left-recursive expression shapes).
    pub fn checkpoint(&self) -> rowan::Checkpoint {
        self.inner.checkpoint()
    }

    pub fn start_node_at(&mut self, checkpoint: rowan::Checkpoint, kind: CsSyntaxKind) {
        self.inner
            .start_node_at(checkpoint, CsLanguage::kind_to_raw(kind));
    }

    pub fn finish_green(self) -> GreenNode {
        self.inner.finish()
    }

    pub fn finish(self) -> CsSyntaxNode {
        CsSyntaxNode::new_root(self.finish_green())
    }
}
