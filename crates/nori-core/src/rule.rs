//! Rule trait and metadata
//!
//! Rules are registered in an explicit table at startup (no discovery
//! magic): each one bundles a matcher, its safety validation, and the
//! rewrite that resolves the finding.

use serde::{Deserialize, Serialize};

use crate::cst::edit::TreeEdit;
use crate::diagnostics::{Diagnostic, Severity};
use crate::document::Document;
use crate::result::Result;
use crate::semantic::SemanticModel;

/// Everything a rule needs while scanning one document
pub struct RuleContext<'a> {
    pub document: &'a Document,
    pub semantics: &'a SemanticModel,
}

/// A syntax analyzer with an optional automatic fix
///
/// `check` must be pure with respect to the document: no mutation, no I/O.
/// `fix` re-validates against the context's CURRENT tree and returns
/// `Ok(None)` when the diagnosed shape no longer exists there (stale
/// diagnostic); the caller treats that as a no-op.
pub trait SyntaxRule: Send + Sync {
    fn metadata(&self) -> &RuleMetadata;

    /// Scan the document and report findings.
    fn check(&self, ctx: &RuleContext<'_>) -> Vec<Diagnostic>;

    /// Produce the tree edit resolving `diagnostic`, or `None` if the
    /// diagnosed node no longer matches.
    fn fix(&self, ctx: &RuleContext<'_>, diagnostic: &Diagnostic) -> Result<Option<TreeEdit>>;
}

/// Metadata associated with a rule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleMetadata {
    /// Stable identifier, `builtin/<category>/<slug>`
    pub id: String,
    /// Human-readable name
    pub name: String,
    /// What the rule checks
    pub description: String,
    /// Default severity level
    pub severity: Severity,
    /// Category this rule belongs to
    pub category: RuleCategory,
    /// Whether the fix may be applied without review
    pub fix_safety: FixSafety,
}

impl RuleMetadata {
    /// Validate the id shape: lower-case hyphenated segments separated by
    /// slashes, category segment matching the metadata category.
    pub fn validate(&self) -> Result<()> {
        use crate::error::NoriError;

        let segments: Vec<&str> = self.id.split('/').filter(|s| !s.is_empty()).collect();
        if segments.len() < 2 {
            return Err(NoriError::rule_error(
                &self.id,
                "Rule ID must follow '<namespace>/<category>/<rule-name>' format",
            ));
        }
        for segment in &segments {
            let valid = segment
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
            if !valid {
                return Err(NoriError::rule_error(
                    &self.id,
                    format!("Rule ID segment '{segment}' must be lower-case and hyphenated"),
                ));
            }
        }
        let category_slug = segments[segments.len() - 2];
        if category_slug != self.category.slug() {
            return Err(NoriError::rule_error(
                &self.id,
                format!(
                    "Rule ID category '{}' must match metadata category '{}'",
                    category_slug,
                    self.category.slug()
                ),
            ));
        }
        Ok(())
    }
}

/// Categories for organizing rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleCategory {
    /// Correctness issues
    Correctness,
    /// Suspicious patterns that often indicate bugs
    Suspicious,
    /// Style and simplification preferences
    Style,
    /// Experimental or incubating rules
    Nursery,
}

impl RuleCategory {
    pub fn slug(&self) -> &'static str {
        match self {
            RuleCategory::Correctness => "correctness",
            RuleCategory::Suspicious => "suspicious",
            RuleCategory::Style => "style",
            RuleCategory::Nursery => "nursery",
        }
    }
}

impl std::fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.slug())
    }
}

/// Safety classification for automatic fixes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FixSafety {
    /// Safe to apply automatically
    Safe,
    /// Requires user confirmation before applying
    Unsafe,
}
