//! Autofix application
//!
//! Tree edits carry the semantic description of a fix; this module turns
//! them into concrete text records (`Fix`), resolves conflicts between
//! overlapping candidates, and applies a surviving batch to one source
//! snapshot in a single pass. Offsets always come from the original
//! snapshot, never from intermediate states.

use serde::{Deserialize, Serialize};

use crate::cst::edit::{TreeEdit, TriviaPolicy};
use crate::cst::trivia::{leading_trivia, trailing_trivia};
use crate::cst::CsSyntaxKind;
use crate::diagnostics::{Applicability, Location};
use crate::document::Document;
use crate::error::NoriError;
use crate::result::Result;

/// A concrete fix against one document snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fix {
    /// Rule that generated this fix
    pub rule_id: String,
    /// Description of what this fix does
    pub description: String,
    /// Location where the fix applies
    pub location: Location,
    /// The replacement text (empty for removals)
    pub replacement: String,
    /// Safe or requires-review
    pub applicability: Applicability,
    /// The fixed member should be re-formatted by the host formatter
    pub needs_format: bool,
    /// Priority for conflict resolution (higher wins)
    pub priority: u32,
}

impl Fix {
    /// Derive the text record for a tree edit. The span is widened for
    /// `KeepNone` removals so the removed statement's line goes with it.
    pub fn from_edit(
        rule_id: impl Into<String>,
        description: impl Into<String>,
        edit: &TreeEdit,
        document: &Document,
        applicability: Applicability,
    ) -> Self {
        let target = edit.target();
        let range = target.text_range();
        let mut start = usize::from(range.start());
        let mut end = usize::from(range.end());

        if let TreeEdit::Remove {
            trivia: TriviaPolicy::KeepNone,
            ..
        } = edit
        {
            // leading_trivia is in source order; only the whitespace run
            // directly before the node is swallowed.
            for token in leading_trivia(target).into_iter().rev() {
                if token.kind() == CsSyntaxKind::Whitespace {
                    start = usize::from(token.text_range().start());
                } else {
                    break;
                }
            }

            for token in trailing_trivia(target) {
                end = usize::from(token.text_range().end());
                if token.kind() == CsSyntaxKind::Newline {
                    break;
                }
            }
        }

        let location = document
            .source_map()
            .span_to_location(start..end, document.text(), document.path());

        Self {
            rule_id: rule_id.into(),
            description: description.into(),
            location,
            replacement: edit.replacement_text(),
            applicability,
            needs_format: true,
            priority: match applicability {
                Applicability::Always => 10,
                Applicability::MaybeIncorrect => 5,
            },
        }
    }

    pub fn is_safe(&self) -> bool {
        matches!(self.applicability, Applicability::Always)
    }

    /// Byte span as (start, end).
    pub fn span(&self) -> (usize, usize) {
        self.location.span()
    }

    /// Whether two fixes touch overlapping spans of the same file.
    pub fn conflicts_with(&self, other: &Fix) -> bool {
        if self.location.file != other.location.file {
            return false;
        }
        let (self_start, self_end) = self.span();
        let (other_start, other_end) = other.span();
        !(self_end <= other_start || other_end <= self_start)
    }
}

/// Configuration for fix application
#[derive(Debug, Clone)]
pub struct FixConfig {
    /// Whether to apply fixes classified as unsafe
    pub apply_unsafe: bool,
    /// Don't write anything; report the would-be result
    pub dry_run: bool,
}

impl Default for FixConfig {
    fn default() -> Self {
        Self {
            apply_unsafe: false,
            dry_run: false,
        }
    }
}

impl FixConfig {
    pub fn safe_only() -> Self {
        Self::default()
    }

    pub fn with_unsafe() -> Self {
        Self {
            apply_unsafe: true,
            ..Self::default()
        }
    }
}

/// Drop fixes that overlap a higher-priority fix. Of two conflicting fixes
/// with equal priority, the earlier one in the file wins.
pub fn resolve_conflicts(fixes: &[Fix]) -> Vec<Fix> {
    let mut ordered: Vec<&Fix> = fixes.iter().collect();
    ordered.sort_by(|a, b| {
        b.priority
            .cmp(&a.priority)
            .then_with(|| a.location.offset.cmp(&b.location.offset))
    });

    let mut accepted: Vec<Fix> = Vec::new();
    for fix in ordered {
        if accepted.iter().any(|kept| kept.conflicts_with(fix)) {
            tracing::debug!(
                rule = %fix.rule_id,
                offset = fix.location.offset,
                "dropping conflicting fix"
            );
            continue;
        }
        accepted.push(fix.clone());
    }

    accepted.sort_by_key(|f| f.location.offset);
    accepted
}

/// Apply non-overlapping fixes to one text snapshot in a single pass.
///
/// Spans must all come from `source`'s snapshot; applying back-to-front
/// keeps earlier offsets valid without any re-parsing.
pub fn apply_fixes_to_source(source: &str, fixes: &[Fix]) -> Result<String> {
    let mut sorted: Vec<&Fix> = fixes.iter().collect();
    sorted.sort_by_key(|f| f.location.offset);

    for pair in sorted.windows(2) {
        if pair[0].conflicts_with(pair[1]) {
            return Err(NoriError::fix_conflict(format!(
                "fixes from '{}' and '{}' overlap",
                pair[0].rule_id, pair[1].rule_id
            )));
        }
    }

    let mut result = source.to_string();
    for fix in sorted.iter().rev() {
        let (start, end) = fix.span();
        if end > result.len() {
            return Err(NoriError::stale_fix(format!(
                "fix span {start}..{end} exceeds source length {}",
                result.len()
            )));
        }
        result.replace_range(start..end, &fix.replacement);
    }
    Ok(result)
}

/// Unified diff between the original and fixed content, for previews.
pub fn render_diff(original: &str, fixed: &str) -> String {
    use similar::TextDiff;

    TextDiff::from_lines(original, fixed)
        .unified_diff()
        .context_radius(2)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn fix_at(rule_id: &str, offset: usize, length: usize, replacement: &str, priority: u32) -> Fix {
        Fix {
            rule_id: rule_id.to_string(),
            description: String::new(),
            location: Location::new(PathBuf::from("test.cs"), 1, 1, offset, length),
            replacement: replacement.to_string(),
            applicability: Applicability::Always,
            needs_format: true,
            priority,
        }
    }

    #[test]
    fn applies_fixes_back_to_front() {
        let source = "aaa bbb ccc";
        let fixes = vec![fix_at("r", 0, 3, "xx", 10), fix_at("r", 8, 3, "yyyy", 10)];
        let result = apply_fixes_to_source(source, &fixes).unwrap();
        assert_eq!(result, "xx bbb yyyy");
    }

    #[test]
    fn overlap_is_an_error() {
        let fixes = vec![fix_at("a", 0, 5, "x", 10), fix_at("b", 3, 5, "y", 10)];
        assert!(apply_fixes_to_source("0123456789", &fixes).is_err());
    }

    #[test]
    fn conflict_resolution_prefers_priority_then_position() {
        let fixes = vec![
            fix_at("low", 0, 5, "x", 5),
            fix_at("high", 3, 5, "y", 10),
            fix_at("disjoint", 20, 2, "z", 5),
        ];
        let kept = resolve_conflicts(&fixes);
        let ids: Vec<_> = kept.iter().map(|f| f.rule_id.as_str()).collect();
        assert_eq!(ids, vec!["high", "disjoint"]);
    }

    #[test]
    fn diff_shows_changed_line() {
        let diff = render_diff("a\nb\nc\n", "a\nB\nc\n");
        assert!(diff.contains("-b"));
        assert!(diff.contains("+B"));
    }
}
