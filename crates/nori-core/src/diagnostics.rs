//! Diagnostic types for CS analysis
//!
//! Diagnostics carry precise positions (line/column plus byte spans),
//! optional code suggestions with safety levels, and render as human text
//! or JSON.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A finding reported by an analyzer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Identifier of the rule that produced this diagnostic
    pub rule_id: String,
    /// Severity level
    pub severity: Severity,
    /// Human-readable message with member kind/name substituted
    pub message: String,
    /// Location in the source file
    pub location: Location,
    /// Code suggestions for fixing the issue
    pub suggestions: Vec<CodeSuggestion>,
    /// Optional snippet of the offending source
    pub code_snippet: Option<String>,
}

/// Severity levels for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational messages
    Info,
    /// Hints for improvements
    Hint,
    /// Warnings that should be addressed
    Warning,
    /// Errors that must be fixed
    Error,
}

/// Position of a diagnostic or fix in a source file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// File path
    pub file: PathBuf,
    /// Line number (1-based)
    pub line: usize,
    /// Column number (1-based)
    pub column: usize,
    /// End position, when known
    pub end_line: Option<usize>,
    pub end_column: Option<usize>,
    /// Byte offset in the file
    pub offset: usize,
    /// Length of the span in bytes
    pub length: usize,
}

impl Location {
    pub fn new(file: PathBuf, line: usize, column: usize, offset: usize, length: usize) -> Self {
        Self {
            file,
            line,
            column,
            end_line: None,
            end_column: None,
            offset,
            length,
        }
    }

    /// Byte span as (start, end).
    pub fn span(&self) -> (usize, usize) {
        (self.offset, self.offset + self.length)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file.display(), self.line, self.column)
    }
}

/// Indicates how a tool should manage a suggestion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Applicability {
    /// Definitely correct; may be applied automatically.
    Always,
    /// May be correct but needs review; requires the unsafe flag to apply.
    MaybeIncorrect,
}

impl fmt::Display for Applicability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Applicability::Always => write!(f, "safe"),
            Applicability::MaybeIncorrect => write!(f, "unsafe"),
        }
    }
}

/// A concrete replacement that resolves a diagnostic
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeSuggestion {
    /// Description of the suggested fix
    pub message: String,
    /// The replacement text
    pub replacement: String,
    /// Where to apply the replacement
    pub location: Location,
    /// When this suggestion should be applied
    pub applicability: Applicability,
}

impl CodeSuggestion {
    pub fn new(
        message: impl Into<String>,
        replacement: impl Into<String>,
        location: Location,
        applicability: Applicability,
    ) -> Self {
        Self {
            message: message.into(),
            replacement: replacement.into(),
            location,
            applicability,
        }
    }

    /// A safe (always applicable) suggestion.
    pub fn safe(
        message: impl Into<String>,
        replacement: impl Into<String>,
        location: Location,
    ) -> Self {
        Self::new(message, replacement, location, Applicability::Always)
    }
}

impl Diagnostic {
    pub fn new(
        rule_id: impl Into<String>,
        severity: Severity,
        message: impl Into<String>,
        location: Location,
    ) -> Self {
        Self {
            rule_id: rule_id.into(),
            severity,
            message: message.into(),
            location,
            suggestions: Vec::new(),
            code_snippet: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: CodeSuggestion) -> Self {
        self.suggestions.push(suggestion);
        self
    }

    pub fn with_code_snippet(mut self, snippet: impl Into<String>) -> Self {
        self.code_snippet = Some(snippet.into());
        self
    }

    pub fn has_safe_fixes(&self) -> bool {
        self.suggestions
            .iter()
            .any(|s| s.applicability == Applicability::Always)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Hint => write!(f, "hint"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// Trait for collecting diagnostics during a scan
pub trait DiagnosticCollector {
    fn collect(&mut self, diagnostic: Diagnostic);

    fn collect_all(&mut self, diagnostics: Vec<Diagnostic>) {
        for diagnostic in diagnostics {
            self.collect(diagnostic);
        }
    }

    fn diagnostics(&self) -> &[Diagnostic];

    fn has_errors(&self) -> bool;

    fn total_count(&self) -> usize;

    fn clear(&mut self);
}

/// Default append-only collector
#[derive(Debug, Clone, Default)]
pub struct DefaultDiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
}

impl DefaultDiagnosticCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sort by file, then line, then column. Scan order is not guaranteed
    /// to be source order; callers sort before display.
    pub fn sort_by_location(&mut self) {
        self.diagnostics.sort_by(|a, b| {
            a.location
                .file
                .cmp(&b.location.file)
                .then_with(|| a.location.offset.cmp(&b.location.offset))
        });
    }

    pub fn count_by_severity(&self) -> HashMap<Severity, usize> {
        let mut counts = HashMap::new();
        for diagnostic in &self.diagnostics {
            *counts.entry(diagnostic.severity).or_insert(0) += 1;
        }
        counts
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

impl DiagnosticCollector for DefaultDiagnosticCollector {
    fn collect(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    fn total_count(&self) -> usize {
        self.diagnostics.len()
    }

    fn clear(&mut self) {
        self.diagnostics.clear();
    }
}

/// Source map for byte offset to line/column conversion
///
/// Precomputed line-start table; lookups are a binary search.
#[derive(Debug, Clone)]
pub struct SourceMap {
    line_starts: Vec<usize>,
}

impl SourceMap {
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        for (idx, ch) in source.char_indices() {
            if ch == '\n' {
                line_starts.push(idx + 1);
            }
        }
        Self { line_starts }
    }

    /// Convert a byte offset to 1-based (line, column). Columns count
    /// characters, not bytes.
    pub fn offset_to_position(&self, offset: usize, source: &str) -> (usize, usize) {
        let line_idx = match self.line_starts.binary_search(&offset) {
            Ok(idx) => idx,
            Err(idx) => idx.saturating_sub(1),
        };

        let line_start = self.line_starts[line_idx];
        let line_text = &source[line_start..offset.min(source.len())];
        let column = line_text.chars().count() + 1;

        (line_idx + 1, column)
    }

    /// Build a full [`Location`] from a byte span.
    pub fn span_to_location(
        &self,
        span: std::ops::Range<usize>,
        source: &str,
        file: &std::path::Path,
    ) -> Location {
        let (line, column) = self.offset_to_position(span.start, source);
        let (end_line, end_column) = self.offset_to_position(span.end, source);

        Location {
            file: file.to_path_buf(),
            line,
            column,
            end_line: Some(end_line),
            end_column: Some(end_column),
            offset: span.start,
            length: span.end - span.start,
        }
    }
}

/// Human-readable diagnostic rendering
pub struct DiagnosticFormatter {
    pub use_colors: bool,
    pub include_snippets: bool,
}

impl Default for DiagnosticFormatter {
    fn default() -> Self {
        Self {
            use_colors: true,
            include_snippets: true,
        }
    }
}

impl DiagnosticFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn no_colors() -> Self {
        Self {
            use_colors: false,
            ..Self::default()
        }
    }

    pub fn format_diagnostic(&self, diagnostic: &Diagnostic) -> String {
        let severity_color = match diagnostic.severity {
            Severity::Error => Color::Red,
            Severity::Warning => Color::Yellow,
            Severity::Info => Color::Blue,
            Severity::Hint => Color::Cyan,
        };

        let mut output = format!(
            "{}: {} [{}]\n  {}",
            self.colorize(&diagnostic.severity.to_string(), severity_color),
            self.colorize(&diagnostic.location.to_string(), Color::Bold),
            self.colorize(&diagnostic.rule_id, Color::Dim),
            diagnostic.message
        );

        if self.include_snippets
            && let Some(snippet) = &diagnostic.code_snippet
        {
            output.push('\n');
            for line in snippet.lines() {
                output.push_str(&format!("  | {line}\n"));
            }
        }

        output
    }

    pub fn format_diagnostics(&self, diagnostics: &[Diagnostic]) -> String {
        diagnostics
            .iter()
            .map(|d| self.format_diagnostic(d))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn format_summary(&self, diagnostics: &[Diagnostic]) -> String {
        if diagnostics.is_empty() {
            return self.colorize("No issues found", Color::Green);
        }

        let errors = diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count();
        let warnings = diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .count();

        let mut parts = Vec::new();
        if errors > 0 {
            parts.push(self.colorize(
                &format!("{} error{}", errors, if errors == 1 { "" } else { "s" }),
                Color::Red,
            ));
        }
        if warnings > 0 {
            parts.push(self.colorize(
                &format!("{} warning{}", warnings, if warnings == 1 { "" } else { "s" }),
                Color::Yellow,
            ));
        }
        let others = diagnostics.len() - errors - warnings;
        if others > 0 {
            parts.push(self.colorize(&format!("{others} other"), Color::Cyan));
        }

        format!(
            "Found {} ({})",
            self.colorize(
                &format!(
                    "{} issue{}",
                    diagnostics.len(),
                    if diagnostics.len() == 1 { "" } else { "s" }
                ),
                Color::Bold
            ),
            parts.join(", ")
        )
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if !self.use_colors {
            return text.to_string();
        }

        let code = match color {
            Color::Red => "\x1b[31m",
            Color::Green => "\x1b[32m",
            Color::Yellow => "\x1b[33m",
            Color::Blue => "\x1b[34m",
            Color::Cyan => "\x1b[36m",
            Color::Bold => "\x1b[1m",
            Color::Dim => "\x1b[2m",
        };
        format!("{code}{text}\x1b[0m")
    }
}

#[derive(Debug, Clone, Copy)]
enum Color {
    Red,
    Green,
    Yellow,
    Blue,
    Cyan,
    Bold,
    Dim,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_map_single_line() {
        let source = "int x = 5;";
        let map = SourceMap::new(source);

        assert_eq!(map.offset_to_position(0, source), (1, 1));
        assert_eq!(map.offset_to_position(4, source), (1, 5));
    }

    #[test]
    fn source_map_multiple_lines() {
        let source = "class C\n{\n    int x;\n}";
        let map = SourceMap::new(source);

        assert_eq!(map.offset_to_position(0, source), (1, 1));
        assert_eq!(map.offset_to_position(8, source), (2, 1));
        assert_eq!(map.offset_to_position(14, source), (3, 5));
    }

    #[test]
    fn source_map_span_to_location() {
        let source = "class C\n{\n    int x;\n}";
        let map = SourceMap::new(source);
        let location = map.span_to_location(14..19, source, std::path::Path::new("test.cs"));

        assert_eq!(location.line, 3);
        assert_eq!(location.column, 5);
        assert_eq!(location.length, 5);
        assert_eq!(location.end_line, Some(3));
    }

    #[test]
    fn collector_sorts_by_location() {
        let mut collector = DefaultDiagnosticCollector::new();
        collector.collect(Diagnostic::new(
            "r",
            Severity::Warning,
            "second",
            Location::new(PathBuf::from("a.cs"), 5, 1, 50, 3),
        ));
        collector.collect(Diagnostic::new(
            "r",
            Severity::Warning,
            "first",
            Location::new(PathBuf::from("a.cs"), 1, 1, 0, 3),
        ));

        collector.sort_by_location();
        assert_eq!(collector.diagnostics()[0].message, "first");
    }

    #[test]
    fn summary_counts() {
        let formatter = DiagnosticFormatter::no_colors();
        let diagnostics = vec![
            Diagnostic::new("r", Severity::Error, "x", Location::default()),
            Diagnostic::new("r", Severity::Warning, "y", Location::default()),
        ];
        let summary = formatter.format_summary(&diagnostics);
        assert!(summary.contains("2 issues"));
        assert!(summary.contains("1 error"));
        assert!(summary.contains("1 warning"));
    }
}
