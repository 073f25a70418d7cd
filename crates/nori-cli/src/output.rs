//! Terminal output helpers

use colored::Colorize;

use nori_core::{Diagnostic, DiagnosticFormatter, Severity};

pub fn print_diagnostics(diagnostics: &[Diagnostic], no_color: bool) {
    let formatter = if no_color {
        DiagnosticFormatter::no_colors()
    } else {
        DiagnosticFormatter::new()
    };

    for diagnostic in diagnostics {
        println!("{}", formatter.format_diagnostic(diagnostic));
    }
}

pub fn print_summary(diagnostics: &[Diagnostic], file_count: usize, no_color: bool) {
    let files = format!("{file_count} file{}", if file_count == 1 { "" } else { "s" });

    if diagnostics.is_empty() {
        let message = format!("Checked {files}: no issues found");
        println!("{}", if no_color { message.normal() } else { message.green() });
        return;
    }

    let errors = diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Error)
        .count();
    let warnings = diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Warning)
        .count();

    let summary = format!(
        "Checked {files}: {} issue{} ({errors} errors, {warnings} warnings)",
        diagnostics.len(),
        if diagnostics.len() == 1 { "" } else { "s" },
    );
    let rendered = if no_color {
        summary.normal()
    } else if errors > 0 {
        summary.red()
    } else {
        summary.yellow()
    };
    println!("{rendered}");
}
