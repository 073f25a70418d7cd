//! NORI Core
//!
//! Core analysis engine for CS source: lossless syntax trees, structural
//! pattern matching support, semantic queries, diagnostics, and batched
//! autofix application. Rules themselves live in `nori-rules`; this crate
//! provides everything they are built from.

pub mod autofix;
pub mod config;
pub mod cst;
pub mod diagnostics;
pub mod document;
pub mod error;
pub mod executor;
pub mod result;
pub mod rule;
pub mod semantic;

// Re-export commonly used types
pub use autofix::{Fix, FixConfig, apply_fixes_to_source, render_diff, resolve_conflicts};
pub use config::{CONFIG_FILE_NAME, NoriConfig, RuleSetting, discover_files};
pub use cst::{
    CsLanguage, CsSyntaxElement, CsSyntaxKind, CsSyntaxNode, CsSyntaxToken, CstBuilder, parse_cs,
};
pub use diagnostics::{
    Applicability, CodeSuggestion, DefaultDiagnosticCollector, Diagnostic, DiagnosticCollector,
    DiagnosticFormatter, Location, Severity, SourceMap,
};
pub use document::Document;
pub use error::{ErrorKind, NoriError};
pub use executor::{
    CancellationToken, ExecutionResult, ExecutorConfig, FileExecutionResult, ProgressCallback,
    ProgressInfo, scan_files,
};
pub use result::{Result, ResultExt};
pub use rule::{FixSafety, RuleCategory, RuleContext, RuleMetadata, SyntaxRule};
pub use semantic::{ConstValue, SemanticModel, SymbolId};

/// Initialize the tracing subscriber for logging
pub fn init_tracing() {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("nori=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_file(true)
                .with_line_number(true),
        )
        .init();
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
