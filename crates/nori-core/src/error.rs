//! Error types for CS analysis operations

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for analysis operations
///
/// Negative analysis results are NOT errors: a matcher that finds nothing
/// and a validator that rejects a candidate both stay silent. These
/// variants cover genuine failures plus the two contract cases the fix
/// pipeline distinguishes (stale targets and malformed host trees).
#[derive(Debug, Error)]
pub enum NoriError {
    /// Source could not be lexed/parsed by the host front-end
    #[error("Parse error in '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    /// The host handed us a tree violating the span-containment invariant.
    /// Fatal for the current scan: offsets computed from it are garbage.
    #[error("Malformed syntax tree: {message}")]
    MalformedTree { message: String },

    /// A fix was requested against a tree other than the one it was
    /// diagnosed on. Reported so the caller can no-op, not fatal.
    #[error("Stale fix: {message}")]
    StaleFix { message: String },

    /// Two fixes in one batch target overlapping nodes
    #[error("Fix conflict: {message}")]
    FixConflict { message: String },

    /// Configuration loading or validation errors
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// Rule registration or execution errors
    #[error("Rule error in '{rule_id}': {message}")]
    RuleError { rule_id: String, message: String },

    /// File system I/O errors
    #[error("IO error for path '{path}': {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Execution engine errors
    #[error("Execution error: {message}")]
    ExecutionError { message: String },

    /// The scan or fix observed the cancellation signal and stopped
    #[error("Operation cancelled")]
    Cancelled,

    /// Generic internal errors
    #[error("Internal error: {message}")]
    InternalError { message: String },
}

/// Error kind enumeration for categorizing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Parse,
    MalformedTree,
    StaleFix,
    FixConflict,
    Config,
    Rule,
    Io,
    Execution,
    Cancelled,
    Internal,
}

impl NoriError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            NoriError::ParseError { .. } => ErrorKind::Parse,
            NoriError::MalformedTree { .. } => ErrorKind::MalformedTree,
            NoriError::StaleFix { .. } => ErrorKind::StaleFix,
            NoriError::FixConflict { .. } => ErrorKind::FixConflict,
            NoriError::ConfigError { .. } => ErrorKind::Config,
            NoriError::RuleError { .. } => ErrorKind::Rule,
            NoriError::IoError { .. } => ErrorKind::Io,
            NoriError::ExecutionError { .. } => ErrorKind::Execution,
            NoriError::Cancelled => ErrorKind::Cancelled,
            NoriError::InternalError { .. } => ErrorKind::Internal,
        }
    }

    /// Whether processing of other files can continue after this error.
    /// `MalformedTree` is deliberately not recoverable: it signals a host
    /// contract violation, and continuing would report corrupted offsets.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::Parse | ErrorKind::Rule | ErrorKind::StaleFix | ErrorKind::FixConflict
        )
    }

    pub fn parse_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::ParseError {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn malformed_tree(message: impl Into<String>) -> Self {
        Self::MalformedTree {
            message: message.into(),
        }
    }

    pub fn stale_fix(message: impl Into<String>) -> Self {
        Self::StaleFix {
            message: message.into(),
        }
    }

    pub fn fix_conflict(message: impl Into<String>) -> Self {
        Self::FixConflict {
            message: message.into(),
        }
    }

    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    pub fn rule_error(rule_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::RuleError {
            rule_id: rule_id.into(),
            message: message.into(),
        }
    }

    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::IoError {
            path: path.into(),
            source,
        }
    }

    pub fn execution_error(message: impl Into<String>) -> Self {
        Self::ExecutionError {
            message: message.into(),
        }
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::InternalError {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for NoriError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError {
            path: PathBuf::new(),
            source: err,
        }
    }
}
