//! NORI Rules
//!
//! The built-in analyzers and the engine that runs them. Rules are wired
//! up through an explicit registration table: `builtin_rules()` lists
//! every shipped analyzer, and [`default_engine`] builds a ready-to-use
//! engine over them.

pub mod builtin;
pub mod engine;

use std::sync::Arc;

use once_cell::sync::Lazy;

use nori_core::{NoriConfig, Result, SyntaxRule};

pub use builtin::{ConditionIsAlwaysFalse, ConditionIsAlwaysTrue, SimplifyExpressionBodiedMember};
pub use engine::{FixAllResult, FixOutcome, RuleEngine, RuleRegistry};

/// The registration table: every shipped analyzer, in order.
static BUILTIN_RULES: Lazy<Vec<Arc<dyn SyntaxRule>>> = Lazy::new(|| {
    vec![
        Arc::new(SimplifyExpressionBodiedMember::new()),
        Arc::new(ConditionIsAlwaysFalse::new()),
        Arc::new(ConditionIsAlwaysTrue::new()),
    ]
});

/// Every shipped analyzer.
pub fn builtin_rules() -> Vec<Arc<dyn SyntaxRule>> {
    BUILTIN_RULES.clone()
}

/// Engine over the built-in rules with the given configuration.
pub fn default_engine(config: NoriConfig) -> Result<RuleEngine> {
    let mut registry = RuleRegistry::new();
    for rule in builtin_rules() {
        registry.register(rule)?;
    }
    Ok(RuleEngine::new(registry, config))
}
