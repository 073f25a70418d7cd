//! Rule engine
//!
//! Holds the registry of analyzers and drives the pipeline: scan a
//! document into diagnostics, re-validate and rewrite on fix requests, and
//! batch-apply every surviving fix against one tree snapshot.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use nori_core::cst::edit::{TreeEdit, apply_edits};
use nori_core::{
    Applicability, Diagnostic, Document, Fix, FixConfig, FixSafety, NoriConfig, NoriError,
    Result, RuleContext, SemanticModel, SyntaxRule, resolve_conflicts,
};

/// Registry of analyzers keyed by rule id
#[derive(Default)]
pub struct RuleRegistry {
    rules: Vec<Arc<dyn SyntaxRule>>,
    by_id: HashMap<String, usize>,
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a rule; ids must be unique and well-formed.
    pub fn register(&mut self, rule: Arc<dyn SyntaxRule>) -> Result<()> {
        let metadata = rule.metadata();
        metadata.validate()?;
        let id = metadata.id.clone();
        if self.by_id.contains_key(&id) {
            return Err(NoriError::rule_error(
                &id,
                "a rule with this id is already registered",
            ));
        }
        self.by_id.insert(id, self.rules.len());
        self.rules.push(rule);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&Arc<dyn SyntaxRule>> {
        self.by_id.get(id).map(|&idx| &self.rules[idx])
    }

    pub fn rules(&self) -> &[Arc<dyn SyntaxRule>] {
        &self.rules
    }

    pub fn ids(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.metadata().id.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Outcome of a fix request
#[derive(Debug)]
pub enum FixOutcome {
    /// The rewrite went through; here is the new source
    Applied { text: String },
    /// The tree changed since the diagnostic was raised; nothing was done
    Stale,
}

/// Outcome of a batch fix over one document
#[derive(Debug)]
pub struct FixAllResult {
    /// New source after applying every surviving fix
    pub text: String,
    /// Number of fixes applied
    pub applied: usize,
    /// Diagnostics whose fix was dropped (stale, unsafe under the current
    /// config, or overlapping a fix that won)
    pub skipped: usize,
}

/// The engine: registry + configuration
pub struct RuleEngine {
    registry: RuleRegistry,
    config: NoriConfig,
}

impl RuleEngine {
    pub fn new(registry: RuleRegistry, config: NoriConfig) -> Self {
        Self { registry, config }
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    pub fn config(&self) -> &NoriConfig {
        &self.config
    }

    /// Scan one document with every enabled rule. Diagnostics come back
    /// sorted by source position, with severities resolved against the
    /// configuration.
    pub fn check(&self, document: &Document) -> Vec<Diagnostic> {
        let semantics = SemanticModel::new(document.root());
        let ctx = RuleContext {
            document,
            semantics: &semantics,
        };

        let mut diagnostics = Vec::new();
        for rule in self.registry.rules() {
            let metadata = rule.metadata();
            if !self.config.is_enabled(&metadata.id) {
                debug!(rule = %metadata.id, "rule disabled by configuration");
                continue;
            }
            let Some(severity) = self.config.severity_for(&metadata.id, metadata.severity) else {
                continue;
            };

            let mut found = rule.check(&ctx);
            for diagnostic in &mut found {
                diagnostic.severity = severity;
            }
            diagnostics.extend(found);
        }

        diagnostics.sort_by_key(|d| (d.location.offset, d.rule_id.clone()));
        diagnostics
    }

    /// Apply the fix for a single diagnostic against the CURRENT document.
    ///
    /// The rule re-validates first: when the diagnosed shape no longer
    /// exists in this tree the outcome is [`FixOutcome::Stale`] and the
    /// document is untouched.
    pub fn fix(&self, document: &Document, diagnostic: &Diagnostic) -> Result<FixOutcome> {
        let rule = self.registry.get(&diagnostic.rule_id).ok_or_else(|| {
            NoriError::rule_error(&diagnostic.rule_id, "no such rule registered")
        })?;

        let semantics = SemanticModel::new(document.root());
        let ctx = RuleContext {
            document,
            semantics: &semantics,
        };

        match rule.fix(&ctx, diagnostic)? {
            Some(edit) => {
                let new_root = apply_edits(document.root(), vec![edit])?;
                Ok(FixOutcome::Applied {
                    text: new_root.text().to_string(),
                })
            }
            None => Ok(FixOutcome::Stale),
        }
    }

    /// Compute every fix against one snapshot and apply them in a single
    /// combined tree replacement. Nothing is ever applied against an
    /// intermediate tree.
    pub fn fix_all(&self, document: &Document, config: &FixConfig) -> Result<FixAllResult> {
        let diagnostics = self.check(document);
        let semantics = SemanticModel::new(document.root());
        let ctx = RuleContext {
            document,
            semantics: &semantics,
        };

        let mut edits: Vec<TreeEdit> = Vec::new();
        let mut skipped = 0usize;

        for diagnostic in &diagnostics {
            let Some(rule) = self.registry.get(&diagnostic.rule_id) else {
                skipped += 1;
                continue;
            };
            if rule.metadata().fix_safety == FixSafety::Unsafe && !config.apply_unsafe {
                skipped += 1;
                continue;
            }
            match rule.fix(&ctx, diagnostic)? {
                Some(edit) => edits.push(edit),
                None => skipped += 1,
            }
        }

        // When two fixes target nested nodes the outer one wins; the inner
        // site gets another chance on the next scan of the fixed source.
        let before = edits.len();
        let edits = drop_nested_edits(edits);
        skipped += before - edits.len();

        let applied = edits.len();
        let new_root = apply_edits(document.root(), edits)?;

        Ok(FixAllResult {
            text: new_root.text().to_string(),
            applied,
            skipped,
        })
    }

    /// Text-level fix records for the diagnostics of one document, for
    /// reporting and previews. Overlapping records are resolved the same
    /// way the batch fixer resolves them.
    pub fn fixes_for(&self, document: &Document, diagnostics: &[Diagnostic]) -> Vec<Fix> {
        let semantics = SemanticModel::new(document.root());
        let ctx = RuleContext {
            document,
            semantics: &semantics,
        };

        let mut fixes = Vec::new();
        for diagnostic in diagnostics {
            let Some(rule) = self.registry.get(&diagnostic.rule_id) else {
                continue;
            };
            let applicability = match rule.metadata().fix_safety {
                FixSafety::Safe => Applicability::Always,
                FixSafety::Unsafe => Applicability::MaybeIncorrect,
            };
            match rule.fix(&ctx, diagnostic) {
                Ok(Some(edit)) => fixes.push(Fix::from_edit(
                    &diagnostic.rule_id,
                    &diagnostic.message,
                    &edit,
                    document,
                    applicability,
                )),
                Ok(None) => {}
                Err(error) => warn!(rule = %diagnostic.rule_id, %error, "fix computation failed"),
            }
        }
        resolve_conflicts(&fixes)
    }
}

/// Keep only edits whose target is not contained in another edit's target.
fn drop_nested_edits(edits: Vec<TreeEdit>) -> Vec<TreeEdit> {
    let targets: Vec<_> = edits.iter().map(|e| e.target().clone()).collect();
    edits
        .into_iter()
        .filter(|edit| {
            !edit
                .target()
                .ancestors()
                .skip(1)
                .any(|ancestor| targets.contains(&ancestor))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::{ConditionIsAlwaysFalse, SimplifyExpressionBodiedMember};

    fn engine() -> RuleEngine {
        let mut registry = RuleRegistry::new();
        registry
            .register(Arc::new(SimplifyExpressionBodiedMember::new()))
            .unwrap();
        registry
            .register(Arc::new(ConditionIsAlwaysFalse::new()))
            .unwrap();
        RuleEngine::new(registry, NoriConfig::default())
    }

    #[test]
    fn duplicate_registration_fails() {
        let mut registry = RuleRegistry::new();
        registry
            .register(Arc::new(SimplifyExpressionBodiedMember::new()))
            .unwrap();
        let err = registry
            .register(Arc::new(SimplifyExpressionBodiedMember::new()))
            .unwrap_err();
        assert!(matches!(err, NoriError::RuleError { .. }));
    }

    #[test]
    fn nested_fixes_keep_the_outer_edit() {
        let engine = engine();
        let document = Document::parse(
            "test.cs",
            "class C { void M() { if (false) { if (false) { A(); } } } }",
        )
        .unwrap();

        let diagnostics = engine.check(&document);
        assert_eq!(diagnostics.len(), 2);

        let result = engine.fix_all(&document, &FixConfig::safe_only()).unwrap();
        assert_eq!(result.applied, 1);
        assert_eq!(result.skipped, 1);
        assert_eq!(result.text, "class C { void M() {} }");
    }

    #[test]
    fn stale_diagnostic_is_a_noop() {
        let engine = engine();
        let old_document =
            Document::parse("test.cs", "class C { int M() { return 5; } }").unwrap();
        let diagnostics = engine.check(&old_document);
        assert_eq!(diagnostics.len(), 1);

        // The document changed shape before the fix was requested
        let new_document =
            Document::parse("test.cs", "class C { int M() { var x = 5; return x; } }").unwrap();
        let outcome = engine.fix(&new_document, &diagnostics[0]).unwrap();
        assert!(matches!(outcome, FixOutcome::Stale));
    }
}
