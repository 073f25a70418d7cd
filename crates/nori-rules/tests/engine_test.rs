//! Engine-level integration: configuration, multi-file scans, fix records

use std::io::Write;
use std::sync::Arc;

use nori_core::{
    CancellationToken, Document, ExecutorConfig, FixConfig, NoriConfig, Severity, scan_files,
};
use nori_rules::default_engine;

#[test]
fn config_can_disable_a_rule() {
    let config = NoriConfig::from_toml(
        "[rules]\n\"builtin/style/expression-body\" = \"off\"\n",
    )
    .unwrap();
    let engine = default_engine(config).unwrap();

    let document = Document::parse("test.cs", "class C { int M() { return 5; } }").unwrap();
    assert!(engine.check(&document).is_empty());
}

#[test]
fn config_can_raise_severity() {
    let config = NoriConfig::from_toml(
        "[rules]\n\"builtin/style/expression-body\" = \"error\"\n",
    )
    .unwrap();
    let engine = default_engine(config).unwrap();

    let document = Document::parse("test.cs", "class C { int M() { return 5; } }").unwrap();
    let diagnostics = engine.check(&document);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].severity, Severity::Error);
}

#[test]
fn diagnostics_come_back_in_source_order() {
    let engine = default_engine(NoriConfig::default()).unwrap();
    let document = Document::parse(
        "test.cs",
        "class C\n{\n    int A() { return 1; }\n    void B() { if (false) { X(); } }\n    int D() { return 2; }\n}",
    )
    .unwrap();

    let diagnostics = engine.check(&document);
    assert_eq!(diagnostics.len(), 3);
    let offsets: Vec<_> = diagnostics.iter().map(|d| d.location.offset).collect();
    let mut sorted = offsets.clone();
    sorted.sort_unstable();
    assert_eq!(offsets, sorted);
}

#[test]
fn fix_records_expose_spans_and_replacements() {
    let engine = default_engine(NoriConfig::default()).unwrap();
    let document = Document::parse("test.cs", "class C { int M() { return 5; } }").unwrap();

    let diagnostics = engine.check(&document);
    let fixes = engine.fixes_for(&document, &diagnostics);
    assert_eq!(fixes.len(), 1);
    assert_eq!(fixes[0].replacement, "int M() => 5;");
    assert!(fixes[0].is_safe());
    assert!(fixes[0].needs_format);

    // Text application of the records agrees with the tree rewrite
    let text_applied =
        nori_core::apply_fixes_to_source(document.text(), &fixes).unwrap();
    let tree_applied = engine.fix_all(&document, &FixConfig::safe_only()).unwrap().text;
    assert_eq!(text_applied, tree_applied);
}

#[test]
fn parallel_scan_over_many_files() {
    let dir = tempfile::tempdir().unwrap();
    let mut files = Vec::new();
    for i in 0..8 {
        let path = dir.path().join(format!("file{i}.cs"));
        let mut file = std::fs::File::create(&path).unwrap();
        write!(
            file,
            "class Class{i}\n{{\n    int Method{i}()\n    {{\n        return {i};\n    }}\n}}"
        )
        .unwrap();
        files.push(path);
    }

    let engine = Arc::new(default_engine(NoriConfig::default()).unwrap());
    let engine_for_scan = Arc::clone(&engine);
    let result = scan_files(
        files,
        &ExecutorConfig::default(),
        &CancellationToken::new(),
        move |document| engine_for_scan.check(document),
    )
    .unwrap();

    assert_eq!(result.files.len(), 8);
    assert_eq!(result.total_diagnostics(), 8);
    assert!(!result.cancelled);

    for file_result in &result.files {
        assert_eq!(file_result.diagnostics.len(), 1);
        assert!(file_result.diagnostics[0]
            .message
            .contains("can be expression-bodied"));
    }
}

#[test]
fn cancellation_stops_a_scan() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("a.cs");
    std::fs::write(&path, "class C { }").unwrap();

    let token = CancellationToken::new();
    token.cancel();

    let engine = default_engine(NoriConfig::default()).unwrap();
    let result = scan_files(
        vec![path],
        &ExecutorConfig::default(),
        &token,
        move |document| engine.check(document),
    )
    .unwrap();

    assert!(result.cancelled);
    assert!(result.files.is_empty());
}
