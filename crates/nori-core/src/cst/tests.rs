//! Parser tests: structure and lossless round-tripping

use super::ast::{AstNode, MethodDecl, PropertyDecl};
use super::{CsSyntaxKind, parse_cs};

fn assert_roundtrip(source: &str) {
    let (cst, errors) = parse_cs(source);
    assert!(errors.is_empty(), "lexer errors for {source:?}: {errors:?}");
    assert_eq!(
        cst.text().to_string(),
        source,
        "round-trip failed for {source:?}"
    );
}

#[test]
fn roundtrip_method_declarations() {
    assert_roundtrip("class C { int M() { return 5; } }");
    assert_roundtrip("class C\n{\n    int MyMethod()\n    {\n        return 5;\n    }\n}");
    assert_roundtrip("class C { void M() { Console.WriteLine(); } }");
    assert_roundtrip("class C { int M() => 5; }");
    assert_roundtrip("class C { public static int M(int a, string b) { return a; } }");
}

#[test]
fn roundtrip_properties() {
    assert_roundtrip("class C { string P { get { return \"myString\"; } } }");
    assert_roundtrip("class C { int P { get; set; } }");
    assert_roundtrip("class C { string P => \"x\"; }");
    assert_roundtrip("class C { int P { [Test] get { return 5; } } }");
    assert_roundtrip("class C { int P { get { return 1; } set { field = value; } } }");
}

#[test]
fn roundtrip_statements() {
    assert_roundtrip("class C { void M() { if (true) { x(); } else { y(); } } }");
    assert_roundtrip("class C { void M() { if (x) y(); } }");
    assert_roundtrip("class C { void M() { while (true) { x(); } } }");
    assert_roundtrip("class C { void M() { do { x(); } while (true); } }");
    assert_roundtrip("class C { void M() { using (var r = Open()) { x(); } } }");
    assert_roundtrip(
        "class C { int M() { switch (x) { case 1: return 1; default: return 0; } } }",
    );
    assert_roundtrip("class C { void M() { throw new NotImplementedException(); } }");
    assert_roundtrip("class C { int M() { var x = 1 + 2; return x; } }");
    assert_roundtrip("class C { void M() { { return; } } }");
}

#[test]
fn roundtrip_full_file() {
    assert_roundtrip(
        "using System;\nusing System.Text;\n\nnamespace ConsoleApplication1\n{\n    class MyClass\n    {\n        int MyMethod()\n        {\n            return 5;\n        }\n    }\n}\n",
    );
}

#[test]
fn roundtrip_preserves_comments() {
    assert_roundtrip("class C { int M() { return 5; /* comments */ } }");
    assert_roundtrip("class C {\n    // leading\n    int M() { return 5; }\n}");
    assert_roundtrip("class C { int P { /* test */ get { return 5; } /* more test */ } }");
    assert_roundtrip("#region top\nclass C { }\n#endregion\n");
}

#[test]
fn method_structure() {
    let (cst, _) = parse_cs("class C { int MyMethod() { return 5; } }");
    let method = cst.descendants().find_map(MethodDecl::cast).unwrap();

    assert_eq!(method.syntax().kind(), CsSyntaxKind::MethodDecl);
    assert_eq!(method.name().unwrap(), "MyMethod");
    assert_eq!(
        method.syntax().text().to_string(),
        "int MyMethod() { return 5; }"
    );

    let body = method.body().unwrap();
    let statements: Vec<_> = body.statements().collect();
    assert_eq!(statements.len(), 1);
    assert_eq!(statements[0].kind(), CsSyntaxKind::ReturnStmt);
}

#[test]
fn arrow_property_structure() {
    let (cst, _) = parse_cs("class C { string P => \"x\"; }");
    let property = cst.descendants().find_map(PropertyDecl::cast).unwrap();
    assert!(property.accessor_list().is_none());
    assert!(property.arrow_clause().is_some());
}

#[test]
fn bare_control_flow_bodies() {
    let sources = [
        ("class C { int M() { if (x) return 5; } }", CsSyntaxKind::IfStmt),
        ("class C { int M() { while (x) x(); } }", CsSyntaxKind::WhileStmt),
        ("class C { int M() { do x(); while (y); } }", CsSyntaxKind::DoStmt),
        ("class C { void M() { using (r) x(); } }", CsSyntaxKind::UsingStmt),
    ];
    for (source, expected) in sources {
        let (cst, errors) = parse_cs(source);
        assert!(errors.is_empty());
        assert_eq!(cst.text().to_string(), source);
        let method = cst.descendants().find_map(MethodDecl::cast).unwrap();
        let statements: Vec<_> = method.body().unwrap().statements().collect();
        assert_eq!(statements.len(), 1, "in {source:?}");
        assert_eq!(statements[0].kind(), expected, "in {source:?}");
    }
}

#[test]
fn nested_block_is_single_statement() {
    let (cst, _) = parse_cs("class C { int M() { { return 5; } } }");
    let method = cst.descendants().find_map(MethodDecl::cast).unwrap();
    let statements: Vec<_> = method.body().unwrap().statements().collect();
    assert_eq!(statements.len(), 1);
    assert_eq!(statements[0].kind(), CsSyntaxKind::Block);
}

#[test]
fn unreachable_code_is_two_statements() {
    let (cst, _) = parse_cs("class C { int M() { return 5; return 6; } }");
    let method = cst.descendants().find_map(MethodDecl::cast).unwrap();
    assert_eq!(method.body().unwrap().statement_count(), 2);
}

#[test]
fn attributes_attach_to_accessors() {
    let (cst, _) = parse_cs("class C { int P { [Test] get { return 5; } } }");
    let property = cst.descendants().find_map(PropertyDecl::cast).unwrap();
    let accessor = property
        .accessor_list()
        .unwrap()
        .accessors()
        .next()
        .unwrap();
    assert_eq!(accessor.attribute_lists().count(), 1);
}

#[test]
fn garbage_recovers_with_error_nodes() {
    let (cst, _) = parse_cs("class C { $$$ int M() { return 5; } }");
    assert!(cst
        .descendants()
        .any(|n| n.kind() == CsSyntaxKind::Error));
    // The method after the garbage still parses
    assert!(cst.descendants().find_map(MethodDecl::cast).is_some());
}
