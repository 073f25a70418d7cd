//! CLI integration tests

use assert_cmd::Command;

fn nori() -> Command {
    Command::cargo_bin("nori").unwrap()
}

#[test]
fn check_reports_findings() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("sample.cs");
    std::fs::write(&file, "class C\n{\n    int MyMethod()\n    {\n        return 5;\n    }\n}\n").unwrap();

    nori()
        .args(["check", "--no-color"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicates::str::contains(
            "Method 'MyMethod' can be expression-bodied",
        ));
}

#[test]
fn fix_rewrites_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("sample.cs");
    std::fs::write(&file, "class C\n{\n    int MyMethod()\n    {\n        return 5;\n    }\n}\n").unwrap();

    nori().arg("fix").arg(&file).assert().success();

    let fixed = std::fs::read_to_string(&file).unwrap();
    assert_eq!(fixed, "class C\n{\n    int MyMethod() => 5;\n}\n");
}

#[test]
fn fix_dry_run_leaves_the_file_alone() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("sample.cs");
    let original = "class C\n{\n    int MyMethod()\n    {\n        return 5;\n    }\n}\n";
    std::fs::write(&file, original).unwrap();

    nori()
        .args(["fix", "--dry-run"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicates::str::contains("=> 5;"));

    assert_eq!(std::fs::read_to_string(&file).unwrap(), original);
}

#[test]
fn rules_lists_builtins() {
    nori()
        .arg("rules")
        .assert()
        .success()
        .stdout(predicates::str::contains("builtin/style/expression-body"))
        .stdout(predicates::str::contains(
            "builtin/suspicious/condition-always-false",
        ));
}

#[test]
fn check_respects_config() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join(".nori.toml"),
        "[rules]\n\"builtin/style/expression-body\" = \"off\"\n",
    )
    .unwrap();
    let file = dir.path().join("sample.cs");
    std::fs::write(&file, "class C { int M() { return 5; } }").unwrap();

    nori()
        .args(["check", "--no-color"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicates::str::contains("no issues found"));
}
