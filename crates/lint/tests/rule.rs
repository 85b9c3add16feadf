use std::fs;
use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::TempDir;
use varguard_lint::{LintReport, Rule};

fn write(root: &Path, relative: &str, contents: &str) -> PathBuf {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, contents).unwrap();
    path
}

async fn lint_file(rule: &Rule, path: &Path) -> LintReport {
    let source = fs::read_to_string(path).unwrap();
    rule.lint_source(&source, Some(path)).await.unwrap()
}

fn words(report: &LintReport) -> Vec<&str> {
    report
        .warnings()
        .filter_map(|d| d.word.as_deref())
        .collect()
}

#[tokio::test]
async fn test_import_from_sources_fold_in_order() {
    let dir = TempDir::new().unwrap();
    let a = write(dir.path(), "a.json", r#"{ "customProperties": { "--shared": "a", "--a": "1" } }"#);
    let b = write(dir.path(), "b.css", ":root { --shared: b; --b: 1; }");

    let rule = Rule::new(
        &json!(true),
        &json!({ "importFrom": [a.to_string_lossy(), b.to_string_lossy()] }),
    );
    let imported = rule.imported_properties().await.unwrap();
    assert_eq!(imported.get("--shared").map(String::as_str), Some("b"));

    let entry = write(
        dir.path(),
        "entry.css",
        ".x { color: var(--a); background: var(--b); border-color: var(--c); }",
    );
    let report = lint_file(&rule, &entry).await;
    assert_eq!(words(&report), vec!["--c"]);
}

#[tokio::test]
async fn test_stylesheet_imports_are_followed() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "node_modules/design/tokens.css", ":root { --space: 4px; }");
    write(dir.path(), "styles/theme.css", "@import 'design/tokens.css';\n:root { --ink: #111; }");
    let entry = write(
        dir.path(),
        "styles/app.css",
        "@import './theme.css';\n.app { color: var(--ink); padding: var(--space); margin: var(--gutter); }",
    );

    let rule = Rule::new(&json!(true), &serde_json::Value::Null);
    let report = lint_file(&rule, &entry).await;
    assert_eq!(words(&report), vec!["--gutter"]);
}

#[tokio::test]
async fn test_broken_import_does_not_stop_detection() {
    let dir = TempDir::new().unwrap();
    let entry = write(
        dir.path(),
        "app.css",
        "@import 'nowhere.css';\n@import url(\"also/missing.css\");\n.a { color: var(--nope); }",
    );

    let rule = Rule::new(&json!(true), &serde_json::Value::Null);
    let report = lint_file(&rule, &entry).await;
    assert_eq!(words(&report), vec!["--nope"]);
}

#[tokio::test]
async fn test_missing_import_from_source_is_ignored() {
    let dir = TempDir::new().unwrap();
    let rule = Rule::new(
        &json!(true),
        &json!({ "importFrom": [
            dir.path().join("missing.css").to_string_lossy(),
            { "customProperties": { "--ok": "1" } }
        ] }),
    );
    let report = rule
        .lint_source(".a { color: var(--ok); }", None)
        .await
        .unwrap();
    assert!(report.is_clean());
}

#[tokio::test]
async fn test_cyclic_imports_still_lint() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "b.css", "@import 'a.css';\n:root { --b: 1; }");
    let a = write(
        dir.path(),
        "a.css",
        "@import 'b.css';\n.a { width: var(--b); height: var(--missing); }",
    );

    let rule = Rule::new(&json!(true), &serde_json::Value::Null);
    let report = lint_file(&rule, &a).await;
    assert_eq!(words(&report), vec!["--missing"]);
}

#[tokio::test]
async fn test_resolver_search_paths() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "vendor/palette.css", ":root { --accent: gold; }");
    let entry = write(
        dir.path(),
        "src/app.css",
        "@import 'palette';\n.a { color: var(--accent); }",
    );

    let rule = Rule::new(
        &json!(true),
        &json!({ "resolver": { "paths": [dir.path().join("vendor")] } }),
    );
    let report = lint_file(&rule, &entry).await;
    assert!(report.is_clean());
}

#[tokio::test]
async fn test_non_scalar_source_values_are_still_known() {
    let dir = TempDir::new().unwrap();
    let flags = write(
        dir.path(),
        "flags.json",
        r#"{ "customProperties": { "--flag": true, "--nil": null, "--obj": { "k": 1 } } }"#,
    );
    let module = write(
        dir.path(),
        "tokens.mjs",
        "const base = 4;\nexport default { customProperties: { '--a': base * 2, '--b': `${base}px` } };",
    );

    let rule = Rule::new(
        &json!(true),
        &json!({ "importFrom": [flags.to_string_lossy(), module.to_string_lossy()] }),
    );
    let report = rule
        .lint_source(
            ".a { a: var(--flag); b: var(--nil); c: var(--obj); d: var(--a); e: var(--b); }",
            None,
        )
        .await
        .unwrap();
    assert!(report.is_clean(), "{:?}", report.diagnostics);
}

#[tokio::test]
async fn test_supports_condition_does_not_define_names() {
    let rule = Rule::new(&json!(true), &serde_json::Value::Null);

    let report = rule
        .lint_source("@supports (--flag: 1) { .a { color: red; } } .b { color: var(--flag); }", None)
        .await
        .unwrap();
    assert_eq!(words(&report), vec!["--flag"]);

    let report = rule
        .lint_source("@supports (color: var(--s)) { .a { color: var(--s); } }", None)
        .await
        .unwrap();
    assert_eq!(words(&report), vec!["--s"]);
}
