//! Integration tests: ledger updates on a temporary site.

use std::fs;
use std::path::Path;

use serde_json::{json, Value};

use grypi_core::{GithubContext, SiteLayout, VersionStyle};
use grypi_index::{LedgerError, LedgerUpdater};

fn layout(root: &Path, metadata: &Value) -> SiteLayout {
    let layout = SiteLayout::default().rooted_at(root);
    fs::create_dir_all(&layout.template_dir).unwrap();
    fs::create_dir_all(layout.package_dir("acme-tool")).unwrap();
    fs::write(layout.template_metadata(), metadata.to_string()).unwrap();
    layout
}

fn read(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

fn ctx(tag: &str) -> GithubContext {
    GithubContext::new("acme/acme-tool", format!("refs/tags/{tag}")).unwrap()
}

#[test]
fn first_release_seeds_a_single_record() {
    let dir = tempfile::tempdir().unwrap();
    let layout = layout(dir.path(), &json!({"command": "init", "display_name": "Acme"}));

    let update = LedgerUpdater::new(layout.clone()).update(&ctx("v1.0.0")).unwrap();
    assert!(update.seeded);
    assert_eq!(update.written_to, layout.template_metadata());
    assert_eq!(
        read(&layout.template_metadata()),
        json!([{"command": "init", "display_name": "Acme", "version": "v1.0.0"}])
    );
    assert!(!layout.package_ledger("acme-tool").exists());
}

#[test]
fn existing_list_ledger_is_appended() {
    let dir = tempfile::tempdir().unwrap();
    let layout = layout(dir.path(), &json!({"command": "init", "display_name": "Acme"}));
    fs::write(
        layout.package_ledger("acme-tool"),
        r#"[{"command": "init", "display_name": "Acme", "version": "v1.0.0"}]"#,
    )
    .unwrap();

    let update = LedgerUpdater::new(layout.clone()).update(&ctx("v1.1.0")).unwrap();
    assert!(!update.seeded);
    let written = read(&layout.template_metadata());
    let versions: Vec<_> = written
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["version"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(versions, vec!["v1.0.0", "v1.1.0"]);
}

#[test]
fn legacy_ledger_is_converted_then_appended() {
    let dir = tempfile::tempdir().unwrap();
    let layout = layout(dir.path(), &json!({"author": "y"}));
    fs::write(layout.package_ledger("acme-tool"), r#"{"v1.0.0": {"author": "x"}}"#).unwrap();

    LedgerUpdater::new(layout.clone()).update(&ctx("v2.0.0")).unwrap();
    assert_eq!(
        read(&layout.template_metadata()),
        json!([
            {"author": "x", "version": "v1.0.0"},
            {"author": "y", "version": "v2.0.0"}
        ])
    );
}

#[test]
fn dry_run_writes_before_failing() {
    let dir = tempfile::tempdir().unwrap();
    let layout = layout(dir.path(), &json!({"author": "y"}));

    let err = LedgerUpdater::new(layout.clone())
        .update(&ctx("1.0.0"))
        .unwrap_err();
    assert!(matches!(err, LedgerError::DryRun { tag } if tag == "1.0.0"));
    assert_eq!(
        read(&layout.template_metadata()),
        json!([{"author": "y", "version": "1.0.0"}])
    );
}

#[test]
fn plain_style_accepts_unprefixed_tags() {
    let dir = tempfile::tempdir().unwrap();
    let layout = layout(dir.path(), &json!({"author": "y"}));
    let updater = LedgerUpdater::new(layout).with_style(VersionStyle::Plain);
    assert_eq!(updater.style(), VersionStyle::Plain);
    assert!(updater.update(&ctx("1.0.0")).is_ok());
}

#[test]
fn non_object_metadata_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let layout = layout(dir.path(), &json!(["not", "an", "object"]));
    assert!(matches!(
        LedgerUpdater::new(layout).update(&ctx("v1.0.0")),
        Err(LedgerError::NotAnObject { found: "a list", .. })
    ));
}

#[test]
fn legacy_ledger_keeps_release_order() {
    let dir = tempfile::tempdir().unwrap();
    let layout = layout(dir.path(), &json!({"author": "z"}));
    fs::write(
        layout.package_ledger("acme-tool"),
        r#"{"v0.9.0": {"author": "x"}, "v0.10.0": {"author": "y"}}"#,
    )
    .unwrap();

    LedgerUpdater::new(layout.clone()).update(&ctx("v0.11.0")).unwrap();
    let versions: Vec<_> = read(&layout.template_metadata())
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["version"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(versions, vec!["v0.9.0", "v0.10.0", "v0.11.0"]);
}

#[test]
fn written_records_keep_field_order() {
    let dir = tempfile::tempdir().unwrap();
    let layout = layout(dir.path(), &json!({"display_name": "Acme", "command": "init"}));

    LedgerUpdater::new(layout.clone()).update(&ctx("v1.0.0")).unwrap();
    assert_eq!(
        fs::read_to_string(layout.template_metadata()).unwrap(),
        r#"[{"display_name":"Acme","command":"init","version":"v1.0.0"}]"#
    );
}
