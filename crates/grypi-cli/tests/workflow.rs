//! Integration test: the release workflow, end to end, through the
//! subcommand handlers.

use std::fs;
use std::path::Path;

use grypi_cli::check::{run_check, CheckArgs};
use grypi_cli::gate::{run_gate, GateArgs};
use grypi_cli::index::{run_index, IndexCliArgs, IndexCommand};
use grypi_cli::ledger::{run_ledger, LedgerArgs};
use grypi_cli::GlobalOptions;
use grypi_core::{PackageName, SiteLayout};
use grypi_index::PackageIndex;

const INDEX: &str = "<html>\n<body>\n  <div>\n    <a href=\"alpha/\">alpha<span> </span><span>1.0.0</span><span>First</span></a>\n  </div>\n</body>\n</html>\n";

const PAGE_TEMPLATE: &str = "<html>\n<body>\n  <div>\n    <section><h1>_package_name</h1><span>Latest</span><span>_version</span><p>_author: _long_description</p></section>\n    <a href=\"_link\">_package_name-_version</a>\n  </div>\n</body>\n</html>\n";

fn scaffold(root: &Path) -> SiteLayout {
    let layout = SiteLayout::default().rooted_at(root);
    let template = &layout.template_dir;
    fs::create_dir_all(template.join("template")).unwrap();
    fs::write(template.join("requirements.in"), "requests\n").unwrap();
    fs::write(
        template.join("setup.py"),
        "setup(\n    name=\"acme-tool\",\n    version=\"1.2.3\",\n)\n",
    )
    .unwrap();
    fs::write(
        template.join("metadata.json"),
        r#"{"command": "generate", "display_name": "Acme", "description": "Tools", "author": "ACME"}"#,
    )
    .unwrap();
    fs::write(template.join("README.md"), "# acme\n").unwrap();

    fs::create_dir_all(&layout.index_root).unwrap();
    fs::write(layout.index_file(), INDEX).unwrap();
    fs::write(layout.page_template(), PAGE_TEMPLATE).unwrap();
    layout
}

fn options(layout: &SiteLayout, tag: &str) -> GlobalOptions {
    GlobalOptions {
        template_dir: Some(layout.template_dir.clone()),
        index_root: Some(layout.index_root.clone()),
        context: Some(format!(
            r#"{{"repository": "acme/acme-tool", "event": {{"ref": "refs/tags/{tag}"}}}}"#
        )),
    }
}

#[test]
fn check_gate_and_publish() {
    let dir = tempfile::tempdir().unwrap();
    let layout = scaffold(dir.path());
    let opts = options(&layout, "1.2.3");

    assert_eq!(run_check(&CheckArgs { strict: false }, &opts).unwrap(), 0);
    assert!(run_check(&CheckArgs { strict: true }, &opts).is_err());

    let gate = GateArgs {
        strict: false,
        no_tag_cleanup: true,
        remote: "origin".to_string(),
        dependency_index: None,
    };
    assert_eq!(run_gate(&gate, &opts).unwrap(), 0);

    let publish = IndexCliArgs {
        command: IndexCommand::Publish,
    };
    assert_eq!(run_index(&publish, &opts).unwrap(), 0);

    let index = PackageIndex::load(&layout.index_file()).unwrap();
    let entry = index.entry(&PackageName::new("acme-tool").unwrap()).unwrap();
    assert_eq!(entry.version, "1.2.3");
    assert_eq!(entry.description, "Tools");
    assert!(layout.package_page("acme-tool").is_file());
}

#[test]
fn gate_rejects_mismatched_tag_without_cleanup() {
    let dir = tempfile::tempdir().unwrap();
    let layout = scaffold(dir.path());
    let opts = options(&layout, "1.2.4");
    let gate = GateArgs {
        strict: false,
        no_tag_cleanup: true,
        remote: "origin".to_string(),
        dependency_index: None,
    };
    let err = run_gate(&gate, &opts).unwrap_err();
    assert!(format!("{err:#}").contains("does not match tag"));
}

#[test]
fn ledger_dry_run_fails_after_writing() {
    let dir = tempfile::tempdir().unwrap();
    let layout = scaffold(dir.path());
    let opts = options(&layout, "1.2.3");

    let err = run_ledger(&LedgerArgs { plain: false }, &opts).unwrap_err();
    assert!(format!("{err:#}").contains("Running dry"));

    let written: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(layout.template_metadata()).unwrap()).unwrap();
    assert_eq!(written[0]["version"], "1.2.3");
}

#[test]
fn ledger_accepts_prefixed_tag() {
    let dir = tempfile::tempdir().unwrap();
    let layout = scaffold(dir.path());
    let opts = options(&layout, "v1.2.3");
    assert_eq!(run_ledger(&LedgerArgs { plain: false }, &opts).unwrap(), 0);
}
