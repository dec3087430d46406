//! Integration tests for the hestia-site CLI
//!
//! These tests exercise the CLI commands end-to-end using assert_cmd against
//! a small site laid out in a temp directory.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const SITE: &str = r#"i18n:
  locales: [ru]
  default_locale: ru
title:
  ru: Hestia
  en: Hestia
social:
  - icon: github
    label: GitHub
    href: https://github.com/moevm4388/hestia
sidebar:
  - label: Guides
    items:
      - label: Example Guide
        slug: guides/example
  - label: Reference
    autogenerate:
      directory: reference
"#;

const COMMENTS: &str = r#"- id: 1
  name: Alice
  login: alice
  body: Very handy for checking homework.
  avatar: https://avatars.example.com/alice.png
  href: https://github.com/alice
- id: 2
  name: Bob
  login: bob
  body: Clear explanations of the algorithms.
  avatar: https://avatars.example.com/bob.png
  href: https://github.com/bob
"#;

/// Helper to get a hestia-site command
fn hestia() -> Command {
    let mut cmd = Command::cargo_bin("hestia-site").unwrap();
    cmd.env_remove("HESTIA_CONTENT_DIR")
        .env_remove("HESTIA_FORMAT")
        .env_remove("RUST_LOG");
    cmd
}

fn write(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

/// Helper to create a valid site in a temp directory
fn setup_site() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    write(root, "site.yaml", SITE);
    write(root, "src/content/comments/comments.yaml", COMMENTS);
    write(root, "src/content/docs/index.mdx", "---\ntitle: Hestia\ntemplate: splash\n---\nWelcome.\n");
    write(
        root,
        "src/content/docs/guides/example.md",
        "---\ntitle: Example Guide\ndescription: A guide in my new Starlight docs site.\n---\n\n## Further reading\n",
    );
    write(
        root,
        "src/content/docs/reference/example.md",
        "---\ntitle: Example Reference\nsidebar:\n  badge: New\n---\nReference pages are ideal for outlining how things work.\n",
    );
    tmp
}

// ============================================================================
// CLI Basic Tests
// ============================================================================

#[test]
fn test_help_displays() {
    hestia()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("validate"))
        .stdout(predicate::str::contains("completions"));
}

#[test]
fn test_version_displays() {
    hestia()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("hestia-site"));
}

#[test]
fn test_completions_bash() {
    hestia()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("hestia-site"));
}

// ============================================================================
// Validate Tests
// ============================================================================

#[test]
fn test_validate_valid_site() {
    let tmp = setup_site();
    hestia()
        .current_dir(tmp.path())
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("comments (2 entries)"))
        .stdout(predicate::str::contains("docs (3 entries)"))
        .stdout(predicate::str::contains("All content passed validation"));
}

#[test]
fn test_validate_is_quiet_on_stderr_by_default() {
    let tmp = setup_site();
    hestia()
        .current_dir(tmp.path())
        .args(["validate", "-c", "comments"])
        .assert()
        .success()
        .stderr(predicate::str::contains("loaded data file").not());
}

#[test]
fn test_validate_honours_rust_log() {
    let tmp = setup_site();
    hestia()
        .current_dir(tmp.path())
        .env("RUST_LOG", "debug")
        .args(["validate", "-c", "comments"])
        .assert()
        .success()
        .stderr(predicate::str::contains("loaded data file"));
}

#[test]
fn test_validate_verbose_flag_raises_level() {
    let tmp = setup_site();
    hestia()
        .current_dir(tmp.path())
        .args(["-v", "validate", "-c", "comments"])
        .assert()
        .success()
        .stderr(predicate::str::contains("resolved collection"))
        .stderr(predicate::str::contains("loaded data file").not());
}

#[test]
fn test_validate_discovers_project_from_subdirectory() {
    let tmp = setup_site();
    hestia()
        .current_dir(tmp.path().join("src/content/docs/guides"))
        .arg("validate")
        .assert()
        .success();
}

#[test]
fn test_validate_with_project_flag() {
    let tmp = setup_site();
    hestia()
        .arg("--project")
        .arg(tmp.path())
        .args(["validate", "--collection", "comments"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Validating 1 collection(s)"));
}

#[test]
fn test_validate_reports_malformed_avatar() {
    let tmp = setup_site();
    write(
        tmp.path(),
        "src/content/comments/comments.yaml",
        &COMMENTS.replace("https://avatars.example.com/bob.png", "not-a-url"),
    );

    hestia()
        .current_dir(tmp.path())
        .arg("validate")
        .assert()
        .failure()
        .stdout(predicate::str::contains("comments - 1 invalid record(s)"))
        .stdout(predicate::str::contains("id=2"))
        .stdout(predicate::str::contains("not a well-formed URL"))
        .stderr(predicate::str::contains("Validation failed"));
}

#[test]
fn test_validate_reports_every_invalid_record() {
    let tmp = setup_site();
    write(
        tmp.path(),
        "src/content/comments/comments.yaml",
        "- id: 0\n  name: A\n  login: a\n  body: b\n  avatar: https://x.test/a.png\n  href: https://x.test/a\n- id: 2\n  name: \"\"\n",
    );

    hestia()
        .current_dir(tmp.path())
        .args(["validate", "--collection", "comments"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("2 invalid record(s)"))
        .stdout(predicate::str::contains("positive integer"))
        .stdout(predicate::str::contains("login"));
}

#[test]
fn test_validate_summary_hides_details() {
    let tmp = setup_site();
    write(tmp.path(), "src/content/docs/broken.md", "---\ndescription: no title\n---\n");

    hestia()
        .current_dir(tmp.path())
        .args(["validate", "--summary"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Collections failed:  1"))
        .stdout(predicate::str::contains("required field is missing").not());
}

#[test]
fn test_validate_doc_without_title() {
    let tmp = setup_site();
    write(tmp.path(), "src/content/docs/broken.md", "Just a body, no frontmatter.\n");

    hestia()
        .current_dir(tmp.path())
        .args(["validate", "-c", "docs"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("broken"))
        .stdout(predicate::str::contains("title"));
}

#[test]
fn test_validate_yaml_syntax_error() {
    let tmp = setup_site();
    write(tmp.path(), "src/content/comments/comments.yaml", "- id: 1\n  name: [unclosed\n");

    hestia()
        .current_dir(tmp.path())
        .args(["validate", "-c", "comments"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("syntax error"));
}

#[test]
fn test_validate_missing_source() {
    let tmp = setup_site();
    fs::remove_file(tmp.path().join("src/content/comments/comments.yaml")).unwrap();

    hestia()
        .current_dir(tmp.path())
        .args(["validate", "-c", "comments"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("cannot read"));
}

#[test]
fn test_validate_unknown_collection() {
    let tmp = setup_site();
    hestia()
        .current_dir(tmp.path())
        .args(["validate", "--collection", "authors"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no collection named 'authors'"));
}

#[test]
fn test_validate_outside_project() {
    let tmp = TempDir::new().unwrap();
    hestia()
        .current_dir(tmp.path())
        .arg("validate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not inside a site project"));
}

#[test]
fn test_validate_empty_comments_file() {
    let tmp = setup_site();
    write(tmp.path(), "src/content/comments/comments.yaml", "");

    hestia()
        .current_dir(tmp.path())
        .args(["validate", "-c", "comments"])
        .assert()
        .success()
        .stdout(predicate::str::contains("comments (0 entries)"));
}

#[test]
fn test_validate_site() {
    let tmp = setup_site();
    hestia()
        .current_dir(tmp.path())
        .args(["validate", "--site"])
        .assert()
        .success()
        .stdout(predicate::str::contains("site.yaml (2 sidebar item(s))"));
}

#[test]
fn test_validate_site_unknown_slug() {
    let tmp = setup_site();
    write(tmp.path(), "site.yaml", &SITE.replace("slug: guides/example", "slug: guides/missing"));

    hestia()
        .current_dir(tmp.path())
        .args(["validate", "--site"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("guides/missing"));
}

#[test]
fn test_validate_respects_content_dir_env() {
    let tmp = setup_site();
    write(tmp.path(), "content/comments/comments.yaml", COMMENTS);

    hestia()
        .current_dir(tmp.path())
        .env("HESTIA_CONTENT_DIR", "content")
        .args(["validate", "-c", "comments"])
        .assert()
        .success();
}

// ============================================================================
// List / Show Tests
// ============================================================================

#[test]
fn test_list_comments_ids() {
    let tmp = setup_site();
    hestia()
        .current_dir(tmp.path())
        .args(["list", "comments", "-f", "id"])
        .assert()
        .success()
        .stdout("1\n2\n");
}

#[test]
fn test_list_comments_table() {
    let tmp = setup_site();
    hestia()
        .current_dir(tmp.path())
        .args(["list", "comments"])
        .assert()
        .success()
        .stdout(predicate::str::contains("LOGIN"))
        .stdout(predicate::str::contains("alice"))
        .stdout(predicate::str::contains("2 comment(s) found"));
}

#[test]
fn test_list_comments_json() {
    let tmp = setup_site();
    let output = hestia()
        .current_dir(tmp.path())
        .args(["list", "comments", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let entries: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(entries.as_array().unwrap().len(), 2);
    assert_eq!(entries[1]["login"], "bob");
    assert_eq!(entries[1]["id"], 2);
}

#[test]
fn test_list_docs_csv() {
    let tmp = setup_site();
    hestia()
        .current_dir(tmp.path())
        .args(["list", "docs", "-f", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("id,title,label,order,draft\n"))
        .stdout(predicate::str::contains("guides/example,Example Guide,,,no"));
}

#[test]
fn test_list_hides_drafts() {
    let tmp = setup_site();
    write(tmp.path(), "src/content/docs/wip.md", "---\ntitle: Work in progress\ndraft: true\n---\n");

    hestia()
        .current_dir(tmp.path())
        .args(["list", "docs", "-f", "id"])
        .assert()
        .success()
        .stdout(predicate::str::contains("wip").not());

    hestia()
        .current_dir(tmp.path())
        .args(["list", "docs", "-f", "id", "--drafts"])
        .assert()
        .success()
        .stdout(predicate::str::contains("wip"));
}

#[test]
fn test_show_comment_yaml() {
    let tmp = setup_site();
    hestia()
        .current_dir(tmp.path())
        .args(["show", "comments", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("login: bob"))
        .stdout(predicate::str::contains("github.com/bob"));
}

#[test]
fn test_show_doc_with_body() {
    let tmp = setup_site();
    hestia()
        .current_dir(tmp.path())
        .args(["show", "docs", "guides/example", "--body"])
        .assert()
        .success()
        .stdout(predicate::str::contains("title: Example Guide"))
        .stdout(predicate::str::contains("## Further reading"));
}

#[test]
fn test_show_unknown_entry() {
    let tmp = setup_site();
    hestia()
        .current_dir(tmp.path())
        .args(["show", "comments", "99"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no entry '99'"));
}

// ============================================================================
// Site Tests
// ============================================================================

#[test]
fn test_site_sidebar_tree() {
    let tmp = setup_site();
    hestia()
        .current_dir(tmp.path())
        .args(["site", "sidebar"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Guides"))
        .stdout(predicate::str::contains("Example Guide /guides/example/"))
        .stdout(predicate::str::contains("Example Reference /reference/example/ [New]"));
}

#[test]
fn test_site_sidebar_json() {
    let tmp = setup_site();
    let output = hestia()
        .current_dir(tmp.path())
        .args(["site", "sidebar", "-f", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let sidebar: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(sidebar[0]["type"], "group");
    assert_eq!(sidebar[0]["items"][0]["href"], "/guides/example/");
    assert_eq!(sidebar[1]["items"][0]["slug"], "reference/example");
}

#[test]
fn test_site_show() {
    let tmp = setup_site();
    hestia()
        .current_dir(tmp.path())
        .args(["site", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("default_locale: ru"));
}

#[test]
fn test_site_show_does_not_build_collections() {
    let tmp = setup_site();
    hestia()
        .current_dir(tmp.path())
        .env("RUST_LOG", "debug")
        .args(["site", "show"])
        .assert()
        .success()
        .stderr(predicate::str::contains("loaded site configuration"))
        .stderr(predicate::str::contains("registered collection").not());
}

#[test]
fn test_site_show_invalid_locale() {
    let tmp = setup_site();
    write(tmp.path(), "site.yaml", &SITE.replace("default_locale: ru", "default_locale: en"));

    hestia()
        .current_dir(tmp.path())
        .args(["site", "show"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid site configuration"))
        .stderr(predicate::str::contains("'en'"));
}

// ============================================================================
// Schema / Config Tests
// ============================================================================

#[test]
fn test_schema_list() {
    hestia()
        .args(["schema", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("comments"))
        .stdout(predicate::str::contains("DocPage"));
}

#[test]
fn test_schema_show_comments() {
    hestia()
        .args(["schema", "show", "comments"])
        .assert()
        .success()
        .stdout(predicate::str::contains("avatar"))
        .stdout(predicate::str::contains("Identity handle"));
}

#[test]
fn test_schema_show_docs_raw() {
    let output = hestia().args(["schema", "show", "docs", "--raw"]).output().unwrap();
    assert!(output.status.success());

    let schema: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(schema["required"][0], "title");
}

#[test]
fn test_schema_show_unknown() {
    hestia()
        .args(["schema", "show", "authors"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no collection named 'authors'"));
}

#[test]
fn test_schema_list_reports_malformed_settings() {
    let tmp = setup_site();
    write(tmp.path(), ".hestia/config.yaml", "content_dir: [unclosed\n");
    hestia()
        .current_dir(tmp.path())
        .args(["schema", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot load settings"));
}

#[test]
fn test_schema_list_outside_project_uses_default_layout() {
    let tmp = TempDir::new().unwrap();
    hestia()
        .current_dir(tmp.path())
        .args(["schema", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("comments.yaml"));
}

#[test]
fn test_config_keys() {
    hestia()
        .args(["config", "keys"])
        .assert()
        .success()
        .stdout(predicate::str::contains("content_dir"))
        .stdout(predicate::str::contains("default_format"));
}

#[test]
fn test_config_show_project_setting() {
    let tmp = setup_site();
    write(tmp.path(), ".hestia/config.yaml", "docs_dir: pages\n");

    hestia()
        .current_dir(tmp.path())
        .args(["config", "show", "docs_dir"])
        .assert()
        .success()
        .stdout("pages\n");
}

#[test]
fn test_config_default_format() {
    let tmp = setup_site();
    write(tmp.path(), ".hestia/config.yaml", "default_format: id\n");

    hestia()
        .current_dir(tmp.path())
        .args(["list", "comments"])
        .assert()
        .success()
        .stdout("1\n2\n");
}
