use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::{env, fs};

use tempfile::{TempDir, tempdir};
use zotsift_core::test_support::write_fixture_library;

fn cli_bin_path() -> PathBuf {
    if let Ok(path) = env::var("CARGO_BIN_EXE_zotsift") {
        return PathBuf::from(path);
    }

    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let workspace_root = manifest_dir
        .parent()
        .and_then(|p| p.parent())
        .map(PathBuf::from)
        .expect("workspace root");
    let bin_name = if cfg!(windows) {
        "zotsift.exe"
    } else {
        "zotsift"
    };
    let fallback = workspace_root.join("target").join("debug").join(bin_name);
    assert!(
        fallback.exists(),
        "zotsift binary not found at {}",
        fallback.display()
    );
    fallback
}

fn fixture() -> (TempDir, PathBuf) {
    let temp = tempdir().expect("tempdir");
    let zotero_dir = temp.path().join("Zotero");
    fs::create_dir_all(&zotero_dir).expect("mkdir");
    write_fixture_library(&zotero_dir.join("zotero.sqlite")).expect("fixture");
    (temp, zotero_dir)
}

// Isolated from the caller's config file and environment.
fn run_cli(home: &Path, zotero_dir: &Path, args: &[&str]) -> Output {
    Command::new(cli_bin_path())
        .arg("--zotero-dir")
        .arg(zotero_dir)
        .args(args)
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env("ZOTSIFT_HOST_TOOLS", "off")
        .env_remove("ZOTSIFT_CONFIG")
        .env_remove("ZOTSIFT_DATABASE")
        .env_remove("ZOTSIFT_SNAPSHOT")
        .env_remove("RUST_LOG")
        .output()
        .expect("run zotsift")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

#[test]
fn search_json_lists_ranked_candidates() {
    // Given the fixture library
    // When searching Orwell in the forties with --json
    // Then stdout holds both novels, 1984 first.
    let (temp, zotero_dir) = fixture();
    let output = run_cli(
        temp.path(),
        &zotero_dir,
        &["search", "-a", "Orwell", "-y", "1940-1950", "--json"],
    );
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("json");
    let candidates = value.as_array().expect("array");
    assert_eq!(candidates.len(), 2);
    assert_eq!(candidates[0]["item"]["key"], "ORWL1984");
    assert_eq!(candidates[0]["score"], 5);
    assert_eq!(candidates[0]["authors"][0]["last_name"], "Orwell");
}

#[test]
fn search_table_respects_limit() {
    let (temp, zotero_dir) = fixture();
    let output = run_cli(temp.path(), &zotero_dir, &["search", "-a", ".", "--limit", "2"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output).lines().count(), 2);
}

#[test]
fn empty_selection_prints_no_matches_and_succeeds() {
    let (temp, zotero_dir) = fixture();
    let output = run_cli(temp.path(), &zotero_dir, &["search", "-a", "Tolstoy"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output).trim(), "no matches");
}

#[test]
fn malformed_year_exits_non_zero() {
    let (temp, zotero_dir) = fixture();
    let output = run_cli(temp.path(), &zotero_dir, &["search", "-y", "abc"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("malformed date"));
    assert!(stdout(&output).is_empty());
}

#[test]
fn search_without_filters_is_a_usage_error() {
    let temp = tempdir().expect("tempdir");
    let output = run_cli(temp.path(), &temp.path().join("missing"), &["search"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("at least one of --author, --year, --added is required"));
}

#[test]
fn select_dry_run_prints_zotero_uri() {
    let (temp, zotero_dir) = fixture();
    let output = run_cli(temp.path(), &zotero_dir, &["select", "ORWL1984", "--dry-run"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output).trim(), "zotero://select/library/items/ORWL1984");
}

#[test]
fn open_dry_run_does_not_need_a_database() {
    let temp = tempdir().expect("tempdir");
    let output = run_cli(
        temp.path(),
        &temp.path().join("missing"),
        &["open", "PDF19840", "--dry-run"],
    );
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output).trim(), "zotero://open-pdf/library/items/PDF19840");
}

#[test]
fn picker_dry_run_opens_first_pdf() {
    let (temp, zotero_dir) = fixture();
    let mut child = Command::new(cli_bin_path())
        .arg("--zotero-dir")
        .arg(&zotero_dir)
        .args(["search", "-a", "Orwell", "--pick", "--dry-run"])
        .env("HOME", temp.path())
        .env("XDG_CONFIG_HOME", temp.path().join(".config"))
        .env_remove("ZOTSIFT_CONFIG")
        .stdin(std::process::Stdio::piped())
        .stdout(std::process::Stdio::piped())
        .spawn()
        .expect("spawn zotsift");
    {
        use std::io::Write;
        let mut stdin = child.stdin.take().expect("stdin");
        stdin.write_all(b"1\n").expect("answer prompt");
    }
    let output = child.wait_with_output().expect("wait");
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("zotero://open-pdf/library/items/PDF19840"));
}

#[test]
fn launch_blocked_by_policy_exits_non_zero() {
    let (temp, zotero_dir) = fixture();
    let output = run_cli(temp.path(), &zotero_dir, &["select", "ORWL1984"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("host tools blocked"));
}

#[test]
fn attachments_prints_resolved_paths() {
    let (temp, zotero_dir) = fixture();
    let output = run_cli(temp.path(), &zotero_dir, &["attachments", "ORWL1984"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("json");
    let attachments = value.as_array().expect("array");
    assert_eq!(attachments.len(), 1);
    assert_eq!(attachments[0]["key"], "PDF19840");
    let expected = zotero_dir.join("storage").join("PDF19840").join("orwell-1984.pdf");
    assert_eq!(
        attachments[0]["resolved_path"],
        expected.to_str().expect("utf8 path")
    );
}
