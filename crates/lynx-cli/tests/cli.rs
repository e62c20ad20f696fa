//! CLI integration tests for Lynx
//!
//! Each test works on a database inside its own temporary directory and
//! points LYNX_CONFIG at a file that does not exist, so the user's own
//! configuration is never read.

use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Get a command instance for the lynx binary, isolated from the environment
fn lynx_cmd(dir: &Path) -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("lynx"));
    cmd.env("LYNX_CONFIG", dir.join("config.toml"))
        .env_remove("LYNX_DATA_DIR")
        .env_remove("LYNX_DATABASE")
        .env_remove("LYNX_VERBOSE")
        .env_remove("LYNX_LOG");
    cmd
}

/// Command with `--db` already pointing at the test database
fn lynx_db(dir: &Path) -> assert_cmd::Command {
    let mut cmd = lynx_cmd(dir);
    cmd.arg("--db").arg(db_path(dir));
    cmd
}

fn db_path(dir: &Path) -> PathBuf {
    dir.join("library.lynx")
}

/// Create a temporary directory holding an initialized database
fn setup_db() -> TempDir {
    let dir = TempDir::new().unwrap();
    lynx_db(dir.path())
        .args(["init", "--name", "Bookmarks"])
        .assert()
        .success();
    dir
}

/// Create a database with two entries and one playlist
fn setup_populated() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(
        db_path(dir.path()),
        "@META\n1.0.0\nBookmarks\n@MAIN\n\
         1^http://a^Alpha^ann+bob^rust\n\
         2^http://b^Beta^bob^go+rust\n\
         @PLAYLISTS\n\
         Morning^2+1+2\n\
         @FINAL",
    )
    .unwrap();
    dir
}

fn read_db(dir: &Path) -> String {
    fs::read_to_string(db_path(dir)).unwrap()
}

// =============================================================================
// Initialization
// =============================================================================

#[test]
fn test_init_creates_empty_database() {
    let dir = TempDir::new().unwrap();

    lynx_db(dir.path())
        .args(["init", "--name", "Bookmarks"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized database 'Bookmarks'"));

    assert_eq!(
        read_db(dir.path()),
        "@META\n1.0.0\nBookmarks\n@MAIN\n@PLAYLISTS\n@FINAL"
    );
}

#[test]
fn test_init_does_not_overwrite() {
    let dir = setup_populated();
    let before = read_db(dir.path());

    lynx_db(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Already initialized"));

    assert_eq!(read_db(dir.path()), before);
}

#[test]
fn test_init_uses_configured_default_name() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("config.toml"), "default_name = \"Reading\"\n").unwrap();

    lynx_db(dir.path()).arg("init").assert().success();

    assert!(read_db(dir.path()).starts_with("@META\n1.0.0\nReading\n"));
}

#[test]
fn test_init_rejects_marker_name() {
    let dir = TempDir::new().unwrap();

    lynx_db(dir.path())
        .args(["init", "--name", "@home"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("must not start with '@'"));

    assert!(!db_path(dir.path()).exists());
}

#[test]
fn test_missing_database_suggests_init() {
    let dir = TempDir::new().unwrap();

    lynx_db(dir.path())
        .args(["entry", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("lynx init"));
}

// =============================================================================
// Entries
// =============================================================================

#[test]
fn test_entry_add_assigns_free_id_and_saves() {
    let dir = setup_db();

    lynx_db(dir.path())
        .args(["entry", "add", "http://x", "--name", "X", "-a", "ann", "-t", "rust"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created entry: 1"));

    lynx_db(dir.path())
        .args(["entry", "add", "http://y"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created entry: 2"));

    assert_eq!(
        read_db(dir.path()),
        "@META\n1.0.0\nBookmarks\n@MAIN\n\
         1^http://x^X^ann^rust\n\
         2^http://y^http://y^^\n\
         @PLAYLISTS\n@FINAL"
    );
}

#[test]
fn test_entry_add_duplicate_id_fails() {
    let dir = setup_populated();
    let before = read_db(dir.path());

    lynx_db(dir.path())
        .args(["entry", "add", "http://z", "--id", "2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already in use"))
        .stderr(predicate::str::contains("Hint: Pick an unused id"));

    assert_eq!(read_db(dir.path()), before);
}

#[test]
fn test_entry_add_rejects_separator() {
    let dir = setup_db();

    lynx_db(dir.path())
        .args(["entry", "add", "http://x", "--name", "a^b"])
        .assert()
        .failure();

    lynx_db(dir.path())
        .args(["entry", "add", "http://x", "-t", "a+b"])
        .assert()
        .failure();
}

#[test]
fn test_entry_list_filters() {
    let dir = setup_populated();

    lynx_db(dir.path())
        .args(["--quiet", "entry", "list", "--author", "bob"])
        .assert()
        .success()
        .stdout("1\n2\n");

    lynx_db(dir.path())
        .args(["--quiet", "entry", "list", "--tag", "go"])
        .assert()
        .success()
        .stdout("2\n");

    lynx_db(dir.path())
        .args(["entry", "list", "--author", "nobody"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No entries found."));
}

#[test]
fn test_entry_show_json() {
    let dir = setup_populated();

    let out = lynx_db(dir.path())
        .args(["--json", "entry", "show", "2"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(value["id"], 2);
    assert_eq!(value["url"], "http://b");
    assert_eq!(value["tags"], serde_json::json!(["go", "rust"]));
}

#[test]
fn test_entry_show_missing_fails() {
    let dir = setup_populated();

    lynx_db(dir.path())
        .args(["entry", "show", "9"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("9"));
}

#[test]
fn test_entry_edit_keeps_unspecified_fields() {
    let dir = setup_populated();

    lynx_db(dir.path())
        .args(["entry", "edit", "1", "--name", "Renamed", "--clear-tags"])
        .assert()
        .success();

    assert!(read_db(dir.path()).contains("\n1^http://a^Renamed^ann+bob^\n"));
}

#[test]
fn test_entry_delete_cascades_to_playlists() {
    let dir = setup_populated();

    lynx_db(dir.path())
        .args(["entry", "delete", "2", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted entry: 2"));

    assert_eq!(
        read_db(dir.path()),
        "@META\n1.0.0\nBookmarks\n@MAIN\n\
         1^http://a^Alpha^ann+bob^rust\n\
         @PLAYLISTS\n\
         Morning^1\n\
         @FINAL"
    );
}

#[test]
fn test_entry_delete_without_tty_is_cancelled() {
    let dir = setup_populated();
    let before = read_db(dir.path());

    lynx_db(dir.path())
        .args(["entry", "delete", "1"])
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::contains("Cancelled."));

    assert_eq!(read_db(dir.path()), before);
}

#[test]
fn test_entry_reassign_rewrites_references() {
    let dir = setup_populated();

    lynx_db(dir.path())
        .args(["entry", "reassign", "2", "7"])
        .assert()
        .success();

    let text = read_db(dir.path());
    assert!(text.contains("\n7^http://b^Beta^bob^go+rust\n"));
    assert!(text.contains("\nMorning^7+1+7\n"));
}

#[test]
fn test_entry_reassign_to_used_id_fails() {
    let dir = setup_populated();

    lynx_db(dir.path())
        .args(["entry", "reassign", "1", "2"])
        .assert()
        .failure();
}

#[test]
fn test_normalize_renumbers() {
    let dir = TempDir::new().unwrap();
    fs::write(
        db_path(dir.path()),
        "@META\n1.0.0\nBookmarks\n@MAIN\n\
         5^http://a^A^^\n\
         3^http://b^B^^\n\
         @PLAYLISTS\n\
         Mix^3+5\n\
         @FINAL",
    )
    .unwrap();

    lynx_db(dir.path()).arg("normalize").assert().success();

    let text = read_db(dir.path());
    assert!(text.contains("\n1^http://a^A^^\n2^http://b^B^^\n"));
    assert!(text.contains("\nMix^2+1\n"));
}

// =============================================================================
// Playlists
// =============================================================================

#[test]
fn test_playlist_workflow() {
    let dir = setup_populated();

    lynx_db(dir.path())
        .args(["playlist", "create", "Evening"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created playlist #1: Evening"));

    lynx_db(dir.path())
        .args(["playlist", "add", "Evening", "1", "2", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added 3 entries"));

    lynx_db(dir.path())
        .args(["playlist", "remove", "#1", "1"])
        .assert()
        .success();

    lynx_db(dir.path())
        .args(["--quiet", "playlist", "show", "Evening"])
        .assert()
        .success()
        .stdout("2\n1\n");

    lynx_db(dir.path())
        .args(["--quiet", "playlist", "list"])
        .assert()
        .success()
        .stdout("Morning\nEvening\n");
}

#[test]
fn test_playlist_name_with_leading_marker_is_rejected() {
    let dir = setup_populated();
    let before = read_db(dir.path());

    lynx_db(dir.path())
        .args(["playlist", "create", "@work"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("must not start with '@'"));

    assert_eq!(read_db(dir.path()), before);

    // '@' anywhere else survives a save and reload
    lynx_db(dir.path())
        .args(["playlist", "create", "me@work"])
        .assert()
        .success();
    lynx_db(dir.path())
        .args(["--quiet", "playlist", "list"])
        .assert()
        .success()
        .stdout("Morning\nme@work\n");
}

#[test]
fn test_playlist_add_unknown_entry_leaves_playlist_untouched() {
    let dir = setup_populated();
    let before = read_db(dir.path());

    lynx_db(dir.path())
        .args(["playlist", "add", "Morning", "1", "42"])
        .assert()
        .failure();

    assert_eq!(read_db(dir.path()), before);
}

#[test]
fn test_playlist_unknown_name_fails() {
    let dir = setup_populated();

    lynx_db(dir.path())
        .args(["playlist", "show", "Nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Nope"));
}

#[test]
fn test_playlist_delete_keeps_entries() {
    let dir = setup_populated();

    lynx_db(dir.path())
        .args(["playlist", "delete", "Morning", "-y"])
        .assert()
        .success();

    let text = read_db(dir.path());
    assert!(text.ends_with("@PLAYLISTS\n@FINAL"));
    assert!(text.contains("\n1^http://a^"));
    assert!(text.contains("\n2^http://b^"));
}

// =============================================================================
// Catalog and status
// =============================================================================

#[test]
fn test_authors_and_tags_in_first_seen_order() {
    let dir = setup_populated();

    lynx_db(dir.path())
        .args(["--quiet", "authors"])
        .assert()
        .success()
        .stdout("ann\nbob\n");

    lynx_db(dir.path())
        .args(["--json", "tags"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"rust\"").and(predicate::str::contains("\"go\"")));
}

#[test]
fn test_status_reports_counts() {
    let dir = setup_populated();

    let out = lynx_db(dir.path())
        .args(["--json", "status"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(value["name"], "Bookmarks");
    assert_eq!(value["counts"]["entries"], 2);
    assert_eq!(value["counts"]["playlists"], 1);
    assert_eq!(value["counts"]["dangling_references"], 0);
}

#[test]
fn test_read_commands_do_not_rewrite_file() {
    let dir = TempDir::new().unwrap();
    // Old version stamp would be upgraded by any save
    let text = "@META\n0.9.0\nOld\n@MAIN\n1^http://a^A^^\n@PLAYLISTS\n@FINAL";
    fs::write(db_path(dir.path()), text).unwrap();

    lynx_db(dir.path()).arg("status").assert().success();
    lynx_db(dir.path()).args(["entry", "list"]).assert().success();

    assert_eq!(read_db(dir.path()), text);
}

#[test]
fn test_malformed_database_reports_line() {
    let dir = TempDir::new().unwrap();
    fs::write(
        db_path(dir.path()),
        "@META\n1.0.0\nBad\n@MAIN\n1^only-two\n@PLAYLISTS\n@FINAL",
    )
    .unwrap();

    lynx_db(dir.path())
        .arg("status")
        .assert()
        .failure()
        .stderr(predicate::str::contains("line 5"));
}

// =============================================================================
// Logging and configuration
// =============================================================================

#[test]
fn test_verbose_traces_to_stderr() {
    let dir = setup_populated();

    lynx_db(dir.path())
        .args(["--verbose", "entry", "show", "1"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Lynx file load starting"));
}

#[test]
fn test_config_set_and_show() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("elsewhere.lynx");

    lynx_cmd(dir.path())
        .args(["config", "set", "database"])
        .arg(&db)
        .assert()
        .success();

    lynx_cmd(dir.path())
        .args(["--quiet", "config", "show"])
        .assert()
        .success()
        .stdout(format!("{}\n", db.display()));

    // The configured database is used when --db is absent
    lynx_cmd(dir.path()).arg("init").assert().success();
    assert!(db.is_file());
}

#[test]
fn test_config_set_rejects_marker_default_name() {
    let dir = TempDir::new().unwrap();

    lynx_cmd(dir.path())
        .args(["config", "set", "default_name", "@home"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("must not start with '@'"));

    assert!(!dir.path().join("config.toml").exists());
}

#[test]
fn test_config_set_unknown_key_fails() {
    let dir = TempDir::new().unwrap();

    lynx_cmd(dir.path())
        .args(["config", "set", "colour", "blue"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown configuration key"));
}
