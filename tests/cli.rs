//! Integration tests driving the cellcalc binary against a sqlite file.

use std::path::Path;
use std::process::Command;

fn run_command(db: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_cellcalc"))
        // Tests must be deterministic and not depend on a user's config file or keys.
        .arg("--no-config")
        .arg("--backend")
        .arg("sqlite")
        .arg("--database")
        .arg(db)
        .args(args)
        .env_remove("CELLCALC_CONFIG")
        .env_remove("CELLCALC_LOG")
        .env_remove("FORMULA_KEY")
        .env_remove("FBASE")
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let exit_code = output.status.code().unwrap_or(-1);

    (stdout, stderr, exit_code)
}

fn temp_db() -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cells.db");
    (dir, path)
}

#[test]
fn test_put_reports_created_then_updated() {
    let (_dir, db) = temp_db();
    let (stdout, _, code) = run_command(&db, &["put", "A", "1 + 2"]);
    assert_eq!(stdout.trim(), "Created A");
    assert_eq!(code, 0);

    let (stdout, _, code) = run_command(&db, &["put", "A", "3"]);
    assert_eq!(stdout.trim(), "Updated A");
    assert_eq!(code, 0);
}

#[test]
fn test_resolve_whole_token() {
    let (_dir, db) = temp_db();
    run_command(&db, &["put", "1", "5"]);
    run_command(&db, &["put", "T", "12+1"]);
    let (stdout, _, code) = run_command(&db, &["resolve", "T"]);
    assert_eq!(stdout.trim(), "12+(5)");
    assert_eq!(code, 0);
}

#[test]
fn test_resolve_missing_reference_and_repeats() {
    let (_dir, db) = temp_db();
    run_command(&db, &["put", "A", "B+B"]);
    run_command(&db, &["put", "B", "2"]);
    run_command(&db, &["put", "C", "X+3"]);

    let (stdout, _, _) = run_command(&db, &["resolve", "A"]);
    assert_eq!(stdout.trim(), "(2)+(2)");
    let (stdout, _, _) = run_command(&db, &["get", "C", "--expression"]);
    assert_eq!(stdout.trim(), "0+3");
}

#[test]
fn test_resolve_not_found_exit_code() {
    let (_dir, db) = temp_db();
    let (stdout, stderr, code) = run_command(&db, &["resolve", "missing"]);
    assert!(stdout.is_empty());
    assert!(stderr.contains("not found"));
    assert_eq!(code, 2);
}

#[test]
fn test_cycle_terminates_with_warning() {
    let (_dir, db) = temp_db();
    run_command(&db, &["put", "A", "B"]);
    let (_, stderr, code) = run_command(&db, &["put", "B", "A"]);
    assert_eq!(code, 0);
    assert!(stderr.contains("reference cycle"));

    let (stdout, stderr, code) = run_command(&db, &["resolve", "A"]);
    assert_eq!(code, 0);
    assert!(stderr.contains("stopped after"));
    assert!(
        stdout
            .trim()
            .chars()
            .all(|c| c == '(' || c == ')' || c == '0')
    );
}

#[test]
fn test_list_delete_and_reset() {
    let (_dir, db) = temp_db();
    for id in ["b", "a", "c"] {
        run_command(&db, &["put", id, "1"]);
    }
    let (stdout, _, _) = run_command(&db, &["list"]);
    assert_eq!(stdout, "a\nb\nc\n");

    let (stdout, _, code) = run_command(&db, &["delete", "b"]);
    assert_eq!(stdout.trim(), "Deleted b");
    assert_eq!(code, 0);
    let (_, _, code) = run_command(&db, &["delete", "b"]);
    assert_eq!(code, 2);

    let (_, _, code) = run_command(&db, &["reset"]);
    assert_eq!(code, 0);
    let (stdout, _, _) = run_command(&db, &["list"]);
    assert!(stdout.is_empty());
}

#[test]
fn test_invalid_cell_id() {
    let (_dir, db) = temp_db();
    let (_, stderr, code) = run_command(&db, &["put", "a+b", "1"]);
    assert!(stderr.contains("invalid cell id"));
    assert_eq!(code, 1);
}

#[test]
fn test_get_without_solver_key() {
    let (_dir, db) = temp_db();
    run_command(&db, &["put", "A", "1"]);
    let (_, stderr, code) = run_command(&db, &["get", "A"]);
    assert!(stderr.contains("FORMULA_KEY"));
    assert_eq!(code, 1);
}

#[test]
fn test_get_missing_cell_is_not_found_before_solver_setup() {
    let (_dir, db) = temp_db();
    let (_, stderr, code) = run_command(&db, &["get", "missing"]);
    assert!(stderr.contains("not found"));
    assert!(!stderr.contains("FORMULA_KEY"));
    assert_eq!(code, 2);
}

#[test]
fn test_resolve_neutralizes_unknown_symbol_runs() {
    let (_dir, db) = temp_db();
    run_command(&db, &["put", "T", "A1*2x+3"]);
    let (stdout, _, code) = run_command(&db, &["resolve", "T"]);
    assert_eq!(stdout.trim(), "01*20+3");
    assert_eq!(code, 0);
}
