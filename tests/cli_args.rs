//! Integration tests for CLI argument handling
//!
//! Drives the studyaid binary headlessly; the TUI itself is covered by unit tests.

use std::process::Command;

use tempfile::TempDir;

/// Helper to run the CLI with given args and capture output
fn run_cli(args: &[&str], cache_dir: &TempDir) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_studyaid"))
        .args(args)
        .env("STUDYAID_CACHE_DIR", cache_dir.path())
        .env_remove("STUDYAID_BACKEND_URL")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute studyaid")
}

#[test]
fn test_help_flag_exits_successfully() {
    let cache_dir = TempDir::new().unwrap();
    let output = run_cli(&["--help"], &cache_dir);
    assert!(
        output.status.success(),
        "Expected --help to exit successfully"
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("studyaid"), "Help should mention studyaid");
    assert!(stdout.contains("flashcards"), "Help should list subcommands");
    assert!(stdout.contains("--backend-url"), "Help should list global flags");
}

#[test]
fn test_invalid_view_prints_error_and_exits() {
    let cache_dir = TempDir::new().unwrap();
    let output = run_cli(&["--view", "essay"], &cache_dir);
    assert!(!output.status.success(), "Expected invalid view to fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Invalid view"),
        "Should print error message about invalid view: {}",
        stderr
    );
    assert!(
        !stderr.contains("InvalidView("),
        "Should print the message, not the debug form: {}",
        stderr
    );
}

#[test]
fn test_invalid_export_format_is_rejected() {
    let cache_dir = TempDir::new().unwrap();
    let output = run_cli(&["notes", "--export", "pdf"], &cache_dir);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("pdf"), "Should name the bad value: {}", stderr);
}

#[test]
fn test_pack_without_sources_fails() {
    let cache_dir = TempDir::new().unwrap();
    let output = run_cli(&["pack", "--level", "college"], &cache_dir);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--topic"), "Should explain what is missing: {}", stderr);
    assert!(!stderr.contains("EmptyPack"), "Should not print the debug form: {}", stderr);
}

#[test]
fn test_notes_from_file_prints_generated_notes() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/notes")
        .match_body(mockito::Matcher::Json(serde_json::json!({
            "content": "Osmosis moves water"
        })))
        .with_status(200)
        .with_body(r#"{"notes": "Osmosis: passive water transport"}"#)
        .create();

    let cache_dir = TempDir::new().unwrap();
    let input = cache_dir.path().join("input.txt");
    std::fs::write(&input, "Osmosis moves water").unwrap();

    let output = run_cli(
        &[
            "notes",
            "--input",
            input.to_str().unwrap(),
            "--backend-url",
            &server.url(),
        ],
        &cache_dir,
    );

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "Osmosis: passive water transport\n"
    );
    mock.assert();
    assert!(cache_dir.path().join("generatedNotes.json").exists());
}

#[test]
fn test_ping_unreachable_backend_fails() {
    let cache_dir = TempDir::new().unwrap();
    let output = run_cli(&["ping", "--backend-url", "http://127.0.0.1:9"], &cache_dir);
    assert!(!output.status.success());
}
