//! Command-line surface: argument validation never reaches the browser

use std::process::Command;

const USAGE_LINE: &str = "Usage: screenshot.js <url> <filename>\n";

fn run_in(dir: &std::path::Path, args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_webshot"))
        .args(args)
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to spawn webshot")
}

#[test]
fn no_arguments_prints_usage_and_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_in(dir.path(), &[]);

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), USAGE_LINE);
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn one_or_three_arguments_print_usage() {
    let dir = tempfile::tempdir().unwrap();
    for args in [
        vec!["https://example.com/"],
        vec!["https://example.com/", "out.png", "extra"],
    ] {
        let output = run_in(dir.path(), &args);
        assert!(output.status.success(), "args: {:?}", args);
        assert_eq!(String::from_utf8_lossy(&output.stdout), USAGE_LINE);
    }
    assert!(!dir.path().join("out.png").exists());
}

#[test]
fn unsupported_extension_fails_without_output() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_in(dir.path(), &["https://example.com/", "out.gif"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Unsupported output format: .gif"));
    assert!(!dir.path().join("out.gif").exists());
}
