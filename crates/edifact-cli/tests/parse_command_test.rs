use std::env;
use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

static TEMP_FILE_COUNTER: AtomicU64 = AtomicU64::new(0);

fn cargo_bin() -> PathBuf {
    if let Ok(path) = env::var("CARGO_BIN_EXE_edifact") {
        return PathBuf::from(path);
    }

    let target_dir = env::var("CARGO_TARGET_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| repo_root().join("target"));
    let executable_name = format!("edifact{}", std::env::consts::EXE_SUFFIX);
    let fallback = target_dir.join("debug").join(executable_name);

    if fallback.exists() {
        return fallback;
    }

    panic!(
        "CARGO_BIN_EXE_edifact is not set and fallback binary was not found at {}",
        fallback.display()
    );
}

fn repo_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
}

fn unique_temp_path(name: &str, extension: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time after epoch")
        .as_nanos();
    let counter = TEMP_FILE_COUNTER.fetch_add(1, Ordering::SeqCst);
    let filename = format!(
        "edifact-cli-{name}-{}-{nanos}-{counter}.{extension}",
        std::process::id()
    );
    env::temp_dir().join(filename)
}

fn write_temp_file(name: &str, extension: &str, content: &str) -> PathBuf {
    let path = unique_temp_path(name, extension);
    fs::write(&path, content).expect("temporary file should be writable");
    path
}

fn run_edifact(args: &[&str]) -> Output {
    Command::new(cargo_bin())
        .args(args)
        .output()
        .expect("run edifact")
}

#[test]
fn parse_command_dumps_segments() {
    let input = write_temp_file(
        "parse-author",
        "edi",
        "UNH+1+AUTHOR:D:14B:UN'\nBGM+220+PO123'\nLIN+1'\nUNT+4+1'\n",
    );

    let output = run_edifact(&["parse", input.to_str().expect("utf-8 path")]);
    fs::remove_file(&input).ok();

    assert!(output.status.success(), "parse should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("RawMsg AUTHOR"));
    assert!(stdout.contains("BGM+220+PO123"));
    assert!(stdout.contains("UNT+4+1"));
}

#[test]
fn parse_command_emits_json() {
    let input = write_temp_file("parse-json", "edi", "UNH+1+AUTHOR:D:14B:UN'BGM+220'UNT+3+1'");

    let output = run_edifact(&["parse", input.to_str().expect("utf-8 path"), "--json"]);
    fs::remove_file(&input).ok();

    assert!(output.status.success(), "parse --json should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    let parsed: serde_json::Value =
        serde_json::from_str(&stdout).expect("stdout should be valid JSON");
    assert_eq!(parsed["name"], "AUTHOR");
    assert_eq!(parsed["segs"][1]["id"], "BGM");
}

#[test]
fn parse_command_fails_on_malformed_input() {
    let input = write_temp_file("parse-bad", "edi", "UNH+1+AUTHOR");

    let output = run_edifact(&["parse", input.to_str().expect("utf-8 path")]);
    fs::remove_file(&input).ok();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unterminated"));
}
