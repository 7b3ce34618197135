//! Runs the `dirwatch` binary end to end

use std::io::{BufRead, BufReader};
use std::process::{Command, Stdio};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;
use tempfile::TempDir;

fn dirwatch() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_dirwatch"));
    cmd.env("RUST_LOG", "warn");
    cmd
}

#[test]
fn test_missing_directory_fails() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("missing");

    let output = dirwatch().arg(&missing).output().unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("directory does not exist"), "stderr: {stderr}");
}

#[test]
fn test_example_config_is_printed() {
    let output = dirwatch().arg("--example-config").output().unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("refresh_interval_ms = 1000"));
}

#[test]
fn test_reports_created_file_as_json() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().join("watched");
    std::fs::create_dir(&root).unwrap();

    let mut child = dirwatch()
        .arg(&root)
        .args(["--interval-ms", "50", "--json"])
        .stdout(Stdio::piped())
        .spawn()
        .unwrap();

    let stdout = child.stdout.take().unwrap();
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for line in BufReader::new(stdout).lines() {
            if tx.send(line.unwrap()).is_err() {
                break;
            }
        }
    });

    thread::sleep(Duration::from_millis(500));
    std::fs::write(root.join("new.txt"), b"x").unwrap();

    let line = rx.recv_timeout(Duration::from_secs(5)).unwrap();
    assert!(line.contains("\"type\":\"file_created\""), "line: {line}");
    assert!(line.contains("new.txt"), "line: {line}");

    // Removing the root ends the session with success
    std::fs::remove_dir_all(&root).unwrap();
    let mut status = None;
    for _ in 0..100 {
        if let Some(s) = child.try_wait().unwrap() {
            status = Some(s);
            break;
        }
        thread::sleep(Duration::from_millis(50));
    }
    match status {
        Some(status) => assert!(status.success()),
        None => {
            child.kill().unwrap();
            panic!("dirwatch did not exit after its directory was removed");
        }
    }
}
