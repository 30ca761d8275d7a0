#![cfg(unix)]

use std::path::Path;

use rbcfilt_core::error::FilterError;
use rbcfilt_core::export::{ChompConfig, ChompRunner};

fn runner(program: &str, args: &[&str], attempts: u32) -> ChompRunner {
    ChompRunner::new(ChompConfig {
        program: program.into(),
        args: args.iter().map(|a| a.to_string()).collect(),
        attempts,
    })
}

fn write_coords(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("new_1_r05.cub");
    std::fs::write(&path, "(0, 1)\n(2, 3)\n").unwrap();
    path
}

#[test]
fn test_stdout_goes_to_report() {
    let dir = tempfile::tempdir().unwrap();
    let coords = write_coords(dir.path());
    let report = dir.path().join("new_1_r05.cbetti");

    runner("sh", &["-c", "wc -l < \"$0\""], 2)
        .run(&coords, &report)
        .unwrap();
    assert_eq!(std::fs::read_to_string(&report).unwrap().trim(), "2");
}

#[test]
fn test_failure_after_all_attempts() {
    let dir = tempfile::tempdir().unwrap();
    let coords = write_coords(dir.path());

    let err = runner("false", &[], 2)
        .run(&coords, &dir.path().join("out.cbetti"))
        .unwrap_err();
    match err {
        FilterError::ExternalTool {
            program, attempts, ..
        } => {
            assert_eq!(program, "false");
            assert_eq!(attempts, 2);
        }
        other => panic!("expected ExternalTool, got {other}"),
    }
}

#[test]
fn test_missing_program() {
    let dir = tempfile::tempdir().unwrap();
    let coords = write_coords(dir.path());

    let err = runner("rbcfilt-no-such-tool", &[], 1)
        .run(&coords, &dir.path().join("out.cbetti"))
        .unwrap_err();
    assert!(err.to_string().contains("cannot start"), "got {err}");
    assert!(err.is_frame_local());
}

#[test]
fn test_retry_recovers_from_one_failure() {
    let dir = tempfile::tempdir().unwrap();
    let coords = write_coords(dir.path());
    let marker = dir.path().join("attempted");
    let report = dir.path().join("out.cbetti");

    // Fails the first time (leaving a marker), succeeds the second.
    let script = "if [ -e \"$0\" ]; then cat \"$1\"; else touch \"$0\"; exit 3; fi";
    runner("sh", &["-c", script, marker.to_str().unwrap()], 2)
        .run(&coords, &report)
        .unwrap();
    assert!(marker.exists());
    assert_eq!(
        std::fs::read_to_string(&report).unwrap(),
        "(0, 1)\n(2, 3)\n"
    );
}

#[test]
fn test_single_attempt_does_not_retry() {
    let dir = tempfile::tempdir().unwrap();
    let coords = write_coords(dir.path());
    let marker = dir.path().join("attempted");

    let script = "if [ -e \"$0\" ]; then exit 0; else touch \"$0\"; exit 3; fi";
    let err = runner("sh", &["-c", script, marker.to_str().unwrap()], 1)
        .run(&coords, &dir.path().join("out.cbetti"))
        .unwrap_err();
    assert!(matches!(err, FilterError::ExternalTool { attempts: 1, .. }));
}
