use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn xcresult_to_junit() -> Command {
    let mut command = Command::cargo_bin("xcresult-to-junit").unwrap();
    for key in ["xcresult_path", "output_dir", "junit_filename", "verbose"] {
        command.env_remove(key);
    }
    command
}

#[test]
fn cli_requires_xcresult_path() {
    let temp_dir = tempdir().unwrap();

    let assert = xcresult_to_junit()
        .current_dir(&temp_dir)
        .args(["--output-dir", "out", "--junit-filename", "junit.xml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--xcresult-path <XCRESULT_PATH>"));

    println!("{assert}");
}

#[test]
fn cli_missing_xcresult() {
    let temp_dir = tempdir().unwrap();

    let assert = xcresult_to_junit()
        .current_dir(&temp_dir)
        .args([
            "--xcresult-path",
            "missing.xcresult",
            "--output-dir",
            "out",
            "--junit-filename",
            "junit.xml",
        ])
        .assert()
        .code(exitcode::SOFTWARE)
        .stdout(predicate::str::contains(
            "XCResult path does not exist: missing.xcresult",
        ));

    println!("{assert}");
    assert!(!temp_dir.path().join("out").exists());
}

#[test]
fn cli_reads_inputs_from_env() {
    let temp_dir = tempdir().unwrap();

    let assert = xcresult_to_junit()
        .current_dir(&temp_dir)
        .env("xcresult_path", "from-env.xcresult")
        .env("output_dir", "out")
        .env("junit_filename", "junit.xml")
        .env("verbose", "yes")
        .assert()
        .failure()
        .stdout(predicate::str::contains("- verbose: yes"))
        .stdout(predicate::str::contains(
            "XCResult path does not exist: from-env.xcresult",
        ));

    println!("{assert}");
}

#[cfg(not(target_os = "macos"))]
#[test]
fn cli_xcrun_unavailable() {
    let temp_dir = tempdir().unwrap();
    std::fs::create_dir(temp_dir.path().join("Test.xcresult")).unwrap();

    let assert = xcresult_to_junit()
        .current_dir(&temp_dir)
        .args([
            "--xcresult-path",
            "Test.xcresult",
            "--output-dir",
            "out",
            "--junit-filename",
            "junit.xml",
        ])
        .assert()
        .code(exitcode::SOFTWARE)
        .stdout(predicate::str::contains(
            "failed to convert XCResult to JSON: xcrun is only available on macOS",
        ));

    println!("{assert}");
    assert!(!temp_dir.path().join("out/junit.xml").exists());
}
