use std::{ffi::OsStr, io, path::Path, process::Command};

use lazy_static::lazy_static;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum XcrunError {
    #[error("xcrun is only available on macOS")]
    UnsupportedPlatform,
    #[error("failed to run xcrun -- please make sure you have xcode installed")]
    Spawn(#[source] io::Error),
    #[error("command failed with exit code {code}: {stderr}")]
    ExitStatus { code: i32, stderr: String },
    #[error("command was terminated by a signal: {stderr}")]
    Terminated { stderr: String },
    #[error("failed to parse xcresulttool version")]
    Version,
}

/// Produces the raw test results JSON for an `.xcresult` bundle.
pub trait ResultsTool {
    fn fetch_test_results(&self, xcresult_path: &Path) -> Result<Vec<u8>, XcrunError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Xcresulttool;

impl ResultsTool for Xcresulttool {
    fn fetch_test_results(&self, xcresult_path: &Path) -> Result<Vec<u8>, XcrunError> {
        xcresulttool_get_test_results_tests(xcresult_path)
    }
}

pub fn xcresulttool_get_test_results_tests<T: AsRef<OsStr>>(path: T) -> Result<Vec<u8>, XcrunError> {
    xcresulttool_min_version_check()?;

    let output = xcrun(&[
        "xcresulttool".as_ref(),
        "get".as_ref(),
        "test-results".as_ref(),
        "tests".as_ref(),
        "--path".as_ref(),
        path.as_ref(),
    ])?;
    tracing::debug!("XCResult JSON output length: {} bytes", output.len());
    Ok(output)
}

const TEST_RESULTS_MIN_VERSION: usize = 22608;

/// Warns when xcresulttool predates `get test-results`. Only an unsupported
/// platform is an error here.
fn xcresulttool_min_version_check() -> Result<(), XcrunError> {
    match xcresulttool_version() {
        Ok(version) if version <= TEST_RESULTS_MIN_VERSION => {
            tracing::warn!(
                "xcresulttool version {} may not support test-results, please upgrade to a version higher than {}",
                version,
                TEST_RESULTS_MIN_VERSION
            );
            Ok(())
        }
        Ok(_) => Ok(()),
        Err(XcrunError::UnsupportedPlatform) => Err(XcrunError::UnsupportedPlatform),
        Err(e) => {
            tracing::warn!("failed to determine xcresulttool version: {}", e);
            Ok(())
        }
    }
}

fn xcresulttool_version() -> Result<usize, XcrunError> {
    let version_raw = xcrun(&["xcresulttool", "version"])?;
    parse_xcresulttool_version(String::from_utf8_lossy(&version_raw)).ok_or(XcrunError::Version)
}

fn parse_xcresulttool_version<T: AsRef<str>>(version_raw: T) -> Option<usize> {
    lazy_static! {
        // output looks like "xcresulttool version 22608, format version 3.49 (current)"
        static ref RE: regex::Regex = regex::Regex::new(r"xcresulttool version (\d+)").unwrap();
    }
    RE.captures(version_raw.as_ref())
        .and_then(|capture_group| capture_group.get(1))
        .and_then(|version| version.as_str().parse::<usize>().ok())
}

fn xcrun<T: AsRef<OsStr>>(args: &[T]) -> Result<Vec<u8>, XcrunError> {
    if !cfg!(target_os = "macos") {
        return Err(XcrunError::UnsupportedPlatform);
    }
    let output = Command::new("xcrun")
        .args(args)
        .output()
        .map_err(XcrunError::Spawn)?;
    if output.status.success() {
        return Ok(output.stdout);
    }
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    Err(match output.status.code() {
        Some(code) => XcrunError::ExitStatus { code, stderr },
        None => XcrunError::Terminated { stderr },
    })
}
