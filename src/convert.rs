use chrono::{DateTime, Utc};
use quick_junit::{Report, SerializeError};
use thiserror::Error;

use crate::assemble::assemble;
use crate::flatten::flatten_at;
use crate::types::Tests;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("failed to parse XCResult JSON: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("failed to marshal JUnit XML: {0}")]
    Serialize(#[from] SerializeError),
}

pub fn convert_xcresult_json_to_junit_xml<T: AsRef<[u8]>>(json: T) -> Result<Vec<u8>, ConvertError> {
    convert_xcresult_json_to_junit_xml_at(json, Utc::now())
}

/// Same as [`convert_xcresult_json_to_junit_xml`] with a fixed generation timestamp.
pub fn convert_xcresult_json_to_junit_xml_at<T: AsRef<[u8]>>(
    json: T,
    generated_at: DateTime<Utc>,
) -> Result<Vec<u8>, ConvertError> {
    let tests = serde_json::from_slice::<Tests>(json.as_ref())?;
    for device in &tests.devices {
        tracing::debug!(
            "device: {} ({} {})",
            device.device_name.as_deref().unwrap_or("unknown"),
            device.platform.as_deref().unwrap_or_default(),
            device.os_version.as_deref().unwrap_or_default(),
        );
    }

    let suites = flatten_at(tests.test_nodes.as_slice(), generated_at);
    let report = assemble(&suites);
    tracing::debug!(
        "assembled {} test suites with {} tests and {} failures",
        report.test_suites.len(),
        report.tests,
        report.failures
    );
    to_junit_xml(&report)
}

pub fn to_junit_xml(report: &Report) -> Result<Vec<u8>, ConvertError> {
    let mut junit_writer: Vec<u8> = Vec::new();
    report.serialize(&mut junit_writer)?;
    Ok(junit_writer)
}
