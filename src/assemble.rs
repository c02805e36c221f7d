use std::time::Duration;

use quick_junit::{NonSuccessKind, Report, TestCase, TestCaseStatus, TestSuite};

use crate::flatten::{SuiteAccumulator, SuiteMap, TestCaseRecord};
use crate::types::DEFAULT_TEST_SUITE_NAME;

pub const REPORT_NAME: &str = "xcresult";

/// Builds the JUnit report for a flattened result tree.
///
/// Suites and the test cases inside them are ordered by name. Times are
/// summed from the test cases, and a result tree without any test cases
/// still produces a single empty suite since consumers expect at least one.
pub fn assemble(suites: &SuiteMap) -> Report {
    let mut test_suites = suites
        .iter()
        .map(suite_accumulator_to_junit_test_suite)
        .collect::<Vec<_>>();

    if test_suites.is_empty() {
        let mut test_suite = TestSuite::new(DEFAULT_TEST_SUITE_NAME);
        test_suite
            .set_time(Duration::ZERO)
            .set_timestamp(suites.generated_at().fixed_offset());
        test_suites.push(test_suite);
    }

    let total_time = suites.iter().map(SuiteAccumulator::total_time).sum::<Duration>();
    let mut report = Report::new(REPORT_NAME);
    report
        .set_timestamp(suites.generated_at().fixed_offset())
        .set_time(total_time)
        .add_test_suites(test_suites);
    report
}

fn suite_accumulator_to_junit_test_suite(accumulator: &SuiteAccumulator) -> TestSuite {
    let mut test_cases = accumulator.test_cases.iter().collect::<Vec<_>>();
    test_cases.sort_by(|a, b| a.name.cmp(&b.name));

    tracing::debug!(
        "suite {}: {} tests, {} failures",
        accumulator.name,
        test_cases.len(),
        accumulator.failures
    );

    let mut test_suite = TestSuite::new(accumulator.name.as_str());
    test_suite
        .set_time(accumulator.total_time())
        .set_timestamp(accumulator.timestamp.fixed_offset())
        .add_test_cases(
            test_cases
                .into_iter()
                .map(test_case_record_to_junit_test_case),
        );
    test_suite
}

fn test_case_record_to_junit_test_case(record: &TestCaseRecord) -> TestCase {
    let status = match &record.failure {
        Some(failure) => {
            let mut status = TestCaseStatus::non_success(NonSuccessKind::Failure);
            status
                .set_message(failure.message.as_str())
                .set_type(failure.ty.as_str())
                .set_description(failure.content.as_str());
            status
        }
        None => TestCaseStatus::success(),
    };

    let mut test_case = TestCase::new(record.name.as_str(), status);
    test_case
        .set_classname(record.classname.as_str())
        .set_time(record.duration());
    test_case
}
