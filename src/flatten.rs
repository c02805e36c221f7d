use std::{collections::BTreeMap, time::Duration};

use chrono::{DateTime, Utc};

use crate::types::{
    TestNode, TestNodeType, Traversal, DEFAULT_FAILURE_MESSAGE, FAILURE_TYPE,
    NODE_IDENTIFIER_SEPARATOR, UNKNOWN_TEST_SUITE_NAME,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCaseFailure {
    pub message: String,
    pub ty: String,
    pub content: String,
}

impl TestCaseFailure {
    pub fn new<T: AsRef<str>>(message: T) -> Self {
        Self {
            message: String::from(message.as_ref()),
            ty: String::from(FAILURE_TYPE),
            content: String::from(message.as_ref()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TestCaseRecord {
    pub name: String,
    /// Dotted path of the bundles and suites enclosing the test case
    pub classname: String,
    /// Seconds
    pub time: f64,
    pub failure: Option<TestCaseFailure>,
}

impl TestCaseRecord {
    /// Elapsed time rounded to whole milliseconds, the precision JUnit times
    /// are written with.
    pub fn duration(&self) -> Duration {
        Duration::from_millis((self.time * 1000.0).round() as u64)
    }
}

/// Test cases collected for one suite while the result tree is walked.
#[derive(Debug, Clone, PartialEq)]
pub struct SuiteAccumulator {
    pub name: String,
    pub test_cases: Vec<TestCaseRecord>,
    pub failures: usize,
    pub timestamp: DateTime<Utc>,
}

impl SuiteAccumulator {
    fn new<T: Into<String>>(name: T, timestamp: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            test_cases: Vec::new(),
            failures: 0,
            timestamp,
        }
    }

    fn push(&mut self, test_case: TestCaseRecord) {
        if test_case.failure.is_some() {
            self.failures += 1;
        }
        self.test_cases.push(test_case);
    }

    /// Sum of the rounded test case durations, so the suite time always adds
    /// up to the times written for its test cases.
    pub fn total_time(&self) -> Duration {
        self.test_cases.iter().map(TestCaseRecord::duration).sum()
    }
}

/// Suites of a single conversion, keyed by suite name.
#[derive(Debug, Clone, PartialEq)]
pub struct SuiteMap {
    generated_at: DateTime<Utc>,
    suites: BTreeMap<String, SuiteAccumulator>,
}

impl SuiteMap {
    fn new(generated_at: DateTime<Utc>) -> Self {
        Self {
            generated_at,
            suites: BTreeMap::new(),
        }
    }

    pub fn generated_at(&self) -> DateTime<Utc> {
        self.generated_at
    }

    pub fn get<T: AsRef<str>>(&self, name: T) -> Option<&SuiteAccumulator> {
        self.suites.get(name.as_ref())
    }

    pub fn len(&self) -> usize {
        self.suites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.suites.is_empty()
    }

    /// Suites in ascending name order.
    pub fn iter(&self) -> impl Iterator<Item = &SuiteAccumulator> {
        self.suites.values()
    }

    fn suite_mut(&mut self, name: &str) -> &mut SuiteAccumulator {
        let generated_at = self.generated_at;
        self.suites
            .entry(String::from(name))
            .or_insert_with(|| SuiteAccumulator::new(name, generated_at))
    }
}

pub fn flatten(test_nodes: &[TestNode]) -> SuiteMap {
    flatten_at(test_nodes, Utc::now())
}

/// Walks the result tree, stamping every suite with `generated_at`.
pub fn flatten_at(test_nodes: &[TestNode], generated_at: DateTime<Utc>) -> SuiteMap {
    let mut suites = SuiteMap::new(generated_at);
    visit_test_nodes(test_nodes, "", &mut suites);
    suites
}

fn visit_test_nodes(test_nodes: &[TestNode], classname: &str, suites: &mut SuiteMap) {
    for test_node in test_nodes {
        match test_node.node_type.traversal() {
            Traversal::Nest => {
                let nested_classname = build_classname(classname, &test_node.name);
                visit_test_nodes(test_node.children.as_slice(), &nested_classname, suites);
            }
            Traversal::PassThrough => {
                visit_test_nodes(test_node.children.as_slice(), classname, suites);
            }
            Traversal::TestCase => visit_test_case(test_node, classname, suites),
            Traversal::Skip => {}
        }
    }
}

fn visit_test_case(test_case: &TestNode, classname: &str, suites: &mut SuiteMap) {
    let Some(node_identifier) = test_case
        .node_identifier
        .as_deref()
        .filter(|id| id.contains(NODE_IDENTIFIER_SEPARATOR))
    else {
        // test configurations show up as test cases without a path
        tracing::debug!("skipping non-leaf test case: {}", test_case.name);
        return;
    };

    let suite_name = node_identifier
        .split(NODE_IDENTIFIER_SEPARATOR)
        .next()
        .filter(|name| !name.is_empty())
        .unwrap_or(UNKNOWN_TEST_SUITE_NAME);

    let failure = test_case.is_failed().then(|| {
        TestCaseFailure::new(
            find_failure_message(test_case.children.as_slice()).unwrap_or(DEFAULT_FAILURE_MESSAGE),
        )
    });

    suites.suite_mut(suite_name).push(TestCaseRecord {
        name: String::from(&test_case.name),
        classname: String::from(classname),
        time: parse_duration(test_case.duration.as_deref().unwrap_or_default()),
        failure,
    });
}

/// First failure message found depth-first below a test case.
fn find_failure_message(test_nodes: &[TestNode]) -> Option<&str> {
    test_nodes.iter().find_map(|test_node| {
        if matches!(test_node.node_type, TestNodeType::FailureMessage) {
            Some(test_node.name.as_str())
        } else {
            find_failure_message(test_node.children.as_slice())
        }
    })
}

fn build_classname(classname: &str, name: &str) -> String {
    if classname.is_empty() {
        String::from(name)
    } else {
        format!("{classname}.{name}")
    }
}

/// Parses an xcresulttool duration such as `"0.5s"` into seconds.
///
/// Empty or malformed values are treated as zero rather than as errors.
pub fn parse_duration<T: AsRef<str>>(duration: T) -> f64 {
    let duration = duration.as_ref();
    duration
        .strip_suffix('s')
        .unwrap_or(duration)
        .parse::<f64>()
        .ok()
        .filter(|secs| secs.is_finite() && *secs >= 0.0)
        .unwrap_or_default()
}
