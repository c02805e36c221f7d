use serde::{Deserialize, Deserializer};

/// Suite emitted when an xcresult contains no test cases at all.
pub const DEFAULT_TEST_SUITE_NAME: &str = "XCTest";
pub const UNKNOWN_TEST_SUITE_NAME: &str = "UnknownSuite";
pub const DEFAULT_FAILURE_MESSAGE: &str = "Test failed";
pub const FAILURE_TYPE: &str = "Failure";
pub const NODE_IDENTIFIER_SEPARATOR: char = '/';

/// Output of `xcrun xcresulttool get test-results tests`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tests {
    #[serde(default, deserialize_with = "null_as_default")]
    pub devices: Vec<Device>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub test_nodes: Vec<TestNode>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    #[serde(default)]
    pub architecture: Option<String>,
    #[serde(default)]
    pub device_id: Option<String>,
    #[serde(default)]
    pub device_name: Option<String>,
    #[serde(default)]
    pub model_name: Option<String>,
    #[serde(default)]
    pub os_version: Option<String>,
    #[serde(default)]
    pub platform: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestNode {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub node_type: TestNodeType,
    /// Elapsed time as reported by xcresulttool, e.g. `"0.5s"`
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub result: Option<TestResult>,
    /// Slash delimited path such as `MyTests/MyGroup/testExample()`
    #[serde(default)]
    pub node_identifier: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub children: Vec<TestNode>,
}

/// xcresulttool writes `null` for some absent values.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl TestNode {
    pub fn is_failed(&self) -> bool {
        matches!(self.result, Some(TestResult::Failed))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
pub enum TestNodeType {
    #[serde(rename = "Test Plan")]
    TestPlan,
    #[serde(rename = "Unit test bundle")]
    UnitTestBundle,
    #[serde(rename = "UI test bundle")]
    UiTestBundle,
    #[serde(rename = "Test Suite")]
    TestSuite,
    #[serde(rename = "Test Case")]
    TestCase,
    #[serde(rename = "Device")]
    Device,
    #[serde(rename = "Test Plan Configuration")]
    TestPlanConfiguration,
    #[serde(rename = "Arguments")]
    Arguments,
    #[serde(rename = "Repetition")]
    Repetition,
    #[serde(rename = "Test Case Run")]
    TestCaseRun,
    #[serde(rename = "Failure Message")]
    FailureMessage,
    #[serde(rename = "Source Code Reference")]
    SourceCodeReference,
    #[serde(rename = "Attachment")]
    Attachment,
    #[serde(rename = "Expression")]
    Expression,
    #[serde(rename = "Test Value")]
    TestValue,
    #[serde(rename = "Runtime Warning")]
    RuntimeWarning,
    #[default]
    #[serde(other)]
    Unrecognized,
}

/// How the flattener treats the children of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Traversal {
    /// Descend with the node name appended to the classname
    Nest,
    /// Descend with the classname unchanged
    PassThrough,
    /// Leaf that becomes a JUnit test case
    TestCase,
    Skip,
}

impl TestNodeType {
    pub fn traversal(self) -> Traversal {
        match self {
            TestNodeType::UnitTestBundle | TestNodeType::UiTestBundle | TestNodeType::TestSuite => {
                Traversal::Nest
            }
            TestNodeType::TestPlan | TestNodeType::TestPlanConfiguration => Traversal::PassThrough,
            TestNodeType::TestCase => Traversal::TestCase,
            // failure messages are only read while processing their test case
            TestNodeType::FailureMessage
            | TestNodeType::Device
            | TestNodeType::Arguments
            | TestNodeType::Repetition
            | TestNodeType::TestCaseRun
            | TestNodeType::SourceCodeReference
            | TestNodeType::Attachment
            | TestNodeType::Expression
            | TestNodeType::TestValue
            | TestNodeType::RuntimeWarning
            | TestNodeType::Unrecognized => Traversal::Skip,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum TestResult {
    Passed,
    Failed,
    Skipped,
    #[serde(rename = "Expected Failure")]
    ExpectedFailure,
    #[serde(other)]
    Unknown,
}
