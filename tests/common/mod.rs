#![allow(dead_code)]

use quick_xml::{
    events::{BytesStart, Event},
    Reader,
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedFailure {
    pub message: String,
    pub ty: String,
    pub content: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedTestCase {
    pub name: String,
    pub classname: String,
    pub time: f64,
    pub failure: Option<ParsedFailure>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedTestSuite {
    pub name: String,
    pub tests: usize,
    pub failures: usize,
    pub errors: usize,
    pub time: f64,
    pub timestamp: String,
    pub test_cases: Vec<ParsedTestCase>,
}

fn attr(e: &BytesStart, key: &str) -> String {
    e.try_get_attribute(key)
        .unwrap()
        .map(|a| a.unescape_value().unwrap().into_owned())
        .unwrap_or_else(|| panic!("missing attribute {key}"))
}

fn open_test_suite(e: &BytesStart) -> ParsedTestSuite {
    ParsedTestSuite {
        name: attr(e, "name"),
        tests: attr(e, "tests").parse().unwrap(),
        failures: attr(e, "failures").parse().unwrap(),
        errors: attr(e, "errors").parse().unwrap(),
        time: attr(e, "time").parse().unwrap(),
        timestamp: attr(e, "timestamp"),
        test_cases: Vec::new(),
    }
}

fn open_test_case(e: &BytesStart) -> ParsedTestCase {
    ParsedTestCase {
        name: attr(e, "name"),
        classname: attr(e, "classname"),
        time: attr(e, "time").parse().unwrap(),
        failure: None,
    }
}

fn open_failure(e: &BytesStart) -> ParsedFailure {
    ParsedFailure {
        message: attr(e, "message"),
        ty: attr(e, "type"),
        content: String::new(),
    }
}

/// Reads back the `<testsuite>` elements of a serialized JUnit report.
pub fn parse_junit_xml(xml: &[u8]) -> Vec<ParsedTestSuite> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);

    let mut test_suites = Vec::new();
    let mut test_suite: Option<ParsedTestSuite> = None;
    let mut test_case: Option<ParsedTestCase> = None;
    let mut failure: Option<ParsedFailure> = None;
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf).unwrap() {
            Event::Eof => break,
            Event::Start(e) => match e.name().as_ref() {
                b"testsuite" => test_suite = Some(open_test_suite(&e)),
                b"testcase" => test_case = Some(open_test_case(&e)),
                b"failure" => failure = Some(open_failure(&e)),
                _ => {}
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"testsuite" => test_suites.push(open_test_suite(&e)),
                b"testcase" => test_suite
                    .as_mut()
                    .unwrap()
                    .test_cases
                    .push(open_test_case(&e)),
                b"failure" => test_case.as_mut().unwrap().failure = Some(open_failure(&e)),
                _ => {}
            },
            Event::Text(e) => {
                if let Some(failure) = failure.as_mut() {
                    failure.content.push_str(&e.unescape().unwrap());
                }
            }
            Event::CData(e) => {
                if let Some(failure) = failure.as_mut() {
                    failure
                        .content
                        .push_str(&String::from_utf8_lossy(&e.into_inner()));
                }
            }
            Event::End(e) => match e.name().as_ref() {
                b"testsuite" => test_suites.push(test_suite.take().unwrap()),
                b"testcase" => {
                    let test_case = test_case.take().unwrap();
                    test_suite.as_mut().unwrap().test_cases.push(test_case);
                }
                b"failure" => test_case.as_mut().unwrap().failure = failure.take(),
                _ => {}
            },
            _ => {}
        }
        buf.clear();
    }
    test_suites
}
