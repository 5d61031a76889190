//! JUnit-style test report output. The report file is the contract with the
//! CI system that collects artifacts, so it is written on every run, pass or
//! fail.

use crate::error::{self, Result};
use snafu::ResultExt;
use std::fs;
use std::path::Path;

/// The outcome of one workflow run.
#[derive(Debug, Clone)]
pub struct TestCase {
    pub class_name: String,
    pub name: String,
    /// Wall-clock duration of the workflow in seconds.
    pub time: f64,
    /// Failure detail; `None` means the workflow passed.
    pub failure: Option<String>,
}

impl TestCase {
    pub fn new<S1, S2>(class_name: S1, name: S2) -> Self
    where
        S1: Into<String>,
        S2: Into<String>,
    {
        TestCase {
            class_name: class_name.into(),
            name: name.into(),
            time: 0.0,
            failure: None,
        }
    }

    pub fn record_failure<S: Into<String>>(&mut self, message: S) {
        self.failure = Some(message.into());
    }
}

/// Write the test cases to `path` as JUnit XML, creating parent directories
/// as needed.
pub fn write_junit_xml(test_cases: &[TestCase], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context(error::IoSnafu {
            action: format!("create directory '{}'", parent.display()),
        })?;
    }
    fs::write(path, render(test_cases)).context(error::FileSnafu { path })?;
    Ok(())
}

fn render(test_cases: &[TestCase]) -> String {
    let failures = test_cases
        .iter()
        .filter(|test_case| test_case.failure.is_some())
        .count();
    let time: f64 = test_cases.iter().map(|test_case| test_case.time).sum();

    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n");
    xml.push_str(&format!(
        "<testsuite failures=\"{}\" tests=\"{}\" time=\"{}\">\n",
        failures,
        test_cases.len(),
        time
    ));
    for test_case in test_cases {
        xml.push_str(&format!(
            "  <testcase classname=\"{}\" name=\"{}\" time=\"{}\"",
            escape(&test_case.class_name),
            escape(&test_case.name),
            test_case.time
        ));
        match &test_case.failure {
            Some(failure) => {
                xml.push_str(&format!(
                    ">\n    <failure>{}</failure>\n  </testcase>\n",
                    escape(failure)
                ));
            }
            None => xml.push_str("/>\n"),
        }
    }
    xml.push_str("</testsuite>\n");
    xml
}

fn escape(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod test {
    use super::{render, write_junit_xml, TestCase};

    #[test]
    fn passing_case_has_no_failure_element() {
        let mut test_case = TestCase::new("KubeFlow", "deploy-kubeflow-setup");
        test_case.time = 12.5;
        let xml = render(&[test_case]);
        assert!(xml.contains("<testsuite failures=\"0\" tests=\"1\" time=\"12.5\">"));
        assert!(xml.contains(
            "<testcase classname=\"KubeFlow\" name=\"deploy-kubeflow-setup\" time=\"12.5\"/>"
        ));
        assert!(!xml.contains("<failure>"));
    }

    #[test]
    fn failure_detail_is_escaped() {
        let mut test_case = TestCase::new("KubeFlow", "deploy-kubeflow-deploy_model");
        test_case.record_failure("service \"inception\" wasn't assigned a cluster ip & <nothing>");
        let xml = render(&[test_case]);
        assert!(xml.contains("failures=\"1\""));
        assert!(xml.contains(
            "<failure>service &quot;inception&quot; wasn't assigned a cluster ip &amp; &lt;nothing&gt;</failure>"
        ));
    }

    #[test]
    fn report_file_is_created_with_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("artifacts/junit_kubeflow-deploy-setup.xml");
        write_junit_xml(&[TestCase::new("KubeFlow", "deploy-kubeflow-setup")], &path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>"));
        assert!(written.ends_with("</testsuite>\n"));
    }
}
