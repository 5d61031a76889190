use chrono::Local;
use std::path::PathBuf;
use uuid::Uuid;

/// Settings for a single test run, assembled from the command line and
/// read-only afterwards.
#[derive(Debug, Clone)]
pub struct TestContext {
    /// Directory used for all of the test's working files.
    pub test_dir: PathBuf,
    /// Directory for artifacts that should outlive the run (logs, reports).
    pub artifacts_dir: PathBuf,
    /// The namespace the test deploys into.
    pub namespace: String,
    pub project: Option<String>,
    /// Name of the target cluster. When unset the test assumes it is running
    /// inside the cluster it should talk to.
    pub cluster: Option<String>,
    pub zone: String,
    /// GitHub API token handed to every `ks` invocation. Without one the
    /// GitHub API is likely to rate limit registry and package operations.
    pub github_token: Option<String>,
}

/// Create a label unique to this run, e.g. `test_deploy-0412-1530-a1b2`. The
/// random suffix keeps runs started within the same minute apart.
pub fn unique_run_label(prefix: &str) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!(
        "{}-{}{}",
        prefix,
        Local::now().format("%m%d-%H%M-"),
        &suffix[..4]
    )
}

#[cfg(test)]
mod test {
    use super::unique_run_label;

    #[test]
    fn run_labels_are_distinct() {
        let first = unique_run_label("e2e");
        let second = unique_run_label("e2e");
        assert_ne!(first, second);
    }

    #[test]
    fn run_label_carries_prefix() {
        assert!(unique_run_label("test_deploy").starts_with("test_deploy-"));
    }
}
