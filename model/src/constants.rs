use std::time::Duration;

// The label every namespace created by the test carries.
pub const APP_LABEL: &str = "kubeflow-e2e-test";

// Application bundle
pub const APP_NAME: &str = "kubeflow-test";
pub const REGISTRY_NAME: &str = "kubeflow";
pub const REGISTRY_URI: &str = "github.com/kubeflow/kubeflow/tree/master/kubeflow";
/// Packages installed into the bundle. The order is significant; later
/// installs may depend on state populated by earlier ones.
pub const PACKAGES: [&str; 3] = ["kubeflow/core", "kubeflow/tf-serving", "kubeflow/tf-job"];

// Vendored source replaced by a link to the locally checked-out tree
pub const VENDOR_NAMESPACE: &str = "kubeflow";
pub const REPO_ORG: &str = "kubeflow";
pub const REPO_NAME: &str = "kubeflow";
pub const REGISTRY_PATH: &str = "kubeflow";

// Components and the workloads they produce
pub const CORE_PROTOTYPE: &str = "core";
pub const CORE_COMPONENT: &str = "kubeflow-core";
pub const OPERATOR_DEPLOYMENT: &str = "tf-job-operator";
pub const HUB_STATEFULSET: &str = "tf-hub";
pub const SERVING_PROTOTYPE: &str = "tf-serving";
pub const SERVING_COMPONENT: &str = "modelServer";
pub const SERVING_NAME: &str = "inception";

// The environment `ks init` creates by default
pub const DEFAULT_ENVIRONMENT: &str = "default";

// Environment variables
pub const GITHUB_TOKEN_ENV: &str = "GITHUB_TOKEN";
pub const GOOGLE_CREDENTIALS_ENV: &str = "GOOGLE_APPLICATION_CREDENTIALS";

// Readiness polling
pub const READINESS_POLL_INTERVAL: Duration = Duration::from_secs(10);
pub const READINESS_MAX_ATTEMPTS: u32 = 60;
