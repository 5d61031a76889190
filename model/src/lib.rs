/*!

This library provides the building blocks of the Kubeflow end-to-end
deployment test: the deployment manager that talks to the cluster, the
ksonnet application bundle wrapper, deployment parameter parsing, and the
JUnit report writer used to record each run's outcome.

The `kfdeploy` binary assembles these into the `setup`, `teardown` and
`deploy_model` workflows.

!*/

#![deny(
    clippy::expect_used,
    clippy::get_unwrap,
    clippy::panic,
    clippy::panic_in_result_fn,
    clippy::panicking_unwrap,
    clippy::unwrap_in_result,
    clippy::unwrap_used
)]
#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used, clippy::panic))]

pub use context::{unique_run_label, TestContext};
pub use error::{Error, Result};
pub use params::DeploymentParams;

pub mod constants;
mod context;
pub mod deploy_manager;
mod error;
pub mod gcloud;
pub mod ksonnet;
mod params;
pub mod report;
