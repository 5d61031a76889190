//! Cluster-facing operations for the deployment workflows: client
//! construction, namespace provisioning and workload readiness verification.

mod error;
mod manager;
mod namespace;
mod readiness;

pub use error::{Error, Result};
pub use manager::{service_cluster_ip, DeployManager};
