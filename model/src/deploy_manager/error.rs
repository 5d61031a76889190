use snafu::Snafu;

pub type Result<T> = std::result::Result<T, Error>;

/// The error type for `DeployManager` operations.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(super)))]
pub enum Error {
    #[snafu(display("Unable to create client: {}", source))]
    ClientCreate { source: kube::Error },

    #[snafu(display("Unable to load kubeconfig: {}", source))]
    ConfigRead {
        source: kube::config::KubeconfigError,
    },

    #[snafu(display("Error creating {}: {}", what, source))]
    Create { what: String, source: kube::Error },

    #[snafu(display("{}", source))]
    Gcloud { source: crate::error::Error },

    #[snafu(display("Unable to load in-cluster configuration: {}", source))]
    InCluster {
        source: kube::config::InClusterError,
    },

    #[snafu(display("Unable to {}: {}", action, source))]
    Kube { action: String, source: kube::Error },

    #[snafu(display(
        "Timed out waiting for {} '{}' to become ready after {} attempts",
        kind,
        name,
        attempts
    ))]
    ReadinessTimeout {
        kind: String,
        name: String,
        attempts: u32,
    },
}
