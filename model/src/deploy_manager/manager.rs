use super::{error, Result};
use crate::gcloud;
use crate::TestContext;
use k8s_openapi::api::core::v1::Service;
use kube::config::{KubeConfigOptions, Kubeconfig};
use k8s_openapi::NamespaceResourceScope;
use kube::{Api, Client, Config, Resource};
use log::info;
use snafu::ResultExt;

/// # Deploy Manager
///
/// The deploy manager owns the Kubernetes client and provides the cluster
/// operations the workflows need: namespace provisioning and teardown,
/// Service read-back, and readiness verification for Deployments and
/// StatefulSets. Everything the workflows apply to the cluster goes through
/// the `ks` CLI instead; see [`crate::ksonnet`].
pub struct DeployManager {
    pub k8s_client: Client,
}

impl DeployManager {
    /// Create a `DeployManager` from the run's context.
    ///
    /// With `--cluster`, cluster access credentials are configured through
    /// `gcloud` and loaded from the resulting kubeconfig. Otherwise the
    /// in-cluster service account mount is used.
    pub async fn from_context(context: &TestContext) -> Result<Self> {
        match &context.cluster {
            Some(cluster) => {
                info!(
                    "Using cluster: {} in project: {} in zone: {}",
                    cluster,
                    context.project.as_deref().unwrap_or("<unset>"),
                    context.zone
                );
                // Print the account configuration to help debug issues with
                // accounts and credentials.
                gcloud::print_config().context(error::GcloudSnafu)?;
                gcloud::configure_kubectl(context.project.as_deref(), &context.zone, cluster)
                    .context(error::GcloudSnafu)?;
                let kubeconfig = Kubeconfig::read().context(error::ConfigReadSnafu)?;
                let config =
                    Config::from_custom_kubeconfig(kubeconfig, &KubeConfigOptions::default())
                        .await
                        .context(error::ConfigReadSnafu)?;
                Ok(DeployManager {
                    k8s_client: config.try_into().context(error::ClientCreateSnafu)?,
                })
            }
            None => {
                info!("Running inside cluster.");
                let config = Config::incluster().context(error::InClusterSnafu)?;
                Ok(DeployManager {
                    k8s_client: Client::try_from(config).context(error::ClientCreateSnafu)?,
                })
            }
        }
    }

    /// Read back a named `Service`.
    pub async fn read_service(&self, namespace: &str, name: &str) -> Result<Service> {
        self.namespaced_api::<Service>(namespace)
            .get(name)
            .await
            .context(error::KubeSnafu {
                action: format!("get service '{}'", name),
            })
    }

    /// Creates a non namespaced api of type `T`
    pub(super) fn api<T>(&self) -> Api<T>
    where
        T: Resource,
        <T as Resource>::DynamicType: Default,
    {
        Api::<T>::all(self.k8s_client.clone())
    }

    /// Creates an api of type `T` scoped to `namespace`
    pub(super) fn namespaced_api<T>(&self, namespace: &str) -> Api<T>
    where
        T: Resource<Scope = NamespaceResourceScope>,
        <T as Resource>::DynamicType: Default,
    {
        Api::<T>::namespaced(self.k8s_client.clone(), namespace)
    }
}

/// The cluster-internal IP assigned to a `Service`, if one has been assigned.
pub fn service_cluster_ip(service: &Service) -> Option<&str> {
    service
        .spec
        .as_ref()
        .and_then(|spec| spec.cluster_ip.as_deref())
        .filter(|cluster_ip| !cluster_ip.is_empty())
}

#[cfg(test)]
mod test {
    use super::service_cluster_ip;
    use k8s_openapi::api::core::v1::Service;

    #[test]
    fn assigned_cluster_ip_is_returned() {
        let service: Service = serde_yaml::from_str(
            r#"apiVersion: v1
kind: Service
metadata:
  name: inception
spec:
  clusterIP: 10.0.0.12
"#,
        )
        .unwrap();
        assert_eq!(service_cluster_ip(&service), Some("10.0.0.12"));
    }

    #[test]
    fn missing_cluster_ip_is_none() {
        let service: Service = serde_yaml::from_str(
            r#"apiVersion: v1
kind: Service
metadata:
  name: inception
spec: {}
"#,
        )
        .unwrap();
        assert_eq!(service_cluster_ip(&service), None);
    }

    #[test]
    fn empty_cluster_ip_is_none() {
        let service: Service = serde_yaml::from_str(
            r#"apiVersion: v1
kind: Service
metadata:
  name: inception
spec:
  clusterIP: ""
"#,
        )
        .unwrap();
        assert_eq!(service_cluster_ip(&service), None);
    }
}
