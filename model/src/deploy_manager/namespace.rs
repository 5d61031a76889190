use super::{error, DeployManager, Result};
use crate::constants::APP_LABEL;
use http::StatusCode;
use k8s_openapi::api::core::v1::Namespace;
use kube::api::{DeleteParams, ObjectMeta, PostParams};
use log::info;
use maplit::btreemap;
use snafu::ResultExt;

impl DeployManager {
    /// Ensure the namespace for the test exists.
    ///
    /// An already existing namespace is treated as success and the server's
    /// current object is returned. Any other creation failure is returned to
    /// the caller unchanged; there is no per-code retry logic beyond the
    /// conflict check.
    pub async fn ensure_namespace(&self, name: &str) -> Result<Namespace> {
        let namespace = Namespace {
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                labels: Some(btreemap! {
                    "app".to_string() => APP_LABEL.to_string(),
                }),
                ..Default::default()
            },
            ..Default::default()
        };

        let api = self.api::<Namespace>();
        info!("Creating namespace {}", name);
        match api.create(&PostParams::default(), &namespace).await {
            Ok(created) => {
                info!("Namespace {} created.", name);
                Ok(created)
            }
            Err(err) if is_already_exists(&err) => {
                info!("Namespace {} already exists.", name);
                api.get(name).await.context(error::KubeSnafu {
                    action: format!("get namespace '{}'", name),
                })
            }
            Err(err) => Err(err).context(error::CreateSnafu { what: "namespace" }),
        }
    }

    /// Delete the namespace. Cascade semantics belong to the cluster; a
    /// missing namespace surfaces the API's own not-found error.
    pub async fn delete_namespace(&self, name: &str) -> Result<()> {
        info!("Deleting namespace {}", name);
        self.api::<Namespace>()
            .delete(name, &DeleteParams::default())
            .await
            .map(|_| ())
            .context(error::KubeSnafu {
                action: format!("delete namespace '{}'", name),
            })
    }
}

/// True when the API rejected a create because the object already exists.
fn is_already_exists(err: &kube::Error) -> bool {
    matches!(err, kube::Error::Api(response) if response.code == StatusCode::CONFLICT.as_u16())
}

#[cfg(test)]
mod test {
    use super::is_already_exists;
    use kube::core::ErrorResponse;

    fn api_error(code: u16, reason: &str) -> kube::Error {
        kube::Error::Api(ErrorResponse {
            status: "Failure".to_string(),
            message: format!("namespaces \"e2e-test-1\" {}", reason),
            reason: reason.to_string(),
            code,
        })
    }

    #[test]
    fn conflict_is_already_exists() {
        assert!(is_already_exists(&api_error(409, "AlreadyExists")));
    }

    #[test]
    fn not_found_is_not_already_exists() {
        assert!(!is_already_exists(&api_error(404, "NotFound")));
    }

    #[test]
    fn forbidden_is_not_already_exists() {
        assert!(!is_already_exists(&api_error(403, "Forbidden")));
    }
}
