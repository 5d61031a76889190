use super::{error, DeployManager, Result};
use crate::constants::{READINESS_MAX_ATTEMPTS, READINESS_POLL_INTERVAL};
use k8s_openapi::api::apps::v1::{Deployment, StatefulSet};
use log::info;
use snafu::ResultExt;

impl DeployManager {
    /// Wait until the named Deployment's ready replica count matches its
    /// desired count. Exhausting the attempt budget is a deployment failure,
    /// not a soft warning.
    pub async fn wait_for_deployment(&self, namespace: &str, name: &str) -> Result<()> {
        info!(
            "Waiting for deployment '{}' in namespace '{}'",
            name, namespace
        );
        let api = self.namespaced_api::<Deployment>(namespace);
        for attempt in 1..=READINESS_MAX_ATTEMPTS {
            let deployment = api.get(name).await.context(error::KubeSnafu {
                action: format!("get deployment '{}'", name),
            })?;
            if deployment_is_ready(&deployment) {
                info!("Deployment '{}' is ready.", name);
                return Ok(());
            }
            info!(
                "Deployment '{}' is not ready ({}/{} attempts). Sleeping {}s",
                name,
                attempt,
                READINESS_MAX_ATTEMPTS,
                READINESS_POLL_INTERVAL.as_secs()
            );
            tokio::time::sleep(READINESS_POLL_INTERVAL).await;
        }
        error::ReadinessTimeoutSnafu {
            kind: "deployment",
            name,
            attempts: READINESS_MAX_ATTEMPTS,
        }
        .fail()
    }

    /// Wait until the named StatefulSet's ready replica count matches its
    /// desired count.
    pub async fn wait_for_statefulset(&self, namespace: &str, name: &str) -> Result<()> {
        info!(
            "Waiting for statefulset '{}' in namespace '{}'",
            name, namespace
        );
        let api = self.namespaced_api::<StatefulSet>(namespace);
        for attempt in 1..=READINESS_MAX_ATTEMPTS {
            let statefulset = api.get(name).await.context(error::KubeSnafu {
                action: format!("get statefulset '{}'", name),
            })?;
            if statefulset_is_ready(&statefulset) {
                info!("StatefulSet '{}' is ready.", name);
                return Ok(());
            }
            info!(
                "StatefulSet '{}' is not ready ({}/{} attempts). Sleeping {}s",
                name,
                attempt,
                READINESS_MAX_ATTEMPTS,
                READINESS_POLL_INTERVAL.as_secs()
            );
            tokio::time::sleep(READINESS_POLL_INTERVAL).await;
        }
        error::ReadinessTimeoutSnafu {
            kind: "statefulset",
            name,
            attempts: READINESS_MAX_ATTEMPTS,
        }
        .fail()
    }
}

// A workload with no replica count in its spec defaults to 1 desired, per
// the API's own defaulting.

fn deployment_is_ready(deployment: &Deployment) -> bool {
    let desired = deployment
        .spec
        .as_ref()
        .and_then(|spec| spec.replicas)
        .unwrap_or(1);
    let ready = deployment
        .status
        .as_ref()
        .and_then(|status| status.ready_replicas)
        .unwrap_or(0);
    ready == desired
}

fn statefulset_is_ready(statefulset: &StatefulSet) -> bool {
    let desired = statefulset
        .spec
        .as_ref()
        .and_then(|spec| spec.replicas)
        .unwrap_or(1);
    let ready = statefulset
        .status
        .as_ref()
        .and_then(|status| status.ready_replicas)
        .unwrap_or(0);
    ready == desired
}

#[cfg(test)]
mod test {
    use super::{deployment_is_ready, statefulset_is_ready};
    use k8s_openapi::api::apps::v1::{Deployment, StatefulSet};

    fn deployment(desired: i32, ready: Option<i32>) -> Deployment {
        let status = match ready {
            Some(ready) => format!("status:\n  readyReplicas: {}\n", ready),
            None => String::new(),
        };
        serde_yaml::from_str(&format!(
            r#"apiVersion: apps/v1
kind: Deployment
metadata:
  name: tf-job-operator
spec:
  replicas: {}
  selector:
    matchLabels:
      name: tf-job-operator
  template: {{}}
{}"#,
            desired, status
        ))
        .unwrap()
    }

    fn statefulset(desired: Option<i32>, ready: i32) -> StatefulSet {
        let replicas = match desired {
            Some(desired) => format!("  replicas: {}\n", desired),
            None => String::new(),
        };
        serde_yaml::from_str(&format!(
            r#"apiVersion: apps/v1
kind: StatefulSet
metadata:
  name: tf-hub
spec:
{}  serviceName: tf-hub
  selector:
    matchLabels:
      app: tf-hub
  template: {{}}
status:
  readyReplicas: {}
"#,
            replicas, ready
        ))
        .unwrap()
    }

    #[test]
    fn deployment_ready_when_counts_match() {
        assert!(deployment_is_ready(&deployment(1, Some(1))));
        assert!(deployment_is_ready(&deployment(3, Some(3))));
    }

    #[test]
    fn deployment_not_ready_below_desired() {
        assert!(!deployment_is_ready(&deployment(1, Some(0))));
        assert!(!deployment_is_ready(&deployment(3, Some(2))));
    }

    #[test]
    fn deployment_without_status_is_not_ready() {
        assert!(!deployment_is_ready(&deployment(1, None)));
    }

    #[test]
    fn statefulset_defaults_to_one_desired_replica() {
        assert!(statefulset_is_ready(&statefulset(None, 1)));
    }

    #[test]
    fn statefulset_not_ready_at_zero() {
        assert!(!statefulset_is_ready(&statefulset(Some(1), 0)));
    }
}
