use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use model::constants::{
    CORE_COMPONENT, CORE_PROTOTYPE, DEFAULT_ENVIRONMENT, HUB_STATEFULSET, OPERATOR_DEPLOYMENT,
};
use model::deploy_manager::DeployManager;
use model::{gcloud, ksonnet, TestContext};

/// The setup subcommand deploys the Kubeflow core component into the test
/// namespace and verifies that its workloads become ready.
#[derive(Debug, Parser)]
pub(crate) struct Setup {}

impl Setup {
    pub(crate) async fn run(self, context: &TestContext) -> Result<()> {
        let manager = DeployManager::from_context(context)
            .await
            .context("Unable to create a cluster client")?;
        manager
            .ensure_namespace(&context.namespace)
            .await
            .context(format!(
                "Unable to provision namespace '{}'",
                context.namespace
            ))?;

        let app =
            ksonnet::init_app(context).context("Unable to initialize the application bundle")?;

        let name_arg = format!("--name={}", CORE_COMPONENT);
        let namespace_arg = format!("--namespace={}", context.namespace);
        app.generate(CORE_PROTOTYPE, CORE_COMPONENT, &[&name_arg, &namespace_arg])
            .context("Unable to generate the core component")?;

        // Refresh the cluster credentials before applying; bundle
        // initialization can leave kubectl configured with a stale account.
        if let Some(cluster) = &context.cluster {
            gcloud::configure_kubectl(context.project.as_deref(), &context.zone, cluster)
                .context("Unable to refresh cluster access credentials")?;
        }

        app.apply(DEFAULT_ENVIRONMENT, CORE_COMPONENT, None)
            .context("Unable to apply the core component")?;

        info!("Verifying the operator started.");
        manager
            .wait_for_deployment(&context.namespace, OPERATOR_DEPLOYMENT)
            .await?;
        info!("Verifying the hub started.");
        manager
            .wait_for_statefulset(&context.namespace, HUB_STATEFULSET)
            .await?;

        println!(
            "kubeflow was successfully deployed to namespace '{}'.",
            context.namespace
        );

        Ok(())
    }
}
