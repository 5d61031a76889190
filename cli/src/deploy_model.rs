use anyhow::{bail, Context, Result};
use clap::Parser;
use log::info;
use model::constants::{SERVING_COMPONENT, SERVING_NAME, SERVING_PROTOTYPE};
use model::deploy_manager::{service_cluster_ip, DeployManager};
use model::{ksonnet, DeploymentParams, TestContext};

/// The deploy_model subcommand deploys a model through the serving component
/// and verifies the resulting service and its backing deployment.
#[derive(Debug, Parser)]
pub(crate) struct DeployModel {
    /// Comma separated list of parameters to set on the model, e.g.
    /// "namespace=kubeflow,numGpus=1". Must include "namespace".
    #[clap(long = "params", default_value = "")]
    params: String,
}

impl DeployModel {
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

        info!("Deploying the serving component.");
        let name_arg = format!("--name={}", SERVING_NAME);
        app.generate(SERVING_PROTOTYPE, SERVING_COMPONENT, &[&name_arg])
            .context("Unable to generate the serving component")?;

        let params: DeploymentParams = self.params.parse().context("Unable to parse --params")?;
        let namespace = params
            .get("namespace")
            .map(str::to_string)
            .context("namespace must be supplied via --params")?;

        // No environment or account is passed so a fresh environment is
        // synthesized for this run.
        app.deploy(SERVING_COMPONENT, &params, None, None)
            .context("Unable to deploy the serving component")?;

        let service = manager
            .read_service(&context.namespace, SERVING_NAME)
            .await?;
        if service_cluster_ip(&service).is_none() {
            bail!("{} service wasn't assigned a cluster ip.", SERVING_NAME);
        }

        manager.wait_for_deployment(&namespace, SERVING_NAME).await?;
        info!("Verified the model server started.");

        println!("model '{}' was successfully deployed.", SERVING_NAME);

        Ok(())
    }
}
