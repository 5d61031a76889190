use anyhow::{Context, Result};
use clap::Parser;
use model::deploy_manager::DeployManager;
use model::TestContext;

/// The teardown subcommand deletes the test namespace. Deleting the
/// namespace's contents is left to the cluster's cascade semantics.
#[derive(Debug, Parser)]
pub(crate) struct Teardown {}

impl Teardown {
    pub(crate) async fn run(self, context: &TestContext) -> Result<()> {
        let manager = DeployManager::from_context(context)
            .await
            .context("Unable to create a cluster client")?;
        manager
            .delete_namespace(&context.namespace)
            .await
            .context(format!(
                "Unable to delete namespace '{}'",
                context.namespace
            ))?;

        println!("namespace '{}' was deleted.", context.namespace);

        Ok(())
    }
}
