//! Thin wrappers around the `gcloud` CLI used to configure access to an
//! external cluster.

use crate::constants::GOOGLE_CREDENTIALS_ENV;
use crate::error::{self, Result};
use log::info;
use snafu::{ensure, ResultExt};
use std::env;
use std::process::Command;

/// Print the active account configuration. This is a diagnostic aid for
/// credential problems; the output only goes to the logs.
pub fn print_config() -> Result<()> {
    run_gcloud(&["config", "list"])
}

/// Point the local kubeconfig at the named cluster.
pub fn configure_kubectl(project: Option<&str>, zone: &str, cluster: &str) -> Result<()> {
    info!("Configuring cluster access credentials for '{}'", cluster);
    let zone_arg = format!("--zone={}", zone);
    let mut args = vec!["container", "clusters", "get-credentials", cluster];
    args.push(&zone_arg);
    let project_arg;
    if let Some(project) = project {
        project_arg = format!("--project={}", project);
        args.push(&project_arg);
    }
    run_gcloud(&args)
}

/// Activate the service account named by `GOOGLE_APPLICATION_CREDENTIALS`,
/// when one is configured.
pub fn maybe_activate_service_account() -> Result<()> {
    match env::var(GOOGLE_CREDENTIALS_ENV) {
        Ok(key_file) if !key_file.is_empty() => {
            info!("Activating service account with key file '{}'", key_file);
            let key_file_arg = format!("--key-file={}", key_file);
            run_gcloud(&["auth", "activate-service-account", &key_file_arg])
        }
        _ => {
            info!(
                "{} is not set; skipping service account activation.",
                GOOGLE_CREDENTIALS_ENV
            );
            Ok(())
        }
    }
}

fn run_gcloud(args: &[&str]) -> Result<()> {
    info!("Running 'gcloud {}'", args.join(" "));
    let status = Command::new("gcloud")
        .args(args)
        .status()
        .context(error::ProcessSnafu { what: "gcloud" })?;
    ensure!(
        status.success(),
        error::CommandSnafu {
            command: format!("gcloud {}", args.join(" ")),
            code: status.code().unwrap_or(1),
        }
    );
    Ok(())
}
