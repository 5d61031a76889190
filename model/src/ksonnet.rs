//! Wrapper around the `ks` (ksonnet) CLI and the application bundle it
//! manages on disk.

use crate::constants::{
    APP_NAME, GITHUB_TOKEN_ENV, PACKAGES, REGISTRY_NAME, REGISTRY_PATH, REGISTRY_URI, REPO_NAME,
    REPO_ORG, VENDOR_NAMESPACE,
};
use crate::error::{self, Result};
use crate::{unique_run_label, DeploymentParams, TestContext};
use log::{info, warn};
use snafu::{ensure, ResultExt};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// A ksonnet application bundle on disk.
///
/// Every `ks` child process receives the GitHub token (when one was supplied)
/// through its own environment rather than through this process's global
/// environment, so the workflows stay free of hidden mutable state.
#[derive(Debug)]
pub struct KsApp {
    app_dir: PathBuf,
    github_token: Option<String>,
}

/// Create the application bundle for the test: initialize the app, register
/// the package registry, install the packages, and replace the vendored
/// source with a link to the locally checked-out tree so that the code under
/// test is exercised instead of a pinned release.
///
/// Each step is fatal on failure; there is no rollback.
pub fn init_app(context: &TestContext) -> Result<KsApp> {
    fs::create_dir_all(&context.test_dir).context(error::IoSnafu {
        action: format!("create test directory '{}'", context.test_dir.display()),
    })?;
    info!("Using test directory: {}", context.test_dir.display());

    if context.github_token.is_none() {
        warn!(
            "{} not set; you will probably hit GitHub API limits.",
            GITHUB_TOKEN_ENV
        );
    }

    let app = KsApp::init(&context.test_dir, context.github_token.clone())?;
    app.registry_add(REGISTRY_NAME, REGISTRY_URI)?;
    for package in PACKAGES {
        app.pkg_install(package)?;
    }

    let source = context
        .test_dir
        .join("src")
        .join(REPO_ORG)
        .join(REPO_NAME)
        .join(REGISTRY_PATH);
    app.link_source_override(&source)?;

    Ok(app)
}

impl KsApp {
    /// Initialize a new application named [`APP_NAME`] inside `test_dir`.
    pub fn init(test_dir: &Path, github_token: Option<String>) -> Result<KsApp> {
        run_ks(test_dir, github_token.as_deref(), &["init", APP_NAME])?;
        Ok(KsApp {
            app_dir: test_dir.join(APP_NAME),
            github_token,
        })
    }

    /// The bundle's directory on disk.
    pub fn app_dir(&self) -> &Path {
        &self.app_dir
    }

    pub fn registry_add(&self, name: &str, uri: &str) -> Result<()> {
        self.run(&["registry", "add", name, uri])
    }

    pub fn pkg_install(&self, package: &str) -> Result<()> {
        self.run(&["pkg", "install", package])
    }

    /// Generate a component instance from a prototype, e.g.
    /// `ks generate core kubeflow-core --name=kubeflow-core`.
    pub fn generate(&self, prototype: &str, component: &str, extra: &[&str]) -> Result<()> {
        let mut args = vec!["generate", prototype, component];
        args.extend_from_slice(extra);
        self.run(&args)
    }

    pub fn env_add(&self, environment: &str) -> Result<()> {
        self.run(&["env", "add", environment])
    }

    pub fn param_set(
        &self,
        environment: &str,
        component: &str,
        key: &str,
        value: &str,
    ) -> Result<()> {
        let env_arg = format!("--env={}", environment);
        self.run(&["param", "set", &env_arg, component, key, value])
    }

    /// Apply an environment/component pair to the cluster, optionally
    /// impersonating `account`.
    pub fn apply(&self, environment: &str, component: &str, account: Option<&str>) -> Result<()> {
        let mut args = vec!["apply", environment, "-c", component];
        let account_arg;
        if let Some(account) = account {
            account_arg = format!("--as={}", account);
            args.push(&account_arg);
        }
        self.run(&args)
    }

    /// Deploy a component: register an environment (synthesizing a unique one
    /// when none is given), set every parameter against the component within
    /// that environment, and apply the pair to the cluster.
    ///
    /// Returns the environment that was used. Any step failing aborts the
    /// deploy; no partial-apply cleanup is attempted.
    pub fn deploy(
        &self,
        component: &str,
        params: &DeploymentParams,
        environment: Option<&str>,
        account: Option<&str>,
    ) -> Result<String> {
        ensure!(!component.is_empty(), error::EmptyComponentSnafu);

        let environment = environment
            .map(str::to_string)
            .unwrap_or_else(|| unique_run_label("e2e"));
        info!("Using app directory: {}", self.app_dir.display());

        self.env_add(&environment)?;
        for (key, value) in params.iter() {
            self.param_set(&environment, component, key, value)?;
        }
        self.apply(&environment, component, account)?;
        Ok(environment)
    }

    /// Delete the vendored subtree for the package namespace and replace it
    /// with a symbolic link to `source`, so that locally modified source is
    /// used instead of the pinned package version. `source` must exist.
    pub fn link_source_override(&self, source: &Path) -> Result<()> {
        ensure!(
            source.exists(),
            error::SourceMissingSnafu { path: source }
        );

        let target = self.app_dir.join("vendor").join(VENDOR_NAMESPACE);
        info!("Deleting {}", target.display());
        fs::remove_dir_all(&target).context(error::IoSnafu {
            action: format!("delete vendored tree '{}'", target.display()),
        })?;

        info!(
            "Creating link {} -> {}",
            target.display(),
            source.display()
        );
        std::os::unix::fs::symlink(source, &target).context(error::IoSnafu {
            action: format!("link '{}'", target.display()),
        })?;
        Ok(())
    }

    fn run(&self, args: &[&str]) -> Result<()> {
        run_ks(&self.app_dir, self.github_token.as_deref(), args)
    }
}

fn run_ks(cwd: &Path, github_token: Option<&str>, args: &[&str]) -> Result<()> {
    info!("Running 'ks {}' in '{}'", args.join(" "), cwd.display());
    let mut command = Command::new("ks");
    command.args(args).current_dir(cwd);
    if let Some(token) = github_token {
        command.env(GITHUB_TOKEN_ENV, token);
    }
    let status = command.status().context(error::ProcessSnafu { what: "ks" })?;
    ensure!(
        status.success(),
        error::CommandSnafu {
            command: format!("ks {}", args.join(" ")),
            code: status.code().unwrap_or(1),
        }
    );
    Ok(())
}

// =^..^=   =^..^=   =^..^=   =^..^=   =^..^=   =^..^=   =^..^=   =^..^=   =^..^=   =^..^=   =^..^=

#[cfg(test)]
mod test {
    use super::KsApp;
    use crate::constants::{APP_NAME, VENDOR_NAMESPACE};
    use crate::error::Error;
    use crate::DeploymentParams;
    use std::fs;

    fn app_in(dir: &std::path::Path) -> KsApp {
        KsApp {
            app_dir: dir.join(APP_NAME),
            github_token: None,
        }
    }

    #[test]
    fn empty_component_is_rejected_before_any_side_effect() {
        // The app directory does not exist; reaching any ks invocation or
        // filesystem operation would fail with a different error.
        let app = app_in(std::path::Path::new("/nonexistent"));
        let error = app
            .deploy("", &DeploymentParams::default(), None, None)
            .unwrap_err();
        assert!(matches!(error, Error::EmptyComponent));
    }

    #[test]
    fn source_override_replaces_vendor_with_link() {
        let dir = tempfile::tempdir().unwrap();
        let app = app_in(dir.path());
        let vendored = app.app_dir.join("vendor").join(VENDOR_NAMESPACE);
        fs::create_dir_all(&vendored).unwrap();
        fs::write(vendored.join("pinned.libsonnet"), "{}").unwrap();
        let source = dir.path().join("src/kubeflow/kubeflow/kubeflow");
        fs::create_dir_all(&source).unwrap();

        app.link_source_override(&source).unwrap();

        let metadata = vendored.symlink_metadata().unwrap();
        assert!(metadata.file_type().is_symlink());
        assert_eq!(fs::read_link(&vendored).unwrap(), source);
    }

    #[test]
    fn missing_source_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let app = app_in(dir.path());
        fs::create_dir_all(app.app_dir.join("vendor").join(VENDOR_NAMESPACE)).unwrap();

        let error = app
            .link_source_override(&dir.path().join("src/does/not/exist"))
            .unwrap_err();
        assert!(matches!(error, Error::SourceMissing { .. }));
        // The vendored tree is untouched when the precondition fails.
        assert!(app.app_dir.join("vendor").join(VENDOR_NAMESPACE).is_dir());
    }
}
