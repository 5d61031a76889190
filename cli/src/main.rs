/*!

This is the command line interface for the Kubeflow end-to-end deployment
test. It deploys Kubeflow to a cluster (`setup`), deploys a serving model
with caller-supplied parameters (`deploy_model`), and deletes the test
namespace afterward (`teardown`). Every run records its outcome in a JUnit
XML report under the artifacts directory.

!*/

mod deploy_model;
mod setup;
mod teardown;

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::{Builder, Target};
use log::{error, info, LevelFilter};
use model::constants::GITHUB_TOKEN_ENV;
use model::report::{self, TestCase};
use model::{gcloud, unique_run_label, TestContext};
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// The command line interface for running the Kubeflow end-to-end deployment test.
#[derive(Debug, Parser)]
#[clap(author, version, about)]
struct Args {
    /// Set logging verbosity [trace|debug|info|warn|error]. If the environment variable `RUST_LOG`
    /// is present, it overrides the default logging behavior.
    #[clap(long = "log-level", default_value = "info")]
    log_level: LevelFilter,
    /// Directory to use for all the test files. If not set a temporary directory is created.
    #[clap(long = "test_dir")]
    test_dir: Option<PathBuf>,
    /// Directory to use for artifacts that should be preserved after the test runs. Defaults to
    /// test_dir if not set.
    #[clap(long = "artifacts_dir")]
    artifacts_dir: Option<PathBuf>,
    /// The project to use.
    #[clap(long = "project")]
    project: Option<String>,
    /// The name of the cluster. If not set assumes the test is running in a cluster and uses that
    /// cluster.
    #[clap(long = "cluster")]
    cluster: Option<String>,
    /// The namespace to use.
    #[clap(long = "namespace")]
    namespace: String,
    /// The zone for the cluster.
    #[clap(long = "zone", default_value = "us-east1-d")]
    zone: String,
    /// The GitHub API token to use. This is needed since ksonnet uses the GitHub API and without
    /// it we get rate limited. Can also be set using the environment variable GITHUB_TOKEN.
    #[clap(long = "github_token")]
    github_token: Option<String>,
    #[clap(subcommand)]
    command: Command,
}

#[derive(Debug, Parser)]
enum Command {
    /// Set up the test infrastructure: deploy Kubeflow and verify its workloads.
    Setup(setup::Setup),
    /// Tear down the test infrastructure.
    Teardown(teardown::Teardown),
    /// Deploy a serving model.
    #[clap(name = "deploy_model")]
    DeployModel(deploy_model::DeployModel),
}

impl Command {
    fn workflow_name(&self) -> &'static str {
        match self {
            Command::Setup(_) => "setup",
            Command::Teardown(_) => "teardown",
            Command::DeployModel(_) => "deploy_model",
        }
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    if let Err(e) = run(args).await {
        eprintln!("{:#}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    let workflow = args.command.workflow_name();

    let test_dir = match &args.test_dir {
        Some(test_dir) => test_dir.clone(),
        None => std::env::temp_dir().join(unique_run_label("test_deploy")),
    };
    let artifacts_dir = args
        .artifacts_dir
        .clone()
        .unwrap_or_else(|| test_dir.clone());

    let log_path = artifacts_dir
        .join("logs")
        .join(format!("test_deploy.{}.log.txt", workflow));
    init_logger(args.log_level, &log_path).context(format!(
        "Unable to set up logging to '{}'",
        log_path.display()
    ))?;
    if args.test_dir.is_none() {
        info!("--test_dir not set; using a temporary directory.");
    }
    info!("Logging to {}", log_path.display());

    gcloud::maybe_activate_service_account()
        .context("Unable to activate the configured service account")?;

    let github_token = args.github_token.clone().or_else(|| {
        std::env::var(GITHUB_TOKEN_ENV)
            .ok()
            .filter(|token| !token.is_empty())
    });
    let context = TestContext {
        test_dir,
        artifacts_dir: artifacts_dir.clone(),
        namespace: args.namespace.clone(),
        project: args.project.clone(),
        cluster: args.cluster.clone(),
        zone: args.zone.clone(),
        github_token,
    };

    let mut test_case = TestCase::new("KubeFlow", format!("deploy-kubeflow-{}", workflow));
    let started = Instant::now();
    let result = match args.command {
        Command::Setup(setup) => setup.run(&context).await,
        Command::Teardown(teardown) => teardown.run(&context).await,
        Command::DeployModel(deploy_model) => deploy_model.run(&context).await,
    };
    test_case.time = started.elapsed().as_secs_f64();
    if let Err(e) = &result {
        test_case.record_failure(format!("{:#}", e));
    }

    // The report is the contract with the CI artifact collector; it is
    // written whether or not the workflow succeeded, and a report-writing
    // failure never masks the workflow's own error.
    let junit_path = artifacts_dir.join(format!("junit_kubeflow-deploy-{}.xml", workflow));
    info!("Writing test results to {}", junit_path.display());
    let report_result = report::write_junit_xml(&[test_case], &junit_path);
    match (result, report_result) {
        (Ok(()), Err(report_error)) => {
            Err(report_error).context("Unable to write the test report")
        }
        (result, Err(report_error)) => {
            error!("Unable to write the test report: {}", report_error);
            result
        }
        (result, Ok(())) => result,
    }
}

/// Initialize the logger with the value passed by `--log-level` (or its default) when the
/// `RUST_LOG` environment variable is not present. If present, the `RUST_LOG` environment variable
/// overrides `--log-level`/`level`. All log output is additionally copied to the test log file so
/// that it can be collected with the run's artifacts.
fn init_logger(level: LevelFilter, log_path: &Path) -> Result<()> {
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let log_file = File::create(log_path)?;
    let mut builder = match std::env::var(env_logger::DEFAULT_FILTER_ENV).ok() {
        Some(_) => {
            // RUST_LOG exists; env_logger will use it.
            Builder::from_default_env()
        }
        None => {
            let mut builder = Builder::new();
            builder.filter(None, level);
            builder
        }
    };
    builder
        .target(Target::Pipe(Box::new(LogTee { log_file })))
        .init();
    Ok(())
}

/// Writes log output to stderr and to the artifacts log file.
struct LogTee {
    log_file: File,
}

impl Write for LogTee {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::stderr().write_all(buf)?;
        self.log_file.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()?;
        self.log_file.flush()
    }
}
