use snafu::Snafu;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced on the local side of the deployment test: external CLI
/// invocations, the application bundle, parameter parsing and report output.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display("'{}' failed with exit status {}", command, code))]
    Command { command: String, code: i32 },

    #[snafu(display("component can't be empty"))]
    EmptyComponent,

    #[snafu(display("Unable to write file '{}': {}", path.display(), source))]
    File {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("Invalid parameter '{}': expected 'key=value'", pair))]
    InvalidParam { pair: String },

    #[snafu(display("Unable to {}: {}", action, source))]
    Io {
        action: String,
        source: std::io::Error,
    },

    #[snafu(display("Failed to create '{}' process: {}", what, source))]
    Process {
        what: String,
        source: std::io::Error,
    },

    #[snafu(display("Source tree '{}' does not exist", path.display()))]
    SourceMissing { path: PathBuf },
}
