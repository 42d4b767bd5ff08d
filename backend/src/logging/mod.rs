//! Log pipeline assembly.
//!
//! Two rotating file sinks share one formatter: `YYYYMMDD.log` receives
//! everything the filter admits and `YYYYMMDD.error.log` receives errors
//! only. Debug deployments additionally mirror to stderr.

use std::io;
use std::path::Path;

use thiserror::Error;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

pub mod format;
pub mod rotate;

pub use format::LineFormat;
pub use rotate::RotatingFileWriter;

/// Failures while standing up the log pipeline.
#[derive(Debug, Error)]
pub enum LogInitError {
    /// The log directory could not be created.
    #[error("cannot prepare log directory: {0}")]
    Io(#[from] io::Error),
    /// The configured level filter did not parse.
    #[error("invalid log filter: {0}")]
    Filter(#[from] tracing_subscriber::filter::ParseError),
    /// A global subscriber was already installed.
    #[error(transparent)]
    Init(#[from] tracing_subscriber::util::TryInitError),
}

/// Install the global subscriber.
///
/// `filter` is an `EnvFilter` directive string such as `info` or
/// `info,backend=debug`.
pub fn init(dir: &Path, filter: &str, debug: bool) -> Result<(), LogInitError> {
    rotate::prepare_dir(dir)?;
    let all = fmt::layer()
        .event_format(LineFormat)
        .with_writer(RotatingFileWriter::new(dir, "log"));
    let errors = fmt::layer()
        .event_format(LineFormat)
        .with_writer(RotatingFileWriter::new(dir, "error.log"))
        .with_filter(LevelFilter::ERROR);
    let console = debug.then(|| {
        fmt::layer()
            .event_format(LineFormat)
            .with_writer(io::stderr)
    });
    tracing_subscriber::registry()
        .with(EnvFilter::try_new(filter)?)
        .with(all)
        .with(errors)
        .with(console)
        .try_init()?;
    Ok(())
}
