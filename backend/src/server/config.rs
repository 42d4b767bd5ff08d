//! Runtime configuration.
//!
//! Everything is settable as a CLI flag or an environment variable; flags
//! win. Secrets default to obviously unusable values so a misconfigured
//! deployment fails loudly at login rather than silently sharing a key.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

/// Command-line and environment configuration.
#[derive(Debug, Clone, Parser)]
#[command(name = "backend", about = "Generic API dispatch service")]
pub struct AppConfig {
    /// Socket address to bind.
    #[arg(long, env = "BIND_ADDR", default_value = "127.0.0.1:8000")]
    pub bind_addr: SocketAddr,

    /// Directory receiving the dated log files.
    #[arg(long, env = "LOG_DIR", default_value = "logs")]
    pub log_dir: PathBuf,

    /// Log filter directive, e.g. `info` or `info,backend=debug`.
    #[arg(long, env = "LOG_FILTER", default_value = "info")]
    pub log_filter: String,

    /// Mirror logs to stderr and expose unhandled fault detail.
    #[arg(long, env = "DEBUG", default_value_t = false)]
    pub debug: bool,

    /// HMAC secret signing bearer tokens.
    #[arg(long, env = "TOKEN_SECRET", default_value = "insecure-dev-secret")]
    pub token_secret: String,

    /// Bearer token lifetime in seconds.
    #[arg(long, env = "TOKEN_TTL", default_value_t = 24 * 60 * 60)]
    pub token_ttl: i64,

    /// Login name of the seeded administrator account.
    #[arg(long, env = "ADMIN_USERNAME", default_value = "admin")]
    pub admin_username: String,

    /// Initial password of the seeded administrator account.
    #[arg(long, env = "ADMIN_PASSWORD", default_value = "admin")]
    pub admin_password: String,
}

impl AppConfig {
    /// Parse from the process arguments and environment.
    #[must_use]
    pub fn load() -> Self {
        Self::parse()
    }
}
