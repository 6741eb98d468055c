//! CLI error types with miette diagnostics and exit-code mapping.

use miette::Diagnostic;
use thiserror::Error;

/// Exit codes.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const CONFIG: i32 = 3;
    pub const AUTH: i32 = 4;
    pub const EXECUTION: i32 = 5;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Usage ────────────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(
        code(webswitch::usage),
        help("Run: webswitch vlan --help for valid flag combinations")
    )]
    Usage { message: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(code(webswitch::config))]
    Config(#[from] webswitch_config::ConfigError),

    #[error(transparent)]
    #[diagnostic(
        code(webswitch::auth),
        help("Every switch needs an auth block with user and response values.")
    )]
    Auth(#[from] webswitch_core::AuthError),

    // ── Execution ────────────────────────────────────────────────────
    #[error("provisioning failed on {} switch(es): {}", failed.len(), failed.join(", "))]
    #[diagnostic(
        code(webswitch::execution),
        help("Re-run with -v to see per-command outcomes.")
    )]
    ExecutionFailed { failed: Vec<String> },

    #[error("scraping failed on every switch")]
    #[diagnostic(code(webswitch::scrape))]
    AllScrapesFailed,

    // ── Serve ────────────────────────────────────────────────────────
    #[error("cannot bind metrics endpoint on {listen}")]
    #[diagnostic(code(webswitch::bind))]
    Bind {
        listen: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to a process exit code.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Usage { .. } => exit_code::USAGE,
            Self::Config(_) => exit_code::CONFIG,
            Self::Auth(_) => exit_code::AUTH,
            Self::ExecutionFailed { .. } | Self::AllScrapesFailed => exit_code::EXECUTION,
            _ => exit_code::GENERAL,
        }
    }
}
