use std::time::Duration;

use thiserror::Error;

/// Failure modes of a single raw HTTP exchange.
///
/// `Timeout` is deliberately distinct from `Connection`: a refused or reset
/// connection means the switch is unreachable, while a timeout usually means
/// the firmware is busy applying a previous command.
#[derive(Debug, Error)]
pub enum NetError {
    /// TCP connect, write, or read failed.
    #[error("connection error: {0}")]
    Connection(#[from] std::io::Error),

    /// The overall wall-clock deadline (connect + write + read) expired.
    #[error("request timed out after {:.1}s", timeout.as_secs_f64())]
    Timeout { timeout: Duration },

    /// The response did not match the expected HTTP/1.x shape.
    #[error("malformed HTTP response: {message}")]
    Protocol { message: String },
}

impl NetError {
    /// Short machine-readable kind, used in per-command outcome reporting.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Connection(_) => "connection",
            Self::Timeout { .. } => "timeout",
            Self::Protocol { .. } => "protocol",
        }
    }
}
