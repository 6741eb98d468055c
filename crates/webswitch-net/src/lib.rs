//! Minimal raw HTTP/1.1 client for web-managed switch firmware.
//!
//! The target firmware speaks plain HTTP over port 80, answers every
//! request with `Connection: close`, and is sensitive to header order in
//! its CGI form handlers. A general-purpose HTTP client (pooling,
//! redirects, keep-alive) would fight those constraints, so this crate
//! exposes exactly one call: open a TCP connection, write a hand-built
//! request, read to end-of-stream, parse.

mod client;
mod error;

pub use client::{RawClient, RawResponse};
pub use error::NetError;
