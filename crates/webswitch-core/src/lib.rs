//! Core logic for webswitch: the declarative fleet model, the VLAN plan
//! compiler, the provisioning executor, and the read-only stats scraper.
//!
//! Data flows strictly top to bottom:
//! `Config` → [`filter::Filter`] → [`compile::compile`] →
//! ([`auth`] ∥ [`execute::Executor`]) → [`compile::compile_save`].
//!
//! The compiler is a pure function; all I/O lives in the executor and the
//! scraper, both built on [`webswitch_net::RawClient`].

pub mod auth;
pub mod cache;
pub mod compile;
pub mod execute;
pub mod filter;
pub mod metrics;
pub mod model;
pub mod stats;
pub mod view;

pub use auth::{AuthError, Credential, CredentialMap};
pub use compile::{Command, SwitchPlan};
pub use execute::{CommandOutcome, ExecError, ExecutionReport, Executor, SwitchReport};
pub use filter::Filter;
pub use model::{Config, Membership, Port, Switch, SwitchAuth, Template};
pub use stats::{PortStats, ScrapeError};
