//! Subcommand handlers.

pub mod serve;
pub mod stats;
pub mod vlan;
