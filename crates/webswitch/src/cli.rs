//! Clap derive structures for the `webswitch` CLI.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// webswitch — VLAN provisioning and stats export for HTTP-only switches
#[derive(Debug, Parser)]
#[command(
    name = "webswitch",
    version,
    about = "Compile and apply VLAN plans for web-managed switches",
    long_about = "Compiles a declarative VLAN/template fleet model into the exact\n\
        form-POST sequences cheap web-managed switch firmware expects, and\n\
        optionally executes them. Also scrapes per-port traffic statistics\n\
        and republishes them as Prometheus metrics.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Fleet configuration file (YAML)
    #[arg(long, short = 'c', env = "WEBSWITCH_CONFIG", default_value = "webswitch.yaml", global = true)]
    pub config: PathBuf,

    /// Per-request timeout in seconds
    #[arg(long, env = "WEBSWITCH_TIMEOUT", default_value = "10", global = true)]
    pub timeout: u64,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compile the VLAN plan; optionally execute it against the fleet
    Vlan(VlanArgs),

    /// Scrape port statistics once and print metrics text
    Stats(StatsArgs),

    /// Serve scraped port statistics as a Prometheus endpoint
    Serve(ServeArgs),
}

#[derive(Debug, Args)]
pub struct VlanArgs {
    /// Output mode
    #[arg(long, short = 'm', default_value = "json", value_enum)]
    pub mode: VlanMode,

    /// Execute the compiled requests against the switches
    #[arg(long, short = 'x')]
    pub execute: bool,

    /// Persist running config on each switch after execution
    #[arg(long)]
    pub save: bool,

    /// Limit to these switch keys (repeatable)
    #[arg(long, short = 's', value_name = "KEY")]
    pub switch: Vec<String>,

    /// Limit to these VLANs, by id or name (repeatable)
    #[arg(long, value_name = "ID_OR_NAME")]
    pub vlan: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, ValueEnum)]
pub enum VlanMode {
    /// Per-switch VLAN/port membership view as JSON
    Json,
    /// The literal compiled HTTP requests
    Requests,
}

#[derive(Debug, Args)]
pub struct StatsArgs {
    /// Limit to these switch keys (repeatable)
    #[arg(long, short = 's', value_name = "KEY")]
    pub switch: Vec<String>,
}

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Listen address for the metrics endpoint
    #[arg(long, default_value = "0.0.0.0:9360")]
    pub listen: SocketAddr,

    /// Scrape cache TTL in seconds
    #[arg(long, default_value = "30")]
    pub cache_secs: u64,
}
