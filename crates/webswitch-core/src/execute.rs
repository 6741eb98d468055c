// ── Provisioning executor ──
//
// Replays compiled plans against real switches. Switches are independent
// network resources and run concurrently; within one switch the firmware
// has mutable session/page state, so its commands run strictly in the
// compiler-assigned order. A failed command is recorded and the batch
// continues — partial application beats silent abort on real fleets.

use futures_util::future::join_all;
use thiserror::Error;
use tracing::{debug, info, warn};

use webswitch_net::{NetError, RawClient};

use crate::compile::{Command, SwitchPlan};

/// Why one command failed.
#[derive(Debug, Error)]
pub enum ExecError {
    /// Transport-level failure (connection, timeout, protocol).
    #[error(transparent)]
    Net(#[from] NetError),

    /// The firmware answered with a non-2xx status.
    #[error("HTTP {status} {reason}")]
    Status { status: u16, reason: String },
}

impl ExecError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Net(e) => e.kind(),
            Self::Status { .. } => "status",
        }
    }
}

/// Outcome of one executed command, attributable to a specific switch and
/// endpoint.
#[derive(Debug)]
pub struct CommandOutcome {
    pub switch: String,
    pub path: &'static str,
    pub body: String,
    /// `Ok(status)` on 2xx, the failure otherwise.
    pub result: Result<u16, ExecError>,
}

/// All outcomes for one switch, in execution order.
#[derive(Debug)]
pub struct SwitchReport {
    pub key: String,
    pub outcomes: Vec<CommandOutcome>,
}

impl SwitchReport {
    /// Conjunction of all command outcomes.
    pub fn succeeded(&self) -> bool {
        self.outcomes.iter().all(|o| o.result.is_ok())
    }
}

/// Per-switch reports, in config order.
#[derive(Debug, Default)]
pub struct ExecutionReport {
    pub switches: Vec<SwitchReport>,
}

impl ExecutionReport {
    pub fn all_succeeded(&self) -> bool {
        self.switches.iter().all(SwitchReport::succeeded)
    }

    pub fn failed_switches(&self) -> Vec<&str> {
        self.switches
            .iter()
            .filter(|s| !s.succeeded())
            .map(|s| s.key.as_str())
            .collect()
    }

    /// Fold another report in (used to append the save step's outcomes).
    pub fn merge(&mut self, other: ExecutionReport) {
        for incoming in other.switches {
            match self.switches.iter_mut().find(|s| s.key == incoming.key) {
                Some(existing) => existing.outcomes.extend(incoming.outcomes),
                None => self.switches.push(incoming),
            }
        }
    }
}

/// Executes compiled plans through the raw HTTP client.
#[derive(Debug, Clone)]
pub struct Executor {
    client: RawClient,
    http_port: u16,
}

impl Executor {
    /// Executor targeting the firmware's fixed HTTP port 80.
    pub fn new(client: RawClient) -> Self {
        Self {
            client,
            http_port: 80,
        }
    }

    /// Override the target port. Only integration tests need this; real
    /// firmware listens on 80 and nothing else.
    pub fn with_http_port(mut self, port: u16) -> Self {
        self.http_port = port;
        self
    }

    /// Execute every plan. One concurrent task per switch, sequential
    /// commands within a switch, report in config order.
    pub async fn execute(&self, plans: &[SwitchPlan]) -> ExecutionReport {
        let reports = join_all(plans.iter().map(|plan| self.run_switch(plan))).await;
        ExecutionReport { switches: reports }
    }

    async fn run_switch(&self, plan: &SwitchPlan) -> SwitchReport {
        let mut outcomes = Vec::with_capacity(plan.commands.len());
        for cmd in &plan.commands {
            let result = self.run_command(plan, cmd).await;
            outcomes.push(CommandOutcome {
                switch: cmd.switch.clone(),
                path: cmd.path,
                body: cmd.body.clone(),
                result,
            });
        }
        let report = SwitchReport {
            key: plan.key.clone(),
            outcomes,
        };
        if report.succeeded() {
            info!(switch = plan.key.as_str(), commands = plan.commands.len(), "switch batch ok");
        } else {
            warn!(switch = plan.key.as_str(), "switch batch had failures");
        }
        report
    }

    async fn run_command(&self, plan: &SwitchPlan, cmd: &Command) -> Result<u16, ExecError> {
        debug!(
            switch = plan.key.as_str(),
            path = cmd.path,
            body = cmd.body.as_str(),
            "executing command"
        );
        let resp = self
            .client
            .request(&plan.host, self.http_port, cmd.method, cmd.path, &cmd.headers, &cmd.body)
            .await
            .inspect_err(|err| {
                warn!(
                    switch = plan.key.as_str(),
                    path = cmd.path,
                    kind = err.kind(),
                    %err,
                    "command failed"
                );
            })?;

        if resp.is_success() {
            Ok(resp.status)
        } else {
            warn!(
                switch = plan.key.as_str(),
                path = cmd.path,
                status = resp.status,
                "firmware rejected command"
            );
            Err(ExecError::Status {
                status: resp.status,
                reason: resp.reason,
            })
        }
    }
}
