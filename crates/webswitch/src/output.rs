//! Output helpers: pretty JSON, request dumps, outcome lines.

use std::io::{self, Write};

use webswitch_core::{Command, ExecutionReport, SwitchPlan};

/// Pretty-printed JSON.
pub fn render_json_pretty<T: serde::Serialize + ?Sized>(data: &T) -> String {
    serde_json::to_string_pretty(data).expect("serialization should not fail")
}

/// Print to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

/// Human-readable dump of one compiled request.
fn render_command(host: &str, cmd: &Command) -> String {
    let mut out = format!("{} http://{}{}\n", cmd.method, host, cmd.path);
    for (name, value) in &cmd.headers {
        out.push_str(&format!("  {name}: {value}\n"));
    }
    if !cmd.body.is_empty() {
        out.push_str(&format!("  {}\n", cmd.body));
    }
    out
}

/// Dump every compiled request, grouped per switch.
pub fn render_plans(plans: &[SwitchPlan]) -> String {
    let mut out = String::new();
    for plan in plans {
        out.push_str(&format!("# switch: {}\n", plan.key));
        for cmd in &plan.commands {
            out.push_str(&render_command(&plan.host, cmd));
        }
    }
    out.trim_end().to_string()
}

/// One line per executed command.
pub fn render_report(report: &ExecutionReport) -> String {
    let mut out = String::new();
    for switch in &report.switches {
        for outcome in &switch.outcomes {
            let line = match &outcome.result {
                Ok(status) => format!("ok   {} {} ({status})", outcome.switch, outcome.path),
                Err(err) => format!("FAIL {} {} ({err})", outcome.switch, outcome.path),
            };
            out.push_str(&line);
            out.push('\n');
        }
    }
    out.trim_end().to_string()
}
