//! `webswitch vlan` — compile, display, and optionally apply the plan.

use std::time::Duration;

use webswitch_core::{Executor, Filter, auth, compile, view};
use webswitch_net::RawClient;

use crate::cli::{GlobalOpts, VlanArgs, VlanMode};
use crate::error::CliError;
use crate::output;

pub async fn handle(args: VlanArgs, global: &GlobalOpts) -> Result<(), CliError> {
    // Flag constraints are rejected before any config or network access.
    if args.save && !args.execute {
        return Err(CliError::Usage {
            message: "--save requires --execute".into(),
        });
    }
    if args.execute && args.mode != VlanMode::Requests {
        return Err(CliError::Usage {
            message: "--execute requires --mode requests".into(),
        });
    }

    let config = webswitch_config::load(&global.config)?;
    let config = Filter::new(args.switch, args.vlan).apply(&config);

    if args.mode == VlanMode::Json {
        let views = view::membership_view(&config);
        output::print_output(&output::render_json_pretty(&views), global.quiet);
        return Ok(());
    }

    let credentials = auth::derive_all(&config)?;
    let plans = compile::compile(&config, &credentials);

    if !args.execute {
        output::print_output(&output::render_plans(&plans), global.quiet);
        return Ok(());
    }

    let client = RawClient::new(Duration::from_secs(global.timeout));
    let executor = Executor::new(client);

    let mut report = executor.execute(&plans).await;

    // Save is issued once execution was requested, regardless of batch
    // outcome: partially applied VLAN state is still worth persisting.
    if args.save {
        let save_plans = compile::compile_save(&config, &credentials);
        report.merge(executor.execute(&save_plans).await);
    }

    output::print_output(&output::render_report(&report), global.quiet);

    if report.all_succeeded() {
        Ok(())
    } else {
        Err(CliError::ExecutionFailed {
            failed: report
                .failed_switches()
                .into_iter()
                .map(String::from)
                .collect(),
        })
    }
}
