//! `webswitch stats` — one-shot scrape of port statistics as metrics text.

use std::time::Duration;

use futures_util::future::join_all;
use tracing::warn;

use webswitch_core::{Config, Filter, auth, metrics, stats};
use webswitch_net::RawClient;

use crate::cli::{GlobalOpts, StatsArgs};
use crate::error::CliError;
use crate::output;

/// Management UI port on this firmware family.
const HTTP_PORT: u16 = 80;

pub async fn handle(args: StatsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let config = webswitch_config::load(&global.config)?;
    let config = Filter::new(args.switch, Vec::new()).apply(&config);

    let client = RawClient::new(Duration::from_secs(global.timeout));
    let text = scrape_fleet(&client, &config).await?;
    output::print_output(text.trim_end(), global.quiet);
    Ok(())
}

/// Scrape every switch concurrently and render one metrics document.
///
/// Individual switch failures are logged and skipped; the call only fails
/// when auth derivation fails or no switch could be scraped at all.
pub async fn scrape_fleet(client: &RawClient, config: &Config) -> Result<String, CliError> {
    let credentials = auth::derive_all(config)?;

    let scrapes = config.switches.iter().map(|(key, switch)| {
        let credential = &credentials[key.as_str()];
        async move {
            (
                key.as_str(),
                stats::scrape(client, &switch.host, HTTP_PORT, credential).await,
            )
        }
    });
    let results = join_all(scrapes).await;

    let mut fleets = Vec::new();
    for (key, result) in &results {
        match result {
            Ok(ports) => fleets.push(metrics::SwitchStats {
                switch: key,
                ports: ports.as_slice(),
            }),
            Err(err) => warn!(switch = *key, error = %err, "stats scrape failed"),
        }
    }

    if fleets.is_empty() && !config.switches.is_empty() {
        return Err(CliError::AllScrapesFailed);
    }
    Ok(metrics::render(&fleets))
}
