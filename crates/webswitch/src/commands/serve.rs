//! `webswitch serve` — long-running Prometheus endpoint over the scraper.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use tracing::{info, warn};

use webswitch_core::{Config, auth, cache::TimedCache};
use webswitch_net::RawClient;

use crate::cli::{GlobalOpts, ServeArgs};
use crate::commands::stats::scrape_fleet;
use crate::error::CliError;

struct AppState {
    config: Config,
    client: RawClient,
    cache: TimedCache<String>,
}

pub async fn handle(args: ServeArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let config = webswitch_config::load(&global.config)?;

    // Missing auth blocks surface at startup, not on the first scrape.
    auth::derive_all(&config)?;

    let state = Arc::new(AppState {
        config,
        client: RawClient::new(Duration::from_secs(global.timeout)),
        cache: TimedCache::new(Duration::from_secs(args.cache_secs)),
    });

    let app = Router::new()
        .route("/metrics", get(metrics_handler))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(args.listen)
        .await
        .map_err(|source| CliError::Bind {
            listen: args.listen.to_string(),
            source,
        })?;

    info!(listen = %args.listen, cache_secs = args.cache_secs, "serving metrics");
    axum::serve(listener, app).await?;
    Ok(())
}

async fn metrics_handler(State(state): State<Arc<AppState>>) -> Response {
    let result = state
        .cache
        .get_or_refresh(|| scrape_fleet(&state.client, &state.config))
        .await;

    match result {
        Ok(text) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            text,
        )
            .into_response(),
        Err(err) => {
            warn!(error = %err, "metrics scrape failed");
            (StatusCode::BAD_GATEWAY, format!("scrape failed: {err}\n")).into_response()
        }
    }
}
