use std::time::Instant;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tracing::Instrument;

use crate::AppState;

/// Wrap each request in a `request` span and, outside production, log how
/// long it took to produce the response.
pub async fn record_timing(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let span = tracing::info_span!("request", %method, %path);

    let start = Instant::now();
    let response = next.run(req).instrument(span.clone()).await;
    let elapsed = start.elapsed();

    if !state.config.production {
        span.in_scope(|| {
            tracing::info!(
                status = response.status().as_u16(),
                elapsed_ms = elapsed.as_secs_f64() * 1000.0,
                "request timed"
            );
        });
    }

    response
}
