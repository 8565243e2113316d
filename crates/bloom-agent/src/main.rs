//! Stub generation server for local development.
//!
//! Stands in for the real generative backend: accepts the same wire request
//! the `HttpBackend` sends and answers with a deterministic, schema-conformant
//! reply so the rest of the stack can be exercised without network access or
//! an API key.

use axum::{
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

use bloom_flows::mock::canned_reply;
use bloom_types::{GenerationReply, GenerationRequest};

async fn health_check() -> StatusCode {
    StatusCode::OK
}

/// Axum handler for `POST /gen/bloom`.
///
/// Inspects the requested output shape and responds with the matching canned
/// reply; the prompt text itself is only logged.
async fn generate_bloom(Json(payload): Json<GenerationRequest>) -> Json<GenerationReply> {
    info!(
        prompt_bytes = payload.prompt.len(),
        "[bloom-agent] received generation request"
    );

    let result = canned_reply(&payload.output_shape);
    info!("[bloom-agent] responding with canned reply");
    Json(GenerationReply { result })
}

/// The main entry point for the stub generation server.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let app = Router::new()
        .route("/gen/bloom", post(generate_bloom))
        .route("/health", get(health_check));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:9090").await?;
    info!("[bloom-agent] stub generation server listening on http://127.0.0.1:9090");
    info!("[bloom-agent] POST /gen/bloom is ready to accept requests.");

    axum::serve(listener, app).await?;

    Ok(())
}
