//! Thin HTTP binding: one POST endpoint per app.
//!
//! Transports remain external; this module only adapts between HTTP
//! request/response types and [`TurnReply`]. Routing failures are server
//! errors, everything else passes the adapter's status through.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header},
    routing::post,
};
use serde_json::{Value, json};
use tracing::error;

use crate::{TurnReply, assistant::AssistantApp, error::Result, nlu::NluApp};

/// Single-endpoint router for a direct-envelope app.
pub fn assistant_router(app: Arc<AssistantApp>) -> Router {
    async fn handle(
        State(app): State<Arc<AssistantApp>>,
        headers: HeaderMap,
        body: axum::body::Bytes,
    ) -> (StatusCode, Json<Value>) {
        reply(app.handle_bytes(&body, bearer_token(&headers).as_deref()).await)
    }

    Router::new().route("/", post(handle)).with_state(app)
}

/// Single-endpoint router for an NLU front-end app.
pub fn nlu_router(app: Arc<NluApp>) -> Router {
    async fn handle(
        State(app): State<Arc<NluApp>>,
        headers: HeaderMap,
        body: axum::body::Bytes,
    ) -> (StatusCode, Json<Value>) {
        reply(app.handle_bytes(&body, bearer_token(&headers).as_deref()).await)
    }

    Router::new().route("/", post(handle)).with_state(app)
}

fn reply(result: Result<TurnReply>) -> (StatusCode, Json<Value>) {
    match result {
        Ok(reply) => (
            StatusCode::from_u16(reply.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            Json(reply.body),
        ),
        Err(error) => {
            error!(%error, "Turn failed.");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": error.to_string() })),
            )
        }
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    Some(
        value
            .strip_prefix("Bearer ")
            .unwrap_or(value)
            .to_owned(),
    )
}
