//! HTTP handlers for the webhook and health endpoints.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::Value;
use tracing::debug;

use crate::adapters::messaging::normalize;
use crate::application::ProcessInboundHandler;

use super::dto::HealthResponse;

/// Static reply for `GET` probes on the webhook path.
const WEBHOOK_LIVENESS: &str =
    "Webhook ativo. O provedor deve enviar POST para esta URL com as mensagens.";

/// Shared state behind the webhook routes.
#[derive(Clone)]
pub struct WebhookState {
    pub processor: Arc<ProcessInboundHandler>,
    /// Bot display name reported by `/health`.
    pub bot_name: String,
}

impl WebhookState {
    pub fn new(processor: Arc<ProcessInboundHandler>, bot_name: impl Into<String>) -> Self {
        Self {
            processor,
            bot_name: bot_name.into(),
        }
    }
}

/// POST /webhook - receive one provider event.
///
/// Always acknowledges with 200 immediately; the event is processed in a
/// spawned task so a slow downstream never makes the provider retry.
pub async fn receive_webhook(
    State(state): State<WebhookState>,
    Json(payload): Json<Value>,
) -> impl IntoResponse {
    match normalize(&payload) {
        Some(event) => {
            let processor = Arc::clone(&state.processor);
            tokio::spawn(async move {
                processor.process(event).await;
            });
        }
        None => {
            debug!("dropped webhook payload without a routable event");
        }
    }
    (StatusCode::OK, "ok")
}

/// GET /webhook - liveness probe for humans wiring up the provider.
pub async fn webhook_liveness() -> impl IntoResponse {
    (StatusCode::OK, WEBHOOK_LIVENESS)
}

/// GET /health - machine-readable liveness.
pub async fn health(State(state): State<WebhookState>) -> impl IntoResponse {
    Json(HealthResponse {
        ok: true,
        bot: state.bot_name.clone(),
    })
}
