//! HTTP routes for the webhook surface.

use axum::routing::{get, post};
use axum::Router;

use super::handlers::{health, receive_webhook, webhook_liveness, WebhookState};

/// Creates the router with the webhook and health endpoints.
pub fn webhook_routes(state: WebhookState) -> Router {
    Router::new()
        .route("/webhook", post(receive_webhook).get(webhook_liveness))
        .route("/health", get(health))
        .with_state(state)
}
