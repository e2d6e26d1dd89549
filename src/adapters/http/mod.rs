//! HTTP adapters - the provider-facing webhook surface.

mod dto;
mod handlers;
mod routes;

pub use dto::HealthResponse;
pub use handlers::WebhookState;
pub use routes::webhook_routes;
