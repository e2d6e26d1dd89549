//! Response bodies for the HTTP surface.

use serde::Serialize;

/// Body of `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
    /// Configured bot display name.
    pub bot: String,
}
