//! Health check endpoint.

/// Liveness probe. Always answers `ok` while the process accepts requests.
#[tracing::instrument()]
pub async fn health() -> &'static str {
    "ok"
}
