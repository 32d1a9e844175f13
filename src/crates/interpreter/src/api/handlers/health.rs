//! Health check endpoint handler

use axum::Json;

use crate::api::response::HealthResponse;

/// Handler for GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_health_reports_success() {
        let Json(body) = health().await;
        assert!(body.success);
    }
}
