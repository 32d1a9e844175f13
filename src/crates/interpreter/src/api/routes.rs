//! API route definitions

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use crate::agent::InstructionAgent;
use crate::api::handlers;
use crate::api::middleware::{cors_layer, logging_layer};

/// Request bodies above this size are rejected.
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub agent: Arc<InstructionAgent>,
}

impl AppState {
    pub fn new(agent: InstructionAgent) -> Self {
        Self {
            agent: Arc::new(agent),
        }
    }
}

/// Build the complete API router
pub fn create_router(state: AppState, allowed_origins: &[String]) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/execute", post(handlers::execute))
        .route("/plan", post(handlers::execute_plan))
        .with_state(state)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(cors_layer(allowed_origins))
        .layer(logging_layer())
}
