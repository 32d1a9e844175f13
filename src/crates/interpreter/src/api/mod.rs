//! HTTP API for the local agent
//!
//! - `GET /health` - liveness probe
//! - `POST /execute` - `{instruction}` to generated and executed plan
//! - `POST /plan` - `{plan}` executed directly, without the model

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;

pub use error::{ApiError, ApiErrorResponse, ApiResult};
pub use response::{HealthResponse, PlanResponse};
pub use routes::{create_router, AppState};
