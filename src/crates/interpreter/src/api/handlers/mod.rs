//! Request handlers

pub mod health;
pub mod plans;

pub use health::health;
pub use plans::{execute, execute_plan};
