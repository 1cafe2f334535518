//! HTTP surface: task management, brand pipelines, web lookup functions.

mod routes;
mod types;

pub use routes::{router, serve, AppState};
