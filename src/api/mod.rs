//! API routes module.

pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;

pub use response::ResponseFormatter;
pub use routes::{create_app, create_router};
