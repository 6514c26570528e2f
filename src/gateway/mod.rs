//! Gateway server: forwards parse, download, status and file requests to
//! the media backend and normalizes every failure to `{"error": "..."}`.

pub mod backend;
pub mod response;
pub mod routes;
pub mod server;

pub use backend::BackendClient;
pub use routes::{create_router, GatewayState};
pub use server::serve;
