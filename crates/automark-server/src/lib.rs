//! HTTP service and CLI plumbing around [`automark_core`].

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod session;

pub use api::{router, serve, AppState};
pub use config::ServerConfig;
pub use error::ApiError;
pub use session::{SessionGate, COOKIE_NAME};
