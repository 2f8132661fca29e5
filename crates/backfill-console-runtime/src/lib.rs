//! HTTP surface of the backfill console: page handlers, backends and server.

pub mod backend;
pub mod server;
pub mod ui;

pub use backend::{HttpBackend, InMemoryBackend};
pub use server::{ConsoleServer, HealthResponse, RequestId};
pub use ui::{create_ui_router, UiState};
