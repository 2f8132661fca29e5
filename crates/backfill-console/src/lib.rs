//! Backfill Console
//!
//! Server-rendered pages for creating, cloning and inspecting backfill runs.

pub mod cli;

pub use backfill_console_core::{ConsoleConfig, ConsoleError};
pub use backfill_console_runtime::{ConsoleServer, HttpBackend, InMemoryBackend};
