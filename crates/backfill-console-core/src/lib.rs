//! Domain types and request/display logic for the backfill console.

pub mod backfill;
pub mod config;
pub mod display;
pub mod error;
pub mod form;

pub use backfill::{BackfillBackend, BackfillState, BackfillStatus, LogsLink};
pub use config::ConsoleConfig;
pub use error::{ConsoleError, Result};
pub use form::{CreateForm, CreateSubmission};
