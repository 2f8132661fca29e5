mod http;
mod memory;

pub use http::HttpBackend;
pub use memory::InMemoryBackend;

use std::sync::Arc;
use std::time::Duration;

use backfill_console_core::backfill::BackfillBackend;
use backfill_console_core::config::{BackendConfig, BackendKind};
use backfill_console_core::error::Result;

/// Build the backend selected by configuration.
pub fn from_config(config: &BackendConfig) -> Result<Arc<dyn BackfillBackend>> {
    match config.kind {
        BackendKind::Http => {
            tracing::info!(url = %config.url, "Using HTTP backfill backend");
            let backend = HttpBackend::new(&config.url, Duration::from_secs(config.timeout_secs))?;
            Ok(Arc::new(backend))
        }
        BackendKind::Memory => {
            tracing::warn!("Using in-memory backfill backend; runs are lost on restart");
            Ok(Arc::new(InMemoryBackend::new()))
        }
    }
}
