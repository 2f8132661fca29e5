mod create;
mod layout;
mod response;
mod show;

pub use create::create_or_clone;
pub use layout::{alert_error, base_template, html_escape, Link, Page};
pub use response::PageError;
pub use show::{show, ShowQuery};

use std::sync::Arc;

use axum::routing::get;
use axum::Router;

use backfill_console_core::backfill::{paths, BackfillBackend, LogsLink, TemplateLogsLink};
use backfill_console_core::config::UiConfig;

/// State shared by the console page handlers.
#[derive(Clone)]
pub struct UiState {
    pub backend: Arc<dyn BackfillBackend>,
    pub logs: Arc<dyn LogsLink>,
    pub config: UiConfig,
}

impl UiState {
    /// State with logs links built from the configured template.
    pub fn new(backend: Arc<dyn BackfillBackend>, config: UiConfig) -> Self {
        let logs = Arc::new(TemplateLogsLink::new(config.logs_url_template.clone()));
        Self {
            backend,
            logs,
            config,
        }
    }
}

/// Create the console page router.
pub fn create_ui_router(state: UiState) -> Router {
    Router::new()
        .route(paths::CREATE_HANDLER_PATH, get(create::create_or_clone))
        .route(paths::SHOW_PATH, get(show::show))
        .with_state(state)
}
