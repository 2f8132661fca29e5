use std::future::Future;
use std::pin::Pin;

use super::types::{BackfillStatus, CreateBackfillRequest, CreateBackfillResponse};
use crate::error::Result;

/// Boxed future returned by backend calls.
pub type BackendFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + Send + 'a>>;

/// The backfill service the console talks to.
///
/// Implementations report a missing run as `ConsoleError::NotFound`; any
/// other failure is surfaced to the caller as-is.
pub trait BackfillBackend: Send + Sync + 'static {
    /// Fetch the status snapshot of a run. `offset` pages the event log.
    fn status<'a>(&'a self, id: i64, offset: Option<&'a str>) -> BackendFuture<'a, BackfillStatus>;

    /// Create a new backfill run for `service`/`variant`.
    fn create<'a>(
        &'a self,
        service: &'a str,
        variant: &'a str,
        request: CreateBackfillRequest,
    ) -> BackendFuture<'a, CreateBackfillResponse>;
}

/// Resolves the external logs link for a run.
pub trait LogsLink: Send + Sync + 'static {
    fn url(&self, id: i64) -> String;
}

/// Logs link built from a template with an `{id}` placeholder.
#[derive(Debug, Clone)]
pub struct TemplateLogsLink {
    template: String,
}

impl TemplateLogsLink {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }
}

impl LogsLink for TemplateLogsLink {
    fn url(&self, id: i64) -> String {
        self.template.replace("{id}", &id.to_string())
    }
}
