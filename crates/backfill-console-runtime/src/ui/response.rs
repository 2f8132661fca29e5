use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};

use backfill_console_core::error::ConsoleError;

use super::layout::{alert_error, base_template, page_title, Page};

/// Error page for handlers that cannot render their page at all.
#[derive(Debug)]
pub struct PageError {
    error: ConsoleError,
    product: String,
}

impl PageError {
    pub fn new(error: ConsoleError, product: impl Into<String>) -> Self {
        Self {
            error,
            product: product.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match &self.error {
            ConsoleError::NotFound(_) => StatusCode::NOT_FOUND,
            ConsoleError::InvalidArgument(_) | ConsoleError::InvalidForm(_) => {
                StatusCode::BAD_REQUEST
            }
            ConsoleError::Backend(_) | ConsoleError::Http(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let heading = status.canonical_reason().unwrap_or("Error");
        let title = format!("{} | {}", heading, self.product);

        let content = format!(
            "{}\n{}",
            page_title(heading, "", "", ""),
            alert_error(&self.error.to_string(), "Go Back", "history.back(); return false;")
        );
        let page = Page {
            title: &title,
            product: &self.product,
            ..Default::default()
        };

        (status, Html(base_template(&page, &content))).into_response()
    }
}
