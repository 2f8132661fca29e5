use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};

use backfill_console_core::backfill::paths;
use backfill_console_core::error::Result;
use backfill_console_core::form::CreateForm;

use super::layout::{alert_error, base_template, Link, Page};
use super::UiState;

/// Create a backfill from the submitted form, or clone an existing one.
///
/// Redirects to the new run on success. Any failure is logged and rendered
/// as an error page with status 200.
pub async fn create_or_clone(
    State(state): State<UiState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Response {
    match submit(&state, pairs).await {
        Ok(id) => {
            let location = paths::show(id);
            tracing::info!(id, "Backfill created");
            (
                StatusCode::SEE_OTHER,
                [(header::LOCATION, location.clone())],
                format!("go to {}", location),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Backfill create or clone failed");
            let message = format!("Backfill create or clone failed: {}", e);
            Html(error_page(&state, &message)).into_response()
        }
    }
}

async fn submit(state: &UiState, pairs: Vec<(String, String)>) -> Result<i64> {
    let form = CreateForm::parse(pairs)?;
    tracing::debug!(
        service = %form.service,
        variant = %form.variant,
        range = ?form.range,
        "Submitting backfill"
    );

    let submission = form.into_submission(state.backend.as_ref()).await?;
    let response = state
        .backend
        .create(&submission.service, &submission.variant, submission.request)
        .await?;
    Ok(response.backfill_run_id)
}

fn error_page(state: &UiState, message: &str) -> String {
    let title = format!("Create Backfill | {}", state.config.title);
    let breadcrumbs = [Link::new("Services", paths::SERVICES_PATH)];
    let page = Page {
        title: &title,
        product: &state.config.title,
        breadcrumbs: &breadcrumbs,
        auto_reload_secs: None,
    };
    let content = format!(
        r#"<div class="py-20">{}</div>"#,
        alert_error(message, "Try Again", "history.back(); return false;")
    );
    base_template(&page, &content)
}
