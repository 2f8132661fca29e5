use axum::extract::{Path, Query, State};
use axum::response::Html;
use serde::Deserialize;

use backfill_console_core::backfill::paths;
use backfill_console_core::display::{
    ConfigurationRow, EventRow, Pagination, PartitionRow, RowButton, StateAction, StatusView,
    UpdateField, UPDATE_BUTTON_LABEL, VIEW_LOGS_BUTTON_LABEL,
};

use super::layout::{base_template, card, html_escape, page_title, Link, Page};
use super::response::PageError;
use super::UiState;

/// Event log paging parameters.
#[derive(Debug, Default, Deserialize)]
pub struct ShowQuery {
    pub offset: Option<String>,
    #[serde(rename = "lastOffset")]
    pub last_offset: Option<String>,
}

/// Status page of a single backfill run.
pub async fn show(
    State(state): State<UiState>,
    Path(id): Path<i64>,
    Query(query): Query<ShowQuery>,
) -> Result<Html<String>, PageError> {
    let offset = query.offset.as_deref().filter(|o| !o.is_empty());
    let status = state
        .backend
        .status(id, offset)
        .await
        .map_err(|e| {
            tracing::warn!(id, error = %e, "Failed to load backfill status");
            PageError::new(e, &state.config.title)
        })?;

    let view = StatusView::new(
        &status,
        state.logs.as_ref(),
        offset,
        query.last_offset.as_deref(),
    );

    let title = format!("Backfill {} | {}", id, state.config.title);
    let breadcrumbs = [
        Link::new("Services", paths::SERVICES_PATH),
        Link::new(&view.label, &view.service_href),
        Link::new(format!("Backfill #{}", id), paths::show(id)),
    ];
    let page = Page {
        title: &title,
        product: &state.config.title,
        breadcrumbs: &breadcrumbs,
        auto_reload_secs: Some(state.config.auto_reload_secs),
    };

    Ok(Html(base_template(&page, &render(&view))))
}

fn render(view: &StatusView) -> String {
    let clone_button = format!(
        r#"<a href="{}"><button type="button" class="btn btn-primary">Clone</button></a>"#,
        html_escape(&view.clone_href)
    );
    let heading = page_title(
        &format!("{} Backfill Run", view.service_name),
        &format!("#{}", view.id),
        &view.name,
        &clone_button,
    );

    format!(
        "{}\n{}\n{}\n{}",
        heading,
        card(&configuration(view)),
        card(&partitions(view)),
        card(&events(&view.events, &view.pagination)),
    )
}

fn configuration(view: &StatusView) -> String {
    let (left, right) = view.configuration_columns();
    let column = |rows: &[ConfigurationRow]| -> String {
        rows.iter()
            .map(|row| configuration_row(&view.update_action, row))
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        r#"<div class="grid grid-cols-2">
    <div>
        <h2>Configuration</h2>
        <dl>{}</dl>
    </div>
    <div>
        <dl>{}</dl>
    </div>
</div>"#,
        column(left),
        column(right)
    )
}

fn configuration_row(update_action: &str, row: &ConfigurationRow) -> String {
    let field_id = row.field.unwrap_or(UpdateField::State).field_id();

    let mut controls = String::new();
    match &row.button {
        Some(RowButton::Update) => {
            controls.push_str(&update_toggle(update_action, field_id, &row.description));
        }
        Some(RowButton::ViewLogs { href }) => {
            controls.push_str(&format!(
                r#"<a href="{}" target="_blank" rel="noopener noreferrer" class="btn btn-secondary">{}</a>"#,
                html_escape(href),
                VIEW_LOGS_BUTTON_LABEL
            ));
        }
        Some(RowButton::Transition(action)) => {
            controls.push_str(&state_form(update_action, field_id, action));
        }
        None => {}
    }
    for action in [&row.cancel_button, &row.delete_button].into_iter().flatten() {
        controls.push_str(&state_form(update_action, field_id, action));
    }

    format!(
        r#"<div class="config-row">
    <dt>{}</dt>
    <dd><span class="value">{}</span>{}</dd>
</div>"#,
        html_escape(&row.label),
        html_escape(&row.description),
        controls
    )
}

/// Inline form revealed by the "Update" toggle.
fn update_toggle(update_action: &str, field_id: &str, current: &str) -> String {
    format!(
        r#"<details class="update-toggle">
    <summary class="btn btn-secondary">{label}</summary>
    <form method="post" action="{action}">
        <input type="hidden" name="field_id" value="{field_id}">
        <input type="text" name="field_value" value="{current}">
        <button type="submit" class="btn btn-primary">{label}</button>
    </form>
</details>"#,
        label = UPDATE_BUTTON_LABEL,
        action = html_escape(update_action),
        field_id = field_id,
        current = html_escape(current),
    )
}

fn state_form(update_action: &str, field_id: &str, action: &StateAction) -> String {
    format!(
        r#"<form method="post" action="{}" class="inline-form">
    <input type="hidden" name="field_id" value="{}">
    <input type="hidden" name="field_value" value="{}">
    <button type="submit" class="btn btn-secondary">{}</button>
</form>"#,
        html_escape(update_action),
        field_id,
        html_escape(&action.value),
        action.label
    )
}

fn partitions(view: &StatusView) -> String {
    let actions_header = if view.show_partition_actions {
        "<th>Actions</th>"
    } else {
        ""
    };
    let rows: Vec<String> = view
        .partitions
        .iter()
        .map(|row| partition_row(row, view.show_partition_actions))
        .collect();

    format!(
        r#"<h2>Partitions</h2>
<table class="table">
    <thead>
        <tr>
            <th>Name</th>
            <th>State</th>
            <th>Cursor</th>
            <th>Range</th>
            <th>Progress</th>
            <th>Progress (%)</th>
            <th>Rate</th>
            <th>ETA</th>
            {}
        </tr>
    </thead>
    <tbody>
        {}
    </tbody>
</table>"#,
        actions_header,
        rows.join("\n")
    )
}

fn partition_row(row: &PartitionRow, show_actions: bool) -> String {
    let bar_class = if row.progress_bar.precomputing {
        "progress-bar precomputing"
    } else {
        "progress-bar"
    };
    let actions = match (&row.edit_cursor_href, show_actions) {
        (Some(href), true) => format!(
            r#"<td><a href="{}" class="btn btn-secondary">Edit Cursor</a></td>"#,
            html_escape(href)
        ),
        (None, true) => "<td></td>".to_string(),
        (_, false) => String::new(),
    };

    format!(
        r#"<tr>
    <td>{name}</td>
    <td>{state}</td>
    <td>{cursor}</td>
    <td>{range}</td>
    <td>{progress}</td>
    <td><div class="progress"><div class="{bar_class}" style="width: {percent:.1}%"></div></div></td>
    <td>{rate}</td>
    <td>{eta}</td>
    {actions}
</tr>"#,
        name = html_escape(&row.name),
        state = html_escape(&row.state),
        cursor = html_escape(&row.cursor),
        range = html_escape(&row.range),
        progress = html_escape(&row.progress),
        bar_class = bar_class,
        percent = row.progress_bar.percent,
        rate = html_escape(&row.rate),
        eta = html_escape(&row.eta),
        actions = actions,
    )
}

fn events(events: &[EventRow], pagination: &Pagination) -> String {
    let rows: Vec<String> = events
        .iter()
        .map(|event| {
            format!(
                r#"<tr>
    <td>{}</td>
    <td>{}</td>
    <td>{}</td>
    <td>{}</td>
    <td>{}</td>
</tr>"#,
                html_escape(&event.time),
                html_escape(&event.user),
                html_escape(&event.partition),
                html_escape(&event.message),
                html_escape(&event.extra_data)
            )
        })
        .collect();

    let body = if rows.is_empty() {
        r#"<tr><td colspan="5" class="empty">No events</td></tr>"#.to_string()
    } else {
        rows.join("\n")
    };

    format!(
        r#"<h2>Events</h2>
<table class="table">
    <thead>
        <tr>
            <th>Time</th>
            <th>User</th>
            <th>Partition</th>
            <th>Event</th>
            <th>More Data</th>
        </tr>
    </thead>
    <tbody>
        {}
    </tbody>
</table>
{}"#,
        body,
        pagination_links(pagination)
    )
}

fn pagination_links(pagination: &Pagination) -> String {
    if pagination.is_empty() {
        return String::new();
    }

    let link = |href: &Option<String>, label: &str| match href {
        Some(href) => format!(
            r#"<a href="{}" class="btn btn-secondary">{}</a>"#,
            html_escape(href),
            label
        ),
        None => String::new(),
    };

    format!(
        r#"<nav class="pagination">{}{}</nav>"#,
        link(&pagination.previous_href, "Previous"),
        link(&pagination.next_href, "Next")
    )
}
