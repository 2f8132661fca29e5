use chrono::{DateTime, Utc};

use crate::backfill::{BackfillState, BackfillStatus, LogsLink, CUSTOM_PARAMETER_PREFIX};

pub const START_STATE_BUTTON_LABEL: &str = "Start";
pub const PAUSE_STATE_BUTTON_LABEL: &str = "Pause";
pub const CANCEL_STATE_BUTTON_LABEL: &str = "Cancel";
pub const DELETE_STATE_BUTTON_LABEL: &str = "Delete";
pub const UPDATE_BUTTON_LABEL: &str = "Update";
pub const VIEW_LOGS_BUTTON_LABEL: &str = "View Logs";

/// Value submitted to the update action to soft-delete a run.
pub const SOFT_DELETE_VALUE: &str = "soft_delete";

/// Configuration fields the update action accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateField {
    State,
    NumThreads,
    ScanSize,
    BatchSize,
    ExtraSleepMs,
    BackoffSchedule,
}

impl UpdateField {
    pub fn field_id(&self) -> &'static str {
        match self {
            Self::State => "state",
            Self::NumThreads => "num_threads",
            Self::ScanSize => "scan_size",
            Self::BatchSize => "batch_size",
            Self::ExtraSleepMs => "extra_sleep_ms",
            Self::BackoffSchedule => "backoff_schedule",
        }
    }
}

/// Button that submits a fixed value for the row's field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateAction {
    pub label: &'static str,
    pub value: String,
}

/// Primary control shown next to a row's value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowButton {
    /// Reveals an inline form to edit the value.
    Update,
    /// External link opened in a new tab.
    ViewLogs { href: String },
    /// Lifecycle transition.
    Transition(StateAction),
}

/// One label/value row of the configuration panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigurationRow {
    pub label: String,
    pub description: String,
    pub field: Option<UpdateField>,
    pub button: Option<RowButton>,
    pub cancel_button: Option<StateAction>,
    pub delete_button: Option<StateAction>,
}

impl ConfigurationRow {
    fn plain(label: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            description: description.into(),
            field: None,
            button: None,
            cancel_button: None,
            delete_button: None,
        }
    }

    fn editable(label: &str, description: impl Into<String>, field: UpdateField) -> Self {
        Self {
            field: Some(field),
            button: Some(RowButton::Update),
            ..Self::plain(label, description)
        }
    }
}

/// Start for paused runs, Pause for running ones, nothing once terminal.
pub fn state_button(state: BackfillState) -> Option<StateAction> {
    match state {
        BackfillState::Paused => Some(StateAction {
            label: START_STATE_BUTTON_LABEL,
            value: BackfillState::Running.to_string(),
        }),
        BackfillState::Complete | BackfillState::Cancelled => None,
        BackfillState::Running => Some(StateAction {
            label: PAUSE_STATE_BUTTON_LABEL,
            value: BackfillState::Paused.to_string(),
        }),
    }
}

/// Only paused runs can be cancelled.
pub fn cancel_button(state: BackfillState) -> Option<StateAction> {
    (state == BackfillState::Paused).then(|| StateAction {
        label: CANCEL_STATE_BUTTON_LABEL,
        value: BackfillState::Cancelled.to_string(),
    })
}

/// Finished runs can be soft-deleted once.
pub fn delete_button(state: BackfillState, deleted_at: Option<DateTime<Utc>>) -> Option<StateAction> {
    if deleted_at.is_some() || !state.is_terminal() {
        return None;
    }
    Some(StateAction {
        label: DELETE_STATE_BUTTON_LABEL,
        value: SOFT_DELETE_VALUE.to_string(),
    })
}

/// Rows of the configuration panel, in display order.
pub fn configuration_rows(status: &BackfillStatus, logs: &dyn LogsLink) -> Vec<ConfigurationRow> {
    let mut rows = vec![
        ConfigurationRow {
            field: Some(UpdateField::State),
            button: state_button(status.state).map(RowButton::Transition),
            cancel_button: cancel_button(status.state),
            delete_button: delete_button(status.state, status.deleted_at),
            ..ConfigurationRow::plain("State", status.state.to_string())
        },
        ConfigurationRow::plain(
            "Dry Run",
            if status.dry_run { "dry run" } else { "wet run" },
        ),
        ConfigurationRow::editable(
            "Threads per partition",
            status.num_threads.to_string(),
            UpdateField::NumThreads,
        ),
        ConfigurationRow::editable("Scan Size", status.scan_size.to_string(), UpdateField::ScanSize),
        ConfigurationRow::editable(
            "Batch Size",
            status.batch_size.to_string(),
            UpdateField::BatchSize,
        ),
        ConfigurationRow::editable(
            "Sleep between batches (ms)",
            status.extra_sleep_ms.to_string(),
            UpdateField::ExtraSleepMs,
        ),
        ConfigurationRow::editable(
            "Backoff Schedule",
            status.backoff_schedule.clone().unwrap_or_default(),
            UpdateField::BackoffSchedule,
        ),
        ConfigurationRow::plain(
            "Created",
            format!(
                "{} by {}",
                status.created_at.format("%Y-%m-%d %H:%M:%S UTC"),
                status.created_by_user.as_deref().unwrap_or("unknown")
            ),
        ),
        ConfigurationRow {
            button: Some(RowButton::ViewLogs {
                href: logs.url(status.id),
            }),
            ..ConfigurationRow::plain("Logs", "")
        },
    ];

    if let Some(parameters) = status.parameters.as_ref().filter(|p| !p.is_empty()) {
        rows.push(ConfigurationRow::plain("Custom Parameters", ""));
        rows.extend(parameters.iter().map(|(key, value)| {
            ConfigurationRow::plain(
                key.strip_prefix(CUSTOM_PARAMETER_PREFIX).unwrap_or(key.as_str()),
                value.clone(),
            )
        }));
    }

    rows
}

/// Split rows into two columns; the left one takes the odd row.
pub fn split_columns<T>(rows: &[T]) -> (&[T], &[T]) {
    rows.split_at(rows.len() / 2 + rows.len() % 2)
}
