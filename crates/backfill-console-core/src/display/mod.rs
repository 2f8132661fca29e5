//! Pure data shaping for the status page.
//!
//! Everything here turns a [`BackfillStatus`] snapshot into plain display
//! values. No markup is produced; the runtime renders these views.

mod configuration;
mod duration;
mod partition;

pub use configuration::{
    cancel_button, configuration_rows, delete_button, split_columns, state_button,
    ConfigurationRow, RowButton, StateAction, UpdateField, CANCEL_STATE_BUTTON_LABEL,
    DELETE_STATE_BUTTON_LABEL, PAUSE_STATE_BUTTON_LABEL, SOFT_DELETE_VALUE,
    START_STATE_BUTTON_LABEL, UPDATE_BUTTON_LABEL, VIEW_LOGS_BUTTON_LABEL,
};
pub use duration::format_duration;
pub use partition::{eta_display, rate_display, PartitionRow, ProgressBar};

use crate::backfill::{paths, BackfillState, BackfillStatus, EventLog, LogsLink, DEFAULT_VARIANT};

/// Service label: the service name, with the variant in parentheses unless
/// it is the default one.
pub fn service_label(service_name: &str, variant: &str) -> String {
    if variant == DEFAULT_VARIANT {
        service_name.to_string()
    } else {
        format!("{} ({})", service_name, variant)
    }
}

/// One row of the events table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRow {
    pub time: String,
    pub user: String,
    pub partition: String,
    pub message: String,
    pub extra_data: String,
}

impl From<&EventLog> for EventRow {
    fn from(log: &EventLog) -> Self {
        Self {
            time: log.occurred_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            user: log.user.clone().unwrap_or_default(),
            partition: log.partition_name.clone().unwrap_or_default(),
            message: log.message.clone(),
            extra_data: log.extra_data.clone().unwrap_or_default(),
        }
    }
}

/// Previous/next links for the event log.
///
/// Only one step of history is kept: the page reached through "Next"
/// remembers the offset it came from as `lastOffset`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pagination {
    pub previous_href: Option<String>,
    pub next_href: Option<String>,
}

impl Pagination {
    pub fn new(
        base_path: &str,
        next_offset: Option<&str>,
        offset: Option<&str>,
        last_offset: Option<&str>,
    ) -> Self {
        let next_href = present(next_offset).map(|next| match present(offset) {
            Some(current) => format!(
                "{}?offset={}&lastOffset={}",
                base_path,
                urlencoding::encode(next),
                urlencoding::encode(current)
            ),
            None => format!("{}?offset={}", base_path, urlencoding::encode(next)),
        });

        let previous_href = present(offset).map(|_| match present(last_offset) {
            Some(last) => format!("{}?offset={}", base_path, urlencoding::encode(last)),
            None => base_path.to_string(),
        });

        Self {
            previous_href,
            next_href,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.previous_href.is_none() && self.next_href.is_none()
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

/// Everything the status page shows, ready for rendering.
#[derive(Debug, Clone)]
pub struct StatusView {
    pub id: i64,
    pub service_name: String,
    pub label: String,
    pub name: String,
    pub state: BackfillState,
    pub service_href: String,
    pub clone_href: String,
    pub update_action: String,
    pub configuration: Vec<ConfigurationRow>,
    pub partitions: Vec<PartitionRow>,
    /// The Actions column exists only while the run is paused.
    pub show_partition_actions: bool,
    pub events: Vec<EventRow>,
    pub pagination: Pagination,
}

impl StatusView {
    pub fn new(
        status: &BackfillStatus,
        logs: &dyn LogsLink,
        offset: Option<&str>,
        last_offset: Option<&str>,
    ) -> Self {
        let id = status.id;
        Self {
            id,
            service_name: status.service_name.clone(),
            label: service_label(&status.service_name, &status.variant),
            name: status.name.clone(),
            state: status.state,
            service_href: paths::service(&status.service_name, &status.variant),
            clone_href: paths::clone_from(&status.service_name, &status.variant, id),
            update_action: paths::update(id),
            configuration: configuration_rows(status, logs),
            partitions: status
                .partitions
                .iter()
                .map(|p| PartitionRow::from_partition(id, status.state, p))
                .collect(),
            show_partition_actions: status.state == BackfillState::Paused,
            events: status.event_logs.iter().map(EventRow::from).collect(),
            pagination: Pagination::new(
                &paths::show(id),
                status.next_offset.as_deref(),
                offset,
                last_offset,
            ),
        }
    }

    /// Configuration rows split into the left and right columns.
    pub fn configuration_columns(&self) -> (&[ConfigurationRow], &[ConfigurationRow]) {
        split_columns(&self.configuration)
    }
}
