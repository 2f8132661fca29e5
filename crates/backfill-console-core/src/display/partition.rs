use crate::backfill::{paths, BackfillState, Partition};

use super::duration::format_duration;

pub const NOT_RUNNING: &str = "-";
pub const COMPUTING: &str = "Computing...";
pub const CALCULATING: &str = "Calculating...";

/// Display values of one partition row.
#[derive(Debug, Clone, PartialEq)]
pub struct PartitionRow {
    pub name: String,
    pub state: String,
    pub cursor: String,
    pub range: String,
    pub progress: String,
    pub progress_bar: ProgressBar,
    pub rate: String,
    pub eta: String,
    /// Present only while the run is paused.
    pub edit_cursor_href: Option<String>,
}

/// Fill level of a progress bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressBar {
    /// 0.0 to 100.0.
    pub percent: f64,
    /// The total is not known yet.
    pub precomputing: bool,
}

impl ProgressBar {
    pub fn new(backfilled: i64, computed: i64, precomputing_done: bool) -> Self {
        let percent = if computed > 0 {
            (backfilled as f64 / computed as f64 * 100.0).clamp(0.0, 100.0)
        } else {
            0.0
        };
        Self {
            percent,
            precomputing: !precomputing_done,
        }
    }
}

impl PartitionRow {
    pub fn from_partition(id: i64, run_state: BackfillState, partition: &Partition) -> Self {
        Self {
            name: partition.name.clone(),
            state: partition.state.to_string(),
            cursor: partition.pkey_cursor.clone().unwrap_or_default(),
            range: format!(
                "{} to {}",
                partition.pkey_start.as_deref().unwrap_or_default(),
                partition.pkey_end.as_deref().unwrap_or_default()
            ),
            progress: format!(
                "{} / {}",
                partition.backfilled_matching_record_count,
                partition.computed_matching_record_count
            ),
            progress_bar: ProgressBar::new(
                partition.backfilled_matching_record_count,
                partition.computed_matching_record_count,
                partition.precomputing_done,
            ),
            rate: rate_display(partition),
            eta: eta_display(partition),
            edit_cursor_href: (run_state == BackfillState::Paused)
                .then(|| paths::edit_cursor(id, &partition.name)),
        }
    }
}

fn positive_rate(partition: &Partition) -> Option<i64> {
    partition.matching_records_per_minute.filter(|rate| *rate > 0)
}

/// Rate cell of a partition.
pub fn rate_display(partition: &Partition) -> String {
    if partition.state != BackfillState::Running {
        return NOT_RUNNING.to_string();
    }
    match positive_rate(partition) {
        Some(rate) => format!("{} #/m", rate),
        None if !partition.precomputing_done => COMPUTING.to_string(),
        None => CALCULATING.to_string(),
    }
}

/// ETA cell of a partition.
pub fn eta_display(partition: &Partition) -> String {
    if partition.state != BackfillState::Running {
        return NOT_RUNNING.to_string();
    }
    if !partition.precomputing_done {
        return COMPUTING.to_string();
    }
    match positive_rate(partition) {
        Some(rate) if partition.computed_matching_record_count > 0 => {
            let remaining = (partition.computed_matching_record_count
                - partition.backfilled_matching_record_count)
                .max(0) as f64;
            let eta_seconds = remaining / (rate as f64 / 60.0);
            format_duration((eta_seconds * 1000.0) as u64)
        }
        _ => CALCULATING.to_string(),
    }
}
