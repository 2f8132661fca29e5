use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::RwLock;

use chrono::Utc;

use backfill_console_core::backfill::{
    BackendFuture, BackfillBackend, BackfillState, BackfillStatus, CreateBackfillRequest,
    CreateBackfillResponse, EventLog, Partition,
};
use backfill_console_core::error::{ConsoleError, Result};

const DEFAULT_EVENT_PAGE_SIZE: usize = 50;
const DEFAULT_NUM_THREADS: i32 = 1;
const DEFAULT_SCAN_SIZE: i64 = 10_000;
const DEFAULT_BATCH_SIZE: i64 = 100;

/// Process-local backend.
///
/// Keeps full snapshots in memory and pages event logs by index. Runs are
/// created paused with a single partition covering the requested range.
pub struct InMemoryBackend {
    runs: RwLock<HashMap<i64, BackfillStatus>>,
    next_id: AtomicI64,
    event_page_size: usize,
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self {
            runs: RwLock::new(HashMap::new()),
            next_id: AtomicI64::new(1),
            event_page_size: DEFAULT_EVENT_PAGE_SIZE,
        }
    }

    /// Set how many event log entries one status call returns.
    pub fn with_event_page_size(mut self, size: usize) -> Self {
        self.event_page_size = size.max(1);
        self
    }

    /// Store a snapshot as-is, replacing any run with the same id.
    pub fn insert(&self, status: BackfillStatus) -> Result<()> {
        let mut runs = self.write()?;
        self.next_id.fetch_max(status.id + 1, Ordering::SeqCst);
        runs.insert(status.id, status);
        Ok(())
    }

    /// Full snapshot of a run, without event log paging.
    pub fn get(&self, id: i64) -> Result<Option<BackfillStatus>> {
        Ok(self.read()?.get(&id).cloned())
    }

    /// Number of stored runs.
    pub fn len(&self) -> usize {
        self.runs.read().map(|runs| runs.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, HashMap<i64, BackfillStatus>>> {
        self.runs
            .read()
            .map_err(|_| ConsoleError::Internal("backfill store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, HashMap<i64, BackfillStatus>>> {
        self.runs
            .write()
            .map_err(|_| ConsoleError::Internal("backfill store lock poisoned".to_string()))
    }

    fn page(&self, mut status: BackfillStatus, offset: Option<&str>) -> Result<BackfillStatus> {
        let start = match offset.filter(|o| !o.is_empty()) {
            Some(o) => o.parse::<usize>().map_err(|_| {
                ConsoleError::InvalidArgument(format!("invalid event log offset: {}", o))
            })?,
            None => 0,
        };

        let total = status.event_logs.len();
        let end = start.saturating_add(self.event_page_size).min(total);
        status.event_logs = if start < total {
            status.event_logs.drain(start..end).collect()
        } else {
            Vec::new()
        };
        status.next_offset = (end < total).then(|| end.to_string());
        Ok(status)
    }

    fn build_run(
        id: i64,
        service: &str,
        variant: &str,
        request: &CreateBackfillRequest,
    ) -> BackfillStatus {
        let now = Utc::now();
        let name = request
            .backfill_name
            .clone()
            .unwrap_or_else(|| format!("backfill-{}", id));

        BackfillStatus {
            id,
            service_name: service.to_string(),
            variant: variant.to_string(),
            name,
            state: BackfillState::Paused,
            dry_run: request.dry_run,
            num_threads: request.num_threads.unwrap_or(DEFAULT_NUM_THREADS),
            scan_size: request.scan_size.unwrap_or(DEFAULT_SCAN_SIZE),
            batch_size: request.batch_size.unwrap_or(DEFAULT_BATCH_SIZE),
            extra_sleep_ms: request.extra_sleep_ms.unwrap_or(0),
            backoff_schedule: request.backoff_schedule.clone(),
            created_at: now,
            created_by_user: None,
            deleted_at: None,
            parameters: (!request.parameter_map.is_empty()).then(|| {
                request
                    .parameter_map
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_utf8_lossy()))
                    .collect()
            }),
            partitions: vec![Partition {
                name: "0".to_string(),
                state: BackfillState::Paused,
                pkey_cursor: None,
                pkey_start: request.pkey_range_start.as_ref().map(|b| b.to_utf8_lossy()),
                pkey_end: request.pkey_range_end.as_ref().map(|b| b.to_utf8_lossy()),
                backfilled_matching_record_count: 0,
                computed_matching_record_count: 0,
                matching_records_per_minute: None,
                precomputing_done: false,
            }],
            event_logs: vec![EventLog {
                occurred_at: now,
                user: None,
                partition_name: None,
                message: "backfill created".to_string(),
                extra_data: None,
            }],
            next_offset: None,
        }
    }
}

impl BackfillBackend for InMemoryBackend {
    fn status<'a>(&'a self, id: i64, offset: Option<&'a str>) -> BackendFuture<'a, BackfillStatus> {
        Box::pin(async move {
            let status = self
                .get(id)?
                .ok_or_else(|| ConsoleError::NotFound(format!("backfill {}", id)))?;
            self.page(status, offset)
        })
    }

    fn create<'a>(
        &'a self,
        service: &'a str,
        variant: &'a str,
        request: CreateBackfillRequest,
    ) -> BackendFuture<'a, CreateBackfillResponse> {
        Box::pin(async move {
            if service.trim().is_empty() || variant.trim().is_empty() {
                return Err(ConsoleError::InvalidArgument(
                    "service and variant are required".to_string(),
                ));
            }
            if let (Some(start), Some(end)) = (&request.pkey_range_start, &request.pkey_range_end) {
                if start > end {
                    return Err(ConsoleError::InvalidArgument(format!(
                        "range start {} is after range end {}",
                        start, end
                    )));
                }
            }

            let id = self.next_id.fetch_add(1, Ordering::SeqCst);
            let run = Self::build_run(id, service, variant, &request);
            self.write()?.insert(id, run);

            tracing::debug!(id, service, variant, "Created backfill run");
            Ok(CreateBackfillResponse {
                backfill_run_id: id,
            })
        })
    }
}
