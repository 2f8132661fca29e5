use tracing::debug;

use crate::backfill::{BackfillBackend, ByteString, Partition};
use crate::error::Result;

/// Range policy chosen by the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RangeSelection {
    /// Start at the source run's cursor.
    Continue { source_id: i64 },
    /// Rerun the source run's original range.
    Restart { source_id: i64 },
    /// Bounds typed into the form; blank bounds are absent.
    Explicit {
        start: Option<String>,
        end: Option<String>,
    },
    /// A clone was requested without a usable source id.
    Unset,
}

/// Range bounds to put on the creation request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedRange {
    pub start: Option<ByteString>,
    pub end: Option<ByteString>,
}

impl RangeSelection {
    /// Turn the selection into concrete bounds, looking up the source run
    /// for clones.
    ///
    /// A source run that does not exist, or has no partitions, leaves the
    /// range unset. Other backend failures are returned.
    pub async fn resolve(&self, backend: &dyn BackfillBackend) -> Result<ResolvedRange> {
        let (source_id, continue_from_cursor) = match self {
            Self::Continue { source_id } => (*source_id, true),
            Self::Restart { source_id } => (*source_id, false),
            Self::Explicit { start, end } => {
                return Ok(ResolvedRange {
                    start: start.as_deref().map(ByteString::from),
                    end: end.as_deref().map(ByteString::from),
                })
            }
            Self::Unset => return Ok(ResolvedRange::default()),
        };

        let status = match backend.status(source_id, None).await {
            Ok(status) => status,
            Err(e) if e.is_not_found() => {
                debug!(source_id, "Clone source not found, leaving range unset");
                return Ok(ResolvedRange::default());
            }
            Err(e) => return Err(e),
        };

        Ok(status
            .partitions
            .first()
            .map(|partition| range_from_partition(partition, continue_from_cursor))
            .unwrap_or_default())
    }
}

/// Range of a clone derived from the source run's partition.
///
/// With `continue_from_cursor` the start is the partition cursor when one
/// exists; otherwise it is the partition's original start.
pub fn range_from_partition(partition: &Partition, continue_from_cursor: bool) -> ResolvedRange {
    let start = if continue_from_cursor {
        partition.pkey_cursor.as_ref().or(partition.pkey_start.as_ref())
    } else {
        partition.pkey_start.as_ref()
    };

    ResolvedRange {
        start: start.map(|s| ByteString::from(s.as_str())),
        end: partition.pkey_end.as_deref().map(ByteString::from),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backfill::{
        BackendFuture, BackfillState, BackfillStatus, CreateBackfillRequest,
        CreateBackfillResponse,
    };
    use crate::error::ConsoleError;
    use crate::form::CreateForm;

    fn partition(cursor: Option<&str>) -> Partition {
        Partition {
            name: "0".to_string(),
            state: BackfillState::Paused,
            pkey_cursor: cursor.map(str::to_string),
            pkey_start: Some("K0".to_string()),
            pkey_end: Some("K9".to_string()),
            backfilled_matching_record_count: 0,
            computed_matching_record_count: 0,
            matching_records_per_minute: None,
            precomputing_done: false,
        }
    }

    fn status(id: i64, partitions: Vec<Partition>) -> BackfillStatus {
        BackfillStatus {
            id,
            service_name: "franklin".to_string(),
            variant: "default".to_string(),
            name: "ChickenSandwich".to_string(),
            state: BackfillState::Paused,
            dry_run: false,
            num_threads: 1,
            scan_size: 10_000,
            batch_size: 100,
            extra_sleep_ms: 0,
            backoff_schedule: None,
            created_at: chrono::Utc::now(),
            created_by_user: None,
            deleted_at: None,
            parameters: None,
            partitions,
            event_logs: Vec::new(),
            next_offset: None,
        }
    }

    /// Serves one fixed snapshot; any other id is not found.
    struct FixedBackend {
        status: BackfillStatus,
        fail_with_backend_error: bool,
    }

    impl BackfillBackend for FixedBackend {
        fn status<'a>(&'a self, id: i64, _offset: Option<&'a str>) -> BackendFuture<'a, BackfillStatus> {
            Box::pin(async move {
                if self.fail_with_backend_error {
                    return Err(ConsoleError::Backend("unavailable".to_string()));
                }
                if id == self.status.id {
                    Ok(self.status.clone())
                } else {
                    Err(ConsoleError::NotFound(format!("backfill {}", id)))
                }
            })
        }

        fn create<'a>(
            &'a self,
            _service: &'a str,
            _variant: &'a str,
            _request: CreateBackfillRequest,
        ) -> BackendFuture<'a, CreateBackfillResponse> {
            Box::pin(async { Err(ConsoleError::Internal("not used".to_string())) })
        }
    }

    fn backend(partitions: Vec<Partition>) -> FixedBackend {
        FixedBackend {
            status: status(12, partitions),
            fail_with_backend_error: false,
        }
    }

    #[test]
    fn test_range_from_partition_prefers_cursor_when_continuing() {
        let range = range_from_partition(&partition(Some("K5")), true);
        assert_eq!(range.start, Some(ByteString::from("K5")));
        assert_eq!(range.end, Some(ByteString::from("K9")));

        let range = range_from_partition(&partition(None), true);
        assert_eq!(range.start, Some(ByteString::from("K0")));
    }

    #[test]
    fn test_range_from_partition_restart_ignores_cursor() {
        let range = range_from_partition(&partition(Some("K5")), false);
        assert_eq!(range.start, Some(ByteString::from("K0")));
        assert_eq!(range.end, Some(ByteString::from("K9")));
    }

    #[tokio::test]
    async fn test_continue_resolves_from_cursor() {
        let backend = backend(vec![partition(Some("K5"))]);
        let range = RangeSelection::Continue { source_id: 12 }
            .resolve(&backend)
            .await
            .unwrap();
        assert_eq!(range.start, Some(ByteString::from("K5")));
        assert_eq!(range.end, Some(ByteString::from("K9")));
    }

    #[tokio::test]
    async fn test_restart_resolves_from_original_start() {
        let backend = backend(vec![partition(Some("K5"))]);
        let range = RangeSelection::Restart { source_id: 12 }
            .resolve(&backend)
            .await
            .unwrap();
        assert_eq!(range.start, Some(ByteString::from("K0")));
        assert_eq!(range.end, Some(ByteString::from("K9")));
    }

    #[tokio::test]
    async fn test_missing_source_leaves_range_unset() {
        let backend = backend(vec![partition(Some("K5"))]);
        let range = RangeSelection::Continue { source_id: 99 }
            .resolve(&backend)
            .await
            .unwrap();
        assert_eq!(range, ResolvedRange::default());
    }

    #[tokio::test]
    async fn test_source_without_partitions_leaves_range_unset() {
        let backend = backend(Vec::new());
        let range = RangeSelection::Restart { source_id: 12 }
            .resolve(&backend)
            .await
            .unwrap();
        assert_eq!(range, ResolvedRange::default());
    }

    #[tokio::test]
    async fn test_backend_failure_propagates() {
        let backend = FixedBackend {
            status: status(12, vec![partition(None)]),
            fail_with_backend_error: true,
        };
        let err = RangeSelection::Continue { source_id: 12 }
            .resolve(&backend)
            .await
            .unwrap_err();
        assert!(matches!(err, ConsoleError::Backend(_)));
    }

    #[test]
    fn test_unparseable_clone_id_submits_without_range() {
        let backend = backend(vec![partition(Some("K5"))]);
        let form = CreateForm::parse([
            ("service", "franklin"),
            ("variant", "default"),
            ("range_option", "continue"),
            ("backfill_id_to_clone", "abc"),
        ])
        .unwrap();

        let submission = tokio_test::block_on(form.into_submission(&backend)).unwrap();
        assert_eq!(submission.request.pkey_range_start, None);
        assert_eq!(submission.request.pkey_range_end, None);
    }

    #[test]
    fn test_literal_range_submits_verbatim() {
        let backend = backend(Vec::new());
        let form = CreateForm::parse([
            ("service", "franklin"),
            ("variant", "default"),
            ("range_start", "A"),
            ("range_end", "Z"),
        ])
        .unwrap();

        let submission = tokio_test::block_on(form.into_submission(&backend)).unwrap();
        assert_eq!(submission.service, "franklin");
        assert_eq!(submission.request.pkey_range_start, Some(ByteString::from("A")));
        assert_eq!(submission.request.pkey_range_end, Some(ByteString::from("Z")));
    }
}
