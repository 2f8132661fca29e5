//! Typed parsing of the create/clone form.
//!
//! The browser submits the form as query parameters. Parsing turns those
//! loose string pairs into a [`CreateForm`], reporting field-level errors only
//! for the fields the backend cannot do without. Everything else is lenient:
//! blank or unparseable optional values are treated as not provided.

mod range;

pub use range::{range_from_partition, RangeSelection, ResolvedRange};

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::backfill::{BackfillBackend, ByteString, CreateBackfillRequest, CUSTOM_PARAMETER_PREFIX};
use crate::error::Result;

/// Fields recognized by the create/clone handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CreateField {
    Service,
    Variant,
    BackfillName,
    DryRun,
    RangeOption,
    BackfillIdToClone,
    RangeStart,
    RangeEnd,
    BatchSize,
    ScanSize,
    ThreadsPerPartition,
    ExtraSleepMs,
    BackoffSchedule,
}

impl CreateField {
    /// Form field name.
    pub fn field_id(&self) -> &'static str {
        match self {
            Self::Service => "service",
            Self::Variant => "variant",
            Self::BackfillName => "backfill_name",
            Self::DryRun => "dry_run",
            Self::RangeOption => "range_option",
            Self::BackfillIdToClone => "backfill_id_to_clone",
            Self::RangeStart => "range_start",
            Self::RangeEnd => "range_end",
            Self::BatchSize => "batch_size",
            Self::ScanSize => "scan_size",
            Self::ThreadsPerPartition => "threads_per_partition",
            Self::ExtraSleepMs => "extra_sleep_ms",
            Self::BackoffSchedule => "backoff_schedule",
        }
    }
}

impl fmt::Display for CreateField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field_id())
    }
}

/// How the range of a cloned backfill is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeOption {
    /// Pick up where the source run's cursor stopped.
    Continue,
    /// Rerun the source run's whole range.
    Restart,
    /// Use the range typed into the form.
    New,
}

impl RangeOption {
    pub fn value(&self) -> &'static str {
        match self {
            Self::Continue => "continue",
            Self::Restart => "restart",
            Self::New => "new",
        }
    }

    /// Unknown values select [`RangeOption::New`].
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value.eq_ignore_ascii_case(Self::Continue.value()) {
            Self::Continue
        } else if value.eq_ignore_ascii_case(Self::Restart.value()) {
            Self::Restart
        } else {
            Self::New
        }
    }
}

/// A problem with one form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: CreateField,
    pub message: String,
}

/// Every field-level problem found while parsing a form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors(Vec<FieldError>);

impl FormErrors {
    pub fn push(&mut self, field: CreateField, message: impl Into<String>) {
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    pub fn has(&self, field: CreateField) -> bool {
        self.0.iter().any(|e| e.field == field)
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", error.field, error.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for FormErrors {}

/// A parsed create/clone form.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateForm {
    pub service: String,
    pub variant: String,
    pub backfill_name: Option<String>,
    pub dry_run: bool,
    pub range: RangeSelection,
    pub batch_size: Option<i64>,
    pub scan_size: Option<i64>,
    pub num_threads: Option<i32>,
    pub extra_sleep_ms: Option<i64>,
    pub backoff_schedule: Option<String>,
    /// Keys have the custom parameter prefix already stripped.
    pub custom_parameters: BTreeMap<String, String>,
}

/// A request ready to hand to the creation service.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateSubmission {
    pub service: String,
    pub variant: String,
    pub request: CreateBackfillRequest,
}

impl CreateForm {
    /// Parse raw form pairs. The first occurrence of a repeated field wins.
    pub fn parse<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> std::result::Result<Self, FormErrors>
    where
        K: Into<String>,
        V: Into<String>,
    {
        let mut fields: HashMap<String, String> = HashMap::new();
        for (key, value) in pairs {
            fields.entry(key.into()).or_insert_with(|| value.into());
        }

        let get = |field: CreateField| fields.get(field.field_id()).map(String::as_str);
        let non_blank = |field: CreateField| {
            get(field)
                .filter(|v| !v.trim().is_empty())
                .map(str::to_string)
        };

        let mut errors = FormErrors::default();
        let service = non_blank(CreateField::Service);
        if service.is_none() {
            errors.push(CreateField::Service, "is required");
        }
        let variant = non_blank(CreateField::Variant);
        if variant.is_none() {
            errors.push(CreateField::Variant, "is required");
        }

        let (service, variant) = match (service, variant) {
            (Some(service), Some(variant)) => (service, variant),
            _ => return Err(errors),
        };

        // Unchecked checkboxes send nothing.
        let dry_run = !matches!(get(CreateField::DryRun), None | Some("off"));

        let range = match get(CreateField::RangeOption).map(RangeOption::parse) {
            Some(option @ (RangeOption::Continue | RangeOption::Restart)) => {
                match get(CreateField::BackfillIdToClone).and_then(|id| id.trim().parse::<i64>().ok()) {
                    Some(source_id) if option == RangeOption::Continue => {
                        RangeSelection::Continue { source_id }
                    }
                    Some(source_id) => RangeSelection::Restart { source_id },
                    None => RangeSelection::Unset,
                }
            }
            _ => RangeSelection::Explicit {
                start: non_blank(CreateField::RangeStart),
                end: non_blank(CreateField::RangeEnd),
            },
        };

        let custom_parameters = fields
            .iter()
            .filter(|(_, value)| !value.trim().is_empty())
            .filter_map(|(key, value)| {
                key.strip_prefix(CUSTOM_PARAMETER_PREFIX)
                    .map(|name| (name.to_string(), value.clone()))
            })
            .collect();

        Ok(Self {
            service,
            variant,
            backfill_name: non_blank(CreateField::BackfillName),
            dry_run,
            range,
            batch_size: parse_lenient(non_blank(CreateField::BatchSize)),
            scan_size: parse_lenient(non_blank(CreateField::ScanSize)),
            num_threads: parse_lenient(non_blank(CreateField::ThreadsPerPartition)),
            extra_sleep_ms: parse_lenient(non_blank(CreateField::ExtraSleepMs)),
            backoff_schedule: non_blank(CreateField::BackoffSchedule),
            custom_parameters,
        })
    }

    /// Build the creation request, with an already resolved range.
    pub fn to_request(&self, range: ResolvedRange) -> CreateBackfillRequest {
        CreateBackfillRequest {
            backfill_name: self.backfill_name.clone(),
            dry_run: self.dry_run,
            pkey_range_start: range.start,
            pkey_range_end: range.end,
            batch_size: self.batch_size,
            scan_size: self.scan_size,
            num_threads: self.num_threads,
            extra_sleep_ms: self.extra_sleep_ms,
            backoff_schedule: self.backoff_schedule.clone(),
            parameter_map: self
                .custom_parameters
                .iter()
                .map(|(k, v)| (k.clone(), ByteString::from(v.as_str())))
                .collect(),
        }
    }

    /// Resolve the range against `backend` and build the submission.
    pub async fn into_submission(self, backend: &dyn BackfillBackend) -> Result<CreateSubmission> {
        let range = self.range.resolve(backend).await?;
        let request = self.to_request(range);
        Ok(CreateSubmission {
            service: self.service,
            variant: self.variant,
            request,
        })
    }
}

fn parse_lenient<T: std::str::FromStr>(value: Option<String>) -> Option<T> {
    value.and_then(|v| v.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn base() -> Vec<(String, String)> {
        pairs(&[("service", "franklin"), ("variant", "default")])
    }

    fn with(extra: &[(&str, &str)]) -> Vec<(String, String)> {
        let mut all = base();
        all.extend(pairs(extra));
        all
    }

    #[test]
    fn test_service_and_variant_required() {
        let errors = CreateForm::parse(pairs(&[("variant", " ")])).unwrap_err();
        assert!(errors.has(CreateField::Service));
        assert!(errors.has(CreateField::Variant));
        assert_eq!(errors.errors().len(), 2);
        assert_eq!(
            errors.to_string(),
            "service: is required; variant: is required"
        );
    }

    #[test]
    fn test_dry_run_checkbox_semantics() {
        assert!(!CreateForm::parse(base()).unwrap().dry_run);
        assert!(!CreateForm::parse(with(&[("dry_run", "off")])).unwrap().dry_run);
        assert!(CreateForm::parse(with(&[("dry_run", "on")])).unwrap().dry_run);
        assert!(CreateForm::parse(with(&[("dry_run", "")])).unwrap().dry_run);
    }

    #[test]
    fn test_numeric_fields_are_lenient() {
        let form = CreateForm::parse(with(&[
            ("batch_size", "100"),
            ("scan_size", "abc"),
            ("threads_per_partition", " 4 "),
            ("extra_sleep_ms", ""),
        ]))
        .unwrap();

        assert_eq!(form.batch_size, Some(100));
        assert_eq!(form.scan_size, None);
        assert_eq!(form.num_threads, Some(4));
        assert_eq!(form.extra_sleep_ms, None);
    }

    #[test]
    fn test_blank_text_fields_are_unset() {
        let form = CreateForm::parse(with(&[("backfill_name", "  "), ("backoff_schedule", "")])).unwrap();
        assert_eq!(form.backfill_name, None);
        assert_eq!(form.backoff_schedule, None);
    }

    #[test]
    fn test_custom_parameters_strip_prefix_and_skip_blank() {
        let form = CreateForm::parse(with(&[
            ("custom_parameter_region", "us-west"),
            ("custom_parameter_empty", " "),
            ("other", "ignored"),
        ]))
        .unwrap();

        assert_eq!(form.custom_parameters.len(), 1);
        assert_eq!(form.custom_parameters["region"], "us-west");

        let request = form.to_request(ResolvedRange::default());
        assert_eq!(request.parameter_map["region"], ByteString::from("us-west"));
    }

    #[test]
    fn test_literal_range_used_without_range_option() {
        let form = CreateForm::parse(with(&[("range_start", "A"), ("range_end", "Z")])).unwrap();
        assert_eq!(
            form.range,
            RangeSelection::Explicit {
                start: Some("A".to_string()),
                end: Some("Z".to_string()),
            }
        );
    }

    #[test]
    fn test_range_option_selects_clone_source() {
        let form = CreateForm::parse(with(&[
            ("range_option", "continue"),
            ("backfill_id_to_clone", "12"),
            ("range_start", "ignored"),
        ]))
        .unwrap();
        assert_eq!(form.range, RangeSelection::Continue { source_id: 12 });

        let form = CreateForm::parse(with(&[
            ("range_option", "RESTART"),
            ("backfill_id_to_clone", "12"),
        ]))
        .unwrap();
        assert_eq!(form.range, RangeSelection::Restart { source_id: 12 });
    }

    #[test]
    fn test_unparseable_clone_id_leaves_range_unset() {
        let form = CreateForm::parse(with(&[
            ("range_option", "continue"),
            ("backfill_id_to_clone", "twelve"),
            ("range_start", "A"),
        ]))
        .unwrap();
        assert_eq!(form.range, RangeSelection::Unset);

        let form = CreateForm::parse(with(&[("range_option", "restart")])).unwrap();
        assert_eq!(form.range, RangeSelection::Unset);
    }

    #[test]
    fn test_unknown_range_option_uses_literal_range() {
        let form = CreateForm::parse(with(&[("range_option", "new"), ("range_end", "Z")])).unwrap();
        assert_eq!(
            form.range,
            RangeSelection::Explicit {
                start: None,
                end: Some("Z".to_string()),
            }
        );
    }

    #[test]
    fn test_first_occurrence_wins() {
        let form = CreateForm::parse(with(&[("batch_size", "5"), ("batch_size", "9")])).unwrap();
        assert_eq!(form.batch_size, Some(5));
    }
}
