pub mod paths;
mod traits;
mod types;

pub use traits::{BackendFuture, BackfillBackend, LogsLink, TemplateLogsLink};
pub use types::{
    BackfillState, BackfillStatus, ByteString, CreateBackfillRequest, CreateBackfillResponse,
    EventLog, Partition,
};

/// Variant name that is displayed without a suffix.
pub const DEFAULT_VARIANT: &str = "default";

/// Prefix marking a form field or parameter key as a custom parameter.
pub const CUSTOM_PARAMETER_PREFIX: &str = "custom_parameter_";
