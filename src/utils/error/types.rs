//! Error types for the metrics relay

use thiserror::Error;

/// Result type alias for the metrics relay
pub type Result<T> = std::result::Result<T, MetricsError>;

/// Main error type for the metrics relay
#[derive(Error, Debug)]
pub enum MetricsError {
    /// Wire record or request validation errors
    #[error("validation error: {0}")]
    Validation(String),

    /// The value field required by the declared type is absent
    #[error("metric value is missing: {0}")]
    MetricValueMissing(String),

    /// Metric type is neither counter nor gauge
    #[error("unknown metric type: {0}")]
    UnknownMetricType(String),

    /// Read of a metric that was never stored
    #[error("metric not found: {metric_type}/{name}")]
    MetricNotFound { metric_type: String, name: String },

    /// Supplied hash does not match the recomputed one
    #[error("invalid signature for metric {0}")]
    InvalidSignature(String),

    /// Supplied hash is not valid hex
    #[error("signature decode error: {0}")]
    SignatureDecode(#[from] hex::FromHexError),

    /// Signing requested without a configured key
    #[error("signing key is not configured")]
    MissingKey,

    /// Backup record without a type
    #[error("invalid record: metric type is not set")]
    InvalidRecordType,

    /// Backup record without a name
    #[error("invalid record: metric name is not set")]
    InvalidRecordName,

    /// Backup record without a value
    #[error("invalid record: metric value is not set")]
    InvalidRecordValue,

    /// Process statistic name outside the supported table
    #[error("unknown runtime stat name: {0}")]
    UnknownStatName(String),

    /// Generic storage failures
    #[error("storage error: {0}")]
    Storage(String),

    /// Database errors
    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP client errors
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// Collector answered with a non-success status
    #[error("unexpected status code {status}: {body}")]
    UnexpectedStatusCode { status: u16, body: String },

    /// Timeout errors
    #[error("timeout: {0}")]
    Timeout(String),

    /// Operation aborted by a cancellation token
    #[error("operation cancelled")]
    Cancelled,

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// Parsing errors
    #[error("parsing error: {0}")]
    Parsing(String),

    /// Internal errors
    #[error("internal error: {0}")]
    Internal(String),

    /// Operation description wrapped around an inner error
    #[error("{context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<MetricsError>,
    },
}
