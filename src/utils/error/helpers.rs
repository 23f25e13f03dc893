//! Helper functions for creating and inspecting errors

use super::types::{MetricsError, Result};

impl MetricsError {
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation(message.into())
    }

    pub fn value_missing<S: Into<String>>(name: S) -> Self {
        Self::MetricValueMissing(name.into())
    }

    pub fn unknown_type<S: Into<String>>(metric_type: S) -> Self {
        Self::UnknownMetricType(metric_type.into())
    }

    pub fn not_found<T: Into<String>, N: Into<String>>(metric_type: T, name: N) -> Self {
        Self::MetricNotFound {
            metric_type: metric_type.into(),
            name: name.into(),
        }
    }

    pub fn storage<S: Into<String>>(message: S) -> Self {
        Self::Storage(message.into())
    }

    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    pub fn parsing<S: Into<String>>(message: S) -> Self {
        Self::Parsing(message.into())
    }

    pub fn timeout<S: Into<String>>(message: S) -> Self {
        Self::Timeout(message.into())
    }

    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }

    /// Wrap this error with an operation description
    pub fn context<S: Into<String>>(self, context: S) -> Self {
        Self::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Innermost error below any number of context layers
    pub fn root_cause(&self) -> &MetricsError {
        let mut current = self;
        while let Self::Context { source, .. } = current {
            current = source;
        }
        current
    }

    /// Errors caused by a malformed or untrusted client payload
    pub fn is_client_error(&self) -> bool {
        matches!(
            self.root_cause(),
            Self::Validation(_)
                | Self::MetricValueMissing(_)
                | Self::InvalidSignature(_)
                | Self::SignatureDecode(_)
                | Self::Parsing(_)
        )
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self.root_cause(), Self::MetricNotFound { .. })
    }

    pub fn is_unknown_type(&self) -> bool {
        matches!(self.root_cause(), Self::UnknownMetricType(_))
    }
}

/// Adds operation descriptions to fallible results
pub trait ResultExt<T> {
    fn context<S: Into<String>>(self, context: S) -> Result<T>;

    fn with_context<S: Into<String>, F: FnOnce() -> S>(self, f: F) -> Result<T>;
}

impl<T, E: Into<MetricsError>> ResultExt<T> for std::result::Result<T, E> {
    fn context<S: Into<String>>(self, context: S) -> Result<T> {
        self.map_err(|e| e.into().context(context))
    }

    fn with_context<S: Into<String>, F: FnOnce() -> S>(self, f: F) -> Result<T> {
        self.map_err(|e| e.into().context(f()))
    }
}
