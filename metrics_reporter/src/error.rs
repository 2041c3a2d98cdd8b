use crate::types::{MetricKind, Name};

/// Everything that can go wrong while vending a metric.
///
/// None of these are recoverable at runtime: they mean the metrics setup itself is wrong.
/// The [`Reporter`](crate::Reporter) implementations treat them as fatal.
#[derive(Debug, thiserror::Error)]
pub enum ReporterError {
    /// A const label was given twice while merging label sets.
    #[error("label `{0}` already registered")]
    LabelCollision(String),

    /// A path was requested as a different kind than the one cached for it.
    #[error("metric `{path}` is a {existing}, not a {requested}")]
    KindMismatch {
        /// The requested path
        path: Name,
        /// The kind already cached at the path
        existing: MetricKind,
        /// The kind that was requested
        requested: MetricKind,
    },

    /// The metrics client refused to create or register the metric.
    #[error("could not register metric `{path}`: {source}")]
    Client {
        /// The requested path
        path: Name,
        /// The client's error
        #[source]
        source: prometheus::Error,
    },
}
