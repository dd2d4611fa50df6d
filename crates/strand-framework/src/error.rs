//! Error types for the framework layer.

use thiserror::Error;

/// Errors raised while building a filter.
#[derive(Debug, Error)]
pub enum FilterError {
    /// The regular expression given to a pattern filter does not compile.
    #[error("invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        /// The rejected expression.
        pattern: String,
        /// The regex compiler's diagnostic.
        #[source]
        source: regex::Error,
    },
}

/// Result type for filter construction.
pub type FilterResult<T> = Result<T, FilterError>;
