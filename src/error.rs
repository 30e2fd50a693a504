//! Error types for series resolution

use thiserror::Error;

/// Main error type for series resolution
#[derive(Error, Debug)]
pub enum Error {
    /// Index error
    #[error("Index error: {0}")]
    Index(#[from] IndexError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Index errors
///
/// Failures surfaced by an index gateway or by the predicate evaluator.
/// Any of these is fatal to the enclosing search: there are no retries
/// and no partial results.
#[derive(Error, Debug)]
pub enum IndexError {
    /// Postings lookup failed (I/O failure, missing segment, backend fault)
    #[error("Lookup failed: {0}")]
    Lookup(String),

    /// Index data is corrupted
    #[error("Index corrupted: {0}")]
    Corrupted(String),

    /// A predicate shape the evaluator or gateway cannot interpret
    #[error("Unsupported predicate: {0}")]
    UnsupportedPredicate(String),

    /// Query execution failed (rejected pattern, invalid argument)
    #[error("Query error: {0}")]
    QueryError(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
