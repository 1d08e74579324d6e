//! Error types for Harvest.
//!
//! Defines the main error enum used throughout the application. Each
//! variant corresponds to one phase of a run, so the process exit code
//! can be derived from the error value itself.

use thiserror::Error;

/// Main error type for Harvest operations.
#[derive(Error, Debug)]
pub enum HarvestError {
    /// Missing or invalid run configuration.
    #[error("Parameter error: {0}")]
    Parameter(String),

    /// The remote query boundary reported failure or was never callable.
    #[error("Query execution error: {0}")]
    QueryExecution(String),

    /// Data-source access failed or the result relation is malformed.
    #[error("Extraction error: {0}")]
    Extraction(String),

    /// Output encoding or filesystem failure.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl HarvestError {
    /// Creates a parameter error with the given message.
    pub fn parameter(msg: impl Into<String>) -> Self {
        Self::Parameter(msg.into())
    }

    /// Creates a query execution error with the given message.
    pub fn query_execution(msg: impl Into<String>) -> Self {
        Self::QueryExecution(msg.into())
    }

    /// Creates an extraction error with the given message.
    pub fn extraction(msg: impl Into<String>) -> Self {
        Self::Extraction(msg.into())
    }

    /// Creates a serialization error with the given message.
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Parameter(_) => "Parameter Error",
            Self::QueryExecution(_) => "Query Execution Error",
            Self::Extraction(_) => "Extraction Error",
            Self::Serialization(_) => "Serialization Error",
        }
    }

    /// Returns the process exit code signalling which phase failed.
    ///
    /// 1 = parameter resolution, 2 = remote query execution,
    /// 3 = extraction or output processing.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Parameter(_) => 1,
            Self::QueryExecution(_) => 2,
            Self::Extraction(_) | Self::Serialization(_) => 3,
        }
    }
}

/// Result type alias using HarvestError.
pub type Result<T> = std::result::Result<T, HarvestError>;
