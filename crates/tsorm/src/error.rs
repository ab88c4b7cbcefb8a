//! Error types for tsorm

use thiserror::Error;

/// Result type alias for tsorm operations
pub type OrmResult<T> = Result<T, OrmError>;

/// Boxed error produced by an engine or driver.
pub type EngineError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Error types for statement construction and execution
#[derive(Debug, Error)]
pub enum OrmError {
    /// Malformed statement detected before reaching the engine
    /// (empty group, empty IN list, no columns, unsupported dialect feature).
    #[error("SQL syntax error: {0}")]
    Syntax(String),

    /// Bind index outside of a remapped statement's index range
    #[error("Bind index {index} out of bounds (valid range is 1..={size})")]
    IndexOutOfBounds { index: usize, size: usize },

    /// Failure reported by the engine or driver, passed through unchanged
    #[error("Execution error: {0}")]
    Execution(#[source] EngineError),

    /// A statement hook refused the statement
    #[error("Statement aborted by hook: {0}")]
    Aborted(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl OrmError {
    /// Create a syntax error
    pub fn syntax(message: impl Into<String>) -> Self {
        Self::Syntax(message.into())
    }

    /// Wrap an engine error
    pub fn execution(err: impl Into<EngineError>) -> Self {
        Self::Execution(err.into())
    }

    /// Check if this is a syntax error
    pub fn is_syntax(&self) -> bool {
        matches!(self, Self::Syntax(_))
    }

    /// Check if this is an engine error
    pub fn is_execution(&self) -> bool {
        matches!(self, Self::Execution(_))
    }

    /// Check if this is a bind index error
    pub fn is_out_of_bounds(&self) -> bool {
        matches!(self, Self::IndexOutOfBounds { .. })
    }
}

impl From<serde_json::Error> for OrmError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
