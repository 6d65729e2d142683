//! Transpiler errors
//!
//! Two classes only: invalid argument (every filter and page-size rejection,
//! permanent, never retried) and store failures propagated unmodified.

use thiserror::Error;

use crate::filtering::FilterError;
use crate::observability::Diagnostic;
use crate::store::StoreError;

/// Result type for transpilation
pub type TranspileResult<T> = Result<T, TranspileError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TranspileError {
    /// Filter, page size or expression shape rejected
    #[error("{message}")]
    InvalidArgument {
        message: String,
        /// Context for operators, emitted by the caller
        diagnostic: Option<Diagnostic>,
    },

    /// Query execution failed
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl TranspileError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        TranspileError::InvalidArgument {
            message: message.into(),
            diagnostic: None,
        }
    }

    /// Attaches a diagnostic to an invalid-argument error
    pub fn with_diagnostic(self, diagnostic: Diagnostic) -> Self {
        match self {
            TranspileError::InvalidArgument { message, .. } => TranspileError::InvalidArgument {
                message,
                diagnostic: Some(diagnostic),
            },
            other => other,
        }
    }

    pub fn diagnostic(&self) -> Option<&Diagnostic> {
        match self {
            TranspileError::InvalidArgument { diagnostic, .. } => diagnostic.as_ref(),
            TranspileError::Store(_) => None,
        }
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, TranspileError::InvalidArgument { .. })
    }

    pub fn code(&self) -> &'static str {
        match self {
            TranspileError::InvalidArgument { .. } => "INVALID_ARGUMENT",
            TranspileError::Store(e) => e.code(),
        }
    }
}

impl From<FilterError> for TranspileError {
    fn from(e: FilterError) -> Self {
        TranspileError::invalid_argument(format!("invalid filter: {}", e))
    }
}
