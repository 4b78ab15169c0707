//! Workspace error types.

use thiserror::Error;

use super::background::OperationKind;
use super::sheet::SheetName;

/// Result type for workspace operations.
pub type WorkspaceResult<T> = Result<T, WorkspaceError>;

/// Errors that can occur during workspace operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkspaceError {
    /// A precondition of the operation is not met.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The project repository or generation service rejected the call.
    #[error("Collaborator failure: {0}")]
    CollaboratorFailure(String),

    /// A draft edit addressed a cell that does not exist.
    #[error("Cell out of range: sheet '{sheet}', row {row}, column {column}")]
    OutOfRange { sheet: SheetName, row: usize, column: usize },

    /// The operation was cancelled by the user before completion.
    #[error("{0} cancelled by user")]
    Cancelled(OperationKind),
}

impl WorkspaceError {
    /// Shorthand for a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Wrap a collaborator error, keeping its full context chain.
    pub fn collaborator(err: &anyhow::Error) -> Self {
        Self::CollaboratorFailure(format!("{:#}", err))
    }

    /// Whether the error left workspace state untouched and may simply be retried.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::CollaboratorFailure(_) | Self::Cancelled(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = WorkspaceError::OutOfRange { sheet: SheetName::TestCases, row: 4, column: 2 };
        assert_eq!(err.to_string(), "Cell out of range: sheet 'Test Cases', row 4, column 2");

        let err = WorkspaceError::Cancelled(OperationKind::PlanGeneration);
        assert_eq!(err.to_string(), "Verification Plan generation cancelled by user");
    }

    #[test]
    fn test_collaborator_keeps_context() {
        let source = anyhow::anyhow!("connection refused").context("generation service");
        let err = WorkspaceError::collaborator(&source);
        assert_eq!(
            err,
            WorkspaceError::CollaboratorFailure("generation service: connection refused".into())
        );
        assert!(err.is_retryable());
        assert!(!WorkspaceError::validation("no project").is_retryable());
    }
}
