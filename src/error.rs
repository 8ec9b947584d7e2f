use serde_json::Value;

/// Why a [`QueryMock`] could not answer an intercepted operation.
///
/// None of these failures is retried: each of them is terminal for the request that
/// triggered it.
///
/// [`QueryMock`]: crate::QueryMock
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DispatchError {
    /// The request did not carry a named GraphQL operation.
    #[error(
        "Could not find operation name in request. Please make sure you're actually sending the query in your fetch."
    )]
    OperationNameMissing,
    /// No mock is registered for the operation.
    /// `message` lists all the operations that have been mocked instead.
    #[error("{message}")]
    NoMockRegistered {
        operation_name: String,
        message: String,
    },
    /// Mocks are registered for the operation, but none of them accepts its variables.
    #[error(transparent)]
    VariablesMismatch(#[from] VariablesMismatch),
    /// The matching mock was set up to fail with an error status.
    #[error(transparent)]
    ConfiguredStatusFailure(#[from] StatusFailure),
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum VariablesMismatch {
    #[error(
        "Variables do not match for operation \"{operation_name}\" due to custom \"matchOnVariables\" function"
    )]
    CustomPredicateRejected { operation_name: String },
    #[error(
        "Variables do not match for operation \"{operation_name}\".\n\nVariables in request VS mocked variables: \n{diff}"
    )]
    StructuralMismatch { operation_name: String, diff: String },
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StatusFailure {
    /// The error value configured on the mock, surfaced as is.
    #[error("{value}")]
    CustomErrorValue { value: Value, status: u16 },
    #[error(
        "Request for operation \"{operation_name}\" failed with status {status}. This is intentional and set up in the mock."
    )]
    GeneratedMessage { operation_name: String, status: u16 },
}

impl DispatchError {
    /// The error value configured on the mock via [`Mock::with_error`], if this failure
    /// is the one it was set up to return.
    ///
    /// [`Mock::with_error`]: crate::Mock::with_error
    pub fn custom_error_value(&self) -> Option<&Value> {
        match self {
            DispatchError::ConfiguredStatusFailure(StatusFailure::CustomErrorValue {
                value, ..
            }) => Some(value),
            _ => None,
        }
    }

    /// The HTTP status a transport should answer with when surfacing this failure.
    pub fn status_code(&self) -> u16 {
        match self {
            DispatchError::ConfiguredStatusFailure(
                StatusFailure::CustomErrorValue { status, .. }
                | StatusFailure::GeneratedMessage { status, .. },
            ) => *status,
            _ => 500,
        }
    }
}
