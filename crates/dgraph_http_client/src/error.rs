//! Error types for the transaction handle.

use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Result type for transaction operations.
pub type TxnResult<T> = Result<T, TxnError>;

/// The public operation that raised an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// `Txn::query`.
    Query,
    /// `Txn::mutate`.
    Mutate,
    /// `Txn::commit`.
    Commit,
}

impl Operation {
    /// Returns the operation name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Query => "query",
            Operation::Mutate => "mutate",
            Operation::Commit => "commit",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Diagnostic data attached to state errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorData {
    /// Operation that was rejected.
    pub operation: Operation,
    /// The operation's input (query text or mutation triples), if any.
    pub input: Option<String>,
}

impl ErrorData {
    pub(crate) fn new(operation: Operation, input: Option<&str>) -> Self {
        Self {
            operation,
            input: input.map(str::to_owned),
        }
    }
}

impl fmt::Display for ErrorData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "operation={}", self.operation)
    }
}

/// Machine-readable error identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// No API key configured.
    MissingApiKey,
    /// No endpoint configured.
    MissingEndpoint,
    /// Transaction was aborted.
    AlreadyAborted,
    /// Transaction was committed.
    AlreadyCommitted,
    /// Transaction was closed by a final query.
    AlreadyClosed,
    /// Mutation had neither set nor delete.
    EmptyMutation,
    /// Mutation had both set and delete.
    ConflictingMutation,
    /// Mutation on a read-only transaction.
    ReadOnlyViolation,
    /// Server reported a different start timestamp.
    StartTsMismatch,
    /// Server answered with a non-2xx status.
    Http,
    /// No response could be obtained.
    Transport,
    /// Response body was not valid JSON.
    Decode,
    /// Request body could not be encoded.
    Encode,
}

impl ErrorKind {
    /// Returns the stable identifier string.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::MissingApiKey => "missing_api_key",
            ErrorKind::MissingEndpoint => "missing_endpoint",
            ErrorKind::AlreadyAborted => "already_aborted",
            ErrorKind::AlreadyCommitted => "already_committed",
            ErrorKind::AlreadyClosed => "already_closed",
            ErrorKind::EmptyMutation => "empty_mutation",
            ErrorKind::ConflictingMutation => "conflicting_mutation",
            ErrorKind::ReadOnlyViolation => "read_only_violation",
            ErrorKind::StartTsMismatch => "start_ts_mismatch",
            ErrorKind::Http => "http",
            ErrorKind::Transport => "transport",
            ErrorKind::Decode => "decode",
            ErrorKind::Encode => "encode",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur while driving a transaction.
#[derive(Error, Debug)]
pub enum TxnError {
    /// The configuration has an empty API key.
    #[error("api key is required")]
    MissingApiKey,

    /// The configuration has an empty endpoint.
    #[error("endpoint is required")]
    MissingEndpoint,

    /// The transaction has been aborted.
    #[error("transaction has already been aborted ({data})")]
    AlreadyAborted {
        /// Rejected operation.
        data: ErrorData,
    },

    /// The transaction has been committed.
    #[error("transaction has already been committed ({data})")]
    AlreadyCommitted {
        /// Rejected operation.
        data: ErrorData,
    },

    /// The transaction was closed by a final query.
    #[error("transaction has already been closed ({data})")]
    AlreadyClosed {
        /// Rejected operation.
        data: ErrorData,
    },

    /// Neither set nor delete triples were given.
    #[error("mutation has neither set nor delete triples")]
    EmptyMutation,

    /// Both set and delete triples were given.
    #[error("mutation cannot carry both set and delete triples")]
    ConflictingMutation,

    /// Mutation attempted on a read-only transaction.
    #[error("read-only transaction cannot be mutated")]
    ReadOnlyViolation,

    /// The server reported a start timestamp that differs from the handle's.
    #[error("start_ts mismatch: handle={handle}, response={response}")]
    StartTsMismatch {
        /// Start timestamp held by the handle.
        handle: u64,
        /// Start timestamp reported by the server.
        response: u64,
    },

    /// The server answered with a status outside `[200, 300)`.
    #[error("request failed with status {status}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Raw response body, lossily decoded as UTF-8.
        body: String,
    },

    /// The client could not obtain a response.
    #[error("transport error: {0}")]
    Transport(String),

    /// A 2xx response body was not valid JSON.
    #[error("failed to decode response: {0}")]
    Decode(#[source] serde_json::Error),

    /// A request body could not be encoded.
    #[error("failed to encode request: {0}")]
    Encode(#[source] serde_json::Error),
}

impl TxnError {
    /// Returns the machine-readable kind.
    pub fn kind(&self) -> ErrorKind {
        match self {
            TxnError::MissingApiKey => ErrorKind::MissingApiKey,
            TxnError::MissingEndpoint => ErrorKind::MissingEndpoint,
            TxnError::AlreadyAborted { .. } => ErrorKind::AlreadyAborted,
            TxnError::AlreadyCommitted { .. } => ErrorKind::AlreadyCommitted,
            TxnError::AlreadyClosed { .. } => ErrorKind::AlreadyClosed,
            TxnError::EmptyMutation => ErrorKind::EmptyMutation,
            TxnError::ConflictingMutation => ErrorKind::ConflictingMutation,
            TxnError::ReadOnlyViolation => ErrorKind::ReadOnlyViolation,
            TxnError::StartTsMismatch { .. } => ErrorKind::StartTsMismatch,
            TxnError::Http { .. } => ErrorKind::Http,
            TxnError::Transport(_) => ErrorKind::Transport,
            TxnError::Decode(_) => ErrorKind::Decode,
            TxnError::Encode(_) => ErrorKind::Encode,
        }
    }

    /// Returns the diagnostic data of a state error.
    pub fn data(&self) -> Option<&ErrorData> {
        match self {
            TxnError::AlreadyAborted { data }
            | TxnError::AlreadyCommitted { data }
            | TxnError::AlreadyClosed { data } => Some(data),
            _ => None,
        }
    }

    /// Returns the HTTP status of a rejected request.
    pub fn status(&self) -> Option<u16> {
        match self {
            TxnError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Parses the body of a rejected request as JSON.
    ///
    /// Returns `None` for other errors or when the body is not JSON.
    pub fn json(&self) -> Option<Value> {
        match self {
            TxnError::Http { body, .. } => serde_json::from_str(body).ok(),
            _ => None,
        }
    }

    /// Returns true if the server or transport rejected the request.
    /// Only these errors trigger an implicit abort.
    pub fn is_remote(&self) -> bool {
        matches!(self, TxnError::Http { .. } | TxnError::Transport(_))
    }
}
