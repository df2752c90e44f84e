//! # Dgraph HTTP Client
//!
//! A client-side transaction handle for the Dgraph HTTP API.
//!
//! This crate provides:
//! - `Txn`, the handle for one distributed transaction
//! - Transaction state machine (active → closed | committed | aborted)
//! - Reconciliation of server-reported transaction metadata
//! - Auto-abort when the server rejects a request
//! - HTTP client abstraction with a mock and an optional reqwest backend
//!
//! ## Lifecycle
//!
//! A handle is built from a `TxnConfig` and an `HttpClient`. The caller
//! issues any number of `query`/`mutate` calls, each performing exactly one
//! request, then finalizes with `commit` or `abort`.
//!
//! ## Key Invariants
//!
//! - The start timestamp is adopted once and never changes afterwards
//! - Terminal states are mutually exclusive and permanent
//! - Validation failures never touch state or the network
//! - A non-2xx response always triggers an abort before the error surfaces

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
#[cfg(feature = "reqwest")]
mod http;
mod transport;
mod txn;

pub use config::TxnConfig;
pub use error::{ErrorData, ErrorKind, Operation, TxnError, TxnResult};
#[cfg(feature = "reqwest")]
pub use http::ReqwestClient;
pub use transport::{HttpClient, HttpRequest, HttpResponse, MockHttpClient, AUTH_HEADER};
pub use txn::{MutateRequest, Txn, TxnState};

pub use dgraph_http_protocol::{CommitPayload, Response, TxnContext};
