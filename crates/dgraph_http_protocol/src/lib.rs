//! # Dgraph HTTP Protocol
//!
//! Wire types and request builders for the Dgraph HTTP transaction API.
//!
//! This crate provides:
//! - `TxnContext`, the transaction metadata reported by the server
//! - `Response` envelope with its `extensions.txn` block
//! - `QueryParams`, an order-preserving query-string builder
//! - Mutation and commit body encoding
//! - Endpoint paths and content types
//!
//! This is a pure protocol crate with no I/O operations.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod body;
mod context;
mod params;

pub use body::{content_type, CommitPayload, CommitRequest, Mutation};
pub use context::{Extensions, Response, TxnContext};
pub use params::{path, QueryParams};
