//! Response envelope and transaction metadata.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Transaction metadata reported by the server in `extensions.txn`.
///
/// Every field is optional on the wire; absent fields decode to their
/// zero value, which the client treats as "not reported".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxnContext {
    /// Server-assigned start timestamp identifying the transaction.
    #[serde(default)]
    pub start_ts: u64,
    /// Commit timestamp, set on responses to a commit.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub commit_ts: u64,
    /// Whether the server reports the transaction as aborted.
    #[serde(default, skip_serializing_if = "is_false")]
    pub aborted: bool,
    /// Coordination hash echoed back on subsequent requests.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub hash: String,
    /// Conflict keys touched by a mutation.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keys: Vec<String>,
    /// Predicates touched by a mutation.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub preds: Vec<String>,
}

impl TxnContext {
    /// Creates a context carrying only a start timestamp.
    pub fn new(start_ts: u64) -> Self {
        Self {
            start_ts,
            ..Self::default()
        }
    }

    /// Sets the hash.
    pub fn with_hash(mut self, hash: impl Into<String>) -> Self {
        self.hash = hash.into();
        self
    }

    /// Sets the conflict keys.
    pub fn with_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keys = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the predicates.
    pub fn with_preds<I, S>(mut self, preds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.preds = preds.into_iter().map(Into::into).collect();
        self
    }
}

fn is_zero(value: &u64) -> bool {
    *value == 0
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// The `extensions` block of a response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Extensions {
    /// Transaction metadata, if the server attached any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub txn: Option<TxnContext>,
    /// Server-side latency breakdown, passed through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_latency: Option<Value>,
}

/// A parsed JSON response from the query, mutate or commit endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// Result payload.
    #[serde(default)]
    pub data: Value,
    /// Extensions, including transaction metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Extensions>,
    /// Error objects reported alongside a 2xx status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<Value>>,
}

impl Response {
    /// Creates a response with the given data and no extensions.
    pub fn new(data: Value) -> Self {
        Self {
            data,
            ..Self::default()
        }
    }

    /// Attaches transaction metadata.
    pub fn with_txn(mut self, txn: TxnContext) -> Self {
        self.extensions.get_or_insert_with(Extensions::default).txn = Some(txn);
        self
    }

    /// Returns the transaction metadata, if any.
    pub fn txn(&self) -> Option<&TxnContext> {
        self.extensions.as_ref().and_then(|ext| ext.txn.as_ref())
    }

    /// Decodes a response from a JSON body.
    pub fn from_slice(bytes: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(bytes)
    }

    /// Encodes the response to JSON bytes.
    pub fn to_vec(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }
}
