//! Endpoint paths and query-string construction.
//!
//! Parameter order is part of the wire contract: each endpoint emits its
//! parameters in a fixed order, and `QueryParams` preserves insertion order
//! exactly. Values are written verbatim without percent-encoding.

/// Endpoint paths relative to the server base URL.
pub mod path {
    /// Read endpoint.
    pub const QUERY: &str = "/query";
    /// Mutation endpoint.
    pub const MUTATE: &str = "/mutate";
    /// Commit and abort endpoint.
    pub const COMMIT: &str = "/commit";
}

/// An ordered list of `key=value` query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(&'static str, String)>,
}

impl QueryParams {
    /// Creates an empty parameter list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a parameter.
    pub fn push(&mut self, key: &'static str, value: impl ToString) -> &mut Self {
        self.pairs.push((key, value.to_string()));
        self
    }

    /// Appends a parameter only when `include` holds.
    pub fn push_if(&mut self, include: bool, key: &'static str, value: impl ToString) -> &mut Self {
        if include {
            self.push(key, value);
        }
        self
    }

    /// Returns true if no parameter was added.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Returns the value of the first parameter named `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Renders `k1=v1&k2=v2...` in insertion order.
    pub fn to_query_string(&self) -> String {
        self.pairs
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Appends `?<params>` to `path`, or returns `path` alone if empty.
    pub fn append_to(&self, path: &str) -> String {
        if self.is_empty() {
            path.to_string()
        } else {
            format!("{}?{}", path, self.to_query_string())
        }
    }
}
