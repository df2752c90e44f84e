//! Request bodies and their content types.

use serde::Serialize;
use std::collections::BTreeSet;

/// Content types understood by the server.
pub mod content_type {
    /// Query text in the graph query language.
    pub const GRAPHQL_PM: &str = "application/graphql+-";
    /// RDF triples.
    pub const RDF: &str = "application/rdf";
    /// JSON documents.
    pub const JSON: &str = "application/json";
}

/// A single RDF mutation block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    /// Triples to add.
    Set(String),
    /// Triples to remove.
    Delete(String),
}

impl Mutation {
    /// Renders the request body: `{ set { .. } }` or `{ delete { .. } }`.
    pub fn body(&self) -> String {
        match self {
            Mutation::Set(triples) => format!("{{ set {{ {triples} }} }}"),
            Mutation::Delete(triples) => format!("{{ delete {{ {triples} }} }}"),
        }
    }
}

/// Shape of the commit request body.
///
/// Servers differ in what they expect: newer ones take both the conflict
/// keys and the touched predicates, older ones only the bare key list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CommitPayload {
    /// `{"keys": [..], "preds": [..]}`.
    #[default]
    KeysAndPreds,
    /// `[..keys]`.
    KeysOnly,
}

/// Accumulated write set sent on commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitRequest<'a> {
    /// Conflict keys.
    pub keys: &'a BTreeSet<String>,
    /// Predicates.
    pub preds: &'a BTreeSet<String>,
}

impl<'a> CommitRequest<'a> {
    /// Creates a commit request borrowing the accumulated sets.
    pub fn new(keys: &'a BTreeSet<String>, preds: &'a BTreeSet<String>) -> Self {
        Self { keys, preds }
    }

    /// Encodes the body in the requested shape.
    pub fn encode(&self, payload: CommitPayload) -> serde_json::Result<Vec<u8>> {
        match payload {
            CommitPayload::KeysAndPreds => serde_json::to_vec(self),
            CommitPayload::KeysOnly => serde_json::to_vec(self.keys),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn set_of(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn mutation_bodies() {
        let set = Mutation::Set("_:a <name> \"Alice\" .".into());
        assert_eq!(set.body(), "{ set { _:a <name> \"Alice\" . } }");

        let delete = Mutation::Delete("<0x1> * * .".into());
        assert_eq!(delete.body(), "{ delete { <0x1> * * . } }");
    }

    #[test]
    fn commit_keys_and_preds() {
        let keys = set_of(&["def", "abc"]);
        let preds = set_of(&["1-name"]);
        let bytes = CommitRequest::new(&keys, &preds)
            .encode(CommitPayload::KeysAndPreds)
            .unwrap();
        let value: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value, json!({ "keys": ["abc", "def"], "preds": ["1-name"] }));
    }

    #[test]
    fn commit_keys_only() {
        let keys = set_of(&["abc"]);
        let preds = set_of(&["1-name"]);
        let bytes = CommitRequest::new(&keys, &preds)
            .encode(CommitPayload::KeysOnly)
            .unwrap();
        assert_eq!(bytes, br#"["abc"]"#);
    }

    #[test]
    fn empty_commit_body() {
        let empty = BTreeSet::new();
        let bytes = CommitRequest::new(&empty, &empty)
            .encode(CommitPayload::default())
            .unwrap();
        assert_eq!(bytes, br#"{"keys":[],"preds":[]}"#);
    }
}
