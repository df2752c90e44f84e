//! Transaction handle and its state machine.

use crate::config::TxnConfig;
use crate::error::{ErrorData, Operation, TxnError, TxnResult};
use crate::transport::{HttpClient, HttpRequest};
use dgraph_http_protocol::{
    content_type, path, CommitRequest, Mutation, QueryParams, Response, TxnContext,
};
use serde_json::{json, Value};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

/// State of a transaction handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxnState {
    /// Handle accepts queries and mutations.
    Active,
    /// A final query closed the handle.
    Closed,
    /// The transaction has been committed.
    Committed,
    /// The transaction has been aborted.
    Aborted,
}

impl TxnState {
    /// Returns true if no further operation is accepted.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, TxnState::Active)
    }
}

/// Arguments of a mutation.
///
/// Exactly one of `set` and `delete` must be given.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MutateRequest {
    /// RDF triples to add.
    pub set: Option<String>,
    /// RDF triples to remove.
    pub delete: Option<String>,
    /// Commit in the same request.
    pub commit_now: bool,
}

impl MutateRequest {
    /// Creates a request adding the given triples.
    pub fn set(triples: impl Into<String>) -> Self {
        Self {
            set: Some(triples.into()),
            ..Self::default()
        }
    }

    /// Creates a request removing the given triples.
    pub fn delete(triples: impl Into<String>) -> Self {
        Self {
            delete: Some(triples.into()),
            ..Self::default()
        }
    }

    /// Asks the server to commit immediately.
    pub fn commit_now(mut self) -> Self {
        self.commit_now = true;
        self
    }

    fn into_mutation(self) -> TxnResult<Mutation> {
        match (self.set, self.delete) {
            (None, None) => Err(TxnError::EmptyMutation),
            (Some(_), Some(_)) => Err(TxnError::ConflictingMutation),
            (Some(set), None) => Ok(Mutation::Set(set)),
            (None, Some(delete)) => Ok(Mutation::Delete(delete)),
        }
    }
}

/// A handle for one transaction against the Dgraph HTTP API.
///
/// Each `query`/`mutate` performs exactly one request and folds the
/// server-reported metadata into the handle. `commit` or `abort` finalizes
/// it. Methods take `&mut self`, so calls on one handle are serialized.
///
/// ## Start timestamp
///
/// The first response carrying a `start_ts` fixes the transaction identity.
/// Any later response reporting a different non-zero value fails the call
/// with [`TxnError::StartTsMismatch`] and leaves the handle untouched.
#[derive(Debug)]
pub struct Txn<C: HttpClient> {
    config: TxnConfig,
    client: C,
    state: TxnState,
    start_ts: u64,
    hash: String,
    keys: BTreeSet<String>,
    preds: BTreeSet<String>,
    mutated: bool,
}

impl<C: HttpClient> Txn<C> {
    /// Creates a new transaction handle.
    pub fn new(config: TxnConfig, client: C) -> TxnResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            client,
            state: TxnState::Active,
            start_ts: 0,
            hash: String::new(),
            keys: BTreeSet::new(),
            preds: BTreeSet::new(),
            mutated: false,
        })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &TxnConfig {
        &self.config
    }

    /// Returns the current state.
    pub fn state(&self) -> TxnState {
        self.state
    }

    /// Checks if the handle still accepts operations.
    pub fn is_active(&self) -> bool {
        !self.state.is_terminal()
    }

    /// Returns the server-assigned start timestamp, or 0 if none yet.
    pub fn start_ts(&self) -> u64 {
        self.start_ts
    }

    /// Returns the latest coordination hash.
    pub fn hash(&self) -> &str {
        &self.hash
    }

    /// Returns the accumulated conflict keys.
    pub fn keys(&self) -> &BTreeSet<String> {
        &self.keys
    }

    /// Returns the accumulated predicates.
    pub fn preds(&self) -> &BTreeSet<String> {
        &self.preds
    }

    /// Returns true once a mutation has been attempted.
    pub fn did_mutate(&self) -> bool {
        self.mutated
    }

    /// Runs a query.
    ///
    /// With `close_when_done` the handle is closed after a successful
    /// response and the response metadata is not applied.
    pub fn query(&mut self, close_when_done: bool, query: &str) -> TxnResult<Response> {
        self.ensure_active(Operation::Query, Some(query))?;

        let target = self.query_target();
        let response = self.call(
            target,
            Some(content_type::GRAPHQL_PM),
            Some(query.as_bytes().to_vec()),
        )?;
        self.finish_query(close_when_done, response)
    }

    /// Runs a query with variables, sent as a JSON body.
    pub fn query_with_vars(
        &mut self,
        close_when_done: bool,
        query: &str,
        vars: &BTreeMap<String, String>,
    ) -> TxnResult<Response> {
        self.ensure_active(Operation::Query, Some(query))?;

        let body = serde_json::to_vec(&json!({ "query": query, "variables": vars }))
            .map_err(TxnError::Encode)?;
        let target = self.query_target();
        let response = self.call(target, Some(content_type::JSON), Some(body))?;
        self.finish_query(close_when_done, response)
    }

    /// Applies a mutation.
    ///
    /// With `commit_now` the handle moves straight to committed and the
    /// response metadata is not applied.
    pub fn mutate(&mut self, request: MutateRequest) -> TxnResult<Response> {
        let commit_now = request.commit_now;
        let mutation = request.into_mutation()?;
        let input = match &mutation {
            Mutation::Set(triples) | Mutation::Delete(triples) => triples.as_str(),
        };
        self.ensure_active(Operation::Mutate, Some(input))?;
        if self.config.read_only {
            return Err(TxnError::ReadOnlyViolation);
        }

        // Recorded before sending so a failed request still rolls back.
        self.mutated = true;

        let mut params = QueryParams::new();
        params
            .push_if(commit_now, "commitNow", true)
            .push_if(self.start_ts != 0, "startTs", self.start_ts)
            .push_if(!self.hash.is_empty(), "hash", &self.hash);
        let target = params.append_to(path::MUTATE);

        let response = self.call(
            target,
            Some(content_type::RDF),
            Some(mutation.body().into_bytes()),
        )?;

        if commit_now {
            self.transition(TxnState::Committed);
        } else if let Some(ctx) = response.txn() {
            self.merge_context(ctx)?;
        }
        Ok(response)
    }

    /// Commits the transaction.
    ///
    /// Returns `Ok(None)` without any request if nothing was mutated.
    pub fn commit(&mut self) -> TxnResult<Option<Response>> {
        self.ensure_active(Operation::Commit, None)?;
        self.transition(TxnState::Committed);

        if !self.mutated {
            return Ok(None);
        }

        let body = CommitRequest::new(&self.keys, &self.preds)
            .encode(self.config.commit_payload)
            .map_err(TxnError::Encode)?;
        let target = self.commit_params().append_to(path::COMMIT);
        self.call(target, Some(content_type::JSON), Some(body))
            .map(Some)
    }

    /// Aborts the transaction.
    ///
    /// Safe to call repeatedly; only the first call has any effect. A
    /// rollback request is sent only if something was mutated.
    pub fn abort(&mut self) -> TxnResult<Option<Response>> {
        if self.state == TxnState::Aborted {
            return Ok(None);
        }
        self.transition(TxnState::Aborted);

        if !self.mutated {
            return Ok(None);
        }

        let mut params = self.commit_params();
        params.push("abort", true);
        let target = params.append_to(path::COMMIT);
        self.call(target, None, None).map(Some)
    }

    /// Alias of [`Txn::abort`].
    pub fn discard(&mut self) -> TxnResult<Option<Response>> {
        self.abort()
    }

    fn ensure_active(&self, operation: Operation, input: Option<&str>) -> TxnResult<()> {
        let data = || ErrorData::new(operation, input);
        match self.state {
            TxnState::Active => Ok(()),
            TxnState::Aborted => Err(TxnError::AlreadyAborted { data: data() }),
            TxnState::Committed => Err(TxnError::AlreadyCommitted { data: data() }),
            TxnState::Closed => Err(TxnError::AlreadyClosed { data: data() }),
        }
    }

    fn transition(&mut self, to: TxnState) {
        debug!(from = ?self.state, to = ?to, start_ts = self.start_ts, "txn state change");
        self.state = to;
    }

    fn query_target(&self) -> String {
        let timeout = self.config.timeout.as_secs();
        let mut params = QueryParams::new();
        params
            .push_if(self.start_ts != 0, "startTs", self.start_ts)
            .push_if(!self.hash.is_empty(), "hash", &self.hash)
            .push_if(timeout > 0, "timeout", format!("{timeout}s"))
            .push_if(self.config.read_only, "ro", true)
            .push_if(self.config.best_effort, "be", true);
        params.append_to(path::QUERY)
    }

    fn commit_params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        params
            .push("startTs", self.start_ts)
            .push("hash", &self.hash);
        params
    }

    fn finish_query(&mut self, close_when_done: bool, response: Response) -> TxnResult<Response> {
        if close_when_done {
            self.transition(TxnState::Closed);
        } else if let Some(ctx) = response.txn() {
            self.merge_context(ctx)?;
        }
        Ok(response)
    }

    /// Folds server-reported metadata into the handle.
    fn merge_context(&mut self, ctx: &TxnContext) -> TxnResult<()> {
        if self.start_ts != 0 && ctx.start_ts != 0 && ctx.start_ts != self.start_ts {
            return Err(TxnError::StartTsMismatch {
                handle: self.start_ts,
                response: ctx.start_ts,
            });
        }

        if !ctx.hash.is_empty() {
            self.hash.clone_from(&ctx.hash);
        }
        if self.start_ts == 0 {
            self.start_ts = ctx.start_ts;
        }
        self.keys.extend(ctx.keys.iter().cloned());
        self.preds.extend(ctx.preds.iter().cloned());
        Ok(())
    }

    /// Sends one request; on rejection aborts the handle, then returns the
    /// original error.
    fn call(
        &mut self,
        target: String,
        content_type: Option<&'static str>,
        body: Option<Vec<u8>>,
    ) -> TxnResult<Response> {
        let result = self.send(target, content_type, body);
        if let Err(err) = &result {
            if err.is_remote() {
                if let Err(abort_err) = self.abort() {
                    warn!(error = %abort_err, "implicit abort failed");
                }
            }
        }
        result
    }

    fn send(
        &self,
        target: String,
        content_type: Option<&'static str>,
        body: Option<Vec<u8>>,
    ) -> TxnResult<Response> {
        let request = HttpRequest {
            url: format!("{}{}", self.config.base_url(), target),
            auth_token: self.config.api_key.clone(),
            content_type,
            body,
        };
        debug!(url = %request.url, content_type = ?content_type, "sending request");

        let response = self
            .client
            .post(request)
            .map_err(TxnError::Transport)?;

        if !response.is_success() {
            warn!(status = response.status, target = %target, "request rejected");
            return Err(TxnError::Http {
                status: response.status,
                body: String::from_utf8_lossy(&response.body).into_owned(),
            });
        }

        Response::from_slice(&response.body).map_err(TxnError::Decode)
    }
}
