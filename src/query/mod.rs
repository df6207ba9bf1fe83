//! Query cache layer.
//!
//! Key-addressed caching between the pages and the API client, mirroring
//! the read/mutate contract every view composes with:
//!
//! - at most one in-flight fetch per key; concurrent requesters share the
//!   resolved value,
//! - results apply in resolution order: a superseded fetch's result is
//!   discarded when a newer fetch for the same key already resolved,
//! - mutations invalidate affected keys, forcing a refetch before the next
//!   read is considered fresh,
//! - paginated views can serve a sibling page as placeholder data while a
//!   new page loads (see [`Poller`]).
//!
//! Values are stored type-erased as JSON; every wire type is `Serialize` +
//! `Deserialize`, so the round-trip through the cache is lossless.

mod key;
mod poller;

pub use key::{QueryFamily, QueryKey};
pub use poller::{Poller, QuerySnapshot};

use crate::api::ApiError;
use dashmap::DashMap;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Instant;
use thiserror::Error;

/// Errors surfaced by the query layer.
#[derive(Error, Debug)]
pub enum QueryError {
    #[error(transparent)]
    Fetch(#[from] ApiError),

    #[error("Cache codec error: {0}")]
    Codec(String),
}

/// Ticket for one issued fetch against a key.
///
/// Tickets are monotonically numbered per key; completing an old ticket
/// after a newer one has applied is a no-op.
#[derive(Debug, Clone)]
pub struct FetchTicket {
    key: QueryKey,
    generation: u64,
}

impl FetchTicket {
    pub fn key(&self) -> &QueryKey {
        &self.key
    }
}

/// A value served from the cache.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult<T> {
    pub data: T,
    /// True when the value came out of the cache rather than this fetch.
    pub from_cache: bool,
}

#[derive(Default)]
struct EntryState {
    /// Ticket number of the most recently issued fetch.
    issued: u64,
    /// Ticket number of the value currently cached.
    applied: u64,
    value: Option<serde_json::Value>,
    stale: bool,
    updated_at: Option<Instant>,
}

struct Entry {
    state: Mutex<EntryState>,
    /// Serializes fetches for this key: at most one in flight.
    fetch_lock: tokio::sync::Mutex<()>,
}

impl Entry {
    fn new() -> Self {
        Self {
            state: Mutex::new(EntryState::default()),
            fetch_lock: tokio::sync::Mutex::new(()),
        }
    }
}

/// The query cache.
pub struct QueryCache {
    entries: DashMap<QueryKey, Arc<Entry>>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    fn entry(&self, key: &QueryKey) -> Arc<Entry> {
        self.entries
            .entry(key.clone())
            .or_insert_with(|| Arc::new(Entry::new()))
            .clone()
    }

    /// Issue a fetch ticket for a key.
    pub fn begin(&self, key: &QueryKey) -> FetchTicket {
        let entry = self.entry(key);
        let mut state = entry.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        state.issued += 1;
        FetchTicket {
            key: key.clone(),
            generation: state.issued,
        }
    }

    /// Apply a resolved fetch. Returns `false` when the ticket was
    /// superseded by a newer resolved fetch and the value was discarded.
    pub fn complete<T: Serialize>(
        &self,
        ticket: &FetchTicket,
        value: &T,
    ) -> Result<bool, QueryError> {
        let encoded = serde_json::to_value(value).map_err(|e| QueryError::Codec(e.to_string()))?;

        let entry = self.entry(&ticket.key);
        let mut state = entry.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        if ticket.generation <= state.applied {
            tracing::debug!(key = %ticket.key, "Discarding superseded fetch result");
            return Ok(false);
        }
        state.applied = ticket.generation;
        state.value = Some(encoded);
        state.stale = false;
        state.updated_at = Some(Instant::now());
        Ok(true)
    }

    /// Mark a key stale: the next read refetches before it is fresh again.
    pub fn invalidate(&self, key: &QueryKey) {
        if let Some(entry) = self.entries.get(key) {
            let mut state = entry.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
            state.stale = true;
        }
    }

    /// Mark every key of a family stale (e.g. all monitor-list pages after
    /// a create/toggle/delete mutation).
    pub fn invalidate_family(&self, family: QueryFamily) {
        for entry in self.entries.iter() {
            if entry.key().family() == family {
                let mut state = entry.value().state.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
                state.stale = true;
            }
        }
    }

    /// Cached value for a key, fresh or stale.
    pub fn peek<T: DeserializeOwned>(&self, key: &QueryKey) -> Option<T> {
        let entry = self.entries.get(key)?;
        let state = entry.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        let value = state.value.clone()?;
        serde_json::from_value(value).ok()
    }

    fn is_fresh(&self, key: &QueryKey) -> bool {
        match self.entries.get(key) {
            Some(entry) => {
                let state = entry.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
                state.value.is_some() && !state.stale
            }
            None => false,
        }
    }

    /// Most recently updated sibling value of a paginated key, used as
    /// placeholder data while the requested page loads.
    pub fn placeholder_for<T: DeserializeOwned>(&self, key: &QueryKey) -> Option<T> {
        if !key.is_paginated() {
            return None;
        }

        let mut best: Option<(Instant, serde_json::Value)> = None;
        for entry in self.entries.iter() {
            if entry.key() == key || entry.key().family() != key.family() {
                continue;
            }
            let state = entry.value().state.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
            if let (Some(value), Some(updated_at)) = (&state.value, state.updated_at) {
                if best.as_ref().map(|(t, _)| updated_at > *t).unwrap_or(true) {
                    best = Some((updated_at, value.clone()));
                }
            }
        }

        best.and_then(|(_, value)| serde_json::from_value(value).ok())
    }

    /// Fetch a key through the cache.
    ///
    /// Returns the cached value when fresh; otherwise runs `fetcher` while
    /// holding the key's fetch lock, so concurrent callers for the same key
    /// wait for the first fetch and then observe its result.
    pub async fn fetch<T, F, Fut>(
        &self,
        key: QueryKey,
        fetcher: F,
    ) -> Result<QueryResult<T>, QueryError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        let entry = self.entry(&key);
        let _in_flight = entry.fetch_lock.lock().await;

        if self.is_fresh(&key) {
            if let Some(data) = self.peek(&key) {
                return Ok(QueryResult {
                    data,
                    from_cache: true,
                });
            }
        }

        let ticket = self.begin(&key);
        let value = fetcher().await?;

        if self.complete(&ticket, &value)? {
            Ok(QueryResult {
                data: value,
                from_cache: false,
            })
        } else {
            // A newer fetch resolved first; serve its value instead.
            let data = self
                .peek(&key)
                .ok_or_else(|| QueryError::Codec("superseded value missing".to_string()))?;
            Ok(QueryResult {
                data,
                from_cache: true,
            })
        }
    }
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new()
    }
}
