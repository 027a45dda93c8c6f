//! Connection registry: the authoritative actor ↔ connection index.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::debug;

use dispatch_core::types::ActorKey;

use super::handle::{ConnectionHandle, ConnectionId};

#[derive(Debug, Default)]
struct Inner {
    /// Actor key → its single live connection.
    by_actor: HashMap<ActorKey, Arc<ConnectionHandle>>,
    /// Connection ID → the actor key it was registered under.
    by_connection: HashMap<ConnectionId, ActorKey>,
}

/// Thread-safe index of live realtime connections, at most one per actor.
///
/// Both maps sit behind one mutex so every operation sees them in a
/// consistent state. The lock is only ever held for map work, never across
/// an `.await`. No operation fails.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    inner: Mutex<Inner>,
}

impl ConnectionRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // Map operations cannot leave the index half-updated, so a poisoned
        // lock still guards consistent data.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Records `handle` as the actor's connection.
    ///
    /// Overwrites any existing entry for the same actor without closing it
    /// and without removing its reverse mapping. Callers that want eviction
    /// must remove the old connection first.
    pub fn add(&self, handle: Arc<ConnectionHandle>) {
        let mut inner = self.lock();
        inner.by_connection.insert(handle.id, handle.actor.clone());
        inner.by_actor.insert(handle.actor.clone(), handle);
    }

    /// Removes the actor's existing connection, if any, then records
    /// `handle` in its place, under a single lock acquisition.
    ///
    /// Returns the displaced handle so the caller can close its transport.
    pub fn replace(&self, handle: Arc<ConnectionHandle>) -> Option<Arc<ConnectionHandle>> {
        let mut inner = self.lock();
        let previous = inner.by_actor.remove(&handle.actor);
        if let Some(previous) = &previous {
            inner.by_connection.remove(&previous.id);
        }
        inner.by_connection.insert(handle.id, handle.actor.clone());
        inner.by_actor.insert(handle.actor.clone(), handle);
        previous
    }

    /// Returns the actor's current connection, if any.
    pub fn lookup(&self, key: &ActorKey) -> Option<Arc<ConnectionHandle>> {
        self.lock().by_actor.get(key).cloned()
    }

    /// Returns the connections of every listed actor that has one.
    ///
    /// Actors without a connection are skipped; the order of the result is
    /// unspecified.
    pub fn lookup_many<'a, I>(&self, keys: I) -> Vec<Arc<ConnectionHandle>>
    where
        I: IntoIterator<Item = &'a ActorKey>,
    {
        let inner = self.lock();
        keys.into_iter()
            .filter_map(|key| inner.by_actor.get(key).cloned())
            .collect()
    }

    /// Removes the actor's connection and its reverse mapping.
    ///
    /// Returns the removed handle; absent keys are a no-op.
    pub fn remove_by_actor_key(&self, key: &ActorKey) -> Option<Arc<ConnectionHandle>> {
        let mut inner = self.lock();
        let handle = inner.by_actor.remove(key)?;
        inner.by_connection.remove(&handle.id);
        Some(handle)
    }

    /// Removes the connection with the given id.
    ///
    /// The actor entry is only dropped when it still points at this same
    /// connection, so a late disconnect from a superseded connection never
    /// removes its replacement. Unknown ids are a no-op.
    pub fn remove_by_connection_id(&self, id: &ConnectionId) -> Option<Arc<ConnectionHandle>> {
        let mut inner = self.lock();
        let key = inner.by_connection.remove(id)?;

        let is_current = inner
            .by_actor
            .get(&key)
            .is_some_and(|current| current.id == *id);
        if !is_current {
            debug!(conn_id = %id, actor = %key, "Stale connection removed");
            return None;
        }
        inner.by_actor.remove(&key)
    }

    /// Number of actors with a live connection.
    pub fn len(&self) -> usize {
        self.lock().by_actor.len()
    }

    /// Whether no actor is connected.
    pub fn is_empty(&self) -> bool {
        self.lock().by_actor.is_empty()
    }

    /// Number of connection ids tracked, including stale ones left by an
    /// overwriting `add`.
    pub fn connection_count(&self) -> usize {
        self.lock().by_connection.len()
    }

    /// Removes and returns every registered connection.
    pub fn drain(&self) -> Vec<Arc<ConnectionHandle>> {
        let mut inner = self.lock();
        inner.by_connection.clear();
        inner.by_actor.drain().map(|(_, handle)| handle).collect()
    }
}
