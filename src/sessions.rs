//! Live filter sessions held by the HTTP layer
//!
//! Each entry owns its own `FilterSession` and the in-memory history its
//! scheduler writes to. Sessions share nothing with each other: the store
//! lock only guards the id map, and every session sits behind its own lock
//! while it recomputes.
//!
//! A session that goes untouched for longer than the store's TTL expires.
//! Expired ids answer as unknown right away and are dropped on the next
//! insert or sweep, which also cancels their pending URL commit.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::{distr::Alphanumeric, Rng};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::debug;

use crate::filter::{FilterSession, HistoryNavigator};

/// Length of generated session ids
const SESSION_ID_LEN: usize = 12;

#[derive(Debug)]
pub struct SessionEntry {
    pub session: FilterSession,
    pub history: Arc<HistoryNavigator>,
    pub created_at: DateTime<Utc>,
}

struct Slot {
    entry: Arc<Mutex<SessionEntry>>,
    last_seen: Instant,
}

#[derive(Clone)]
pub struct SessionStore {
    slots: Arc<Mutex<HashMap<String, Slot>>>,
    ttl: Duration,
}

impl SessionStore {
    /// An empty store whose sessions expire after `ttl` without access
    pub fn new(ttl: Duration) -> Self {
        Self {
            slots: Arc::default(),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Stores a new session under a fresh random id and returns the id
    ///
    /// Expired sessions are pruned first.
    pub fn insert(&self, entry: SessionEntry) -> String {
        let now = Instant::now();
        let mut slots = self.lock();
        self.prune_locked(&mut slots, now);

        let id = loop {
            let candidate: String = rand::rng()
                .sample_iter(&Alphanumeric)
                .take(SESSION_ID_LEN)
                .map(char::from)
                .collect();
            if !slots.contains_key(&candidate) {
                break candidate;
            }
        };
        slots.insert(
            id.clone(),
            Slot {
                entry: Arc::new(Mutex::new(entry)),
                last_seen: now,
            },
        );
        id
    }

    /// Runs `f` against one live session, refreshing its idle timer
    ///
    /// Only the session's own lock is held while `f` runs.
    pub fn with<R>(&self, id: &str, f: impl FnOnce(&mut SessionEntry) -> R) -> Option<R> {
        let entry = self.touch(id)?;
        let mut guard = entry.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        Some(f(&mut guard))
    }

    /// Ends a session; its pending URL commit is cancelled when it drops
    ///
    /// Returns `false` when the id is unknown or already expired.
    pub fn remove(&self, id: &str) -> bool {
        let now = Instant::now();
        match self.lock().remove(id) {
            Some(slot) => !self.is_expired(&slot, now),
            None => false,
        }
    }

    /// Drops every expired session, returning how many went
    pub fn prune(&self) -> usize {
        let mut slots = self.lock();
        self.prune_locked(&mut slots, Instant::now())
    }

    /// Prunes expired sessions every `period` until the task is aborted
    pub fn spawn_sweeper(&self, period: Duration) -> JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            loop {
                interval.tick().await;
                let pruned = store.prune();
                if pruned > 0 {
                    debug!(pruned, "swept expired filter sessions");
                }
            }
        })
    }

    /// Number of stored sessions, including expired ones not yet pruned
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn touch(&self, id: &str) -> Option<Arc<Mutex<SessionEntry>>> {
        let now = Instant::now();
        let mut slots = self.lock();

        if self.is_expired(slots.get(id)?, now) {
            slots.remove(id);
            debug!(session = %id, "filter session expired");
            return None;
        }

        let slot = slots.get_mut(id)?;
        slot.last_seen = now;
        Some(Arc::clone(&slot.entry))
    }

    fn prune_locked(&self, slots: &mut HashMap<String, Slot>, now: Instant) -> usize {
        let before = slots.len();
        slots.retain(|_, slot| !self.is_expired(slot, now));
        before - slots.len()
    }

    fn is_expired(&self, slot: &Slot, now: Instant) -> bool {
        now.saturating_duration_since(slot.last_seen) >= self.ttl
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Slot>> {
        self.slots.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
