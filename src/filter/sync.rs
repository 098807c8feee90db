//! Debounced URL synchronisation
//!
//! Filter state flows one way: criteria → query string → navigation. The
//! scheduler never reads the URL back; the query string is decoded once,
//! when a session is created.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::filter::codec;

/// Quiet period after the last mutation before the URL is rewritten
pub const DEBOUNCE: Duration = Duration::from_millis(500);

/// How a navigation affects browser history
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Navigation {
    /// Adds a history entry (explicit apply/reset)
    Push,
    /// Overwrites the current entry (debounced auto-sync)
    Replace,
}

/// The URL/history facility a scheduler writes to
pub trait Navigator: Send + Sync + 'static {
    fn navigate(&self, location: &str, navigation: Navigation);
}

/// A history entry recorded by [`HistoryNavigator`]
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub location: String,
    pub navigation: Navigation,
}

/// In-memory browser history
///
/// Push appends an entry, replace overwrites the current one. Every
/// navigation is also kept in a log so callers can see exactly what was
/// issued.
#[derive(Debug, Default)]
pub struct HistoryNavigator {
    state: Mutex<HistoryState>,
}

#[derive(Debug, Default)]
struct HistoryState {
    entries: Vec<String>,
    log: Vec<HistoryEntry>,
}

impl HistoryNavigator {
    /// Starts a history whose only entry is `location`
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            state: Mutex::new(HistoryState {
                entries: vec![location.into()],
                log: Vec::new(),
            }),
        }
    }

    pub fn current(&self) -> Option<String> {
        self.lock().entries.last().cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }

    /// Every navigation issued so far, oldest first
    pub fn log(&self) -> Vec<HistoryEntry> {
        self.lock().log.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HistoryState> {
        // A panic while holding the lock cannot leave the vectors half-updated
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Navigator for HistoryNavigator {
    fn navigate(&self, location: &str, navigation: Navigation) {
        let mut state = self.lock();
        match navigation {
            Navigation::Push => state.entries.push(location.to_string()),
            Navigation::Replace => match state.entries.last_mut() {
                Some(current) => *current = location.to_string(),
                None => state.entries.push(location.to_string()),
            },
        }
        state.log.push(HistoryEntry {
            location: location.to_string(),
            navigation,
        });
    }
}

/// Identifies one scheduled commit
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CommitToken(pub u64);

/// A commit waiting for its debounce window to elapse
#[derive(Debug)]
pub struct PendingCommit {
    token: CommitToken,
    handle: JoinHandle<()>,
}

impl PendingCommit {
    pub fn token(&self) -> CommitToken {
        self.token
    }

    fn cancel(self) -> CommitToken {
        self.handle.abort();
        self.token
    }
}

/// Debounces URL writes for one filter session
///
/// At most one commit is pending at a time; scheduling a new one supersedes
/// the previous. Needs to run inside a tokio runtime.
pub struct SyncScheduler {
    navigator: Arc<dyn Navigator>,
    path: String,
    delay: Duration,
    pending: Option<PendingCommit>,
    next_token: u64,
}

impl SyncScheduler {
    /// A scheduler writing locations under `path` with the standard debounce
    pub fn new(navigator: Arc<dyn Navigator>, path: impl Into<String>) -> Self {
        Self::with_delay(navigator, path, DEBOUNCE)
    }

    pub fn with_delay(navigator: Arc<dyn Navigator>, path: impl Into<String>, delay: Duration) -> Self {
        Self {
            navigator,
            path: path.into(),
            delay,
            pending: None,
            next_token: 0,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Token of the commit still waiting to fire, if any
    pub fn pending(&self) -> Option<CommitToken> {
        self.pending
            .as_ref()
            .filter(|pending| !pending.handle.is_finished())
            .map(PendingCommit::token)
    }

    /// Schedules a replace-style navigation to `query` once the debounce window elapses
    pub fn schedule(&mut self, query: String) -> CommitToken {
        if let Some(superseded) = self.cancel() {
            debug!(token = superseded.0, "superseded pending url commit");
        }

        let token = self.issue_token();
        let navigator = Arc::clone(&self.navigator);
        let location = codec::location(&self.path, &query);
        let delay = self.delay;

        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            debug!(token = token.0, %location, "committing debounced url");
            navigator.navigate(&location, Navigation::Replace);
        });

        self.pending = Some(PendingCommit { token, handle });
        token
    }

    /// Cancels any pending commit and pushes `query` right away
    pub fn commit_now(&mut self, query: &str) {
        self.cancel();
        let location = codec::location(&self.path, query);
        debug!(%location, "committing url immediately");
        self.navigator.navigate(&location, Navigation::Push);
    }

    /// Cancels the pending commit, returning its token if one was still waiting
    pub fn cancel(&mut self) -> Option<CommitToken> {
        let pending = self.pending.take()?;
        let live = !pending.handle.is_finished();
        let token = pending.cancel();
        live.then_some(token)
    }

    fn issue_token(&mut self) -> CommitToken {
        self.next_token += 1;
        CommitToken(self.next_token)
    }
}

impl Drop for SyncScheduler {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl std::fmt::Debug for SyncScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncScheduler")
            .field("path", &self.path)
            .field("delay", &self.delay)
            .field("pending", &self.pending())
            .finish()
    }
}
