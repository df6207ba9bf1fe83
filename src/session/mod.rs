//! Session store for the bearer token.
//!
//! Holds the current session token in memory, persists it to a single file
//! on disk, and broadcasts lifecycle events so every consumer (live views,
//! the API client) observes login, logout, and expiry consistently.
//!
//! Other statushawk processes share the same token file, so a background
//! watcher re-reads it on an interval and adopts external changes. This is
//! the moral equivalent of a browser's cross-tab storage event: a logout in
//! one terminal propagates to a live `overview --watch` in another.

mod error;

pub use error::SessionError;

use std::path::{Path, PathBuf};
use std::sync::RwLock;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Session lifecycle events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// A token was stored via an explicit login.
    LoggedIn,
    /// The token was cleared via an explicit logout.
    LoggedOut,
    /// The server rejected the token (HTTP 401); the session was cleared.
    Expired,
    /// Another process changed the stored token; the new value was adopted.
    ExternalChange,
}

/// Owns the session token and its persisted copy.
///
/// The token and every outgoing request's authorization header stay
/// consistent because requests resolve the token through [`token()`]
/// per call; `login` and `logout` are the only mutation points.
///
/// [`token()`]: SessionStore::token
pub struct SessionStore {
    token: RwLock<Option<String>>,
    path: PathBuf,
    events: broadcast::Sender<SessionEvent>,
}

impl SessionStore {
    /// Open the store, reading any previously persisted token.
    ///
    /// A missing, unreadable, or empty token file reads as "no session".
    pub fn open(path: PathBuf) -> Self {
        let token = read_stored_token(&path);
        let (events, _) = broadcast::channel(16);
        Self {
            token: RwLock::new(token),
            path,
            events,
        }
    }

    /// Current token, if any.
    pub fn token(&self) -> Option<String> {
        self.token.read().unwrap_or_else(std::sync::PoisonError::into_inner).clone()
    }

    /// Whether a session token is present.
    pub fn is_authenticated(&self) -> bool {
        self.token.read().unwrap_or_else(std::sync::PoisonError::into_inner).is_some()
    }

    /// Subscribe to session lifecycle events.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Store a token: persists it to disk and makes it visible to every
    /// subsequent request in the same logical step.
    pub fn login(&self, token: &str) -> Result<(), SessionError> {
        {
            let mut guard = self.token.write().unwrap_or_else(std::sync::PoisonError::into_inner);
            persist_token(&self.path, token)?;
            *guard = Some(token.to_string());
        }
        tracing::info!("Session established");
        let _ = self.events.send(SessionEvent::LoggedIn);
        Ok(())
    }

    /// Clear the session: removes the persisted token and the in-memory copy.
    pub fn logout(&self) -> Result<(), SessionError> {
        {
            let mut guard = self.token.write().unwrap_or_else(std::sync::PoisonError::into_inner);
            remove_token(&self.path)?;
            *guard = None;
        }
        tracing::info!("Session cleared");
        let _ = self.events.send(SessionEvent::LoggedOut);
        Ok(())
    }

    /// Clear the session in response to an authentication failure.
    ///
    /// Idempotent: returns `true` only when a token was actually cleared,
    /// so a burst of concurrent 401 responses produces a single `Expired`
    /// event and never recurses.
    pub fn invalidate(&self) -> bool {
        {
            let mut guard = self.token.write().unwrap_or_else(std::sync::PoisonError::into_inner);
            if guard.is_none() {
                return false;
            }
            // Best effort: an unlinkable file must not keep a dead session alive.
            if let Err(e) = remove_token(&self.path) {
                tracing::warn!(error = %e, "Failed to remove persisted token");
            }
            *guard = None;
        }
        tracing::warn!("Session expired or token rejected; logging out");
        let _ = self.events.send(SessionEvent::Expired);
        true
    }

    /// Compare the stored token against the in-memory one and adopt the
    /// stored value when they differ.
    ///
    /// Returns `true` when an external change was adopted. Supports logout
    /// (and login) propagating from other processes sharing the token file.
    pub fn sync_external(&self) -> bool {
        let stored = read_stored_token(&self.path);
        {
            let mut guard = self.token.write().unwrap_or_else(std::sync::PoisonError::into_inner);
            if *guard == stored {
                return false;
            }
            *guard = stored;
        }
        tracing::debug!("Adopted externally changed session token");
        let _ = self.events.send(SessionEvent::ExternalChange);
        true
    }

    /// Start the background token file watcher.
    ///
    /// Re-reads the token file on `interval` until `cancel` fires.
    pub fn start_watcher(
        self: &std::sync::Arc<Self>,
        interval: Duration,
        cancel: CancellationToken,
    ) -> JoinHandle<()> {
        let store = std::sync::Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            tracing::debug!(interval_ms = interval.as_millis() as u64, "Session watcher started");

            loop {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        tracing::debug!("Session watcher shutting down");
                        break;
                    }
                    _ = ticker.tick() => {
                        store.sync_external();
                    }
                }
            }
        })
    }
}

fn read_stored_token(path: &Path) -> Option<String> {
    match std::fs::read_to_string(path) {
        Ok(contents) => {
            let token = contents.trim();
            if token.is_empty() {
                None
            } else {
                Some(token.to_string())
            }
        }
        Err(_) => None,
    }
}

fn persist_token(path: &Path, token: &str) -> Result<(), SessionError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| SessionError::Persist {
            path: path.to_path_buf(),
            source,
        })?;
    }
    std::fs::write(path, token).map_err(|source| SessionError::Persist {
        path: path.to_path_buf(),
        source,
    })
}

fn remove_token(path: &Path) -> Result<(), SessionError> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(SessionError::Remove {
            path: path.to_path_buf(),
            source,
        }),
    }
}
