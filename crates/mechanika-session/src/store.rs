// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Session state container.
//!
//! [`SessionStore`] owns the authenticated identity for the process: an
//! explicit, injectable container with defined selectors rather than an
//! ambient global. The request gate never reads it — the gate works from the
//! cookie snapshot alone — so the store's only consumers are the HTTP
//! handlers and the cookie bridge.
//!
//! # Persistence
//!
//! Only the `{user, isAuthenticated}` projection is persisted, under the
//! fixed key [`STORAGE_KEY`], together with a corroborating session token
//! under [`TOKEN_KEY`]. Transient fields (loading flag, last error) are never
//! written. [`SessionStore::check_auth`] reconciles memory against storage at
//! startup and resets to signed-out on any inconsistency.
//!
//! # Concurrency
//!
//! Login is the only suspending operation. The credential call is awaited
//! before the state lock is taken, so the lock is never held across an await;
//! concurrent logins each settle on their own credentials, last settle wins.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};
use uuid::Uuid;

use mechanika_core::credentials::{CredentialStore, FixtureCredentials};
use mechanika_core::error::{AuthError, AuthResult};
use mechanika_core::identity::Identity;
use mechanika_core::snapshot::AuthSnapshot;

use crate::storage::{MemoryStorage, StateStorage};

/// Namespace key for the persisted auth projection.
pub const STORAGE_KEY: &str = "mymechanika-auth";

/// Namespace key for the corroborating session token.
pub const TOKEN_KEY: &str = "mymechanika-auth-token";

const CHANGE_CHANNEL_CAPACITY: usize = 64;

// =============================================================================
// Session State
// =============================================================================

#[derive(Debug, Default)]
struct SessionState {
    user: Option<Identity>,
    is_authenticated: bool,
    error: Option<String>,
    token: Option<String>,
}

impl SessionState {
    fn snapshot(&self) -> AuthSnapshot {
        AuthSnapshot {
            is_authenticated: self.is_authenticated,
            user: self.user.clone(),
        }
    }
}

// =============================================================================
// Session Store
// =============================================================================

/// Holds the current authenticated identity (or none) for the process.
pub struct SessionStore {
    inner: RwLock<SessionState>,
    storage: Arc<dyn StateStorage>,
    credentials: Arc<dyn CredentialStore>,
    changes: broadcast::Sender<AuthSnapshot>,
    logins_in_flight: AtomicUsize,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("is_authenticated", &self.is_authenticated())
            .field("logins_in_flight", &self.logins_in_flight.load(Ordering::Relaxed))
            .finish()
    }
}

impl SessionStore {
    /// Creates a store with the given collaborators.
    pub fn new(credentials: Arc<dyn CredentialStore>, storage: Arc<dyn StateStorage>) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            inner: RwLock::new(SessionState::default()),
            storage,
            credentials,
            changes,
            logins_in_flight: AtomicUsize::new(0),
        }
    }

    /// Creates a store builder.
    pub fn builder() -> SessionStoreBuilder {
        SessionStoreBuilder::new()
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Authenticates the given credentials and opens a session.
    ///
    /// On success the identity is stored, persisted, and published to
    /// subscribers. On [`AuthError::InvalidCredentials`] the previous session
    /// — authenticated or not — is left untouched; only the retrievable last
    /// error changes, and it stays set until [`clear_error`] is called.
    ///
    /// [`clear_error`]: SessionStore::clear_error
    pub async fn login(&self, email: &str, password: &str) -> AuthResult<Identity> {
        self.logins_in_flight.fetch_add(1, Ordering::SeqCst);
        let outcome = self.credentials.authenticate(email, password).await;
        self.logins_in_flight.fetch_sub(1, Ordering::SeqCst);

        match outcome {
            Ok(Some(identity)) => {
                let token = format!("session-{}-{}", identity.id, Uuid::now_v7());
                let snapshot = {
                    let mut state = self.inner.write();
                    state.user = Some(identity.clone());
                    state.is_authenticated = true;
                    state.error = None;
                    state.token = Some(token.clone());
                    state.snapshot()
                };

                self.persist(&snapshot, &token).await;
                self.publish(snapshot);
                info!(email = %email, role = %identity.role, "login succeeded");
                Ok(identity)
            }
            Ok(None) => {
                let error = AuthError::InvalidCredentials;
                self.inner.write().error = Some(error.user_message().to_string());
                warn!(email = %email, "login rejected");
                Err(error)
            }
            Err(error) => {
                self.inner.write().error = Some(error.user_message().to_string());
                warn!(email = %email, error = %error, "login failed");
                Err(error)
            }
        }
    }

    /// Closes the session.
    ///
    /// Unconditionally clears the identity, the authenticated flag, the last
    /// error, the token, and the persisted records. Idempotent: signing out
    /// while signed out is a no-op.
    pub async fn logout(&self) {
        let changed = self.clear_session().await;
        if changed {
            info!("logout");
        }
    }

    /// Reconciles in-memory state against persisted storage.
    ///
    /// Restores the session when the persisted projection and its
    /// corroborating token are both present and consistent; otherwise resets
    /// to signed-out, clearing whatever half-state existed. Safety over
    /// convenience: a broken record forces a fresh login.
    pub async fn check_auth(&self) -> AuthSnapshot {
        let record = self.storage.load(STORAGE_KEY).await;
        let token = self.storage.load(TOKEN_KEY).await;

        let (record, token) = match (record, token) {
            (Ok(Some(record)), Ok(Some(token))) => (record, token),
            (Ok(_), Ok(_)) => {
                debug!("no persisted session");
                self.clear_session().await;
                return AuthSnapshot::anonymous();
            }
            (record, token) => {
                if let Err(e) = record.and(token) {
                    warn!(error = %e, "failed to load persisted session, resetting");
                }
                self.clear_session().await;
                return AuthSnapshot::anonymous();
            }
        };

        match serde_json::from_str::<AuthSnapshot>(&record) {
            Ok(snapshot) if snapshot.is_authenticated && snapshot.user.is_some() => {
                {
                    let mut state = self.inner.write();
                    state.user = snapshot.user.clone();
                    state.is_authenticated = true;
                    state.token = Some(token);
                }
                self.publish(snapshot.clone());
                info!(role = ?snapshot.role(), "session restored from storage");
                snapshot
            }
            Ok(_) => {
                debug!("persisted session is signed-out or incomplete, resetting");
                self.clear_session().await;
                AuthSnapshot::anonymous()
            }
            Err(e) => {
                warn!(error = %e, "persisted session is unreadable, resetting");
                self.clear_session().await;
                AuthSnapshot::anonymous()
            }
        }
    }

    /// Clears the retrievable last error.
    ///
    /// Errors are never cleared automatically; the caller decides when a new
    /// attempt begins.
    pub fn clear_error(&self) {
        self.inner.write().error = None;
    }

    // =========================================================================
    // Selectors
    // =========================================================================

    /// Returns the current identity, if authenticated.
    pub fn current_user(&self) -> Option<Identity> {
        self.inner.read().user.clone()
    }

    /// Returns `true` if a session is active.
    pub fn is_authenticated(&self) -> bool {
        self.inner.read().is_authenticated
    }

    /// Returns the last login error, if not yet cleared.
    pub fn last_error(&self) -> Option<String> {
        self.inner.read().error.clone()
    }

    /// Returns `true` while at least one login is in flight.
    pub fn is_loading(&self) -> bool {
        self.logins_in_flight.load(Ordering::SeqCst) > 0
    }

    /// Returns the serializable projection of the current state.
    pub fn snapshot(&self) -> AuthSnapshot {
        self.inner.read().snapshot()
    }

    /// Subscribes to auth changes.
    ///
    /// Every change to `{user, isAuthenticated}` publishes the new snapshot.
    /// A lagging receiver misses intermediate states only; the latest
    /// snapshot always arrives.
    pub fn subscribe(&self) -> broadcast::Receiver<AuthSnapshot> {
        self.changes.subscribe()
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Clears memory and storage; returns `true` if the auth state changed.
    async fn clear_session(&self) -> bool {
        let changed = {
            let mut state = self.inner.write();
            let changed = state.is_authenticated || state.user.is_some();
            state.user = None;
            state.is_authenticated = false;
            state.error = None;
            state.token = None;
            changed
        };

        if let Err(e) = self.storage.remove(STORAGE_KEY).await {
            warn!(error = %e, "failed to remove persisted session");
        }
        if let Err(e) = self.storage.remove(TOKEN_KEY).await {
            warn!(error = %e, "failed to remove session token");
        }

        if changed {
            self.publish(AuthSnapshot::anonymous());
        }
        changed
    }

    async fn persist(&self, snapshot: &AuthSnapshot, token: &str) {
        // Persistence failures degrade to a memory-only session; check_auth
        // resolves the mismatch to signed-out on next startup.
        match serde_json::to_string(snapshot) {
            Ok(json) => {
                if let Err(e) = self.storage.save(STORAGE_KEY, &json).await {
                    warn!(error = %e, "failed to persist session");
                }
            }
            Err(e) => warn!(error = %e, "failed to serialize session"),
        }
        if let Err(e) = self.storage.save(TOKEN_KEY, token).await {
            warn!(error = %e, "failed to persist session token");
        }
    }

    fn publish(&self, snapshot: AuthSnapshot) {
        // No receivers is fine; the cookie bridge subscribes lazily.
        let _ = self.changes.send(snapshot);
    }
}

// =============================================================================
// Session Store Builder
// =============================================================================

/// Builder for constructing session stores.
#[derive(Debug)]
pub struct SessionStoreBuilder {
    credentials: Option<Arc<dyn CredentialStore>>,
    storage: Option<Arc<dyn StateStorage>>,
}

impl SessionStoreBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self {
            credentials: None,
            storage: None,
        }
    }

    /// Sets the credential store.
    pub fn credentials(mut self, credentials: Arc<dyn CredentialStore>) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Sets the storage backend.
    pub fn storage(mut self, storage: Arc<dyn StateStorage>) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Builds the store.
    ///
    /// Defaults: fixture credentials with production latency, in-memory
    /// storage.
    pub fn build(self) -> SessionStore {
        SessionStore::new(
            self.credentials
                .unwrap_or_else(|| Arc::new(FixtureCredentials::new())),
            self.storage.unwrap_or_else(|| Arc::new(MemoryStorage::new())),
        )
    }
}

impl Default for SessionStoreBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================
