// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Mock Implementations
//!
//! Mock collaborators for testing failure paths the real implementations
//! never produce on demand.
//!
//! ## Design Principles
//!
//! - Mocks are configurable for different scenarios
//! - Call counts are observable for interaction assertions
//! - Thread-safe for concurrent test use

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use mechanika_core::credentials::CredentialStore;
use mechanika_core::error::{AuthError, AuthResult};
use mechanika_core::Identity;
use mechanika_session::StateStorage;

// =============================================================================
// Mock Credential Store
// =============================================================================

/// A credential store with scripted accounts and an optional failure mode.
#[derive(Debug, Default)]
pub struct MockCredentialStore {
    accounts: Mutex<HashMap<String, (String, Identity)>>,
    fail_with_storage_error: Mutex<Option<String>>,
    attempts: AtomicUsize,
}

impl MockCredentialStore {
    /// Creates an empty store; every login misses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an account.
    pub fn with_account(self, identity: Identity, password: impl Into<String>) -> Self {
        self.accounts
            .lock()
            .insert(identity.email.clone(), (password.into(), identity));
        self
    }

    /// Makes every authentication attempt fail with a storage error.
    pub fn failing(self, message: impl Into<String>) -> Self {
        *self.fail_with_storage_error.lock() = Some(message.into());
        self
    }

    /// Number of authentication attempts observed.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CredentialStore for MockCredentialStore {
    async fn authenticate(&self, email: &str, password: &str) -> AuthResult<Option<Identity>> {
        self.attempts.fetch_add(1, Ordering::SeqCst);

        if let Some(message) = self.fail_with_storage_error.lock().clone() {
            return Err(AuthError::storage(message));
        }

        let accounts = self.accounts.lock();
        Ok(accounts.get(email).and_then(|(stored, identity)| {
            (stored == password).then(|| identity.clone())
        }))
    }
}

// =============================================================================
// Failing Storage
// =============================================================================

/// A state storage whose every operation fails.
///
/// Drives the session store's reset-on-unreadable-state path.
#[derive(Debug)]
pub struct FailingStorage {
    message: String,
}

impl FailingStorage {
    /// Creates a storage that fails with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl StateStorage for FailingStorage {
    async fn load(&self, _key: &str) -> AuthResult<Option<String>> {
        Err(AuthError::storage(self.message.clone()))
    }

    async fn save(&self, _key: &str, _value: &str) -> AuthResult<()> {
        Err(AuthError::storage(self.message.clone()))
    }

    async fn remove(&self, _key: &str) -> AuthResult<()> {
        Err(AuthError::storage(self.message.clone()))
    }
}

// =============================================================================
// Recording Storage
// =============================================================================

/// An in-memory storage that records every operation for interaction tests.
#[derive(Debug, Default)]
pub struct RecordingStorage {
    values: Mutex<HashMap<String, String>>,
    operations: Mutex<Vec<String>>,
}

impl RecordingStorage {
    /// Creates an empty recording storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a key before the store under test starts.
    pub fn with_value(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.lock().insert(key.into(), value.into());
        self
    }

    /// The operation log, in order (`load:key`, `save:key`, `remove:key`).
    pub fn operations(&self) -> Vec<String> {
        self.operations.lock().clone()
    }

    /// Current value for a key.
    pub fn value(&self, key: &str) -> Option<String> {
        self.values.lock().get(key).cloned()
    }
}

#[async_trait]
impl StateStorage for RecordingStorage {
    async fn load(&self, key: &str) -> AuthResult<Option<String>> {
        self.operations.lock().push(format!("load:{}", key));
        Ok(self.values.lock().get(key).cloned())
    }

    async fn save(&self, key: &str, value: &str) -> AuthResult<()> {
        self.operations.lock().push(format!("save:{}", key));
        self.values.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> AuthResult<()> {
        self.operations.lock().push(format!("remove:{}", key));
        self.values.lock().remove(key);
        Ok(())
    }
}
