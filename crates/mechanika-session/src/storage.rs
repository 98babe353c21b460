// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Durable key-value storage for session state.
//!
//! The session store persists a handful of small string records (the
//! partialized auth snapshot and its corroborating token) under fixed
//! namespace keys. This module defines the storage abstraction and two
//! backends:
//!
//! - [`MemoryStorage`] — process-local, for tests and ephemeral runs
//! - [`FileStorage`] — a single JSON file with atomic replace-on-write
//!
//! A corrupt backing file is treated as absent rather than as an error: the
//! session layer resolves missing state to signed-out, which is the safe
//! default.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use parking_lot::RwLock;
use tokio::sync::Mutex;
use tracing::warn;

use mechanika_core::error::{AuthError, AuthResult};

// =============================================================================
// StateStorage
// =============================================================================

/// Durable string storage keyed by fixed namespace strings.
#[async_trait]
pub trait StateStorage: Send + Sync + std::fmt::Debug {
    /// Loads the value for a key, `None` when absent.
    async fn load(&self, key: &str) -> AuthResult<Option<String>>;

    /// Saves a value under a key, replacing any previous value.
    async fn save(&self, key: &str, value: &str) -> AuthResult<()>;

    /// Removes a key. Removing an absent key is a no-op.
    async fn remove(&self, key: &str) -> AuthResult<()>;
}

// =============================================================================
// Memory Storage
// =============================================================================

/// In-memory storage backend.
///
/// Thread-safe via `parking_lot::RwLock`; contents are lost on drop.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Creates an empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns `true` if no entries are stored.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

#[async_trait]
impl StateStorage for MemoryStorage {
    async fn load(&self, key: &str) -> AuthResult<Option<String>> {
        Ok(self.entries.read().get(key).cloned())
    }

    async fn save(&self, key: &str, value: &str) -> AuthResult<()> {
        self.entries.write().insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> AuthResult<()> {
        self.entries.write().remove(key);
        Ok(())
    }
}

// =============================================================================
// File Storage
// =============================================================================

/// File-backed storage: one JSON object of key/value strings.
///
/// Writes go through a temporary file followed by a rename, so a crash
/// mid-write never leaves a truncated record. Concurrent writers are
/// serialized by an internal async mutex.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStorage {
    /// Creates a file-backed store at the given path.
    ///
    /// The file is created lazily on first save.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_entries(&self) -> AuthResult<HashMap<String, String>> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(HashMap::new()),
            Err(e) => {
                return Err(AuthError::storage(format!(
                    "failed to read {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };

        match serde_json::from_str(&raw) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                // Corrupt state file: treat as absent so the session layer
                // settles on signed-out instead of failing startup.
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "session state file is corrupt, treating as empty"
                );
                Ok(HashMap::new())
            }
        }
    }

    async fn write_entries(&self, entries: &HashMap<String, String>) -> AuthResult<()> {
        let json = serde_json::to_string_pretty(entries)
            .map_err(|e| AuthError::storage(format!("failed to serialize state: {}", e)))?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.map_err(|e| {
                    AuthError::storage(format!("failed to create {}: {}", parent.display(), e))
                })?;
            }
        }

        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, json.as_bytes()).await.map_err(|e| {
            AuthError::storage(format!("failed to write {}: {}", tmp.display(), e))
        })?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(|e| {
            AuthError::storage(format!("failed to replace {}: {}", self.path.display(), e))
        })?;

        Ok(())
    }
}

#[async_trait]
impl StateStorage for FileStorage {
    async fn load(&self, key: &str) -> AuthResult<Option<String>> {
        Ok(self.read_entries().await?.remove(key))
    }

    async fn save(&self, key: &str, value: &str) -> AuthResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.read_entries().await?;
        entries.insert(key.to_string(), value.to_string());
        self.write_entries(&entries).await
    }

    async fn remove(&self, key: &str) -> AuthResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.read_entries().await?;
        if entries.remove(key).is_some() {
            self.write_entries(&entries).await?;
        }
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
