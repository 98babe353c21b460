// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Shared application state.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::FromRef;

use mechanika_core::credentials::FixtureCredentials;
use mechanika_core::rbac::PermissionMatrix;
use mechanika_session::bridge::CookieBridge;
use mechanika_session::storage::{FileStorage, MemoryStorage, StateStorage};
use mechanika_session::store::SessionStore;

use crate::config::ServiceConfig;

// =============================================================================
// AppState
// =============================================================================

/// State shared across all request handlers.
///
/// Cheap to clone: every field is an `Arc`. Built once at startup by the
/// runtime and handed to the router.
#[derive(Debug, Clone)]
pub struct AppState {
    config: Arc<ServiceConfig>,
    store: Arc<SessionStore>,
    bridge: Arc<CookieBridge>,
    matrix: Arc<PermissionMatrix>,
    credentials: Arc<FixtureCredentials>,
}

impl AppState {
    /// Creates a state builder.
    pub fn builder() -> AppStateBuilder {
        AppStateBuilder::new()
    }

    /// State preset for tests: defaults with zero login latency.
    pub fn for_testing() -> Self {
        AppStateBuilder::new()
            .config(ServiceConfig::for_testing())
            .credentials(Arc::new(FixtureCredentials::for_testing()))
            .build()
    }

    /// Returns the service configuration.
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Returns the session store.
    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    /// Returns the cookie bridge.
    pub fn bridge(&self) -> &CookieBridge {
        &self.bridge
    }

    /// Returns the permission matrix.
    pub fn matrix(&self) -> &PermissionMatrix {
        &self.matrix
    }

    /// Returns the permission matrix handle for sharing with middleware.
    pub fn matrix_arc(&self) -> Arc<PermissionMatrix> {
        self.matrix.clone()
    }

    /// Returns the fixture credential store.
    pub fn credentials(&self) -> &FixtureCredentials {
        &self.credentials
    }
}

impl FromRef<AppState> for Arc<SessionStore> {
    fn from_ref(state: &AppState) -> Self {
        state.store.clone()
    }
}

impl FromRef<AppState> for Arc<ServiceConfig> {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

impl FromRef<AppState> for Arc<PermissionMatrix> {
    fn from_ref(state: &AppState) -> Self {
        state.matrix.clone()
    }
}

impl FromRef<AppState> for Arc<CookieBridge> {
    fn from_ref(state: &AppState) -> Self {
        state.bridge.clone()
    }
}

// =============================================================================
// AppStateBuilder
// =============================================================================

/// Builder for [`AppState`].
#[derive(Debug, Default)]
pub struct AppStateBuilder {
    config: Option<ServiceConfig>,
    store: Option<Arc<SessionStore>>,
    credentials: Option<Arc<FixtureCredentials>>,
    matrix: Option<PermissionMatrix>,
}

impl AppStateBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the service configuration.
    pub fn config(mut self, config: ServiceConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets a pre-built session store.
    pub fn store(mut self, store: Arc<SessionStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Sets the credential store.
    pub fn credentials(mut self, credentials: Arc<FixtureCredentials>) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Sets the permission matrix.
    pub fn matrix(mut self, matrix: PermissionMatrix) -> Self {
        self.matrix = Some(matrix);
        self
    }

    /// Builds the state.
    ///
    /// Defaults: fixture credentials with the configured simulated latency,
    /// file-backed session storage when `auth.state_file` is set and
    /// in-memory storage otherwise, the catalog permission matrix, and a
    /// cookie bridge over the configured cookie name and max age.
    pub fn build(self) -> AppState {
        let config = Arc::new(self.config.unwrap_or_default());

        let credentials = self.credentials.unwrap_or_else(|| {
            Arc::new(
                FixtureCredentials::new()
                    .with_latency(Duration::from_millis(config.auth.simulated_latency_ms)),
            )
        });

        let store = self.store.unwrap_or_else(|| {
            let storage: Arc<dyn StateStorage> = match &config.auth.state_file {
                Some(path) => Arc::new(FileStorage::new(path)),
                None => Arc::new(MemoryStorage::new()),
            };
            Arc::new(SessionStore::new(credentials.clone(), storage))
        });

        let bridge = Arc::new(
            CookieBridge::new()
                .with_name(config.cookie.name.clone())
                .with_max_age_secs(config.cookie.max_age_secs),
        );

        let matrix = Arc::new(self.matrix.unwrap_or_default());

        AppState {
            config,
            store,
            bridge,
            matrix,
            credentials,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use mechanika_core::role::Role;

    #[test]
    fn test_default_build_wires_config_into_bridge() {
        let config = ServiceConfig::for_testing();
        let state = AppState::builder().config(config).build();

        assert_eq!(state.bridge().name(), "mymechanika-auth");
        assert_eq!(state.config().server.port, 0);
    }

    #[test]
    fn test_custom_cookie_name_propagates() {
        let mut config = ServiceConfig::for_testing();
        config.cookie.name = "staging-auth".to_string();

        let state = AppState::builder().config(config).build();
        assert!(state
            .bridge()
            .set_cookie(&Default::default())
            .starts_with("staging-auth="));
    }

    #[test]
    fn test_default_matrix_matches_catalog() {
        let state = AppState::for_testing();
        assert!(state.matrix().has_route_permission(Role::Admin, "/inventory"));
        assert!(!state
            .matrix()
            .has_route_permission(Role::Supervisor, "/inventory"));
    }

    #[tokio::test]
    async fn test_for_testing_logs_in_without_latency() {
        let state = AppState::for_testing();
        let identity = state
            .store()
            .login("admin@mymechanika.com", "password123")
            .await
            .unwrap();
        assert_eq!(identity.role, Role::Admin);
    }
}
