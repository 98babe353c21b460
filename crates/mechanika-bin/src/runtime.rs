// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Service runtime.
//!
//! Wires the components together for the `run` command: configuration,
//! session store with its storage backend, the cookie bridge task, the
//! HTTP server, and shutdown coordination.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::info;

use mechanika_api::{ApiServer, AppState, ConfigError, ServiceConfig};

use crate::cli::DEFAULT_CONFIG_FILE;
use crate::error::BinResult;
use crate::shutdown::ShutdownCoordinator;

// =============================================================================
// ServiceRuntime
// =============================================================================

/// The assembled service, ready to run.
pub struct ServiceRuntime {
    config: Arc<ServiceConfig>,
    shutdown: ShutdownCoordinator,
}

impl ServiceRuntime {
    /// Creates a runtime builder.
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Returns the resolved configuration.
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Returns the shutdown coordinator.
    pub fn shutdown_coordinator(&self) -> &ShutdownCoordinator {
        &self.shutdown
    }

    /// Runs the service until a shutdown signal arrives.
    pub async fn run(self) -> BinResult<()> {
        info!(version = mechanika_api::VERSION, "Starting MyMechanika service");

        let state = AppState::builder().config((*self.config).clone()).build();

        // Reconcile any persisted session before serving traffic.
        let restored = state.store().check_auth().await;
        if restored.is_authenticated {
            info!(role = ?restored.role(), "Restored persisted session");
        }

        // Mirror session changes into cookie transitions for observability.
        let bridge = state.bridge().clone();
        let changes = state.store().subscribe();
        let bridge_task = tokio::spawn(async move { bridge.run(changes).await });

        // OS signals initiate shutdown; the server drains on the signal.
        let signal_coordinator = self.shutdown.clone();
        tokio::spawn(async move {
            signal_coordinator.wait_for_shutdown().await;
        });

        let server = ApiServer::new(state);
        server.run_with_shutdown(self.shutdown.shutdown_signal()).await?;

        bridge_task.abort();
        info!("Service stopped");
        Ok(())
    }
}

// =============================================================================
// RuntimeBuilder
// =============================================================================

/// Builder for [`ServiceRuntime`].
#[derive(Debug, Default)]
pub struct RuntimeBuilder {
    config: Option<ServiceConfig>,
    config_path: Option<PathBuf>,
    port: Option<u16>,
    state_file: Option<PathBuf>,
    dev: bool,
}

impl RuntimeBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a pre-built configuration, skipping file loading.
    pub fn config(mut self, config: ServiceConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets the configuration file path.
    pub fn config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    /// Overrides the listen port.
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Overrides the session state file.
    pub fn state_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.state_file = Some(path.into());
        self
    }

    /// Enables development mode: in-memory session state and no simulated
    /// login latency. Applied after the other overrides.
    pub fn dev(mut self, dev: bool) -> Self {
        self.dev = dev;
        self
    }

    /// Resolves the configuration and builds the runtime.
    pub fn build(self) -> BinResult<ServiceRuntime> {
        let mut config = match (self.config, self.config_path) {
            (Some(config), _) => config,
            (None, Some(path)) => load_config(&path)?,
            (None, None) => load_config(Path::new(DEFAULT_CONFIG_FILE))?,
        };

        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(state_file) = self.state_file {
            config.auth.state_file = Some(state_file);
        }
        if self.dev {
            config.auth.state_file = None;
            config.auth.simulated_latency_ms = 0;
        }
        config.validate()?;

        Ok(ServiceRuntime {
            config: Arc::new(config),
            shutdown: ShutdownCoordinator::new(),
        })
    }
}

/// Loads the configuration from a file.
///
/// The default config file is optional: when it is absent the service runs
/// on defaults plus environment overrides. An explicitly named file that
/// does not exist is an error.
fn load_config(path: &Path) -> BinResult<ServiceConfig> {
    if path.exists() {
        Ok(ServiceConfig::load(path)?)
    } else if path == Path::new(DEFAULT_CONFIG_FILE) {
        info!("No configuration file found, using defaults");
        let mut config = ServiceConfig::default();
        config.apply_env_overrides()?;
        Ok(config)
    } else {
        Err(ConfigError::file_not_found(path).into())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_with_defaults() {
        let runtime = ServiceRuntime::builder()
            .config(ServiceConfig::for_testing())
            .build()
            .unwrap();
        assert_eq!(runtime.config().server.port, 0);
    }

    #[test]
    fn test_overrides_apply_after_config() {
        let runtime = ServiceRuntime::builder()
            .config(ServiceConfig::default())
            .port(8080)
            .state_file("/tmp/mechanika-state.json")
            .build()
            .unwrap();

        assert_eq!(runtime.config().server.port, 8080);
        assert_eq!(
            runtime.config().auth.state_file,
            Some(PathBuf::from("/tmp/mechanika-state.json"))
        );
    }

    #[test]
    fn test_dev_mode_forces_memory_state_and_zero_latency() {
        let mut config = ServiceConfig::default();
        config.auth.state_file = Some(PathBuf::from("/var/lib/mechanika/session.json"));
        config.auth.simulated_latency_ms = 1000;

        let runtime = ServiceRuntime::builder().config(config).dev(true).build().unwrap();

        assert_eq!(runtime.config().auth.state_file, None);
        assert_eq!(runtime.config().auth.simulated_latency_ms, 0);
    }

    #[test]
    fn test_explicit_missing_config_is_an_error() {
        let result = ServiceRuntime::builder()
            .config_path("/nonexistent/mechanika.yaml")
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_config_file_loading() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("service.yaml");
        std::fs::write(&path, "server:\n  port: 4100\n").unwrap();

        let runtime = ServiceRuntime::builder().config_path(&path).build().unwrap();
        assert_eq!(runtime.config().server.port, 4100);
    }
}
