// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! HTTP server assembly.
//!
//! Builds the router, applies the middleware stack, and runs the server.
//! The gate layer sits innermost so trace, compression, and timeout wrap
//! its redirects too.

use std::future::Future;
use std::io;

use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::handlers;
use crate::middleware::GateLayer;
use crate::state::AppState;

// =============================================================================
// ApiServer
// =============================================================================

/// The MyMechanika HTTP server.
#[derive(Debug, Clone)]
pub struct ApiServer {
    state: AppState,
}

impl ApiServer {
    /// Creates a server over the given state.
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    /// Creates a server builder.
    pub fn builder() -> ApiServerBuilder {
        ApiServerBuilder::new()
    }

    /// Returns the shared state.
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Builds the router with the full middleware stack.
    pub fn router(&self) -> Router {
        let gate = GateLayer::new(
            self.state.matrix_arc(),
            &self.state.config().cookie.name,
        );

        let stack = ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CompressionLayer::new())
            .layer(TimeoutLayer::new(self.state.config().server.request_timeout))
            .layer(gate);

        Router::new()
            // Operational endpoints.
            .route("/health", get(handlers::health))
            .route("/ready", get(handlers::ready))
            // Auth API; bypassed by the gate's path rules.
            .route("/api/auth/login", post(handlers::login))
            .route("/api/auth/logout", post(handlers::logout))
            .route("/api/auth/me", get(handlers::me))
            .route("/api/auth/routes", get(handlers::navigation_routes))
            // Page descriptors, guarded by the gate.
            .route("/", get(handlers::login_page))
            .route("/dashboard", get(handlers::dashboard_page))
            .route("/dashboard/{*rest}", get(handlers::dashboard_page))
            .route("/{section}", get(handlers::section_page))
            .route("/{section}/{*rest}", get(handlers::section_page_nested))
            .layer(stack)
            .with_state(self.state.clone())
    }

    /// Runs the server until the process exits.
    pub async fn run(self) -> io::Result<()> {
        let listener = TcpListener::bind(self.state.config().socket_addr()).await?;
        info!(addr = %listener.local_addr()?, "server listening");
        axum::serve(listener, self.router()).await
    }

    /// Runs the server until the shutdown future resolves, then drains
    /// in-flight requests.
    pub async fn run_with_shutdown<F>(self, shutdown: F) -> io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = TcpListener::bind(self.state.config().socket_addr()).await?;
        info!(addr = %listener.local_addr()?, "server listening");
        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await
    }
}

// =============================================================================
// ApiServerBuilder
// =============================================================================

/// Builder for [`ApiServer`].
#[derive(Debug, Default)]
pub struct ApiServerBuilder {
    state: Option<AppState>,
}

impl ApiServerBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the application state.
    pub fn state(mut self, state: AppState) -> Self {
        self.state = Some(state);
        self
    }

    /// Builds the server, defaulting to state built from default config.
    pub fn build(self) -> ApiServer {
        ApiServer::new(self.state.unwrap_or_else(|| AppState::builder().build()))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    fn test_server() -> ApiServer {
        ApiServer::new(AppState::for_testing())
    }

    #[tokio::test]
    async fn test_health_route() {
        let response = test_server()
            .router()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_root_serves_login_descriptor() {
        let response = test_server()
            .router()
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_protected_route_redirects_anonymous() {
        let response = test_server()
            .router()
            .oneshot(Request::get("/bookings").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/?redirect=%2Fbookings"
        );
    }

    #[tokio::test]
    async fn test_unknown_section_is_not_found() {
        // "/about" is unprotected and falls through the gate to the router.
        let response = test_server()
            .router()
            .oneshot(Request::get("/about").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
