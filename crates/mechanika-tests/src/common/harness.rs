// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Test Harness
//!
//! High-level harness assembling a full service router for integration
//! tests, without binding a socket.
//!
//! ## Design Principles
//!
//! - Automatic resource management
//! - Consistent test environment setup
//! - Parallel test isolation
//! - Requests are driven through `tower::ServiceExt::oneshot`

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use tempfile::TempDir;
use tower::ServiceExt;

use mechanika_api::{ApiServer, AppState, ServiceConfig};
use mechanika_core::{Role, FIXTURE_PASSWORD};

use super::fixtures::AccountFixtures;

// =============================================================================
// Service Harness
// =============================================================================

/// A fully wired service for end-to-end request tests.
#[derive(Debug)]
pub struct ServiceHarness {
    state: AppState,
    temp_dir: Option<TempDir>,
}

impl ServiceHarness {
    /// Creates a harness with in-memory session state and zero login latency.
    pub fn new() -> Self {
        Self {
            state: AppState::for_testing(),
            temp_dir: None,
        }
    }

    /// Creates a harness whose session state persists to a temp file.
    ///
    /// The file survives for the lifetime of the harness, so a second state
    /// built over the same path can observe restored sessions.
    pub fn with_state_file() -> Self {
        let temp_dir = super::temp_test_dir("mechanika_harness_");
        let mut config = ServiceConfig::for_testing();
        config.auth.state_file = Some(temp_dir.path().join("session.json"));

        Self {
            state: AppState::builder().config(config).build(),
            temp_dir: Some(temp_dir),
        }
    }

    /// Creates a harness over an existing application state.
    pub fn with_state(state: AppState) -> Self {
        Self {
            state,
            temp_dir: None,
        }
    }

    /// The application state backing the router.
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// A fresh router over the shared state.
    pub fn router(&self) -> Router {
        ApiServer::new(self.state.clone()).router()
    }

    /// The configured auth cookie name.
    pub fn cookie_name(&self) -> &str {
        &self.state.config().cookie.name
    }

    /// The temp directory path when persisting, for reuse across harnesses.
    pub fn temp_dir(&self) -> Option<&TempDir> {
        self.temp_dir.as_ref()
    }

    // =========================================================================
    // Request Helpers
    // =========================================================================

    /// Performs a GET without credentials.
    pub async fn get(&self, uri: &str) -> Response {
        let request = Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("Failed to build request");
        self.router().oneshot(request).await.expect("Request failed")
    }

    /// Performs a GET carrying a `Cookie` header.
    pub async fn get_with_cookie(&self, uri: &str, cookie: &str) -> Response {
        let request = Request::builder()
            .uri(uri)
            .header(header::COOKIE, cookie)
            .body(Body::empty())
            .expect("Failed to build request");
        self.router().oneshot(request).await.expect("Request failed")
    }

    /// Performs a JSON POST.
    pub async fn post_json(&self, uri: &str, body: serde_json::Value) -> Response {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("Failed to build request");
        self.router().oneshot(request).await.expect("Request failed")
    }

    // =========================================================================
    // Session Helpers
    // =========================================================================

    /// Logs in with explicit credentials, returning the `Cookie` header value
    /// to replay on subsequent requests.
    pub async fn login(&self, email: &str, password: &str) -> String {
        let response = self
            .post_json(
                "/api/auth/login",
                serde_json::json!({ "email": email, "password": password }),
            )
            .await;
        assert_eq!(
            response.status(),
            StatusCode::OK,
            "Login failed for {}",
            email
        );

        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .expect("Login response has no Set-Cookie header")
            .to_str()
            .expect("Set-Cookie is not valid UTF-8");

        // Replay only the name=value pair, as a browser would.
        set_cookie
            .split(';')
            .next()
            .expect("Empty Set-Cookie header")
            .to_string()
    }

    /// Logs in as the seeded account for a role.
    pub async fn login_as(&self, role: Role) -> String {
        self.login(AccountFixtures::email_for(role), FIXTURE_PASSWORD)
            .await
    }

    /// Logs in as the seeded admin.
    pub async fn login_as_admin(&self) -> String {
        self.login_as(Role::Admin).await
    }
}

impl Default for ServiceHarness {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Response Helpers
// =============================================================================

/// Reads a response body as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read response body");
    serde_json::from_slice(&bytes).expect("Response body is not valid JSON")
}

/// Reads the `Location` header of a redirect response.
pub fn redirect_location(response: &Response) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .expect("Response has no Location header")
        .to_str()
        .expect("Location is not valid UTF-8")
        .to_string()
}
