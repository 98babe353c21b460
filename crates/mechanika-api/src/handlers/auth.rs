// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Authentication endpoints.
//!
//! `login` and `logout` are the only two writers of the auth cookie, and
//! each writes it in the same response that changes the session, so the
//! cookie and the store can never disagree for longer than one request.

use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use mechanika_core::catalog::{self, Action, Route};
use mechanika_core::role::Role;
use mechanika_core::snapshot::AuthSnapshot;

use crate::error::{ApiError, ApiResult};
use crate::extractors::CurrentSnapshot;
use crate::response::{ApiResponse, ResponseMeta, SessionResponse};
use crate::state::AppState;

// =============================================================================
// Login
// =============================================================================

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Login email.
    pub email: String,
    /// Login password.
    pub password: String,
}

/// `POST /api/auth/login`
///
/// Authenticates the credentials, opens the session, and installs the auth
/// cookie. A rejected login changes neither the session nor the cookie.
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> ApiResult<Response> {
    let email = body.email.trim();
    if email.is_empty() || body.password.is_empty() {
        return Err(ApiError::bad_request("Email and password are required"));
    }

    // A new attempt begins; the previous attempt's error is stale.
    state.store().clear_error();

    let identity = state.store().login(email, &body.password).await?;
    let snapshot = AuthSnapshot::authenticated(identity);
    let cookie = state.bridge().set_cookie(&snapshot);

    Ok((
        [(header::SET_COOKIE, cookie)],
        ApiResponse::success(SessionResponse::new(true, snapshot.user)),
    )
        .into_response())
}

// =============================================================================
// Logout
// =============================================================================

/// `POST /api/auth/logout`
///
/// Closes the session and clears the auth cookie in the same response.
/// Idempotent: signing out while signed out succeeds.
pub async fn logout(State(state): State<AppState>) -> Response {
    state.store().logout().await;
    let cookie = state.bridge().clear_cookie();

    (
        [(header::SET_COOKIE, cookie)],
        ApiResponse::success(SessionResponse::signed_out()),
    )
        .into_response()
}

// =============================================================================
// Me
// =============================================================================

/// `GET /api/auth/me`
///
/// Returns the session store's current projection. Unlike the gate, this
/// reads the store rather than the cookie: it reports what the service
/// believes, not what the request claims.
pub async fn me(State(state): State<AppState>) -> ApiResponse<SessionResponse> {
    let snapshot = state.store().snapshot();
    ApiResponse::success(SessionResponse::new(snapshot.is_authenticated, snapshot.user))
}

// =============================================================================
// Navigation Routes
// =============================================================================

/// One navigable section as presented to the requesting role.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationEntry {
    /// The section's path prefix.
    pub route: Route,
    /// Navigation label.
    pub label: &'static str,
    /// Icon identifier.
    pub icon: &'static str,
    /// Short description.
    pub description: &'static str,
    /// CRUD actions the role may perform within the section.
    pub actions: Vec<Action>,
}

/// Builds the navigation listing for a role, in catalog declaration order.
///
/// Visibility comes from the runtime permission matrix so the listing and
/// the gate always agree; the action grid comes from the static catalog.
pub fn navigation_for(state: &AppState, role: Role) -> Vec<NavigationEntry> {
    catalog::route_metadata()
        .iter()
        .filter(|meta| state.matrix().is_allowed(role, meta.route))
        .map(|meta| NavigationEntry {
            route: meta.route,
            label: meta.label,
            icon: meta.icon,
            description: meta.description,
            actions: catalog::actions_for(role, meta.route).to_vec(),
        })
        .collect()
}

/// `GET /api/auth/routes`
///
/// Returns the sections visible to the requesting identity. Anonymous and
/// invalid-session requests get an empty listing, not an error.
pub async fn navigation_routes(
    State(state): State<AppState>,
    snapshot: CurrentSnapshot,
) -> ApiResponse<Vec<NavigationEntry>> {
    let entries = match snapshot.role() {
        Some(role) => navigation_for(&state, role),
        None => Vec::new(),
    };
    let count = entries.len();
    ApiResponse::success(entries).with_meta(ResponseMeta::count(count))
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use mechanika_core::credentials::FIXTURE_PASSWORD;
    use mechanika_core::identity::Identity;

    fn snapshot_for(role: Role) -> CurrentSnapshot {
        CurrentSnapshot(AuthSnapshot::authenticated(Identity::new(
            "1",
            "user@mymechanika.com",
            "User",
            role,
        )))
    }

    #[tokio::test]
    async fn test_login_rejects_empty_fields() {
        let state = AppState::for_testing();
        let result = login(
            State(state),
            Json(LoginRequest {
                email: "  ".to_string(),
                password: "password123".to_string(),
            }),
        )
        .await;

        assert!(matches!(result, Err(ApiError::BadRequest { .. })));
    }

    #[tokio::test]
    async fn test_login_sets_cookie_and_session() {
        let state = AppState::for_testing();
        let response = login(
            State(state.clone()),
            Json(LoginRequest {
                email: "admin@mymechanika.com".to_string(),
                password: FIXTURE_PASSWORD.to_string(),
            }),
        )
        .await
        .unwrap();

        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap();
        assert!(cookie.starts_with("mymechanika-auth="));
        assert!(cookie.contains("Max-Age=604800"));
        assert!(state.store().is_authenticated());
    }

    #[tokio::test]
    async fn test_failed_login_maps_to_auth_error() {
        let state = AppState::for_testing();
        let result = login(
            State(state.clone()),
            Json(LoginRequest {
                email: "admin@mymechanika.com".to_string(),
                password: "wrong".to_string(),
            }),
        )
        .await;

        assert!(matches!(result, Err(ApiError::Auth(_))));
        assert!(!state.store().is_authenticated());
    }

    #[tokio::test]
    async fn test_logout_clears_cookie() {
        let state = AppState::for_testing();
        state
            .store()
            .login("admin@mymechanika.com", FIXTURE_PASSWORD)
            .await
            .unwrap();

        let response = logout(State(state.clone())).await;

        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap();
        assert!(cookie.contains("Max-Age=0"));
        assert!(!state.store().is_authenticated());
    }

    #[tokio::test]
    async fn test_me_reflects_store_state() {
        let state = AppState::for_testing();

        let signed_out = me(State(state.clone())).await;
        assert!(!signed_out.data.unwrap().is_authenticated);

        state
            .store()
            .login("manager@mymechanika.com", FIXTURE_PASSWORD)
            .await
            .unwrap();

        let signed_in = me(State(state)).await;
        let session = signed_in.data.unwrap();
        assert!(session.is_authenticated);
        assert_eq!(session.user.unwrap().role, Role::Manager);
    }

    #[tokio::test]
    async fn test_navigation_routes_per_role() {
        let state = AppState::for_testing();

        let admin = navigation_routes(State(state.clone()), snapshot_for(Role::Admin)).await;
        assert_eq!(admin.data.unwrap().len(), 5);

        let supervisor =
            navigation_routes(State(state.clone()), snapshot_for(Role::Supervisor)).await;
        let entries = supervisor.data.unwrap();
        assert_eq!(entries.len(), 3);
        assert!(entries.iter().all(|e| e.route != Route::Inventory));

        let anonymous = navigation_routes(
            State(state),
            CurrentSnapshot(AuthSnapshot::anonymous()),
        )
        .await;
        assert!(anonymous.data.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_navigation_entries_carry_action_grid() {
        let state = AppState::for_testing();
        let entries = navigation_for(&state, Role::Manager);

        let mechanics = entries
            .iter()
            .find(|e| e.route == Route::Mechanics)
            .unwrap();
        assert_eq!(mechanics.actions, vec![Action::View, Action::Edit]);
    }
}
