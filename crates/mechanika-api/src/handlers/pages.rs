// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Page descriptor endpoints.
//!
//! The dashboard client is a thin renderer: each navigable path returns a
//! JSON descriptor of what the page should show. The gate middleware has
//! already run by the time these handlers execute, so a section handler can
//! assume the requesting role passed the permission check; it still fails
//! closed (empty action set) when called without one.

use axum::extract::{Path, Query, State};
use serde::{Deserialize, Serialize};

use mechanika_core::catalog::{self, Action, Route};
use mechanika_core::credentials::CredentialListing;
use mechanika_core::error::AuthError;
use mechanika_core::identity::Identity;

use crate::error::{ApiError, ApiResult};
use crate::extractors::CurrentSnapshot;
use crate::handlers::auth::{navigation_for, NavigationEntry};
use crate::response::ApiResponse;
use crate::state::AppState;

/// Seconds after which a dismissible banner hides itself.
const BANNER_AUTO_HIDE_SECS: u64 = 5;

// =============================================================================
// Notice
// =============================================================================

/// A user-visible notice rendered at the top of a page.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    /// Machine-readable code, shared with the gate's redirect parameters.
    pub code: String,
    /// Human-readable message.
    pub message: String,
    /// Seconds until the notice hides itself, if it does.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_hide_secs: Option<u64>,
}

// =============================================================================
// Login Page
// =============================================================================

/// Query parameters recognized by the login page.
#[derive(Debug, Default, Deserialize)]
pub struct LoginPageQuery {
    /// Post-login destination, set by the gate.
    pub redirect: Option<String>,
    /// Error code, set by the gate.
    pub error: Option<String>,
}

/// Login page descriptor.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginPage {
    /// Page identifier.
    pub page: &'static str,
    /// Destination to forward to after a successful login.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,
    /// Notice carried over from a gate redirect.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<Notice>,
    /// Demo accounts shown beside the login form.
    pub demo_credentials: Vec<CredentialListing>,
}

/// `GET /`
///
/// The gate sends authenticated users elsewhere, so this descriptor only
/// renders for anonymous and invalid sessions.
pub async fn login_page(
    State(state): State<AppState>,
    Query(query): Query<LoginPageQuery>,
) -> ApiResponse<LoginPage> {
    let notice = match query.error.as_deref() {
        Some("session_invalid") => Some(Notice {
            code: "session_invalid".to_string(),
            message: AuthError::SessionInvalid.user_message().to_string(),
            auto_hide_secs: None,
        }),
        _ => None,
    };

    ApiResponse::success(LoginPage {
        page: "login",
        redirect: query.redirect,
        notice,
        demo_credentials: state.credentials().credential_listing(),
    })
}

// =============================================================================
// Dashboard Page
// =============================================================================

/// Query parameters recognized by the dashboard.
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    /// Error code, set by the gate on an unauthorized redirect.
    pub error: Option<String>,
    /// Message accompanying the error code.
    pub message: Option<String>,
}

/// Dashboard page descriptor.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardPage {
    /// Page identifier.
    pub page: &'static str,
    /// The signed-in identity.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<Identity>,
    /// Banner carried over from a gate redirect.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub banner: Option<Notice>,
    /// Sections visible to the identity, in navigation order.
    pub navigation: Vec<NavigationEntry>,
}

/// `GET /dashboard`
///
/// An unauthorized redirect lands here with `error` and `message` in the
/// query; they become a self-hiding banner.
pub async fn dashboard_page(
    State(state): State<AppState>,
    snapshot: CurrentSnapshot,
    Query(query): Query<DashboardQuery>,
) -> ApiResponse<DashboardPage> {
    let banner = match query.error.as_deref() {
        Some("unauthorized") => Some(Notice {
            code: "unauthorized".to_string(),
            message: query.message.unwrap_or_else(|| {
                AuthError::unauthorized("").user_message().to_string()
            }),
            auto_hide_secs: Some(BANNER_AUTO_HIDE_SECS),
        }),
        _ => None,
    };

    let navigation = match snapshot.role() {
        Some(role) => navigation_for(&state, role),
        None => Vec::new(),
    };

    ApiResponse::success(DashboardPage {
        page: "dashboard",
        user: snapshot.into_inner().user,
        banner,
        navigation,
    })
}

// =============================================================================
// Section Pages
// =============================================================================

/// Section page descriptor.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionPage {
    /// Page identifier, the section name.
    pub page: String,
    /// The section's path prefix.
    pub route: Route,
    /// Section title.
    pub label: &'static str,
    /// Short description.
    pub description: &'static str,
    /// CRUD actions the requesting role may perform here.
    pub actions: Vec<Action>,
}

/// `GET /{section}`
///
/// Serves the four non-dashboard sections; unknown sections are 404. The
/// gate has already rejected roles without route permission.
pub async fn section_page(
    State(state): State<AppState>,
    snapshot: CurrentSnapshot,
    Path(section): Path<String>,
) -> ApiResult<ApiResponse<SectionPage>> {
    render_section(&state, &snapshot, &section)
}

/// `GET /{section}/{*rest}`
///
/// Sub-resources inherit the parent section's descriptor.
pub async fn section_page_nested(
    State(state): State<AppState>,
    snapshot: CurrentSnapshot,
    Path((section, _rest)): Path<(String, String)>,
) -> ApiResult<ApiResponse<SectionPage>> {
    render_section(&state, &snapshot, &section)
}

fn render_section(
    state: &AppState,
    snapshot: &CurrentSnapshot,
    section: &str,
) -> ApiResult<ApiResponse<SectionPage>> {
    let route = Route::parse(section).ok_or_else(|| ApiError::not_found(section))?;
    let meta = catalog::route_metadata()
        .iter()
        .find(|meta| meta.route == route)
        .ok_or_else(|| ApiError::not_found(section))?;

    let actions = match snapshot.role() {
        Some(role) if state.matrix().is_allowed(role, route) => {
            catalog::actions_for(role, route).to_vec()
        }
        _ => Vec::new(),
    };

    Ok(ApiResponse::success(SectionPage {
        page: section.to_string(),
        route,
        label: meta.label,
        description: meta.description,
        actions,
    }))
}

// =============================================================================
// Tests
// =============================================================================
