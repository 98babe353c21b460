// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Request gate decision logic.
//!
//! The gate is a pure function of (pathname, query, cookie-derived auth,
//! permission matrix): no I/O, no clock, no session-store access. It is
//! evaluated fresh on every navigation request — auth can change between
//! requests, so nothing here is cached — and it never errors past its
//! boundary: every input, however malformed, resolves to [`GateOutcome::Allow`]
//! or [`GateOutcome::Redirect`].
//!
//! An identity that claims authentication but carries no resolvable role
//! ([`CookieAuth::Invalid`]) is turned away from protected paths with
//! `error=session_invalid`; at the root path it falls through to the login
//! page so the user can re-authenticate.

use mechanika_core::error::AuthError;
use mechanika_core::rbac::PermissionMatrix;
use mechanika_core::snapshot::CookieAuth;
use mechanika_core::Route;

/// The login path, which doubles as the redirect sink for unauthenticated
/// and session-invalid requests.
pub const ROOT_PATH: &str = "/";

/// Default landing route for authenticated users.
pub const DASHBOARD_PATH: &str = "/dashboard";

// =============================================================================
// GateOutcome
// =============================================================================

/// Why the gate redirected a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectReason {
    /// Unauthenticated request to a protected path; sent to the login page.
    LoginRequired,
    /// Authenticated-looking cookie with no resolvable role.
    SessionInvalid,
    /// Valid role lacking permission for the requested route.
    Unauthorized,
    /// Authenticated user at the login path; sent to their landing route.
    AlreadyAuthenticated,
}

/// The gate's verdict for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    /// Pass the request through to the handler.
    Allow,
    /// Short-circuit with a 307 redirect.
    Redirect {
        /// Target path with query string, ready for the `Location` header.
        location: String,
        /// Why the redirect was issued.
        reason: RedirectReason,
    },
}

impl GateOutcome {
    /// Returns `true` if the request passes through.
    pub fn is_allow(&self) -> bool {
        matches!(self, GateOutcome::Allow)
    }

    /// Returns the redirect location, if any.
    pub fn location(&self) -> Option<&str> {
        match self {
            GateOutcome::Redirect { location, .. } => Some(location),
            GateOutcome::Allow => None,
        }
    }

    fn redirect(location: String, reason: RedirectReason) -> Self {
        GateOutcome::Redirect { location, reason }
    }
}

// =============================================================================
// Path Classification
// =============================================================================

/// Returns `true` for paths the gate never inspects: framework internals,
/// the JSON API, and static assets (anything with a file extension).
pub fn is_bypassed(pathname: &str) -> bool {
    pathname.starts_with("/_next") || pathname.starts_with("/api") || pathname.contains('.')
}

/// Returns `true` if the pathname falls under a protected section prefix.
pub fn is_protected(pathname: &str) -> bool {
    Route::all()
        .iter()
        .any(|route| pathname.starts_with(route.path()))
}

// =============================================================================
// Decision
// =============================================================================

/// Evaluates the gate for one request.
///
/// `query` is the raw query string without the leading `?` (empty when the
/// request has none). Redirects preserve the incoming query except for the
/// authenticated-at-root case, which strips it.
pub fn evaluate(
    matrix: &PermissionMatrix,
    pathname: &str,
    query: &str,
    auth: CookieAuth,
) -> GateOutcome {
    if is_bypassed(pathname) {
        return GateOutcome::Allow;
    }

    if pathname == ROOT_PATH {
        if let CookieAuth::Authenticated(role) = auth {
            let target = query_param(query, "redirect")
                .filter(|target| matrix.has_route_permission(role, target));
            return GateOutcome::redirect(
                target.unwrap_or_else(|| DASHBOARD_PATH.to_string()),
                RedirectReason::AlreadyAuthenticated,
            );
        }
        return GateOutcome::Allow;
    }

    if !is_protected(pathname) {
        return GateOutcome::Allow;
    }

    match auth {
        CookieAuth::Anonymous => GateOutcome::redirect(
            location(ROOT_PATH, query, &[("redirect", pathname)]),
            RedirectReason::LoginRequired,
        ),
        CookieAuth::Invalid => GateOutcome::redirect(
            location(ROOT_PATH, query, &[("error", "session_invalid")]),
            RedirectReason::SessionInvalid,
        ),
        CookieAuth::Authenticated(role) => {
            if matrix.has_route_permission(role, pathname) {
                GateOutcome::Allow
            } else {
                let message = AuthError::unauthorized(pathname).user_message();
                GateOutcome::redirect(
                    location(
                        DASHBOARD_PATH,
                        query,
                        &[("error", "unauthorized"), ("message", message)],
                    ),
                    RedirectReason::Unauthorized,
                )
            }
        }
    }
}

// =============================================================================
// Query Helpers
// =============================================================================

/// Returns the decoded value of a query parameter, if present.
fn query_param(query: &str, name: &str) -> Option<String> {
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == name)
        .and_then(|(_, value)| urlencoding::decode(value).ok())
        .map(|value| value.into_owned())
}

/// Builds a redirect location: the path, the preserved incoming query, and
/// the extra parameters (replacing any incoming pair with the same key).
fn location(path: &str, query: &str, extra: &[(&str, &str)]) -> String {
    let mut parts: Vec<String> = query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .filter(|pair| {
            let key = pair.split('=').next().unwrap_or(pair);
            !extra.iter().any(|(k, _)| *k == key)
        })
        .map(str::to_string)
        .collect();

    for (key, value) in extra {
        parts.push(format!("{}={}", key, urlencoding::encode(value)));
    }

    if parts.is_empty() {
        path.to_string()
    } else {
        format!("{}?{}", path, parts.join("&"))
    }
}

// =============================================================================
// Tests
// =============================================================================
