// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Auth error taxonomy.
//!
//! Four failure modes cover the whole access-control surface:
//!
//! - [`AuthError::InvalidCredentials`] — login rejected; recovered locally by
//!   the caller, surfaced as a user-visible message.
//! - [`AuthError::SessionInvalid`] — an authenticated-looking snapshot with an
//!   unresolvable role; forces re-authentication.
//! - [`AuthError::Unauthorized`] — valid role lacking permission for a route;
//!   recovered by redirecting to a permitted page.
//! - [`AuthError::Storage`] — persistence failures; internal, and degraded to
//!   the signed-out state wherever safety demands it.
//!
//! Cookie parse failures are deliberately not part of the taxonomy: they
//! degrade silently to the anonymous snapshot.

use thiserror::Error;

/// Result alias for auth operations.
pub type AuthResult<T> = Result<T, AuthError>;

// =============================================================================
// AuthError
// =============================================================================

/// Errors produced by authentication and authorization operations.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    /// Email/password pair matched no credential record.
    ///
    /// Deliberately carries no detail about which field was wrong.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// An authenticated-looking session with no resolvable role.
    #[error("session is invalid")]
    SessionInvalid,

    /// The role is valid but lacks permission for the requested route.
    #[error("access to '{route}' is not permitted")]
    Unauthorized {
        /// The pathname that was denied.
        route: String,
    },

    /// Persistence layer failure (I/O, serialization).
    #[error("storage error: {message}")]
    Storage {
        /// Description of the underlying failure.
        message: String,
    },
}

impl AuthError {
    /// Creates an unauthorized error for the given route.
    pub fn unauthorized(route: impl Into<String>) -> Self {
        AuthError::Unauthorized {
            route: route.into(),
        }
    }

    /// Creates a storage error.
    pub fn storage(message: impl Into<String>) -> Self {
        AuthError::Storage {
            message: message.into(),
        }
    }

    /// Returns a user-facing message that leaks no internals.
    pub fn user_message(&self) -> &'static str {
        match self {
            AuthError::InvalidCredentials => "Invalid email or password",
            AuthError::SessionInvalid => "Your session is no longer valid. Please sign in again.",
            AuthError::Unauthorized { .. } => "You don't have permission to access this page",
            AuthError::Storage { .. } => "Something went wrong. Please try again.",
        }
    }

    /// Returns a stable machine-readable code.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::InvalidCredentials => "invalid_credentials",
            AuthError::SessionInvalid => "session_invalid",
            AuthError::Unauthorized { .. } => "unauthorized",
            AuthError::Storage { .. } => "storage_error",
        }
    }

    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            AuthError::InvalidCredentials => 401,
            AuthError::SessionInvalid => 401,
            AuthError::Unauthorized { .. } => 403,
            AuthError::Storage { .. } => 500,
        }
    }

    /// Returns `true` for failures that are the server's fault.
    pub fn is_server_error(&self) -> bool {
        self.status_code() >= 500
    }
}

// =============================================================================
// Tests
// =============================================================================
