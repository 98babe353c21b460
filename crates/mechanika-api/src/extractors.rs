// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Request extractors.
//!
//! The gate middleware parses the auth cookie once per request and stashes
//! the result in request extensions; handlers pull it out through
//! [`CurrentSnapshot`] instead of re-parsing headers.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use mechanika_core::role::Role;
use mechanika_core::snapshot::AuthSnapshot;

// =============================================================================
// CurrentSnapshot
// =============================================================================

/// The auth snapshot carried by the request's cookie.
///
/// Inserted by the gate middleware for every forwarded request, including
/// bypassed `/api` paths. Extraction never fails: a request that somehow
/// skipped the middleware yields the anonymous snapshot, which every
/// handler treats as signed-out.
#[derive(Debug, Clone)]
pub struct CurrentSnapshot(pub AuthSnapshot);

impl CurrentSnapshot {
    /// Returns the role carried by the snapshot, if authenticated.
    pub fn role(&self) -> Option<Role> {
        self.0.role()
    }

    /// Returns `true` if the snapshot claims an active session.
    pub fn is_authenticated(&self) -> bool {
        self.0.is_authenticated
    }

    /// Unwraps the snapshot.
    pub fn into_inner(self) -> AuthSnapshot {
        self.0
    }
}

impl<S> FromRequestParts<S> for CurrentSnapshot
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<CurrentSnapshot>()
            .cloned()
            .unwrap_or_else(|| CurrentSnapshot(AuthSnapshot::anonymous())))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;
    use mechanika_core::identity::Identity;

    #[tokio::test]
    async fn test_extracts_inserted_snapshot() {
        let identity = Identity::new("1", "admin@mymechanika.com", "Admin User", Role::Admin);
        let request = Request::builder()
            .uri("/dashboard")
            .extension(CurrentSnapshot(AuthSnapshot::authenticated(identity)))
            .body(())
            .unwrap();
        let (mut parts, _) = request.into_parts();

        let snapshot = CurrentSnapshot::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert!(snapshot.is_authenticated());
        assert_eq!(snapshot.role(), Some(Role::Admin));
    }

    #[tokio::test]
    async fn test_missing_extension_defaults_to_anonymous() {
        let request = Request::builder().uri("/").body(()).unwrap();
        let (mut parts, _) = request.into_parts();

        let snapshot = CurrentSnapshot::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert!(!snapshot.is_authenticated());
        assert_eq!(snapshot.role(), None);
    }
}
