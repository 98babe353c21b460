// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Custom Test Assertions
//!
//! Domain-specific assertion helpers for MyMechanika integration tests.
//!
//! ## Design Principles
//!
//! - Provide clear, informative failure messages
//! - Keep assertions close to the vocabulary of the service
//! - Chain-able assertions for complex validations

use mechanika_api::{GateOutcome, RedirectReason};
use mechanika_core::{AuthSnapshot, Role};

// =============================================================================
// Snapshot Assertions
// =============================================================================

/// Assertion extensions for [`AuthSnapshot`].
pub trait SnapshotAssertions {
    /// Assert the snapshot is signed in with the given role.
    fn assert_signed_in(&self, role: Role);

    /// Assert the snapshot is the signed-out projection.
    fn assert_signed_out(&self);
}

impl SnapshotAssertions for AuthSnapshot {
    fn assert_signed_in(&self, role: Role) {
        assert!(
            self.is_authenticated,
            "Expected an authenticated snapshot, but it is signed out"
        );
        let actual = self
            .role()
            .unwrap_or_else(|| panic!("Authenticated snapshot has no user record"));
        assert_eq!(
            actual, role,
            "Expected role {:?}, but snapshot carries {:?}",
            role, actual
        );
    }

    fn assert_signed_out(&self) {
        assert!(
            !self.is_authenticated,
            "Expected a signed-out snapshot, but it is authenticated as {:?}",
            self.role()
        );
        assert!(
            self.user.is_none(),
            "Signed-out snapshot still carries a user record: {:?}",
            self.user
        );
    }
}

// =============================================================================
// Gate Outcome Assertions
// =============================================================================

/// Assertion extensions for [`GateOutcome`].
pub trait GateOutcomeAssertions {
    /// Assert the request is allowed through.
    fn assert_allow(&self);

    /// Assert a redirect to an exact location.
    fn assert_redirect_to(&self, expected: &str);

    /// Assert a redirect for a specific reason, returning the location.
    fn assert_redirect_reason(&self, expected: RedirectReason) -> &str;
}

impl GateOutcomeAssertions for GateOutcome {
    fn assert_allow(&self) {
        assert!(
            self.is_allow(),
            "Expected the gate to allow the request, but it redirected to {:?}",
            self.location()
        );
    }

    fn assert_redirect_to(&self, expected: &str) {
        match self {
            GateOutcome::Allow => {
                panic!("Expected a redirect to {}, but the gate allowed the request", expected)
            }
            GateOutcome::Redirect { location, .. } => assert_eq!(
                location, expected,
                "Expected a redirect to {}, but got {}",
                expected, location
            ),
        }
    }

    fn assert_redirect_reason(&self, expected: RedirectReason) -> &str {
        match self {
            GateOutcome::Allow => {
                panic!("Expected a {:?} redirect, but the gate allowed the request", expected)
            }
            GateOutcome::Redirect { location, reason } => {
                assert_eq!(
                    *reason, expected,
                    "Expected a {:?} redirect, but got {:?} (location: {})",
                    expected, reason, location
                );
                location
            }
        }
    }
}

// =============================================================================
// Cookie Header Assertions
// =============================================================================

/// Assert a `Set-Cookie` header value opens a session under the given name.
pub fn assert_cookie_sets_session(header: &str, cookie_name: &str) {
    assert!(
        header.starts_with(&format!("{}=", cookie_name)),
        "Set-Cookie does not target '{}': {}",
        cookie_name,
        header
    );
    assert!(
        !header.contains("Max-Age=0"),
        "Expected a session-opening cookie, but it expires immediately: {}",
        header
    );
    assert!(
        header.contains("Path=/"),
        "Auth cookie must be scoped to the whole site: {}",
        header
    );
    assert!(
        header.contains("SameSite=Lax"),
        "Auth cookie must be SameSite=Lax: {}",
        header
    );
}

/// Assert a `Set-Cookie` header value clears the session cookie.
pub fn assert_cookie_clears_session(header: &str, cookie_name: &str) {
    assert!(
        header.starts_with(&format!("{}=", cookie_name)),
        "Set-Cookie does not target '{}': {}",
        cookie_name,
        header
    );
    assert!(
        header.contains("Max-Age=0"),
        "Expected an expiring cookie, but Max-Age is not zero: {}",
        header
    );
}
