// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Gate Integration Tests
//!
//! Integration tests for the request gate decision logic, driven end to end
//! from raw cookie values through classification to the verdict:
//!
//! - Bypass prefixes and asset paths
//! - Redirects for every identity class
//! - Query preservation and parameter replacement
//! - Landing decisions for already-authenticated users
//!
//! ## Test Categories
//!
//! - `test_gate_bypass_*`: Paths the gate never inspects
//! - `test_gate_anonymous_*`: Unauthenticated request handling
//! - `test_gate_invalid_*`: Corrupted-session handling
//! - `test_gate_role_*`: Authorization decisions per role
//! - `test_gate_root_*`: Login-path landing decisions

use mechanika_api::{evaluate, GateOutcome, RedirectReason};
use mechanika_core::{classify_cookie_value, PermissionMatrix, Role, Route};

use mechanika_tests::prelude::*;

fn outcome_for_cookie(pathname: &str, query: &str, cookie_value: &str) -> GateOutcome {
    let matrix = PermissionMatrix::new();
    evaluate(
        &matrix,
        pathname,
        query,
        classify_cookie_value(cookie_value),
    )
}

// =============================================================================
// Bypass Tests
// =============================================================================

#[test]
fn test_gate_bypass_framework_api_and_assets() {
    for path in ["/_next/static/app.js", "/api/auth/login", "/logo.svg"] {
        outcome_for_cookie(path, "", &CookieFixtures::garbled()).assert_allow();
        outcome_for_cookie(path, "", "").assert_allow();
    }
}

#[test]
fn test_gate_bypass_applies_before_protection() {
    // An API path under a protected-looking name is still bypassed.
    outcome_for_cookie("/api/bookings", "", "").assert_allow();
}

// =============================================================================
// Anonymous Tests
// =============================================================================

#[test]
fn test_gate_anonymous_protected_path_redirects_to_login() {
    let outcome = outcome_for_cookie("/bookings", "", "");
    outcome.assert_redirect_reason(RedirectReason::LoginRequired);
    outcome.assert_redirect_to("/?redirect=%2Fbookings");
}

#[test]
fn test_gate_anonymous_redirect_encodes_nested_path() {
    outcome_for_cookie("/inventory/parts/42", "", "")
        .assert_redirect_to("/?redirect=%2Finventory%2Fparts%2F42");
}

#[test]
fn test_gate_anonymous_redirect_preserves_query() {
    outcome_for_cookie("/bookings", "tab=today&page=2", "")
        .assert_redirect_to("/?tab=today&page=2&redirect=%2Fbookings");
}

#[test]
fn test_gate_anonymous_redirect_replaces_stale_redirect_param() {
    outcome_for_cookie("/services", "redirect=%2Fold", "")
        .assert_redirect_to("/?redirect=%2Fservices");
}

#[test]
fn test_gate_anonymous_root_and_unknown_paths_allowed() {
    outcome_for_cookie("/", "", "").assert_allow();
    outcome_for_cookie("/about", "", "").assert_allow();
}

#[test]
fn test_gate_signed_out_cookie_is_anonymous() {
    let outcome = outcome_for_cookie("/dashboard", "", &CookieFixtures::anonymous());
    outcome.assert_redirect_reason(RedirectReason::LoginRequired);
}

// =============================================================================
// Invalid Session Tests
// =============================================================================

#[test]
fn test_gate_invalid_session_redirects_with_error() {
    let outcome = outcome_for_cookie("/dashboard", "", &CookieFixtures::unknown_role());
    outcome.assert_redirect_reason(RedirectReason::SessionInvalid);
    outcome.assert_redirect_to("/?error=session_invalid");
}

#[test]
fn test_gate_invalid_session_preserves_query() {
    let cookie = AuthCookieBuilder::new().authenticated().user_id("9").build();
    outcome_for_cookie("/services", "tab=active", &cookie)
        .assert_redirect_to("/?tab=active&error=session_invalid");
}

#[test]
fn test_gate_invalid_session_falls_through_at_root() {
    // At the login page itself the broken session is not bounced; the user
    // can simply re-authenticate.
    outcome_for_cookie("/", "", &CookieFixtures::unknown_role()).assert_allow();
}

// =============================================================================
// Role Authorization Tests
// =============================================================================

#[test]
fn test_gate_role_admin_reaches_every_section() {
    let cookie = CookieFixtures::authenticated(Role::Admin);
    for route in Route::all() {
        outcome_for_cookie(route.path(), "", &cookie).assert_allow();
    }
}

#[test]
fn test_gate_role_manager_blocked_from_inventory() {
    let cookie = CookieFixtures::authenticated(Role::Manager);
    let outcome = outcome_for_cookie("/inventory", "", &cookie);
    outcome.assert_redirect_reason(RedirectReason::Unauthorized);
    outcome.assert_redirect_to(
        "/dashboard?error=unauthorized&message=You%20don%27t%20have%20permission%20to%20access%20this%20page",
    );
}

#[test]
fn test_gate_role_supervisor_blocked_from_mechanics_subpath() {
    let cookie = CookieFixtures::authenticated(Role::Supervisor);
    let outcome = outcome_for_cookie("/mechanics/7", "", &cookie);
    outcome.assert_redirect_reason(RedirectReason::Unauthorized);
}

#[test]
fn test_gate_role_permitted_subpaths_allowed() {
    let cookie = CookieFixtures::authenticated(Role::Supervisor);
    outcome_for_cookie("/bookings/42/edit", "", &cookie).assert_allow();
    outcome_for_cookie("/services", "tab=archive", &cookie).assert_allow();
}

#[test]
fn test_gate_role_respects_injected_matrix() {
    // A narrowed matrix turns an otherwise-permitted request away.
    let matrix = PermissionMatrix::builder()
        .grant(Role::Manager, [Route::Dashboard])
        .build();
    let auth = classify_cookie_value(&CookieFixtures::authenticated(Role::Manager));

    evaluate(&matrix, "/bookings", "", auth)
        .assert_redirect_reason(RedirectReason::Unauthorized);
    evaluate(&matrix, "/dashboard", "", auth).assert_allow();
}

// =============================================================================
// Root Landing Tests
// =============================================================================

#[test]
fn test_gate_root_authenticated_lands_on_dashboard() {
    let cookie = CookieFixtures::authenticated(Role::Manager);
    let outcome = outcome_for_cookie("/", "", &cookie);
    outcome.assert_redirect_reason(RedirectReason::AlreadyAuthenticated);
    outcome.assert_redirect_to("/dashboard");
}

#[test]
fn test_gate_root_honors_permitted_redirect_param() {
    let cookie = CookieFixtures::authenticated(Role::Manager);
    outcome_for_cookie("/", "redirect=%2Fbookings", &cookie).assert_redirect_to("/bookings");
}

#[test]
fn test_gate_root_ignores_forbidden_redirect_param() {
    // A manager cannot be bounced into inventory via the redirect parameter.
    let cookie = CookieFixtures::authenticated(Role::Manager);
    outcome_for_cookie("/", "redirect=%2Finventory", &cookie).assert_redirect_to("/dashboard");
}

#[test]
fn test_gate_root_strips_query_on_landing() {
    let cookie = CookieFixtures::authenticated(Role::Supervisor);
    outcome_for_cookie("/", "error=session_invalid", &cookie).assert_redirect_to("/dashboard");
}
